#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::{assert_exit_code, hook_path, run_hook, QUICK_TIMEOUT};

#[test]
fn test_empty_input_handling() {
    let result = run_hook("", QUICK_TIMEOUT);
    assert_exit_code(&result, 0);
}

#[test]
fn test_whitespace_input_handling() {
    let result = run_hook("\n\n   \t\n", QUICK_TIMEOUT);
    assert_exit_code(&result, 0);
}

#[test]
fn test_minimal_valid_json() {
    let result = run_hook("{}", QUICK_TIMEOUT);
    assert_exit_code(&result, 0);
}

#[test]
fn test_no_output_on_skip() {
    let result = run_hook("{}", QUICK_TIMEOUT);
    assert_exit_code(&result, 0);
    assert!(result.stdout.is_empty(), "stdout: {}", result.stdout);
}

#[test]
fn test_hook_file_exists() {
    let path = hook_path();
    assert!(path.exists(), "hook binary should exist at {}", path.display());
    assert!(std::fs::File::open(&path).is_ok(), "hook binary should be readable");
}

#[cfg(unix)]
#[test]
fn test_hook_executable_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(hook_path()).unwrap().permissions().mode();
    assert_ne!(mode & 0o111, 0, "hook binary should be executable");
}
