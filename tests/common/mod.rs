//! Shared harness: temp-dir fixtures and a timeout-bounded hook invoker.
#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use post_tool_linter_hook::hook::DISABLE_ENV_VAR;
use post_tool_linter_hook::logging::{LOG_ENV_VAR, LOG_FILENAME};
use post_tool_linter_hook::process::run_with_timeout;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::process::Command;

/// Bound for scenarios that may run a real linter
pub const HOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Bound for inputs the hook should reject immediately
pub const QUICK_TIMEOUT: Duration = Duration::from_secs(5);

/// Return code reported when the hook had to be killed
pub const TIMEOUT_RETURNCODE: i32 = -1;

#[derive(Debug, Clone)]
pub struct HookResult {
    pub returncode: i32,
    pub stdout: String,
    pub stderr: String,
}

impl HookResult {
    fn timeout() -> Self {
        HookResult {
            returncode: TIMEOUT_RETURNCODE,
            stdout: String::new(),
            stderr: "TIMEOUT".to_string(),
        }
    }

    pub fn timed_out(&self) -> bool {
        self.returncode == TIMEOUT_RETURNCODE && self.stderr == "TIMEOUT"
    }
}

pub fn hook_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_post-tool-linter-hook"))
}

/// Run the hook with arbitrary stdin text in a throwaway working directory.
/// Never blocks past `timeout`.
pub fn run_hook(payload: &str, timeout: Duration) -> HookResult {
    let scratch = Fixture::new();
    run_hook_in(scratch.path(), payload, timeout, &[])
}

pub fn hook_command(working_dir: &Path, env: &[(&str, &str)]) -> Command {
    let mut command = Command::new(hook_path());
    command
        .current_dir(working_dir)
        .env_remove(DISABLE_ENV_VAR)
        .env_remove(LOG_ENV_VAR)
        .envs(env.iter().copied());
    command
}

pub fn run_hook_in(
    working_dir: &Path,
    payload: &str,
    timeout: Duration,
    env: &[(&str, &str)],
) -> HookResult {
    run_command(hook_command(working_dir, env), payload, timeout)
}

/// Feed `payload` to an already configured command and collect the result
pub fn run_command(mut command: Command, payload: &str, timeout: Duration) -> HookResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("build runtime");
    let output = runtime
        .block_on(run_with_timeout(&mut command, Some(payload.as_bytes()), timeout))
        .expect("failed to spawn hook");
    if output.timed_out {
        return HookResult::timeout();
    }

    HookResult {
        returncode: output.status.unwrap_or(TIMEOUT_RETURNCODE),
        stdout: output.stdout,
        stderr: output.stderr,
    }
}

pub fn run_hook_json(payload: &Value) -> HookResult {
    run_hook(&payload.to_string(), HOOK_TIMEOUT)
}

/// Fail loudly on a hang before checking anything else
pub fn assert_no_timeout(result: &HookResult) {
    assert!(
        !result.timed_out(),
        "hook must never hang (stdout: {:?})",
        result.stdout
    );
}

pub fn assert_exit_code(result: &HookResult, expected: i32) {
    assert_no_timeout(result);
    assert_eq!(
        result.returncode, expected,
        "unexpected exit code\nSTDOUT:\n{}\nSTDERR:\n{}",
        result.stdout, result.stderr
    );
}

/// 0 = nothing to report, 2 = linting issues found
pub fn assert_clean_or_issues(result: &HookResult) {
    assert_no_timeout(result);
    assert!(
        [0, 2].contains(&result.returncode),
        "exit code {} is neither 0 nor 2\nSTDERR:\n{}",
        result.returncode,
        result.stderr
    );
}

/// An isolated working directory, removed on drop (also when a test panics)
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("hook_test_")
            .tempdir()
            .expect("create fixture dir");
        Fixture { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn cwd(&self) -> String {
        self.path().to_string_lossy().to_string()
    }

    /// Write a file (parent dirs created) and return its absolute path
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write fixture file");
        path
    }

    pub fn write_pyproject(&self) -> PathBuf {
        self.write("pyproject.toml", "[tool.ruff]\nselect = [\"E\", \"F\"]\n")
    }

    pub fn write_package_json(&self) -> PathBuf {
        let package = json!({"name": "test-project", "scripts": {"test": "jest"}});
        self.write("package.json", &package.to_string())
    }

    pub fn write_config(&self, yaml: &str) -> PathBuf {
        self.write("post-tool-linter-hook.yaml", yaml)
    }

    pub fn log_file(&self) -> PathBuf {
        self.path().join(LOG_FILENAME)
    }

    /// Drop an executable shell script where the hook looks for
    /// project-local tools, e.g. `.venv/bin/ruff`
    #[cfg(unix)]
    pub fn install_fake_linter(&self, rel_path: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.write(rel_path, &format!("#!/bin/sh\n{}\n", body));
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod fake linter");
        path
    }

    /// A ruff stand-in that always reports one unused import
    #[cfg(unix)]
    pub fn install_failing_ruff(&self) -> PathBuf {
        self.install_fake_linter(
            ".venv/bin/ruff",
            r#"echo '[{"code":"F401","message":"`os` imported but unused","location":{"row":1,"column":8}}]'
exit 1"#,
        )
    }

    /// Standard PostToolUse payload for `tool_name` on `file_path`
    pub fn payload(&self, tool_name: &str, file_path: &Path) -> Value {
        json!({
            "tool_name": tool_name,
            "tool_input": {"file_path": file_path.to_string_lossy()},
            "tool_output": {"success": true},
            "cwd": self.cwd()
        })
    }

    pub fn run(&self, payload: &Value) -> HookResult {
        self.run_with_env(payload, &[])
    }

    pub fn run_with_env(&self, payload: &Value, env: &[(&str, &str)]) -> HookResult {
        run_hook_in(self.path(), &payload.to_string(), HOOK_TIMEOUT, env)
    }
}
