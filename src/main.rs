use std::io::{self, Read};
use std::panic;
use std::process::ExitCode;

use post_tool_linter_hook::{hook, Decision};

fn main() -> ExitCode {
    let raw = read_input();

    // A crash must never surface as an exit code the caller would act on
    let decision = panic::catch_unwind(|| run_to_completion(&raw))
        .unwrap_or_else(|_| Decision::Skip("internal error".to_string()));

    if let Decision::Issues(report) = &decision {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("{}", report.render());
        }
    }

    ExitCode::from(decision.exit_code())
}

/// Drive the hook on a single-threaded runtime; linters are awaited one at a time.
fn run_to_completion(raw: &str) -> Decision {
    match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime.block_on(hook::run(raw)),
        Err(e) => Decision::Skip(format!("cannot start runtime: {}", e)),
    }
}

/// Read all of stdin. Unreadable or non-UTF-8 input degrades to text the
/// parser will reject, never to an error.
fn read_input() -> String {
    let mut buffer = Vec::new();
    if io::stdin().read_to_end(&mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
