//! Claude Code PostToolUse hook that lints the file an edit just touched.
//!
//! Reads one JSON payload from stdin, picks a linter for the file's language
//! and reports findings through the exit code: 0 when there is nothing to
//! report, 2 when the linter found issues.

pub mod config;
pub mod hook;
pub mod input;
pub mod linters;
pub mod logging;
pub mod process;
pub mod project;
pub mod security;

pub use hook::{run, Decision, Report};
