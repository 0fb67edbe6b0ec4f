use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILENAME: &str = "post-tool-linter-hook.log";

/// First line of every log file
pub const LOG_BANNER: &str = "=== POST-TOOL LINTER HOOK LOG ===";

/// `EnvFilter` directives for stderr diagnostics
pub const LOG_ENV_VAR: &str = "POST_TOOL_LINTER_HOOK_LOG";

/// Create (truncating) the log file in `dir` and write the banner.
///
/// A symlink in place of the log file is refused rather than followed, so a
/// checked-in link cannot redirect the write outside `dir`.
pub fn open_log_file(dir: &Path) -> io::Result<(File, PathBuf)> {
    let path = dir.join(LOG_FILENAME);
    if fs::symlink_metadata(&path).is_ok_and(|m| m.file_type().is_symlink()) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is a symlink", path.display()),
        ));
    }
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)?;

    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    writeln!(file, "{}", LOG_BANNER)?;
    writeln!(file, "Started: {}", timestamp)?;
    writeln!(file, "PID: {}", std::process::id())?;
    writeln!(file)?;
    Ok((file, path))
}

/// Install the global subscriber: stderr always, plus a log file in
/// `log_dir` when given. Returns the log file path if one was created.
///
/// Never fails: a log file that cannot be created is reported on stderr and
/// skipped, and a second call is a no-op.
pub fn init(log_dir: Option<&Path>) -> Option<PathBuf> {
    let stderr_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("error"));
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_filter(stderr_filter);

    let mut open_error = None;
    let (file_layer, log_path) = match log_dir.map(open_log_file) {
        Some(Ok((file, path))) => {
            let layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .with_filter(LevelFilter::DEBUG);
            (Some(layer), Some(path))
        }
        Some(Err(e)) => {
            open_error = Some(e);
            (None, None)
        }
        None => (None, None),
    };

    if tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        return None;
    }

    if let Some(e) = open_error {
        tracing::warn!("could not create {}: {}", LOG_FILENAME, e);
    }
    log_path
}
