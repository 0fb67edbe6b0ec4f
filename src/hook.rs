//! Decides what to do with one PostToolUse invocation.
//!
//! Every path through [`run`] ends in a [`Decision`]. Only lint findings
//! produce a non-zero exit code; anything the hook cannot or should not
//! handle is a skip.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use path_absolutize::Absolutize;

use crate::config::{find_config, HookConfig};
use crate::input::HookInput;
use crate::linters::runner::lint_file;
use crate::linters::{Issue, LintOutcome};
use crate::logging;
use crate::project::{find_project_root, Language};
use crate::security::resolve_target;

/// Set to `1` (or `true`) to turn the hook into a no-op
pub const DISABLE_ENV_VAR: &str = "POST_TOOL_LINTER_HOOK_DISABLE";

/// Exit code telling the caller that the edited file has lint issues
pub const ISSUES_EXIT_CODE: u8 = 2;

/// Lint findings for one file, ready to show to the agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Path as shown to the user (relative to cwd when possible)
    pub display_path: String,
    pub linter: &'static str,
    pub issues: Vec<Issue>,
    pub max_reported: usize,
    /// Whether the findings should fail the hook
    pub blocking: bool,
}

impl Report {
    pub fn render(&self) -> String {
        let mut out = format!(
            "Linting issues found in {} ({}):\n",
            self.display_path, self.linter
        );
        for issue in self.issues.iter().take(self.max_reported) {
            out.push_str(&format!("  {}\n", issue));
        }
        if self.issues.len() > self.max_reported {
            out.push_str(&format!(
                "  ... and {} more\n",
                self.issues.len() - self.max_reported
            ));
        }
        out.push_str("Please fix the issues above before continuing.");
        out
    }
}

/// Final classification of an invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Skip(String),
    Clean { linter: &'static str },
    Issues(Report),
}

impl Decision {
    pub fn exit_code(&self) -> u8 {
        match self {
            Decision::Issues(report) if report.blocking => ISSUES_EXIT_CODE,
            _ => 0,
        }
    }
}

/// Full pipeline for raw stdin: parse, configure, install logging, evaluate.
///
/// Installs the global tracing subscriber, so it is meant to be called
/// once per process.
pub async fn run(raw: &str) -> Decision {
    if is_disabled() {
        return Decision::Skip(format!("disabled by {}", DISABLE_ENV_VAR));
    }

    let input = match HookInput::parse(raw) {
        Ok(Some(input)) => input,
        Ok(None) => {
            logging::init(None);
            tracing::debug!("empty input");
            return Decision::Skip("empty input".to_string());
        }
        Err(e) => {
            logging::init(None);
            tracing::warn!("ignoring malformed input: {:#}", e);
            return Decision::Skip("malformed input".to_string());
        }
    };

    let cwd = match resolve_cwd(input.cwd.as_deref()) {
        Ok(cwd) => cwd,
        Err(e) => {
            logging::init(None);
            tracing::warn!("cannot determine working directory: {}", e);
            return Decision::Skip("no working directory".to_string());
        }
    };

    let (config, config_source, config_error) = match find_config(&cwd) {
        Ok(loaded) => (loaded.config, loaded.source, None),
        Err(e) => (HookConfig::default(), None, Some(e)),
    };

    // Only tools we act on get a log file
    let tool_enabled = input
        .tool_name()
        .is_some_and(|t| config.is_tool_enabled(t));
    let log_path = logging::init((tool_enabled && config.log_file).then_some(cwd.as_path()));

    tracing::info!(
        event = input.hook_event_name.as_deref().unwrap_or("unknown"),
        tool = input.tool_name().unwrap_or("none"),
        session = input.session_id.as_deref().unwrap_or("none"),
        cwd = %cwd.display(),
        "hook invoked"
    );
    if let Some(path) = &log_path {
        tracing::debug!("logging to {}", path.display());
    }
    match (&config_source, &config_error) {
        (_, Some(e)) => tracing::warn!("invalid config, using defaults: {:#}", e),
        (Some(path), None) => tracing::info!("loaded config from {}", path.display()),
        (None, None) => tracing::debug!("no config file, using defaults"),
    }

    let decision = evaluate(&input, &cwd, &config).await;
    match &decision {
        Decision::Skip(reason) => tracing::info!("skipped: {}", reason),
        Decision::Clean { linter } => tracing::info!("clean ({})", linter),
        Decision::Issues(report) => tracing::info!(
            linter = report.linter,
            count = report.issues.len(),
            blocking = report.blocking,
            "issues found in {}",
            report.display_path
        ),
    }
    decision
}

/// Decide what to do with a parsed input. No global state is touched.
pub async fn evaluate(input: &HookInput, cwd: &Path, config: &HookConfig) -> Decision {
    let Some(tool_name) = input.tool_name() else {
        return Decision::Skip("no tool name".to_string());
    };
    if !config.is_tool_enabled(tool_name) {
        return Decision::Skip(format!("tool {} is not enabled", tool_name));
    }

    if !input.upstream_succeeded() {
        return Decision::Skip(format!(
            "{} failed: {}",
            tool_name,
            input.upstream_error().unwrap_or("no error message")
        ));
    }

    let Some(file_path) = input.file_path() else {
        return Decision::Skip("no file_path in tool input".to_string());
    };
    if input.edit_count() > 0 {
        tracing::debug!(edits = input.edit_count(), "multi-edit payload");
    }

    let target = match resolve_target(file_path, cwd) {
        Ok(path) => path,
        Err(rejection) => {
            tracing::warn!("refusing to lint {:?}: {}", file_path, rejection);
            return Decision::Skip(format!("rejected path: {}", rejection));
        }
    };

    let Some(language) = Language::from_path(&target) else {
        return Decision::Skip(format!("unsupported file type: {}", target.display()));
    };

    let relative = target.strip_prefix(cwd).unwrap_or(&target);
    if is_ignored(relative, &config.ignore_patterns()) {
        return Decision::Skip(format!("ignored by config: {}", relative.display()));
    }

    let metadata = match fs::metadata(&target) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Decision::Skip(format!("file does not exist: {}", target.display()));
        }
        Err(e) => {
            return Decision::Skip(format!("cannot stat {}: {}", target.display(), e));
        }
    };
    if !metadata.is_file() {
        return Decision::Skip(format!("not a regular file: {}", target.display()));
    }
    if metadata.len() > config.max_file_bytes {
        return Decision::Skip(format!(
            "file too large ({} bytes, limit {})",
            metadata.len(),
            config.max_file_bytes
        ));
    }

    let start = target.parent().unwrap_or(cwd);
    let project = find_project_root(start, cwd);
    tracing::info!(
        language = language.name(),
        project = project.kind.name(),
        root = %project.root.display(),
        "linting {}",
        relative.display()
    );
    if !project.kind.matches(language) {
        tracing::debug!("no {} project marker found, using defaults", language);
    }

    let outcome = lint_file(
        &target,
        language,
        &project,
        config.linters.for_language(language),
        config.linter_timeout(),
    )
    .await;

    match outcome {
        LintOutcome::Clean { linter } => Decision::Clean { linter },
        LintOutcome::Issues { linter, issues } => Decision::Issues(Report {
            display_path: relative.display().to_string(),
            linter,
            issues,
            max_reported: config.max_reported_issues,
            blocking: config.block_on_issues,
        }),
        LintOutcome::Skipped(reason) => Decision::Skip(reason),
    }
}

fn is_disabled() -> bool {
    std::env::var(DISABLE_ENV_VAR).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// The input's cwd when it names a directory, else the process cwd
fn resolve_cwd(input_cwd: Option<&str>) -> io::Result<PathBuf> {
    if let Some(raw) = input_cwd.filter(|c| !c.trim().is_empty()) {
        let path = Path::new(raw);
        // An absolute cwd must not depend on the process cwd, which may be gone
        let resolved = if path.is_absolute() {
            path.absolutize_from(path)
        } else {
            path.absolutize()
        };
        match resolved {
            Ok(candidate) if candidate.is_dir() => return Ok(candidate.into_owned()),
            _ => tracing::debug!("cwd {} is not a directory, using process cwd", raw),
        }
    }
    std::env::current_dir()
}

/// Match against the cwd-relative path, and the bare file name for simple patterns
fn is_ignored(relative: &Path, patterns: &[glob::Pattern]) -> bool {
    let file_name = relative.file_name().map(|n| n.to_string_lossy());
    patterns.iter().any(|p| {
        p.matches_path(relative) || file_name.as_ref().is_some_and(|n| p.matches(n))
    })
}
