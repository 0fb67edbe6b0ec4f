use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;

use crate::linters::registry::LINTERS;
use crate::linters::{LintOutcome, LinterSpec};
use crate::process::run_with_timeout;
use crate::project::{Language, Project};

/// Find a linter's executable: project-local tool dirs first, then PATH
pub fn resolve_executable(spec: &LinterSpec, project_root: &Path) -> Option<PathBuf> {
    for dir in spec.local_bin_dirs {
        let candidate = project_root.join(dir).join(spec.program);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    which::which(spec.program).ok()
}

/// Lint `file` with the first available linter from `preferred`.
///
/// Returns `Skipped` when none of the preferred linters is installed; a
/// linter that is installed but fails does not fall through to the next one.
pub async fn lint_file(
    file: &Path,
    language: Language,
    project: &Project,
    preferred: &[String],
    timeout: Duration,
) -> LintOutcome {
    for name in preferred {
        let Some(spec) = LINTERS.get(name.as_str()) else {
            tracing::warn!(linter = %name, "unknown linter, ignoring");
            continue;
        };
        if !spec.supports(language) {
            continue;
        }

        match resolve_executable(spec, &project.root) {
            Some(executable) => {
                tracing::debug!(
                    linter = spec.name,
                    executable = %executable.display(),
                    "linter resolved"
                );
                return run_linter(spec, &executable, file, &project.root, timeout).await;
            }
            None => {
                tracing::debug!(linter = spec.name, "linter not installed");
            }
        }
    }

    LintOutcome::Skipped(format!(
        "no {} linter available (tried: {})",
        language,
        preferred.join(", ")
    ))
}

/// Run a single resolved linter and interpret its output
async fn run_linter(
    spec: &LinterSpec,
    executable: &Path,
    file: &Path,
    working_dir: &Path,
    timeout: Duration,
) -> LintOutcome {
    let args = (spec.args)(file);
    tracing::info!(linter = spec.name, args = ?args, "running linter");

    let mut command = Command::new(executable);
    command.args(&args).current_dir(working_dir);

    let output = match run_with_timeout(&mut command, None, timeout).await {
        Ok(output) => output,
        Err(e) => {
            return LintOutcome::Skipped(format!("failed to start {}: {}", spec.name, e));
        }
    };

    if output.timed_out {
        return LintOutcome::Skipped(format!(
            "{} timed out after {}s",
            spec.name,
            timeout.as_secs()
        ));
    }

    match (spec.parse)(&output) {
        Ok(issues) if issues.is_empty() => LintOutcome::Clean { linter: spec.name },
        Ok(issues) => LintOutcome::Issues {
            linter: spec.name,
            issues,
        },
        Err(e) => LintOutcome::Skipped(format!("{:#}", e)),
    }
}
