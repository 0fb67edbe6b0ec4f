use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::linters::{describe_failure, Issue, Severity};
use crate::process::ProcessOutput;

#[derive(Debug, Deserialize)]
struct Location {
    row: usize,
    column: usize,
}

/// One entry of `ruff check --output-format json`
#[derive(Debug, Deserialize)]
struct Diagnostic {
    /// null for syntax errors
    code: Option<String>,
    message: String,
    location: Option<Location>,
}

pub fn args(file: &Path) -> Vec<String> {
    vec![
        "check".to_string(),
        "--output-format".to_string(),
        "json".to_string(),
        "--no-fix".to_string(),
        "--quiet".to_string(),
        file.to_string_lossy().to_string(),
    ]
}

/// Exit 0 = clean, 1 = violations, anything else = ruff itself failed
pub fn parse(output: &ProcessOutput) -> Result<Vec<Issue>> {
    match output.status {
        Some(0) | Some(1) => {}
        _ => bail!(describe_failure("ruff", output)),
    }

    let stdout = output.stdout.trim();
    if stdout.is_empty() {
        if output.status == Some(1) {
            bail!("ruff reported violations but printed no diagnostics");
        }
        return Ok(Vec::new());
    }

    let diagnostics: Vec<Diagnostic> =
        serde_json::from_str(stdout).context("Failed to parse ruff JSON output")?;

    Ok(diagnostics
        .into_iter()
        .map(|d| {
            let (line, column) = d.location.map_or((0, 0), |l| (l.row, l.column));
            Issue {
                line,
                column,
                code: d.code,
                message: d.message,
                severity: Severity::Error,
            }
        })
        .collect())
}
