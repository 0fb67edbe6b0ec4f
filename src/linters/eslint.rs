use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::linters::{describe_failure, Issue, Severity};
use crate::process::ProcessOutput;

/// ESLint's notice for files excluded by its own ignore config
const IGNORED_FILE_NOTICE: &str = "File ignored";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Message {
    rule_id: Option<String>,
    /// 1 = warning, 2 = error
    severity: u8,
    message: String,
    #[serde(default)]
    line: usize,
    #[serde(default)]
    column: usize,
    #[serde(default)]
    fatal: bool,
}

/// One per linted file in `eslint --format json`
#[derive(Debug, Deserialize)]
struct FileResult {
    #[serde(default)]
    messages: Vec<Message>,
}

pub fn args(file: &Path) -> Vec<String> {
    vec![
        "--format".to_string(),
        "json".to_string(),
        "--no-color".to_string(),
        file.to_string_lossy().to_string(),
    ]
}

/// Exit 0 = no errors (warnings possible), 1 = errors, 2 = eslint failed
/// (typically no config file for the project)
pub fn parse(output: &ProcessOutput) -> Result<Vec<Issue>> {
    match output.status {
        Some(0) | Some(1) => {}
        _ => bail!(describe_failure("eslint", output)),
    }

    let stdout = output.stdout.trim();
    if stdout.is_empty() {
        return Ok(Vec::new());
    }

    let results: Vec<FileResult> =
        serde_json::from_str(stdout).context("Failed to parse eslint JSON output")?;

    Ok(results
        .into_iter()
        .flat_map(|r| r.messages)
        .filter(|m| !(m.rule_id.is_none() && m.message.starts_with(IGNORED_FILE_NOTICE)))
        .map(|m| Issue {
            line: m.line,
            column: m.column,
            code: m.rule_id,
            message: m.message,
            severity: if m.fatal || m.severity >= 2 {
                Severity::Error
            } else {
                Severity::Warning
            },
        })
        .collect())
}
