use anyhow::Result;
use std::fmt;
use std::path::Path;

use crate::process::ProcessOutput;
use crate::project::Language;

pub mod eslint;
pub mod flake8;
pub mod registry;
pub mod ruff;
pub mod runner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single finding reported by a linter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub line: usize,
    pub column: usize,
    /// Rule identifier (`F401`, `no-unused-vars`); absent for syntax errors
    pub code: Option<String>,
    pub message: String,
    pub severity: Severity,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)?;
        if let Some(code) = &self.code {
            write!(f, " {}", code)?;
        }
        if self.severity == Severity::Warning {
            write!(f, " (warning)")?;
        }
        write!(f, " {}", self.message)
    }
}

/// Result of linting one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintOutcome {
    Clean {
        linter: &'static str,
    },
    Issues {
        linter: &'static str,
        issues: Vec<Issue>,
    },
    /// The linter could not give an answer (missing, crashed, timed out)
    Skipped(String),
}

/// How to invoke and interpret one linter
pub struct LinterSpec {
    pub name: &'static str,
    pub program: &'static str,
    pub languages: &'static [Language],
    /// Project-local tool directories checked before PATH (relative to project root)
    pub local_bin_dirs: &'static [&'static str],
    pub args: fn(&Path) -> Vec<String>,
    /// Turns a finished run into findings. Errors mean the run was unusable.
    pub parse: fn(&ProcessOutput) -> Result<Vec<Issue>>,
}

impl LinterSpec {
    pub fn supports(&self, language: Language) -> bool {
        self.languages.contains(&language)
    }
}

impl fmt::Debug for LinterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinterSpec")
            .field("name", &self.name)
            .field("program", &self.program)
            .field("languages", &self.languages)
            .finish()
    }
}

/// Short one-line summary of a failed run, for skip reasons
pub(crate) fn describe_failure(name: &str, output: &ProcessOutput) -> String {
    let detail = output
        .stderr
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("no output");
    match output.status {
        Some(code) => format!("{} exited with status {}: {}", name, code, detail),
        None => format!("{} was terminated: {}", name, detail),
    }
}
