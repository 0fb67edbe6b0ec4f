use anyhow::{bail, Result};
use std::path::Path;

use crate::linters::{describe_failure, Issue, Severity};
use crate::process::ProcessOutput;

pub fn args(file: &Path) -> Vec<String> {
    vec![
        "--format=default".to_string(),
        file.to_string_lossy().to_string(),
    ]
}

/// Parse one `path:row:col: CODE text` line
fn parse_line(line: &str) -> Option<Issue> {
    let (location, rest) = line.split_once(": ")?;
    // the path itself may contain ':', so take row and col from the right
    let mut parts = location.rsplitn(3, ':');
    let column = parts.next()?.parse().ok()?;
    let line_no = parts.next()?.parse().ok()?;
    parts.next()?;

    let (code, message) = rest.split_once(' ').unwrap_or((rest, ""));
    let severity = if code.starts_with('W') || code.starts_with('C') {
        Severity::Warning
    } else {
        Severity::Error
    };

    Some(Issue {
        line: line_no,
        column,
        code: Some(code.to_string()),
        message: message.trim().to_string(),
        severity,
    })
}

/// Exit 0 = clean, 1 = violations
pub fn parse(output: &ProcessOutput) -> Result<Vec<Issue>> {
    match output.status {
        Some(0) => Ok(Vec::new()),
        Some(1) => {
            let issues: Vec<Issue> = output.stdout.lines().filter_map(parse_line).collect();
            if issues.is_empty() {
                bail!("flake8 reported violations but none could be parsed");
            }
            Ok(issues)
        }
        _ => bail!(describe_failure("flake8", output)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let issue = parse_line("/tmp/x.py:1:1: F401 'os' imported but unused").unwrap();
        assert_eq!(issue.line, 1);
        assert_eq!(issue.column, 1);
        assert_eq!(issue.code.as_deref(), Some("F401"));
        assert_eq!(issue.message, "'os' imported but unused");
        assert_eq!(issue.severity, Severity::Error);
    }

    #[test]
    fn test_parse_line_with_colon_in_path() {
        let issue = parse_line("C:/work/x.py:12:80: E501 line too long (99 > 79 characters)").unwrap();
        assert_eq!(issue.line, 12);
        assert_eq!(issue.column, 80);
        assert_eq!(issue.code.as_deref(), Some("E501"));
    }

    #[test]
    fn test_warning_codes() {
        let issue = parse_line("x.py:5:1: W391 blank line at end of file").unwrap();
        assert_eq!(issue.severity, Severity::Warning);
    }

    #[test]
    fn test_unparseable_lines_skipped() {
        assert!(parse_line("something went wrong").is_none());
        assert!(parse_line("x.py:a:b: E1 msg").is_none());
    }

    #[test]
    fn test_parse_output() {
        let out = ProcessOutput {
            status: Some(1),
            stdout: "x.py:1:1: F401 'os' imported but unused\nx.py:3:20: E231 missing whitespace after ','\n"
                .to_string(),
            stderr: String::new(),
            timed_out: false,
        };
        let issues = parse(&out).unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[1].code.as_deref(), Some("E231"));
    }

    #[test]
    fn test_clean_and_failed() {
        let clean = ProcessOutput {
            status: Some(0),
            stdout: String::new(),
            stderr: String::new(),
            timed_out: false,
        };
        assert!(parse(&clean).unwrap().is_empty());

        let failed = ProcessOutput {
            status: Some(2),
            stdout: String::new(),
            stderr: "Traceback (most recent call last):".to_string(),
            timed_out: false,
        };
        assert!(parse(&failed).is_err());
    }
}
