use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// Input JSON from Claude Code hook system (PostToolUse)
///
/// Every field is optional: the hook must accept whatever the caller sends
/// and decide for itself whether there is anything to lint.
#[derive(Debug, Default, Deserialize)]
pub struct HookInput {
    pub tool_name: Option<String>,
    pub tool_input: Option<ToolInput>,
    /// Older payloads call this `tool_output`, current ones `tool_response`.
    /// Kept untyped: some tools report a bare string here.
    #[serde(alias = "tool_response")]
    pub tool_output: Option<Value>,
    pub cwd: Option<String>,
    pub hook_event_name: Option<String>,
    pub session_id: Option<String>,
}

/// Tool-specific arguments. Only the fields the linter cares about.
#[derive(Debug, Default, Deserialize)]
pub struct ToolInput {
    pub file_path: Option<String>,
    pub content: Option<String>,
    pub edits: Option<Vec<EditOp>>,
}

/// A single replacement of a MultiEdit call
#[derive(Debug, Deserialize)]
pub struct EditOp {
    pub old_string: Option<String>,
    pub new_string: Option<String>,
}

impl HookInput {
    /// Parse raw stdin. Empty (or whitespace-only) input yields `Ok(None)`.
    pub fn parse(raw: &str) -> Result<Option<HookInput>> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let input: HookInput =
            serde_json::from_str(trimmed).context("Failed to parse hook input as JSON object")?;
        Ok(Some(input))
    }

    pub fn tool_name(&self) -> Option<&str> {
        self.tool_name.as_deref()
    }

    pub fn file_path(&self) -> Option<&str> {
        self.tool_input
            .as_ref()
            .and_then(|t| t.file_path.as_deref())
            .filter(|p| !p.is_empty())
    }

    /// The upstream tool is assumed to have succeeded unless it says otherwise.
    pub fn upstream_succeeded(&self) -> bool {
        self.tool_output
            .as_ref()
            .and_then(|o| o.get("success"))
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    pub fn upstream_error(&self) -> Option<&str> {
        self.tool_output
            .as_ref()
            .and_then(|o| o.get("error"))
            .and_then(Value::as_str)
    }

    /// Number of replacements in a MultiEdit payload (0 for other tools)
    pub fn edit_count(&self) -> usize {
        self.tool_input
            .as_ref()
            .and_then(|t| t.edits.as_ref())
            .map_or(0, |e| e.len())
    }
}
