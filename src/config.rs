use anyhow::{bail, Context, Result};
use glob::Pattern;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::linters::registry::LINTERS;
use crate::project::Language;

pub const CONFIG_FILENAME: &str = "post-tool-linter-hook.yaml";

/// Longest per-linter timeout a config may ask for
const MAX_TIMEOUT_SECS: u64 = 60;

/// Linter preference per language family, in order
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinterPreferences {
    pub python: Vec<String>,
    /// Also used for TypeScript
    pub javascript: Vec<String>,
}

impl Default for LinterPreferences {
    fn default() -> Self {
        Self {
            python: vec!["ruff".to_string(), "flake8".to_string()],
            javascript: vec!["eslint".to_string()],
        }
    }
}

impl LinterPreferences {
    pub fn for_language(&self, language: Language) -> &[String] {
        match language {
            Language::Python => &self.python,
            Language::JavaScript | Language::TypeScript => &self.javascript,
        }
    }
}

/// Hook configuration (as parsed from YAML, defaults filled in)
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HookConfig {
    /// Tools whose edits trigger linting
    pub enabled_tools: Vec<String>,
    /// Exit 2 when issues are found; otherwise report and exit 0
    pub block_on_issues: bool,
    pub linter_timeout_secs: u64,
    /// Files larger than this are skipped
    pub max_file_bytes: u64,
    pub max_reported_issues: usize,
    /// Glob patterns for files that are never linted (relative to cwd)
    pub ignore: Vec<String>,
    /// Write post-tool-linter-hook.log into cwd
    pub log_file: bool,
    pub linters: LinterPreferences,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            enabled_tools: vec![
                "Edit".to_string(),
                "MultiEdit".to_string(),
                "Write".to_string(),
            ],
            block_on_issues: true,
            linter_timeout_secs: 5,
            max_file_bytes: 1024 * 1024,
            max_reported_issues: 20,
            ignore: Vec::new(),
            log_file: true,
            linters: LinterPreferences::default(),
        }
    }
}

impl HookConfig {
    pub fn is_tool_enabled(&self, tool_name: &str) -> bool {
        self.enabled_tools.iter().any(|t| t == tool_name)
    }

    pub fn linter_timeout(&self) -> Duration {
        Duration::from_secs(self.linter_timeout_secs)
    }

    /// Compiled ignore patterns. Invalid ones are rejected at load time.
    pub fn ignore_patterns(&self) -> Vec<Pattern> {
        self.ignore
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .collect()
    }
}

/// Config along with where it came from
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: HookConfig,
    /// `None` when no config file exists and defaults are in use
    pub source: Option<PathBuf>,
}

/// Validates a parsed config
fn validate(config: &HookConfig, config_path: &Path) -> Result<()> {
    if config.enabled_tools.iter().any(|t| t.trim().is_empty()) {
        bail!(
            "Invalid config at {}: 'enabled_tools' contains an empty tool name",
            config_path.display()
        );
    }
    if config.linter_timeout_secs == 0 || config.linter_timeout_secs > MAX_TIMEOUT_SECS {
        bail!(
            "Invalid config at {}: 'linter_timeout_secs' must be between 1 and {}",
            config_path.display(),
            MAX_TIMEOUT_SECS
        );
    }
    for pattern in &config.ignore {
        if let Err(e) = Pattern::new(pattern) {
            bail!(
                "Invalid config at {}: ignore pattern '{}' is not a valid glob: {}",
                config_path.display(),
                pattern,
                e
            );
        }
    }
    for (key, language, names) in [
        ("linters.python", Language::Python, &config.linters.python),
        (
            "linters.javascript",
            Language::JavaScript,
            &config.linters.javascript,
        ),
    ] {
        for name in names {
            match LINTERS.get(name.as_str()) {
                None => bail!(
                    "Invalid config at {}: unknown linter '{}' in '{}'",
                    config_path.display(),
                    name,
                    key
                ),
                Some(spec) if !spec.supports(language) => bail!(
                    "Invalid config at {}: linter '{}' cannot lint {} files",
                    config_path.display(),
                    name,
                    language.name()
                ),
                Some(_) => {}
            }
        }
    }
    Ok(())
}

/// Loads and validates a post-tool-linter-hook.yaml config file.
pub fn load_config(config_path: &Path) -> Result<HookConfig> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

    // An empty file means "all defaults"
    if content.trim().is_empty() {
        return Ok(HookConfig::default());
    }

    let parsed: HookConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;

    validate(&parsed, config_path)?;
    Ok(parsed)
}

/// Finds the config for a working directory. Only `cwd` itself is searched;
/// the hook never reads configuration from above the project it was run in.
///
/// Missing file → defaults. A broken file is an error the caller decides
/// how to handle.
pub fn find_config(cwd: &Path) -> Result<LoadedConfig> {
    let config_path = cwd.join(CONFIG_FILENAME);
    if !config_path.is_file() {
        return Ok(LoadedConfig {
            config: HookConfig::default(),
            source: None,
        });
    }

    let config = load_config(&config_path)?;
    Ok(LoadedConfig {
        config,
        source: Some(config_path),
    })
}
