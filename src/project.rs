use std::fmt;
use std::path::{Path, PathBuf};

/// Marker files signalling a Python project
const PYTHON_MARKERS: &[&str] = &["pyproject.toml", "setup.py", "setup.cfg", "requirements.txt"];

/// Marker files signalling a JavaScript/TypeScript project
const JAVASCRIPT_MARKERS: &[&str] = &["package.json"];

/// Source languages the hook knows how to lint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
}

impl Language {
    /// Detect from the file extension. `None` means unsupported.
    pub fn from_path(path: &Path) -> Option<Language> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "py" | "pyi" => Some(Language::Python),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "ts" | "tsx" | "mts" | "cts" => Some(Language::TypeScript),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Project ecosystem, judged by marker files alone (contents never parsed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Python,
    JavaScript,
    /// Markers for both ecosystems in the same directory
    Mixed,
    Unknown,
}

impl ProjectKind {
    pub fn detect(dir: &Path) -> ProjectKind {
        match (
            has_marker(dir, PYTHON_MARKERS),
            has_marker(dir, JAVASCRIPT_MARKERS),
        ) {
            (true, true) => ProjectKind::Mixed,
            (true, false) => ProjectKind::Python,
            (false, true) => ProjectKind::JavaScript,
            (false, false) => ProjectKind::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProjectKind::Python => "python",
            ProjectKind::JavaScript => "javascript",
            ProjectKind::Mixed => "mixed",
            ProjectKind::Unknown => "unknown",
        }
    }

    /// Whether this project kind matches the language of the edited file
    pub fn matches(&self, language: Language) -> bool {
        match self {
            ProjectKind::Mixed => true,
            ProjectKind::Unknown => false,
            ProjectKind::Python => language == Language::Python,
            ProjectKind::JavaScript => {
                matches!(language, Language::JavaScript | Language::TypeScript)
            }
        }
    }
}

fn has_marker(dir: &Path, markers: &[&str]) -> bool {
    markers.iter().any(|m| dir.join(m).is_file())
}

/// A detected project: where it lives and what it is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub root: PathBuf,
    pub kind: ProjectKind,
}

/// Find the project root by walking up from `start` looking for marker files.
/// Stops at `boundary`. Falls back to `boundary` with kind Unknown.
pub fn find_project_root(start: &Path, boundary: &Path) -> Project {
    let mut current = start.to_path_buf();

    while current.starts_with(boundary) {
        let kind = ProjectKind::detect(&current);
        if kind != ProjectKind::Unknown {
            return Project {
                root: current,
                kind,
            };
        }

        if current == boundary {
            break;
        }

        if !current.pop() {
            break;
        }
    }

    Project {
        root: boundary.to_path_buf(),
        kind: ProjectKind::Unknown,
    }
}
