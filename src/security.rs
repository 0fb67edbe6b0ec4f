//! Path checks applied before the hook touches an edited file.
//!
//! The hook only ever reads files inside the working directory it was given.
//! Anything else is rejected up front, before any file system access on the
//! target path.

use std::path::{Path, PathBuf};

use path_absolutize::Absolutize;
use thiserror::Error;

/// Why a `file_path` from the hook input was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathRejection {
    #[error("file path is empty")]
    Empty,
    /// Embedded NUL byte
    #[error("file path contains a NUL byte")]
    InvalidCharacters,
    /// A relative path whose `..` components climb out of the working directory
    #[error("path traversal outside working directory: {path}")]
    Traversal { path: String },
    /// An absolute path (or symlink target) outside the working directory
    #[error("{} is outside the working directory", path.display())]
    OutsideWorkingDir { path: PathBuf },
    #[error("cannot resolve {path}: {reason}")]
    Unresolvable { path: String, reason: String },
}

/// Resolve `file_path` against `cwd` and make sure it stays inside `cwd`.
///
/// `cwd` must be absolute. The returned path is lexically normalized but not
/// canonicalized, so it reads the same way the user wrote it.
pub fn resolve_target(file_path: &str, cwd: &Path) -> Result<PathBuf, PathRejection> {
    if file_path.trim().is_empty() {
        return Err(PathRejection::Empty);
    }
    if file_path.contains('\0') {
        return Err(PathRejection::InvalidCharacters);
    }

    let raw = Path::new(file_path);
    let is_relative = raw.is_relative();
    let unresolvable = |e: std::io::Error| PathRejection::Unresolvable {
        path: file_path.to_string(),
        reason: e.to_string(),
    };

    // Both sides resolve against `cwd`, never the process working directory
    let base = cwd.absolutize_from(cwd).map_err(unresolvable)?.to_path_buf();
    let normalized = raw
        .absolutize_from(base.as_path())
        .map_err(unresolvable)?
        .to_path_buf();
    if !normalized.starts_with(&base) {
        return Err(if is_relative {
            PathRejection::Traversal {
                path: file_path.to_string(),
            }
        } else {
            PathRejection::OutsideWorkingDir { path: normalized }
        });
    }

    // Symlinks inside cwd may still point elsewhere
    if let (Ok(real_target), Ok(real_base)) = (normalized.canonicalize(), base.canonicalize()) {
        if !real_target.starts_with(&real_base) {
            return Err(PathRejection::OutsideWorkingDir { path: real_target });
        }
    }

    Ok(normalized)
}
