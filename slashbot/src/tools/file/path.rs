//! Path resolution shared by all file-action tools: every path argument is
//! resolved relative to the working folder and rejected if it would escape
//! it (via `..` or an absolute path elsewhere).

use std::path::{Path, PathBuf};

use crate::tool_source::ToolSourceError;

/// Resolves `path_param` (as given by the model) against `working_folder`,
/// rejecting anything that would land outside it.
pub fn resolve_path_under(
    working_folder: &Path,
    path_param: &str,
) -> Result<PathBuf, ToolSourceError> {
    let working_folder = working_folder
        .canonicalize()
        .map_err(|e| ToolSourceError::InvalidInput(format!("working folder not found: {e}")))?;

    let candidate = Path::new(path_param);
    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        working_folder.join(candidate)
    };

    let normalized = normalize(&joined);
    if !normalized.starts_with(&working_folder) {
        return Err(ToolSourceError::InvalidInput(format!(
            "path escapes working folder: {path_param}"
        )));
    }
    Ok(normalized)
}

/// Lexically normalizes a path (collapses `.`/`..`) without touching the
/// filesystem, so this works for paths that don't exist yet (e.g. write targets).
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                out.pop();
            }
            std::path::Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}
