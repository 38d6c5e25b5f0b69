//! User-global (`~/.slashbot/`) and workspace-local (`./.slashbot/`) roots.
//!
//! Grounded on `cli_run`'s old `DEFAULT_WORKING_FOLDER` constant and its
//! `load_agents_md`/`load_soul_md` dual cwd/working-folder lookup: one root
//! holds state that follows the user (locks, history, scheduled tasks,
//! agent profiles), the other holds state that follows the project
//! (rehydratable context notes).

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathsError {
    #[error("HOME environment variable not set")]
    NoHome,
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

const ROOT_DIR_NAME: &str = ".slashbot";

/// `~/.slashbot`. Reads `HOME` directly, per this runtime's documented
/// environment surface; does not fall back to a platform home-dir crate.
pub fn home_root() -> Result<PathBuf, PathsError> {
    let home = std::env::var("HOME").map_err(|_| PathsError::NoHome)?;
    Ok(PathBuf::from(home).join(ROOT_DIR_NAME))
}

/// `<cwd>/.slashbot`.
pub fn workspace_root(cwd: &Path) -> PathBuf {
    cwd.join(ROOT_DIR_NAME)
}

pub fn locks_dir(home_root: &Path) -> PathBuf {
    home_root.join("locks")
}

pub fn history_file(home_root: &Path) -> PathBuf {
    home_root.join("history")
}

pub fn tasks_file(home_root: &Path) -> PathBuf {
    home_root.join("tasks.json")
}

pub fn agents_dir(home_root: &Path) -> PathBuf {
    home_root.join("agents")
}

/// `~/.slashbot/credentials` — plain-text provider API key, one `key=value`
/// line per provider. Format fidelity isn't a requirement here; this is
/// deliberately the simplest thing that lets `login`/`logout` round-trip.
pub fn credentials_file(home_root: &Path) -> PathBuf {
    home_root.join("credentials")
}

pub fn context_dir(workspace_root: &Path) -> PathBuf {
    workspace_root.join("context")
}

/// Creates `dir` (and parents) if missing. Separate from the path-building
/// functions above so callers can compute a path without touching the
/// filesystem (e.g. to report it before creating it).
pub fn ensure_dir(dir: &Path) -> Result<(), PathsError> {
    std::fs::create_dir_all(dir).map_err(|source| PathsError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_root_joins_dot_slashbot_onto_home() {
        let prev = std::env::var("HOME").ok();
        std::env::set_var("HOME", "/home/tester");
        let root = home_root().unwrap();
        assert_eq!(root, PathBuf::from("/home/tester/.slashbot"));
        match prev {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }
    }

    #[test]
    fn home_root_errors_when_home_unset() {
        let prev = std::env::var("HOME").ok();
        std::env::remove_var("HOME");
        assert!(matches!(home_root(), Err(PathsError::NoHome)));
        if let Some(v) = prev {
            std::env::set_var("HOME", v);
        }
    }

    #[test]
    fn workspace_root_joins_dot_slashbot_onto_cwd() {
        let root = workspace_root(Path::new("/tmp/proj"));
        assert_eq!(root, PathBuf::from("/tmp/proj/.slashbot"));
    }

    #[test]
    fn well_known_subpaths_nest_under_their_root() {
        let home = PathBuf::from("/home/tester/.slashbot");
        assert_eq!(locks_dir(&home), home.join("locks"));
        assert_eq!(history_file(&home), home.join("history"));
        assert_eq!(tasks_file(&home), home.join("tasks.json"));
        assert_eq!(agents_dir(&home), home.join("agents"));
        assert_eq!(credentials_file(&home), home.join("credentials"));

        let ws = PathBuf::from("/tmp/proj/.slashbot");
        assert_eq!(context_dir(&ws), ws.join("context"));
    }

    #[test]
    fn ensure_dir_creates_nested_path() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
