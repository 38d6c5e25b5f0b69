//! `~/.slashbot/credentials`: one `key=value` line per stored secret.
//!
//! Format fidelity isn't a goal here, just enough persistence for
//! `slashbot login`/`/logout` to round-trip an API key across runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The field `login`/`logout` read and write.
pub const API_KEY_FIELD: &str = "api_key";

#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("read credentials file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write credentials file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn parse(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect()
}

pub fn load(path: &Path) -> Result<HashMap<String, String>, CredentialsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(parse(&content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(source) => Err(CredentialsError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn save(path: &Path, creds: &HashMap<String, String>) -> Result<(), CredentialsError> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let body: String = creds.iter().map(|(k, v)| format!("{k}={v}\n")).collect();
    std::fs::write(path, body).map_err(|source| CredentialsError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads just the stored API key, if any.
pub fn load_api_key(path: &Path) -> Result<Option<String>, CredentialsError> {
    Ok(load(path)?.remove(API_KEY_FIELD))
}

/// Persists `api_key`, leaving any other stored fields untouched.
pub fn save_api_key(path: &Path, api_key: &str) -> Result<(), CredentialsError> {
    let mut creds = load(path)?;
    creds.insert(API_KEY_FIELD.to_string(), api_key.to_string());
    save(path, &creds)
}

/// Removes the credentials file entirely. `/logout` has nothing else to undo.
pub fn clear(path: &Path) -> Result<(), CredentialsError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(CredentialsError::Write {
            path: path.to_path_buf(),
            source,
        }),
    }
}
