//! Cross-process connector lock manager: one JSON lockfile per connector
//! under `<locks_dir>/<connector>.lock` (normally `~/.slashbot/locks/`),
//! owned by exactly the pid that wrote it. A lock whose recorded pid is no
//! longer alive is reclaimable rather than blocking forever; any lockfile
//! that fails to parse is treated the same way (a corrupt lockfile is
//! indistinguishable from a crashed writer).

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockRecord {
    pub pid: u32,
    pub started_at: DateTime<Utc>,
    pub work_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct AcquireOutcome {
    pub acquired: bool,
    pub existing_pid: Option<u32>,
    pub existing_work_dir: Option<PathBuf>,
}

/// Checks whether `pid` names a running process. Linux-only (reads
/// `/proc/<pid>`); on any other platform this conservatively reports the
/// process as alive, since a false "alive" only costs a refused lock
/// acquisition while a false "dead" would let two writers collide.
fn pid_alive(pid: u32) -> bool {
    #[cfg(target_os = "linux")]
    {
        Path::new(&format!("/proc/{pid}")).exists()
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = pid;
        true
    }
}

pub struct LockManager {
    locks_dir: PathBuf,
}

impl LockManager {
    pub fn new(locks_dir: PathBuf) -> Result<Self, LockError> {
        fs::create_dir_all(&locks_dir).map_err(|source| LockError::Io {
            path: locks_dir.clone(),
            source,
        })?;
        Ok(Self { locks_dir })
    }

    fn lock_path(&self, connector: &str) -> PathBuf {
        self.locks_dir.join(format!("{connector}.lock"))
    }

    fn open_for_rw(&self, path: &Path) -> Result<File, LockError> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|source| LockError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    fn read_record(file: &mut File) -> Option<LockRecord> {
        use std::io::Read;
        let mut content = String::new();
        file.read_to_string(&mut content).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Attempts to acquire the lock for `connector`. If an existing lockfile
    /// names a pid that's still alive, returns `acquired: false` with the
    /// existing owner's info; otherwise (missing, stale, or unparsable)
    /// writes a fresh record for the calling process and returns
    /// `acquired: true`.
    ///
    /// The file-level exclusive lock (`fs2`) brackets the whole
    /// read-check-write sequence so two processes racing to acquire the
    /// same connector can't both observe "stale" and both write a record.
    pub fn acquire(&self, connector: &str, work_dir: PathBuf) -> Result<AcquireOutcome, LockError> {
        let path = self.lock_path(connector);
        let mut file = self.open_for_rw(&path)?;
        file.lock_exclusive().map_err(|source| LockError::Io {
            path: path.clone(),
            source,
        })?;

        let existing = Self::read_record(&mut file);
        let outcome = match &existing {
            Some(record) if pid_alive(record.pid) => AcquireOutcome {
                acquired: false,
                existing_pid: Some(record.pid),
                existing_work_dir: Some(record.work_dir.clone()),
            },
            _ => {
                if let Some(stale) = &existing {
                    tracing::warn!(connector, stale_pid = stale.pid, "reclaiming stale connector lock");
                }
                let record = LockRecord {
                    pid: std::process::id(),
                    started_at: Utc::now(),
                    work_dir,
                };
                let json = serde_json::to_string_pretty(&record).expect("LockRecord serializes");
                use std::io::{Seek, SeekFrom, Write};
                file.set_len(0).map_err(|source| LockError::Io {
                    path: path.clone(),
                    source,
                })?;
                file.seek(SeekFrom::Start(0)).map_err(|source| LockError::Io {
                    path: path.clone(),
                    source,
                })?;
                file.write_all(json.as_bytes()).map_err(|source| LockError::Io {
                    path: path.clone(),
                    source,
                })?;
                AcquireOutcome {
                    acquired: true,
                    existing_pid: None,
                    existing_work_dir: None,
                }
            }
        };

        let _ = fs2::FileExt::unlock(&file);
        Ok(outcome)
    }

    /// Removes the lockfile iff it still names the calling process's pid.
    pub fn release(&self, connector: &str) -> Result<(), LockError> {
        let path = self.lock_path(connector);
        let mut file = match self.open_for_rw(&path) {
            Ok(f) => f,
            Err(_) => return Ok(()),
        };
        file.lock_exclusive().map_err(|source| LockError::Io {
            path: path.clone(),
            source,
        })?;
        let owns_it = Self::read_record(&mut file)
            .map(|r| r.pid == std::process::id())
            .unwrap_or(false);
        let _ = fs2::FileExt::unlock(&file);
        drop(file);
        if owns_it {
            let _ = fs::remove_file(&path);
            tracing::debug!(connector, "released connector lock");
        }
        Ok(())
    }

    /// True if a live process currently holds the lock for `connector`.
    pub fn is_locked(&self, connector: &str) -> bool {
        let path = self.lock_path(connector);
        let Ok(mut file) = self.open_for_rw(&path) else {
            return false;
        };
        Self::read_record(&mut file)
            .map(|r| pid_alive(r.pid))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_succeeds_when_no_lockfile_exists() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LockManager::new(dir.path().to_path_buf()).unwrap();
        let outcome = manager.acquire("telegram", PathBuf::from("/work")).unwrap();
        assert!(outcome.acquired);
        assert!(manager.is_locked("telegram"));
    }

    #[test]
    fn acquire_fails_when_live_pid_holds_it() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LockManager::new(dir.path().to_path_buf()).unwrap();
        manager.acquire("telegram", PathBuf::from("/work")).unwrap();

        // same process pid is always "alive", so a second acquire attempt
        // from this test process observes the lock as held.
        let outcome = manager.acquire("telegram", PathBuf::from("/other")).unwrap();
        assert!(!outcome.acquired);
        assert_eq!(outcome.existing_pid, Some(std::process::id()));
    }

    #[test]
    fn acquire_reclaims_a_stale_lock_with_a_dead_pid() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LockManager::new(dir.path().to_path_buf()).unwrap();
        let stale = LockRecord {
            pid: 999_999,
            started_at: Utc::now(),
            work_dir: PathBuf::from("/old"),
        };
        fs::write(
            dir.path().join("telegram.lock"),
            serde_json::to_string(&stale).unwrap(),
        )
        .unwrap();

        let outcome = manager.acquire("telegram", PathBuf::from("/new")).unwrap();
        assert!(outcome.acquired);
    }

    #[test]
    fn release_removes_lock_owned_by_this_pid() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LockManager::new(dir.path().to_path_buf()).unwrap();
        manager.acquire("telegram", PathBuf::from("/work")).unwrap();
        manager.release("telegram").unwrap();
        assert!(!manager.is_locked("telegram"));
    }

    #[test]
    fn release_does_not_steal_a_lock_owned_by_another_pid() {
        let dir = tempfile::tempdir().unwrap();
        let manager = LockManager::new(dir.path().to_path_buf()).unwrap();
        let other = LockRecord {
            pid: 999_999,
            started_at: Utc::now(),
            work_dir: PathBuf::from("/other"),
        };
        fs::write(
            dir.path().join("telegram.lock"),
            serde_json::to_string(&other).unwrap(),
        )
        .unwrap();

        manager.release("telegram").unwrap();
        assert!(dir.path().join("telegram.lock").exists());
    }
}
