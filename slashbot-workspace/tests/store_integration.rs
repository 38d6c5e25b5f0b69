//! Integration tests for slashbot_workspace's lock manager: persistence
//! across `LockManager` instances (i.e. across process restarts pointed at
//! the same lock directory), and stale/foreign lock handling against real
//! files on disk.

use slashbot_workspace::LockManager;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn lock_acquired_by_one_manager_is_visible_to_a_second_instance_over_the_same_dir() {
    let dir = tempdir().unwrap();
    let first = LockManager::new(dir.path().to_path_buf()).unwrap();
    let outcome = first.acquire("telegram", PathBuf::from("/work/a")).unwrap();
    assert!(outcome.acquired);

    let second = LockManager::new(dir.path().to_path_buf()).unwrap();
    assert!(second.is_locked("telegram"));
    let retry = second.acquire("telegram", PathBuf::from("/work/b")).unwrap();
    assert!(!retry.acquired);
    assert_eq!(retry.existing_pid, Some(std::process::id()));
}

#[test]
fn release_from_either_instance_frees_the_lock_for_both() {
    let dir = tempdir().unwrap();
    let first = LockManager::new(dir.path().to_path_buf()).unwrap();
    first.acquire("discord", PathBuf::from("/work")).unwrap();

    let second = LockManager::new(dir.path().to_path_buf()).unwrap();
    second.release("discord").unwrap();

    assert!(!first.is_locked("discord"));
    assert!(!second.is_locked("discord"));
}

#[test]
fn corrupt_lockfile_is_treated_as_stale_and_reclaimed() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("telegram.lock"), b"not json at all").unwrap();

    let manager = LockManager::new(dir.path().to_path_buf()).unwrap();
    let outcome = manager.acquire("telegram", PathBuf::from("/work")).unwrap();
    assert!(outcome.acquired);
}

#[test]
fn distinct_connectors_do_not_share_a_lock() {
    let dir = tempdir().unwrap();
    let manager = LockManager::new(dir.path().to_path_buf()).unwrap();
    manager.acquire("telegram", PathBuf::from("/work")).unwrap();

    let outcome = manager.acquire("discord", PathBuf::from("/work")).unwrap();
    assert!(outcome.acquired);
}
