// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn write(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn backlog_paths_append_an_index() {
    let path = Path::new("/tmp/audit.log");
    assert_eq!(backlog_path(path, 1), PathBuf::from("/tmp/audit.log.1"));
    assert_eq!(backlog_path(path, 5), PathBuf::from("/tmp/audit.log.5"));
}

#[test]
fn small_file_is_not_rotated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    write(&path, "short");
    assert!(!rotate_if_needed(&path, 1024, 3).unwrap());
    assert_eq!(read(&path), "short");
}

#[test]
fn missing_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    assert!(!rotate_if_needed(&path, 1024, 3).unwrap());
}

#[test]
fn oversized_file_moves_to_first_backlog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    write(&path, &"x".repeat(100));
    assert!(rotate_if_needed(&path, 10, 3).unwrap());
    assert!(!path.exists());
    assert_eq!(read(&backlog_path(&path, 1)).len(), 100);
}

#[test]
fn backlogs_shift_and_oldest_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    write(&path, "gen-3");
    write(&backlog_path(&path, 1), "gen-2");
    write(&backlog_path(&path, 2), "gen-1");

    assert!(rotate_if_needed(&path, 0, 2).unwrap());

    assert_eq!(read(&backlog_path(&path, 1)), "gen-3");
    assert_eq!(read(&backlog_path(&path, 2)), "gen-2");
    // gen-1 fell off the end of the retention window.
    assert!(!backlog_path(&path, 3).exists());
}

#[test]
fn zero_retention_discards_the_active_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    write(&path, "contents");
    assert!(rotate_if_needed(&path, 0, 0).unwrap());
    assert!(!path.exists());
    assert!(!backlog_path(&path, 1).exists());
}
