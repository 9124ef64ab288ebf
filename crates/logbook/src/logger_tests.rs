// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::rotate::backlog_path;

fn config_in(dir: &tempfile::TempDir) -> LogConfig {
    LogConfig::new(dir.path().join("audit.log"))
}

fn read(config: &LogConfig) -> String {
    std::fs::read_to_string(&config.path).unwrap_or_default()
}

#[tokio::test]
async fn info_entries_buffer_until_flush() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let logger = Logger::new(config.clone());

    logger.record(Level::Info, "one");
    logger.record(Level::Info, "two");
    assert_eq!(logger.buffered(), 2);
    assert!(read(&config).is_empty());

    logger.flush().unwrap();
    assert_eq!(logger.buffered(), 0);
    let contents = read(&config);
    assert!(contents.contains("one"));
    assert!(contents.contains("two"));
    assert_eq!(contents.lines().count(), 2);
}

#[tokio::test]
async fn error_entries_flush_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let logger = Logger::new(config.clone());

    logger.record(Level::Info, "buffered");
    logger.record(Level::Error, "boom");

    // The error forces the whole buffer out, not just itself.
    assert_eq!(logger.buffered(), 0);
    let contents = read(&config);
    assert!(contents.contains("buffered"));
    assert!(contents.contains("boom"));
}

#[tokio::test]
async fn crossing_the_byte_threshold_flushes() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir);
    config.flush_threshold_bytes = 200;
    let logger = Logger::new(config.clone());

    logger.record(Level::Info, "x".repeat(300));
    assert_eq!(logger.buffered(), 0);
    assert!(read(&config).contains("xxx"));
}

#[tokio::test]
async fn periodic_timer_flushes_nonempty_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir);
    config.flush_interval = Duration::from_millis(30);
    let logger = Logger::new(config.clone());

    logger.record(Level::Info, "tick");
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(logger.buffered(), 0);
    assert!(read(&config).contains("tick"));
}

#[tokio::test]
async fn dispose_flushes_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let logger = Logger::new(config.clone());

    logger.record(Level::Info, "last words");
    logger.dispose();
    logger.dispose();

    assert!(read(&config).contains("last words"));

    // Entries after dispose are dropped, not buffered.
    logger.record(Level::Info, "too late");
    assert_eq!(logger.buffered(), 0);
    assert!(!read(&config).contains("too late"));
}

#[tokio::test]
async fn oversized_destination_rotates_on_next_flush() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir);
    config.max_file_bytes = 64;
    config.retention = 2;
    let logger = Logger::new(config.clone());

    logger.record(Level::Info, "first generation padding padding padding");
    logger.flush().unwrap();
    assert!(read(&config).len() as u64 > config.max_file_bytes);

    logger.record(Level::Info, "second generation");
    logger.flush().unwrap();

    let backlog = std::fs::read_to_string(backlog_path(&config.path, 1)).unwrap();
    assert!(backlog.contains("first generation"));
    // The active file holds only the newly flushed entries.
    let active = read(&config);
    assert!(active.contains("second generation"));
    assert!(!active.contains("first generation"));
}

#[tokio::test]
async fn clones_share_one_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);
    let logger = Logger::new(config);
    let clone = logger.clone();

    clone.record(Level::Info, "shared");
    assert_eq!(logger.buffered(), 1);
}
