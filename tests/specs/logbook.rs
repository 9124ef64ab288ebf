// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rotation and durability specs for the audit log.

use sw_logbook::{Level, LogConfig, Logger};

fn backlog(path: &std::path::Path, index: usize) -> std::path::PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{index}"));
    name.into()
}

// Once the destination exceeds the configured maximum, the next flush
// produces exactly one new backlog and a fresh active file.
#[tokio::test]
async fn rotation_trigger_produces_one_backlog() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = LogConfig::new(dir.path().join("audit.log"));
    config.max_file_bytes = 128;
    config.retention = 3;
    let logger = Logger::new(config.clone());

    logger.record(Level::Info, "a".repeat(200));
    logger.flush().unwrap();
    let oversized = std::fs::metadata(&config.path).unwrap().len();
    assert!(oversized > config.max_file_bytes);

    logger.record(Level::Info, "fresh entry");
    logger.flush().unwrap();

    assert!(backlog(&config.path, 1).exists());
    assert!(!backlog(&config.path, 2).exists());
    let active = std::fs::metadata(&config.path).unwrap().len();
    assert!(active < oversized);
    let contents = std::fs::read_to_string(&config.path).unwrap();
    assert!(contents.contains("fresh entry"));
    assert_eq!(contents.lines().count(), 1);
}

// Error-level entries must reach disk without waiting for a flush.
#[tokio::test]
async fn errors_are_durable_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let config = LogConfig::new(dir.path().join("audit.log"));
    let logger = Logger::new(config.clone());

    logger.record(Level::Error, "crash imminent");
    let contents = std::fs::read_to_string(&config.path).unwrap();
    assert!(contents.contains("crash imminent"));
}

// Retention discards the oldest backlog once the chain is full.
#[tokio::test]
async fn retention_caps_the_backlog_chain() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = LogConfig::new(dir.path().join("audit.log"));
    config.max_file_bytes = 32;
    config.retention = 2;
    let logger = Logger::new(config.clone());

    for generation in 0..5 {
        logger.record(Level::Info, format!("generation {generation} padding padding"));
        logger.flush().unwrap();
    }

    assert!(backlog(&config.path, 1).exists());
    assert!(backlog(&config.path, 2).exists());
    assert!(!backlog(&config.path, 3).exists());
}
