// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timeout and cancellation behavior.

use super::*;

fn timed_executor() -> (Executor, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let logger = Logger::new(LogConfig::new(dir.path().join("audit.log")));
    let executor =
        Executor::with_settings(ProcessPool::new(2), logger, fast_kill_settings());
    (executor, dir)
}

#[tokio::test]
async fn timeout_fires_no_earlier_than_the_budget() {
    let (executor, _dir) = timed_executor();
    let options = ExecutionOptions::default().timeout(Duration::from_millis(300));
    let started = std::time::Instant::now();
    let result = executor.run("sleep 30", &options).await;
    let elapsed = started.elapsed();

    assert_eq!(category(&result), ErrorCategory::Timeout);
    assert!(elapsed >= Duration::from_millis(300));
    // Budget + grace window + scheduling slack.
    assert!(elapsed < Duration::from_secs(5), "took {elapsed:?}");
    assert!(result.duration() >= Duration::from_millis(300));
    assert_eq!(result.exit_code(), -1);
}

#[tokio::test]
async fn timeout_preserves_output_produced_before_the_kill() {
    let (executor, _dir) = timed_executor();
    let options = ExecutionOptions::default().timeout(Duration::from_millis(300));
    let result = executor.run("echo early; sleep 30", &options).await;
    assert_eq!(category(&result), ErrorCategory::Timeout);
    assert!(result.stdout().contains("early"));
}

#[tokio::test]
async fn timeout_releases_the_slot() {
    let (executor, _dir) = timed_executor();
    let options = ExecutionOptions::default().timeout(Duration::from_millis(200));
    executor.run("sleep 30", &options).await;
    assert_eq!(executor.pool().live_count(), 0);
}

#[tokio::test]
async fn default_timeout_applies_when_unset() {
    let (executor, _dir) = timed_executor();
    // A fast command completes well inside the default budget.
    let result = executor.run("echo quick", &ExecutionOptions::default()).await;
    assert!(result.is_success());
    assert!(result.duration() < Duration::from_secs(30));
}

#[tokio::test]
async fn cancellation_tags_the_error_cancelled() {
    let (executor, _dir) = timed_executor();
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            cancel.cancel();
        });
    }
    let started = std::time::Instant::now();
    let result = executor
        .run_with_cancel("sleep 30", &ExecutionOptions::default(), &cancel)
        .await;

    assert_eq!(category(&result), ErrorCategory::Cancelled);
    assert!(started.elapsed() >= Duration::from_millis(150));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(executor.pool().live_count(), 0);
}

#[tokio::test]
async fn unrelated_token_does_not_disturb_the_run() {
    let (executor, _dir) = timed_executor();
    let cancel = CancellationToken::new();
    let result = executor
        .run_with_cancel("echo steady", &ExecutionOptions::default(), &cancel)
        .await;
    assert!(result.is_success());
}
