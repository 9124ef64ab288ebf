// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fault taxonomy: validation, spawn failure, pool exhaustion, non-zero exit.

use super::*;

#[yare::parameterized(
    empty = { "" },
    blank = { "   " },
    nul   = { "echo a\0b" },
)]
fn malformed_input_is_a_validation_failure(raw: &str) {
    run_async(async {
        let (executor, _dir) = executor(2);
        let result = executor.run(raw, &ExecutionOptions::default()).await;
        assert_eq!(category(&result), ErrorCategory::Validation);
        assert_eq!(result.duration(), Duration::ZERO);
        assert_eq!(result.exit_code(), -1);
    });
}

#[tokio::test]
async fn destructive_constructs_are_rejected_before_spawning() {
    let (executor, _dir) = executor(2);
    let result = executor.run("rm -rf /", &ExecutionOptions::default()).await;
    assert_eq!(category(&result), ErrorCategory::Validation);
    // Nothing was spawned and nothing lingers in the pool.
    assert_eq!(executor.pool().live_count(), 0);
    assert!(result.stdout().is_empty());
}

#[tokio::test]
async fn nonexistent_working_dir_is_a_spawn_failure() {
    let (executor, _dir) = executor(2);
    let options = ExecutionOptions::default().working_dir("/definitely/not/a/real/dir");
    let result = executor.run("echo hi", &options).await;
    assert_eq!(category(&result), ErrorCategory::SpawnFailure);
    assert_eq!(result.exit_code(), -1);
}

#[tokio::test]
async fn spawn_failure_releases_the_slot() {
    let (executor, _dir) = executor(1);
    let options = ExecutionOptions::default().working_dir("/definitely/not/a/real/dir");
    executor.run("echo hi", &options).await;
    assert_eq!(executor.pool().live_count(), 0);
    let result = executor.run("echo ok", &ExecutionOptions::default()).await;
    assert!(result.is_success());
}

#[tokio::test]
async fn non_zero_exit_keeps_output_and_code() {
    let (executor, _dir) = executor(2);
    let result = executor
        .run("echo before; exit 3", &ExecutionOptions::default())
        .await;
    assert_eq!(category(&result), ErrorCategory::NonZeroExit);
    assert_eq!(result.exit_code(), 3);
    assert!(result.stdout().contains("before"));
}

#[tokio::test]
async fn saturated_pool_refuses_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let logger = Logger::new(LogConfig::new(dir.path().join("audit.log")));
    let executor = Arc::new(Executor::with_settings(
        ProcessPool::new(1),
        logger,
        fast_kill_settings(),
    ));

    let cancel = CancellationToken::new();
    let long_run = {
        let executor = Arc::clone(&executor);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            executor
                .run_with_cancel("sleep 30", &ExecutionOptions::default(), &cancel)
                .await
        })
    };

    // Let the long run occupy the only slot.
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while executor.pool().live_count() == 0 {
        assert!(std::time::Instant::now() < deadline, "child never became live");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let started = std::time::Instant::now();
    let refused = executor.run("echo surplus", &ExecutionOptions::default()).await;
    assert_eq!(category(&refused), ErrorCategory::ResourceExhausted);
    // Refusal is immediate, not queued behind the running command.
    assert!(started.elapsed() < Duration::from_secs(2));

    cancel.cancel();
    let cancelled = long_run.await.unwrap();
    assert_eq!(category(&cancelled), ErrorCategory::Cancelled);
    assert_eq!(executor.pool().live_count(), 0);
}

#[tokio::test]
async fn slot_is_freed_after_completion() {
    let (executor, _dir) = executor(1);
    for i in 0..3 {
        let result = executor
            .run(&format!("echo round {i}"), &ExecutionOptions::default())
            .await;
        assert!(result.is_success());
    }
    assert_eq!(executor.pool().live_count(), 0);
}
