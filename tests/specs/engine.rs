// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end execution specs for the engine surface.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use sw_core::{ErrorCategory, ExecutionOptions};
use sw_engine::{BatchRunner, EngineConfig, Executor, ExecutorSettings, ProcessPool, Runtime};
use sw_logbook::{LogConfig, Logger};

fn engine(max_concurrency: usize) -> (Arc<Executor>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let logger = Logger::new(LogConfig::new(dir.path().join("audit.log")));
    let executor = Executor::with_settings(
        ProcessPool::new(max_concurrency),
        logger,
        ExecutorSettings { grace_period: Duration::from_millis(500), ..Default::default() },
    );
    (Arc::new(executor), dir)
}

// Scenario: mixed Unix/Windows idiom runs on the console backend.
#[tokio::test]
async fn sequential_and_command_produces_both_outputs() {
    let (executor, _dir) = engine(2);
    let result = executor
        .run("echo hello && echo world", &ExecutionOptions::default())
        .await;
    assert!(result.is_success());
    assert_eq!(result.exit_code(), 0);
    assert!(result.stdout().contains("hello"));
    assert!(result.stdout().contains("world"));
}

// Scenario: a never-ending command with a 500 ms budget fails with Timeout
// inside the budget-plus-grace window, never earlier than the budget.
#[tokio::test]
async fn runaway_command_times_out_within_the_grace_window() {
    let (executor, _dir) = engine(2);
    let options = ExecutionOptions::default().timeout(Duration::from_millis(500));
    let started = Instant::now();
    let result = executor.run("sleep 600", &options).await;
    let elapsed = started.elapsed();

    let error = result.error().unwrap();
    assert_eq!(error.category(), ErrorCategory::Timeout);
    assert!(elapsed >= Duration::from_millis(500));
    assert!(elapsed <= Duration::from_millis(5_500), "took {elapsed:?}");
}

// Scenario: a batch of three with one invalid member keeps its shape.
#[tokio::test]
async fn batch_shape_survives_member_failure() {
    let (executor, _dir) = engine(2);
    let runner = BatchRunner::new(executor);
    let batch = vec!["echo a".to_string(), String::new(), "echo b".to_string()];
    let results = runner.run_batch(&batch, &ExecutionOptions::default()).await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_success());
    assert_eq!(
        results[1].error().unwrap().category(),
        ErrorCategory::Validation
    );
    assert!(results[2].is_success());
    assert!(results[0].stdout().contains('a'));
    assert!(results[2].stdout().contains('b'));
}

// Scenario: N+K concurrent commands against a pool of N. The pool never
// holds more than N live children and the surplus is refused immediately.
#[tokio::test]
async fn pool_bound_holds_under_saturation() {
    const N: usize = 2;
    const SURPLUS: usize = 5;
    let (executor, _dir) = engine(N);

    let cancel = CancellationToken::new();
    let mut long_runs = Vec::new();
    for _ in 0..N {
        let executor = Arc::clone(&executor);
        let cancel = cancel.clone();
        long_runs.push(tokio::spawn(async move {
            executor
                .run_with_cancel("sleep 600", &ExecutionOptions::default(), &cancel)
                .await
        }));
    }

    let deadline = Instant::now() + Duration::from_secs(5);
    while executor.pool().live_count() < N {
        assert!(Instant::now() < deadline, "children never became live");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(executor.pool().live_count(), N);

    for _ in 0..SURPLUS {
        let refused = executor
            .run("echo surplus", &ExecutionOptions::default())
            .await;
        assert_eq!(
            refused.error().unwrap().category(),
            ErrorCategory::ResourceExhausted
        );
        // The bound never slips while the surplus is refused.
        assert_eq!(executor.pool().live_count(), N);
    }

    cancel.cancel();
    for run in long_runs {
        let result = run.await.unwrap();
        assert_eq!(result.error().unwrap().category(), ErrorCategory::Cancelled);
    }
    assert_eq!(executor.pool().live_count(), 0);

    // Capacity is available again.
    let result = executor.run("echo free", &ExecutionOptions::default()).await;
    assert!(result.is_success());
}

// Results serialize to the flat, line-delimited JSON adapters forward
// upstream.
#[tokio::test]
async fn results_serialize_for_adapters() {
    let (executor, _dir) = engine(2);
    let result = executor.run("echo wire", &ExecutionOptions::default()).await;
    let json: serde_json::Value = serde_json::from_str(&result.to_json_line()).unwrap();
    assert_eq!(json["success"], true);
    assert!(json["stdout"].as_str().unwrap().contains("wire"));
    assert!(json["timestamp"].as_str().unwrap().contains('T'));

    let failure = executor.run("exit 9", &ExecutionOptions::default()).await;
    let json: serde_json::Value = serde_json::from_str(&failure.to_json_line()).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["exit_code"], 9);
    assert_eq!(json["error"]["category"], "non-zero-exit");
}

// The runtime facade wires config → logger → pool → executor and shuts
// down exactly once.
#[tokio::test]
async fn runtime_lifecycle_is_explicit() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = EngineConfig::default();
    config.max_concurrency = 2;
    config.log.path = dir.path().join("audit.log");
    let runtime = Runtime::new(config);

    let result = runtime
        .run("echo lifecycle", &ExecutionOptions::default())
        .await;
    assert!(result.is_success());

    runtime.shutdown();
    runtime.shutdown();
    let audit = std::fs::read_to_string(dir.path().join("audit.log")).unwrap();
    assert!(audit.contains("command completed"));
}
