// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Happy-path execution: output capture, normalization, options, metrics.

use super::*;

#[tokio::test]
async fn echo_succeeds_with_captured_stdout() {
    let (executor, _dir) = executor(2);
    let result = executor.run("echo hello", &ExecutionOptions::default()).await;
    assert!(result.is_success(), "unexpected failure: {:?}", result.error());
    assert_eq!(result.exit_code(), 0);
    assert!(result.stdout().contains("hello"));
    assert!(result.stderr().is_empty());
    assert!(result.finished_at_ms() > 0);
}

#[tokio::test]
async fn sequential_and_runs_both_commands() {
    // ` && ` is normalized to the sequential operator before spawning.
    let (executor, _dir) = executor(2);
    let result = executor
        .run("echo hello && echo world", &ExecutionOptions::default())
        .await;
    assert!(result.is_success());
    assert!(result.stdout().contains("hello"));
    assert!(result.stdout().contains("world"));
}

#[tokio::test]
async fn stderr_is_captured_separately() {
    let (executor, _dir) = executor(2);
    let result = executor
        .run("echo visible; echo hidden >&2", &ExecutionOptions::default())
        .await;
    assert!(result.is_success());
    assert!(result.stdout().contains("visible"));
    assert!(!result.stdout().contains("hidden"));
    assert!(result.stderr().contains("hidden"));
}

#[tokio::test]
async fn working_directory_is_honored() {
    let (executor, _dir) = executor(2);
    let cwd = tempfile::tempdir().unwrap();
    let canonical = cwd.path().canonicalize().unwrap();
    let options = ExecutionOptions::default().working_dir(&canonical);
    let result = executor.run("pwd", &options).await;
    assert!(result.is_success());
    assert!(result.stdout().contains(canonical.to_str().unwrap()));
}

#[tokio::test]
async fn extra_environment_merges_over_ambient() {
    let (executor, _dir) = executor(2);
    let options = ExecutionOptions::default().env("SW_ENV_MARKER", "present");
    let result = executor.run("echo $SW_ENV_MARKER", &options).await;
    assert!(result.is_success());
    assert!(result.stdout().contains("present"));
    // Ambient variables still come through.
    let result = executor.run("echo $PATH", &options).await;
    assert!(!result.stdout().trim().is_empty());
}

#[tokio::test]
async fn shell_override_forces_the_backend() {
    let (executor, _dir) = executor(2);
    // Classification alone would route the cmdlet token to PowerShell;
    // the override pins it to the console shell.
    let options = ExecutionOptions::default().shell_override(Backend::Console);
    let result = executor.run("echo Get-Date", &options).await;
    assert!(result.is_success());
    assert!(result.stdout().contains("Get-Date"));
}

#[tokio::test]
async fn large_output_is_captured_completely() {
    let (executor, _dir) = executor(2);
    let result = executor
        .run("seq 1 20000", &ExecutionOptions::default())
        .await;
    assert!(result.is_success());
    assert!(result.stdout().contains("\n19999\n"));
    assert!(result.stdout().ends_with("20000\n"));
}

#[tokio::test]
async fn metrics_track_outcomes() {
    let (executor, _dir) = executor(2);
    executor.run("echo one", &ExecutionOptions::default()).await;
    executor.run("exit 7", &ExecutionOptions::default()).await;
    let metrics = executor.metrics();
    assert_eq!(metrics.commands_executed, 2);
    assert_eq!(metrics.succeeded, 1);
    assert_eq!(metrics.success_rate(), 0.5);

    executor.reset_metrics();
    assert_eq!(executor.metrics().commands_executed, 0);
}

#[tokio::test]
async fn timestamps_come_from_the_injected_clock() {
    let dir = tempfile::tempdir().unwrap();
    let logger = Logger::new(LogConfig::new(dir.path().join("audit.log")));
    let clock = sw_core::FakeClock::new();
    clock.set_epoch_ms(1_754_000_000_000);
    let executor = Executor::with_clock(
        ProcessPool::new(2),
        logger,
        ExecutorSettings::default(),
        clock.clone(),
    );

    let result = executor.run("echo clocked", &ExecutionOptions::default()).await;
    assert!(result.is_success());
    assert_eq!(result.finished_at_ms(), 1_754_000_000_000);
    // The fake clock never advanced, so the measured duration is zero.
    assert_eq!(result.duration(), Duration::ZERO);
}

#[tokio::test]
async fn every_run_is_audited() {
    let dir = tempfile::tempdir().unwrap();
    let logger = Logger::new(LogConfig::new(dir.path().join("audit.log")));
    let executor = Executor::new(ProcessPool::new(2), logger.clone());

    let options = ExecutionOptions::default().description("smoke check");
    executor.run("echo audited", &options).await;
    executor.run("", &ExecutionOptions::default()).await;
    logger.flush().unwrap();

    let contents = std::fs::read_to_string(dir.path().join("audit.log")).unwrap();
    assert!(contents.contains("command completed"));
    assert!(contents.contains("command failed"));
    assert!(contents.contains("[executor]"));
    assert!(contents.contains("\"description\":\"smoke check\""));
    assert!(contents.contains("\"category\":\"validation\""));
}
