// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executor tests: happy paths, fault taxonomy, and timing behavior.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use sw_core::{Backend, ErrorCategory, ExecutionOptions};
use sw_logbook::{LogConfig, Logger};

use super::*;
use crate::pool::ProcessPool;

mod basic;
mod faults;
mod timing;

/// Executor writing its audit log into a fresh temp dir. The dir handle is
/// returned so the file outlives the test body.
fn executor(max_concurrency: usize) -> (Executor, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let logger = Logger::new(LogConfig::new(dir.path().join("audit.log")));
    (Executor::new(ProcessPool::new(max_concurrency), logger), dir)
}

fn fast_kill_settings() -> ExecutorSettings {
    ExecutorSettings { grace_period: Duration::from_millis(500), ..Default::default() }
}

fn category(result: &sw_core::CommandResult) -> ErrorCategory {
    result.error().expect("expected a failure").category()
}

/// Runs an async test body on a fresh current-thread runtime, for use inside
/// parameterized (non-async) test functions.
fn run_async<F: std::future::Future<Output = ()>>(future: F) {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future);
}
