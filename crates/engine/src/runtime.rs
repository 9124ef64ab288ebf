// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wired-up engine with an explicit shutdown lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use sw_core::{CommandResult, ExecutionOptions, PerformanceMetrics};
use sw_logbook::Logger;

use crate::batch::BatchRunner;
use crate::config::EngineConfig;
use crate::executor::Executor;
use crate::pool::ProcessPool;

/// Explicitly constructed engine facade.
///
/// Owns the logger, pool, executor and batch runner, wired together by
/// injection, with no global state. The hosting application calls [`shutdown`]
/// from its own top-level signal handler; kill-all and log disposal run
/// exactly once no matter how often it is invoked.
///
/// [`shutdown`]: Runtime::shutdown
pub struct Runtime {
    executor: Arc<Executor>,
    batch: BatchRunner,
    pool: ProcessPool,
    logger: Logger,
    shutdown_done: AtomicBool,
}

impl Runtime {
    /// Build a runtime from configuration.
    ///
    /// Must be called within a Tokio runtime (the logger starts its flush
    /// timer here).
    pub fn new(config: EngineConfig) -> Self {
        let logger = Logger::new(config.log_config());
        let pool = ProcessPool::new(config.max_concurrency);
        let executor = Arc::new(Executor::with_settings(
            pool.clone(),
            logger.clone(),
            config.executor_settings(),
        ));
        let batch = BatchRunner::new(Arc::clone(&executor));
        Self { executor, batch, pool, logger, shutdown_done: AtomicBool::new(false) }
    }

    pub async fn run(&self, raw: &str, options: &ExecutionOptions) -> CommandResult {
        self.executor.run(raw, options).await
    }

    pub async fn run_with_cancel(
        &self,
        raw: &str,
        options: &ExecutionOptions,
        cancel: &CancellationToken,
    ) -> CommandResult {
        self.executor.run_with_cancel(raw, options, cancel).await
    }

    pub async fn run_batch(
        &self,
        commands: &[String],
        options: &ExecutionOptions,
    ) -> Vec<CommandResult> {
        self.batch.run_batch(commands, options).await
    }

    pub fn executor(&self) -> &Arc<Executor> {
        &self.executor
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn pool(&self) -> &ProcessPool {
        &self.pool
    }

    pub fn metrics(&self) -> PerformanceMetrics {
        self.executor.metrics()
    }

    /// Kill every tracked child and dispose the logger, exactly once.
    pub fn shutdown(&self) {
        if self.shutdown_done.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!("engine shutting down");
        self.pool.kill_all();
        self.logger.dispose();
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
