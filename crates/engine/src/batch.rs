// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wave-partitioned batch execution.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use sw_core::{now_epoch_ms, Clock, CommandResult, ExecError, ExecutionOptions, SystemClock};

use crate::executor::Executor;

/// Runs many commands through one executor with bounded fan-out.
///
/// Commands are grouped into waves sized at the pool's maximum concurrency;
/// each wave is awaited fully before the next starts. The result vector
/// always matches the input in length and order, and one command's failure
/// never disturbs its neighbors.
#[derive(Clone)]
pub struct BatchRunner<C: Clock = SystemClock> {
    executor: Arc<Executor<C>>,
}

impl<C: Clock + 'static> BatchRunner<C> {
    pub fn new(executor: Arc<Executor<C>>) -> Self {
        Self { executor }
    }

    pub async fn run_batch(
        &self,
        commands: &[String],
        options: &ExecutionOptions,
    ) -> Vec<CommandResult> {
        self.run_batch_with_cancel(commands, options, &CancellationToken::new()).await
    }

    /// Cancellation-aware variant; the token reaches every member.
    pub async fn run_batch_with_cancel(
        &self,
        commands: &[String],
        options: &ExecutionOptions,
        cancel: &CancellationToken,
    ) -> Vec<CommandResult> {
        let wave_size = self.executor.pool().max_concurrency();
        let mut results = Vec::with_capacity(commands.len());

        for wave in commands.chunks(wave_size) {
            let handles: Vec<_> = wave
                .iter()
                .map(|raw| {
                    let executor = Arc::clone(&self.executor);
                    let raw = raw.clone();
                    let options = options.clone();
                    let cancel = cancel.clone();
                    tokio::spawn(async move {
                        executor.run_with_cancel(&raw, &options, &cancel).await
                    })
                })
                .collect();

            for handle in handles {
                results.push(handle.await.unwrap_or_else(|join_error| {
                    // A panicked member still fills its slot.
                    tracing::error!(error = %join_error, "batch member task failed");
                    CommandResult::rejected(
                        ExecError::Spawn {
                            program: String::new(),
                            source: std::io::Error::other(join_error),
                        },
                        now_epoch_ms(),
                    )
                }));
            }
        }
        results
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
