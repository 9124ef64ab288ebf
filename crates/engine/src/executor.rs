// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-command execution lifecycle.

use std::process::Stdio;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use sw_core::{
    Clock, Command, CommandResult, ExecError, ExecutionOptions, PerformanceMetrics, SystemClock,
    DEFAULT_TIMEOUT,
};
use sw_dialect::{ArgMode, CommandNormalizer, ShellClassifier, ShellPlan};
use sw_logbook::{Level, LogEntry, Logger};

use crate::pool::ProcessPool;

/// Tunables shared by every run through one executor.
#[derive(Debug, Clone)]
pub struct ExecutorSettings {
    /// Applied when the caller's options carry no timeout.
    pub default_timeout: Duration,
    /// Window between the graceful and forceful termination signals.
    pub grace_period: Duration,
    /// Capacity of the classifier and normalizer caches.
    pub cache_capacity: usize,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            grace_period: Duration::from_millis(5_000),
            cache_capacity: sw_dialect::cache::DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Orchestrates one command's lifecycle:
/// normalize → classify → admit → spawn → capture → timeout/cancel → result.
///
/// Never fails outright for well-formed input; every operational fault is
/// folded into the returned [`CommandResult`].
pub struct Executor<C: Clock = SystemClock> {
    classifier: ShellClassifier,
    normalizer: CommandNormalizer,
    pool: ProcessPool,
    logger: Logger,
    metrics: Mutex<PerformanceMetrics>,
    settings: ExecutorSettings,
    clock: C,
}

enum WaitOutcome {
    Exited(std::io::Result<std::process::ExitStatus>),
    TimedOut,
    Cancelled,
}

impl Executor {
    pub fn new(pool: ProcessPool, logger: Logger) -> Self {
        Self::with_settings(pool, logger, ExecutorSettings::default())
    }

    pub fn with_settings(pool: ProcessPool, logger: Logger, settings: ExecutorSettings) -> Self {
        Self::with_clock(pool, logger, settings, SystemClock)
    }
}

impl<C: Clock> Executor<C> {
    pub fn with_clock(
        pool: ProcessPool,
        logger: Logger,
        settings: ExecutorSettings,
        clock: C,
    ) -> Self {
        Self {
            classifier: ShellClassifier::with_capacity(settings.cache_capacity),
            normalizer: CommandNormalizer::with_capacity(settings.cache_capacity),
            pool,
            logger,
            metrics: Mutex::new(PerformanceMetrics::default()),
            settings,
            clock,
        }
    }

    pub fn pool(&self) -> &ProcessPool {
        &self.pool
    }

    /// Snapshot of the run counters.
    pub fn metrics(&self) -> PerformanceMetrics {
        self.metrics.lock().clone()
    }

    pub fn reset_metrics(&self) {
        self.metrics.lock().reset();
    }

    /// Run one command to completion.
    pub async fn run(&self, raw: &str, options: &ExecutionOptions) -> CommandResult {
        self.run_with_cancel(raw, options, &CancellationToken::new()).await
    }

    /// Run one command, honoring a caller-supplied cancellation token.
    ///
    /// Cancellation follows the same grace-kill path as a timeout; only the
    /// error tag differs.
    pub async fn run_with_cancel(
        &self,
        raw: &str,
        options: &ExecutionOptions,
        cancel: &CancellationToken,
    ) -> CommandResult {
        let started = self.clock.now();
        let correlation = uuid::Uuid::new_v4().to_string();

        // Validation faults are results, not errors.
        let command = match Command::new(raw)
            .and_then(|validated| Command::new(self.normalizer.normalize(validated.text())))
        {
            Ok(command) => command,
            Err(error) => {
                let result = CommandResult::rejected(error, self.clock.epoch_ms());
                return self.finish(raw, None, options, result, &correlation);
            }
        };

        if let Some(label) = sw_dialect::blocked_construct(command.text()) {
            let error =
                ExecError::Validation { reason: format!("blocked dangerous construct: {label}") };
            let result = CommandResult::rejected(error, self.clock.epoch_ms());
            return self.finish(raw, None, options, result, &correlation);
        }

        let plan = self.classifier.classify(&command, options.shell_override);

        let Some(slot) = self.pool.try_admit() else {
            let error = ExecError::ResourceExhausted { max: self.pool.max_concurrency() };
            let result = CommandResult::rejected(error, self.clock.epoch_ms());
            return self.finish(raw, Some(&plan), options, result, &correlation);
        };

        let mut child = match spawn_child(&plan, &command, options) {
            Ok(child) => child,
            Err(source) => {
                drop(slot);
                let error = ExecError::Spawn { program: plan.program.clone(), source };
                let result = CommandResult::failure(
                    error,
                    String::new(),
                    String::new(),
                    -1,
                    self.clock.now().duration_since(started),
                    self.clock.epoch_ms(),
                );
                return self.finish(raw, Some(&plan), options, result, &correlation);
            }
        };
        if let Some(pid) = child.id() {
            slot.attach_pid(pid);
        }

        let stdout_task = drain(child.stdout.take());
        let stderr_task = drain(child.stderr.take());

        let timeout = options.timeout.unwrap_or(self.settings.default_timeout);
        let outcome = tokio::select! {
            status = child.wait() => WaitOutcome::Exited(status),
            _ = tokio::time::sleep(timeout) => WaitOutcome::TimedOut,
            _ = cancel.cancelled() => WaitOutcome::Cancelled,
        };
        if matches!(outcome, WaitOutcome::TimedOut | WaitOutcome::Cancelled) {
            self.grace_kill(&mut child).await;
        }

        // Pipes are closed once the child is gone; both drains terminate.
        let stdout = options.encoding.decode(&stdout_task.await.unwrap_or_default());
        let stderr = options.encoding.decode(&stderr_task.await.unwrap_or_default());

        drop(slot);
        let duration = self.clock.now().duration_since(started);
        let finished = self.clock.epoch_ms();

        let result = match outcome {
            WaitOutcome::TimedOut => CommandResult::failure(
                ExecError::Timeout { limit_ms: timeout.as_millis() as u64 },
                stdout,
                stderr,
                -1,
                duration,
                finished,
            ),
            WaitOutcome::Cancelled => CommandResult::failure(
                ExecError::Cancelled,
                stdout,
                stderr,
                -1,
                duration,
                finished,
            ),
            WaitOutcome::Exited(Ok(status)) => {
                if status.success() {
                    CommandResult::success(stdout, stderr, duration, finished)
                } else {
                    let code = status.code().unwrap_or(-1);
                    CommandResult::failure(
                        ExecError::NonZeroExit { code, signal: exit_signal(&status) },
                        stdout,
                        stderr,
                        code,
                        duration,
                        finished,
                    )
                }
            }
            WaitOutcome::Exited(Err(source)) => CommandResult::failure(
                ExecError::Spawn { program: plan.program.clone(), source },
                stdout,
                stderr,
                -1,
                duration,
                finished,
            ),
        };
        self.finish(raw, Some(&plan), options, result, &correlation)
    }

    /// Graceful signal, grace window, then the forceful kill.
    async fn grace_kill(&self, child: &mut Child) {
        signal_child_tree(child, false);
        tokio::select! {
            _ = child.wait() => {}
            _ = tokio::time::sleep(self.settings.grace_period) => {
                tracing::warn!("child survived graceful signal; forcing kill");
                signal_child_tree(child, true);
                // Also reaps the child.
                if let Err(e) = child.kill().await {
                    tracing::debug!(error = %e, "forceful kill failed");
                }
            }
        }
    }

    /// Fold the outcome into metrics and the audit log, then hand it back.
    fn finish(
        &self,
        raw: &str,
        plan: Option<&ShellPlan>,
        options: &ExecutionOptions,
        result: CommandResult,
        correlation: &str,
    ) -> CommandResult {
        self.metrics.lock().record(result.duration(), result.is_success());

        let mut payload = serde_json::json!({
            "command": truncate_for_log(raw, 200),
            "backend": plan.map(|p| p.backend.as_str()),
            "exit_code": result.exit_code(),
            "duration_ms": result.duration().as_millis() as u64,
        });
        if let Some(description) = &options.description {
            payload["description"] = description.clone().into();
        }
        let (level, message) = match result.error() {
            None => (Level::Info, "command completed"),
            Some(error) => {
                payload["category"] = error.code().into();
                (Level::Error, "command failed")
            }
        };
        self.logger.append(
            LogEntry::new(level, message)
                .with_component("executor")
                .with_correlation(correlation)
                .with_payload(payload),
        );
        result
    }
}

fn spawn_child(
    plan: &ShellPlan,
    command: &Command,
    options: &ExecutionOptions,
) -> std::io::Result<Child> {
    let mut cmd = tokio::process::Command::new(&plan.program);
    cmd.args(&plan.prefix_args);
    let payload = plan.payload(command.text());
    match plan.arg_mode {
        ArgMode::SingleArgument => {
            cmd.arg(payload);
        }
        ArgMode::Raw => {
            #[cfg(windows)]
            cmd.raw_arg(payload);
            #[cfg(not(windows))]
            cmd.arg(payload);
        }
    }
    if let Some(dir) = &options.working_dir {
        cmd.current_dir(dir);
    }
    // envs() merges over the inherited environment.
    cmd.envs(&options.env);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    // The child leads its own process group, so termination signals reach
    // the whole tree and can't strand a grandchild holding the pipes.
    #[cfg(unix)]
    cmd.process_group(0);
    cmd.spawn()
}

#[cfg(unix)]
fn signal_child_tree(child: &Child, forceful: bool) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;
    let Some(pid) = child.id() else { return };
    let signal = if forceful { Signal::SIGKILL } else { Signal::SIGTERM };
    if let Err(e) = kill(Pid::from_raw(-(pid as i32)), signal) {
        tracing::debug!(pid, ?signal, error = %e, "group signal failed");
    }
}

#[cfg(not(unix))]
fn signal_child_tree(child: &Child, _forceful: bool) {
    if let Some(pid) = child.id() {
        crate::pool::terminate_by_pid(pid);
    }
}

/// Collect a stream in chunks; one concatenation at EOF keeps high-volume
/// output linear.
fn drain<R>(stream: Option<R>) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let Some(mut stream) = stream else {
            return Vec::new();
        };
        let mut chunks: Vec<Vec<u8>> = Vec::new();
        loop {
            let mut chunk = vec![0u8; 8192];
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    chunk.truncate(n);
                    chunks.push(chunk);
                }
            }
        }
        let total = chunks.iter().map(Vec::len).sum();
        let mut bytes = Vec::with_capacity(total);
        for chunk in &chunks {
            bytes.extend_from_slice(chunk);
        }
        bytes
    })
}

#[cfg(unix)]
fn exit_signal(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &std::process::ExitStatus) -> Option<i32> {
    None
}

/// UTF-8-safe prefix for audit payloads.
fn truncate_for_log(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
#[path = "executor_tests/mod.rs"]
mod tests;
