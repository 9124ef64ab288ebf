// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Buffered append-only logger with periodic and forced flushing.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::entry::{Level, LogEntry};
use crate::rotate;

/// Destination and batching policy for a [`Logger`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub path: PathBuf,
    /// Buffered-byte estimate that forces a flush.
    pub flush_threshold_bytes: usize,
    /// Cadence of the background flush timer.
    pub flush_interval: Duration,
    /// Active-file size that triggers rotation before the next flush.
    pub max_file_bytes: u64,
    /// Number of numbered backlog files kept.
    pub retention: usize,
}

impl LogConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            flush_threshold_bytes: 64 * 1024,
            flush_interval: Duration::from_secs(5),
            max_file_bytes: 10 * 1024 * 1024,
            retention: 5,
        }
    }
}

/// Structured event sink with an in-memory buffer.
///
/// Flushes happen when the buffered estimate crosses the threshold, when an
/// error-level entry arrives, or when the periodic timer fires with a
/// non-empty buffer. Logging failures are reported via `tracing` and never
/// propagate into the engine.
///
/// Cheap to clone; all clones share one buffer and one flush timer.
#[derive(Debug, Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    config: LogConfig,
    buffer: Mutex<Buffer>,
    /// Serializes rotation + append across concurrent flushers.
    io_lock: Mutex<()>,
    disposed: AtomicBool,
    shutdown: CancellationToken,
}

#[derive(Debug, Default)]
struct Buffer {
    entries: Vec<LogEntry>,
    bytes: usize,
}

impl Logger {
    /// Create a logger and start its periodic flush timer.
    ///
    /// Must be called within a Tokio runtime.
    pub fn new(config: LogConfig) -> Self {
        let inner = Arc::new(Inner {
            config,
            buffer: Mutex::new(Buffer::default()),
            io_lock: Mutex::new(()),
            disposed: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        });
        spawn_flusher(&inner);
        Self { inner }
    }

    pub fn config(&self) -> &LogConfig {
        &self.inner.config
    }

    /// Append a bare entry at `level`.
    pub fn record(&self, level: Level, message: impl Into<String>) {
        self.append(LogEntry::new(level, message));
    }

    /// Append a fully built entry.
    pub fn append(&self, entry: LogEntry) {
        if self.inner.disposed.load(Ordering::SeqCst) {
            tracing::debug!("log entry dropped after dispose");
            return;
        }
        let immediate = entry.level == Level::Error;
        let over_threshold = {
            let mut buffer = self.inner.buffer.lock();
            buffer.bytes += entry.estimated_bytes();
            buffer.entries.push(entry);
            buffer.bytes >= self.inner.config.flush_threshold_bytes
        };
        if immediate || over_threshold {
            if let Err(e) = self.inner.flush() {
                tracing::warn!(error = %e, "log flush failed");
            }
        }
    }

    /// Force a flush of everything buffered.
    pub fn flush(&self) -> io::Result<()> {
        self.inner.flush()
    }

    /// Cancel the timer and perform one final flush. Safe to call repeatedly.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.shutdown.cancel();
        if let Err(e) = self.inner.flush() {
            tracing::warn!(error = %e, "final log flush failed");
        }
    }

    /// Number of buffered entries, for instrumentation and tests.
    pub fn buffered(&self) -> usize {
        self.inner.buffer.lock().entries.len()
    }
}

impl Inner {
    fn flush(&self) -> io::Result<()> {
        let drained = {
            let mut buffer = self.buffer.lock();
            buffer.bytes = 0;
            std::mem::take(&mut buffer.entries)
        };
        if drained.is_empty() {
            return Ok(());
        }

        let _io = self.io_lock.lock();
        rotate::rotate_if_needed(
            &self.config.path,
            self.config.max_file_bytes,
            self.config.retention,
        )?;
        if let Some(parent) = self.config.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.path)?;
        for entry in &drained {
            writeln!(file, "{}", entry.render())?;
        }
        Ok(())
    }

    fn has_buffered(&self) -> bool {
        !self.buffer.lock().entries.is_empty()
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.shutdown.cancel();
        if !self.disposed.load(Ordering::SeqCst) {
            if let Err(e) = self.flush() {
                tracing::warn!(error = %e, "flush on drop failed");
            }
        }
    }
}

/// Background timer task. Holds only a weak handle so an abandoned logger
/// can still drop (and flush) without an explicit dispose.
fn spawn_flusher(inner: &Arc<Inner>) {
    let weak: Weak<Inner> = Arc::downgrade(inner);
    let token = inner.shutdown.clone();
    // interval() panics on a zero period.
    let period = inner.config.flush_interval.max(Duration::from_millis(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    let Some(inner) = weak.upgrade() else { break };
                    if inner.has_buffered() {
                        if let Err(e) = inner.flush() {
                            tracing::warn!(error = %e, "periodic log flush failed");
                        }
                    }
                }
            }
        }
    });
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
