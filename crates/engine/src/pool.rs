// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded admission of child processes.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// Tracks in-flight children and refuses admission past a fixed bound.
///
/// Admission is refusal-based, never queuing: a caller that cannot get a
/// slot hears about it immediately instead of silently waiting out its own
/// timeout budget.
#[derive(Debug, Clone)]
pub struct ProcessPool {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    max: usize,
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    /// Slot id → OS pid, once the child has spawned.
    live: HashMap<u64, Option<u32>>,
}

impl ProcessPool {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                max: max_concurrency.max(1),
                inner: Mutex::new(Inner::default()),
            }),
        }
    }

    /// Reserve a slot, or refuse if the pool is at capacity.
    pub fn try_admit(&self) -> Option<PoolSlot> {
        let mut inner = self.shared.inner.lock();
        if inner.live.len() >= self.shared.max {
            return None;
        }
        let id = inner.next_id;
        inner.next_id += 1;
        inner.live.insert(id, None);
        Some(PoolSlot { id, shared: Arc::clone(&self.shared) })
    }

    pub fn live_count(&self) -> usize {
        self.shared.inner.lock().live.len()
    }

    pub fn max_concurrency(&self) -> usize {
        self.shared.max
    }

    /// Send the graceful termination signal to every tracked child and clear
    /// the tracked set. Fire-and-forget: exit is not awaited, because this
    /// runs during process-wide shutdown.
    pub fn kill_all(&self) {
        let pids: Vec<u32> = {
            let mut inner = self.shared.inner.lock();
            let pids = inner.live.values().filter_map(|pid| *pid).collect();
            inner.live.clear();
            pids
        };
        for pid in pids {
            tracing::debug!(pid, "pool shutdown: terminating child");
            terminate_by_pid(pid);
        }
    }
}

/// Admission ticket bound to one live child.
///
/// Released exactly once: on drop, or when `kill_all` clears the tracked
/// set, whichever comes first. Double release is a no-op.
#[derive(Debug)]
pub struct PoolSlot {
    id: u64,
    shared: Arc<Shared>,
}

impl PoolSlot {
    /// Bind the spawned child's pid so `kill_all` can reach it.
    pub fn attach_pid(&self, pid: u32) {
        let mut inner = self.shared.inner.lock();
        if let Some(entry) = inner.live.get_mut(&self.id) {
            *entry = Some(pid);
        }
    }
}

impl Drop for PoolSlot {
    fn drop(&mut self) {
        // Already gone if kill_all cleared the set first.
        self.shared.inner.lock().live.remove(&self.id);
    }
}

/// Best-effort graceful termination by pid.
///
/// The executor spawns every child as a process-group leader, so the signal
/// goes to the group and reaches the whole tree.
#[cfg(unix)]
pub(crate) fn terminate_by_pid(pid: u32) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;
    if let Err(e) = kill(Pid::from_raw(-(pid as i32)), Signal::SIGTERM) {
        tracing::debug!(pid, error = %e, "SIGTERM failed");
    }
}

/// Windows has no graceful signal; `taskkill` tears the tree down.
#[cfg(not(unix))]
pub(crate) fn terminate_by_pid(pid: u32) {
    let result = std::process::Command::new("taskkill")
        .args(["/T", "/F", "/PID", &pid.to_string()])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn();
    if let Err(e) = result {
        tracing::debug!(pid, error = %e, "taskkill failed");
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
