// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The uniform outcome of one command execution.

use std::time::Duration;

use crate::error::ExecError;

/// Outcome of a single run. Exactly one variant is ever produced, at the end
/// of the run, and the value is immutable thereafter.
///
/// The success arm carries no error and no exit code by construction; a
/// successful run's exit code is 0.
#[derive(Debug)]
pub enum CommandResult {
    Success {
        stdout: String,
        stderr: String,
        duration: Duration,
        /// Wall-clock completion time, epoch milliseconds.
        finished_at_ms: u64,
    },
    Failure {
        stdout: String,
        stderr: String,
        /// -1 when the OS reported no code (signal termination, kill paths).
        exit_code: i32,
        duration: Duration,
        finished_at_ms: u64,
        error: ExecError,
    },
}

impl CommandResult {
    pub fn success(
        stdout: String,
        stderr: String,
        duration: Duration,
        finished_at_ms: u64,
    ) -> Self {
        CommandResult::Success { stdout, stderr, duration, finished_at_ms }
    }

    pub fn failure(
        error: ExecError,
        stdout: String,
        stderr: String,
        exit_code: i32,
        duration: Duration,
        finished_at_ms: u64,
    ) -> Self {
        CommandResult::Failure { stdout, stderr, exit_code, duration, finished_at_ms, error }
    }

    /// A failure detected before any process ran (validation, admission).
    pub fn rejected(error: ExecError, finished_at_ms: u64) -> Self {
        Self::failure(error, String::new(), String::new(), -1, Duration::ZERO, finished_at_ms)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Success { .. })
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CommandResult::Success { .. } => 0,
            CommandResult::Failure { exit_code, .. } => *exit_code,
        }
    }

    pub fn stdout(&self) -> &str {
        match self {
            CommandResult::Success { stdout, .. } | CommandResult::Failure { stdout, .. } => stdout,
        }
    }

    pub fn stderr(&self) -> &str {
        match self {
            CommandResult::Success { stderr, .. } | CommandResult::Failure { stderr, .. } => stderr,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            CommandResult::Success { duration, .. }
            | CommandResult::Failure { duration, .. } => *duration,
        }
    }

    pub fn finished_at_ms(&self) -> u64 {
        match self {
            CommandResult::Success { finished_at_ms, .. }
            | CommandResult::Failure { finished_at_ms, .. } => *finished_at_ms,
        }
    }

    pub fn error(&self) -> Option<&ExecError> {
        match self {
            CommandResult::Success { .. } => None,
            CommandResult::Failure { error, .. } => Some(error),
        }
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
