// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operational fault taxonomy for command execution.
//!
//! Every variant is converted into a `Failure` result at the point of
//! detection; the engine's public surface never raises these directly.

use serde::{Deserialize, Serialize};

/// Why a command execution failed.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The raw command text failed validation (empty, blank, NUL byte).
    #[error("invalid command: {reason}")]
    Validation { reason: String },

    /// The OS could not create the process.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The command exceeded its configured or default time budget.
    #[error("command exceeded its {limit_ms} ms time budget")]
    Timeout { limit_ms: u64 },

    /// The caller cancelled the run before completion.
    #[error("command cancelled by caller")]
    Cancelled,

    /// The process pool refused admission at capacity.
    #[error("process pool at capacity ({max} live)")]
    ResourceExhausted { max: usize },

    /// The process ran to completion with a failing exit code, or was
    /// terminated by a signal (`code` is -1 when no code was reported).
    #[error("command exited with code {code}")]
    NonZeroExit { code: i32, signal: Option<i32> },
}

/// Machine-readable error category exposed on the wire.
///
/// Adapters key retry policy off this: `ResourceExhausted` is retryable,
/// `Validation` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    Validation,
    SpawnFailure,
    Timeout,
    Cancelled,
    ResourceExhausted,
    NonZeroExit,
}

impl ExecError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExecError::Validation { .. } => ErrorCategory::Validation,
            ExecError::Spawn { .. } => ErrorCategory::SpawnFailure,
            ExecError::Timeout { .. } => ErrorCategory::Timeout,
            ExecError::Cancelled => ErrorCategory::Cancelled,
            ExecError::ResourceExhausted { .. } => ErrorCategory::ResourceExhausted,
            ExecError::NonZeroExit { .. } => ErrorCategory::NonZeroExit,
        }
    }

    /// Stable kebab-case token for the wire format.
    pub fn code(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "validation",
            ErrorCategory::SpawnFailure => "spawn-failure",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Cancelled => "cancelled",
            ErrorCategory::ResourceExhausted => "resource-exhausted",
            ErrorCategory::NonZeroExit => "non-zero-exit",
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
