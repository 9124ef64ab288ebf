// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flat wire-format records handed to adapter processes.
//!
//! Adapters forward results upstream as line-delimited JSON; this module owns
//! that shape so the enum in [`crate::result`] stays free of serialization
//! concerns.

use serde::Serialize;

use crate::result::CommandResult;
use crate::time_fmt::format_epoch_ms;

/// Serializable mirror of a [`CommandResult`].
#[derive(Debug, Clone, Serialize)]
pub struct ResultRecord {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration_ms: u64,
    /// ISO-8601 UTC completion timestamp.
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorRecord>,
}

/// Machine-readable error block, present only on failures.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub code: String,
    pub category: crate::error::ErrorCategory,
    pub message: String,
}

impl ResultRecord {
    pub fn from_result(result: &CommandResult) -> Self {
        Self {
            success: result.is_success(),
            stdout: result.stdout().to_string(),
            stderr: result.stderr().to_string(),
            exit_code: result.exit_code(),
            duration_ms: result.duration().as_millis() as u64,
            timestamp: format_epoch_ms(result.finished_at_ms()),
            error: result.error().map(|e| ErrorRecord {
                code: e.code().to_string(),
                category: e.category(),
                message: e.to_string(),
            }),
        }
    }
}

impl CommandResult {
    pub fn to_record(&self) -> ResultRecord {
        ResultRecord::from_result(self)
    }

    /// One line of the adapter-facing stream format.
    ///
    /// Serialization of this shape cannot fail; an empty string would only
    /// appear if serde_json itself broke on plain structs.
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(&self.to_record()).unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
