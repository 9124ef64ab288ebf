// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run execution options.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::backend::Backend;

/// Applied when [`ExecutionOptions::timeout`] is unset.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(120_000);

/// How captured output bytes are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputEncoding {
    /// Lossy UTF-8; invalid sequences become U+FFFD.
    #[default]
    Utf8,
    /// One byte per char; matches legacy Windows console output.
    Latin1,
}

impl OutputEncoding {
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            OutputEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            OutputEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

/// Options for a single `Executor::run` call.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Time budget; the engine default applies when unset.
    pub timeout: Option<Duration>,
    /// Working directory for the child; inherited when unset.
    pub working_dir: Option<PathBuf>,
    /// Extra environment, merged over the ambient environment.
    pub env: HashMap<String, String>,
    /// Human-readable description, echoed into the audit log.
    pub description: Option<String>,
    /// Forces the backend, bypassing classification.
    pub shell_override: Option<Backend>,
    pub encoding: OutputEncoding,
}

impl ExecutionOptions {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn shell_override(mut self, backend: Backend) -> Self {
        self.shell_override = Some(backend);
        self
    }

    pub fn encoding(mut self, encoding: OutputEncoding) -> Self {
        self.encoding = encoding;
        self
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
