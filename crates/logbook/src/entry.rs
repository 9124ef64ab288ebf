// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured log entries and their flat-line rendering.

use sw_core::{format_epoch_ms, now_epoch_ms};

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Fixed-width token so log columns line up.
    pub fn token(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO ",
            Level::Warn => "WARN ",
            Level::Error => "ERROR",
        }
    }
}

/// One append-only audit record.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub epoch_ms: u64,
    pub level: Level,
    pub message: String,
    pub payload: Option<serde_json::Value>,
    pub component: Option<String>,
    pub correlation: Option<String>,
}

impl LogEntry {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            epoch_ms: now_epoch_ms(),
            level,
            message: message.into(),
            payload: None,
            component: None,
            correlation: None,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_correlation(mut self, correlation: impl Into<String>) -> Self {
        self.correlation = Some(correlation.into());
        self
    }

    /// Render to one flat line:
    /// `<iso-ts> <LEVEL> [component] (correlation) message | payload`
    pub fn render(&self) -> String {
        let mut line = String::with_capacity(self.estimated_bytes());
        line.push_str(&format_epoch_ms(self.epoch_ms));
        line.push(' ');
        line.push_str(self.level.token());
        if let Some(component) = &self.component {
            line.push_str(" [");
            line.push_str(component);
            line.push(']');
        }
        if let Some(correlation) = &self.correlation {
            line.push_str(" (");
            line.push_str(correlation);
            line.push(')');
        }
        line.push(' ');
        line.push_str(&self.message);
        if let Some(payload) = &self.payload {
            line.push_str(" | ");
            line.push_str(&payload.to_string());
        }
        line
    }

    /// Rough rendered size, used for the flush threshold.
    pub fn estimated_bytes(&self) -> usize {
        40 + self.message.len()
            + self.component.as_ref().map_or(0, |c| c.len() + 3)
            + self.correlation.as_ref().map_or(0, |c| c.len() + 3)
            + self.payload.as_ref().map_or(0, |p| p.to_string().len() + 3)
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
