// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration, loaded from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use sw_logbook::LogConfig;

use crate::executor::ExecutorSettings;

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum concurrently live child processes.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Time budget applied when a run's options carry none.
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,

    /// Window between the graceful and forceful termination signals.
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,

    /// Capacity of the classification and normalization caches.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    #[serde(default)]
    pub log: LogSettings,
}

/// The `[log]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_log_path")]
    pub path: PathBuf,
    #[serde(default = "default_flush_threshold_bytes")]
    pub flush_threshold_bytes: usize,
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    #[serde(default = "default_retention")]
    pub retention: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        toml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Load `path`, falling back to defaults when it is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "config unusable; using defaults");
                Self::default()
            }
        }
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            path: self.log.path.clone(),
            flush_threshold_bytes: self.log.flush_threshold_bytes,
            flush_interval: Duration::from_millis(self.log.flush_interval_ms),
            max_file_bytes: self.log.max_file_bytes,
            retention: self.log.retention,
        }
    }

    pub fn executor_settings(&self) -> ExecutorSettings {
        ExecutorSettings {
            default_timeout: Duration::from_millis(self.default_timeout_ms),
            grace_period: Duration::from_millis(self.grace_period_ms),
            cache_capacity: self.cache_capacity,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            default_timeout_ms: default_timeout_ms(),
            grace_period_ms: default_grace_period_ms(),
            cache_capacity: default_cache_capacity(),
            log: LogSettings::default(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            path: default_log_path(),
            flush_threshold_bytes: default_flush_threshold_bytes(),
            flush_interval_ms: default_flush_interval_ms(),
            max_file_bytes: default_max_file_bytes(),
            retention: default_retention(),
        }
    }
}

fn default_max_concurrency() -> usize {
    8
}

fn default_timeout_ms() -> u64 {
    120_000
}

fn default_grace_period_ms() -> u64 {
    5_000
}

fn default_cache_capacity() -> usize {
    500
}

fn default_log_path() -> PathBuf {
    PathBuf::from("switchboard.log")
}

fn default_flush_threshold_bytes() -> usize {
    64 * 1024
}

fn default_flush_interval_ms() -> u64 {
    5_000
}

fn default_max_file_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_retention() -> usize {
    5
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
