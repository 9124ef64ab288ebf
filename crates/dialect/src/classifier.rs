// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered first-match shell-dialect detection.

use once_cell::sync::Lazy;
use regex::Regex;

use sw_core::{Backend, Command};

use crate::backend::ShellPlan;
use crate::cache::FifoCache;

// PowerShell verb-noun cmdlets (`Get-ChildItem`, `Import-Module`, ...).
// A fixed verb list keeps hyphenated prose like `Content-Type` out.
#[allow(clippy::unwrap_used)] // literal pattern
static CMDLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:Add|Clear|ConvertFrom|ConvertTo|Copy|Export|ForEach|Format|Get|Import|Invoke|Join|Measure|Move|New|Out|Read|Remove|Rename|Select|Set|Sort|Start|Stop|Test|Where|Write)-[A-Z][A-Za-z]+\b",
    )
    .unwrap()
});

// First tokens with their own argument conventions; the console shell stays
// out of their way.
const FOREIGN_TOOLS: &[&str] = &["git", "npm", "npx", "node", "docker", "python", "python3"];

/// Classifies raw command text into a [`ShellPlan`].
///
/// Classification is a pure function of the text plus an optional override:
/// no environment inspection, no I/O, no randomness. Plans are cached by
/// exact text in a bounded FIFO cache.
#[derive(Debug, Default)]
pub struct ShellClassifier {
    cache: FifoCache<ShellPlan>,
}

impl ShellClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { cache: FifoCache::new(capacity) }
    }

    /// Resolve the backend for `command`. An override wins unconditionally
    /// and bypasses the cache, which stays keyed by text alone.
    pub fn classify(&self, command: &Command, override_backend: Option<Backend>) -> ShellPlan {
        if let Some(backend) = override_backend {
            return ShellPlan::for_backend(backend);
        }
        let text = command.text();
        if let Some(plan) = self.cache.get(text) {
            return plan;
        }
        let plan = ShellPlan::for_backend(detect(text));
        self.cache.insert(text.to_string(), plan.clone());
        tracing::trace!(backend = %plan.backend, "classified command");
        plan
    }

    /// Number of cached plans, for instrumentation and tests.
    pub fn cached_plans(&self) -> usize {
        self.cache.len()
    }
}

/// Ordered detectors; first match wins.
fn detect(text: &str) -> Backend {
    if is_posix_subsystem(text) {
        return Backend::Posix;
    }
    if CMDLET.is_match(text) || text.contains("$PSVersionTable") {
        return Backend::PowerShell;
    }
    if let Some(first) = first_token(text) {
        if FOREIGN_TOOLS.contains(&first) {
            return Backend::Console;
        }
    }
    Backend::Console
}

/// Subsystem-invocation test shared with the normalizer's path-rewrite guard.
pub(crate) fn is_posix_subsystem(text: &str) -> bool {
    if text.contains("/mnt/") {
        return true;
    }
    matches!(first_token(text), Some("wsl") | Some("wsl.exe"))
}

fn first_token(text: &str) -> Option<&str> {
    text.split_whitespace().next()
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
