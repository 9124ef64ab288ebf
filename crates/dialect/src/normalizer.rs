// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pattern-based syntax rewrites for the target backend.
//!
//! Three rewrites, applied in fixed order, each behind a cheap presence
//! check. Normalization is idempotent: feeding its own output back through
//! produces the same text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cache::FifoCache;
use crate::classifier::is_posix_subsystem;

// Unix-style absolute path with a single drive-letter segment (`/c/Users/x`).
#[allow(clippy::unwrap_used)] // literal pattern
static DRIVE_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|\s)/([A-Za-z])/(\S*)").unwrap());

const FRONTENDS: &[&str] = &["pwsh", "pwsh.exe", "powershell", "powershell.exe"];
const RUN_FLAGS: &[&str] = &["-command", "-c", "-file"];

/// Rewrites mixed Unix/Windows command syntax, memoized by input text.
#[derive(Debug, Default)]
pub struct CommandNormalizer {
    memo: FifoCache<String>,
}

impl CommandNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { memo: FifoCache::new(capacity) }
    }

    /// Normalize `raw`; repeated calls with the same text are O(1).
    pub fn normalize(&self, raw: &str) -> String {
        if let Some(hit) = self.memo.get(raw) {
            return hit;
        }
        let out = rewrite(raw);
        self.memo.insert(raw.to_string(), out.clone());
        out
    }

    /// Number of memoized inputs, for instrumentation and tests.
    pub fn memoized(&self) -> usize {
        self.memo.len()
    }
}

fn rewrite(text: &str) -> String {
    let mut out = sequential_and(text);
    if out.contains('/') && !is_posix_subsystem(&out) {
        out = drive_paths(&out);
    }
    shell_frontend(&out)
}

/// ` && ` becomes the console sequential operator ` ; `, applied to a fixed
/// point, since one replace pass can uncover an adjacent occurrence
/// (`a && && b`).
/// A bare `&` is left untouched.
fn sequential_and(text: &str) -> String {
    let mut out = text.to_string();
    while out.contains(" && ") {
        out = out.replace(" && ", " ; ");
    }
    out
}

fn drive_paths(text: &str) -> String {
    if !DRIVE_PATH.is_match(text) {
        return text.to_string();
    }
    DRIVE_PATH
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let drive = caps[2].to_ascii_uppercase();
            let rest = caps[3].replace('/', "\\");
            format!("{}{}:\\{}", &caps[1], drive, rest)
        })
        .into_owned()
}

/// A cross-platform shell front-end invoked with a payload but no
/// run-command flag is redirected to the native PowerShell executable.
fn shell_frontend(text: &str) -> String {
    let trimmed = text.trim_start();
    let Some(first) = trimmed.split_whitespace().next() else {
        return text.to_string();
    };
    if !FRONTENDS.contains(&first.to_ascii_lowercase().as_str()) {
        return text.to_string();
    }
    let rest = trimmed[first.len()..].trim_start();
    if rest.is_empty() {
        return text.to_string();
    }
    let has_run_flag = rest
        .split_whitespace()
        .any(|token| RUN_FLAGS.contains(&token.to_ascii_lowercase().as_str()));
    if has_run_flag {
        return text.to_string();
    }
    format!("powershell -NoProfile -Command {rest}")
}

#[cfg(test)]
#[path = "normalizer_tests.rs"]
mod tests;
