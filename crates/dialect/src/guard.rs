// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pattern-based rejection of a few known-destructive constructs.
//!
//! This is not a sandbox. It catches a handful of catastrophic commands
//! before they reach a shell; anything subtler is the caller's problem.

use once_cell::sync::Lazy;
use regex::Regex;

// `rm` with a recursive flag aimed at the filesystem root itself.
#[allow(clippy::unwrap_used)] // literal pattern
static ROOT_DELETE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\brm\s+-[a-z]*r[a-z]*\s+(?:-[a-z]+\s+)*/+(?:\s|$)").unwrap()
});

// `mkfs` and friends re-format a block device.
#[allow(clippy::unwrap_used)] // literal pattern
static MAKE_FILESYSTEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bmkfs(?:\.\w+)?\s").unwrap());

// `format X:` wipes a Windows drive.
#[allow(clippy::unwrap_used)] // literal pattern
static FORMAT_DRIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bformat\s+[a-z]:(?:\s|$)").unwrap());

const FORK_BOMBS: &[&str] = &[":(){ :|:& };:", ":(){:|:&};:"];

/// Returns a label describing the blocked construct, if any.
pub fn blocked_construct(text: &str) -> Option<&'static str> {
    if ROOT_DELETE.is_match(text) {
        return Some("recursive delete of the filesystem root");
    }
    if MAKE_FILESYSTEM.is_match(text) {
        return Some("block-device format");
    }
    if FORMAT_DRIVE.is_match(text) {
        return Some("drive format");
    }
    if FORK_BOMBS.iter().any(|bomb| text.contains(bomb)) {
        return Some("fork bomb");
    }
    None
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
