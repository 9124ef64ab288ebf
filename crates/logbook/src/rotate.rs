// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Size-triggered rotation into numbered backlog files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Backlog path for `index` >= 1 (`app.log.1` is the newest backlog).
pub fn backlog_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

/// Rotate `path` into the backlog chain if it has outgrown `max_bytes`.
///
/// The oldest backlog beyond `retention` is discarded, the rest shift up by
/// one, and the active file becomes `.1`. Returns whether a rotation
/// happened. A missing active file is not an error.
pub fn rotate_if_needed(path: &Path, max_bytes: u64, retention: usize) -> io::Result<bool> {
    let size = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if size <= max_bytes {
        return Ok(false);
    }

    if retention == 0 {
        fs::remove_file(path)?;
        return Ok(true);
    }

    let oldest = backlog_path(path, retention);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for index in (1..retention).rev() {
        let from = backlog_path(path, index);
        if from.exists() {
            fs::rename(&from, backlog_path(path, index + 1))?;
        }
    }
    fs::rename(path, backlog_path(path, 1))?;
    Ok(true)
}

#[cfg(test)]
#[path = "rotate_tests.rs"]
mod tests;
