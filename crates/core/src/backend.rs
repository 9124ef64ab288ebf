// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell backend kinds the engine can target.

use serde::{Deserialize, Serialize};

/// One of the concrete shell families a command can be routed to.
///
/// The kind is a pure label; resolving it to an executable and argument
/// template is the dialect crate's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// The platform's native console shell (`cmd.exe`, `/bin/sh`).
    Console,
    /// A PowerShell-family shell (`powershell.exe`, `pwsh`).
    PowerShell,
    /// A POSIX subsystem shell reached through a launcher (`wsl.exe`).
    Posix,
}

impl Backend {
    /// Stable token used in audit payloads and wire records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Console => "console",
            Backend::PowerShell => "powershell",
            Backend::Posix => "posix",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
