// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolved invocation templates for each shell backend.

use serde::Serialize;

use sw_core::Backend;

/// How the command text is handed to the shell executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArgMode {
    /// The whole command text becomes one trailing argument
    /// (`sh -c <text>`, `powershell -NoProfile -Command <text>`).
    SingleArgument,
    /// The text is appended verbatim to the command line; only `cmd.exe`
    /// wants this, and only on Windows.
    Raw,
}

/// The resolved {backend, executable, argument template} for a command.
///
/// Derived deterministically from command text; safe to cache by text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellPlan {
    pub backend: Backend,
    pub program: String,
    pub prefix_args: Vec<String>,
    pub arg_mode: ArgMode,
}

impl ShellPlan {
    /// Invocation template for a backend on the compile target.
    ///
    /// Off Windows, the console and subsystem backends both resolve to the
    /// POSIX shell and PowerShell resolves to `pwsh`, so classification and
    /// execution behave the same on every host.
    pub fn for_backend(backend: Backend) -> Self {
        match backend {
            Backend::Console => {
                if cfg!(windows) {
                    Self {
                        backend,
                        program: "cmd.exe".to_string(),
                        prefix_args: vec!["/d".into(), "/s".into(), "/c".into()],
                        arg_mode: ArgMode::Raw,
                    }
                } else {
                    Self {
                        backend,
                        program: "/bin/sh".to_string(),
                        prefix_args: vec!["-c".into()],
                        arg_mode: ArgMode::SingleArgument,
                    }
                }
            }
            Backend::PowerShell => {
                let program = if cfg!(windows) { "powershell.exe" } else { "pwsh" };
                Self {
                    backend,
                    program: program.to_string(),
                    prefix_args: vec!["-NoProfile".into(), "-Command".into()],
                    arg_mode: ArgMode::SingleArgument,
                }
            }
            Backend::Posix => {
                if cfg!(windows) {
                    Self {
                        backend,
                        program: "wsl.exe".to_string(),
                        prefix_args: Vec::new(),
                        arg_mode: ArgMode::Raw,
                    }
                } else {
                    Self {
                        backend,
                        program: "/bin/sh".to_string(),
                        prefix_args: vec!["-c".into()],
                        arg_mode: ArgMode::SingleArgument,
                    }
                }
            }
        }
    }

    /// The trailing text handed to the shell.
    ///
    /// For the subsystem backend the launcher token is stripped so the
    /// remainder reaches the subsystem's own shell verbatim; every other
    /// backend receives the full text.
    pub fn payload(&self, text: &str) -> String {
        if self.backend == Backend::Posix {
            let trimmed = text.trim_start();
            for launcher in ["wsl.exe", "wsl"] {
                if let Some(rest) = trimmed.strip_prefix(launcher) {
                    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                        return rest.trim_start().to_string();
                    }
                }
            }
        }
        text.to_string()
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
