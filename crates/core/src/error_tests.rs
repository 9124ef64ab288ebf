// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn spawn_error() -> ExecError {
    ExecError::Spawn {
        program: "missing-tool".to_string(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    }
}

#[yare::parameterized(
    validation = { ExecError::Validation { reason: "blank".into() }, ErrorCategory::Validation, "validation" },
    timeout    = { ExecError::Timeout { limit_ms: 500 }, ErrorCategory::Timeout, "timeout" },
    cancelled  = { ExecError::Cancelled, ErrorCategory::Cancelled, "cancelled" },
    exhausted  = { ExecError::ResourceExhausted { max: 4 }, ErrorCategory::ResourceExhausted, "resource-exhausted" },
    exit       = { ExecError::NonZeroExit { code: 2, signal: None }, ErrorCategory::NonZeroExit, "non-zero-exit" },
)]
fn category_and_code(err: ExecError, category: ErrorCategory, code: &str) {
    assert_eq!(err.category(), category);
    assert_eq!(err.code(), code);
}

#[test]
fn spawn_failure_wraps_os_error() {
    let err = spawn_error();
    assert_eq!(err.category(), ErrorCategory::SpawnFailure);
    assert_eq!(err.code(), "spawn-failure");
    let source = std::error::Error::source(&err);
    assert!(source.is_some());
}

#[test]
fn messages_are_human_readable() {
    assert_eq!(
        ExecError::Timeout { limit_ms: 500 }.to_string(),
        "command exceeded its 500 ms time budget"
    );
    assert_eq!(
        ExecError::ResourceExhausted { max: 8 }.to_string(),
        "process pool at capacity (8 live)"
    );
}

#[test]
fn category_serializes_kebab_case() {
    let json = serde_json::to_string(&ErrorCategory::SpawnFailure).unwrap();
    assert_eq!(json, "\"spawn-failure\"");
}
