// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classification and normalization specs.

use sw_core::{Backend, Command};
use sw_dialect::{CommandNormalizer, ShellClassifier};

fn backend_of(text: &str) -> Backend {
    let classifier = ShellClassifier::new();
    classifier
        .classify(&Command::new(text).unwrap(), None)
        .backend
}

#[test]
fn cmdlet_commands_route_to_powershell_with_noprofile() {
    let classifier = ShellClassifier::new();
    let plan = classifier.classify(&Command::new("Get-Process").unwrap(), None);
    assert_eq!(plan.backend, Backend::PowerShell);
    assert_eq!(
        plan.prefix_args,
        vec!["-NoProfile".to_string(), "-Command".to_string()]
    );
}

#[test]
fn detector_priority_is_stable() {
    assert_eq!(backend_of("wsl Get-Process"), Backend::Posix);
    assert_eq!(backend_of("Get-Process"), Backend::PowerShell);
    // Cmdlet indicators outrank the foreign-tool prefix list; ties break by
    // detector order, not specificity.
    assert_eq!(backend_of("git Get-Log"), Backend::PowerShell);
    assert_eq!(backend_of("git status"), Backend::Console);
    assert_eq!(backend_of("plain command"), Backend::Console);
}

#[test]
fn classification_has_no_observable_side_effects() {
    let classifier = ShellClassifier::new();
    let command = Command::new("docker compose up -d").unwrap();
    let plans: Vec<_> = (0..5).map(|_| classifier.classify(&command, None)).collect();
    assert!(plans.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(classifier.cached_plans(), 1);
}

#[test]
fn normalization_covers_the_mixed_idiom_example() {
    let normalizer = CommandNormalizer::new();
    assert_eq!(
        normalizer.normalize("echo hello && echo world"),
        "echo hello ; echo world"
    );
}

#[test]
fn normalization_is_idempotent_over_a_corpus() {
    let normalizer = CommandNormalizer::new();
    let corpus = [
        "echo hello && echo world",
        "cat /c/Users/dev/notes.txt",
        "pwsh Get-ChildItem /d/src",
        "wsl ls -la /mnt/c/Users",
        "server --daemon &",
        "git commit -m 'a && b'",
    ];
    for text in corpus {
        let once = normalizer.normalize(text);
        assert_eq!(normalizer.normalize(&once), once, "input: {text}");
    }
}
