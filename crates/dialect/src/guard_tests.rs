// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    rm_rf_root     = { "rm -rf /" },
    rm_r_root      = { "rm -r /" },
    rm_rf_slashes  = { "rm -rf //" },
    rm_with_force  = { "sudo rm -rf / --no-preserve-root" },
    mkfs           = { "mkfs /dev/sda1" },
    mkfs_ext4      = { "mkfs.ext4 /dev/sda1" },
    format_c       = { "format c:" },
    fork_bomb      = { ":(){ :|:& };:" },
    fork_bomb_tight = { ":(){:|:&};:" },
)]
fn destructive_commands_are_blocked(text: &str) {
    assert!(blocked_construct(text).is_some(), "not blocked: {text}");
}

#[yare::parameterized(
    rm_subdir     = { "rm -rf /tmp/build" },
    rm_plain      = { "rm notes.txt" },
    rm_home       = { "rm -r ./target" },
    format_string = { "echo format anchor" },
    mkfs_in_word  = { "echo remkfsish" },
    ordinary      = { "git status" },
)]
fn ordinary_commands_pass(text: &str) {
    assert_eq!(blocked_construct(text), None, "wrongly blocked: {text}");
}
