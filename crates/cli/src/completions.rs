// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell completion generation for the ebx CLI.
//!
//! ```bash
//! # Bash
//! ebx completions bash > ~/.local/share/bash-completion/completions/ebx
//!
//! # Zsh
//! ebx completions zsh > ~/.zfunc/_ebx
//!
//! # Fish
//! ebx completions fish > ~/.config/fish/completions/ebx.fish
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

/// Generate shell completions and write to stdout.
pub fn generate_completions<C: CommandFactory>(shell: Shell) {
    let mut cmd = C::command();
    generate(shell, &mut cmd, "ebx", &mut io::stdout());
}

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
