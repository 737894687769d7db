//! Shell completion scripts for the `replay`, `config` and `completion` subcommands.

use clap::CommandFactory;
use clap_complete::{generate, shells::Shell};
use std::io;

/// Writes the completion script for `shell` to stdout.
///
/// The script is bound to the installed binary name, so it activates for the
/// command users actually type.
pub fn generate_completion(shell: Shell) {
    let mut app = crate::Cli::command();
    generate(shell, &mut app, env!("CARGO_BIN_NAME"), &mut io::stdout());
}
