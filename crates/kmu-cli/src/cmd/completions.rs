//! Shell completions

use crate::Cli;
use clap::CommandFactory;
use clap_complete::Shell;

/// Print a completion script for `shell` to stdout
pub fn completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
