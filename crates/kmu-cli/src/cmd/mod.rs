//! Subcommand entry points.
//!
//! Each function here turns an ops outcome into terminal output; errors
//! bubble up to `main` and become a non-zero exit status.

pub mod add;
pub mod clean;
pub mod completions;
pub mod delete;
pub mod list;

use crate::Cli;
use crate::ops::Context;
use crate::ui::{ConsoleReporter, TerminalConfirm};
use anyhow::{Context as _, Result};
use kmu_core::Config;
use std::sync::Arc;

/// Resolve configuration and wire the console reporter and prompt.
pub fn context(cli: &Cli) -> Result<Context> {
    // An empty EPREFIX means no prefix.
    let prefix = cli.prefix.as_deref().filter(|p| !p.as_os_str().is_empty());
    let mut config = Config::discover(cli.config.as_deref(), prefix)
        .context("Failed to load configuration")?;
    if cli.explicit_plus {
        config.explicit_plus = true;
    }
    tracing::debug!("effective config: {config:?}");

    Ok(Context::new(
        config,
        Arc::new(ConsoleReporter::new()),
        Arc::new(TerminalConfirm::new(cli.yes)),
        cli.dry_run,
    ))
}
