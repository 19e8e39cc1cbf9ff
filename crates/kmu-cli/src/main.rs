//! kmu - keyword / mask / use CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kmu_cli::{Cli, Commands, cmd, strip_comment_args};

fn main() -> Result<()> {
    // Allow copy-pasting commands with trailing '#' comments.
    let cli = Cli::parse_from(strip_comment_args(std::env::args()));

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Completions { shell } = cli.command {
        cmd::completions::completions(shell);
        return Ok(());
    }

    let ctx = cmd::context(&cli)?;

    match cli.command {
        Commands::Add { category, tokens } => cmd::add::add(&ctx, category.into(), &tokens),
        Commands::Delete { category, keys } => cmd::delete::delete(&ctx, category.into(), &keys),
        Commands::List { category, keys } => cmd::list::list(&ctx, category.into(), &keys),
        Commands::Clean { distfiles } => {
            let root = distfiles.unwrap_or_else(|| ctx.config.distfiles.clone());
            cmd::clean::clean(&ctx, &root)
        }
        Commands::Completions { .. } => Ok(()),
    }
}
