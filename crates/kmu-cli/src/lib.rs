//! kmu - keyword / mask / use
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Command-line front end for `kmu-core`.
//!
//! # Overview
//!
//! `kmu` edits the per-package Portage configuration files without opening an
//! editor, and prunes superseded archives from the distfiles cache.
//!
//! ```text
//! kmu add use media-video/mpv lua -x11     # merge flags into package.use
//! kmu add k dev-lang/rust                  # accept ** keywords
//! kmu delete mask www-client/firefox
//! kmu list uL                              # linguas_* records only
//! kmu clean --dry-run
//! ```
//!
//! # Layout
//!
//! - [`cmd`]: one entry point per subcommand; builds the [`ops::Context`] and
//!   turns outcomes into terminal output and exit status.
//! - [`ops`]: the action flows, independent of the terminal.
//! - [`ui`]: console reporter, confirmation prompt and formatting helpers.

pub mod cmd;
pub mod ops;
pub mod ui;

use clap::{Parser, Subcommand, ValueEnum};
use kmu_core::Category;
use std::path::PathBuf;

/// Version string baked in by the build script.
pub const VERSION: &str = env!("KMU_VERSION");

#[derive(Debug, Parser)]
#[command(name = "kmu")]
#[command(author, version = VERSION, about = "kmu - manage Portage keywords, masks and USE flags")]
pub struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Show what would happen without making changes
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Write positive flags as +flag
    #[arg(long, global = true)]
    pub explicit_plus: bool,

    /// Configuration file
    #[arg(long, global = true, env = "KMU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Gentoo Prefix root placed in front of every configured path
    #[arg(long, global = true, env = "EPREFIX")]
    pub prefix: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add a record, merging flags into an existing one for use/linguas
    Add {
        /// Target list
        category: CategoryArg,
        /// Package atom followed by flags; a single quoted argument is split
        #[arg(required = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
    /// Delete every record containing any of the keys
    #[command(alias = "rm")]
    Delete {
        /// Target list
        category: CategoryArg,
        /// Substrings selecting the records to delete
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// List records, optionally filtered by package name
    #[command(alias = "ls")]
    List {
        /// Target list
        category: CategoryArg,
        /// Substrings of the package identity
        keys: Vec<String>,
    },
    /// Remove superseded archives from the distfiles directory
    Clean {
        /// Directory to scan instead of the configured one
        #[arg(long)]
        distfiles: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Attribute list selector as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    /// package.keywords
    #[value(alias = "k")]
    Keyword,
    /// package.mask
    #[value(alias = "m")]
    Mask,
    /// package.use
    #[value(alias = "u")]
    Use,
    /// package.unmask
    #[value(alias = "U")]
    Unmask,
    /// linguas_* flags in package.use
    #[value(alias = "uL")]
    Linguas,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Keyword => Self::Keyword,
            CategoryArg::Mask => Self::Mask,
            CategoryArg::Use => Self::Use,
            CategoryArg::Unmask => Self::Unmask,
            CategoryArg::Linguas => Self::Linguas,
        }
    }
}

/// Drop everything from the first `#`-prefixed argument on, so command lines
/// copied from notes with trailing comments still parse.
///
/// # Example
///
/// ```
/// use kmu_cli::strip_comment_args;
///
/// let args = ["kmu", "add", "k", "dev-lang/rust", "#", "nightly"].map(String::from);
/// assert_eq!(strip_comment_args(args), vec!["kmu", "add", "k", "dev-lang/rust"]);
/// ```
pub fn strip_comment_args<I: IntoIterator<Item = String>>(args: I) -> Vec<String> {
    args.into_iter().take_while(|arg| !arg.starts_with('#')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_category_aliases() {
        let cli = Cli::try_parse_from(["kmu", "list", "uL"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::List { category: CategoryArg::Linguas, .. }
        ));

        let cli = Cli::try_parse_from(["kmu", "list", "U"]).unwrap();
        assert!(matches!(cli.command, Commands::List { category: CategoryArg::Unmask, .. }));

        let cli = Cli::try_parse_from(["kmu", "list", "u"]).unwrap();
        assert!(matches!(cli.command, Commands::List { category: CategoryArg::Use, .. }));
    }

    #[test]
    fn test_add_accepts_negative_flags() {
        let cli = Cli::try_parse_from(["kmu", "add", "use", "media-video/mpv", "-x11", "lua"]).unwrap();
        let Commands::Add { tokens, .. } = cli.command else {
            panic!("expected add");
        };
        assert_eq!(tokens, vec!["media-video/mpv", "-x11", "lua"]);
    }

    #[test]
    fn test_add_requires_tokens() {
        assert!(Cli::try_parse_from(["kmu", "add", "mask"]).is_err());
        assert!(Cli::try_parse_from(["kmu", "delete", "mask"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["kmu", "clean", "--dry-run", "-y", "-v"]).unwrap();
        assert!(cli.dry_run && cli.yes && cli.verbose);
    }
}
