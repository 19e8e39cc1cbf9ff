//! Console implementation of the core `Reporter` trait.

use super::theme::Theme;
use crossterm::style::Stylize;
use kmu_core::Reporter;

/// Prints status lines to the terminal.
///
/// Info and success go to stdout; warnings and errors go to stderr so they
/// survive `kmu list ... > file`.
#[derive(Debug, Clone, Default)]
pub struct ConsoleReporter {
    theme: Theme,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for ConsoleReporter {
    fn section(&self, title: &str) {
        println!();
        println!("{} {}", title.bold(), "─".repeat(40).with(self.theme.colors.header));
    }

    fn info(&self, msg: &str) {
        println!("  {} {msg}", self.theme.icons.info);
    }

    fn success(&self, msg: &str) {
        println!(
            "  {} {msg}",
            self.theme.icons.success.with(self.theme.colors.success)
        );
    }

    fn warning(&self, msg: &str) {
        eprintln!(
            "  {} {msg}",
            self.theme.icons.warning.with(self.theme.colors.warning)
        );
    }

    fn error(&self, msg: &str) {
        eprintln!(
            "  {} {}",
            self.theme.icons.error.with(self.theme.colors.error),
            msg.with(self.theme.colors.error)
        );
    }

    fn detail(&self, line: &str) {
        println!("{line}");
    }
}
