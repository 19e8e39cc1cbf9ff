//! Interactive yes/no prompt.

use crossterm::style::Stylize;
use kmu_core::Confirm;
use std::io::{self, BufRead, Write};

/// Asks on the terminal unless `--yes` was given.
///
/// Anything other than `y`/`yes` declines, as does a closed stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm {
    assume_yes: bool,
}

impl TerminalConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            tracing::debug!("auto-confirmed: {prompt}");
            return true;
        }

        print!("  {} {prompt} (y/N) ", "?".bold().yellow());
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut input = String::new();
        match io::stdin().lock().read_line(&mut input) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&input),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        assert!(TerminalConfirm::new(true).confirm("Delete?"));
    }
}
