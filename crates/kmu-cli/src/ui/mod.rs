//! Terminal presentation.
//!
//! Everything that writes to the terminal lives here so the flows in
//! [`crate::ops`] stay testable with a `NullReporter`.

pub mod output;
pub mod prompt;
pub mod render;
pub mod theme;

pub use output::ConsoleReporter;
pub use prompt::TerminalConfirm;
pub use theme::{Theme, format_size};
