//! Reporter and confirmation traits for dependency injection
//!
//! These traits let the core flows report status and ask yes/no questions
//! without being coupled to a terminal.

/// Sink for user-facing status messages.
pub trait Reporter {
    /// Indicates a new section or phase has started (e.g. "Scanning").
    fn section(&self, title: &str);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a success message.
    fn success(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);

    /// Log an error message.
    fn error(&self, msg: &str);

    /// Emit a preformatted line (a record, a plan entry) without any prefix.
    fn detail(&self, line: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn section(&self, title: &str) {
        (**self).section(title);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn success(&self, msg: &str) {
        (**self).success(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
    fn error(&self, msg: &str) {
        (**self).error(msg);
    }
    fn detail(&self, line: &str) {
        (**self).detail(line);
    }
}

/// A no-op reporter for silent operations (e.g., scripting, testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn info(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn error(&self, _: &str) {}
    fn detail(&self, _: &str) {}
}

/// Policy deciding whether a destructive step may go ahead.
///
/// Declining is an ordinary outcome, not an error.
pub trait Confirm {
    /// Ask `prompt`; `true` means proceed.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
