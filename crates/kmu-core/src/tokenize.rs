//! Tokenizer for attribute records.
//!
//! A record is a package identity followed by flag directives:
//!
//! ```text
//! >=media-video/mpv-0.38 lua -x11 +wayland
//! ```
//!
//! The identity may carry relational operators; they matter to Portage but
//! not to us, so they are stripped before any comparison.

use std::fmt;

/// Characters that qualify a package atom with a version relation.
pub const RELATIONAL_OPERATORS: [char; 3] = ['<', '=', '>'];

/// Split a record into tokens.
///
/// Fields are separated by single spaces; empty fields are dropped. Trailing
/// newline characters are removed from the final token, and relational
/// operators are stripped from the first (identity) token.
///
/// # Example
///
/// ```
/// use kmu_core::tokenize;
///
/// assert_eq!(tokenize(">=dev-lang/rust-1.80  doc -clippy\n"),
///            vec!["dev-lang/rust-1.80", "doc", "-clippy"]);
/// assert!(tokenize("").is_empty());
/// ```
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens: Vec<String> = input
        .split(' ')
        .filter(|field| !field.is_empty())
        .map(str::to_owned)
        .collect();

    if let Some(last) = tokens.last_mut() {
        let kept = last.trim_end_matches(['\n', '\r']).len();
        last.truncate(kept);
        if last.is_empty() {
            tokens.pop();
        }
    }

    if let Some(first) = tokens.first_mut() {
        let stripped = strip_relational(first);
        if stripped.len() != first.len() {
            *first = stripped.to_owned();
        }
    }

    tracing::trace!("tokenized {input:?} into {tokens:?}");
    tokens
}

/// Remove leading relational operators from a package atom.
pub fn strip_relational(atom: &str) -> &str {
    atom.trim_start_matches(RELATIONAL_OPERATORS)
}

/// The first field of a record exactly as written, operators included.
pub fn leading_field(input: &str) -> Option<&str> {
    input
        .split(' ')
        .map(|field| field.trim_end_matches(['\n', '\r']))
        .find(|field| !field.is_empty())
}

/// The comparable identity of a record: its first field without operators.
pub fn identity(input: &str) -> Option<&str> {
    leading_field(input).map(strip_relational)
}

/// Whether a flag is switched on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Bare flag name, enabled.
    Enabled,
    /// Enabled, written with a leading `+`.
    Explicit,
    /// Disabled, written with a leading `-`.
    Disabled,
}

impl Polarity {
    /// `true` for both enabled spellings.
    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

/// A single flag token: a name plus its polarity marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    name: String,
    polarity: Polarity,
}

impl Flag {
    /// Parse a token as it appears in a stored record.
    ///
    /// Returns `None` when nothing is left after the polarity marker.
    pub fn parse(token: &str) -> Option<Self> {
        let (polarity, name) = if let Some(rest) = token.strip_prefix('-') {
            (Polarity::Disabled, rest)
        } else if let Some(rest) = token.strip_prefix('+') {
            (Polarity::Explicit, rest)
        } else {
            (Polarity::Enabled, token)
        };

        if name.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_owned(),
            polarity,
        })
    }

    /// Parse a token supplied as a new directive.
    ///
    /// Positive directives lose any `+` the user typed; with `explicit_plus`
    /// set, those whose name starts with a letter get it back. Matching only
    /// ever looks at [`Flag::name`], so this is purely cosmetic.
    pub fn directive(token: &str, explicit_plus: bool) -> Option<Self> {
        let mut flag = Self::parse(token)?;
        if flag.polarity.is_enabled() {
            let alphabetic = flag.name.starts_with(|c: char| c.is_ascii_alphabetic());
            flag.polarity = if explicit_plus && alphabetic {
                Polarity::Explicit
            } else {
                Polarity::Enabled
            };
        }
        Some(flag)
    }

    /// Flag name without polarity marker.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Polarity of this token.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Shorthand for `self.polarity().is_enabled()`.
    pub fn is_enabled(&self) -> bool {
        self.polarity.is_enabled()
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.polarity {
            Polarity::Enabled => write!(f, "{}", self.name),
            Polarity::Explicit => write!(f, "+{}", self.name),
            Polarity::Disabled => write!(f, "-{}", self.name),
        }
    }
}
