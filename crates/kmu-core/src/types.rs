//! Shared vocabulary types.

use std::fmt;

/// Which attribute list an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// `package.keywords`: accept testing keywords for a package.
    Keyword,
    /// `package.mask`: forbid matching versions.
    Mask,
    /// `package.use`: per-package USE flags.
    Use,
    /// `package.unmask`: lift a profile mask.
    Unmask,
    /// The `LINGUAS` subset of `package.use`, written as `linguas_*` flags.
    Linguas,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 5] = [
        Self::Keyword,
        Self::Mask,
        Self::Use,
        Self::Unmask,
        Self::Linguas,
    ];

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Keyword => "Keyword",
            Self::Mask => "Mask",
            Self::Use => "USE",
            Self::Unmask => "Unmask",
            Self::Linguas => "Linguas",
        }
    }

    /// Whether adding to an existing identity merges flags instead of
    /// appending a second record.
    pub fn merges_flags(self) -> bool {
        matches!(self, Self::Use | Self::Linguas)
    }

    /// Rewrite a user directive into the flag stored in the file.
    ///
    /// Only [`Category::Linguas`] rewrites: `de` becomes `linguas_de` and
    /// `-de` becomes `-linguas_de`.
    pub fn rewrite_directive(self, token: &str) -> String {
        match self {
            Self::Linguas => match token.strip_prefix('-') {
                Some(lang) => format!("-{LINGUAS_PREFIX}{lang}"),
                None => format!("{LINGUAS_PREFIX}{}", token.trim_start_matches('+')),
            },
            _ => token.to_owned(),
        }
    }
}

/// Flag prefix Portage uses for the `LINGUAS` expand variable.
pub const LINGUAS_PREFIX: &str = "linguas_";

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
