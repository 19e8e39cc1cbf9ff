//! Flag merging.
//!
//! Folds a new list of directives into the flags already stored for a
//! package. A directive either enables (`flag`, `+flag`) or disables
//! (`-flag`) a name:
//!
//! | stored  | directive | result            |
//! |---------|-----------|-------------------|
//! | `f`     | `-f`      | `-f` (in place)   |
//! | `-f`    | `-f`      | unchanged         |
//! | `-f`    | `f`       | `f` (in place)    |
//! | `f`     | `f`       | unchanged         |
//! | absent  | either    | appended          |

use crate::tokenize::{Flag, leading_field, tokenize};
use thiserror::Error;

/// Reasons a merge is refused. Nothing is persisted when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// The new token list has no identity token.
    #[error("no package identity given")]
    MissingIdentity,

    /// A token had a polarity marker but no flag name.
    #[error("empty flag name in '{0}'")]
    EmptyFlag(String),
}

/// Caller-selected knobs for [`merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Write positive alphabetic directives as `+flag`.
    pub explicit_plus: bool,
}

/// Merge `new` into `old`.
///
/// Both slices are token sequences as produced by [`tokenize`]: element 0 is
/// the identity, the rest are flags. The result carries `new[0]` verbatim
/// followed by the merged flags.
///
/// # Errors
///
/// [`MergeError::MissingIdentity`] when `new` is empty or its identity is
/// blank, [`MergeError::EmptyFlag`] when any token is a bare `+` or `-`.
///
/// # Example
///
/// ```
/// use kmu_core::{merge, tokenize, MergeOptions};
///
/// let old = tokenize("pkgA flagX -flagY");
/// let new = tokenize("pkgA +flagX flagZ -flagW");
/// let merged = merge(&old, &new, MergeOptions::default()).unwrap();
/// assert_eq!(merged.join(" "), "pkgA flagX -flagY flagZ -flagW");
/// ```
pub fn merge(
    old: &[String],
    new: &[String],
    options: MergeOptions,
) -> Result<Vec<String>, MergeError> {
    let (identity, directives) = new.split_first().ok_or(MergeError::MissingIdentity)?;
    if identity.is_empty() {
        return Err(MergeError::MissingIdentity);
    }

    let stored = old
        .iter()
        .skip(1)
        .map(|token| Flag::parse(token).ok_or_else(|| MergeError::EmptyFlag(token.clone())))
        .collect::<Result<Vec<_>, _>>()?;

    let directives = directives
        .iter()
        .filter(|token| !token.is_empty())
        .map(|token| {
            Flag::directive(token, options.explicit_plus)
                .ok_or_else(|| MergeError::EmptyFlag(token.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let merged = merge_flags(&stored, &directives);

    Ok(std::iter::once(identity.clone())
        .chain(merged.iter().map(ToString::to_string))
        .collect())
}

/// Apply `directives` on top of `stored` and return the resulting flag set.
///
/// The first stored entry with a given name is the one a directive acts on.
/// Later stored entries with the same name are dropped so the result never
/// names a flag twice.
pub fn merge_flags(stored: &[Flag], directives: &[Flag]) -> Vec<Flag> {
    let mut working: Vec<Flag> = Vec::with_capacity(stored.len() + directives.len());

    for flag in stored {
        if working.iter().any(|seen| seen.name() == flag.name()) {
            tracing::debug!("dropping repeated flag '{flag}'");
            continue;
        }
        working.push(flag.clone());
    }

    for directive in directives {
        match working
            .iter_mut()
            .find(|flag| flag.name() == directive.name())
        {
            Some(existing) if existing.is_enabled() == directive.is_enabled() => {
                tracing::trace!("'{existing}' already satisfies '{directive}'");
            }
            Some(existing) => {
                tracing::debug!("flipping '{existing}' to '{directive}'");
                *existing = directive.clone();
            }
            None => {
                tracing::debug!("appending '{directive}'");
                working.push(directive.clone());
            }
        }
    }

    working
}

/// Merge the directives of `new_line` into the stored record `old_line`.
///
/// Works on whole record text. The identity written back is the first field
/// of `new_line` as typed, so version operators the user supplied survive.
///
/// # Errors
///
/// See [`merge`].
pub fn merge_line(old_line: &str, new_line: &str, options: MergeOptions) -> Result<String, MergeError> {
    let old = tokenize(old_line);
    let mut new = tokenize(new_line);

    if let (Some(first), Some(raw)) = (new.first_mut(), leading_field(new_line)) {
        raw.clone_into(first);
    }

    Ok(merge(&old, &new, options)?.join(" "))
}
