//! `kmu add`: append a record or merge flags into an existing one.

use super::Context;
use anyhow::{Context as _, Result, bail};
use kmu_core::repo::{MAX_SUGGESTIONS, suggest_atoms};
use kmu_core::tokenize::{leading_field, strip_relational};
use kmu_core::{AttributeList, Category, MergeOptions, merge_line, tokenize};

/// Keyword written when the user names a package without keywords.
pub const ANY_KEYWORD: &str = "**";

/// What [`add`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new record was appended.
    Appended { text: String },
    /// An existing record was rewritten.
    Merged { before: String, after: String },
    /// The list already says exactly this; nothing written.
    AlreadyPresent { text: String },
    /// The user refused the merge.
    Declined,
}

/// Add `args` (identity followed by flags) to the `category` list.
pub fn add(ctx: &Context, category: Category, args: &[String]) -> Result<AddOutcome> {
    let input = args.join(" ");
    let Some(typed) = leading_field(&input) else {
        bail!("Nothing to add: expected a package atom");
    };
    let flags: Vec<String> = tokenize(&input)
        .into_iter()
        .skip(1)
        .map(|token| category.rewrite_directive(&token))
        .collect();

    let mut store = ctx.open_store(category)?;
    let identity = resolve_identity(ctx, store.list(), typed);

    let options = MergeOptions {
        explicit_plus: ctx.config.explicit_plus,
    };
    let outcome = if category.merges_flags() {
        add_flags(ctx, store.list_mut(), &identity, &flags, options)?
    } else {
        let text = plain_record(category, &identity, &flags);
        if store.list().contains_text(&text) {
            AddOutcome::AlreadyPresent { text }
        } else {
            store.list_mut().push(text.clone());
            AddOutcome::Appended { text }
        }
    };

    if matches!(outcome, AddOutcome::Appended { .. } | AddOutcome::Merged { .. }) {
        ctx.save_store(&mut store)?;
    }
    Ok(outcome)
}

/// Merge into the record for `identity` if there is one, otherwise append.
fn add_flags(
    ctx: &Context,
    list: &mut AttributeList,
    identity: &str,
    flags: &[String],
    options: MergeOptions,
) -> Result<AddOutcome> {
    let new_line = std::iter::once(identity)
        .chain(flags.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");

    let Some(index) = list.find_identity(identity) else {
        let text = merge_line(identity, &new_line, options)
            .with_context(|| format!("Invalid flags in '{new_line}'"))?;
        if list.contains_text(&text) {
            return Ok(AddOutcome::AlreadyPresent { text });
        }
        list.push(text.clone());
        return Ok(AddOutcome::Appended { text });
    };

    let before = list
        .get(index)
        .map(|r| r.text().to_owned())
        .unwrap_or_default();
    let after = merge_line(&before, &new_line, options)
        .with_context(|| format!("Cannot merge '{new_line}' into '{before}'"))?;

    if after == before.trim() {
        return Ok(AddOutcome::AlreadyPresent { text: after });
    }

    ctx.reporter.info(&format!("Existing record: {before}"));
    ctx.reporter.info(&format!("Merged record:   {after}"));
    if !ctx.confirm("Replace the existing record?") {
        return Ok(AddOutcome::Declined);
    }

    list.set_text(index, after.clone());
    Ok(AddOutcome::Merged { before, after })
}

/// Record text for categories that never merge.
fn plain_record(category: Category, identity: &str, flags: &[String]) -> String {
    if flags.is_empty() && category == Category::Keyword {
        return format!("{identity} {ANY_KEYWORD}");
    }
    std::iter::once(identity)
        .chain(flags.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Offer a `category/package` atom for a bare package name.
///
/// Only consulted when the list has no record for the name yet. A single
/// repository hit may replace the typed name after confirmation; a handful
/// of hits are listed; anything more is too vague to mention.
fn resolve_identity(ctx: &Context, list: &AttributeList, typed: &str) -> String {
    let bare = strip_relational(typed);
    if bare.contains('/') || list.find_identity(typed).is_some() {
        return typed.to_owned();
    }

    let suggestions = suggest_atoms(&ctx.config.repository, bare);
    match suggestions.as_slice() {
        [] => typed.to_owned(),
        [atom] => {
            if ctx.confirm(&format!("Did you mean {atom}?")) {
                let operators = &typed[..typed.len() - bare.len()];
                format!("{operators}{atom}")
            } else {
                typed.to_owned()
            }
        }
        many if many.len() <= MAX_SUGGESTIONS => {
            ctx.reporter
                .warning(&format!("'{bare}' has no category; candidates:"));
            for atom in many {
                ctx.reporter.info(atom);
            }
            typed.to_owned()
        }
        _ => typed.to_owned(),
    }
}
