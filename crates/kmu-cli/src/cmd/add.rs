//! Add command

use crate::ops::{self, AddOutcome, Context};
use anyhow::Result;
use kmu_core::Category;

/// Add a record to the `category` list
pub fn add(ctx: &Context, category: Category, tokens: &[String]) -> Result<()> {
    match ops::add(ctx, category, tokens)? {
        AddOutcome::Appended { text } => {
            ctx.reporter.success(&format!("Added '{text}' to the {category} list"));
        }
        AddOutcome::Merged { after, .. } => {
            ctx.reporter.success(&format!("Updated {category} record: {after}"));
        }
        AddOutcome::AlreadyPresent { text } => {
            ctx.reporter.info(&format!("'{text}' is already in the {category} list"));
        }
        AddOutcome::Declined => ctx.reporter.warning("Left the existing record unchanged"),
    }
    Ok(())
}
