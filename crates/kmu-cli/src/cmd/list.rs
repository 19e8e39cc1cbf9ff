//! List command

use crate::ops::{self, Context};
use anyhow::Result;
use kmu_core::Category;

/// List records of the `category` list
pub fn list(ctx: &Context, category: Category, keys: &[String]) -> Result<()> {
    let outcome = ops::list(ctx, category, keys)?;
    if outcome.shown.is_empty() && !keys.is_empty() {
        ctx.reporter.info(&format!("No record matches {}", keys.join(", ")));
    }
    Ok(())
}
