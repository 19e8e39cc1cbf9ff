//! Delete command

use crate::ops::{self, Context, DeleteOutcome};
use anyhow::Result;
use kmu_core::Category;

/// Delete records containing any of `keys`
pub fn delete(ctx: &Context, category: Category, keys: &[String]) -> Result<()> {
    match ops::delete(ctx, category, keys)? {
        DeleteOutcome::NoMatch => {
            ctx.reporter
                .info(&format!("No record in the {category} list matches {}", keys.join(", ")));
        }
        DeleteOutcome::Deleted { texts } => {
            for text in &texts {
                ctx.reporter.success(&format!("Deleted '{text}'"));
            }
        }
        DeleteOutcome::Declined { .. } => ctx.reporter.warning("Nothing deleted"),
    }
    Ok(())
}
