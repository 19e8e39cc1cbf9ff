//! Clean command (distfile pruning)

use crate::ops::{self, CleanOutcome, Context};
use crate::ui::format_size;
use anyhow::{Result, bail};
use std::path::Path;

/// Remove superseded archives below `root`
pub fn clean(ctx: &Context, root: &Path) -> Result<()> {
    match ops::clean(ctx, root)? {
        CleanOutcome::NothingToDo => {}
        CleanOutcome::DryRun { planned, reclaimable } => {
            ctx.reporter.info(&format!(
                "Dry run: {planned} files ({}) would be removed",
                format_size(reclaimable)
            ));
        }
        CleanOutcome::Declined => ctx.reporter.warning("Nothing removed"),
        CleanOutcome::Applied(report) => {
            if report.has_failures() {
                bail!("{} files could not be removed", report.failed.len());
            }
        }
    }
    Ok(())
}
