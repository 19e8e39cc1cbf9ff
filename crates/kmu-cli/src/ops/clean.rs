//! `kmu clean`: prune superseded distfiles.

use super::Context;
use crate::ui::format_size;
use crate::ui::render::plan_lines;
use anyhow::{Context as _, Result};
use kmu_core::distfiles::{
    ApplyReport, CleanupPlanner, ReservationFilter, apply, scan_distfiles,
};
use std::path::Path;

/// What [`clean`] did.
#[derive(Debug)]
pub enum CleanOutcome {
    /// No duplicates and no failed fetches.
    NothingToDo,
    /// `--dry-run`: the plan was printed, nothing removed.
    DryRun { planned: usize, reclaimable: u64 },
    /// The user refused.
    Declined,
    /// Removal ran; see the report for partial failures.
    Applied(ApplyReport),
}

/// Scan `root`, plan which archives to drop, confirm and remove them.
pub fn clean(ctx: &Context, root: &Path) -> Result<CleanOutcome> {
    ctx.reporter.section("Scanning distfiles");
    let files = scan_distfiles(root)
        .with_context(|| format!("Failed to scan {}", root.display()))?;
    ctx.reporter
        .info(&format!("{} files in {}", files.len(), root.display()));

    let filter = ReservationFilter::new(ctx.config.reserved.iter().cloned());
    let planner = CleanupPlanner::new(ctx.config.index_capacity, ctx.config.index_growth);
    let plan = planner
        .plan(files, |path: &Path| filter.is_reserved(path))
        .context("Failed to plan cleanup")?;

    if plan.is_empty() {
        ctx.reporter.success("Nothing to clean");
        return Ok(CleanOutcome::NothingToDo);
    }

    for line in plan_lines(&plan, root) {
        ctx.reporter.detail(&line);
    }

    if ctx.dry_run {
        return Ok(CleanOutcome::DryRun {
            planned: plan.delete_count(),
            reclaimable: plan.reclaimable_bytes(),
        });
    }

    if !ctx.confirm(&format!(
        "Delete {} files ({})?",
        plan.delete_count(),
        format_size(plan.reclaimable_bytes())
    )) {
        return Ok(CleanOutcome::Declined);
    }

    let report = apply(&plan, false);
    for path in &report.missing {
        ctx.reporter
            .warning(&format!("{} was already gone", path.display()));
    }
    for (path, err) in &report.failed {
        ctx.reporter
            .error(&format!("Could not remove {}: {err}", path.display()));
    }
    ctx.reporter.success(&format!(
        "Removed {} files, freed {}",
        report.removed.len(),
        format_size(report.freed_bytes)
    ));
    Ok(CleanOutcome::Applied(report))
}
