//! Record and cleanup-plan formatting.

use super::theme::{Theme, format_size};
use crossterm::style::Stylize;
use kmu_core::distfiles::CleanupPlan;
use kmu_core::{AttributeRecord, Flag};
use std::path::Path;
use std::time::SystemTime;

/// One attribute record for display: identity highlighted, flags colored by
/// polarity.
pub fn record_line(record: &AttributeRecord) -> String {
    format!("  {}", styled_record(record.text()))
}

/// Color a record line for display. Unparseable tokens are left plain.
fn styled_record(text: &str) -> String {
    let theme = Theme::default();
    let mut fields = text.split_whitespace();
    let Some(identity) = fields.next() else {
        return String::new();
    };

    let mut line = identity.with(theme.colors.package_name).to_string();
    for token in fields {
        line.push(' ');
        match Flag::parse(token) {
            Some(flag) if !flag.is_enabled() => {
                line.push_str(&token.with(theme.colors.error).to_string());
            }
            Some(_) => line.push_str(&token.with(theme.colors.success).to_string()),
            None => line.push_str(token),
        }
    }
    line
}

/// Lines listing the texts about to be deleted.
pub fn pending_deletion_lines(texts: &[String]) -> Vec<String> {
    let theme = Theme::default();
    texts
        .iter()
        .map(|text| format!("  {} {}", "-".with(theme.colors.removed), text))
        .collect()
}

/// Every group that has something to delete, stale fetches, and a footer
/// with the totals.
pub fn plan_lines(plan: &CleanupPlan, root: &Path) -> Vec<String> {
    let theme = Theme::default();
    let mut lines = Vec::new();

    for group in plan.groups_with_duplicates() {
        let kept = group.kept();
        lines.push(String::new());
        lines.push(format!("  {}", group.identity().with(theme.colors.package_name).bold()));
        lines.push(format!(
            "    {} {}  {}",
            "keep".with(theme.colors.success),
            display_name(&kept.path, root),
            format_mtime(kept.modified).with(theme.colors.secondary)
        ));
        for old in group.superseded() {
            lines.push(format!(
                "    {} {}  {}",
                "drop".with(theme.colors.removed),
                display_name(&old.path, root),
                format_size(old.size).with(theme.colors.secondary)
            ));
        }
    }

    if !plan.stale().is_empty() {
        lines.push(String::new());
        lines.push(format!("  {}", "failed fetches".with(theme.colors.warning).bold()));
        for stale in plan.stale() {
            lines.push(format!(
                "    {} {}  {}",
                "drop".with(theme.colors.removed),
                display_name(&stale.path, root),
                format_size(stale.size).with(theme.colors.secondary)
            ));
        }
    }

    lines.push(String::new());
    let msg = format!(
        "  {} files to remove, {} reclaimable ({} reserved, {} unversioned kept)",
        plan.delete_count(),
        format_size(plan.reclaimable_bytes()),
        plan.reserved().len(),
        plan.unversioned().len()
    );
    lines.push(msg.with(theme.colors.secondary).to_string());
    lines
}

/// Path relative to the scan root when possible.
fn display_name(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

fn format_mtime(time: SystemTime) -> String {
    chrono::DateTime::<chrono::Local>::from(time)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
