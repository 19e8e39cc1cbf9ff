//! `kmu list`: show records of one list.

use super::Context;
use crate::ui::render::record_line;
use anyhow::Result;
use kmu_core::Category;
use kmu_core::types::LINGUAS_PREFIX;

/// What [`list`] found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOutcome {
    /// Live records in the file.
    pub total: usize,
    /// Texts of the records shown.
    pub shown: Vec<String>,
}

/// Print the records of `category` whose identity contains any of `keys`
/// (all records when `keys` is empty).
///
/// The linguas view only shows records carrying a `linguas_` flag.
pub fn list(ctx: &Context, category: Category, keys: &[String]) -> Result<ListOutcome> {
    let store = ctx.open_store(category)?;
    let list = store.list();

    let shown: Vec<_> = list
        .filter(keys)
        .into_iter()
        .filter(|r| category != Category::Linguas || r.text().contains(LINGUAS_PREFIX))
        .collect();

    ctx.reporter.section(&format!("{category} list"));
    ctx.reporter.info(&format!(
        "{} records in {}",
        list.live_count(),
        store.path().display()
    ));
    for record in &shown {
        ctx.reporter.detail(&record_line(record));
    }

    Ok(ListOutcome {
        total: list.live_count(),
        shown: shown.iter().map(|r| r.text().to_owned()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::testing::{RecordingReporter, context};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    const USE: &str = "\
media-video/mpv lua -x11
app-office/libreoffice linguas_de -linguas_fr

# editors
app-editors/vim -gpm
";

    fn seeded(dir: &TempDir) -> Context {
        let ctx = context(dir.path(), true);
        let path = ctx.config.list_path(Category::Use);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, USE).unwrap();
        ctx
    }

    #[test]
    fn test_list_all() {
        let dir = TempDir::new().unwrap();
        let ctx = seeded(&dir);
        let outcome = list(&ctx, Category::Use, &[]).unwrap();
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.shown.len(), 3);
    }

    #[test]
    fn test_list_filtered_by_identity() {
        let dir = TempDir::new().unwrap();
        let ctx = seeded(&dir);
        let outcome = list(&ctx, Category::Use, &["vim".to_string()]).unwrap();
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.shown, vec!["app-editors/vim -gpm"]);
    }

    #[test]
    fn test_shown_records_go_to_reporter() {
        let dir = TempDir::new().unwrap();
        let mut ctx = seeded(&dir);
        let reporter = Arc::new(RecordingReporter::default());
        ctx.reporter = reporter.clone();

        list(&ctx, Category::Use, &["mpv".to_string()]).unwrap();
        let details = reporter.details();
        assert_eq!(details.len(), 1);
        assert!(details[0].contains("media-video/mpv"));
    }

    #[test]
    fn test_linguas_view() {
        let dir = TempDir::new().unwrap();
        let ctx = seeded(&dir);
        let outcome = list(&ctx, Category::Linguas, &[]).unwrap();
        assert_eq!(outcome.shown, vec!["app-office/libreoffice linguas_de -linguas_fr"]);
    }

    #[test]
    fn test_missing_file_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let ctx = context(dir.path(), true);
        let outcome = list(&ctx, Category::Mask, &[]).unwrap();
        assert_eq!(outcome, ListOutcome { total: 0, shown: Vec::new() });
    }
}
