//! `kmu delete`: remove records matching any key.

use super::Context;
use crate::ui::render::pending_deletion_lines;
use anyhow::{Result, bail};
use kmu_core::Category;

/// What [`delete`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// No live record contained any key.
    NoMatch,
    /// These records were removed.
    Deleted { texts: Vec<String> },
    /// Several records matched and the user refused.
    Declined { texts: Vec<String> },
}

/// Tombstone every live record containing any of `keys`, then rewrite.
///
/// A single match is removed straight away; several need confirmation.
pub fn delete(ctx: &Context, category: Category, keys: &[String]) -> Result<DeleteOutcome> {
    let keys: Vec<&str> = keys
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    if keys.is_empty() {
        bail!("Nothing to delete: expected at least one key");
    }

    let mut store = ctx.open_store(category)?;
    let texts = store.list_mut().mark_matching(&keys);

    match texts.len() {
        0 => return Ok(DeleteOutcome::NoMatch),
        1 => {}
        n => {
            ctx.reporter
                .warning(&format!("{n} records match in the {category} list:"));
            for line in pending_deletion_lines(&texts) {
                ctx.reporter.detail(&line);
            }
            if !ctx.confirm(&format!("Delete all {n} records?")) {
                return Ok(DeleteOutcome::Declined { texts });
            }
        }
    }

    ctx.save_store(&mut store)?;
    Ok(DeleteOutcome::Deleted { texts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::testing::{RecordingReporter, context};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    const MASK: &str = "\
# local masks
>=www-client/firefox-130
www-client/chromium
app-misc/jq
";

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    fn seeded(dir: &TempDir, answer: bool) -> Context {
        let ctx = context(dir.path(), answer);
        let path = ctx.config.list_path(Category::Mask);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, MASK).unwrap();
        ctx
    }

    fn read(ctx: &Context) -> String {
        fs::read_to_string(ctx.config.list_path(Category::Mask)).unwrap()
    }

    #[test]
    fn test_single_match_deleted_without_prompt() {
        let dir = TempDir::new().unwrap();
        // A refusing policy proves no question was asked.
        let ctx = seeded(&dir, false);

        let outcome = delete(&ctx, Category::Mask, &keys(&["jq"])).unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted { texts: keys(&["app-misc/jq"]) });
        assert_eq!(
            read(&ctx),
            "# local masks\n>=www-client/firefox-130\nwww-client/chromium\n"
        );
    }

    #[test]
    fn test_no_match_leaves_file() {
        let dir = TempDir::new().unwrap();
        let ctx = seeded(&dir, true);
        assert_eq!(delete(&ctx, Category::Mask, &keys(&["vim"])).unwrap(), DeleteOutcome::NoMatch);
        assert_eq!(read(&ctx), MASK);
    }

    #[test]
    fn test_several_matches_need_confirmation() {
        let dir = TempDir::new().unwrap();
        let ctx = seeded(&dir, false);
        let outcome = delete(&ctx, Category::Mask, &keys(&["www-client"])).unwrap();
        assert!(matches!(outcome, DeleteOutcome::Declined { ref texts } if texts.len() == 2));
        assert_eq!(read(&ctx), MASK);

        let ctx = seeded(&dir, true);
        let outcome = delete(&ctx, Category::Mask, &keys(&["www-client"])).unwrap();
        assert!(matches!(outcome, DeleteOutcome::Deleted { ref texts } if texts.len() == 2));
        assert_eq!(read(&ctx), "# local masks\napp-misc/jq\n");
    }

    #[test]
    fn test_matches_listed_before_prompt() {
        let dir = TempDir::new().unwrap();
        let mut ctx = seeded(&dir, false);
        let reporter = Arc::new(RecordingReporter::default());
        ctx.reporter = reporter.clone();

        delete(&ctx, Category::Mask, &keys(&["www-client"])).unwrap();
        let details = reporter.details();
        assert_eq!(details.len(), 2);
        assert!(details[0].ends_with(">=www-client/firefox-130"));
        assert!(details[1].ends_with("www-client/chromium"));
    }

    #[test]
    fn test_comments_are_not_matched() {
        let dir = TempDir::new().unwrap();
        let ctx = seeded(&dir, true);
        let outcome = delete(&ctx, Category::Mask, &keys(&["local"])).unwrap();
        assert_eq!(outcome, DeleteOutcome::NoMatch);
    }

    #[test]
    fn test_blank_keys_rejected() {
        let dir = TempDir::new().unwrap();
        let ctx = seeded(&dir, true);
        assert!(delete(&ctx, Category::Mask, &keys(&["", " "])).is_err());
    }
}
