//! Atom suggestions from an ebuild repository.
//!
//! Users often type a bare package name (`firefox`) where Portage expects a
//! full atom (`www-client/firefox`). The repository tree lays packages out as
//! `<category>/<package>/`, so a two-level directory walk is enough to find
//! candidates.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use std::path::Path;

/// Top-level directories of a repository that never hold packages.
const NON_CATEGORY_DIRS: [&str; 7] = [
    "distfiles", "eclass", "licenses", "metadata", "profiles", "scripts", "packages",
];

/// Most suggestions worth showing; more hits than this means the name is
/// too vague to help.
pub const MAX_SUGGESTIONS: usize = 9;

/// Find `category/package` atoms whose package name contains `name`,
/// ignoring case. Results are ranked best match first.
///
/// A missing or unreadable repository yields no suggestions.
pub fn suggest_atoms(repository: &Path, name: &str) -> Vec<String> {
    if name.is_empty() {
        return Vec::new();
    }

    let needle = name.to_lowercase();
    let matcher = SkimMatcherV2::default();
    let mut hits: Vec<(i64, String)> = walkdir::WalkDir::new(repository)
        .min_depth(2)
        .max_depth(2)
        .into_iter()
        .filter_entry(|e| e.depth() != 1 || is_category(&e.file_name().to_string_lossy()))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| {
            let package = e.file_name().to_string_lossy().into_owned();
            if !package.to_lowercase().contains(&needle) {
                return None;
            }
            let category = e.path().parent()?.file_name()?.to_string_lossy().into_owned();
            let score = matcher.fuzzy_match(&package, name).unwrap_or(0);
            Some((score, format!("{category}/{package}")))
        })
        .collect();

    hits.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    tracing::debug!("{} repository matches for '{name}'", hits.len());
    hits.into_iter().map(|(_, atom)| atom).collect()
}

fn is_category(dir: &str) -> bool {
    !dir.starts_with('.') && !NON_CATEGORY_DIRS.contains(&dir)
}
