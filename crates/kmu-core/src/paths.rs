//! Filesystem locations and Gentoo Prefix handling.

use std::path::{Component, Path, PathBuf};

/// Default `package.keywords` list.
pub const DEFAULT_KEYWORDS: &str = "/etc/portage/package.keywords/keywords";
/// Default `package.mask` list.
pub const DEFAULT_MASK: &str = "/etc/portage/package.mask/mask";
/// Default `package.use` list (also holds linguas flags).
pub const DEFAULT_USE: &str = "/etc/portage/package.use/use";
/// Default `package.unmask` list.
pub const DEFAULT_UNMASK: &str = "/etc/portage/package.unmask/unmask";
/// Default download cache scanned by cleanup.
pub const DEFAULT_DISTFILES: &str = "/usr/portage/distfiles";
/// Default ebuild repository used for atom suggestions.
pub const DEFAULT_REPOSITORY: &str = "/usr/portage";

/// Join `path` under `prefix`, treating an absolute `path` as relative to it.
///
/// # Example
///
/// ```
/// use kmu_core::paths::prefixed;
/// use std::path::Path;
///
/// assert_eq!(
///     prefixed(Path::new("/opt/gentoo"), Path::new("/etc/portage/package.use/use")),
///     Path::new("/opt/gentoo/etc/portage/package.use/use"),
/// );
/// ```
pub fn prefixed(prefix: &Path, path: &Path) -> PathBuf {
    let relative: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    prefix.join(relative)
}

/// Config files consulted when none is named explicitly, most specific first.
pub fn config_candidates(prefix: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(prefix) = prefix {
        candidates.push(prefixed(prefix, Path::new("/etc/kmu.toml")));
    } else {
        candidates.push(PathBuf::from("/etc/kmu.toml"));
    }
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("kmu").join("kmu.toml"));
    }
    candidates
}
