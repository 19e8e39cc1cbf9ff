//! Package identities and markers read from distfile names.

use std::ffi::OsStr;

/// Marker Portage leaves in the name of a download that failed verification.
const CHECKSUM_FAILURE: &str = "_checksum_failure_";

/// Derive the package identity from a versioned file name.
///
/// The identity is everything before the first `-` or `_` that is directly
/// followed by a digit. Returns `None` for unversioned names, which cleanup
/// always keeps.
///
/// # Example
///
/// ```
/// use kmu_core::distfiles::extract_identity;
///
/// assert_eq!(extract_identity("foo-1.2.3.tar.gz"), Some("foo"));
/// assert_eq!(extract_identity("bar_4.5.tar.bz2"), Some("bar"));
/// assert_eq!(extract_identity("README"), None);
/// ```
pub fn extract_identity(file_name: &str) -> Option<&str> {
    file_name
        .as_bytes()
        .windows(2)
        .position(|pair| matches!(pair[0], b'-' | b'_') && pair[1].is_ascii_digit())
        .map(|at| &file_name[..at])
        .filter(|identity| !identity.is_empty())
}

/// Whether `file_name` is the leftover of an aborted or corrupt fetch.
///
/// Compares raw bytes, so names that are not valid UTF-8 are still
/// recognized.
pub fn is_stale_fetch(file_name: &OsStr) -> bool {
    name_contains(file_name, CHECKSUM_FAILURE)
}

/// Byte-exact substring test on a file name.
pub(crate) fn name_contains(file_name: &OsStr, fragment: &str) -> bool {
    let fragment = fragment.as_bytes();
    fragment.is_empty()
        || file_name
            .as_encoded_bytes()
            .windows(fragment.len())
            .any(|window| window == fragment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_separator_wins() {
        assert_eq!(extract_identity("gcc-13.2.0-patches-1.tar.xz"), Some("gcc"));
        assert_eq!(extract_identity("python-3.12_p1.tar.xz"), Some("python"));
    }

    #[test]
    fn test_hyphenated_names() {
        assert_eq!(extract_identity("xf86-video-intel-2.99.tar.bz2"), Some("xf86-video-intel"));
        assert_eq!(extract_identity("font-misc-misc-1.1.3.tar.xz"), Some("font-misc-misc"));
    }

    #[test]
    fn test_separator_without_digit_is_ignored() {
        assert_eq!(extract_identity("no-version-here.tar.gz"), None);
        assert_eq!(extract_identity("trailing-"), None);
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(extract_identity("Foo-1.0.tar.gz"), Some("Foo"));
        assert_ne!(extract_identity("Foo-1.0.tar.gz"), extract_identity("foo-1.0.tar.gz"));
    }

    #[test]
    fn test_empty_identity_is_unversioned() {
        assert_eq!(extract_identity("-1.0.tar.gz"), None);
    }

    #[test]
    fn test_stale_fetch_marker() {
        assert!(is_stale_fetch(OsStr::new("foo-1.0.tar.gz._checksum_failure_.abc123")));
        assert!(!is_stale_fetch(OsStr::new("foo-1.0.tar.gz")));
        assert!(!is_stale_fetch(OsStr::new("_checksum")));
    }

    #[cfg(unix)]
    #[test]
    fn test_stale_fetch_marker_in_non_utf8_name() {
        use std::os::unix::ffi::OsStrExt;
        assert!(is_stale_fetch(OsStr::from_bytes(b"\xff-1.0.tar.gz._checksum_failure_.1")));
        assert!(!is_stale_fetch(OsStr::from_bytes(b"\xff-1.0.tar.gz")));
    }
}
