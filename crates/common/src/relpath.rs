//! Scan-root relative paths.
//!
//! Entries are keyed by `/`-separated paths relative to the scan root so keys
//! are identical on every platform. `""` is the root while browsing, `"."` is
//! the root when it is itself an entry.

use std::path::{Path, PathBuf};

/// Path of the entry that stands for the scan root itself.
pub const ROOT_ENTRY: &str = ".";

/// Append one segment to a relative path.
pub fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() || parent == ROOT_ENTRY {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// Parent of a relative path; top-level paths map to the root (`""`).
pub fn parent(path: &str) -> String {
    match path.trim_end_matches('/').rsplit_once('/') {
        Some((head, _)) => head.to_string(),
        None => String::new(),
    }
}

/// Number of segments, `"."` and top-level names both count as one.
pub fn depth(path: &str) -> usize {
    path.split('/').count()
}

/// Resolve a relative path against the scan root on disk.
pub fn resolve(root: &Path, path: &str) -> PathBuf {
    if path.is_empty() || path == ROOT_ENTRY {
        return root.to_path_buf();
    }
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |acc, segment| acc.join(segment))
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case("", "a", "a")]
    #[case(".", "a", "a")]
    #[case("a", "b", "a/b")]
    #[case("a/b", "c", "a/b/c")]
    fn join_segments(#[case] parent_path: &str, #[case] name: &str, #[case] expected: &str) {
        assert_eq!(join(parent_path, name), expected);
    }

    #[rstest]
    #[case("a", "")]
    #[case("a/b", "a")]
    #[case("a/b/c", "a/b")]
    #[case("a/b/", "a")]
    fn parent_of(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(parent(path), expected);
    }

    #[test]
    fn depth_counts_segments() {
        assert_eq!(depth("."), 1);
        assert_eq!(depth("skills"), 1);
        assert_eq!(depth("skills/a/b"), 3);
    }

    #[test]
    fn resolve_handles_root_markers() {
        let root = Path::new("/tmp/repo");
        assert_eq!(resolve(root, ""), root);
        assert_eq!(resolve(root, "."), root);
        assert_eq!(resolve(root, "a/b"), root.join("a").join("b"));
    }
}
