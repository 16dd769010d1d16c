//! Recursive candidate scan for non-interactive flows.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use {skillbox_common::relpath, tracing::debug};

use crate::{
    classify::{Listing, classify},
    error::{Error, Recovered, Result},
    types::SkillCandidate,
};

/// Deepest directory (root = 0) whose children get classified.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Walk `root` depth-first and collect every qualifying directory.
///
/// A directory at depth `d` has its children classified only while
/// `d <= max_depth`, so candidates are at most `max_depth + 1` segments deep.
/// Children are descended into whether or not they qualified themselves.
///
/// The root is added as `"."` only when it carries an indicator file; a root
/// that merely holds content files is not surfaced.
///
/// Output is sorted by segment count, then by path.
pub async fn find_skill_candidates(root: &Path, max_depth: usize) -> Result<Vec<SkillCandidate>> {
    let mut candidates = Vec::new();
    let mut seen = HashSet::new();
    let mut stack: Vec<(PathBuf, String, usize)> = vec![(root.to_path_buf(), String::new(), 0)];

    while let Some((dir, rel, depth)) = stack.pop() {
        if depth > max_depth {
            continue;
        }
        let listing = match Listing::read(&dir).await {
            Ok(listing) => listing,
            Err(source) if depth == 0 => {
                return Err(Error::RootUnreadable {
                    path: dir,
                    source,
                });
            },
            Err(e) => {
                Recovered::ClassificationSkip.absorb(&dir, &e);
                continue;
            },
        };

        let mut children = Vec::new();
        for name in listing.eligible_dirs() {
            let child = dir.join(name);
            let child_rel = relpath::join(&rel, name);
            match classify(name, &child, &child_rel).await {
                Ok(Some(candidate)) => {
                    if seen.insert(candidate.path.clone()) {
                        candidates.push(candidate);
                    }
                },
                Ok(None) => {},
                Err(e) => {
                    Recovered::ClassificationSkip.absorb(&child, &e);
                    continue;
                },
            }
            children.push((child, child_rel, depth + 1));
        }
        // Reversed so the first child is visited next.
        stack.extend(children.into_iter().rev());
    }

    let root_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| relpath::ROOT_ENTRY.to_string());
    if let Ok(Some(root_candidate)) = classify(&root_name, root, relpath::ROOT_ENTRY).await
        && root_candidate.has_skill_file
        && seen.insert(root_candidate.path.clone())
    {
        candidates.insert(0, root_candidate);
    }

    sort_candidates(&mut candidates);
    debug!(root = %root.display(), count = candidates.len(), "scanned for skill candidates");
    Ok(candidates)
}

/// Root first, then shallow before deep, then by path.
pub fn sort_candidates(candidates: &mut [SkillCandidate]) {
    candidates.sort_by(|a, b| {
        let not_root = |c: &SkillCandidate| c.path != relpath::ROOT_ENTRY;
        not_root(a)
            .cmp(&not_root(b))
            .then_with(|| relpath::depth(&a.path).cmp(&relpath::depth(&b.path)))
            .then_with(|| a.path.cmp(&b.path))
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn paths(candidates: &[SkillCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.path.as_str()).collect()
    }

    #[tokio::test]
    async fn finds_nested_skills_sorted_by_depth_then_path() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(root, "skills/zeta/SKILL.md", "# Zeta");
        write(root, "skills/alpha/skill.md", "# Alpha");
        write(root, "prompts/notes.txt", "loose");
        write(root, "b-top/index.md", "Top level");

        let found = find_skill_candidates(root, DEFAULT_MAX_DEPTH).await.unwrap();
        assert_eq!(paths(&found), vec![
            "b-top",
            "prompts",
            "skills/alpha",
            "skills/zeta"
        ]);
        let prompts = &found[1];
        assert!(!prompts.has_skill_file);
        assert_eq!(found[2].description.as_deref(), Some("Alpha"));
    }

    #[tokio::test]
    async fn descends_through_non_qualifying_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a/b/c/skill.json", r#"{"name": "deep"}"#);

        let found = find_skill_candidates(tmp.path(), DEFAULT_MAX_DEPTH).await.unwrap();
        assert_eq!(paths(&found), vec!["a/b/c"]);
        assert_eq!(found[0].description.as_deref(), Some("deep"));
    }

    #[tokio::test]
    async fn depth_bound_hides_deep_skills() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "one/two/three/skill.md", "# Three");
        write(tmp.path(), "l1/l2/l3/l4/l5/skill.md", "# Five");

        let found = find_skill_candidates(tmp.path(), 3).await.unwrap();
        let found = paths(&found);
        assert!(found.contains(&"one/two/three"));
        assert!(!found.contains(&"l1/l2/l3/l4/l5"));
    }

    #[tokio::test]
    async fn depth_zero_only_classifies_top_level() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "top/skill.md", "# Top");
        write(tmp.path(), "top/nested/skill.md", "# Nested");

        let found = find_skill_candidates(tmp.path(), 0).await.unwrap();
        assert_eq!(paths(&found), vec!["top"]);
    }

    #[tokio::test]
    async fn skips_hidden_and_system_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(root, ".git/HEAD.md", "ref");
        write(root, "node_modules/pkg/README.md", "# Pkg");
        write(root, ".vscode/settings.json", "{}");
        write(root, "Docs/guide/README.md", "# Guide");
        write(root, "valid/skill.md", "# Valid");

        let found = find_skill_candidates(root, DEFAULT_MAX_DEPTH).await.unwrap();
        assert_eq!(paths(&found), vec!["valid"]);
        assert!(found[0].has_skill_file);
    }

    #[tokio::test]
    async fn root_with_indicator_is_prepended() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "README.md", "# Whole Repo");
        write(tmp.path(), "zz/skill.md", "# Child");

        let found = find_skill_candidates(tmp.path(), DEFAULT_MAX_DEPTH).await.unwrap();
        assert_eq!(paths(&found), vec![".", "zz"]);
        assert_eq!(found[0].description.as_deref(), Some("Whole Repo"));
        assert!(found[0].has_skill_file);
    }

    #[tokio::test]
    async fn content_only_root_is_not_surfaced() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "notes.txt", "just notes");
        write(tmp.path(), "child/skill.md", "# Child");

        let found = find_skill_candidates(tmp.path(), DEFAULT_MAX_DEPTH).await.unwrap();
        assert_eq!(paths(&found), vec!["child"]);
    }

    #[tokio::test]
    async fn identical_trees_scan_identically() {
        let tmp = tempfile::tempdir().unwrap();
        for rel in ["x/skill.md", "y/README.md", "y/inner/notes.md", "a/b/data.json"] {
            write(tmp.path(), rel, "# t");
        }
        let first = find_skill_candidates(tmp.path(), DEFAULT_MAX_DEPTH).await.unwrap();
        let second = find_skill_candidates(tmp.path(), DEFAULT_MAX_DEPTH).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(paths(&first), vec!["x", "y", "a/b", "y/inner"]);
    }

    #[tokio::test]
    async fn missing_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = find_skill_candidates(&tmp.path().join("gone"), DEFAULT_MAX_DEPTH)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RootUnreadable { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_subtree_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "locked/inner/skill.md", "# Hidden");
        write(tmp.path(), "open/skill.md", "# Open");
        let locked = tmp.path().join("locked");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();
        // Root ignores the mode bits, so check what this process can see.
        let blocked = std::fs::read_dir(&locked).is_err();

        let found = find_skill_candidates(tmp.path(), DEFAULT_MAX_DEPTH).await;
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        let found = found.unwrap();
        let found = paths(&found);
        assert!(found.contains(&"open"));
        assert_eq!(found.contains(&"locked/inner"), !blocked);
        assert!(!found.contains(&"locked"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinked_dirs_are_not_followed() {
        let outside = tempfile::tempdir().unwrap();
        write(outside.path(), "host/skill.md", "# Host");
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "real/skill.md", "# Real");
        std::os::unix::fs::symlink(outside.path().join("host"), tmp.path().join("linked"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path(), tmp.path().join("real/up")).unwrap();

        let found = find_skill_candidates(tmp.path(), DEFAULT_MAX_DEPTH).await.unwrap();
        assert_eq!(paths(&found), vec!["real"]);
    }
}
