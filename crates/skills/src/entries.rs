//! Single-level listings for the interactive browser.

use std::path::Path;

use {skillbox_common::relpath, tracing::debug};

use crate::{
    classify::{DirProbe, Listing, probe},
    error::{Error, Recovered, Result},
    types::{ClassifiedEntry, EntryKind},
};

/// Classify the immediate children of `rel` (relative to `root`).
///
/// Never recurses past one level: each child is listed once to decide
/// whether it is a skill, a browsable directory, or a loose resource.
/// Listing the root also surfaces the root itself as a `"."` entry when it
/// carries an indicator file.
///
/// Only an unreadable root is an error. A subdirectory that cannot be read
/// yields an empty listing so the caller can step back up.
pub async fn directory_entries(root: &Path, rel: &str) -> Result<Vec<ClassifiedEntry>> {
    let at_root = rel.is_empty() || rel == relpath::ROOT_ENTRY;
    let dir = relpath::resolve(root, rel);
    let listing = match Listing::read(&dir).await {
        Ok(listing) => listing,
        Err(source) if at_root => return Err(Error::RootUnreadable { path: dir, source }),
        Err(e) => {
            Recovered::ClassificationSkip.absorb(&dir, &e);
            return Ok(Vec::new());
        },
    };

    let mut entries = Vec::new();
    if at_root {
        let root_probe = probe(&dir, &listing).await;
        if root_probe.has_skill_file() {
            let name = root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| relpath::ROOT_ENTRY.to_string());
            entries.push(ClassifiedEntry {
                name,
                path: relpath::ROOT_ENTRY.to_string(),
                kind: EntryKind::Skill,
                description: root_probe.description,
            });
        }
    }

    let base = if at_root { "" } else { rel };
    for name in listing.eligible_dirs() {
        let child = dir.join(name);
        let child_listing = match Listing::read(&child).await {
            Ok(listing) => listing,
            Err(e) => {
                Recovered::ClassificationSkip.absorb(&child, &e);
                continue;
            },
        };
        let child_probe = probe(&child, &child_listing).await;
        let Some(kind) = entry_kind(&child_probe) else {
            continue;
        };
        entries.push(ClassifiedEntry {
            name: name.to_string(),
            path: relpath::join(base, name),
            kind,
            description: child_probe.description,
        });
    }

    sort_entries(&mut entries);
    debug!(dir = %dir.display(), count = entries.len(), "listed directory entries");
    Ok(entries)
}

/// Skill beats Directory beats Resource; `None` drops the directory.
fn entry_kind(probe: &DirProbe) -> Option<EntryKind> {
    if probe.has_skill_file() {
        Some(EntryKind::Skill)
    } else if probe.has_browsable_children {
        Some(EntryKind::Directory)
    } else if probe.has_content_files {
        Some(EntryKind::Resource)
    } else {
        None
    }
}

/// Display order: the root entry, then directories, skills, resources, each
/// group by name.
pub fn sort_entries(entries: &mut [ClassifiedEntry]) {
    entries.sort_by(|a, b| {
        b.is_root()
            .cmp(&a.is_root())
            .then_with(|| a.kind.cmp(&b.kind))
            .then_with(|| a.name.cmp(&b.name))
    });
}
