//! Per-directory classification.
//!
//! Looks at one directory's immediate children only: which indicator file (if
//! any) wins, whether loose content files exist, and which subdirectories are
//! worth browsing. Never recurses.

use std::path::Path;

use crate::{error::Recovered, types::SkillCandidate};

/// Indicator files in priority order. The first one present wins.
pub const INDICATOR_FILES: &[&str] = &[
    "skill.json",
    "skill.yaml",
    "skill.yml",
    "skill.md",
    "SKILL.md",
    "index.md",
    "README.md",
];

/// Extensions of files that make a directory worth installing as a resource.
pub const CONTENT_EXTENSIONS: &[&str] = &[".md", ".txt", ".json", ".yaml", ".yml"];

/// Directory names (case-insensitive) never descended into.
pub const SKIP_DIRS: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    ".git",
    "test",
    "tests",
    "__tests__",
    "docs",
    "coverage",
    ".vscode",
    ".idea",
];

/// Maximum description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 100;

/// Hidden and well-known build/test/tooling directories are excluded from
/// every scan.
pub fn is_excluded_dir(name: &str) -> bool {
    if name.starts_with('.') {
        return true;
    }
    let lower = name.to_lowercase();
    SKIP_DIRS.contains(&lower.as_str())
}

fn is_content_file(name: &str) -> bool {
    !name.starts_with('.') && CONTENT_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Immediate children of a directory, split into files and directories.
/// Both lists are sorted by name.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub files: Vec<String>,
    pub dirs: Vec<String>,
}

impl Listing {
    pub async fn read(dir: &Path) -> std::io::Result<Self> {
        let mut listing = Self::default();
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry.file_type().await?;
            // Links may point outside the tree and are never copied on
            // install, so they are not listed at all.
            if file_type.is_symlink() {
                continue;
            }
            if file_type.is_dir() {
                listing.dirs.push(name);
            } else {
                listing.files.push(name);
            }
        }
        listing.files.sort();
        listing.dirs.sort();
        Ok(listing)
    }

    /// Winning indicator file, by priority.
    pub fn indicator(&self) -> Option<&'static str> {
        INDICATOR_FILES
            .iter()
            .copied()
            .find(|candidate| self.files.iter().any(|f| f.as_str() == *candidate))
    }

    pub fn has_content_files(&self) -> bool {
        self.files.iter().any(|f| is_content_file(f))
    }

    /// Subdirectories that scans may descend into.
    pub fn eligible_dirs(&self) -> impl Iterator<Item = &str> {
        self.dirs
            .iter()
            .map(String::as_str)
            .filter(|name| !is_excluded_dir(name))
    }

    pub fn has_browsable_children(&self) -> bool {
        self.eligible_dirs().next().is_some()
    }
}

/// File-presence facts about one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirProbe {
    pub indicator: Option<&'static str>,
    pub has_content_files: bool,
    pub has_browsable_children: bool,
    pub description: Option<String>,
}

impl DirProbe {
    pub fn has_skill_file(&self) -> bool {
        self.indicator.is_some()
    }
}

/// Gather the probe for `dir` from an already-read listing. Only the winning
/// indicator file is opened.
pub async fn probe(dir: &Path, listing: &Listing) -> DirProbe {
    let indicator = listing.indicator();
    let description = match indicator {
        Some(file) => read_description(&dir.join(file), file).await,
        None => None,
    };
    DirProbe {
        indicator,
        has_content_files: listing.has_content_files(),
        has_browsable_children: listing.has_browsable_children(),
        description,
    }
}

/// Classify a directory for the recursive scan.
///
/// Returns `Ok(None)` for noise: no indicator and no content file. An error
/// means the directory itself could not be listed.
pub async fn classify(
    name: &str,
    dir: &Path,
    path: &str,
) -> std::io::Result<Option<SkillCandidate>> {
    let listing = Listing::read(dir).await?;
    let probe = probe(dir, &listing).await;
    if !probe.has_skill_file() && !probe.has_content_files {
        return Ok(None);
    }
    Ok(Some(SkillCandidate {
        name: name.to_string(),
        path: path.to_string(),
        has_skill_file: probe.has_skill_file(),
        description: probe.description,
    }))
}

async fn read_description(path: &Path, indicator: &str) -> Option<String> {
    let is_json = indicator == "skill.json";
    if !is_json && !indicator.ends_with(".md") {
        return None;
    }
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) => {
            Recovered::DescriptionExtraction.absorb(path, &e);
            return None;
        },
    };
    if is_json {
        match description_from_json(&raw) {
            Ok(description) => description,
            Err(e) => {
                Recovered::DescriptionExtraction.absorb(path, &e);
                None
            },
        }
    } else {
        description_from_markdown(&raw)
    }
}

/// `description`, falling back to `name`, from a `skill.json` document.
pub fn description_from_json(raw: &str) -> Result<Option<String>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let pick = |key: &str| {
        value
            .get(key)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
            .map(|s| truncate_chars(s, DESCRIPTION_MAX_CHARS))
    };
    Ok(pick("description").or_else(|| pick("name")))
}

/// First `# ` heading, else the first non-empty line that is not a heading.
pub fn description_from_markdown(raw: &str) -> Option<String> {
    let lines = || raw.split('\n');
    let text = match lines().find(|l| l.trim().starts_with("# ")) {
        Some(title) => title.trim().trim_start_matches('#').trim(),
        None => lines()
            .find(|l| !l.trim().is_empty() && !l.starts_with('#'))?
            .trim(),
    };
    let text = truncate_chars(text, DESCRIPTION_MAX_CHARS);
    (!text.is_empty()).then_some(text)
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
