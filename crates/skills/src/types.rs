use serde::{Deserialize, Serialize};

use skillbox_common::relpath;

/// What a classified directory is.
///
/// Declaration order is display order: places to go before things to pick,
/// declared skills before best-effort resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Browsable container, never selectable itself.
    Directory,
    /// Carries an indicator file.
    Skill,
    /// Loose content files, no indicator, no browsable children.
    Resource,
}

impl EntryKind {
    pub fn is_selectable(self) -> bool {
        !matches!(self, Self::Directory)
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directory => write!(f, "directory"),
            Self::Skill => write!(f, "skill"),
            Self::Resource => write!(f, "resource"),
        }
    }
}

/// One directory as seen by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedEntry {
    pub name: String,
    /// Relative to the scan root; `"."` is the root itself.
    pub path: String,
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ClassifiedEntry {
    pub fn is_root(&self) -> bool {
        self.path == relpath::ROOT_ENTRY
    }

    /// Case-insensitive substring match against name or description.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }

    pub fn to_candidate(&self) -> SkillCandidate {
        SkillCandidate {
            name: self.name.clone(),
            path: self.path.clone(),
            has_skill_file: self.kind == EntryKind::Skill,
            description: self.description.clone(),
        }
    }
}

/// Installable directory found by a scan or picked in the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCandidate {
    pub name: String,
    pub path: String,
    pub has_skill_file: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
