/// Config schema types (install location, exploration limits, IDE link targets).
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillboxConfig {
    pub install: InstallConfig,
    pub explore: ExploreConfig,
    pub link: LinkConfig,
}

/// Where installed skills live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Skills directory, relative to the project root unless absolute.
    pub skills_dir: PathBuf,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            skills_dir: PathBuf::from("skills"),
        }
    }
}

/// Repository exploration limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExploreConfig {
    /// Deepest directory (root = 0) whose children the candidate scan classifies.
    pub max_depth: usize,
    /// `git clone --depth` used for exploration clones.
    pub clone_depth: u32,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            clone_depth: 1,
        }
    }
}

/// IDE link targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub ides: Vec<IdeTarget>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            ides: vec![
                IdeTarget {
                    id: "claude".into(),
                    label: "Claude".into(),
                    dir: PathBuf::from(".claude/skills"),
                },
                IdeTarget {
                    id: "trae".into(),
                    label: "Trae".into(),
                    dir: PathBuf::from(".trae/skills"),
                },
            ],
        }
    }
}

impl LinkConfig {
    pub fn find(&self, id: &str) -> Option<&IdeTarget> {
        self.ides.iter().find(|ide| ide.id.eq_ignore_ascii_case(id))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.ides.iter().map(|ide| ide.id.as_str()).collect()
    }
}

/// A consumer directory that installed skills get linked into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeTarget {
    /// Short identifier used on the command line (`claude`).
    pub id: String,
    /// Display name.
    pub label: String,
    /// Skills directory relative to the project root (`.claude/skills`).
    pub dir: PathBuf,
}

impl std::fmt::Display for IdeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label, self.dir.display())
    }
}
