use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use {
    anyhow::{Context, bail},
    skillbox_config::{IdeTarget, SkillboxConfig},
    skillbox_skills::explore::{GitCli, RepoFetcher},
    tracing::debug,
};

/// Everything a command needs: resolved config, the project it works in, and
/// how repositories are fetched.
pub struct App {
    pub config: SkillboxConfig,
    pub project_root: PathBuf,
    fetcher: Arc<dyn RepoFetcher>,
}

impl App {
    pub fn new(config: SkillboxConfig, project_root: PathBuf, fetcher: Arc<dyn RepoFetcher>) -> Self {
        Self {
            config,
            project_root,
            fetcher,
        }
    }

    /// Load config and pick the project root. An explicitly requested config
    /// file must load; discovered ones fall back to defaults.
    pub fn load(config_path: Option<&Path>, project_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => skillbox_config::load_config(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => skillbox_config::discover_and_load(),
        };
        let project_root = match project_dir {
            Some(dir) => dir,
            None => std::env::current_dir().context("cannot determine the current directory")?,
        };
        debug!(
            project = %project_root.display(),
            skills_dir = %config.install.skills_dir.display(),
            "loaded config"
        );
        let fetcher = Arc::new(GitCli::new(config.explore.clone_depth));
        Ok(Self::new(config, project_root, fetcher))
    }

    pub fn fetcher(&self) -> &dyn RepoFetcher {
        self.fetcher.as_ref()
    }

    pub fn skills_dir(&self) -> PathBuf {
        self.project_root.join(&self.config.install.skills_dir)
    }

    pub fn max_depth(&self) -> usize {
        self.config.explore.max_depth
    }

    pub fn ides(&self) -> &[IdeTarget] {
        &self.config.link.ides
    }

    /// IDEs named on the command line. No names, or `all`, means every
    /// configured IDE.
    pub fn resolve_ides(&self, names: &[String], all: bool) -> anyhow::Result<Vec<&IdeTarget>> {
        if all || names.is_empty() {
            return Ok(self.ides().iter().collect());
        }
        let mut picked: Vec<&IdeTarget> = Vec::new();
        for name in names {
            let Some(ide) = self.config.link.find(name) else {
                bail!(
                    "unknown IDE '{name}' (configured: {})",
                    self.config.link.ids().join(", ")
                );
            };
            if !picked.iter().any(|p| p.id == ide.id) {
                picked.push(ide);
            }
        }
        Ok(picked)
    }
}
