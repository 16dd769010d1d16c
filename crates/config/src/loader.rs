use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    schema::SkillboxConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "skillbox.toml",
    "skillbox.yaml",
    "skillbox.yml",
    "skillbox.json",
];

const ENV_SKILLS_DIR: &str = "SKILLBOX_SKILLS_DIR";
const ENV_MAX_DEPTH: &str = "SKILLBOX_MAX_DEPTH";

/// Load config from the given path (any supported format), then apply env
/// overrides.
pub fn load_config(path: &Path) -> Result<SkillboxConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = parse_config(&raw, path)?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    Ok(config)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./skillbox.{toml,yaml,yml,json}` (project-local)
/// 2. `<user config dir>/skillbox.{toml,yaml,yml,json}` (user-global)
///
/// Falls back to `SkillboxConfig::default()` (plus env overrides) when no file
/// is found or the file is malformed.
pub fn discover_and_load() -> SkillboxConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }

    let mut config = SkillboxConfig::default();
    if let Err(e) = apply_env_overrides(&mut config, |name| std::env::var(name).ok()) {
        warn!(error = %e, "ignoring invalid environment override");
    }
    config
}

/// Returns the user-global config directory.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "skillbox").map(|d| d.config_dir().to_path_buf())
}

/// Apply `SKILLBOX_*` overrides using a custom lookup so tests never touch
/// the process environment.
pub fn apply_env_overrides(
    config: &mut SkillboxConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(dir) = lookup(ENV_SKILLS_DIR).filter(|v| !v.trim().is_empty()) {
        config.install.skills_dir = PathBuf::from(dir.trim());
    }
    if let Some(raw) = lookup(ENV_MAX_DEPTH) {
        config.explore.max_depth = raw.trim().parse().map_err(|_| Error::InvalidOverride {
            key: ENV_MAX_DEPTH,
            value: raw.clone(),
        })?;
    }
    Ok(())
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

fn parse_config(raw: &str, path: &Path) -> Result<SkillboxConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => Err(Error::UnsupportedFormat {
            extension: ext.to_string(),
        }),
    }
}
