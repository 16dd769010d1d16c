//! Configuration loading for skillbox.
//!
//! Config files: `skillbox.toml`, `skillbox.yaml`, `skillbox.yml` or
//! `skillbox.json`, searched in `./` then in the user config directory.
//!
//! `SKILLBOX_SKILLS_DIR` and `SKILLBOX_MAX_DEPTH` override file values.

pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::{Error, Result},
    loader::{apply_env_overrides, config_dir, discover_and_load, load_config},
    schema::{ExploreConfig, IdeTarget, InstallConfig, LinkConfig, SkillboxConfig},
};
