//! Skill repositories: classification, scanning, browsing listings,
//! exploration clones, installation, and IDE links.
//!
//! A skill is a directory carrying one of the indicator files
//! (`skill.json`, `SKILL.md`, `README.md`, ...). Directories with only loose
//! content files are resources; directories with subdirectories are browsable.

pub mod classify;
pub mod entries;
pub mod error;
pub mod explore;
pub mod install;
pub mod link;
pub mod scan;
pub mod types;

pub use {
    error::{Error, Recovered, Result},
    types::{ClassifiedEntry, EntryKind, SkillCandidate},
};
