//! Directory symlinks from IDE skill folders to installed skills.

use std::path::{Path, PathBuf};

use {
    serde::Serialize,
    skillbox_config::IdeTarget,
    tracing::{debug, info},
};

use crate::error::{Context, Error, Result};

/// A link that was just created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkTarget {
    pub ide: String,
    pub skill_id: String,
    /// Absolute path of the installed skill.
    pub source: PathBuf,
    /// Path of the symlink inside the IDE folder.
    pub target: PathBuf,
}

/// One entry of an IDE skills folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedSkill {
    pub skill_id: String,
    pub target: PathBuf,
    /// Where the link points; `None` for plain directories or files.
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkStatus {
    pub exists: bool,
    /// A symlink whose source still exists.
    pub valid: bool,
    pub source: Option<PathBuf>,
}

pub fn ide_skills_dir(project_root: &Path, ide: &IdeTarget) -> PathBuf {
    project_root.join(&ide.dir)
}

/// Link `source` into the IDE's skills folder as `skill_id`.
pub async fn link_skill(
    source: &Path,
    skill_id: &str,
    ide: &IdeTarget,
    project_root: &Path,
) -> Result<LinkTarget> {
    let source = std::path::absolute(source).path_context(source)?;
    let target = ide_skills_dir(project_root, ide).join(skill_id);
    create_symlink(&source, &target).await?;
    info!(skill = skill_id, ide = %ide.id, target = %target.display(), "linked skill");
    Ok(LinkTarget {
        ide: ide.id.clone(),
        skill_id: skill_id.to_string(),
        source,
        target,
    })
}

/// Remove the skill's link from an IDE folder. Real directories and files
/// are left alone. Returns whether a link was removed.
pub async fn unlink_skill(skill_id: &str, ide: &IdeTarget, project_root: &Path) -> Result<bool> {
    let target = ide_skills_dir(project_root, ide).join(skill_id);
    match tokio::fs::symlink_metadata(&target).await {
        Ok(meta) if meta.file_type().is_symlink() => {
            remove_link(&target).await?;
            debug!(skill = skill_id, ide = %ide.id, "unlinked skill");
            Ok(true)
        },
        Ok(_) => Ok(false),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Everything in the IDE's skills folder, sorted by id.
pub async fn linked_skills(ide: &IdeTarget, project_root: &Path) -> Result<Vec<LinkedSkill>> {
    let dir = ide_skills_dir(project_root, ide);
    let mut entries = match tokio::fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut linked = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let target = entry.path();
        let source = if entry.file_type().await?.is_symlink() {
            tokio::fs::read_link(&target).await.ok()
        } else {
            None
        };
        linked.push(LinkedSkill {
            skill_id: entry.file_name().to_string_lossy().into_owned(),
            target,
            source,
        });
    }
    linked.sort_by(|a, b| a.skill_id.cmp(&b.skill_id));
    Ok(linked)
}

/// Inspect one link. A dangling link exists but is not valid.
pub async fn link_status(skill_id: &str, ide: &IdeTarget, project_root: &Path) -> LinkStatus {
    let target = ide_skills_dir(project_root, ide).join(skill_id);
    let Ok(meta) = tokio::fs::symlink_metadata(&target).await else {
        return LinkStatus::default();
    };
    if !meta.file_type().is_symlink() {
        return LinkStatus {
            exists: true,
            ..LinkStatus::default()
        };
    }
    let Ok(source) = tokio::fs::read_link(&target).await else {
        return LinkStatus {
            exists: true,
            ..LinkStatus::default()
        };
    };
    let resolved = match target.parent() {
        Some(parent) if source.is_relative() => parent.join(&source),
        _ => source.clone(),
    };
    LinkStatus {
        exists: true,
        valid: tokio::fs::try_exists(&resolved).await.unwrap_or(false),
        source: Some(source),
    }
}

/// Point `target` at `source`, replacing an old link or file. A real
/// directory at `target` is never touched.
pub async fn create_symlink(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .path_context(parent)?;
    }

    match tokio::fs::symlink_metadata(target).await {
        Ok(meta) if meta.file_type().is_symlink() || meta.is_file() => remove_link(target).await?,
        Ok(_) => {
            return Err(Error::LinkTargetIsDirectory {
                path: target.to_path_buf(),
            });
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
        Err(e) => return Err(e.into()),
    }

    #[cfg(unix)]
    tokio::fs::symlink(source, target).await?;
    #[cfg(windows)]
    tokio::fs::symlink_dir(source, target).await?;
    Ok(())
}

#[cfg(not(windows))]
async fn remove_link(path: &Path) -> Result<()> {
    tokio::fs::remove_file(path).await?;
    Ok(())
}

// Directory symlinks on Windows must be removed as directories.
#[cfg(windows)]
async fn remove_link(path: &Path) -> Result<()> {
    if tokio::fs::remove_file(path).await.is_err() {
        tokio::fs::remove_dir(path).await?;
    }
    Ok(())
}
