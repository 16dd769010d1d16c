//! Installing skills into the local skills directory.
//!
//! Everything lands at `<skills dir>/<skill id>` as a plain copy with no
//! `.git` directory and no symlinks.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use {
    serde::{Deserialize, Serialize},
    skillbox_common::relpath,
    tracing::{debug, info, warn},
};

use crate::{
    error::{Context, Error, Result},
    explore::RepoFetcher,
    types::SkillCandidate,
};

const GIT_DIR: &str = ".git";
const ID_PREFIX: &str = "skill-";

/// Where a directly downloaded skill comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkillSource {
    Git {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        branch: Option<String>,
        /// Only this subdirectory of the repository becomes the skill.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subdir: Option<String>,
    },
    Local {
        path: PathBuf,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subdir: Option<String>,
    },
}

/// A skill now present in the skills directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledSkill {
    pub id: String,
    pub path: PathBuf,
}

/// Id derived from a repository URL: last segment without `.git` and
/// without a leading `skill-`.
pub fn default_skill_id(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let last = trimmed
        .rsplit(['/', '\\', ':'])
        .next()
        .unwrap_or(trimmed);
    let last = last.strip_suffix(".git").unwrap_or(last);
    last.strip_prefix(ID_PREFIX).unwrap_or(last).to_string()
}

/// Skill ids become a single directory name.
pub fn validate_skill_id(id: &str) -> Result<()> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(Error::message("skill id is required"));
    }
    if trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\']) {
        return Err(Error::message(format!(
            "invalid skill id '{id}': must be a single directory name"
        )));
    }
    Ok(())
}

pub async fn skill_exists(target_dir: &Path, skill_id: &str) -> bool {
    tokio::fs::try_exists(target_dir.join(skill_id))
        .await
        .unwrap_or(false)
}

/// Delete an installed skill. Returns whether anything was removed.
pub async fn remove_skill(target_dir: &Path, skill_id: &str) -> Result<bool> {
    validate_skill_id(skill_id)?;
    let path = target_dir.join(skill_id);
    if !tokio::fs::try_exists(&path).await? {
        return Ok(false);
    }
    remove_existing(&path).await?;
    info!(skill = skill_id, "removed skill");
    Ok(true)
}

/// Installed skill ids, sorted. A missing skills directory means none.
pub async fn list_local_skills(target_dir: &Path) -> Result<Vec<String>> {
    let mut entries = match tokio::fs::read_dir(target_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut ids = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            ids.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    ids.sort();
    Ok(ids)
}

/// Copy one explored entry (`"."` for the whole clone) to
/// `target_dir/skill_id`, replacing whatever is there.
pub async fn copy_from_exploration(
    root: &Path,
    entry_path: &str,
    target_dir: &Path,
    skill_id: &str,
) -> Result<PathBuf> {
    validate_skill_id(skill_id)?;
    let source = relpath::resolve(root, entry_path);
    let meta = match tokio::fs::symlink_metadata(&source).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::SourceNotFound { path: source });
        },
        Err(e) => return Err(e.into()),
    };
    if meta.file_type().is_symlink() {
        return Err(Error::SymlinkedSource { path: source });
    }
    let dest = target_dir.join(skill_id);
    replace_with_copy(source, dest.clone()).await?;
    debug!(entry = entry_path, dest = %dest.display(), "copied skill from exploration");
    Ok(dest)
}

/// Download a skill straight from its source, replacing an existing install.
pub async fn download_skill(
    fetcher: &dyn RepoFetcher,
    source: &SkillSource,
    target_dir: &Path,
    skill_id: &str,
) -> Result<InstalledSkill> {
    validate_skill_id(skill_id)?;
    let dest = target_dir.join(skill_id);
    tokio::fs::create_dir_all(target_dir)
        .await
        .path_context(target_dir)?;

    match source {
        SkillSource::Git {
            url,
            branch,
            subdir,
        } => {
            if tokio::fs::try_exists(&dest).await? {
                remove_existing(&dest).await?;
            }
            fetcher.clone_repo(url, branch.as_deref(), &dest).await?;
            if let Some(subdir) = subdir {
                hoist_subdir(target_dir, &dest, skill_id, subdir).await?;
            }
            let git_dir = dest.join(GIT_DIR);
            if tokio::fs::try_exists(&git_dir).await? {
                tokio::fs::remove_dir_all(&git_dir).await?;
            }
        },
        SkillSource::Local { path, subdir } => {
            let source = match subdir {
                Some(subdir) => relpath::resolve(path, subdir),
                None => path.clone(),
            };
            if !tokio::fs::try_exists(&source).await? {
                return Err(Error::SourceNotFound { path: source });
            }
            replace_with_copy(source, dest.clone()).await?;
        },
    }

    info!(skill = skill_id, dest = %dest.display(), "downloaded skill");
    Ok(InstalledSkill {
        id: skill_id.to_string(),
        path: dest,
    })
}

/// Make `dest/subdir` the whole of `dest`. A missing subdir keeps the full
/// clone.
async fn hoist_subdir(target_dir: &Path, dest: &Path, skill_id: &str, subdir: &str) -> Result<()> {
    let nested = relpath::resolve(dest, subdir);
    if !tokio::fs::try_exists(&nested).await? {
        warn!(subdir, skill = skill_id, "subdirectory not found, keeping whole repository");
        return Ok(());
    }
    let staging = target_dir.join(format!("{skill_id}_temp"));
    if tokio::fs::try_exists(&staging).await? {
        remove_existing(&staging).await?;
    }
    tokio::fs::rename(&nested, &staging).await?;
    tokio::fs::remove_dir_all(dest).await?;
    tokio::fs::rename(&staging, dest).await?;
    Ok(())
}

async fn remove_existing(path: &Path) -> Result<()> {
    let meta = tokio::fs::symlink_metadata(path).await?;
    if meta.is_dir() {
        tokio::fs::remove_dir_all(path).await?;
    } else {
        tokio::fs::remove_file(path).await?;
    }
    Ok(())
}

async fn replace_with_copy(source: PathBuf, dest: PathBuf) -> Result<()> {
    if tokio::fs::try_exists(&dest).await? {
        remove_existing(&dest).await?;
    }
    tokio::task::spawn_blocking(move || copy_dir_recursive(&source, &dest)).await?
}

/// Copy a tree, leaving out the top-level `.git` and every symlink.
fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;

    let walker = walkdir::WalkDir::new(src)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_name() == GIT_DIR));
    for entry in walker {
        let entry = entry?;
        let relative = entry.path().strip_prefix(src)?;
        let target = dest.join(relative);

        if entry.file_type().is_symlink() {
            debug!(path = %entry.path().display(), "skipping symlink");
        } else if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

/// One selected candidate and the id it would be installed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedInstall {
    pub candidate: SkillCandidate,
    pub skill_id: String,
}

/// Selected candidates split by whether their id is already taken.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallPlan {
    pub ready: Vec<PlannedInstall>,
    pub conflicts: Vec<PlannedInstall>,
}

/// What to do with candidates whose id is already installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictPolicy {
    Overwrite,
    /// New id per conflict, in order; `None` drops that one.
    Rename(Vec<Option<String>>),
    Skip,
    Reselect,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Install(Vec<PlannedInstall>),
    Reselect,
    Cancel,
}

/// Pair each candidate with its id and check for taken ids.
///
/// An id is taken when it is already installed or an earlier candidate in
/// the same selection claimed it (`en/pdf` and `zh/pdf` both want `pdf`).
/// The root entry (`"."`) has no meaningful name of its own, so it is
/// installed as `root_id`.
pub async fn plan_install(
    candidates: Vec<SkillCandidate>,
    target_dir: &Path,
    root_id: &str,
) -> InstallPlan {
    let mut plan = InstallPlan::default();
    let mut claimed: HashSet<String> = HashSet::new();
    for candidate in candidates {
        let skill_id = if candidate.path == relpath::ROOT_ENTRY {
            root_id.to_string()
        } else {
            candidate.name.clone()
        };
        let taken = !claimed.insert(skill_id.clone()) || skill_exists(target_dir, &skill_id).await;
        let planned = PlannedInstall {
            candidate,
            skill_id,
        };
        if taken {
            plan.conflicts.push(planned);
        } else {
            plan.ready.push(planned);
        }
    }
    plan
}

impl InstallPlan {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn resolve(self, policy: ConflictPolicy) -> Result<Resolution> {
        let Self {
            mut ready,
            conflicts,
        } = self;
        let mut claimed: HashSet<String> = ready.iter().map(|p| p.skill_id.clone()).collect();
        match policy {
            // Replaces installed skills, but never lets two picks share an id.
            ConflictPolicy::Overwrite => {
                for planned in conflicts {
                    if claimed.insert(planned.skill_id.clone()) {
                        ready.push(planned);
                    } else {
                        warn!(
                            skill = %planned.skill_id,
                            path = %planned.candidate.path,
                            "skipping duplicate skill id"
                        );
                    }
                }
                Ok(Resolution::Install(ready))
            },
            ConflictPolicy::Rename(ids) => {
                if ids.len() != conflicts.len() {
                    return Err(Error::message(format!(
                        "expected {} new ids, got {}",
                        conflicts.len(),
                        ids.len()
                    )));
                }
                for (mut planned, id) in conflicts.into_iter().zip(ids) {
                    let Some(id) = id else {
                        continue;
                    };
                    let id = id.trim().to_string();
                    validate_skill_id(&id)?;
                    if !claimed.insert(id.clone()) {
                        return Err(Error::message(format!(
                            "skill id '{id}' is used twice in this install"
                        )));
                    }
                    planned.skill_id = id;
                    ready.push(planned);
                }
                Ok(Resolution::Install(ready))
            },
            ConflictPolicy::Skip => Ok(Resolution::Install(ready)),
            ConflictPolicy::Reselect => Ok(Resolution::Reselect),
            ConflictPolicy::Cancel => Ok(Resolution::Cancel),
        }
    }
}

/// Outcome of installing several skills; one failure does not stop the rest.
#[derive(Debug, Default)]
pub struct InstallReport {
    pub installed: Vec<InstalledSkill>,
    pub failed: Vec<(String, Error)>,
}

pub async fn install_planned(
    root: &Path,
    planned: &[PlannedInstall],
    target_dir: &Path,
) -> InstallReport {
    let mut report = InstallReport::default();
    for item in planned {
        match copy_from_exploration(root, &item.candidate.path, target_dir, &item.skill_id).await {
            Ok(path) => report.installed.push(InstalledSkill {
                id: item.skill_id.clone(),
                path,
            }),
            Err(e) => {
                warn!(skill = %item.skill_id, error = %e, "install failed");
                report.failed.push((item.skill_id.clone(), e));
            },
        }
    }
    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, crate::explore::testing::FixtureFetcher, rstest::rstest};

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn candidate(name: &str, path: &str) -> SkillCandidate {
        SkillCandidate {
            name: name.into(),
            path: path.into(),
            has_skill_file: true,
            description: None,
        }
    }

    #[rstest]
    #[case("https://github.com/acme/skill-pdf.git", "pdf")]
    #[case("https://github.com/acme/writer/", "writer")]
    #[case("git@github.com:acme/skill-review.git", "review")]
    #[case("/home/me/skills/local-skill", "local-skill")]
    #[case("repo", "repo")]
    fn default_ids(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(default_skill_id(url), expected);
    }

    #[rstest]
    #[case("pdf", true)]
    #[case("  ", false)]
    #[case("..", false)]
    #[case("a/b", false)]
    #[case("a\\b", false)]
    fn skill_id_validation(#[case] id: &str, #[case] ok: bool) {
        assert_eq!(validate_skill_id(id).is_ok(), ok);
    }

    #[tokio::test]
    async fn copies_nested_entry_without_git() {
        let clone = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        write(clone.path(), "skills/pdf/SKILL.md", "# PDF");
        write(clone.path(), "skills/pdf/ref/forms.md", "forms");
        write(clone.path(), "skills/pdf/.git/HEAD", "ref");

        let dest = copy_from_exploration(clone.path(), "skills/pdf", target.path(), "pdf")
            .await
            .unwrap();
        assert_eq!(dest, target.path().join("pdf"));
        assert!(dest.join("SKILL.md").is_file());
        assert!(dest.join("ref/forms.md").is_file());
        assert!(!dest.join(".git").exists());
    }

    #[tokio::test]
    async fn copies_root_entry_and_replaces_existing() {
        let clone = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        write(clone.path(), "README.md", "# Whole");
        write(clone.path(), ".git/config", "x");
        write(target.path(), "whole/stale.md", "old");

        let dest = copy_from_exploration(clone.path(), ".", target.path(), "whole")
            .await
            .unwrap();
        assert!(dest.join("README.md").is_file());
        assert!(!dest.join("stale.md").exists());
        assert!(!dest.join(".git").exists());
    }

    #[tokio::test]
    async fn missing_entry_is_source_not_found() {
        let clone = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let err = copy_from_exploration(clone.path(), "nope", target.path(), "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SourceNotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_are_not_copied() {
        let clone = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        write(clone.path(), "s/skill.md", "# S");
        std::os::unix::fs::symlink("/etc/hostname", clone.path().join("s/escape")).unwrap();

        let dest = copy_from_exploration(clone.path(), "s", target.path(), "s")
            .await
            .unwrap();
        assert!(dest.join("skill.md").is_file());
        assert!(std::fs::symlink_metadata(dest.join("escape")).is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinked_entry_is_refused() {
        let outside = tempfile::tempdir().unwrap();
        write(outside.path(), "host/SKILL.md", "# Host");
        let clone = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path().join("host"), clone.path().join("linked"))
            .unwrap();
        let target = tempfile::tempdir().unwrap();

        let err = copy_from_exploration(clone.path(), "linked", target.path(), "linked")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SymlinkedSource { .. }));
        assert!(!target.path().join("linked").exists());
    }

    #[tokio::test]
    async fn plan_splits_conflicts_and_names_root() {
        let target = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(target.path().join("pdf")).unwrap();

        let plan = plan_install(
            vec![
                candidate("clone-dir", "."),
                candidate("pdf", "skills/pdf"),
                candidate("docx", "skills/docx"),
            ],
            target.path(),
            "repo",
        )
        .await;
        let ready: Vec<&str> = plan.ready.iter().map(|p| p.skill_id.as_str()).collect();
        assert_eq!(ready, vec!["repo", "docx"]);
        assert_eq!(plan.conflicts.len(), 1);
        assert_eq!(plan.conflicts[0].skill_id, "pdf");
        assert!(plan.has_conflicts());
    }

    #[tokio::test]
    async fn same_name_twice_in_one_selection_conflicts() {
        let clone = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        write(clone.path(), "en/pdf/skill.md", "# EN");
        write(clone.path(), "zh/pdf/skill.md", "# ZH");

        let plan = plan_install(
            vec![candidate("pdf", "en/pdf"), candidate("pdf", "zh/pdf")],
            target.path(),
            "repo",
        )
        .await;
        assert_eq!(plan.ready.len(), 1);
        assert_eq!(plan.ready[0].candidate.path, "en/pdf");
        assert_eq!(plan.conflicts.len(), 1);
        assert_eq!(plan.conflicts[0].candidate.path, "zh/pdf");

        // Overwriting installed skills still keeps one pick per id.
        let Resolution::Install(items) = plan.clone().resolve(ConflictPolicy::Overwrite).unwrap()
        else {
            panic!("expected install");
        };
        assert_eq!(items.len(), 1);
        let report = install_planned(clone.path(), &items, target.path()).await;
        assert_eq!(report.installed.len(), 1);
        assert_eq!(
            std::fs::read_to_string(target.path().join("pdf/skill.md")).unwrap(),
            "# EN"
        );

        let Resolution::Install(items) = plan
            .resolve(ConflictPolicy::Rename(vec![Some("pdf-zh".into())]))
            .unwrap()
        else {
            panic!("expected install");
        };
        let report = install_planned(clone.path(), &items, target.path()).await;
        assert_eq!(report.installed.len(), 2);
        assert_eq!(
            std::fs::read_to_string(target.path().join("pdf-zh/skill.md")).unwrap(),
            "# ZH"
        );
    }

    #[test]
    fn rename_onto_a_picked_id_is_rejected() {
        let err = conflicted_plan()
            .resolve(ConflictPolicy::Rename(vec![Some("new".into()), None]))
            .unwrap_err();
        assert!(err.to_string().contains("'new' is used twice"));
    }

    fn conflicted_plan() -> InstallPlan {
        let planned = |name: &str| PlannedInstall {
            candidate: candidate(name, name),
            skill_id: name.into(),
        };
        InstallPlan {
            ready: vec![planned("new")],
            conflicts: vec![planned("a"), planned("b")],
        }
    }

    fn ids(resolution: Resolution) -> Vec<String> {
        match resolution {
            Resolution::Install(items) => items.into_iter().map(|p| p.skill_id).collect(),
            other => panic!("expected install, got {other:?}"),
        }
    }

    #[test]
    fn conflict_policies() {
        assert_eq!(
            ids(conflicted_plan().resolve(ConflictPolicy::Overwrite).unwrap()),
            vec!["new", "a", "b"]
        );
        assert_eq!(
            ids(conflicted_plan().resolve(ConflictPolicy::Skip).unwrap()),
            vec!["new"]
        );
        assert_eq!(
            ids(conflicted_plan()
                .resolve(ConflictPolicy::Rename(vec![Some(" a-new ".into()), None]))
                .unwrap()),
            vec!["new", "a-new"]
        );
        assert_eq!(
            conflicted_plan().resolve(ConflictPolicy::Reselect).unwrap(),
            Resolution::Reselect
        );
        assert_eq!(
            conflicted_plan().resolve(ConflictPolicy::Cancel).unwrap(),
            Resolution::Cancel
        );
    }

    #[test]
    fn rename_needs_one_id_per_conflict() {
        assert!(
            conflicted_plan()
                .resolve(ConflictPolicy::Rename(vec![Some("x".into())]))
                .is_err()
        );
        assert!(
            conflicted_plan()
                .resolve(ConflictPolicy::Rename(vec![Some("x/y".into()), None]))
                .is_err()
        );
    }

    #[tokio::test]
    async fn install_planned_reports_failures_and_continues() {
        let clone = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        write(clone.path(), "ok/skill.md", "# Ok");

        let planned = vec![
            PlannedInstall {
                candidate: candidate("gone", "gone"),
                skill_id: "gone".into(),
            },
            PlannedInstall {
                candidate: candidate("ok", "ok"),
                skill_id: "ok-renamed".into(),
            },
        ];
        let report = install_planned(clone.path(), &planned, target.path()).await;
        assert_eq!(report.installed.len(), 1);
        assert_eq!(report.installed[0].id, "ok-renamed");
        assert!(target.path().join("ok-renamed/skill.md").is_file());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "gone");
    }

    #[tokio::test]
    async fn git_download_hoists_subdir_and_drops_git() {
        let target = tempfile::tempdir().unwrap();
        let fetcher = FixtureFetcher::with_files(&[
            ("README.md", "# Repo"),
            ("skills/pdf/SKILL.md", "# PDF"),
        ]);
        let source = SkillSource::Git {
            url: "https://example.com/skill-pdf.git".into(),
            branch: Some("main".into()),
            subdir: Some("skills/pdf".into()),
        };

        let installed = download_skill(&fetcher, &source, target.path(), "pdf")
            .await
            .unwrap();
        assert_eq!(installed.path, target.path().join("pdf"));
        assert!(installed.path.join("SKILL.md").is_file());
        assert!(!installed.path.join("README.md").exists());
        assert!(!installed.path.join(".git").exists());
        assert!(!target.path().join("pdf_temp").exists());
    }

    #[tokio::test]
    async fn git_download_with_missing_subdir_keeps_whole_repo() {
        let target = tempfile::tempdir().unwrap();
        let fetcher = FixtureFetcher::with_files(&[("README.md", "# Repo")]);
        let source = SkillSource::Git {
            url: "u".into(),
            branch: None,
            subdir: Some("nope".into()),
        };
        let installed = download_skill(&fetcher, &source, target.path(), "repo")
            .await
            .unwrap();
        assert!(installed.path.join("README.md").is_file());
        assert!(!installed.path.join(".git").exists());
    }

    #[tokio::test]
    async fn local_download_copies_subdir() {
        let src = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        write(src.path(), "pack/writer/skill.md", "# Writer");

        let source = SkillSource::Local {
            path: src.path().to_path_buf(),
            subdir: Some("pack/writer".into()),
        };
        let installed = download_skill(&FixtureFetcher::default(), &source, target.path(), "writer")
            .await
            .unwrap();
        assert!(installed.path.join("skill.md").is_file());

        let missing = SkillSource::Local {
            path: src.path().join("absent"),
            subdir: None,
        };
        let err = download_skill(&FixtureFetcher::default(), &missing, target.path(), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SourceNotFound { .. }));
    }

    #[tokio::test]
    async fn list_exists_and_remove() {
        let target = tempfile::tempdir().unwrap();
        assert!(
            list_local_skills(&target.path().join("missing"))
                .await
                .unwrap()
                .is_empty()
        );

        write(target.path(), "zeta/skill.md", "z");
        write(target.path(), "alpha/skill.md", "a");
        write(target.path(), "stray.txt", "not a skill");
        assert_eq!(list_local_skills(target.path()).await.unwrap(), vec![
            "alpha", "zeta"
        ]);
        assert!(skill_exists(target.path(), "alpha").await);

        assert!(remove_skill(target.path(), "alpha").await.unwrap());
        assert!(!remove_skill(target.path(), "alpha").await.unwrap());
        assert!(!skill_exists(target.path(), "alpha").await);
    }
}
