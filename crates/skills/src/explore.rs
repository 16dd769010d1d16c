//! Repository exploration: shallow clone into a temp dir, then scan.
//!
//! Cloning is behind [`RepoFetcher`] so everything above it can be tested
//! against plain directories. [`GitCli`] shells out to `git`.

use std::path::{Path, PathBuf};

use {
    async_trait::async_trait,
    tokio::process::Command,
    tracing::{debug, info, warn},
};

use crate::{
    error::{Error, Result},
    scan::find_skill_candidates,
    types::SkillCandidate,
};

const TEMP_PREFIX: &str = "skillbox-explore-";
const DEFAULT_BRANCHES: &[&str] = &["main", "master"];

/// A branch advertised by a remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBranch {
    pub name: String,
    /// `main` or `master`.
    pub is_default: bool,
}

/// Parse `git ls-remote --heads` output. Default branches sort first, the
/// rest by name.
pub fn parse_ls_remote(output: &str) -> Vec<RemoteBranch> {
    let mut branches: Vec<RemoteBranch> = output
        .lines()
        .filter_map(|line| line.trim().split_once("refs/heads/"))
        .map(|(_, name)| name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| RemoteBranch {
            name: name.to_string(),
            is_default: DEFAULT_BRANCHES.contains(&name),
        })
        .collect();
    branches.sort_by(|a, b| {
        b.is_default
            .cmp(&a.is_default)
            .then_with(|| a.name.cmp(&b.name))
    });
    branches
}

/// Fetches remote repositories onto local disk.
#[async_trait]
pub trait RepoFetcher: Send + Sync {
    /// Clone `url` into `dest`, which must not exist yet.
    async fn clone_repo(&self, url: &str, branch: Option<&str>, dest: &Path) -> Result<()>;

    async fn remote_branches(&self, url: &str) -> Result<Vec<RemoteBranch>>;
}

/// [`RepoFetcher`] backed by the `git` binary.
#[derive(Debug, Clone, Copy)]
pub struct GitCli {
    /// `--depth` passed to `git clone`; 0 clones full history.
    pub depth: u32,
}

impl Default for GitCli {
    fn default() -> Self {
        Self { depth: 1 }
    }
}

impl GitCli {
    pub fn new(depth: u32) -> Self {
        Self { depth }
    }
}

#[async_trait]
impl RepoFetcher for GitCli {
    async fn clone_repo(&self, url: &str, branch: Option<&str>, dest: &Path) -> Result<()> {
        let mut cmd = Command::new("git");
        cmd.arg("clone");
        if self.depth > 0 {
            cmd.arg("--depth").arg(self.depth.to_string());
        }
        if let Some(branch) = branch {
            cmd.args(["--branch", branch]);
        }
        cmd.arg(url).arg(dest);

        let output = cmd
            .output()
            .await
            .map_err(|source| Error::command_execution("git clone", source))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::command_failed("git clone", stderr.trim()));
        }
        debug!(url, branch, dest = %dest.display(), "cloned repository");
        Ok(())
    }

    async fn remote_branches(&self, url: &str) -> Result<Vec<RemoteBranch>> {
        let output = Command::new("git")
            .args(["ls-remote", "--heads", url])
            .output()
            .await
            .map_err(|source| Error::command_execution("git ls-remote", source))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::command_failed("git ls-remote", stderr.trim()));
        }
        Ok(parse_ls_remote(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// A cloned repository waiting to be browsed and installed from.
///
/// The clone lives in a temp directory owned by whoever called
/// [`explore_repository`]; [`Exploration::cleanup`] removes it.
#[derive(Debug)]
pub struct Exploration {
    root: PathBuf,
    pub url: String,
    pub candidates: Vec<SkillCandidate>,
    /// Empty when a branch was requested or listing failed.
    pub branches: Vec<RemoteBranch>,
    cleaned: bool,
}

impl Exploration {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_cleaned(&self) -> bool {
        self.cleaned
    }

    /// Remove the clone. Safe to call more than once.
    pub async fn cleanup(&mut self) {
        if self.cleaned {
            return;
        }
        cleanup_temp(&self.root).await;
        self.cleaned = true;
    }
}

/// Best-effort recursive delete; never fails.
pub async fn cleanup_temp(path: &Path) {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => debug!(path = %path.display(), "removed exploration clone"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove exploration clone"),
    }
}

/// Fresh, not-yet-existing temp path for one exploration.
pub fn temp_clone_path() -> PathBuf {
    std::env::temp_dir().join(format!("{TEMP_PREFIX}{}", uuid::Uuid::new_v4().simple()))
}

/// Clone `url` into a fresh temp directory and scan it for candidates.
///
/// Remote branches are listed only when no branch was requested; a failed
/// listing is logged and leaves `branches` empty. Any clone or scan failure
/// removes the partial clone and surfaces as [`Error::Exploration`].
pub async fn explore_repository(
    fetcher: &dyn RepoFetcher,
    url: &str,
    branch: Option<&str>,
    max_depth: usize,
) -> Result<Exploration> {
    let root = temp_clone_path();
    info!(url, branch, "exploring repository");

    let candidates = match clone_and_scan(fetcher, url, branch, &root, max_depth).await {
        Ok(candidates) => candidates,
        Err(e) => {
            cleanup_temp(&root).await;
            return Err(Error::exploration(url, &e));
        },
    };

    let branches = match branch {
        Some(_) => Vec::new(),
        None => fetcher.remote_branches(url).await.unwrap_or_else(|e| {
            warn!(url, error = %e, "could not list remote branches");
            Vec::new()
        }),
    };

    debug!(
        url,
        root = %root.display(),
        candidates = candidates.len(),
        branches = branches.len(),
        "exploration ready"
    );
    Ok(Exploration {
        root,
        url: url.to_string(),
        candidates,
        branches,
        cleaned: false,
    })
}

async fn clone_and_scan(
    fetcher: &dyn RepoFetcher,
    url: &str,
    branch: Option<&str>,
    root: &Path,
    max_depth: usize,
) -> Result<Vec<SkillCandidate>> {
    fetcher.clone_repo(url, branch, root).await?;
    find_skill_candidates(root, max_depth).await
}


#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::{testing::FixtureFetcher, *};

    #[test]
    fn ls_remote_parsing_puts_defaults_first() {
        let raw = "\
a1b2\trefs/heads/feature/x
c3d4\trefs/heads/master
e5f6\trefs/heads/develop
0000\trefs/heads/main

garbage line
";
        let names: Vec<(String, bool)> = parse_ls_remote(raw)
            .into_iter()
            .map(|b| (b.name, b.is_default))
            .collect();
        assert_eq!(names, vec![
            ("main".into(), true),
            ("master".into(), true),
            ("develop".into(), false),
            ("feature/x".into(), false),
        ]);
    }

    #[test]
    fn temp_paths_are_unique_and_prefixed() {
        let a = temp_clone_path();
        let b = temp_clone_path();
        assert_ne!(a, b);
        let name = a.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(TEMP_PREFIX));
    }

    #[tokio::test]
    async fn explores_and_lists_branches_without_requested_branch() {
        let fetcher = FixtureFetcher {
            branches: parse_ls_remote("x\trefs/heads/main\n"),
            ..FixtureFetcher::with_files(&[("skills/pdf/SKILL.md", "# PDF"), ("README.md", "# Repo")])
        };

        let mut exploration = explore_repository(&fetcher, "https://example.com/r.git", None, 3)
            .await
            .unwrap();
        let paths: Vec<&str> = exploration.candidates.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec![".", "skills/pdf"]);
        assert_eq!(exploration.branches.len(), 1);
        assert!(exploration.root().exists());

        exploration.cleanup().await;
        assert!(!exploration.root().exists());
        assert!(exploration.is_cleaned());
        exploration.cleanup().await;
    }

    #[tokio::test]
    async fn requested_branch_skips_branch_listing() {
        let fetcher = FixtureFetcher::with_files(&[("a/skill.md", "# A")]);
        let mut exploration = explore_repository(&fetcher, "u", Some("dev"), 3)
            .await
            .unwrap();
        assert!(exploration.branches.is_empty());
        assert_eq!(*fetcher.branch_calls.lock().unwrap(), 0);
        let clones = fetcher.clones.lock().unwrap().clone();
        assert_eq!(clones[0].1.as_deref(), Some("dev"));
        exploration.cleanup().await;
    }

    #[tokio::test]
    async fn branch_listing_failure_is_not_fatal() {
        let fetcher = FixtureFetcher {
            fail_branches: true,
            ..FixtureFetcher::with_files(&[("a/skill.md", "# A")])
        };
        let mut exploration = explore_repository(&fetcher, "u", None, 3).await.unwrap();
        assert!(exploration.branches.is_empty());
        assert_eq!(exploration.candidates.len(), 1);
        exploration.cleanup().await;
    }

    #[tokio::test]
    async fn clone_failure_cleans_up_and_reports_exploration_error() {
        let fetcher = FixtureFetcher {
            fail_clone: true,
            ..FixtureFetcher::default()
        };
        let err = explore_repository(&fetcher, "https://bad/repo", None, 3)
            .await
            .unwrap_err();
        match err {
            Error::Exploration { url, message } => {
                assert_eq!(url, "https://bad/repo");
                assert!(message.contains("repository not found"));
            },
            other => panic!("unexpected error: {other}"),
        }
        let dest = fetcher.last_dest().unwrap();
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn cleanup_of_missing_path_is_silent() {
        let tmp = tempfile::tempdir().unwrap();
        cleanup_temp(&tmp.path().join("never-created")).await;
        cleanup_temp(&tmp.path().join("never-created")).await;
    }
}
