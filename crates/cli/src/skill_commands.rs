use std::path::{Path, PathBuf};

use {
    anyhow::{Context, bail},
    clap::Args,
    skillbox_browse::{Choice, NoteLevel, Prompter},
    skillbox_config::IdeTarget,
    skillbox_skills::{
        install::{
            InstalledSkill, SkillSource, default_skill_id, download_skill, list_local_skills,
            remove_skill, skill_exists,
        },
        link::{link_skill, link_status, linked_skills, unlink_skill},
    },
};

use crate::app::App;

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct DownloadArgs {
    /// Git repository URL.
    pub url: String,
    #[arg(short, long)]
    pub branch: Option<String>,
    /// Install only this subdirectory of the repository.
    #[arg(short, long)]
    pub subdir: Option<String>,
    /// Skill id (defaults to the repository name without a `skill-` prefix).
    #[arg(short, long)]
    pub id: Option<String>,
    /// Link the skill into every configured IDE afterwards.
    #[arg(short, long)]
    pub link: bool,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct IdeArgs {
    /// Skill id.
    pub id: String,
    /// IDE to target; repeatable. Defaults to every configured IDE.
    #[arg(long = "ide")]
    pub ides: Vec<String>,
    /// Target every configured IDE.
    #[arg(short, long)]
    pub all: bool,
}

pub async fn handle_download(
    app: &App,
    args: DownloadArgs,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<()> {
    let skill_id = args.id.unwrap_or_else(|| default_skill_id(&args.url));
    let skills_dir = app.skills_dir();

    if skill_exists(&skills_dir, &skill_id).await
        && !confirm_overwrite(&skill_id, prompter)?
    {
        prompter.note(NoteLevel::Muted, "Cancelled");
        return Ok(());
    }

    let source = SkillSource::Git {
        url: args.url.clone(),
        branch: args.branch,
        subdir: args.subdir,
    };
    prompter.note(NoteLevel::Info, &format!("Downloading {}...", args.url));
    let installed = download_skill(app.fetcher(), &source, &skills_dir, &skill_id)
        .await
        .with_context(|| format!("failed to download {}", args.url))?;
    prompter.note(
        NoteLevel::Success,
        &format!("✓ Installed {} to {}", installed.id, installed.path.display()),
    );

    if args.link {
        let ides: Vec<&IdeTarget> = app.ides().iter().collect();
        link_many(app, &[installed], &ides, prompter).await;
    }
    Ok(())
}

/// Install a skill from a local directory, asking before overwriting.
pub async fn install_local(
    app: &App,
    path: &Path,
    skill_id: &str,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<Option<InstalledSkill>> {
    let skills_dir = app.skills_dir();
    if skill_exists(&skills_dir, skill_id).await && !confirm_overwrite(skill_id, prompter)? {
        prompter.note(NoteLevel::Muted, "Cancelled");
        return Ok(None);
    }
    let source = SkillSource::Local {
        path: app.project_root.join(path),
        subdir: None,
    };
    let installed = download_skill(app.fetcher(), &source, &skills_dir, skill_id)
        .await
        .with_context(|| format!("failed to install {}", path.display()))?;
    prompter.note(
        NoteLevel::Success,
        &format!("✓ Installed {} to {}", installed.id, installed.path.display()),
    );
    Ok(Some(installed))
}

fn confirm_overwrite(skill_id: &str, prompter: &mut dyn Prompter) -> anyhow::Result<bool> {
    let answer = prompter.confirm(
        &format!("Skill '{skill_id}' already exists. Overwrite?"),
        false,
    )?;
    Ok(answer == Some(true))
}

pub async fn handle_link(app: &App, args: IdeArgs, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
    let skills_dir = app.skills_dir();
    if !skill_exists(&skills_dir, &args.id).await {
        bail!("skill '{}' is not installed in {}", args.id, skills_dir.display());
    }
    let ides = app.resolve_ides(&args.ides, args.all)?;
    let source = skills_dir.join(&args.id);
    for ide in ides {
        let link = link_skill(&source, &args.id, ide, &app.project_root)
            .await
            .with_context(|| format!("failed to link '{}' into {}", args.id, ide.label))?;
        prompter.note(
            NoteLevel::Success,
            &format!("✓ Linked {} → {}", args.id, link.target.display()),
        );
    }
    Ok(())
}

pub async fn handle_unlink(
    app: &App,
    args: IdeArgs,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<()> {
    let ides = app.resolve_ides(&args.ides, args.all)?;
    for ide in ides {
        if unlink_skill(&args.id, ide, &app.project_root).await? {
            prompter.note(
                NoteLevel::Success,
                &format!("✓ Unlinked {} from {}", args.id, ide.label),
            );
        } else {
            prompter.note(
                NoteLevel::Muted,
                &format!("{} is not linked in {}", args.id, ide.label),
            );
        }
    }
    Ok(())
}

pub async fn handle_list(app: &App, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
    let skills_dir = app.skills_dir();
    let skills = list_local_skills(&skills_dir).await?;

    if skills.is_empty() {
        prompter.note(
            NoteLevel::Muted,
            &format!("No skills installed in {}", skills_dir.display()),
        );
    } else {
        prompter.note(
            NoteLevel::Info,
            &format!("Installed skills ({}):", skills_dir.display()),
        );
        for id in &skills {
            let mut marks = Vec::new();
            for ide in app.ides() {
                let status = link_status(id, ide, &app.project_root).await;
                if status.exists {
                    let mark = if status.valid { "✓" } else { "✗" };
                    marks.push(format!("{} {mark}", ide.label));
                }
            }
            let line = if marks.is_empty() {
                format!("  {id}")
            } else {
                format!("  {id}  [{}]", marks.join(", "))
            };
            prompter.note(NoteLevel::Info, &line);
        }
    }

    for ide in app.ides() {
        let linked = linked_skills(ide, &app.project_root).await?;
        prompter.note(NoteLevel::Info, &format!("{ide}:"));
        if linked.is_empty() {
            prompter.note(NoteLevel::Muted, "  (none)");
        }
        for entry in linked {
            let line = match &entry.source {
                Some(source) => format!("  {} -> {}", entry.skill_id, source.display()),
                None => format!("  {} (not a link)", entry.skill_id),
            };
            prompter.note(NoteLevel::Info, &line);
        }
    }
    Ok(())
}

pub async fn handle_remove(
    app: &App,
    skill_id: &str,
    force: bool,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<()> {
    let skills_dir = app.skills_dir();
    if !skill_exists(&skills_dir, skill_id).await {
        bail!("skill '{skill_id}' is not installed in {}", skills_dir.display());
    }
    if !force
        && prompter.confirm(&format!("Remove skill '{skill_id}'?"), false)? != Some(true)
    {
        prompter.note(NoteLevel::Muted, "Cancelled");
        return Ok(());
    }

    for ide in app.ides() {
        if link_status(skill_id, ide, &app.project_root).await.exists
            && unlink_skill(skill_id, ide, &app.project_root).await?
        {
            prompter.note(
                NoteLevel::Muted,
                &format!("Unlinked {skill_id} from {}", ide.label),
            );
        }
    }
    remove_skill(&skills_dir, skill_id).await?;
    prompter.note(NoteLevel::Success, &format!("✓ Removed {skill_id}"));
    Ok(())
}

/// Link every skill into every IDE, reporting each result. Failures are
/// reported and skipped. Returns how many links were created.
pub async fn link_many(
    app: &App,
    skills: &[InstalledSkill],
    ides: &[&IdeTarget],
    prompter: &mut dyn Prompter,
) -> usize {
    let mut linked = 0;
    for skill in skills {
        for ide in ides {
            match link_skill(&skill.path, &skill.id, ide, &app.project_root).await {
                Ok(_) => {
                    linked += 1;
                    prompter.note(
                        NoteLevel::Success,
                        &format!("✓ Linked {} to {}", skill.id, ide.label),
                    );
                },
                Err(e) => prompter.note(
                    NoteLevel::Error,
                    &format!("✗ Failed to link {} to {}: {e}", skill.id, ide.label),
                ),
            }
        }
    }
    linked
}

/// Multi-select over the configured IDEs, all checked. `None` on cancel.
pub fn choose_ides<'a>(
    app: &'a App,
    message: &str,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<Option<Vec<&'a IdeTarget>>> {
    let ides = app.ides();
    let choices = ides.iter().map(|ide| Choice::new(ide.to_string())).collect();
    let Some(picked) = prompter.multi_select(message, choices, (0..ides.len()).collect())? else {
        return Ok(None);
    };
    Ok(Some(picked.into_iter().filter_map(|i| ides.get(i)).collect()))
}

/// Ask whether to link freshly installed skills, then where.
pub async fn offer_links(
    app: &App,
    installed: &[InstalledSkill],
    prompter: &mut dyn Prompter,
) -> anyhow::Result<()> {
    if installed.is_empty() || app.ides().is_empty() {
        return Ok(());
    }
    if prompter.confirm("Create symlinks to IDE skill directories?", true)? != Some(true) {
        return Ok(());
    }
    let Some(ides) = choose_ides(app, "Select IDEs to link", prompter)? else {
        return Ok(());
    };
    if ides.is_empty() {
        prompter.note(NoteLevel::Warn, "No IDEs selected");
        return Ok(());
    }
    link_many(app, installed, &ides, prompter).await;
    Ok(())
}

/// Installed skills as [`InstalledSkill`] values, for linking.
pub fn installed_skills(app: &App, ids: impl IntoIterator<Item = String>) -> Vec<InstalledSkill> {
    let skills_dir: PathBuf = app.skills_dir();
    ids.into_iter()
        .map(|id| InstalledSkill {
            path: skills_dir.join(&id),
            id,
        })
        .collect()
}
