use std::{collections::HashSet, path::PathBuf};

use {
    anyhow::{Context, bail},
    clap::Args,
    skillbox_browse::{Choice, NoteLevel, Outcome, Prompter, Validator, browse_and_select},
    skillbox_config::IdeTarget,
    skillbox_skills::{
        explore::{Exploration, explore_repository},
        install::{
            ConflictPolicy, InstallPlan, InstalledSkill, PlannedInstall, Resolution,
            default_skill_id, install_planned, list_local_skills, plan_install, validate_skill_id,
        },
        scan::find_skill_candidates,
    },
    tracing::debug,
};

use crate::{
    app::App,
    skill_commands::{link_many, offer_links},
};

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ExploreArgs {
    /// Git repository URL.
    pub url: String,
    #[arg(short, long)]
    pub branch: Option<String>,
    /// Install every candidate without browsing, overwriting existing skills.
    #[arg(long)]
    pub all: bool,
    /// Link installed skills into every configured IDE.
    #[arg(short, long)]
    pub link: bool,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ScanArgs {
    /// Local directory to scan.
    pub path: PathBuf,
    /// Deepest directory whose children are classified (defaults to config).
    #[arg(long)]
    pub max_depth: Option<usize>,
    /// Print candidates as JSON.
    #[arg(long)]
    pub json: bool,
}

const CONFLICT_CHOICES: &[&str] = &[
    "Overwrite all",
    "Rename conflicting skills",
    "Skip existing, install new only",
    "Go back and reselect",
    "Cancel",
];

pub async fn handle_explore(
    app: &App,
    args: ExploreArgs,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<()> {
    let mut exploration = explore_repository(
        app.fetcher(),
        &args.url,
        args.branch.as_deref(),
        app.max_depth(),
    )
    .await?;
    if !exploration.branches.is_empty() {
        let names: Vec<&str> = exploration.branches.iter().map(|b| b.name.as_str()).collect();
        debug!(branches = ?names, "remote branches");
    }
    prompter.note(
        NoteLevel::Info,
        &format!("Found {} skill candidate(s)", exploration.candidates.len()),
    );

    let result = if args.all {
        install_everything(app, &exploration, prompter).await
    } else {
        select_and_install(app, &exploration, prompter).await
    };
    exploration.cleanup().await;
    let installed = result?;

    if args.link {
        let ides: Vec<&IdeTarget> = app.ides().iter().collect();
        link_many(app, &installed, &ides, prompter).await;
    } else if !args.all {
        offer_links(app, &installed, prompter).await?;
    }
    Ok(())
}

pub async fn handle_scan(app: &App, args: ScanArgs) -> anyhow::Result<()> {
    let depth = args.max_depth.unwrap_or_else(|| app.max_depth());
    let candidates = find_skill_candidates(&args.path, depth)
        .await
        .with_context(|| format!("failed to scan {}", args.path.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
        return Ok(());
    }
    if candidates.is_empty() {
        println!("No skill candidates found in {}", args.path.display());
        return Ok(());
    }
    for candidate in &candidates {
        let marker = if candidate.has_skill_file { "⭐" } else { "📄" };
        match &candidate.description {
            Some(description) => println!("{marker} {}  - {description}", candidate.path),
            None => println!("{marker} {}", candidate.path),
        }
    }
    Ok(())
}

/// Install every scanned candidate, overwriting existing ids.
async fn install_everything(
    app: &App,
    exploration: &Exploration,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<Vec<InstalledSkill>> {
    if exploration.candidates.is_empty() {
        bail!("no skill candidates found in {}", exploration.url);
    }
    let plan = plan_install(
        exploration.candidates.clone(),
        &app.skills_dir(),
        &default_skill_id(&exploration.url),
    )
    .await;
    let Resolution::Install(items) = plan.resolve(ConflictPolicy::Overwrite)? else {
        return Ok(Vec::new());
    };
    Ok(install_items(app, exploration, &items, prompter).await)
}

/// Browse the clone, settle id conflicts, and install the selection. The
/// caller owns the exploration and its cleanup.
pub async fn select_and_install(
    app: &App,
    exploration: &Exploration,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<Vec<InstalledSkill>> {
    let skills_dir = app.skills_dir();
    let root_id = default_skill_id(&exploration.url);

    loop {
        let candidates = match browse_and_select(exploration.root(), prompter).await? {
            Outcome::Selected(candidates) => candidates,
            Outcome::Cancelled => {
                prompter.note(NoteLevel::Muted, "Selection cancelled");
                return Ok(Vec::new());
            },
        };

        let plan = plan_install(candidates, &skills_dir, &root_id).await;
        let policy = if plan.has_conflicts() {
            ask_conflict_policy(app, &plan, prompter).await?
        } else {
            ConflictPolicy::Skip
        };

        match plan.resolve(policy)? {
            Resolution::Install(items) if items.is_empty() => {
                prompter.note(NoteLevel::Warn, "Nothing left to install");
                return Ok(Vec::new());
            },
            Resolution::Install(items) => {
                return Ok(install_items(app, exploration, &items, prompter).await);
            },
            Resolution::Reselect => continue,
            Resolution::Cancel => {
                prompter.note(NoteLevel::Muted, "Installation cancelled");
                return Ok(Vec::new());
            },
        }
    }
}

async fn install_items(
    app: &App,
    exploration: &Exploration,
    items: &[PlannedInstall],
    prompter: &mut dyn Prompter,
) -> Vec<InstalledSkill> {
    let report = install_planned(exploration.root(), items, &app.skills_dir()).await;
    for skill in &report.installed {
        prompter.note(NoteLevel::Success, &format!("✓ Installed {}", skill.id));
    }
    for (id, error) in &report.failed {
        prompter.note(NoteLevel::Error, &format!("✗ Failed to install {id}: {error}"));
    }
    report.installed
}

async fn ask_conflict_policy(
    app: &App,
    plan: &InstallPlan,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<ConflictPolicy> {
    prompter.note(
        NoteLevel::Warn,
        &format!("{} skill id(s) already taken:", plan.conflicts.len()),
    );
    for conflict in &plan.conflicts {
        prompter.note(
            NoteLevel::Muted,
            &format!("  • {} ({})", conflict.skill_id, conflict.candidate.path),
        );
    }

    let choices = CONFLICT_CHOICES.iter().map(|label| Choice::new(*label)).collect();
    let policy = match prompter.select("How should taken ids be handled?", choices, 0)? {
        Some(0) => ConflictPolicy::Overwrite,
        Some(1) => ConflictPolicy::Rename(ask_new_ids(app, plan, prompter).await?),
        Some(2) => ConflictPolicy::Skip,
        Some(3) => ConflictPolicy::Reselect,
        _ => ConflictPolicy::Cancel,
    };
    Ok(policy)
}

/// One new id per conflict. A cancelled prompt drops that skill.
async fn ask_new_ids(
    app: &App,
    plan: &InstallPlan,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<Vec<Option<String>>> {
    let mut taken: HashSet<String> = list_local_skills(&app.skills_dir())
        .await?
        .into_iter()
        .collect();
    taken.extend(plan.ready.iter().map(|p| p.skill_id.clone()));

    let mut ids = Vec::with_capacity(plan.conflicts.len());
    for conflict in &plan.conflicts {
        let validator = {
            let taken = taken.clone();
            Validator::new(move |input| {
                let id = input.trim();
                if id.is_empty() {
                    return Err("Skill ID is required".into());
                }
                if taken.contains(id) {
                    return Err(format!("'{id}' already exists"));
                }
                validate_skill_id(id).map_err(|e| e.to_string())
            })
        };
        let answer = prompter.text(
            &format!("New id for '{}'", conflict.skill_id),
            Some(format!("{}-new", conflict.skill_id)),
            Some(validator),
        )?;
        let answer = answer.map(|id| id.trim().to_string());
        if let Some(id) = &answer {
            taken.insert(id.clone());
        }
        ids.push(answer);
    }
    Ok(ids)
}
