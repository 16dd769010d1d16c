//! The interactive menu shown when no subcommand is given.

use std::path::Path;

use {
    skillbox_browse::{Choice, NoteLevel, Prompter, Validator},
    skillbox_skills::{
        explore::explore_repository,
        install::{default_skill_id, list_local_skills, validate_skill_id},
        link::{linked_skills, unlink_skill},
    },
    tracing::warn,
};

use crate::{
    app::App,
    explore_commands::select_and_install,
    skill_commands::{
        choose_ides, handle_list, handle_remove, install_local, installed_skills, link_many,
        offer_links,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Download,
    Link,
    Unlink,
    List,
    Remove,
    Exit,
}

const MENU: &[(MenuAction, &str)] = &[
    (MenuAction::Download, "📥 Download skills"),
    (MenuAction::Link, "🔗 Link skills to IDEs"),
    (MenuAction::Unlink, "✂️  Unlink skills from IDEs"),
    (MenuAction::List, "📋 List skills"),
    (MenuAction::Remove, "🗑️  Remove a skill"),
    (MenuAction::Exit, "Exit"),
];

/// Which branch to explore.
enum BranchPick {
    Named(String),
    RemoteDefault,
    Cancelled,
}

pub async fn run_menu(app: &App, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
    let choices = MENU.iter().map(|(_, label)| Choice::new(*label)).collect();
    let Some(index) = prompter.select("What would you like to do?", choices, 0)? else {
        return Ok(());
    };
    match MENU.get(index).map(|(action, _)| *action) {
        Some(MenuAction::Download) => download(app, prompter).await,
        Some(MenuAction::Link) => link(app, prompter).await,
        Some(MenuAction::Unlink) => unlink(app, prompter).await,
        Some(MenuAction::List) => handle_list(app, prompter).await,
        Some(MenuAction::Remove) => remove(app, prompter).await,
        Some(MenuAction::Exit) | None => Ok(()),
    }
}

async fn download(app: &App, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
    let choices = vec![
        Choice::new("Git repository").with_hint("explore and pick skills"),
        Choice::new("Local directory"),
    ];
    match prompter.select("Where is the skill?", choices, 0)? {
        Some(0) => explore_git(app, prompter).await,
        Some(1) => download_local(app, prompter).await,
        _ => Ok(()),
    }
}

async fn explore_git(app: &App, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
    let Some(url) = prompter.text(
        "Git repository URL",
        None,
        Some(Validator::required("URL is required")),
    )?
    else {
        return Ok(());
    };
    let url = url.trim().to_string();

    let branch = match pick_branch(app, &url, prompter).await? {
        BranchPick::Named(name) => Some(name),
        BranchPick::RemoteDefault => None,
        BranchPick::Cancelled => return Ok(()),
    };

    prompter.note(NoteLevel::Info, &format!("Cloning {url}..."));
    let mut exploration =
        match explore_repository(app.fetcher(), &url, branch.as_deref(), app.max_depth()).await {
            Ok(exploration) => exploration,
            Err(e) => {
                prompter.note(NoteLevel::Error, &e.to_string());
                return Ok(());
            },
        };

    let result = select_and_install(app, &exploration, prompter).await;
    exploration.cleanup().await;
    let installed = result?;
    offer_links(app, &installed, prompter).await
}

async fn pick_branch(
    app: &App,
    url: &str,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<BranchPick> {
    let branches = match app.fetcher().remote_branches(url).await {
        Ok(branches) => branches,
        Err(e) => {
            warn!(url, error = %e, "branch listing failed");
            prompter.note(
                NoteLevel::Warn,
                "Could not fetch branches, using the default branch",
            );
            return Ok(BranchPick::RemoteDefault);
        },
    };

    match branches.as_slice() {
        [] => Ok(BranchPick::RemoteDefault),
        [only] => Ok(BranchPick::Named(only.name.clone())),
        _ => {
            let choices = branches
                .iter()
                .map(|b| {
                    if b.is_default {
                        Choice::new(format!("{} (default)", b.name))
                    } else {
                        Choice::new(b.name.clone())
                    }
                })
                .collect();
            Ok(match prompter.select("Select branch", choices, 0)? {
                Some(index) => branches
                    .get(index)
                    .map_or(BranchPick::RemoteDefault, |b| BranchPick::Named(b.name.clone())),
                None => BranchPick::Cancelled,
            })
        },
    }
}

async fn download_local(app: &App, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
    let Some(path) = prompter.text(
        "Local skill directory",
        None,
        Some(Validator::required("Path is required")),
    )?
    else {
        return Ok(());
    };
    let path = path.trim().to_string();

    let id_validator = Validator::new(|input| {
        validate_skill_id(input.trim()).map_err(|e| e.to_string())
    });
    let Some(skill_id) = prompter.text("Skill ID", Some(default_skill_id(&path)), Some(id_validator))?
    else {
        return Ok(());
    };

    let installed = install_local(app, Path::new(&path), skill_id.trim(), prompter).await?;
    offer_links(app, installed.as_slice(), prompter).await
}

async fn pick_installed(
    app: &App,
    message: &str,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<Option<Vec<String>>> {
    let skills = list_local_skills(&app.skills_dir()).await?;
    if skills.is_empty() {
        prompter.note(NoteLevel::Warn, "No skills installed");
        return Ok(None);
    }
    let choices = skills.iter().map(Choice::new).collect();
    let Some(picked) = prompter.multi_select(message, choices, Vec::new())? else {
        return Ok(None);
    };
    let picked: Vec<String> = picked
        .into_iter()
        .filter_map(|i| skills.get(i).cloned())
        .collect();
    if picked.is_empty() {
        prompter.note(NoteLevel::Warn, "No skills selected");
        return Ok(None);
    }
    Ok(Some(picked))
}

async fn link(app: &App, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
    let Some(ids) = pick_installed(app, "Select skills to link", prompter).await? else {
        return Ok(());
    };
    let Some(ides) = choose_ides(app, "Select IDEs", prompter)? else {
        return Ok(());
    };
    if ides.is_empty() {
        prompter.note(NoteLevel::Warn, "No IDEs selected");
        return Ok(());
    }
    let skills = installed_skills(app, ids);
    link_many(app, &skills, &ides, prompter).await;
    Ok(())
}

async fn unlink(app: &App, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
    let Some(ides) = choose_ides(app, "Unlink from which IDEs?", prompter)? else {
        return Ok(());
    };

    let mut linked: Vec<String> = Vec::new();
    for ide in &ides {
        for entry in linked_skills(ide, &app.project_root).await? {
            if entry.source.is_some() && !linked.contains(&entry.skill_id) {
                linked.push(entry.skill_id);
            }
        }
    }
    if linked.is_empty() {
        prompter.note(NoteLevel::Warn, "No linked skills found");
        return Ok(());
    }
    linked.sort();

    let choices = linked.iter().map(Choice::new).collect();
    let Some(picked) = prompter.multi_select("Select skills to unlink", choices, Vec::new())?
    else {
        return Ok(());
    };
    for id in picked.into_iter().filter_map(|i| linked.get(i)) {
        for ide in &ides {
            if unlink_skill(id, ide, &app.project_root).await? {
                prompter.note(
                    NoteLevel::Success,
                    &format!("✓ Unlinked {id} from {}", ide.label),
                );
            }
        }
    }
    Ok(())
}

async fn remove(app: &App, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
    let skills = list_local_skills(&app.skills_dir()).await?;
    if skills.is_empty() {
        prompter.note(NoteLevel::Warn, "No skills installed");
        return Ok(());
    }
    let choices = skills.iter().map(Choice::new).collect();
    let Some(index) = prompter.select("Select a skill to remove", choices, 0)? else {
        return Ok(());
    };
    match skills.get(index) {
        Some(id) => handle_remove(app, id, false, prompter).await,
        None => Ok(()),
    }
}
