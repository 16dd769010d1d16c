mod app;
mod explore_commands;
mod menu;
mod skill_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    skillbox_browse::TerminalPrompter,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use crate::{
    app::App,
    explore_commands::{ExploreArgs, ScanArgs},
    skill_commands::{DownloadArgs, IdeArgs},
};

#[derive(Parser, Debug)]
#[command(
    name = "skillbox",
    version,
    about = "Browse skill repositories, install skills, and link them into IDEs"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (skips discovery; must load).
    #[arg(long, global = true, env = "SKILLBOX_CONFIG")]
    config: Option<PathBuf>,

    /// Project root that skills and IDE folders live under (defaults to the
    /// current directory).
    #[arg(long, global = true, env = "SKILLBOX_PROJECT_DIR")]
    project_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clone a repository, browse it, and install the skills you pick.
    Explore(ExploreArgs),
    /// List skill candidates in a local directory tree.
    Scan(ScanArgs),
    /// Download a whole repository (or one subdirectory) as a single skill.
    #[command(visible_alias = "dl")]
    Download(DownloadArgs),
    /// Link an installed skill into IDE skill folders.
    Link(IdeArgs),
    /// Remove a skill's links from IDE skill folders.
    Unlink(IdeArgs),
    /// Show installed skills and IDE links.
    #[command(visible_alias = "ls")]
    List,
    /// Delete an installed skill and its links.
    #[command(visible_alias = "rm")]
    Remove {
        id: String,
        /// Do not ask for confirmation.
        #[arg(short, long)]
        force: bool,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so command output stays clean.
    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "skillbox starting");

    let app = App::load(cli.config.as_deref(), cli.project_dir)?;
    let mut prompter = TerminalPrompter::new();

    match cli.command {
        None => menu::run_menu(&app, &mut prompter).await,
        Some(Commands::Explore(args)) => {
            explore_commands::handle_explore(&app, args, &mut prompter).await
        },
        Some(Commands::Scan(args)) => explore_commands::handle_scan(&app, args).await,
        Some(Commands::Download(args)) => {
            skill_commands::handle_download(&app, args, &mut prompter).await
        },
        Some(Commands::Link(args)) => skill_commands::handle_link(&app, args, &mut prompter).await,
        Some(Commands::Unlink(args)) => {
            skill_commands::handle_unlink(&app, args, &mut prompter).await
        },
        Some(Commands::List) => skill_commands::handle_list(&app, &mut prompter).await,
        Some(Commands::Remove { id, force }) => {
            skill_commands::handle_remove(&app, &id, force, &mut prompter).await
        },
    }
}
