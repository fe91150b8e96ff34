mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, contact::ContactSubcommand, pending::PendingSubcommand,
    reason::ReasonSubcommand, session::SessionSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "training",
    about = "Training course scheduling: session duplication, pending follow-ups and invoicing tables",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .training/ or .git/)
    #[arg(long, global = true, env = "TRAINING_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Acting user login (default: project.user from config.yaml)
    #[arg(long, global = true, env = "TRAINING_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize .training/ in the current project
    Init,

    /// Inspect sessions and duplicate their schedule for a group
    Session {
        #[command(subcommand)]
        subcommand: SessionSubcommand,
    },

    /// Manage the pending reason lookup table
    Reason {
        #[command(subcommand)]
        subcommand: ReasonSubcommand,
    },

    /// Follow up courses waiting on an external action
    Pending {
        #[command(subcommand)]
        subcommand: PendingSubcommand,
    },

    /// Contact lookups
    Contact {
        #[command(subcommand)]
        subcommand: ContactSubcommand,
    },

    /// Products, penalties and invoice thresholds
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Session { subcommand } => cmd::session::run(&root, subcommand, cli.json),
        Commands::Reason { subcommand } => cmd::reason::run(&root, subcommand, cli.json),
        Commands::Pending { subcommand } => {
            cmd::pending::run(&root, subcommand, cli.user.as_deref(), cli.json)
        }
        Commands::Contact { subcommand } => cmd::contact::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
