//! CLI interface for the trainer.
//!
//! `git-trainer shell` is where learning happens: an interactive session in
//! one activity. The other commands inspect what the trainer knows about.
//!
//! The simulated remote is persisted under the state directory so it
//! can be inspected between runs with `git-trainer remote`.

mod format;
mod shell;

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::session::Session;
use crate::storage::{MemoryRemoteStore, RemoteStore, SqliteRemoteStore};

use format::format_activities;

/// Git Trainer: practice Git in a simulated shell.
#[derive(Debug, Parser)]
#[command(name = "git-trainer", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Directory holding the persisted simulated remote.
    /// Defaults to `state-dir` from the config, then `~/.git-trainer`.
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Commit author, as `Name <email>` or a bare name.
    /// Overrides `GIT_TRAINER_AUTHOR` and the config file.
    #[arg(long, global = true)]
    author: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: a first lesson
  1. git-trainer activities
  2. git-trainer shell --activity act-1
  3. $ git init
     main$ touch index.html
     main$ git add index.html
     main$ git commit -m "Primer commit"
     main$ :missions

Inside the shell:
  :missions          check progress on the activity's missions
  :activity <id>     switch activity (resets everything)
  :write <file>      type a file's content, end with a lone "."
  :quit              leave"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the built-in activities and their missions.
    Activities,

    /// Start an interactive session.
    ///
    /// The working tree starts with the activity's seed files and
    /// the simulated remote starts empty.
    Shell {
        /// Activity to start in. Overrides `GIT_TRAINER_ACTIVITY`
        /// and `default-activity`.
        #[arg(long)]
        activity: Option<String>,

        /// Keep the simulated remote in memory only.
        #[arg(long)]
        memory: bool,
    },

    /// Print the persisted simulated remote as JSON.
    Remote,
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Activities => cmd_activities(),
        Command::Shell {
            ref activity,
            memory,
        } => cmd_shell(config, &cli, activity.as_deref(), memory),
        Command::Remote => cmd_remote(config, &cli),
    }
}

fn load_catalog() -> Result<Catalog, String> {
    Catalog::builtin().map_err(|e| format!("failed to load activities: {e}"))
}

fn cmd_activities() -> Result<(), String> {
    let catalog = load_catalog()?;
    println!("{}", format_activities(catalog.list()));
    Ok(())
}

fn cmd_shell(
    config: &Config,
    cli: &Cli,
    activity: Option<&str>,
    memory: bool,
) -> Result<(), String> {
    let catalog = load_catalog()?;
    let activity_id = config.activity(activity);
    let activity = catalog.get(&activity_id).cloned().ok_or_else(|| {
        let known: Vec<&str> = catalog.list().iter().map(|a| a.id.as_str()).collect();
        format!("unknown activity: {activity_id} (available: {})", known.join(", "))
    })?;

    let store: Box<dyn RemoteStore> = if memory {
        Box::new(MemoryRemoteStore::new())
    } else {
        open_store(config, cli)
    };

    let mut session = Session::new(store, config.author(cli.author.as_deref()));
    session
        .select_activity(Some(activity))
        .map_err(|e| format!("failed to reset the simulated remote: {e}"))?;
    info!(session = %session.id(), activity = %activity_id, "shell started");

    shell::run(&mut session, &catalog, io::stdin().lock(), io::stdout().lock())
        .map_err(|e| format!("shell I/O failed: {e}"))
}

/// The SQLite store, or an in-memory one when it cannot be opened.
fn open_store(config: &Config, cli: &Cli) -> Box<dyn RemoteStore> {
    let Some(dir) = config.state_dir(cli.state_dir.clone()) else {
        warn!("no state directory; keeping the simulated remote in memory");
        return Box::new(MemoryRemoteStore::new());
    };
    match SqliteRemoteStore::open(&dir) {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "falling back to an in-memory remote");
            Box::new(MemoryRemoteStore::new())
        }
    }
}

fn cmd_remote(config: &Config, cli: &Cli) -> Result<(), String> {
    let dir = config
        .state_dir(cli.state_dir.clone())
        .ok_or("could not determine home directory")?;

    if !SqliteRemoteStore::path(&dir).exists() {
        println!("No simulated remote repository");
        return Ok(());
    }

    let store = SqliteRemoteStore::open(&dir)
        .map_err(|e| format!("failed to open {}: {e}", dir.display()))?;
    let record = store
        .load()
        .map_err(|e| format!("failed to read the simulated remote: {e}"))?;

    match record {
        Some(remote) => {
            let json = serde_json::to_string_pretty(&remote)
                .map_err(|e| format!("failed to serialize the simulated remote: {e}"))?;
            println!("{json}");
        }
        None => println!("No simulated remote repository"),
    }
    Ok(())
}
