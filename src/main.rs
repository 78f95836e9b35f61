use anyhow::Context;
use clap::{Parser, Subcommand};
use gitlet::GitletResult;
use gitlet::areas::repository::Repository;
use gitlet::artifacts::core::{PagerWriter, should_page};
use gitlet::artifacts::objects::commit::load_timestamp_from_env;
use is_terminal::IsTerminal;
use minus::Pager;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gitlet",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small local version-control system",
    long_about = "gitlet tracks snapshots of a working directory in a content-addressed \
    object store, with branches, three-way merges and a staging area. \
    It keeps everything in a single .gitlet directory and never talks to a remote.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates a .gitlet directory in the current directory or at \
        the specified path, with a single branch, main, at the initial commit."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(
        name = "commit",
        about = "Record the staged changes",
        long_about = "This command creates a new commit on the current branch from the staged \
        changes. The timestamp is taken from GITLET_DATE when it is set."
    )]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(name = "rm", about = "Unstage a file, or stage its removal and delete it")]
    Rm {
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the IDs of commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged files and working changes")]
    Status,
    #[command(
        name = "checkout",
        about = "Restore a file or switch branches",
        long_about = "checkout -- <file> restores a file from the head commit, \
        checkout <commit> -- <file> restores it from the given commit, and \
        checkout <branch> switches to the given branch."
    )]
    Checkout {
        #[arg(index = 1, required_unless_present = "file", help = "A branch, or a commit when a file is given")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "The file to restore")]
        file: Option<PathBuf>,
    },
    #[command(name = "branch", about = "Create a branch at the head commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "reset", about = "Move the current branch to a commit")]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
}

fn main() {
    init_tracing();
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    if let Err(error) = run(cli) {
        tracing::debug!(kind = ?error.kind(), "command failed");
        eprintln!("{error}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(cli: Cli) -> GitletResult<()> {
    let pwd = std::env::current_dir().context("Failed to read the current directory")?;

    match cli.command {
        Commands::Init { path } => {
            let path = path.unwrap_or_else(|| pwd.clone());
            Repository::init(&path, Box::new(std::io::stdout()))?;
        }
        Commands::Add { file } => open(&pwd)?.add(&file)?,
        Commands::Commit { message } => {
            let timestamp = load_timestamp_from_env()?;
            open(&pwd)?.commit(&message, timestamp)?;
        }
        Commands::Rm { file } => open(&pwd)?.remove(&file)?,
        Commands::Log => with_history_output(&pwd, |repository| repository.log().map(drop))?,
        Commands::GlobalLog => {
            with_history_output(&pwd, |repository| repository.global_log().map(drop))?
        }
        Commands::Find { message } => {
            open(&pwd)?.find(&message)?;
        }
        Commands::Status => {
            open(&pwd)?.status()?;
        }
        Commands::Checkout { target, file } => {
            let mut repository = open(&pwd)?;
            match (target, file) {
                (None, Some(file)) => repository.checkout_file(&file)?,
                (Some(commit), Some(file)) => repository.checkout_file_from_commit(&commit, &file)?,
                (Some(branch), None) => repository.checkout_branch(&branch)?,
                (None, None) => unreachable!("clap requires a target or a file"),
            }
        }
        Commands::Branch { name } => open(&pwd)?.branch(&name)?,
        Commands::RmBranch { name } => open(&pwd)?.remove_branch(&name)?,
        Commands::Reset { commit } => open(&pwd)?.reset(&commit)?,
        Commands::Merge { branch } => {
            let timestamp = load_timestamp_from_env()?;
            open(&pwd)?.merge(&branch, timestamp)?;
        }
    }

    Ok(())
}

fn open(pwd: &Path) -> GitletResult<Repository> {
    Repository::open(pwd, Box::new(std::io::stdout()))
}

/// Run a history command, through the pager when stdout is a terminal
fn with_history_output(
    pwd: &Path,
    show: impl FnOnce(&Repository) -> GitletResult<()>,
) -> GitletResult<()> {
    if !should_page() {
        return show(&open(pwd)?);
    }

    let writer = PagerWriter::new(Pager::new());
    let pager = writer.pager().clone();
    {
        let repository = Repository::open(pwd, Box::new(writer))?;
        show(&repository)?;
    }
    minus::page_all(pager).context("Failed to run the pager")?;

    Ok(())
}
