use clap::{Parser, Subcommand};
use git_shepherd::commands::*;
use git_shepherd::core::{error::Result, output::print_error};
use std::env;

#[derive(Parser)]
#[command(name = "git-shepherd")]
#[command(about = "Opinionated git workflows built from git's own commands")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show classified working tree changes
    Status {
        /// Include ignored files
        #[arg(long)]
        ignored: bool,
        /// Print records as JSON
        #[arg(long)]
        json: bool,
        /// Restrict to these files or directories
        files: Vec<String>,
    },
    /// Start tracking files or stage their current content
    Add {
        files: Vec<String>,
    },
    /// Record changes; without files, every tracked change is committed
    Commit {
        /// Commit message (opens the editor when omitted)
        #[arg(short, long)]
        message: Option<String>,
        /// Replace the most recent commit
        #[arg(long)]
        amend: bool,
        files: Vec<String>,
    },
    /// Restore files to their content at a revision, keeping .orig backups
    Revert {
        /// Revision to restore from (defaults to the current checkout)
        #[arg(short, long)]
        rev: Option<String>,
        /// Revert every file in the repository
        #[arg(long)]
        all: bool,
        /// Do not save modified files as .orig
        #[arg(long)]
        no_backup: bool,
        files: Vec<String>,
    },
    /// Create a commit that undoes an earlier commit
    Backout {
        /// Parent number to back out against when the commit is a merge
        #[arg(short, long)]
        mainline: Option<u32>,
        /// Edit the commit message
        #[arg(long)]
        edit: bool,
        rev: String,
    },
    /// List, create or delete branches
    Branch {
        /// Delete the named branch
        #[arg(short, long, value_name = "BRANCH")]
        delete: Option<String>,
        /// Delete even if the branch is not merged
        #[arg(short, long)]
        force: bool,
        /// Branch to create at the current commit
        name: Option<String>,
    },
    /// Switch to a revision, or fast-forward to upstream
    Update {
        rev: Option<String>,
    },
    /// Fetch and fast-forward from a remote
    Pull {
        remote: Option<String>,
    },
    /// Push the current branch
    Push {
        remote: Option<String>,
    },
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Status {
            ignored,
            json,
            files,
        } => execute_status(StatusArgs {
            files,
            ignored,
            json,
        }),
        Commands::Add { files } => execute_add(files),
        Commands::Commit {
            message,
            amend,
            files,
        } => execute_commit(CommitArgs {
            files,
            message,
            amend,
        }),
        Commands::Revert {
            rev,
            all,
            no_backup,
            files,
        } => execute_revert(RevertArgs {
            files,
            revision: rev,
            all,
            no_backup,
        }),
        Commands::Backout { mainline, edit, rev } => execute_backout(BackoutArgs {
            revision: rev,
            mainline,
            edit,
        }),
        Commands::Branch {
            delete,
            force,
            name,
        } => execute_branch(BranchArgs {
            name,
            delete,
            force,
        }),
        Commands::Update { rev } => execute_update(rev),
        Commands::Pull { remote } => execute_pull(remote),
        Commands::Push { remote } => execute_push(remote),
    }
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    if let Err(e) = run(cli.command) {
        print_error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}
