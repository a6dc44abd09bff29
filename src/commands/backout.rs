use crate::core::{
    command_init::CommandInit,
    error::{Result, ShepherdError},
    reconcile::ensure_no_unmerged,
};

pub struct BackoutArgs {
    pub revision: String,
    /// Parent to diff against when backing out a merge
    pub mainline: Option<u32>,
    pub edit: bool,
}

pub fn execute_backout(args: BackoutArgs) -> Result<()> {
    let context = CommandInit::initialize()?;
    let repo = &context.git_repo;

    let commit = repo
        .resolve_commit(&args.revision)?
        .ok_or_else(|| ShepherdError::revision_not_found(&args.revision))?;
    ensure_no_unmerged(repo)?;

    let mut git_args: Vec<String> = vec!["revert".into()];
    git_args.push(if args.edit { "--edit" } else { "--no-edit" }.into());
    if let Some(parent) = args.mainline {
        git_args.push("-m".into());
        git_args.push(parent.to_string());
    }
    git_args.push(commit.to_string());

    log::debug!("Backing out {} ({commit})", args.revision);
    repo.run_interactive(&git_args)
}
