use crate::core::{
    command_init::CommandInit,
    error::{Result, ShepherdError},
    output::{pluralize, print_warning},
    reconcile::{commit_args, select_for_commit},
};

pub struct CommitArgs {
    pub files: Vec<String>,
    pub message: Option<String>,
    pub amend: bool,
}

pub fn execute_commit(args: CommitArgs) -> Result<()> {
    let context = CommandInit::initialize()?;

    if !args.files.is_empty() && context.git_repo.is_merging() {
        return Err(ShepherdError::usage(
            "cannot commit selected files during a merge; commit without file arguments",
        ));
    }

    let result = select_for_commit(
        &context.git_repo,
        &context.resolver,
        &args.files,
        args.amend,
    )?;
    let missing = result.missing_count();
    let selection = result.into_selection()?;

    if missing > 0 {
        print_warning(&missing_warning(missing));
    }

    let git_args = commit_args(&selection, args.amend, args.message.as_deref());
    context.git_repo.run_interactive(&git_args)
}

fn missing_warning(count: usize) -> String {
    format!(
        "Left out {} missing from the working tree",
        pluralize(count, "tracked file")
    )
}
