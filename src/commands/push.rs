use crate::core::{
    command_init::CommandInit,
    error::{Result, ShepherdError},
};

/// Push the current branch to the branch of the same name on `remote`.
pub fn execute_push(remote: Option<String>) -> Result<()> {
    let context = CommandInit::initialize()?;
    let repo = &context.git_repo;
    let remote = remote.unwrap_or_else(|| context.config.default_remote.clone());

    let branch = repo
        .current_branch()
        .map_err(|_| ShepherdError::usage("nothing to push: no commits yet"))?;
    if branch.starts_with("detached at ") {
        return Err(ShepherdError::usage(
            "HEAD is detached; switch to a branch before pushing",
        ));
    }

    log::debug!("Pushing {branch} to {remote}");
    repo.run_interactive(&[
        "push".into(),
        remote,
        format!("refs/heads/{branch}:refs/heads/{branch}"),
    ])
}
