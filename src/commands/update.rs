use crate::core::{
    command_init::CommandInit,
    error::{Result, ShepherdError},
    output::print_success,
};

/// Switch to `revision`, or fast-forward the current branch to its upstream.
pub fn execute_update(revision: Option<String>) -> Result<()> {
    let context = CommandInit::initialize()?;
    let repo = &context.git_repo;

    match revision {
        Some(revision) => {
            if repo.resolve_commit(&revision)?.is_none() {
                return Err(ShepherdError::revision_not_found(revision));
            }
            repo.run(&["checkout".into(), "--quiet".into(), revision.clone()])?;
            print_success(&format!("Updated to {revision}"));
        }
        None => {
            repo.run(&[
                "merge".into(),
                "--ff-only".into(),
                "--quiet".into(),
                "@{upstream}".into(),
            ])?;
            print_success("Fast-forwarded to upstream");
        }
    }

    Ok(())
}
