use crate::core::{
    command_init::CommandInit,
    error::{Result, ShepherdError},
    output::{pluralize, print_success},
    pathspec::PathSpec,
};

pub fn execute_add(files: Vec<String>) -> Result<()> {
    if files.is_empty() {
        return Err(ShepherdError::usage("no files given to add"));
    }

    let context = CommandInit::initialize()?;
    let pathspecs = context.resolver.resolve_all(&files)?;

    let mut args: Vec<String> = vec!["add".into(), "--".into()];
    args.extend(pathspecs.iter().map(PathSpec::to_arg));
    context.git_repo.run(&args)?;

    print_success(&format!("Added {}", pluralize(pathspecs.len(), "path")));
    Ok(())
}
