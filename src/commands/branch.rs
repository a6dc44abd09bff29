use crate::core::{
    command_init::CommandInit,
    error::{Result, ShepherdError},
    output::{print_info, print_section_header, print_success},
};
use colored::*;

pub struct BranchArgs {
    /// Branch to create at the current commit
    pub name: Option<String>,
    /// Branch to delete
    pub delete: Option<String>,
    /// Delete even when not merged
    pub force: bool,
}

pub fn execute_branch(args: BranchArgs) -> Result<()> {
    let context = CommandInit::initialize()?;
    let repo = &context.git_repo;

    match (args.name, args.delete) {
        (Some(_), Some(_)) => Err(ShepherdError::usage(
            "give either a branch to create or one to delete, not both",
        )),
        (Some(name), None) => {
            repo.run(&["branch".into(), "--".into(), name.clone()])?;
            print_success(&format!("Created branch '{name}'"));
            Ok(())
        }
        (None, Some(name)) => {
            let flag = if args.force { "-D" } else { "-d" };
            repo.run(&["branch".into(), flag.into(), "--".into(), name.clone()])?;
            print_success(&format!("Deleted branch '{name}'"));
            Ok(())
        }
        (None, None) => list_branches(repo),
    }
}

fn list_branches(repo: &crate::core::git::GitRepo) -> Result<()> {
    let branches = repo.local_branches()?;

    if branches.is_empty() {
        print_info("No branches yet. Make your first commit to create one.");
        return Ok(());
    }

    print_section_header("Local branches");
    for (name, is_current) in &branches {
        if *is_current {
            println!("{} {}", "*".green(), name.green().bold());
        } else {
            println!("  {name}");
        }
    }

    Ok(())
}
