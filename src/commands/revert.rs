use crate::core::{
    command_init::CommandInit,
    error::Result,
    output::{pluralize, print_info, print_success},
    reconcile::{select_for_revert, RevertPlan, RevertRequest},
    sequencer::run_revert,
};

pub struct RevertArgs {
    pub files: Vec<String>,
    pub revision: Option<String>,
    pub all: bool,
    pub no_backup: bool,
}

pub fn execute_revert(args: RevertArgs) -> Result<()> {
    let context = CommandInit::initialize()?;
    let backups = context.config.backup_on_revert && !args.no_backup;

    let request = RevertRequest {
        files: args.files,
        revision: args.revision,
        all: args.all,
    };
    let plan = select_for_revert(&context.git_repo, &context.resolver, &request)?;

    if let RevertPlan::Restore(restore) = &plan {
        if restore.is_empty() {
            print_info("Nothing to revert");
            return Ok(());
        }
    }

    let report = run_revert(&context.git_repo, &plan, backups)?;

    if report.backed_up > 0 {
        print_info(&format!(
            "Saved {} with an .orig suffix",
            pluralize(report.backed_up, "modified file")
        ));
    }
    if report.untracked > 0 {
        print_info(&format!(
            "Stopped tracking {} (left on disk)",
            pluralize(report.untracked, "file")
        ));
    }
    print_success(&format!(
        "Reverted {}",
        pluralize(report.restored + report.untracked, "file")
    ));
    Ok(())
}
