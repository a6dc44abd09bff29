use crate::core::{command_init::CommandInit, error::Result};

/// Fetch from `remote` (or the configured default) and fast-forward.
pub fn execute_pull(remote: Option<String>) -> Result<()> {
    let context = CommandInit::initialize()?;
    let remote = remote.unwrap_or_else(|| context.config.default_remote.clone());

    log::debug!("Pulling from {remote}");
    context
        .git_repo
        .run_interactive(&["pull".into(), "--ff-only".into(), remote])
}
