//! Centralized initialization for commands.
//!
//! Every command needs the same three things: the user's configuration, the
//! repository containing the working directory, and a path resolver bound to
//! both. [`CommandInit`] reads the process's working directory exactly once and
//! hands explicit paths to everything downstream.

use crate::core::{
    config::ShepherdConfig,
    error::{Result, ShepherdError},
    git::GitRepo,
    pathspec::PathResolver,
};
use std::env;
use std::path::Path;

/// Initialized state shared by command handlers
pub struct CommandContext {
    pub config: ShepherdConfig,
    pub git_repo: GitRepo,
    pub resolver: PathResolver,
}

pub struct CommandInit;

impl CommandInit {
    /// Load the configuration and open the repository around the current directory
    pub fn initialize() -> Result<CommandContext> {
        let config = ShepherdConfig::load()?;
        let current_dir = env::current_dir()?;
        Self::initialize_at(&current_dir, config)
    }

    /// Same as [`CommandInit::initialize`] with an explicit working directory
    pub fn initialize_at(working_dir: &Path, config: ShepherdConfig) -> Result<CommandContext> {
        let git_repo = GitRepo::open_with_binary(working_dir, &config.git_binary)
            .map_err(|_| ShepherdError::NotInGitRepo)?;
        let resolver = PathResolver::new(working_dir, git_repo.root())?;

        log::debug!(
            "Initialized command in {} (repository root {})",
            working_dir.display(),
            git_repo.root().display()
        );

        Ok(CommandContext {
            config,
            git_repo,
            resolver,
        })
    }
}
