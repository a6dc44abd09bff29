//! Core functionality for git-shepherd.
//!
//! This module provides the building blocks the commands are made of: git
//! access, path resolution, status classification, change reconciliation and
//! the revert sequencer, plus configuration, errors and output formatting.

pub mod colors;
pub mod command_init;
pub mod config;
pub mod dirs;
pub mod error;
pub mod git;
pub mod output;
pub mod pathspec;
pub mod reconcile;
pub mod sequencer;
pub mod status;

// === Error handling ===
pub use error::{PolicyViolation, Result, ShepherdError};

// === Git access ===
// Repository handle, command execution and streaming queries
pub use git::{GitRepo, GitStream};

// === Path resolution ===
pub use pathspec::{resolve, PathResolver, PathSpec};

// === Status classification ===
pub use status::{classify, ChangeKind, ChangeRecord, StatusReader};

// === Reconciliation ===
// Commit selection and revert planning
pub use reconcile::{
    select_for_commit, select_for_revert, CommitSelection, ReconciliationResult, RestorePlan,
    RevertPlan, RevertRequest,
};

// === Revert sequencing ===
pub use sequencer::{backup, mutate, run_revert, RevertReport};

// === Configuration ===
pub use config::ShepherdConfig;

// === Command initialization ===
pub use command_init::{CommandContext, CommandInit};
