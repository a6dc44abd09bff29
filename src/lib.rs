//! git-shepherd - opinionated git workflows composed from git's own commands.
//!
//! The library holds the engine behind the command line: resolving file
//! arguments into pathspecs, classifying working tree status, reconciling which
//! files an operation touches, and sequencing the backup and restore steps of a
//! revert. The [`commands`] module wires these into the individual workflows.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module.

pub mod commands;
pub mod core;

pub use core::{
    classify,
    resolve,
    select_for_commit,
    select_for_revert,
    ChangeKind,
    ChangeRecord,
    CommitSelection,
    GitRepo,
    PathResolver,
    PathSpec,
    PolicyViolation,
    ReconciliationResult,
    Result,
    RevertPlan,
    ShepherdError,
};
