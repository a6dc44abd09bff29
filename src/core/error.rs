//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`ShepherdError`] which covers every failure mode of the
//! workflow engine. It uses `thiserror` for ergonomic error definitions and keeps
//! the named constructors for common failure scenarios next to the enum.
//!
//! # Public API
//! - [`ShepherdError`]: Main error enum covering all failure modes
//! - [`PolicyViolation`]: Blocking conditions found while reconciling changes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, ShepherdError>`
//!
//! # Error Categories
//! - **Usage**: the caller violated a precondition (exit code 2)
//! - **Git operations**: repository discovery, subprocess failures, status parsing
//! - **Policy**: unmerged files, staged-but-missing files, nothing to commit
//! - **Paths**: arguments that cannot be resolved or are not known to the repository
//! - **Backups**: partially completed `.orig` renames

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Blocking conditions reported by the change reconciliation engine.
///
/// Messages are pluralized by count so they can be shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    Unmerged(usize),
    NothingChanged,
    MissingStaged(usize),
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyViolation::Unmerged(1) => {
                write!(f, "1 unmerged file; resolve the conflict and add it first")
            }
            PolicyViolation::Unmerged(n) => {
                write!(f, "{n} unmerged files; resolve the conflicts and add them first")
            }
            PolicyViolation::NothingChanged => write!(f, "nothing changed"),
            PolicyViolation::MissingStaged(1) => write!(
                f,
                "1 file is staged but missing from the working tree; restore it or remove it"
            ),
            PolicyViolation::MissingStaged(n) => write!(
                f,
                "{n} files are staged but missing from the working tree; restore or remove them"
            ),
        }
    }
}

/// Domain-specific error types for git-shepherd
#[derive(Error, Debug)]
pub enum ShepherdError {
    // Caller errors
    #[error("{message}")]
    Usage { message: String },

    // Git repository errors
    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("Git repository error: {0}")]
    GitRepo(#[from] git2::Error),

    #[error("Invalid UTF-8 path in repository")]
    InvalidUtf8Path,

    #[error("git {command} failed: {stderr}")]
    GitCommandFailed { command: String, stderr: String },

    #[error("status query failed: {message}")]
    StatusQuery { message: String },

    #[error("unknown revision: {revision}")]
    RevisionNotFound { revision: String },

    // Policy errors
    #[error("{0}")]
    Policy(PolicyViolation),

    // Path errors
    #[error("{argument}: cannot resolve path: {source}")]
    PathResolution {
        argument: String,
        source: std::io::Error,
    },

    #[error("{argument}: not known to the repository")]
    NotKnown { argument: String },

    // Backup errors
    #[error(
        "backing up '{path}' failed after {completed} file(s) were renamed to .orig: {source}"
    )]
    BackupFailed {
        path: PathBuf,
        completed: usize,
        source: std::io::Error,
    },

    // Ambient errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using ShepherdError
pub type Result<T> = std::result::Result<T, ShepherdError>;

impl ShepherdError {
    /// Create a usage error with a message shown verbatim to the user
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a git command failure from the argument list and captured stderr
    pub fn git_command_failed(args: &[String], stderr: impl AsRef<str>) -> Self {
        Self::GitCommandFailed {
            command: args.join(" "),
            stderr: stderr.as_ref().trim().to_string(),
        }
    }

    /// Create a status query error (malformed output or failed subprocess)
    pub fn status_query(message: impl Into<String>) -> Self {
        Self::StatusQuery {
            message: message.into(),
        }
    }

    /// Create an unknown revision error
    pub fn revision_not_found(revision: impl Into<String>) -> Self {
        Self::RevisionNotFound {
            revision: revision.into(),
        }
    }

    /// Create a path resolution error naming the offending argument
    pub fn path_resolution(argument: impl Into<String>, source: std::io::Error) -> Self {
        Self::PathResolution {
            argument: argument.into(),
            source,
        }
    }

    /// Create a "not known" error for a file absent from disk and from the target tree
    pub fn not_known(argument: impl Into<String>) -> Self {
        Self::NotKnown {
            argument: argument.into(),
        }
    }

    /// Create a backup failure that records how far the backup phase got
    pub fn backup_failed(path: impl Into<PathBuf>, completed: usize, source: std::io::Error) -> Self {
        Self::BackupFailed {
            path: path.into(),
            completed,
            source,
        }
    }

    /// Process exit code for this error: usage errors are distinguished from failures
    pub fn exit_code(&self) -> i32 {
        match self {
            ShepherdError::Usage { .. } => 2,
            _ => 1,
        }
    }
}

impl From<PolicyViolation> for ShepherdError {
    fn from(violation: PolicyViolation) -> Self {
        ShepherdError::Policy(violation)
    }
}
