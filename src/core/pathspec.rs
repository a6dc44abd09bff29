//! Resolution of user-supplied file arguments into repository pathspecs.
//!
//! Arguments may be relative to the working directory, absolute, routed through
//! symlinked directories, or name files that no longer exist. [`PathResolver`]
//! turns each one into exactly one [`PathSpec`], anchored at the repository root
//! whenever the resolved path lies inside it.
//!
//! The working directory and repository root are always passed in explicitly;
//! nothing here looks at the process's current directory.

use crate::core::error::{Result, ShepherdError};
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

/// A resolved, unambiguous reference to a file or directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum PathSpec {
    /// The whole repository
    RepositoryRoot,
    /// Slash-separated path relative to the repository root
    TopAnchored(String),
    /// Absolute path outside the repository, matched literally
    Literal(String),
}

impl PathSpec {
    /// Render as a git magic pathspec, matched without glob interpretation
    pub fn to_arg(&self) -> String {
        match self {
            PathSpec::RepositoryRoot => ":(top)".to_string(),
            PathSpec::TopAnchored(path) => format!(":(top,literal){path}"),
            PathSpec::Literal(path) => format!(":(literal){path}"),
        }
    }

    /// Repository-relative path, if the spec lies inside the repository
    pub fn repo_relative(&self) -> Option<&Path> {
        match self {
            PathSpec::RepositoryRoot => Some(Path::new("")),
            PathSpec::TopAnchored(path) => Some(Path::new(path)),
            PathSpec::Literal(_) => None,
        }
    }

    /// Location of the spec on disk
    pub fn disk_path(&self, repo_root: &Path) -> PathBuf {
        match self {
            PathSpec::RepositoryRoot => repo_root.to_path_buf(),
            PathSpec::TopAnchored(path) => repo_root.join(path),
            PathSpec::Literal(path) => PathBuf::from(path),
        }
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSpec::RepositoryRoot => write!(f, "."),
            PathSpec::TopAnchored(path) | PathSpec::Literal(path) => write!(f, "{path}"),
        }
    }
}

/// Resolves arguments against an explicit working directory and repository root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    working_dir: PathBuf,
    repo_root: PathBuf,
}

impl PathResolver {
    pub fn new(working_dir: impl Into<PathBuf>, repo_root: impl AsRef<Path>) -> Result<Self> {
        let repo_root = repo_root.as_ref();
        let repo_root = sloppy_canonicalize(repo_root).map_err(|e| {
            ShepherdError::path_resolution(repo_root.to_string_lossy(), e)
        })?;
        Ok(PathResolver {
            working_dir: working_dir.into(),
            repo_root,
        })
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn resolve(&self, argument: &str) -> Result<PathSpec> {
        let joined = self.working_dir.join(argument);
        let resolved = sloppy_canonicalize(&joined)
            .map_err(|e| ShepherdError::path_resolution(argument, e))?;

        let spec = match resolved.strip_prefix(&self.repo_root) {
            Ok(relative) if relative.as_os_str().is_empty() => PathSpec::RepositoryRoot,
            Ok(relative) => PathSpec::TopAnchored(slash_path(relative)?),
            Err(_) => PathSpec::Literal(
                resolved
                    .to_str()
                    .ok_or(ShepherdError::InvalidUtf8Path)?
                    .to_string(),
            ),
        };

        log::debug!("Resolved {argument:?} to {spec:?}");
        Ok(spec)
    }

    pub fn resolve_all<S: AsRef<str>>(&self, arguments: &[S]) -> Result<Vec<PathSpec>> {
        arguments.iter().map(|arg| self.resolve(arg.as_ref())).collect()
    }
}

/// Resolve `argument` from `working_dir` into a pathspec for the repository at `repo_root`.
pub fn resolve(working_dir: &Path, repo_root: &Path, argument: &str) -> Result<PathSpec> {
    PathResolver::new(working_dir, repo_root)?.resolve(argument)
}

/// Canonicalize a path whose trailing components may not exist.
///
/// The longest existing prefix is resolved through the filesystem (symlinks,
/// `.` and `..`); the remaining components are appended lexically. Only
/// "does not exist" failures are tolerated while walking up.
pub fn sloppy_canonicalize(path: &Path) -> io::Result<PathBuf> {
    let components: Vec<Component<'_>> = path.components().collect();

    for split in (1..=components.len()).rev() {
        let prefix: PathBuf = components[..split].iter().collect();
        match std::fs::canonicalize(&prefix) {
            Ok(mut resolved) => {
                for component in &components[split..] {
                    match component {
                        Component::CurDir => {}
                        Component::ParentDir => {
                            resolved.pop();
                        }
                        other => resolved.push(other.as_os_str()),
                    }
                }
                return Ok(resolved);
            }
            Err(e) if is_absent(&e) => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("no existing ancestor of {}", path.display()),
    ))
}

fn is_absent(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

fn slash_path(relative: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        parts.push(
            component
                .as_os_str()
                .to_str()
                .ok_or(ShepherdError::InvalidUtf8Path)?,
        );
    }
    Ok(parts.join("/"))
}
