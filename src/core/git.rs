//! Git repository access and subprocess execution.
//!
//! This module provides the [`GitRepo`] handle through which every other part of
//! the engine talks to git. Repository metadata (root, merge state, revisions,
//! trees, index) is read with `git2`; mutations and porcelain queries are run
//! through the `git` binary, either capturing all output or streaming it.
//!
//! # Public API
//! - [`GitRepo`]: Repository handle and command executor
//! - [`GitStream`]: Scoped handle on a running git process and its stdout
//! - [`DiffEntry`]: One raw `diff-index` record
//!
//! # Resource handling
//! A [`GitStream`] owns its child process. Calling [`GitStream::finish`] drains
//! the output, reaps the process and checks its exit status; dropping an
//! unfinished stream kills and reaps the process instead. Either way the process
//! is released exactly once. Its stderr is collected on a separate thread so a
//! chatty process never blocks while stdout is being read.

use crate::core::{
    error::{Result, ShepherdError},
    pathspec::PathSpec,
};
use git2::{ObjectType, Oid, Repository, RepositoryState};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};

pub struct GitRepo {
    repo: Repository,
    root: PathBuf,
    git_binary: String,
}

impl GitRepo {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_binary(path, "git")
    }

    /// Open the repository containing `path`, running `git_binary` for subprocess calls
    pub fn open_with_binary<P: AsRef<Path>>(path: P, git_binary: &str) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|_| ShepherdError::NotInGitRepo)?;
        let workdir = repo.workdir().ok_or(ShepherdError::NotInGitRepo)?;
        let root = std::fs::canonicalize(workdir)?;

        log::debug!("Opened repository at {}", root.display());

        Ok(GitRepo {
            repo,
            root,
            git_binary: git_binary.to_string(),
        })
    }

    /// Canonical path of the working tree root
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get_repository(&self) -> &Repository {
        &self.repo
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.git_binary);
        cmd.args(args).current_dir(&self.root);
        cmd
    }

    /// Run git and capture its stdout; a non-zero exit is an error
    pub fn run(&self, args: &[String]) -> Result<String> {
        log::debug!("Running git {}", args.join(" "));
        let output = self.command(args).stdin(Stdio::null()).output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ShepherdError::git_command_failed(args, stderr));
        }

        String::from_utf8(output.stdout).map_err(|_| ShepherdError::InvalidUtf8Path)
    }

    /// Run git and return whether it succeeded, ignoring its output
    pub fn run_unchecked(&self, args: &[String]) -> Result<bool> {
        log::debug!("Running git {} (exit status ignored)", args.join(" "));
        let status = self
            .command(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        Ok(status.success())
    }

    /// Run git attached to the terminal (editor sessions, transfer progress)
    pub fn run_interactive(&self, args: &[String]) -> Result<()> {
        log::debug!("Running git {} interactively", args.join(" "));
        let status = self.command(args).status()?;

        if !status.success() {
            return Err(ShepherdError::git_command_failed(
                args,
                format!("exited with {status}"),
            ));
        }

        Ok(())
    }

    /// Start git with its stdout piped back for incremental reading
    pub fn stream(&self, args: &[String]) -> Result<GitStream> {
        log::debug!("Streaming git {}", args.join(" "));
        let mut child = self
            .command(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child.stdout.take().ok_or_else(|| {
            io::Error::new(io::ErrorKind::BrokenPipe, "git stdout was not captured")
        })?;
        let stderr = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut collected = String::new();
                pipe.read_to_string(&mut collected).map(|_| collected)
            })
        });

        Ok(GitStream {
            args: args.to_vec(),
            child: Some(child),
            stderr,
            reader: BufReader::new(stdout),
        })
    }

    /// Whether a merge is waiting to be committed
    pub fn is_merging(&self) -> bool {
        self.repo.state() == RepositoryState::Merge
    }

    /// Resolve a revision expression to a commit id.
    ///
    /// Returns `Ok(None)` when the revision does not name anything, for example
    /// `HEAD` in a repository without commits.
    pub fn resolve_commit(&self, revision: &str) -> Result<Option<Oid>> {
        let object = match self.repo.revparse_single(revision) {
            Ok(object) => object,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) if e.code() == git2::ErrorCode::InvalidSpec => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let commit = object.peel_to_commit()?;
        Ok(Some(commit.id()))
    }

    /// Whether `path` (repository-relative) exists in the tree of `commit`
    pub fn tree_contains(&self, commit: Oid, path: &Path) -> Result<bool> {
        let tree = self.repo.find_commit(commit)?.tree()?;
        if path.as_os_str().is_empty() {
            return Ok(true);
        }
        match tree.get_path(path) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether `path` (repository-relative) has an entry in the index
    pub fn index_contains(&self, path: &Path) -> Result<bool> {
        let index = self.repo.index()?;
        if index.get_path(path, 0).is_some() {
            return Ok(true);
        }
        // A directory is known when any entry lives below it
        let prefix = path.to_str().ok_or(ShepherdError::InvalidUtf8Path)?;
        let prefix = format!("{}/", prefix.trim_end_matches('/'));
        Ok(index
            .iter()
            .any(|entry| entry.path.starts_with(prefix.as_bytes())))
    }

    /// Blob id the working tree file at `path` would get if it were added,
    /// or `None` when nothing exists there.
    pub fn worktree_blob_id(&self, path: &str) -> Result<Option<Oid>> {
        let full = self.root.join(path);
        let metadata = match full.symlink_metadata() {
            Ok(metadata) => metadata,
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                ) =>
            {
                return Ok(None)
            }
            Err(e) => return Err(e.into()),
        };

        // Symlinks are stored as a blob of their target
        if metadata.file_type().is_symlink() {
            let target = std::fs::read_link(&full)?;
            let target = target.to_str().ok_or(ShepherdError::InvalidUtf8Path)?;
            return Ok(Some(Oid::hash_object(ObjectType::Blob, target.as_bytes())?));
        }
        Ok(Some(Oid::hash_file(ObjectType::Blob, &full)?))
    }

    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;

        match head.shorthand() {
            Some(name) if head.is_branch() => Ok(name.to_string()),
            _ => {
                let oid = head
                    .target()
                    .ok_or_else(|| ShepherdError::revision_not_found("HEAD"))?;
                Ok(format!("detached at {}", &oid.to_string()[..7]))
            }
        }
    }

    /// Local branch names, with a flag marking the checked out one
    pub fn local_branches(&self) -> Result<Vec<(String, bool)>> {
        let mut branches = Vec::new();
        for branch in self.repo.branches(Some(git2::BranchType::Local))? {
            let (branch, _) = branch?;
            let name = branch.name()?.ok_or(ShepherdError::InvalidUtf8Path)?;
            branches.push((name.to_string(), branch.is_head()));
        }
        branches.sort();
        Ok(branches)
    }

    /// Compare the tree of `commit` with the working tree, restricted to `pathspecs`.
    pub fn diff_status(&self, commit: Oid, pathspecs: &[PathSpec]) -> Result<Vec<DiffEntry>> {
        // Stale stat information makes diff-index report unchanged files
        self.run_unchecked(&["update-index".into(), "-q".into(), "--refresh".into()])?;

        let mut args: Vec<String> = vec![
            "diff-index".into(),
            "-z".into(),
            "--raw".into(),
            "--no-renames".into(),
            commit.to_string(),
            "--".into(),
        ];
        args.extend(pathspecs.iter().map(PathSpec::to_arg));

        let output = self.run(&args)?;
        parse_diff_index(&output)
    }
}

/// One record of `git diff-index --raw` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub old_mode: String,
    pub new_mode: String,
    pub old_id: String,
    pub new_id: String,
    pub status: char,
    pub path: String,
}

impl DiffEntry {
    /// Whether the working tree side has no precomputed blob id
    pub fn new_id_unknown(&self) -> bool {
        self.new_id.bytes().all(|b| b == b'0')
    }
}

fn parse_diff_index(output: &str) -> Result<Vec<DiffEntry>> {
    let mut entries = Vec::new();
    let mut fields = output.split('\0');

    while let Some(header) = fields.next() {
        if header.is_empty() {
            continue;
        }

        let malformed =
            || ShepherdError::status_query(format!("malformed diff record: {header:?}"));
        let meta = header.strip_prefix(':').ok_or_else(malformed)?;
        let parts: Vec<&str> = meta.split(' ').collect();
        if parts.len() != 5 {
            return Err(malformed());
        }
        let status = parts[4].chars().next().ok_or_else(malformed)?;
        let path = fields.next().filter(|p| !p.is_empty()).ok_or_else(malformed)?;

        entries.push(DiffEntry {
            old_mode: parts[0].to_string(),
            new_mode: parts[1].to_string(),
            old_id: parts[2].to_string(),
            new_id: parts[3].to_string(),
            status,
            path: path.to_string(),
        });
    }

    Ok(entries)
}

/// A running git process whose stdout is read incrementally.
pub struct GitStream {
    args: Vec<String>,
    child: Option<Child>,
    stderr: Option<JoinHandle<io::Result<String>>>,
    reader: BufReader<ChildStdout>,
}

impl GitStream {
    pub fn reader(&mut self) -> &mut BufReader<ChildStdout> {
        &mut self.reader
    }

    /// Drain the remaining output, reap the process and check its exit status
    pub fn finish(mut self) -> Result<()> {
        io::copy(&mut self.reader, &mut io::sink())?;

        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child.wait()?;
        let stderr = self.collect_stderr()?;

        if !status.success() {
            return Err(ShepherdError::git_command_failed(&self.args, stderr));
        }

        Ok(())
    }

    fn collect_stderr(&mut self) -> io::Result<String> {
        match self.stderr.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| io::Error::other("stderr reader panicked"))?,
            None => Ok(String::new()),
        }
    }
}

impl BufRead for GitStream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

impl Read for GitStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Drop for GitStream {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            log::debug!("Stopping unfinished git {}", self.args.join(" "));
            let _ = child.kill();
            let _ = child.wait();
        }
        let _ = self.collect_stderr();
    }
}
