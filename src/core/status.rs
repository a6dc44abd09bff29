//! Working-tree status classification.
//!
//! This module runs git's machine-readable status query and turns every record
//! into a [`ChangeRecord`] with exactly one [`ChangeKind`]. Records are produced
//! lazily by a [`StatusReader`] that owns the running query; unparseable output
//! is a fatal error for the whole query, never skipped.
//!
//! # Public API
//! - [`ChangeKind`]: Exhaustive classification of a path's state
//! - [`ChangeRecord`]: One classified status record
//! - [`StatusCode`]: The raw two-letter porcelain code
//! - [`classify`]: Start a status query, optionally restricted to pathspecs
//!
//! # Record format
//! `status --porcelain=v1 -z` emits `XY<space><path>` terminated by NUL. When
//! either letter is `R` or `C` the next NUL-terminated field holds the source path.

use crate::core::{
    error::{Result, ShepherdError},
    git::{GitRepo, GitStream},
    pathspec::PathSpec,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::BufRead;

/// Classification of one status record. Every valid code maps to exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
    Copied,
    Renamed,
    /// Staged in the index, but absent from the working tree
    Missing,
    Untracked,
    /// Conflict pending manual resolution
    Unmerged,
    Ignored,
    /// File type changed (regular file, symlink, submodule)
    ChangedMode,
}

impl ChangeKind {
    /// Short marker used in listings
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "A",
            ChangeKind::Modified => "M",
            ChangeKind::Removed => "R",
            ChangeKind::Copied => "C",
            ChangeKind::Renamed => "R>",
            ChangeKind::Missing => "!",
            ChangeKind::Untracked => "?",
            ChangeKind::Unmerged => "U",
            ChangeKind::Ignored => "I",
            ChangeKind::ChangedMode => "T",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Removed => "removed",
            ChangeKind::Copied => "copied",
            ChangeKind::Renamed => "renamed",
            ChangeKind::Missing => "missing",
            ChangeKind::Untracked => "untracked",
            ChangeKind::Unmerged => "unmerged",
            ChangeKind::Ignored => "ignored",
            ChangeKind::ChangedMode => "type changed",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Raw two-letter porcelain status code: index half then worktree half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode {
    pub index: u8,
    pub worktree: u8,
}

impl StatusCode {
    pub fn new(index: u8, worktree: u8) -> Self {
        StatusCode { index, worktree }
    }

    /// Whether the record carries a second (source) path
    pub fn has_source_path(&self) -> bool {
        matches!(self.index, b'R' | b'C') || matches!(self.worktree, b'R' | b'C')
    }

    /// Classify this code, returning the kind and whether the change is staged.
    pub fn classify(&self) -> Result<(ChangeKind, bool)> {
        let (x, y) = (self.index, self.worktree);
        let valid_index = matches!(x, b' ' | b'M' | b'T' | b'A' | b'D' | b'R' | b'C');
        let valid_worktree = matches!(y, b' ' | b'M' | b'T' | b'A' | b'D' | b'R' | b'C');
        let staged = x != b' ';

        let kind = match (x, y) {
            (b'?', b'?') => ChangeKind::Untracked,
            (b'!', b'!') => ChangeKind::Ignored,
            (b'D', b'D')
            | (b'A', b'U')
            | (b'U', b'D')
            | (b'U', b'A')
            | (b'D', b'U')
            | (b'A', b'A')
            | (b'U', b'U') => ChangeKind::Unmerged,
            _ if !valid_index || !valid_worktree || (x == b' ' && y == b' ') => {
                return Err(self.invalid());
            }
            // Deleted from the index, or only from the working tree
            (b'D', b' ') | (b' ', b'D') => ChangeKind::Removed,
            (b'D', _) => return Err(self.invalid()),
            // The index holds changes the working tree no longer has
            (_, b'D') => ChangeKind::Missing,
            _ if x == b'R' || y == b'R' => ChangeKind::Renamed,
            _ if x == b'C' || y == b'C' => ChangeKind::Copied,
            (b'A', _) => ChangeKind::Added,
            (b' ', b'A') => ChangeKind::Added,
            (_, b'A') => return Err(self.invalid()),
            _ if x == b'T' || y == b'T' => ChangeKind::ChangedMode,
            _ => ChangeKind::Modified,
        };

        let staged = match kind {
            ChangeKind::Untracked | ChangeKind::Ignored => false,
            ChangeKind::Unmerged => true,
            _ => staged,
        };
        Ok((kind, staged))
    }

    fn invalid(&self) -> ShepherdError {
        ShepherdError::status_query(format!("unknown status code {:?}", self.to_string()))
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.index as char, self.worktree as char)
    }
}

/// One classified path from a status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Repository-root-relative, slash-separated
    pub path: String,
    /// Source path of a rename or copy
    pub previous_path: Option<String>,
    pub kind: ChangeKind,
    pub staged: bool,
}

impl ChangeRecord {
    /// Pathspec naming this record's (destination) path
    pub fn pathspec(&self) -> PathSpec {
        PathSpec::TopAnchored(self.path.clone())
    }

    /// Added only as intent-to-add: tracked, but with no content staged yet
    pub fn is_intent_to_add(&self) -> bool {
        self.kind == ChangeKind::Added && !self.staged
    }
}

/// Options for a status query.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusOptions {
    pub include_ignored: bool,
}

/// Start a status query restricted to `pathspecs` (all paths when empty).
pub fn classify(repo: &GitRepo, pathspecs: &[PathSpec]) -> Result<StatusReader> {
    classify_with_options(repo, pathspecs, StatusOptions::default())
}

pub fn classify_with_options(
    repo: &GitRepo,
    pathspecs: &[PathSpec],
    options: StatusOptions,
) -> Result<StatusReader> {
    let mut args: Vec<String> = vec![
        "status".into(),
        "--porcelain=v1".into(),
        "-z".into(),
        "--untracked-files=all".into(),
    ];
    if options.include_ignored {
        args.push("--ignored".into());
    }
    if !pathspecs.is_empty() {
        args.push("--".into());
        args.extend(pathspecs.iter().map(PathSpec::to_arg));
    }

    let stream = repo.stream(&args)?;
    Ok(StatusReader {
        stream: Some(stream),
        buf: Vec::new(),
    })
}

/// Lazy, single-pass sequence of status records backed by a running git process.
///
/// The process is released when the sequence is exhausted, when it yields an
/// error, when [`StatusReader::close`] is called, or when the reader is dropped.
pub struct StatusReader {
    stream: Option<GitStream>,
    buf: Vec<u8>,
}

impl StatusReader {
    /// Stop reading: drain the remaining output and check the query's exit status
    pub fn close(mut self) -> Result<()> {
        match self.stream.take() {
            Some(stream) => stream.finish(),
            None => Ok(()),
        }
    }

    fn next_record(&mut self) -> Result<Option<ChangeRecord>> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(None);
        };

        match read_change(stream, &mut self.buf)? {
            Some(record) => Ok(Some(record)),
            None => {
                if let Some(stream) = self.stream.take() {
                    stream
                        .finish()
                        .map_err(|e| ShepherdError::status_query(e.to_string()))?;
                }
                Ok(None)
            }
        }
    }
}

impl Iterator for StatusReader {
    type Item = Result<ChangeRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                // Fuse after an error; dropping the stream stops the process
                self.stream = None;
                Some(Err(e))
            }
        }
    }
}

/// Read one NUL-terminated field. Returns `false` at a clean end of input.
fn read_field<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> Result<bool> {
    buf.clear();
    if reader.read_until(0, buf)? == 0 {
        return Ok(false);
    }
    if buf.pop() != Some(0) {
        return Err(ShepherdError::status_query("truncated status record"));
    }
    Ok(true)
}

fn field_to_path(field: &[u8]) -> Result<String> {
    if field.is_empty() {
        return Err(ShepherdError::status_query("empty path in status record"));
    }
    std::str::from_utf8(field)
        .map(str::to_string)
        .map_err(|_| ShepherdError::status_query("status path is not valid UTF-8"))
}

/// Decode the next record from porcelain v1 `-z` output.
pub(crate) fn read_change<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> Result<Option<ChangeRecord>> {
    if !read_field(reader, buf)? {
        return Ok(None);
    }
    if buf.len() < 4 || buf[2] != b' ' {
        return Err(ShepherdError::status_query(format!(
            "malformed status record {:?}",
            String::from_utf8_lossy(buf)
        )));
    }

    let code = StatusCode::new(buf[0], buf[1]);
    let (kind, staged) = code.classify()?;
    let path = field_to_path(&buf[3..])?;

    let previous_path = if code.has_source_path() {
        if !read_field(reader, buf)? {
            return Err(ShepherdError::status_query(format!(
                "status record for {path} is missing its source path"
            )));
        }
        Some(field_to_path(buf)?)
    } else {
        None
    };

    Ok(Some(ChangeRecord {
        path,
        previous_path,
        kind,
        staged,
    }))
}
