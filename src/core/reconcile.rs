//! Change reconciliation for commit, revert and backout.
//!
//! Given an operation and an optional list of file arguments, this module decides
//! which paths take part, applies the blocking policies, and produces the plan the
//! command handlers execute. Nothing here mutates the repository; a plan with
//! policy violations cannot be turned into an actionable selection.
//!
//! # Public API
//! - [`select_for_commit`] / [`ReconciliationResult`]: commit file selection
//! - [`commit_args`]: argument list for the commit itself
//! - [`select_for_revert`] / [`RevertPlan`]: revert planning
//! - [`ensure_no_unmerged`]: unmerged-file gate shared with backout

use crate::core::{
    error::{PolicyViolation, Result, ShepherdError},
    git::{DiffEntry, GitRepo},
    pathspec::{PathResolver, PathSpec},
    status::{self, ChangeKind, ChangeRecord},
};
use git2::Oid;

/// Revision a revert restores when none is given
pub const DEFAULT_REVERT_REVISION: &str = "HEAD";

/// What a commit should include.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitSelection {
    /// Every tracked change (used while a merge is pending)
    AllTracked,
    /// Exactly these paths; empty only for a message-only amend
    Files(Vec<PathSpec>),
}

/// Outcome of reconciling a commit request against the working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationResult {
    selection: CommitSelection,
    violations: Vec<PolicyViolation>,
    missing: usize,
}

impl ReconciliationResult {
    fn clean(selection: CommitSelection) -> Self {
        ReconciliationResult {
            selection,
            violations: Vec::new(),
            missing: 0,
        }
    }

    pub fn violations(&self) -> &[PolicyViolation] {
        &self.violations
    }

    pub fn is_blocked(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Tracked files absent from disk that were left out of the selection
    pub fn missing_count(&self) -> usize {
        self.missing
    }

    /// The selection to act on, or the first blocking violation.
    pub fn into_selection(self) -> Result<CommitSelection> {
        match self.violations.into_iter().next() {
            Some(violation) => Err(violation.into()),
            None => Ok(self.selection),
        }
    }
}

/// Decide which files a commit includes.
///
/// Explicit files are resolved and used as-is without consulting status. During
/// a merge the whole tree is committed. Otherwise every added, modified, removed,
/// copied, renamed or type-changed path reported by status is selected.
pub fn select_for_commit(
    repo: &GitRepo,
    resolver: &PathResolver,
    explicit_files: &[String],
    amend: bool,
) -> Result<ReconciliationResult> {
    if !explicit_files.is_empty() {
        let specs = resolver.resolve_all(explicit_files)?;
        log::debug!("Committing {} explicitly named path(s)", specs.len());
        return Ok(ReconciliationResult::clean(CommitSelection::Files(specs)));
    }

    if repo.is_merging() {
        if amend {
            return Err(ShepherdError::usage("cannot amend while a merge is in progress"));
        }
        let unmerged = count_unmerged(status::classify(repo, &[])?)?;
        let mut result = ReconciliationResult::clean(CommitSelection::AllTracked);
        if unmerged > 0 {
            result.violations.push(PolicyViolation::Unmerged(unmerged));
        }
        return Ok(result);
    }

    reconcile_records(status::classify(repo, &[])?, amend)
}

/// Apply the commit selection rules to a stream of status records.
pub fn reconcile_records<I>(records: I, amend: bool) -> Result<ReconciliationResult>
where
    I: IntoIterator<Item = Result<ChangeRecord>>,
{
    let mut files = Vec::new();
    let mut unmerged = 0;
    let mut missing = 0;
    let mut missing_staged = 0;

    for record in records {
        let record = record?;
        match record.kind {
            ChangeKind::Unmerged => unmerged += 1,
            ChangeKind::Missing if record.staged => missing_staged += 1,
            ChangeKind::Missing => missing += 1,
            ChangeKind::Added if record.is_intent_to_add() => {
                log::debug!("Skipping intent-to-add file {}", record.path);
            }
            ChangeKind::Added
            | ChangeKind::Modified
            | ChangeKind::Removed
            | ChangeKind::Copied
            | ChangeKind::ChangedMode => files.push(record.pathspec()),
            ChangeKind::Renamed => {
                if let Some(previous) = &record.previous_path {
                    files.push(PathSpec::TopAnchored(previous.clone()));
                }
                files.push(record.pathspec());
            }
            ChangeKind::Untracked | ChangeKind::Ignored => {}
        }
    }

    let mut violations = Vec::new();
    if unmerged > 0 {
        violations.push(PolicyViolation::Unmerged(unmerged));
    }
    if files.is_empty() {
        if !amend {
            violations.push(PolicyViolation::NothingChanged);
        }
    } else if missing_staged > 0 {
        violations.push(PolicyViolation::MissingStaged(missing_staged));
    }

    log::debug!(
        "Commit reconciliation: {} selected, {} unmerged, {} missing, {} missing but staged",
        files.len(),
        unmerged,
        missing,
        missing_staged
    );

    Ok(ReconciliationResult {
        selection: CommitSelection::Files(files),
        violations,
        missing,
    })
}

fn count_unmerged<I>(records: I) -> Result<usize>
where
    I: IntoIterator<Item = Result<ChangeRecord>>,
{
    let mut unmerged = 0;
    for record in records {
        if record?.kind == ChangeKind::Unmerged {
            unmerged += 1;
        }
    }
    Ok(unmerged)
}

/// Fail with a policy violation when any file is unmerged.
pub fn ensure_no_unmerged(repo: &GitRepo) -> Result<()> {
    match count_unmerged(status::classify(repo, &[])?)? {
        0 => Ok(()),
        n => Err(PolicyViolation::Unmerged(n).into()),
    }
}

/// Build the `git commit` argument list for a selection.
pub fn commit_args(
    selection: &CommitSelection,
    amend: bool,
    message: Option<&str>,
) -> Vec<String> {
    let mut args = vec!["commit".to_string()];
    if amend {
        args.push("--amend".into());
    }
    if let Some(message) = message {
        args.push("-m".into());
        args.push(message.to_string());
    }
    match selection {
        CommitSelection::AllTracked => args.push("-a".into()),
        CommitSelection::Files(files) => {
            args.push("--only".into());
            if !files.is_empty() {
                args.push("--".into());
                args.extend(files.iter().map(PathSpec::to_arg));
            }
        }
    }
    args
}

/// A revert request as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct RevertRequest {
    pub files: Vec<String>,
    pub revision: Option<String>,
    pub all: bool,
}

/// Diff between the target revision and the working tree, split into disjoint buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestorePlan {
    pub commit: Oid,
    /// Present now, absent in the target: untracked but kept on disk
    pub added: Vec<PathSpec>,
    /// Absent now, present in the target: restored
    pub deleted: Vec<PathSpec>,
    /// Content differs from the target: backed up, then restored
    pub modified: Vec<PathSpec>,
    /// Only the file mode differs from the target: restored without backup
    pub mode_changed: Vec<PathSpec>,
}

impl RestorePlan {
    fn empty(commit: Oid) -> Self {
        RestorePlan {
            commit,
            added: Vec::new(),
            deleted: Vec::new(),
            modified: Vec::new(),
            mode_changed: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.deleted.is_empty()
            && self.modified.is_empty()
            && self.mode_changed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertPlan {
    /// No commit to restore from yet: remove the paths from the index instead
    Unstage(Vec<PathSpec>),
    Restore(RestorePlan),
}

/// Work out what a revert has to do, checking every argument first.
pub fn select_for_revert(
    repo: &GitRepo,
    resolver: &PathResolver,
    request: &RevertRequest,
) -> Result<RevertPlan> {
    if request.files.is_empty() && !request.all {
        return Err(ShepherdError::usage(
            "no files given; name the files to revert or pass --all",
        ));
    }
    if !request.files.is_empty() && request.all {
        return Err(ShepherdError::usage(
            "--all cannot be combined with file arguments",
        ));
    }

    let specs = if request.all {
        vec![PathSpec::RepositoryRoot]
    } else {
        resolver.resolve_all(&request.files)?
    };

    let revision = request
        .revision
        .as_deref()
        .unwrap_or(DEFAULT_REVERT_REVISION);
    let commit = match repo.resolve_commit(revision)? {
        Some(commit) => commit,
        None if request.revision.is_none() => {
            log::debug!("{revision} does not resolve; falling back to unstaging");
            check_known(repo, &request.files, &specs, None)?;
            return Ok(RevertPlan::Unstage(specs));
        }
        None => return Err(ShepherdError::revision_not_found(revision)),
    };

    check_known(repo, &request.files, &specs, Some(commit))?;

    let entries = repo.diff_status(commit, &specs)?;
    let plan = bucket_diff(commit, &entries, |path| repo.worktree_blob_id(path))?;
    log::debug!(
        "Revert plan: {} added, {} deleted, {} modified, {} mode-only",
        plan.added.len(),
        plan.deleted.len(),
        plan.modified.len(),
        plan.mode_changed.len()
    );
    Ok(RevertPlan::Restore(plan))
}

/// Every argument missing from disk must exist in the target tree (or the index
/// when there is no target commit).
fn check_known(
    repo: &GitRepo,
    arguments: &[String],
    specs: &[PathSpec],
    commit: Option<Oid>,
) -> Result<()> {
    for (argument, spec) in arguments.iter().zip(specs) {
        if spec.disk_path(repo.root()).symlink_metadata().is_ok() {
            continue;
        }
        let known = match (spec.repo_relative(), commit) {
            (Some(path), Some(commit)) => repo.tree_contains(commit, path)?,
            (Some(path), None) => repo.index_contains(path)?,
            (None, _) => false,
        };
        if !known {
            return Err(ShepherdError::not_known(argument.as_str()));
        }
    }
    Ok(())
}

/// Split raw diff records into revert buckets.
///
/// `worktree_id` hashes a working tree file, returning `None` when the path is
/// absent. It is consulted for records whose mode changed without a precomputed
/// blob id, and for paths missing from the index that may still exist on disk.
pub fn bucket_diff<F>(commit: Oid, entries: &[DiffEntry], worktree_id: F) -> Result<RestorePlan>
where
    F: Fn(&str) -> Result<Option<Oid>>,
{
    let mut plan = RestorePlan::empty(commit);

    for entry in entries {
        let spec = PathSpec::TopAnchored(entry.path.clone());
        match entry.status {
            'A' => plan.added.push(spec),
            'D' => match worktree_id(&entry.path)? {
                // Untracked in the index but still on disk with other content
                Some(id) if id.to_string() != entry.old_id => plan.modified.push(spec),
                _ => plan.deleted.push(spec),
            },
            'M' => {
                if entry.old_mode != entry.new_mode && same_content(entry, &worktree_id)? {
                    plan.mode_changed.push(spec)
                } else {
                    plan.modified.push(spec)
                }
            }
            'T' | 'U' => plan.modified.push(spec),
            other => {
                return Err(ShepherdError::status_query(format!(
                    "unexpected diff status {other:?} for {}",
                    entry.path
                )))
            }
        }
    }

    Ok(plan)
}

fn same_content<F>(entry: &DiffEntry, worktree_id: &F) -> Result<bool>
where
    F: Fn(&str) -> Result<Option<Oid>>,
{
    if !entry.new_id_unknown() {
        return Ok(entry.new_id == entry.old_id);
    }
    Ok(worktree_id(&entry.path)?.is_some_and(|id| id.to_string() == entry.old_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, kind: ChangeKind, staged: bool) -> Result<ChangeRecord> {
        Ok(ChangeRecord {
            path: path.to_string(),
            previous_path: None,
            kind,
            staged,
        })
    }

    fn top(path: &str) -> PathSpec {
        PathSpec::TopAnchored(path.to_string())
    }

    fn files(result: ReconciliationResult) -> Vec<PathSpec> {
        match result.into_selection().unwrap() {
            CommitSelection::Files(files) => files,
            CommitSelection::AllTracked => panic!("expected a file selection"),
        }
    }

    #[test]
    fn test_selects_tracked_changes_only() -> Result<()> {
        let records = vec![
            record("modified.txt", ChangeKind::Modified, false),
            record("deleted.txt", ChangeKind::Removed, true),
            record("added.txt", ChangeKind::Added, false),
            record("new.txt", ChangeKind::Untracked, false),
            record("build.log", ChangeKind::Ignored, false),
        ];
        let result = reconcile_records(records, false)?;
        assert_eq!(files(result), vec![top("modified.txt"), top("deleted.txt")]);
        Ok(())
    }

    #[test]
    fn test_staged_add_copy_and_type_change_are_selected() -> Result<()> {
        let records = vec![
            record("a.txt", ChangeKind::Added, true),
            record("c.txt", ChangeKind::Copied, true),
            record("link", ChangeKind::ChangedMode, false),
        ];
        let result = reconcile_records(records, false)?;
        assert_eq!(files(result), vec![top("a.txt"), top("c.txt"), top("link")]);
        Ok(())
    }

    #[test]
    fn test_rename_selects_both_paths() -> Result<()> {
        let records = vec![Ok(ChangeRecord {
            path: "new.txt".into(),
            previous_path: Some("old.txt".into()),
            kind: ChangeKind::Renamed,
            staged: true,
        })];
        let result = reconcile_records(records, false)?;
        assert_eq!(files(result), vec![top("old.txt"), top("new.txt")]);
        Ok(())
    }

    #[test]
    fn test_nothing_changed() -> Result<()> {
        let records = vec![record("new.txt", ChangeKind::Untracked, false)];
        let result = reconcile_records(records, false)?;
        assert_eq!(result.violations(), &[PolicyViolation::NothingChanged]);
        let err = result.into_selection().unwrap_err();
        assert_eq!(err.to_string(), "nothing changed");
        Ok(())
    }

    #[test]
    fn test_amend_allows_empty_selection() -> Result<()> {
        let result = reconcile_records(Vec::new(), true)?;
        assert!(!result.is_blocked());
        assert_eq!(files(result), Vec::<PathSpec>::new());
        Ok(())
    }

    #[test]
    fn test_one_unmerged_file() -> Result<()> {
        let records = vec![
            record("conflict.txt", ChangeKind::Unmerged, true),
            record("ok.txt", ChangeKind::Modified, false),
        ];
        let err = reconcile_records(records, true)?.into_selection().unwrap_err();
        assert!(err.to_string().contains("1 unmerged file"));
        assert!(!err.to_string().contains("files"));
        Ok(())
    }

    #[test]
    fn test_two_unmerged_files() -> Result<()> {
        let records = vec![
            record("a.txt", ChangeKind::Unmerged, true),
            record("b.txt", ChangeKind::Unmerged, true),
        ];
        let err = reconcile_records(records, false)?.into_selection().unwrap_err();
        assert!(err.to_string().contains("2 unmerged files"));
        Ok(())
    }

    #[test]
    fn test_unmerged_reported_before_nothing_changed() -> Result<()> {
        let records = vec![record("a.txt", ChangeKind::Unmerged, true)];
        let result = reconcile_records(records, false)?;
        assert_eq!(
            result.violations(),
            &[PolicyViolation::Unmerged(1), PolicyViolation::NothingChanged]
        );
        Ok(())
    }

    #[test]
    fn test_missing_is_counted_not_selected() -> Result<()> {
        let records = vec![
            record("gone.txt", ChangeKind::Missing, false),
            record("kept.txt", ChangeKind::Modified, false),
        ];
        let result = reconcile_records(records, false)?;
        assert_eq!(result.missing_count(), 1);
        assert_eq!(files(result), vec![top("kept.txt")]);
        Ok(())
    }

    #[test]
    fn test_missing_and_staged_blocks_when_something_changed() -> Result<()> {
        let records = vec![
            record("half.txt", ChangeKind::Missing, true),
            record("kept.txt", ChangeKind::Modified, false),
        ];
        let err = reconcile_records(records, false)?.into_selection().unwrap_err();
        assert!(err.to_string().starts_with("1 file is staged"));

        let records = vec![
            record("a.txt", ChangeKind::Missing, true),
            record("b.txt", ChangeKind::Missing, true),
            record("kept.txt", ChangeKind::Modified, false),
        ];
        let err = reconcile_records(records, false)?.into_selection().unwrap_err();
        assert!(err.to_string().starts_with("2 files are staged"));
        Ok(())
    }

    #[test]
    fn test_missing_and_staged_alone_reports_nothing_changed() -> Result<()> {
        let records = vec![record("half.txt", ChangeKind::Missing, true)];
        let result = reconcile_records(records, false)?;
        assert_eq!(result.violations(), &[PolicyViolation::NothingChanged]);
        Ok(())
    }

    #[test]
    fn test_status_error_propagates() {
        let records = vec![
            record("a.txt", ChangeKind::Modified, false),
            Err(ShepherdError::status_query("unknown status code \"ZZ\"")),
        ];
        assert!(reconcile_records(records, false).is_err());
    }

    #[test]
    fn test_commit_args() {
        let selection = CommitSelection::Files(vec![top("a.txt")]);
        assert_eq!(
            commit_args(&selection, false, Some("msg")),
            vec!["commit", "-m", "msg", "--only", "--", ":(top,literal)a.txt"]
        );
        assert_eq!(
            commit_args(&CommitSelection::AllTracked, false, None),
            vec!["commit", "-a"]
        );
        assert_eq!(
            commit_args(&CommitSelection::Files(Vec::new()), true, Some("reworded")),
            vec!["commit", "--amend", "-m", "reworded", "--only"]
        );
    }

    fn diff(
        status: char,
        path: &str,
        old_mode: &str,
        new_mode: &str,
        old_id: &str,
        new_id: &str,
    ) -> DiffEntry {
        DiffEntry {
            old_mode: old_mode.into(),
            new_mode: new_mode.into(),
            old_id: old_id.into(),
            new_id: new_id.into(),
            status,
            path: path.into(),
        }
    }

    #[test]
    fn test_bucket_diff() -> Result<()> {
        let zero = "0000000000000000000000000000000000000000";
        let blob = "1111111111111111111111111111111111111111";
        let other = "2222222222222222222222222222222222222222";
        let entries = vec![
            diff('A', "added.txt", "000000", "100644", zero, zero),
            diff('D', "deleted.txt", "100644", "000000", blob, zero),
            diff('M', "edited.txt", "100644", "100644", blob, zero),
            diff('M', "run.sh", "100644", "100755", blob, zero),
            diff('M', "tool.sh", "100644", "100755", blob, zero),
            diff('T', "link", "100644", "120000", blob, zero),
        ];
        let commit = Oid::from_str(blob).unwrap();
        let plan = bucket_diff(commit, &entries, |path| {
            let id = match path {
                "run.sh" => blob,
                "deleted.txt" => return Ok(None),
                _ => other,
            };
            Ok(Some(Oid::from_str(id).unwrap()))
        })?;

        assert_eq!(plan.added, vec![top("added.txt")]);
        assert_eq!(plan.deleted, vec![top("deleted.txt")]);
        assert_eq!(plan.modified, vec![top("edited.txt"), top("tool.sh"), top("link")]);
        assert_eq!(plan.mode_changed, vec![top("run.sh")]);
        Ok(())
    }

    #[test]
    fn test_bucket_diff_uses_precomputed_ids() -> Result<()> {
        let blob = "1111111111111111111111111111111111111111";
        let entries = vec![diff('M', "run.sh", "100644", "100755", blob, blob)];
        let commit = Oid::from_str(blob).unwrap();
        let plan = bucket_diff(commit, &entries, |_| {
            Err(ShepherdError::status_query("should not hash"))
        })?;
        assert_eq!(plan.mode_changed, vec![top("run.sh")]);
        Ok(())
    }

    #[test]
    fn test_bucket_diff_rejects_unknown_status() {
        let zero = "0000000000000000000000000000000000000000";
        let entries = vec![diff('X', "weird", "100644", "100644", zero, zero)];
        let commit = Oid::from_str("1111111111111111111111111111111111111111").unwrap();
        assert!(bucket_diff(commit, &entries, |_| Ok(Some(Oid::zero()))).is_err());
    }

    #[test]
    fn test_bucket_diff_unindexed_file_on_disk() -> Result<()> {
        let zero = "0000000000000000000000000000000000000000";
        let blob = "1111111111111111111111111111111111111111";
        let other = "2222222222222222222222222222222222222222";
        let entries = vec![
            diff('D', "edited.txt", "100644", "000000", blob, zero),
            diff('D', "same.txt", "100644", "000000", blob, zero),
            diff('D', "gone.txt", "100644", "000000", blob, zero),
        ];
        let commit = Oid::from_str(blob).unwrap();
        let plan = bucket_diff(commit, &entries, |path| match path {
            "edited.txt" => Ok(Some(Oid::from_str(other).unwrap())),
            "same.txt" => Ok(Some(Oid::from_str(blob).unwrap())),
            _ => Ok(None),
        })?;

        assert_eq!(plan.modified, vec![top("edited.txt")]);
        assert_eq!(plan.deleted, vec![top("same.txt"), top("gone.txt")]);
        Ok(())
    }

    mod live {
        use super::*;
        use std::fs;
        use tempfile::TempDir;

        fn git(dir: &std::path::Path, args: &[&str]) {
            std::process::Command::new("git")
                .args(args)
                .current_dir(dir)
                .output()
                .expect("git should run");
        }

        fn setup() -> (TempDir, GitRepo, PathResolver) {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path();
            git(path, &["init"]);
            git(path, &["config", "user.name", "Test User"]);
            git(path, &["config", "user.email", "test@example.com"]);
            fs::write(path.join("modified.txt"), "one\n").unwrap();
            fs::write(path.join("deleted.txt"), "two\n").unwrap();
            git(path, &["add", "."]);
            git(path, &["commit", "-m", "initial"]);
            let repo = GitRepo::open(path).unwrap();
            let resolver = PathResolver::new(repo.root(), repo.root()).unwrap();
            (temp_dir, repo, resolver)
        }

        #[test]
        fn test_inferred_commit_selects_edits_and_deletions() -> Result<()> {
            let (temp_dir, repo, resolver) = setup();
            fs::write(temp_dir.path().join("modified.txt"), "changed\n")?;
            fs::remove_file(temp_dir.path().join("deleted.txt"))?;
            fs::write(temp_dir.path().join("added.txt"), "new\n")?;
            git(temp_dir.path(), &["add", "-N", "added.txt"]);

            let result = select_for_commit(&repo, &resolver, &[], false)?;
            let mut selected = files(result);
            selected.sort_by_key(|spec| spec.to_string());
            assert_eq!(selected, vec![top("deleted.txt"), top("modified.txt")]);
            Ok(())
        }

        #[test]
        fn test_intent_to_add_is_committed_when_named() -> Result<()> {
            let (temp_dir, repo, resolver) = setup();
            fs::write(temp_dir.path().join("added.txt"), "new\n")?;
            git(temp_dir.path(), &["add", "-N", "added.txt"]);

            let result = select_for_commit(&repo, &resolver, &["added.txt".to_string()], false)?;
            assert_eq!(files(result), vec![top("added.txt")]);
            Ok(())
        }
    }
}
