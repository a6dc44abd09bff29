//! Backup and mutation phases of a revert.
//!
//! Reverting overwrites working tree content, so every file whose content
//! differs from the target is first renamed to `<path>.orig`, one file at a time.
//! Only then are the index and working tree changed. The phases are not
//! transactional: a failure part way through the backups stops the revert and
//! leaves the renames already made in place.

use crate::core::{
    error::{Result, ShepherdError},
    git::GitRepo,
    pathspec::PathSpec,
    reconcile::{RestorePlan, RevertPlan},
};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix given to pre-revert copies of modified files
pub const BACKUP_SUFFIX: &str = ".orig";

/// What a revert did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevertReport {
    pub backed_up: usize,
    /// Files removed from tracking and left on disk
    pub untracked: usize,
    /// Files whose content or mode was restored from the target
    pub restored: usize,
}

/// Location of the backup for `path`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Rename each modified file to its `.orig` backup, returning how many were renamed.
pub fn backup(repo_root: &Path, modified: &[PathSpec]) -> Result<usize> {
    let mut completed = 0;
    for spec in modified {
        let source = spec.disk_path(repo_root);
        let target = backup_path(&source);
        log::debug!("Backing up {} to {}", source.display(), target.display());
        if let Err(e) = std::fs::rename(&source, &target) {
            log::warn!(
                "Backup of {} failed with {completed} file(s) already renamed",
                source.display()
            );
            return Err(ShepherdError::backup_failed(&source, completed, e));
        }
        completed += 1;
    }
    Ok(completed)
}

/// Untrack the added files (keeping them on disk), then restore everything else
/// from the target commit in one checkout.
pub fn mutate(repo: &GitRepo, plan: &RestorePlan) -> Result<()> {
    if !plan.added.is_empty() {
        untrack(repo, &plan.added, false)?;
    }

    let restore: Vec<&PathSpec> = plan
        .modified
        .iter()
        .chain(&plan.mode_changed)
        .chain(&plan.deleted)
        .collect();
    if !restore.is_empty() {
        let mut args: Vec<String> = vec!["checkout".into(), plan.commit.to_string(), "--".into()];
        args.extend(restore.iter().map(|spec| spec.to_arg()));
        repo.run(&args)?;
    }

    Ok(())
}

/// Remove paths from the index without touching the working tree, returning
/// how many index entries were removed.
fn untrack(repo: &GitRepo, specs: &[PathSpec], recursive: bool) -> Result<usize> {
    let mut args: Vec<String> = vec!["rm".into(), "--cached".into(), "-f".into()];
    if recursive {
        args.push("-r".into());
        args.push("--ignore-unmatch".into());
    }
    args.push("--".into());
    args.extend(specs.iter().map(PathSpec::to_arg));
    let output = repo.run(&args)?;
    Ok(removed_entries(&output))
}

/// Count the `rm '<path>'` lines git prints for each removed entry
fn removed_entries(output: &str) -> usize {
    output.lines().filter(|line| line.starts_with("rm '")).count()
}

/// Carry out a revert plan. Backups are made first unless disabled.
pub fn run_revert(repo: &GitRepo, plan: &RevertPlan, backups: bool) -> Result<RevertReport> {
    match plan {
        RevertPlan::Unstage(specs) => {
            let untracked = untrack(repo, specs, true)?;
            Ok(RevertReport {
                untracked,
                ..RevertReport::default()
            })
        }
        RevertPlan::Restore(plan) => {
            let backed_up = if backups {
                backup(repo.root(), &plan.modified)?
            } else {
                0
            };
            mutate(repo, plan)?;
            Ok(RevertReport {
                backed_up,
                untracked: plan.added.len(),
                restored: plan.modified.len() + plan.mode_changed.len() + plan.deleted.len(),
            })
        }
    }
}
