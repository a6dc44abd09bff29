//! Predefined repository scenarios
//!
//! Each function builds a repository in a specific state so tests across
//! commands exercise the same situations consistently.

#![allow(dead_code)]

use super::repository::*;
use git_shepherd::core::error::Result;

/// Scenario: one file of every kind the commit rules distinguish
///
/// - `modified.txt`: changed in the working tree
/// - `removed.txt`: removed with `git rm`
/// - `deleted.txt`: deleted from disk only
/// - `intent.txt`: added with `git add -N`
/// - `untracked.txt`: never added
pub fn create_mixed_changes_repo() -> Result<TestRepo> {
    let repo = setup_test_repo()?;

    create_test_files(
        &repo.path,
        &["modified.txt", "removed.txt", "deleted.txt", "stable.txt"],
    )?;
    git_add(&repo.path, ".")?;
    git_commit(&repo.path, "Initial commit")?;

    modify_test_files(&repo.path, &["modified.txt"])?;
    git_run(&repo.path, &["rm", "--quiet", "removed.txt"])?;
    delete_file(&repo.path, "deleted.txt")?;
    create_test_files(&repo.path, &["intent.txt", "untracked.txt"])?;
    git_run(&repo.path, &["add", "-N", "intent.txt"])?;

    Ok(repo)
}

/// Scenario: a merge stopped with conflicts in each of `files`
pub fn create_conflicted_merge_repo(files: &[&str]) -> Result<TestRepo> {
    let repo = setup_test_repo()?;

    for file in files {
        create_file(&repo.path, file, "base\n")?;
    }
    git_add(&repo.path, ".")?;
    git_commit(&repo.path, "Base")?;
    let main_branch = current_branch(&repo.path)?;

    git_run(&repo.path, &["checkout", "--quiet", "-b", "feature"])?;
    for file in files {
        create_file(&repo.path, file, "feature side\n")?;
    }
    git_add(&repo.path, ".")?;
    git_commit(&repo.path, "Feature change")?;

    git_run(&repo.path, &["checkout", "--quiet", &main_branch])?;
    for file in files {
        create_file(&repo.path, file, "main side\n")?;
    }
    git_add(&repo.path, ".")?;
    git_commit(&repo.path, "Main change")?;

    // Expected to fail with conflicts
    git_try(&repo.path, &["merge", "--quiet", "feature"])?;

    Ok(repo)
}

/// Scenario: two commits of `tracked.txt`, then a working tree change
pub fn create_history_repo() -> Result<TestRepo> {
    let repo = setup_test_repo()?;

    create_file(&repo.path, "tracked.txt", "first\n")?;
    git_add(&repo.path, "tracked.txt")?;
    git_commit(&repo.path, "First")?;

    create_file(&repo.path, "tracked.txt", "second\n")?;
    git_add(&repo.path, "tracked.txt")?;
    git_commit(&repo.path, "Second")?;

    create_file(&repo.path, "tracked.txt", "work in progress\n")?;
    Ok(repo)
}
