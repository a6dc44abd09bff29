//! Git repository management and setup utilities
//!
//! Provides functions for creating test repositories and driving git directly,
//! so tests can arrange states the binary under test then has to deal with.

#![allow(dead_code)]

use assert_cmd::Command;
use git_shepherd::core::error::{Result, ShepherdError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test repository setup result. The TempDir must be kept alive for the
/// duration of the test to prevent cleanup.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The git-shepherd binary, run from the repository root with a
    /// config path that does not exist so defaults apply.
    pub fn shepherd(&self) -> Command {
        self.shepherd_in(&self.path)
    }

    /// The git-shepherd binary run from `dir`
    pub fn shepherd_in(&self, dir: &Path) -> Command {
        let mut cmd = Command::cargo_bin("git-shepherd").expect("binary is built");
        cmd.current_dir(dir)
            .env(
                "GIT_SHEPHERD_CONFIG",
                self.temp_dir.path().join("no-config.json"),
            )
            .env("GIT_EDITOR", "true")
            .env("NO_COLOR", "1");
        cmd
    }
}

/// Sets up a fresh git repository for testing
///
/// The repository lives in a `repo` directory inside the temporary directory,
/// leaving room next to it for remotes and out-of-tree files.
pub fn setup_test_repo() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let repo_path = fs::canonicalize(temp_dir.path())?.join("repo");
    fs::create_dir_all(&repo_path)?;

    git_run(&repo_path, &["init", "--quiet"])?;
    // Set git config to avoid prompts during tests
    git_run(&repo_path, &["config", "user.name", "Test User"])?;
    git_run(&repo_path, &["config", "user.email", "test@example.com"])?;
    git_run(&repo_path, &["config", "commit.gpgsign", "false"])?;

    Ok(TestRepo {
        temp_dir,
        path: repo_path,
    })
}

/// Sets up a git repository with `initial.txt` committed
pub fn setup_test_repo_with_initial_commit() -> Result<TestRepo> {
    let repo = setup_test_repo()?;
    create_file(&repo.path, "initial.txt", "initial content\n")?;
    git_add(&repo.path, "initial.txt")?;
    git_commit(&repo.path, "Initial commit")?;
    Ok(repo)
}

/// Runs git in `repo_path`, failing if it exits unsuccessfully
pub fn git_run(repo_path: &Path, args: &[&str]) -> Result<String> {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()?;

    if !output.status.success() {
        return Err(ShepherdError::GitCommandFailed {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Runs git in `repo_path` and returns whether it succeeded
pub fn git_try(repo_path: &Path, args: &[&str]) -> Result<bool> {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()?;
    Ok(output.status.success())
}

pub fn git_add(repo_path: &Path, file: &str) -> Result<()> {
    git_run(repo_path, &["add", "--", file])?;
    Ok(())
}

pub fn git_commit(repo_path: &Path, message: &str) -> Result<()> {
    git_run(repo_path, &["commit", "--quiet", "-m", message])?;
    Ok(())
}

/// Name of the checked-out branch
pub fn current_branch(repo_path: &Path) -> Result<String> {
    Ok(git_run(repo_path, &["rev-parse", "--abbrev-ref", "HEAD"])?
        .trim()
        .to_string())
}

/// Output of `git status --porcelain` (trailing newline trimmed)
pub fn porcelain_status(repo_path: &Path) -> Result<String> {
    Ok(git_run(repo_path, &["status", "--porcelain"])?
        .trim_end()
        .to_string())
}

/// Paths changed by the most recent commit, with their status letters
pub fn last_commit_files(repo_path: &Path) -> Result<String> {
    git_run(
        repo_path,
        &["show", "--name-status", "--format=", "--no-renames", "HEAD"],
    )
}

/// Creates (or overwrites) a file, creating parent directories as needed
pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    let file_path = repo_path.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn read_file(repo_path: &Path, filename: &str) -> Result<String> {
    Ok(fs::read_to_string(repo_path.join(filename))?)
}

pub fn delete_file(repo_path: &Path, filename: &str) -> Result<()> {
    fs::remove_file(repo_path.join(filename))?;
    Ok(())
}

/// Creates multiple files with default content
pub fn create_test_files(repo_path: &Path, filenames: &[&str]) -> Result<()> {
    for filename in filenames {
        create_file(repo_path, filename, &format!("content of {filename}\n"))?;
    }
    Ok(())
}

/// Modifies existing files by appending a line
pub fn modify_test_files(repo_path: &Path, filenames: &[&str]) -> Result<()> {
    for filename in filenames {
        let mut content = read_file(repo_path, filename)?;
        content.push_str("modified\n");
        create_file(repo_path, filename, &content)?;
    }
    Ok(())
}
