//! Common assertion helpers for test output validation

#![allow(dead_code)]

use predicates::prelude::*;

/// Predicate for the error shown outside a repository
pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
}

/// Predicate for a status listing entry: `path` followed by its description
pub fn has_entry(path: &str, description: &str) -> impl Predicate<str> {
    predicates::str::contains(path).and(predicates::str::contains(format!("({description}")))
}

/// Predicate for a commit blocked by unresolved conflicts
pub fn unmerged_violation(count: usize) -> impl Predicate<str> {
    if count == 1 {
        predicates::str::contains("1 unmerged file; resolve the conflict")
    } else {
        predicates::str::contains(format!("{count} unmerged files; resolve the conflicts"))
    }
}
