//! Shared utilities for the git-shepherd integration tests
//!
//! Every test runs the real binary against a real git repository created in a
//! temporary directory.

pub mod assertions;
pub mod fixtures;
pub mod repository;
