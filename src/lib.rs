//! Automated semantic release of a git repository.
//!
//! The latest commit's conventional header decides the version bump; the
//! release then updates the changelog and version variables, commits, tags
//! and pushes. See [release::ReleaseOrchestrator].

pub mod analyzer;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod conventional;
pub mod domain;
pub mod error;
pub mod files;
pub mod git;
pub mod lint;
pub mod release;
pub mod ui;

pub use error::{Result, SemanticReleaseError};
