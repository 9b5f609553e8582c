//! Commit-lint mode: validate commit messages instead of releasing.

use crate::conventional;
use crate::domain::commit::abbreviate_hash;
use crate::domain::CommitRecord;
use crate::error::{Result, SemanticReleaseError};
use crate::git::Repository;
use std::fmt;
use tracing::{debug, info};

/// A commit whose message has no recognized header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintViolation {
    pub hash: String,
    pub subject: String,
}

impl From<&CommitRecord> for LintViolation {
    fn from(commit: &CommitRecord) -> Self {
        LintViolation {
            hash: commit.hash.clone(),
            subject: commit.subject().to_string(),
        }
    }
}

impl fmt::Display for LintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", abbreviate_hash(&self.hash), self.subject)
    }
}

/// Check every commit and report all offenders at once.
///
/// Merges of the master/main branch are accepted as they are. Fails with
/// [SemanticReleaseError::LintFailed] listing each invalid commit.
pub fn lint(commits: &[CommitRecord]) -> Result<()> {
    let violations: Vec<LintViolation> = commits
        .iter()
        .filter(|commit| {
            let valid = conventional::is_valid_message(&commit.message);
            debug!(hash = %commit.short_hash(), valid, "linted commit");
            !valid
        })
        .map(LintViolation::from)
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SemanticReleaseError::LintFailed(violations))
    }
}

/// Lint the commits reachable from HEAD and not from `base`.
///
/// Returns how many commits were checked.
pub fn lint_repository<R: Repository + ?Sized>(repo: &R, base: Option<&str>) -> Result<usize> {
    let commits = repo.commits_since(base)?;
    info!(count = commits.len(), base = base.unwrap_or("<root>"), "linting commits");
    lint(&commits)?;
    Ok(commits.len())
}
