//! Git operations abstraction layer
//!
//! The release flow talks to version control only through the [Repository]
//! trait, so the orchestrator can run against a real clone or a scripted
//! fake.
//!
//! - [repository::Git2Repository]: implementation on top of the `git2` crate
//! - [mock::MockRepository]: in-memory implementation that records mutations
//!
//! ```rust
//! # use semantic_release::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> semantic_release::Result<()> {
//! let latest = repo.most_recent_commit()?;
//! println!("{} {}", latest.short_hash(), latest.subject());
//! # Ok(())
//! # }
//! ```

pub mod credentials;
pub mod mock;
pub mod repository;

pub use credentials::Credentials;
pub use mock::{MockRepository, RepoCall, RepoOperation};
pub use repository::Git2Repository;

use crate::domain::CommitRecord;
use crate::error::Result;

/// Identity used for the release commit and the annotated tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Author {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Author {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl From<&CommitRecord> for Author {
    fn from(commit: &CommitRecord) -> Self {
        Author::new(commit.author_name.clone(), commit.author_email.clone())
    }
}

/// Version-control operations needed by a release.
///
/// A handle is bound to one working copy, one remote and one set of
/// credentials. Network operations authenticate with those credentials.
///
/// ## Error Handling
///
/// Implementations map their own failures to
/// [crate::error::SemanticReleaseError]; the orchestrator attaches the
/// release step on top.
pub trait Repository {
    /// Commit with the greatest author time reachable from HEAD.
    ///
    /// Ties keep the first commit seen. An empty history fails with
    /// [crate::error::SemanticReleaseError::NoCommitsFound].
    fn most_recent_commit(&self) -> Result<CommitRecord>;

    /// Every tag name in the repository, unfiltered.
    fn tag_names(&self) -> Result<Vec<String>>;

    /// Commits reachable from HEAD but not from `base`, oldest first.
    ///
    /// With no base the whole history is returned.
    fn commits_since(&self, base: Option<&str>) -> Result<Vec<CommitRecord>>;

    /// Stage every change in the working copy, deletions included.
    fn stage_all(&self) -> Result<()>;

    /// Commit the index on top of HEAD.
    fn commit(&self, author: &Author, message: &str) -> Result<()>;

    /// Push the current branch to the remote.
    fn push(&self) -> Result<()>;

    /// Create an annotated tag on HEAD.
    ///
    /// Returns `Ok(false)` without touching anything when a tag of that name
    /// already exists.
    fn create_tag(&self, name: &str, tagger: &Author) -> Result<bool>;

    /// Push every local tag to the remote.
    fn push_tags(&self) -> Result<()>;
}
