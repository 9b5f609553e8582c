use crate::domain::CommitRecord;
use crate::error::{Result, SemanticReleaseError};
use crate::git::{Author, Repository};
use std::cell::RefCell;
use std::collections::HashSet;

/// Repository operations, used to script failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepoOperation {
    MostRecentCommit,
    TagNames,
    CommitsSince,
    StageAll,
    Commit,
    Push,
    CreateTag,
    PushTags,
}

/// A mutation performed against the mock, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoCall {
    StageAll,
    Commit { author: Author, message: String },
    Push,
    CreateTag { name: String, tagger: Author },
    PushTags,
}

/// Mock repository for testing without actual git operations
///
/// Reads are served from the configured commits and tags; mutations are
/// recorded and can be inspected with [MockRepository::calls].
#[derive(Debug, Default)]
pub struct MockRepository {
    commits: Vec<CommitRecord>,
    tags: RefCell<Vec<String>>,
    calls: RefCell<Vec<RepoCall>>,
    failing: HashSet<RepoOperation>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit; history order is insertion order, oldest first.
    pub fn with_commit(mut self, commit: CommitRecord) -> Self {
        self.commits.push(commit);
        self
    }

    pub fn with_tag(self, name: impl Into<String>) -> Self {
        self.tags.borrow_mut().push(name.into());
        self
    }

    /// Make every call of `operation` fail.
    pub fn failing_on(mut self, operation: RepoOperation) -> Self {
        self.failing.insert(operation);
        self
    }

    /// Mutations recorded so far
    pub fn calls(&self) -> Vec<RepoCall> {
        self.calls.borrow().clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.tags.borrow().clone()
    }

    fn check(&self, operation: RepoOperation) -> Result<()> {
        if self.failing.contains(&operation) {
            return Err(SemanticReleaseError::repository(format!(
                "simulated {:?} failure",
                operation
            )));
        }
        Ok(())
    }

    fn record(&self, call: RepoCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Repository for MockRepository {
    fn most_recent_commit(&self) -> Result<CommitRecord> {
        self.check(RepoOperation::MostRecentCommit)?;
        CommitRecord::most_recent(&self.commits)
            .cloned()
            .ok_or(SemanticReleaseError::NoCommitsFound)
    }

    fn tag_names(&self) -> Result<Vec<String>> {
        self.check(RepoOperation::TagNames)?;
        Ok(self.tags())
    }

    fn commits_since(&self, base: Option<&str>) -> Result<Vec<CommitRecord>> {
        self.check(RepoOperation::CommitsSince)?;
        let start = match base {
            Some(base) => {
                let position = self
                    .commits
                    .iter()
                    .position(|c| c.hash == base)
                    .ok_or_else(|| {
                        SemanticReleaseError::repository(format!("cannot resolve '{}'", base))
                    })?;
                position + 1
            }
            None => 0,
        };
        Ok(self.commits[start..].to_vec())
    }

    fn stage_all(&self) -> Result<()> {
        self.check(RepoOperation::StageAll)?;
        self.record(RepoCall::StageAll);
        Ok(())
    }

    fn commit(&self, author: &Author, message: &str) -> Result<()> {
        self.check(RepoOperation::Commit)?;
        self.record(RepoCall::Commit {
            author: author.clone(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn push(&self) -> Result<()> {
        self.check(RepoOperation::Push)?;
        self.record(RepoCall::Push);
        Ok(())
    }

    fn create_tag(&self, name: &str, tagger: &Author) -> Result<bool> {
        self.check(RepoOperation::CreateTag)?;
        if self.tags.borrow().iter().any(|tag| tag == name) {
            return Ok(false);
        }
        self.tags.borrow_mut().push(name.to_string());
        self.record(RepoCall::CreateTag {
            name: name.to_string(),
            tagger: tagger.clone(),
        });
        Ok(true)
    }

    fn push_tags(&self) -> Result<()> {
        self.check(RepoOperation::PushTags)?;
        self.record(RepoCall::PushTags);
        Ok(())
    }
}
