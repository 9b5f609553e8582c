use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::lint::LintViolation;

/// A step of the release run, used to prefix the error that aborted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStep {
    FetchLatestCommit,
    Classify,
    ResolveCurrentVersion,
    ComputeNewVersion,
    UpdateChangelog,
    UpdateVariableFiles,
    StageAndCommit,
    PushCommits,
    CreateTag,
    PushTags,
}

impl fmt::Display for ReleaseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phrase = match self {
            ReleaseStep::FetchLatestCommit => "error while getting most recent commit",
            ReleaseStep::Classify => "error while finding commit change type within commit message",
            ReleaseStep::ResolveCurrentVersion => "error while getting most recent tag",
            ReleaseStep::ComputeNewVersion => "error while getting new release version",
            ReleaseStep::UpdateChangelog => "error while upgrading changelog file",
            ReleaseStep::UpdateVariableFiles => "error while upgrading variables in files",
            ReleaseStep::StageAndCommit => "error while committing release changes",
            ReleaseStep::PushCommits => "error during push operation",
            ReleaseStep::CreateTag => "error while creating tag",
            ReleaseStep::PushTags => "error while pushing tags",
        };
        f.write_str(phrase)
    }
}

/// Unified error type for semantic-release operations
#[derive(Error, Debug)]
pub enum SemanticReleaseError {
    #[error("change type not found")]
    ChangeTypeNotFound,

    #[error("{0} is an invalid commit change type")]
    InvalidChangeType(String),

    #[error("commit message is empty")]
    EmptyMessage,

    #[error("commit message has no '<type>: <message>' header")]
    MessageTagMissing,

    #[error("variable name `{variable}` not found on file `{}`", path.display())]
    VariableNotFound { variable: String, path: PathBuf },

    #[error("Version parsing error: {0}")]
    VersionParse(String),

    #[error("Changelog field missing: {0}")]
    ChangelogFieldMissing(String),

    #[error("Repository operation failed: {0}")]
    RepositoryOperationFailed(String),

    #[error("no commits found")]
    NoCommitsFound,

    #[error(
        "{} commit(s) do not follow the commit message convention:\n{}",
        .0.len(),
        format_violations(.0)
    )]
    LintFailed(Vec<LintViolation>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{step} due to: {source}")]
    Step {
        step: ReleaseStep,
        #[source]
        source: Box<SemanticReleaseError>,
    },
}

/// Convenience type alias for Results in semantic-release
pub type Result<T> = std::result::Result<T, SemanticReleaseError>;

fn format_violations(violations: &[LintViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {}", v))
        .collect::<Vec<_>>()
        .join("\n")
}

impl SemanticReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SemanticReleaseError::Config(msg.into())
    }

    /// Create a version parsing error with context
    pub fn version(msg: impl Into<String>) -> Self {
        SemanticReleaseError::VersionParse(msg.into())
    }

    /// Create a repository client error with context
    pub fn repository(msg: impl Into<String>) -> Self {
        SemanticReleaseError::RepositoryOperationFailed(msg.into())
    }

    /// Create a changelog validation error naming the offending field
    pub fn changelog_field(msg: impl Into<String>) -> Self {
        SemanticReleaseError::ChangelogFieldMissing(msg.into())
    }

    /// Wrap this error with the release step that produced it
    pub fn at(self, step: ReleaseStep) -> Self {
        SemanticReleaseError::Step {
            step,
            source: Box::new(self),
        }
    }

    /// The step this error was raised in, if it was wrapped by the orchestrator
    pub fn step(&self) -> Option<ReleaseStep> {
        match self {
            SemanticReleaseError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// The innermost error, past any step wrapping
    pub fn root(&self) -> &SemanticReleaseError {
        let mut current = self;
        while let SemanticReleaseError::Step { source, .. } = current {
            current = source;
        }
        current
    }
}

/// Attach a [`ReleaseStep`] to the error of a fallible call.
pub trait StepContext<T> {
    fn step(self, step: ReleaseStep) -> Result<T>;
}

impl<T> StepContext<T> for Result<T> {
    fn step(self, step: ReleaseStep) -> Result<T> {
        self.map_err(|e| e.at(step))
    }
}
