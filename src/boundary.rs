use crate::domain::Version;
use std::fmt;

/// Non-fatal conditions met during a release run.
/// These are reported to the user but never abort the release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryWarning {
    /// Tags that are not a strict `MAJOR.MINOR.PATCH` and were skipped when
    /// resolving the current version
    IgnoredTags { tags: Vec<String> },
    /// The release tag was already present, so nothing was tagged or pushed
    TagAlreadyExists { tag: String },
    /// Pushing is disabled; the release exists only in the local clone
    NotPushed { version: Version },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::IgnoredTags { tags } => {
                write!(
                    f,
                    "Ignored {} tag(s) that are not MAJOR.MINOR.PATCH: {}",
                    tags.len(),
                    tags.join(", ")
                )
            }
            BoundaryWarning::TagAlreadyExists { tag } => {
                write!(f, "Tag '{}' already exists, skipped tagging", tag)
            }
            BoundaryWarning::NotPushed { version } => {
                write!(
                    f,
                    "Release {} was committed locally but not pushed (push disabled)",
                    version
                )
            }
        }
    }
}
