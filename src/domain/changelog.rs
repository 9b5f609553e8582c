use crate::domain::commit::abbreviate_hash;
use crate::domain::{ChangeType, CommitRecord, Version};
use crate::error::{Result, SemanticReleaseError};
use std::fmt;

/// Where the repository lives on its hosting service, used for commit links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocation {
    /// e.g. "gitlab.com"
    pub host: String,
    pub group: String,
    pub project: String,
}

impl ProjectLocation {
    pub fn commit_url(&self, hash: &str) -> String {
        format!(
            "https://{}/{}/{}/-/commit/{}",
            self.host, self.group, self.project, hash
        )
    }
}

/// One release block of the changelog.
///
/// Entries are only ever prepended; existing ones are never rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub version: Version,
    pub change_type: ChangeType,
    pub commit_hash: String,
    pub commit_url: String,
    pub message: String,
    pub author_handle: String,
}

impl ChangelogEntry {
    /// Validate the release information and build the entry.
    ///
    /// Fails with [`SemanticReleaseError::ChangelogFieldMissing`] when the
    /// author name is empty, the author email is not an address, the hash is
    /// shorter than seven characters, or the message is blank.
    pub fn build(
        commit: &CommitRecord,
        change_type: ChangeType,
        current_version: Version,
        new_version: Version,
        message: &str,
        location: &ProjectLocation,
    ) -> Result<Self> {
        if commit.author_name.trim().is_empty() {
            return Err(SemanticReleaseError::changelog_field("author name cannot be empty"));
        }

        let author_handle = match commit.author_email.split_once('@') {
            Some((local, _)) if !local.trim().is_empty() => local.trim().to_string(),
            _ => {
                return Err(SemanticReleaseError::changelog_field(format!(
                    "bad author email entry '{}'",
                    commit.author_email
                )))
            }
        };

        if commit.hash.chars().count() < 7 {
            return Err(SemanticReleaseError::changelog_field(
                "hash string must have at least 7 characters",
            ));
        }

        if message.trim().is_empty() {
            return Err(SemanticReleaseError::changelog_field("message cannot be empty"));
        }

        if new_version <= current_version {
            return Err(SemanticReleaseError::changelog_field(format!(
                "new version {} must be greater than current version {}",
                new_version, current_version
            )));
        }

        Ok(ChangelogEntry {
            version: new_version,
            change_type,
            commit_hash: commit.hash.clone(),
            commit_url: location.commit_url(&commit.hash),
            message: message.trim().to_string(),
            author_handle,
        })
    }
}

impl fmt::Display for ChangelogEntry {
    /// Renders the block exactly as it is written at the top of the changelog:
    ///
    /// ```text
    ///
    /// ## v1.1.0
    /// - feat - [b25a9af](https://host/group/project/-/commit/b25a9af...): Add pagination (@jane.doe)
    /// ---
    ///
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\n## v{}\n- {} - [{}]({}): {} (@{})\n---\n\n",
            self.version,
            self.change_type,
            abbreviate_hash(&self.commit_hash),
            self.commit_url,
            self.message,
            self.author_handle
        )
    }
}
