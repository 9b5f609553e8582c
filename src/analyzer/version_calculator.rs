use crate::domain::{ChangeType, Version};
use crate::error::{Result, SemanticReleaseError};
use tracing::debug;

/// First public version of a repository that has no release yet.
pub const FIRST_RELEASE: Version = Version::new(1, 0, 0);

/// Compute the next version for a change type given by name.
///
/// Names are matched against the change-type vocabulary (aliases included).
/// Unknown names and skip types both fail with
/// [`SemanticReleaseError::InvalidChangeType`]; callers check
/// [`must_skip_versioning`] first.
///
/// # Example
/// ```
/// use semantic_release::analyzer::bump;
/// use semantic_release::domain::Version;
///
/// let current = Version::new(2, 1, 1);
/// assert_eq!(bump(current, "breaking change").unwrap(), Version::new(3, 0, 0));
/// assert_eq!(bump(current, "feat").unwrap(), Version::new(2, 2, 0));
/// assert_eq!(bump(current, "fix").unwrap(), Version::new(2, 1, 2));
/// ```
pub fn bump(current: Version, change_type: &str) -> Result<Version> {
    let parsed: ChangeType = change_type.parse()?;
    bump_change_type(current, parsed)
}

/// Compute the next version for a classified change type.
///
/// A result of exactly `0.1.0` or `0.0.1` is a first release from the
/// `0.0.0` baseline and becomes [`FIRST_RELEASE`].
pub fn bump_change_type(current: Version, change_type: ChangeType) -> Result<Version> {
    let bump_type = change_type
        .version_bump()
        .ok_or_else(|| SemanticReleaseError::InvalidChangeType(change_type.to_string()))?;

    let next = current.bump(bump_type)?;
    debug!(%current, %change_type, %bump_type, %next, "computed version bump");

    if next == Version::new(0, 1, 0) || next == Version::new(0, 0, 1) {
        return Ok(FIRST_RELEASE);
    }
    Ok(next)
}

/// Compute the next version from a declared current version string.
///
/// The declared version must be a strict `MAJOR.MINOR.PATCH`.
pub fn next_version(current: &str, change_type: &str) -> Result<Version> {
    let current = Version::parse(current)?;
    bump(current, change_type)
}

/// Whether the change type means "do not release".
///
/// Unknown names are not skips; they fail later in [`bump`].
pub fn must_skip_versioning(change_type: &str) -> bool {
    change_type
        .parse::<ChangeType>()
        .map(|parsed| parsed.is_skip())
        .unwrap_or(false)
}
