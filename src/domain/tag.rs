use crate::domain::Version;
use tracing::debug;

/// Outcome of scanning the repository tags for the current version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagResolution {
    /// Highest well-formed version, `0.0.0` when none exists
    pub version: Version,
    /// Tags skipped because they are not plain `MAJOR.MINOR.PATCH`
    pub ignored: Vec<String>,
}

/// Resolve the current version from raw tag names.
///
/// Only tags matching `MAJOR.MINOR.PATCH` exactly are considered; the maximum
/// under numeric ordering wins. No conforming tag means `0.0.0`, which is not
/// an error: the repository has simply never been released.
pub fn resolve_tags<I, S>(tags: I) -> TagResolution
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut version = Version::ZERO;
    let mut ignored = Vec::new();

    for tag in tags {
        let name = tag.as_ref();
        match Version::parse(name) {
            Ok(candidate) => {
                if candidate > version {
                    version = candidate;
                }
            }
            Err(_) => {
                debug!(tag = %name, "ignoring non-semver tag");
                ignored.push(name.to_string());
            }
        }
    }

    TagResolution { version, ignored }
}

/// Highest well-formed version among `tags`, `0.0.0` when there is none.
pub fn most_recent_tag<I, S>(tags: I) -> Version
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    resolve_tags(tags).version
}
