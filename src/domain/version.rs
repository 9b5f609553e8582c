use crate::error::{Result, SemanticReleaseError};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)$").expect("version pattern is valid"));

/// Semantic version representation
///
/// Ordering is numeric per component (major, then minor, then patch), so
/// `20.1.0` sorts after `3.0.2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// The baseline of a repository that has never been released.
    pub const ZERO: Version = Version::new(0, 0, 0);

    /// Create a new version
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a strict `MAJOR.MINOR.PATCH` string.
    ///
    /// No prefix, suffix or surrounding whitespace is accepted.
    pub fn parse(text: &str) -> Result<Self> {
        let captures = VERSION_PATTERN.captures(text).ok_or_else(|| {
            SemanticReleaseError::version(format!(
                "Invalid version format: '{}' - expected MAJOR.MINOR.PATCH",
                text
            ))
        })?;

        let component = |index: usize, name: &str| -> Result<u64> {
            let raw = captures.get(index).map(|m| m.as_str()).unwrap_or_default();
            raw.parse::<u64>().map_err(|_| {
                SemanticReleaseError::version(format!("could not convert {} version {} to int", name, raw))
            })
        };

        Ok(Version {
            major: component(1, "major")?,
            minor: component(2, "minor")?,
            patch: component(3, "patch")?,
        })
    }

    /// Whether `text` has the `MAJOR.MINOR.PATCH` shape.
    pub fn is_well_formed(text: &str) -> bool {
        VERSION_PATTERN.is_match(text)
    }

    /// Bump version according to bump type
    ///
    /// Fails when the bumped component does not fit in a `u64`.
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let overflow = || {
            SemanticReleaseError::version(format!(
                "cannot apply a {} bump to {}: component overflow",
                bump_type, self
            ))
        };
        let next = match bump_type {
            VersionBump::Major => Version {
                major: self.major.checked_add(1).ok_or_else(overflow)?,
                minor: 0,
                patch: 0,
            },
            VersionBump::Minor => Version {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(overflow)?,
                patch: 0,
            },
            VersionBump::Patch => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1).ok_or_else(overflow)?,
            },
        };
        Ok(next)
    }
}

impl FromStr for Version {
    type Err = SemanticReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => write!(f, "MAJOR"),
            VersionBump::Minor => write!(f, "MINOR"),
            VersionBump::Patch => write!(f, "PATCH"),
        }
    }
}
