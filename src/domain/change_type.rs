use crate::domain::VersionBump;
use crate::error::{Result, SemanticReleaseError};
use std::fmt;
use std::str::FromStr;

/// The recognized commit change types.
///
/// Each maps to exactly one upgrade class: a [`VersionBump`], or skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    BreakingChange,
    Feat,
    Build,
    Ci,
    Docs,
    Fix,
    Perf,
    Refactor,
    Style,
    Test,
    Skip,
}

impl ChangeType {
    /// Every change type, in the order tokens are searched for inside a header.
    ///
    /// Major before skip before minor before patch: `skip ci` is a skip and
    /// `breaking change(feat)` is a breaking change.
    pub const ALL: [ChangeType; 11] = [
        ChangeType::BreakingChange,
        ChangeType::Skip,
        ChangeType::Feat,
        ChangeType::Build,
        ChangeType::Ci,
        ChangeType::Docs,
        ChangeType::Fix,
        ChangeType::Perf,
        ChangeType::Refactor,
        ChangeType::Style,
        ChangeType::Test,
    ];

    /// Canonical token, as written to the changelog.
    pub fn token(&self) -> &'static str {
        self.aliases()[0]
    }

    /// All accepted spellings, canonical first, lowercase.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            ChangeType::BreakingChange => &[
                "breaking change",
                "breaking changes",
                "breaking-change",
                "breaking",
                "bc",
            ],
            ChangeType::Feat => &["feat", "feature"],
            ChangeType::Build => &["build"],
            ChangeType::Ci => &["ci"],
            ChangeType::Docs => &["docs", "documentation"],
            ChangeType::Fix => &["fix"],
            ChangeType::Perf => &["perf", "performance"],
            ChangeType::Refactor => &["refactor"],
            ChangeType::Style => &["style"],
            ChangeType::Test => &["test"],
            ChangeType::Skip => &["skip", "skip versioning", "skip v", "chore"],
        }
    }

    /// One-line description for the commit type help.
    pub fn description(&self) -> &'static str {
        match self {
            ChangeType::BreakingChange => {
                "Change that will require other changes in dependant applications"
            }
            ChangeType::Feat => "A new feature",
            ChangeType::Build => {
                "Changes that affect the build system or external dependencies"
            }
            ChangeType::Ci => "Changes to our CI configuration files and scripts",
            ChangeType::Docs => "Documentation only changes",
            ChangeType::Fix => "A bug fix",
            ChangeType::Perf => "A code change that improves performance",
            ChangeType::Refactor => "A code change that neither fixes a bug nor adds a feature",
            ChangeType::Style => {
                "Changes that do not affect the meaning of the code (white-space, formatting, etc)"
            }
            ChangeType::Test => "Adding missing tests or correcting existing tests",
            ChangeType::Skip => "Skip versioning",
        }
    }

    /// The bump this change type triggers; `None` means skip versioning.
    pub fn version_bump(&self) -> Option<VersionBump> {
        match self {
            ChangeType::BreakingChange => Some(VersionBump::Major),
            ChangeType::Feat => Some(VersionBump::Minor),
            ChangeType::Build
            | ChangeType::Ci
            | ChangeType::Docs
            | ChangeType::Fix
            | ChangeType::Perf
            | ChangeType::Refactor
            | ChangeType::Style
            | ChangeType::Test => Some(VersionBump::Patch),
            ChangeType::Skip => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        self.version_bump().is_none()
    }

    /// Find the first change type whose token is contained in `segment`.
    ///
    /// `segment` is matched case-insensitively. Aliases in [`EXACT_ALIASES`]
    /// only match a segment that is exactly the alias.
    pub fn find_in(segment: &str) -> Option<ChangeType> {
        let segment = segment.to_lowercase();
        let exact = segment.trim();
        ChangeType::ALL.into_iter().find(|change_type| {
            change_type.aliases().iter().any(|alias| {
                if EXACT_ALIASES.contains(alias) {
                    exact == *alias
                } else {
                    segment.contains(alias)
                }
            })
        })
    }
}

/// Aliases too short to be searched by containment (`bc` is inside `abc`).
const EXACT_ALIASES: [&str; 1] = ["bc"];

impl FromStr for ChangeType {
    type Err = SemanticReleaseError;

    /// Exact (case-insensitive) match against the accepted spellings.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        ChangeType::ALL
            .into_iter()
            .find(|change_type| change_type.aliases().contains(&wanted.as_str()))
            .ok_or_else(|| SemanticReleaseError::InvalidChangeType(s.to_string()))
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
