//! Domain logic - pure release rules independent of git and the filesystem

pub mod change_type;
pub mod changelog;
pub mod commit;
pub mod tag;
pub mod version;

pub use change_type::ChangeType;
pub use changelog::{ChangelogEntry, ProjectLocation};
pub use commit::CommitRecord;
pub use tag::{most_recent_tag, resolve_tags, TagResolution};
pub use version::{Version, VersionBump};
