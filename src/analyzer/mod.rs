//! Version calculation from a change type

pub mod version_calculator;

pub use version_calculator::{
    bump, bump_change_type, must_skip_versioning, next_version, FIRST_RELEASE,
};
