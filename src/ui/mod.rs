//! User-facing console output.
//!
//! Logging goes through `tracing` on stderr; this module prints the status
//! lines a person running the release reads.

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_commit_types, display_error, display_outcome,
    display_status, display_success, outcome_summary,
};
