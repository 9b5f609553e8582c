//! Formatting functions for UI output.
//!
//! Summaries are built as plain strings first so they can be tested without
//! capturing stdout.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::ChangeType;
use crate::release::{ReleaseDecision, ReleaseOutcome};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// One line per thing the release did, in order.
pub fn outcome_summary(outcome: &ReleaseOutcome) -> Vec<String> {
    let mut lines = vec![format!(
        "Latest commit {} {}",
        outcome.commit.short_hash(),
        outcome.commit.subject()
    )];

    let plan = match &outcome.decision {
        ReleaseDecision::Skip { change_type } => {
            lines.push(format!(
                "Change type '{}' skips versioning, nothing to release",
                change_type
            ));
            return lines;
        }
        ReleaseDecision::Release(plan) => plan,
    };

    lines.push(format!(
        "Change type '{}': {} -> {}",
        plan.change_type, plan.current_version, plan.new_version
    ));
    if outcome.dry_run {
        lines.push("Dry run, no changes made".to_string());
        return lines;
    }

    if outcome.committed {
        lines.push("Committed release changes".to_string());
    }
    if outcome.pushed {
        lines.push("Pushed release commit".to_string());
    }
    if outcome.tag_created {
        lines.push(format!("Created tag {}", plan.new_version));
    }
    if outcome.tags_pushed {
        lines.push("Pushed tags".to_string());
    }
    lines
}

/// Print the release outcome followed by its warnings.
pub fn display_outcome(outcome: &ReleaseOutcome) {
    let lines = outcome_summary(outcome);
    if let Some((first, rest)) = lines.split_first() {
        display_status(first);
        for line in rest {
            display_success(line);
        }
    }
    for warning in &outcome.warnings {
        display_boundary_warning(warning);
    }
}

/// Display every recognized change type with its aliases and upgrade class.
pub fn display_commit_types() {
    println!("{}", style("Commit message format:").bold());
    println!("  <type>(<optional scope>): <message>\n");
    println!("{}", style("Recognized change types:").bold());
    for change_type in ChangeType::ALL {
        let class = change_type
            .version_bump()
            .map(|bump| bump.to_string())
            .unwrap_or_else(|| "SKIP".to_string());
        println!(
            "  {:<16} {:<6} {} (aliases: {})",
            style(change_type.token()).cyan(),
            class,
            change_type.description(),
            change_type.aliases().join(", ")
        );
    }
}
