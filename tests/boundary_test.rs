use semantic_release::boundary::BoundaryWarning;
use semantic_release::domain::Version;
use semantic_release::ui;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_ignored_tags_display() {
    let warning = BoundaryWarning::IgnoredTags {
        tags: vec!["v1.0.0".to_string(), "release-2".to_string()],
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("Ignored 2 tag(s)"),
        "Message should count ignored tags, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("v1.0.0, release-2"),
        "Message should list the tags, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_tag_already_exists_display() {
    let warning = BoundaryWarning::TagAlreadyExists {
        tag: "1.2.0".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("'1.2.0' already exists"),
        "Message should name the tag, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_not_pushed_display() {
    let warning = BoundaryWarning::NotPushed {
        version: Version::new(2, 0, 0),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("2.0.0") && display_msg.contains("not pushed"),
        "Message should mention the unpushed version, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_display_via_ui() {
    // Visual verification test - output is printed to stderr
    ui::display_boundary_warning(&BoundaryWarning::TagAlreadyExists {
        tag: "1.0.0".to_string(),
    });
}
