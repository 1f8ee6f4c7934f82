use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RetouchError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        RetouchError::unsupported_backend("x")
            .to_string()
            .contains("unsupported backend:")
    );
    assert!(
        RetouchError::unknown_identifier("x")
            .to_string()
            .contains("unknown identifier:")
    );
    assert!(
        RetouchError::render_execution("x")
            .to_string()
            .contains("render execution error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RetouchError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn validation_class_covers_lookup_failures() {
    assert!(RetouchError::validation("x").is_validation());
    assert!(RetouchError::unknown_identifier("x").is_validation());
    assert!(!RetouchError::render_execution("x").is_validation());
}
