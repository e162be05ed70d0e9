use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FlowError::misuse("x")
            .to_string()
            .contains("workflow generation misuse:")
    );
    assert!(
        FlowError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        FlowError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FlowError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_misuse());
}

#[test]
fn misuse_unless_passes_and_fails() {
    assert!(misuse_unless(true, || unreachable!()).is_ok());

    let err = misuse_unless(false, || "expected Image, got Audio".to_string()).unwrap_err();
    assert!(err.is_misuse());
    assert!(err.to_string().ends_with("expected Image, got Audio"));
}
