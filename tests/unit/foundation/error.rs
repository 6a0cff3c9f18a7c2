use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LipsyncError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        LipsyncError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        LipsyncError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        LipsyncError::EmptyAnalysisResult
            .to_string()
            .contains("empty analysis result")
    );
}

#[test]
fn invalid_segment_names_the_index() {
    let err = LipsyncError::invalid_segment(3, "end precedes start");
    assert_eq!(err.to_string(), "invalid segment #3: end precedes start");
    assert!(matches!(err, LipsyncError::InvalidSegment { index: 3, .. }));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LipsyncError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
