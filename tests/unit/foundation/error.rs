use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FolioError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FolioError::physics("x")
            .to_string()
            .contains("physics error:")
    );
    assert!(
        FolioError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn duplicate_id_names_the_block() {
    let err = FolioError::duplicate_id(BlockId::from("hero"));
    assert_eq!(err.to_string(), "duplicate block id: hero");

    let err = FolioError::duplicate_id(BlockId::Index(3));
    assert_eq!(err.to_string(), "duplicate block id: 3");
}

#[test]
fn json_errors_map_to_serde() {
    let err: FolioError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, FolioError::Serde(_)));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FolioError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
