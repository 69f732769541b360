use crate::*;

fn mapping(signature: &str, version: u32, conversion_type: ConversionType) -> ApiMapping {
    let target = match conversion_type {
        ConversionType::Impossible => UNSUPPORTED.to_string(),
        _ => format!("target.{signature}.v{version}"),
    };
    ApiMapping {
        id: format!("{signature}@{version}"),
        source_signature: signature.to_string(),
        target_equivalent: target,
        conversion_type,
        version,
        notes: None,
        example_usage: None,
    }
}

#[test]
fn resolve_picks_greatest_version_not_exceeding_request() {
    let table = MappingTable::from_mappings(vec![
        mapping("Block.Properties#strength", 1, ConversionType::Direct),
        mapping("Block.Properties#strength", 3, ConversionType::Direct),
        mapping("Block.Properties#strength", 5, ConversionType::Direct),
    ])
    .unwrap();

    assert_eq!(
        table
            .resolve("Block.Properties#strength", 4)
            .map(|m| m.version),
        Some(3)
    );
    assert_eq!(
        table
            .resolve("Block.Properties#strength", 5)
            .map(|m| m.version),
        Some(5)
    );
    assert_eq!(
        table
            .resolve("Block.Properties#strength", 99)
            .map(|m| m.version),
        Some(5)
    );
    assert!(table.resolve("Block.Properties#strength", 0).is_none());
    assert!(table.resolve("Unknown#call", 5).is_none());
}

#[test]
fn duplicate_signature_version_is_rejected() {
    let error = MappingTable::from_mappings(vec![
        mapping("Player#sendMessage", 2, ConversionType::Direct),
        mapping("Player#sendMessage", 2, ConversionType::Wrapper),
    ])
    .unwrap_err();
    match error {
        MappingError::DuplicateMapping { signature, version } => {
            assert_eq!(signature, "Player#sendMessage");
            assert_eq!(version, 2);
        }
        other => panic!("expected duplicate error, got {other}"),
    }
}

#[test]
fn impossible_must_target_unsupported() {
    let mut bad = mapping("Level#getLightEngine", 1, ConversionType::Impossible);
    bad.target_equivalent = "dimension.lighting".to_string();
    let error = MappingTable::from_mappings(vec![bad]).unwrap_err();
    assert!(matches!(error, MappingError::ImpossibleWithTarget { .. }));

    let good = mapping("Level#getLightEngine", 1, ConversionType::Impossible);
    let table = MappingTable::from_mappings(vec![good]).unwrap();
    assert_eq!(
        table
            .resolve("Level#getLightEngine", 1)
            .map(|m| m.target_equivalent.as_str()),
        Some(UNSUPPORTED)
    );
}

#[test]
fn direct_must_not_target_unsupported() {
    let mut bad = mapping("Player#sendMessage", 1, ConversionType::Direct);
    bad.target_equivalent = UNSUPPORTED.to_string();
    let error = MappingTable::from_mappings(vec![bad]).unwrap_err();
    assert!(matches!(error, MappingError::DirectWithoutTarget { .. }));
}

#[test]
fn loads_from_json() {
    let json = r#"[
        {
            "id": "map-001",
            "sourceSignature": "Player#sendMessage",
            "targetEquivalent": "player.sendMessage",
            "conversionType": "direct",
            "version": 1
        },
        {
            "id": "map-002",
            "sourceSignature": "Level#getLightEngine",
            "targetEquivalent": "UNSUPPORTED",
            "conversionType": "impossible",
            "version": 1,
            "notes": "No scripting access to the light engine."
        }
    ]"#;

    let table = MappingTable::from_json(json).unwrap();
    assert_eq!(table.len(), 2);
    let resolved = table.resolve("Player#sendMessage", 3).unwrap();
    assert_eq!(resolved.target_equivalent, "player.sendMessage");
    assert_eq!(resolved.conversion_type, ConversionType::Direct);
    assert!(table.resolve("Level#getLightEngine", 1).unwrap().is_unsupported());

    assert_eq!(
        table.signatures(),
        vec!["Level#getLightEngine", "Player#sendMessage"]
    );
}

#[test]
fn malformed_json_is_an_error() {
    assert!(matches!(
        MappingTable::from_json("not json").unwrap_err(),
        MappingError::Json(_)
    ));
}
