//! Conformance test suite.
//!
//! Validates that all schema fixtures parse, pass validation, and produce
//! the expected canonical text and schema ids, byte for byte.

use std::fs;
use std::path::Path;

use sigil_abi::{schema_id, schema_text, StructABI};
use sigil_schema::{validate, Schema};

const FIXTURES_DIR: &str = "../../fixtures/v1";

fn schema_fixtures() -> Vec<(String, Schema)> {
    let dir = Path::new(FIXTURES_DIR).join("schemas");
    let mut fixtures: Vec<(String, Schema)> = fs::read_dir(&dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|x| x == "json").unwrap_or(false))
        .map(|e| {
            let path = e.path();
            let name = path.file_stem().unwrap().to_string_lossy().to_string();
            let content = fs::read_to_string(&path).unwrap();
            let schema: Schema = serde_json::from_str(&content)
                .unwrap_or_else(|err| panic!("Failed to parse fixture {}: {}", name, err));
            (name, schema)
        })
        .collect();
    fixtures.sort_by(|a, b| a.0.cmp(&b.0));
    assert!(!fixtures.is_empty(), "no schema fixtures found");
    fixtures
}

#[test]
fn test_all_fixtures_validate() {
    for (name, schema) in schema_fixtures() {
        validate(&schema).unwrap_or_else(|err| panic!("Fixture {} failed validation: {}", name, err));
    }
}

#[test]
fn test_text_matches_golden() {
    for (name, schema) in schema_fixtures() {
        let golden_path = format!("{}/golden/{}.text", FIXTURES_DIR, name);
        let golden = fs::read_to_string(&golden_path)
            .unwrap_or_else(|err| panic!("Missing golden file {}: {}", golden_path, err));

        let text = schema_text(&schema);
        assert_eq!(text, golden, "Schema text mismatch for {}", name);
    }
}

#[test]
fn test_schema_ids_match_golden() {
    for (name, schema) in schema_fixtures() {
        let golden_path = format!("{}/golden/{}.sha256", FIXTURES_DIR, name);
        let expected = fs::read_to_string(&golden_path)
            .unwrap_or_else(|err| panic!("Missing hash file {}: {}", golden_path, err))
            .trim()
            .to_string();

        assert_eq!(schema_id(&schema), expected, "Schema id mismatch for {}", name);
    }
}

#[test]
fn test_serde_roundtrip_preserves_fixtures() {
    for (name, schema) in schema_fixtures() {
        let json = serde_json::to_string(&schema).unwrap();
        let reparsed: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed, schema, "Serde round-trip changed fixture {}", name);
        assert_eq!(reparsed.version, schema.version);
    }
}

#[test]
fn test_abi_size_invariant_over_fixtures() {
    for (name, schema) in schema_fixtures() {
        let abi = StructABI::from_schema(&schema);
        let fixed_sum: u32 = schema
            .fields
            .iter()
            .filter(|f| f.field_type.is_fixed_width())
            .map(|f| f.field_type.fixed_size())
            .sum();
        assert_eq!(abi.total_size(), fixed_sum, "Size invariant broken for {}", name);
    }
}
