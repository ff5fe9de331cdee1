//! Tests for DocumentFile
//!
//! These tests verify:
//! - Missing and empty files load as an empty document
//! - Malformed content is an error, never an empty document
//! - Save then load round-trips arbitrary trees
//! - Saves truncate previous content and create parent directories
//! - Every finite f64 survives save then load bit for bit

use std::fs;
use std::path::PathBuf;

use proptest::prelude::*;
use serde_json::{json, Number, Value};
use tempfile::TempDir;
use treekv::document::{Document, Object};
use treekv::storage::DocumentFile;
use treekv::TreeKvError;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_file() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("db.json");
    (temp_dir, path)
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_load_missing_file_is_empty_document() {
    let (_temp, path) = setup_temp_file();
    let file = DocumentFile::new(&path, false);

    let document = file.load().unwrap();

    assert_eq!(document, Document::new());
    assert!(!path.exists(), "load must not create the file");
}

#[test]
fn test_load_empty_file_is_empty_document() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, "").unwrap();

    let document = DocumentFile::new(&path, false).load().unwrap();
    assert_eq!(document.root_key_count(), 0);
}

#[test]
fn test_load_whitespace_file_is_empty_document() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, "  \n").unwrap();

    let document = DocumentFile::new(&path, false).load().unwrap();
    assert_eq!(document.root_key_count(), 0);
}

#[test]
fn test_load_malformed_file_is_error() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, "{\"a\": 1,").unwrap();

    let result = DocumentFile::new(&path, false).load();
    assert!(matches!(result, Err(TreeKvError::Serialization(_))));
}

#[test]
fn test_load_non_object_root_is_error() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, "[1, 2, 3]").unwrap();

    let result = DocumentFile::new(&path, false).load();
    assert!(matches!(result, Err(TreeKvError::CorruptDocument(_))));
}

#[test]
fn test_load_existing_file() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, r#"{"a": {"b": [1, "two", null]}}"#).unwrap();

    let document = DocumentFile::new(&path, false).load().unwrap();
    assert_eq!(document.into_value(), json!({"a": {"b": [1, "two", null]}}));
}

// =============================================================================
// Save Tests
// =============================================================================

#[test]
fn test_save_load_round_trip() {
    let (_temp, path) = setup_temp_file();
    let file = DocumentFile::new(&path, false);

    let original = Document::from_value(json!({
        "string": "text",
        "number": 12.5,
        "integer": -7,
        "bool": false,
        "null": null,
        "array": [1, [2, 3], {"inner": "x"}],
        "object": {"deeper": {"deepest": {"k": "v"}}},
        "unicode": "żółć ✓"
    }))
    .unwrap();

    file.save(&original).unwrap();
    let loaded = file.load().unwrap();

    assert_eq!(loaded, original);
}

#[test]
fn test_floats_survive_save_load_exactly() {
    let (_temp, path) = setup_temp_file();
    let file = DocumentFile::new(&path, false);

    // xorshift64 over raw bit patterns covers every exponent range
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut floats = vec![1.0715660391465826e-75, 0.1, 1.0 / 3.0, f64::MIN_POSITIVE, f64::MAX];
    while floats.len() < 20_000 {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let f = f64::from_bits(state);
        if f.is_finite() {
            floats.push(f);
        }
    }

    let values: Vec<Value> = floats
        .iter()
        .map(|f| Value::Number(Number::from_f64(*f).unwrap()))
        .collect();
    let original = Document::from_value(json!({ "floats": values })).unwrap();

    file.save(&original).unwrap();
    let loaded = file.load().unwrap();

    let reloaded = loaded.root()["floats"].as_array().unwrap();
    for (expected, actual) in floats.iter().zip(reloaded) {
        assert_eq!(
            actual.as_f64().unwrap().to_bits(),
            expected.to_bits(),
            "{} changed after reload",
            expected
        );
    }
}

#[test]
fn test_save_truncates_previous_content() {
    let (_temp, path) = setup_temp_file();
    let file = DocumentFile::new(&path, false);

    let big = Document::from_value(json!({"a": "x".repeat(1000)})).unwrap();
    file.save(&big).unwrap();
    file.save(&Document::new()).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
}

#[test]
fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("server").join("data").join("db.json");
    let file = DocumentFile::new(&path, true);

    file.save(&Document::from_value(json!({"k": 1})).unwrap()).unwrap();

    assert!(path.exists());
    assert_eq!(file.load().unwrap().into_value(), json!({"k": 1}));
}

#[test]
fn test_save_writes_compact_json_in_insertion_order() {
    let (_temp, path) = setup_temp_file();
    let file = DocumentFile::new(&path, false);

    let mut document = Document::new();
    document.set_at(&"b".into(), json!(1)).unwrap();
    document.set_at(&"a".into(), json!(2)).unwrap();
    file.save(&document).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"b":1,"a":2}"#);
}

// =============================================================================
// Generated Documents
// =============================================================================

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        any::<f64>().prop_filter_map("finite", |f| Number::from_f64(f).map(Value::Number)),
        any::<String>().prop_map(Value::String),
    ];
    leaf.prop_recursive(5, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::btree_map(any::<String>(), inner, 0..8)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn arb_document() -> impl Strategy<Value = Document> {
    prop::collection::btree_map(any::<String>(), arb_value(), 0..10)
        .prop_map(|entries| Document::from_object(entries.into_iter().collect::<Object>()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_save_load_round_trips_generated_documents(document in arb_document()) {
        let (_temp, path) = setup_temp_file();
        let file = DocumentFile::new(&path, false);

        file.save(&document).unwrap();
        prop_assert_eq!(file.load().unwrap(), document);
    }
}
