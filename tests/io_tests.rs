use std::fs;

use collection_hunter::config::FirebaseConfig;
use collection_hunter::output::save_report;
use collection_hunter::wordlist::load_wordlist;
use collection_hunter::{FoundCollection, HunterError};

#[test]
fn loads_wordlist_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collections.txt");
    fs::write(&path, "users\n\n  orders  \nghost\n").unwrap();

    assert_eq!(load_wordlist(&path).unwrap(), ["users", "orders", "ghost"]);
}

#[test]
fn missing_wordlist_is_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_wordlist(&dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err, HunterError::Input { .. }));
    assert!(err.is_fatal());
}

#[test]
fn loads_firebase_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("firebase.json");
    fs::write(&path, r#"{"apiKey":"AIzaKey","projectId":"demo","databaseId":"staging"}"#).unwrap();

    let cfg = FirebaseConfig::load(&path).unwrap();
    assert_eq!(cfg.project_id, "demo");
    assert_eq!(cfg.database(), "staging");
}

#[test]
fn report_is_pretty_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let found = vec![
        FoundCollection { name: "users".into(), documents: 5 },
        FoundCollection { name: "orders".into(), documents: 0 },
    ];

    save_report(&path, &found).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\n  {"), "expected pretty-printed output");
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([
            {"name": "users", "documents": 5},
            {"name": "orders", "documents": 0}
        ])
    );
}

#[test]
fn unwritable_report_is_recoverable_output_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("out.json");

    let err = save_report(&path, &[]).unwrap_err();
    assert!(matches!(err, HunterError::Output { .. }));
    assert!(!err.is_fatal());
}
