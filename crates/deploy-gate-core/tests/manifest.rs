// crates/deploy-gate-core/tests/manifest.rs
// ============================================================================
// Module: Manifest Merger Tests
// Description: Validate routes replacement and pass-through preservation.
// Purpose: Ensure the merge owns exactly the routes field and nothing else.
// ============================================================================
//! ## Overview
//! Covers full replacement of `routes`, byte-identical idempotence across
//! repeated merges, preservation of unrelated fields, and the fail-closed
//! behavior for missing, malformed, and oversized documents.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::path::Path;

use deploy_gate_core::ManifestError;
use deploy_gate_core::compile_routes;
use deploy_gate_core::encode_password;
use deploy_gate_core::ensure_manifest_exists;
use deploy_gate_core::merge_routes;
use deploy_gate_core::routes_value;
use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

fn write_manifest(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("vercel.json");
    fs::write(&path, content).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn merge_replaces_routes_and_preserves_other_fields() {
    let dir = TempDir::new().unwrap();
    let path = write_manifest(
        &dir,
        r#"{
            "version": 2,
            "cleanUrls": true,
            "headers": [{"source": "/(.*)", "headers": [{"key": "x-frame-options", "value": "DENY"}]}],
            "routes": [{"src": "/old", "dest": "/old.html"}]
        }"#,
    );

    let token = encode_password("CorrectHorseBattery9");
    let routes = compile_routes("ID", &token, None).unwrap();
    merge_routes(&path, &routes).unwrap();

    let document = read_json(&path);
    assert_eq!(document["routes"], routes_value(&routes));
    assert_eq!(document["version"], json!(2));
    assert_eq!(document["cleanUrls"], json!(true));
    assert_eq!(
        document["headers"],
        json!([{"source": "/(.*)", "headers": [{"key": "x-frame-options", "value": "DENY"}]}])
    );
}

#[test]
fn merge_is_idempotent_byte_for_byte() {
    let dir = TempDir::new().unwrap();
    let path = write_manifest(&dir, r#"{"version": 2, "routes": []}"#);

    let token = encode_password("CorrectHorseBattery9");
    let routes = compile_routes("ID", &token, Some("docs.example.com")).unwrap();

    merge_routes(&path, &routes).unwrap();
    let first = fs::read(&path).unwrap();
    merge_routes(&path, &routes).unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn merge_adds_routes_field_when_absent() {
    let dir = TempDir::new().unwrap();
    let path = write_manifest(&dir, r#"{"version": 2}"#);

    let token = encode_password("CorrectHorseBattery9");
    let routes = compile_routes("ID", &token, None).unwrap();
    merge_routes(&path, &routes).unwrap();

    let document = read_json(&path);
    assert_eq!(document["routes"], routes_value(&routes));
    assert_eq!(document["version"], json!(2));
}

#[test]
fn routes_serialize_negative_conditions_into_missing() {
    let token = encode_password("CorrectHorseBattery9");
    let routes = compile_routes("ID", &token, Some("docs.example.com")).unwrap();
    let value = routes_value(&routes);

    assert_eq!(
        value,
        json!([
            {
                "src": "/.*",
                "missing": [{"type": "header", "key": "host", "value": "docs\\.example\\.com"}],
                "dest": "/deployment_forbidden.html",
                "status": 403
            },
            {
                "src": "/.*",
                "missing": [{"type": "header", "key": "cookie", "value": format!(".*ID={token}.*")}],
                "dest": "/deployment_not_found.html",
                "status": 404
            }
        ])
    );
}

#[test]
fn missing_manifest_fails_without_writing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vercel.json");

    assert!(matches!(
        ensure_manifest_exists(&path).unwrap_err(),
        ManifestError::NotFound { .. }
    ));

    let token = encode_password("CorrectHorseBattery9");
    let routes = compile_routes("ID", &token, None).unwrap();
    let err = merge_routes(&path, &routes).unwrap_err();
    assert!(matches!(err, ManifestError::NotFound { .. }));
    assert!(!path.exists());
}

#[test]
fn malformed_manifest_fails_to_parse() {
    let dir = TempDir::new().unwrap();
    let token = encode_password("CorrectHorseBattery9");
    let routes = compile_routes("ID", &token, None).unwrap();

    let truncated = write_manifest(&dir, r#"{"version": 2,"#);
    assert!(matches!(merge_routes(&truncated, &routes).unwrap_err(), ManifestError::Parse { .. }));
}

#[test]
fn non_object_manifest_root_is_rejected() {
    let dir = TempDir::new().unwrap();
    let token = encode_password("CorrectHorseBattery9");
    let routes = compile_routes("ID", &token, None).unwrap();

    let array_root = write_manifest(&dir, r#"[1, 2, 3]"#);
    assert!(matches!(merge_routes(&array_root, &routes).unwrap_err(), ManifestError::Parse { .. }));
}

#[test]
fn oversized_manifest_is_rejected() {
    let dir = TempDir::new().unwrap();
    let oversized = "a".repeat(1_048_577);
    let path = write_manifest(&dir, &oversized);

    let token = encode_password("CorrectHorseBattery9");
    let routes = compile_routes("ID", &token, None).unwrap();
    assert!(matches!(merge_routes(&path, &routes).unwrap_err(), ManifestError::TooLarge { .. }));
}
