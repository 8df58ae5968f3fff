// crates/deploy-gate-core/src/manifest.rs
// ============================================================================
// Module: Deploy Gate Manifest Merger
// Description: Load-modify-save surgery on the deployment routing manifest.
// Purpose: Replace exactly the routes field while preserving all other content.
// Dependencies: crate::rules, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The routing manifest is an arbitrary JSON object of which exactly one
//! field, `routes`, is owned by this crate. The merge reads the document,
//! replaces `routes` with the compiled route list, and writes the whole
//! document back. Every other field survives with its value intact;
//! re-serialization may reorder keys. The rewrite is a full-document write
//! with no backup: the operation is deterministic given the same build
//! inputs, so a failed write is repaired by rerunning the build.
//!
//! Existence of the manifest is checked separately at validation time via
//! [`ensure_manifest_exists`] so misconfiguration surfaces before any
//! expensive build work.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::rules::MatchRule;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Manifest field owned and fully replaced by the gate.
pub const ROUTES_FIELD: &str = "routes";

/// Maximum accepted manifest file size in bytes.
pub(crate) const MAX_MANIFEST_FILE_SIZE: usize = 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Manifest load, parse, and write failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    /// Manifest file does not exist at the configured path.
    #[error("routing manifest not found: {path}")]
    NotFound {
        /// The missing path.
        path: String,
    },

    /// Manifest file could not be read.
    #[error("routing manifest read failed: {path}: {detail}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O failure text.
        detail: String,
    },

    /// Manifest file exceeds the accepted size limit.
    #[error("routing manifest exceeds size limit: {path}")]
    TooLarge {
        /// Path of the oversized file.
        path: String,
    },

    /// Manifest is not valid structured data.
    #[error("routing manifest parse failed: {path}: {detail}")]
    Parse {
        /// Path that failed to parse.
        path: String,
        /// Underlying parse failure text.
        detail: String,
    },

    /// Manifest could not be written back.
    #[error("routing manifest write failed: {path}: {detail}")]
    Write {
        /// Path that failed to write.
        path: String,
        /// Underlying I/O failure text.
        detail: String,
    },
}

// ============================================================================
// SECTION: Existence Check
// ============================================================================

/// Verifies the manifest exists before any build output is produced.
///
/// # Errors
/// Returns [`ManifestError::NotFound`] when no file exists at `path`.
pub fn ensure_manifest_exists(path: &Path) -> Result<(), ManifestError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ManifestError::NotFound {
            path: path.display().to_string(),
        })
    }
}

// ============================================================================
// SECTION: Platform Mapping
// ============================================================================

/// Maps a compiled rule into the manifest's route schema.
///
/// `match_absent` conditions land in the `missing` array; positive
/// conditions land in `has`. The compiler currently emits only negative
/// conditions, but the mapping stays total so the rule model remains
/// platform-neutral.
fn route_value(rule: &MatchRule) -> Value {
    let mut missing = Vec::new();
    let mut present = Vec::new();
    for condition in &rule.conditions {
        let entry = json!({
            "type": "header",
            "key": condition.key,
            "value": condition.value,
        });
        if condition.match_absent {
            missing.push(entry);
        } else {
            present.push(entry);
        }
    }

    let mut route = Map::new();
    route.insert("src".to_string(), json!(rule.path_pattern));
    if !missing.is_empty() {
        route.insert("missing".to_string(), Value::Array(missing));
    }
    if !present.is_empty() {
        route.insert("has".to_string(), Value::Array(present));
    }
    route.insert("dest".to_string(), json!(rule.destination));
    route.insert("status".to_string(), json!(rule.status));
    Value::Object(route)
}

/// Maps a compiled route list into the manifest's `routes` value.
#[must_use]
pub fn routes_value(rules: &[MatchRule]) -> Value {
    Value::Array(rules.iter().map(route_value).collect())
}

// ============================================================================
// SECTION: Merge
// ============================================================================

/// Loads the manifest document as a JSON object.
fn load_manifest(path: &Path) -> Result<Map<String, Value>, ManifestError> {
    ensure_manifest_exists(path)?;
    let bytes = fs::read(path).map_err(|err| ManifestError::Io {
        path: path.display().to_string(),
        detail: err.to_string(),
    })?;
    if bytes.len() > MAX_MANIFEST_FILE_SIZE {
        return Err(ManifestError::TooLarge {
            path: path.display().to_string(),
        });
    }
    let content = std::str::from_utf8(&bytes).map_err(|_| ManifestError::Parse {
        path: path.display().to_string(),
        detail: "manifest file must be utf-8".to_string(),
    })?;
    let document: Value = serde_json::from_str(content).map_err(|err| ManifestError::Parse {
        path: path.display().to_string(),
        detail: err.to_string(),
    })?;
    match document {
        Value::Object(fields) => Ok(fields),
        _ => Err(ManifestError::Parse {
            path: path.display().to_string(),
            detail: "manifest root must be a JSON object".to_string(),
        }),
    }
}

/// Replaces the manifest's `routes` field with the compiled route list.
///
/// Reads the document at `path`, discards whatever `routes` previously held,
/// and writes the full document back to the same path. All other fields pass
/// through untouched.
///
/// # Errors
/// Returns [`ManifestError`] when the document is missing, unreadable,
/// oversized, not a JSON object, or cannot be written back.
pub fn merge_routes(path: &Path, rules: &[MatchRule]) -> Result<(), ManifestError> {
    let mut document = load_manifest(path)?;
    document.insert(ROUTES_FIELD.to_string(), routes_value(rules));

    let mut serialized =
        serde_json::to_string_pretty(&Value::Object(document)).map_err(|err| {
            ManifestError::Write {
                path: path.display().to_string(),
                detail: err.to_string(),
            }
        })?;
    serialized.push('\n');
    fs::write(path, serialized).map_err(|err| ManifestError::Write {
        path: path.display().to_string(),
        detail: err.to_string(),
    })
}

// Tests are in the central tests module (tests/manifest.rs)
