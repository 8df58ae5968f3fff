// crates/deploy-gate-core/src/config.rs
// ============================================================================
// Module: Deploy Gate Configuration
// Description: Configuration loading and validation for the access gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Gate settings are loaded from a TOML file with strict size and path
//! limits. Missing or invalid configuration fails closed. The password value
//! supports the `!ENV NAME` directive, expanded from the process environment
//! at load time so the secret never has to live in the file itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "deploy-gate.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "DEPLOY_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Directive prefix expanding the password from an environment variable.
pub const ENV_DIRECTIVE_PREFIX: &str = "!ENV ";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// On-disk configuration document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct GateConfigFile {
    /// Gate settings table.
    gate: GateConfig,
}

/// Access-gate configuration.
///
/// # Invariants
/// - `password` must pass the password policy gate before any rule is
///   generated; that check runs in the validation lifecycle hook, not here.
/// - The struct is constructed once per build and immutable thereafter.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// Name of the access cookie checked by the generated routes.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Shared gate password. Never persisted; only its derived token is.
    ///
    /// A value of the form `!ENV NAME` is expanded from the process
    /// environment at load time.
    pub password: String,
    /// Canonical hostname restriction. When present, requests arriving via
    /// any other hostname are rejected outright.
    #[serde(default)]
    pub restrict_to_domain: Option<String>,
    /// Path to the routing manifest, relative to the source directory.
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration load failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl GateConfig {
    /// Loads gate configuration from the given path.
    ///
    /// When `path` is `None`, the `DEPLOY_GATE_CONFIG` environment variable
    /// and then the default filename are consulted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing, oversized, not
    /// UTF-8, not valid TOML, or fails field validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let file: GateConfigFile =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let mut config = file.gate;
        config.password = expand_env_directive(&config.password)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_non_empty("gate.cookie_name", &self.cookie_name)?;
        validate_non_empty("gate.password", &self.password)?;
        validate_non_empty("gate.manifest_path", &self.manifest_path)?;
        validate_path_string("gate.manifest_path", &self.manifest_path)?;
        if let Some(domain) = &self.restrict_to_domain {
            validate_non_empty("gate.restrict_to_domain", domain)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates that a field value is non-empty after trimming.
fn validate_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    let path = Path::new(value);
    for component in path.components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Expands a `!ENV NAME` directive from the process environment.
///
/// Values without the directive prefix pass through unchanged.
fn expand_env_directive(value: &str) -> Result<String, ConfigError> {
    let Some(name) = value.strip_prefix(ENV_DIRECTIVE_PREFIX) else {
        return Ok(value.to_string());
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::Invalid(
            "gate.password env directive names no variable".to_string(),
        ));
    }
    env::var(name)
        .map_err(|_| ConfigError::Invalid(format!("gate.password env variable not set: {name}")))
}

/// Default name of the access cookie.
fn default_cookie_name() -> String {
    "ID".to_string()
}

/// Default routing manifest path, one level above the source directory.
fn default_manifest_path() -> String {
    "../vercel.json".to_string()
}

// Tests are in the central tests module (tests/config.rs)
