// crates/deploy-gate-core/src/lib.rs
// ============================================================================
// Module: Deploy Gate Core Library
// Description: Public API surface for the Deploy Gate core.
// Purpose: Expose the policy gate, token encoder, rule compiler, and merger.
// Dependencies: crate::{assets, config, lifecycle, manifest, policy, rules, token}
// ============================================================================

//! ## Overview
//! Deploy Gate rewrites a deployment's route table so every request lacking
//! a specific cookie is answered with a not-found page, and (optionally)
//! every request arriving via a non-canonical hostname is answered with a
//! forbidden page. The gate is compiled into edge-routing configuration at
//! build time; no server-side code runs at request time. Integration happens
//! through two explicit lifecycle entry points rather than inheritance from
//! any host build framework.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod assets;
pub mod config;
pub mod lifecycle;
pub mod manifest;
pub mod policy;
pub mod rules;
pub mod token;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use assets::AssetError;
pub use assets::COOKIE_NAME_PLACEHOLDER;
pub use assets::GatePage;
pub use assets::provision_page;
pub use config::ConfigError;
pub use config::ENV_DIRECTIVE_PREFIX;
pub use config::GateConfig;
pub use lifecycle::BuildContext;
pub use lifecycle::GateError;
pub use lifecycle::PostBuildAction;
pub use lifecycle::PostBuildReport;
pub use lifecycle::post_build;
pub use lifecycle::resolve_manifest_path;
pub use lifecycle::validate_build;
pub use manifest::ManifestError;
pub use manifest::ROUTES_FIELD;
pub use manifest::ensure_manifest_exists;
pub use manifest::merge_routes;
pub use manifest::routes_value;
pub use policy::MIN_PASSWORD_LENGTH;
pub use policy::PolicyViolation;
pub use policy::PolicyWarning;
pub use policy::validate_password;
pub use rules::FORBIDDEN_DESTINATION;
pub use rules::HeaderCondition;
pub use rules::MATCH_ALL_PATHS;
pub use rules::MatchRule;
pub use rules::NOT_FOUND_DESTINATION;
pub use rules::RuleError;
pub use rules::STATUS_FORBIDDEN;
pub use rules::STATUS_NOT_FOUND;
pub use rules::compile_routes;
pub use token::CookieToken;
pub use token::encode_password;
