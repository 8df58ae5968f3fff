// crates/deploy-gate-core/src/lifecycle.rs
// ============================================================================
// Module: Deploy Gate Build Lifecycle
// Description: Validation and post-build entry points for host pipelines.
// Purpose: Run the validate and apply phases as plain functions, no host base type.
// Dependencies: crate::{assets, config, manifest, policy, rules, token}, thiserror
// ============================================================================

//! ## Overview
//! A host build pipeline integrates the gate through two explicit entry
//! points. [`validate_build`] runs once before any output is generated and
//! may abort the build: it checks the password policy and that the routing
//! manifest exists, so misconfiguration surfaces before expensive build
//! work. [`post_build`] runs once after all output files exist: it encodes
//! the token, compiles the route list, merges it into the manifest, and
//! provisions the companion pages. Post-build failures are wrapped once,
//! naming the failed action; partial completion is possible and is not
//! rolled back, because rerunning the build regenerates identical output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use crate::assets::GatePage;
use crate::assets::provision_page;
use crate::config::GateConfig;
use crate::manifest::ManifestError;
use crate::manifest::ensure_manifest_exists;
use crate::manifest::merge_routes;
use crate::policy::PolicyViolation;
use crate::policy::PolicyWarning;
use crate::policy::validate_password;
use crate::rules::RuleError;
use crate::rules::compile_routes;
use crate::token::encode_password;

// ============================================================================
// SECTION: Build Context
// ============================================================================

/// Host-resolved directories for a single build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// Source/input directory; the manifest path resolves relative to it.
    pub docs_dir: PathBuf,
    /// Output directory receiving the built site and companion pages.
    pub site_dir: PathBuf,
}

/// Summary of the work performed by [`post_build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostBuildReport {
    /// Manifest path the route list was merged into.
    pub manifest_path: PathBuf,
    /// File names of pages freshly written into the site directory.
    pub provisioned_pages: Vec<&'static str>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Gate lifecycle failures.
#[derive(Debug, Error)]
pub enum GateError {
    /// Password rejected by the policy gate.
    #[error("password rejected: {0}")]
    Policy(#[from] PolicyViolation),
    /// Routing manifest missing or malformed at validation time.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    /// Route compilation failure.
    #[error(transparent)]
    Rules(#[from] RuleError),
    /// A post-build action failed.
    #[error("{action} failed: {detail}")]
    PostBuild {
        /// Which action failed.
        action: PostBuildAction,
        /// Underlying failure text.
        detail: String,
    },
}

/// Post-build actions named in wrapped failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostBuildAction {
    /// Merging the compiled routes into the manifest.
    ManifestMerge,
    /// Copying a companion page into the site directory.
    AssetCopy,
}

impl fmt::Display for PostBuildAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManifestMerge => write!(f, "manifest merge"),
            Self::AssetCopy => write!(f, "asset copy"),
        }
    }
}

// ============================================================================
// SECTION: Entry Points
// ============================================================================

/// Resolves the manifest path against the source directory.
#[must_use]
pub fn resolve_manifest_path(config: &GateConfig, docs_dir: &Path) -> PathBuf {
    docs_dir.join(&config.manifest_path)
}

/// Configuration-validation hook, invoked once per build before any output.
///
/// Checks the password policy and that the routing manifest exists. Returns
/// the non-fatal policy warnings for the host to surface.
///
/// # Errors
/// Returns [`GateError`] when the password violates the policy or the
/// manifest is missing; either aborts the build.
pub fn validate_build(
    config: &GateConfig,
    docs_dir: &Path,
) -> Result<Vec<PolicyWarning>, GateError> {
    let warnings = validate_password(&config.password)?;
    ensure_manifest_exists(&resolve_manifest_path(config, docs_dir))?;
    Ok(warnings)
}

/// Post-build hook, invoked once after all output files exist.
///
/// Encodes the cookie token, compiles the route list, merges it into the
/// manifest, and provisions each page the generated routes reference. The
/// forbidden page is provisioned only when a domain restriction is
/// configured, since only the domain rule references it.
///
/// # Errors
/// Returns [`GateError::PostBuild`] naming the failed action when the merge
/// or an asset copy fails; [`GateError::Rules`] when compilation fails.
pub fn post_build(config: &GateConfig, context: &BuildContext) -> Result<PostBuildReport, GateError> {
    let token = encode_password(&config.password);
    let routes =
        compile_routes(&config.cookie_name, &token, config.restrict_to_domain.as_deref())?;

    let manifest_path = resolve_manifest_path(config, &context.docs_dir);
    merge_routes(&manifest_path, &routes)
        .map_err(|err| post_build_failure(PostBuildAction::ManifestMerge, &err))?;

    let mut pages = Vec::with_capacity(3);
    if config.restrict_to_domain.is_some() {
        pages.push(GatePage::DeploymentForbidden);
    }
    pages.push(GatePage::DeploymentNotFound);
    pages.push(GatePage::Logout);

    let mut provisioned_pages = Vec::with_capacity(pages.len());
    for page in pages {
        let written = provision_page(&context.site_dir, page, &config.cookie_name)
            .map_err(|err| post_build_failure(PostBuildAction::AssetCopy, &err))?;
        if written {
            provisioned_pages.push(page.file_name());
        }
    }

    Ok(PostBuildReport {
        manifest_path,
        provisioned_pages,
    })
}

/// Wraps a post-build failure with the action that produced it.
fn post_build_failure(action: PostBuildAction, err: &dyn fmt::Display) -> GateError {
    GateError::PostBuild {
        action,
        detail: err.to_string(),
    }
}

// Tests are in the central tests module (tests/lifecycle.rs)
