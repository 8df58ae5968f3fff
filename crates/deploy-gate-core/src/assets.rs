// crates/deploy-gate-core/src/assets.rs
// ============================================================================
// Module: Deploy Gate Asset Provisioner
// Description: Companion HTML pages referenced by the generated routes.
// Purpose: Place bundled gate pages into the site output without overwriting.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The generated routes reference up to three companion pages: the forbidden
//! page for non-canonical hostnames, the not-found page carrying the login
//! form, and a logout page that expires the cookie. Templates are bundled
//! into the binary and written into the site output directory only when no
//! file already exists at the target path, so user customizations are never
//! overwritten. The `{{COOKIE_NAME}}` placeholder is substituted at write
//! time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Placeholder substituted with the configured cookie name.
pub const COOKIE_NAME_PLACEHOLDER: &str = "{{COOKIE_NAME}}";

// ============================================================================
// SECTION: Gate Pages
// ============================================================================

/// Companion pages bundled with the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePage {
    /// Served for requests arriving via a non-canonical hostname.
    DeploymentForbidden,
    /// Served for requests lacking the gate cookie; carries the login form.
    DeploymentNotFound,
    /// Expires the gate cookie.
    Logout,
}

impl GatePage {
    /// Returns the page's file name inside the site output directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::DeploymentForbidden => "deployment_forbidden.html",
            Self::DeploymentNotFound => "deployment_not_found.html",
            Self::Logout => "logout.html",
        }
    }

    /// Returns the bundled template text for this page.
    const fn template(self) -> &'static str {
        match self {
            Self::DeploymentForbidden => include_str!("../assets/deployment_forbidden.html"),
            Self::DeploymentNotFound => include_str!("../assets/deployment_not_found.html"),
            Self::Logout => include_str!("../assets/logout.html"),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Asset provisioning failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// Parent directory for the page could not be created.
    #[error("asset directory create failed: {path}: {detail}")]
    CreateDir {
        /// Directory that failed to create.
        path: String,
        /// Underlying I/O failure text.
        detail: String,
    },

    /// Page file could not be written.
    #[error("asset write failed: {path}: {detail}")]
    Write {
        /// Path that failed to write.
        path: String,
        /// Underlying I/O failure text.
        detail: String,
    },
}

// ============================================================================
// SECTION: Provisioning
// ============================================================================

/// Provisions a gate page into the site output directory.
///
/// Returns `true` when the page was written and `false` when a file already
/// existed at the target path and was left untouched. Substitution of the
/// cookie-name placeholder happens only in freshly written pages; existing
/// files are never modified, even when the bundled template has changed.
///
/// # Errors
/// Returns [`AssetError`] when the parent directory or the page file cannot
/// be created.
pub fn provision_page(
    site_dir: &Path,
    page: GatePage,
    cookie_name: &str,
) -> Result<bool, AssetError> {
    let target = site_dir.join(page.file_name());
    if target.exists() {
        return Ok(false);
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|err| AssetError::CreateDir {
            path: parent.display().to_string(),
            detail: err.to_string(),
        })?;
    }

    let rendered = page.template().replace(COOKIE_NAME_PLACEHOLDER, cookie_name);
    fs::write(&target, rendered).map_err(|err| AssetError::Write {
        path: target.display().to_string(),
        detail: err.to_string(),
    })?;
    Ok(true)
}

// Tests are in the central tests module (tests/assets.rs)
