// crates/deploy-gate-core/src/policy.rs
// ============================================================================
// Module: Deploy Gate Password Policy
// Description: Strength policy applied to the gate password before encoding.
// Purpose: Reject weak passwords at validation time so a weak gate never ships.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The password policy gate runs at configuration-validation time, before any
//! build output exists. Checks run in a fixed order and the first failure
//! wins: length, then the common-password denylist, then the non-fatal
//! `ENV ` prefix heuristic. A violation aborts the build.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Minimum accepted password length in bytes.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Prefix that suggests a mistyped `!ENV` expansion directive.
///
/// A password value beginning with these four characters most likely meant to
/// use the environment expansion directive and omitted the leading `!`. The
/// literal string would ship as the password without this heuristic.
const ENV_DIRECTIVE_COLLISION_PREFIX: &str = "ENV ";

/// Denylist of the most common breached passwords plus domain-trivial entries.
///
/// Entries are lowercase; candidates are lowercased before comparison. The
/// list is a static, versionable resource and is not user-configurable.
const COMMON_PASSWORD_DENYLIST: &[&str] = &[
    "123456",
    "password",
    "12345678",
    "qwerty",
    "123456789",
    "12345",
    "1234567",
    "111111",
    "1234567890",
    "123123",
    "abc123",
    "1234",
    "password1",
    "passw0rd",
    "iloveyou",
    "000000",
    "1q2w3e4r",
    "qwertyuiop",
    "monkey",
    "dragon",
    "letmein",
    "baseball",
    "football",
    "shadow",
    "master",
    "superman",
    "trustno1",
    "sunshine",
    "princess",
    "welcome",
    "login",
    "admin",
    "administrator",
    "root",
    "guest",
    "secret",
    "changeme",
    "internal",
    "staging",
    "preview",
    "deploygate",
    "deploy-gate",
];

// ============================================================================
// SECTION: Policy Diagnostics
// ============================================================================

/// Fatal password policy violations.
///
/// # Invariants
/// - Raised at configuration-validation time, never during post-build.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PolicyViolation {
    /// Password is shorter than the accepted minimum.
    #[error("password too short: {length} bytes (minimum {minimum})", minimum = MIN_PASSWORD_LENGTH)]
    TooShort {
        /// Byte length of the rejected password.
        length: usize,
    },

    /// Password matches an entry in the common-password denylist.
    #[error("password matches a well-known common password")]
    TooCommon,
}

/// Non-fatal password policy warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyWarning {
    /// Password begins with the literal characters `ENV `.
    ///
    /// This collides with the `!ENV NAME` expansion directive recognized by
    /// the configuration loader; the user probably omitted the leading `!`.
    EnvDirectivePrefix,
}

impl fmt::Display for PolicyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvDirectivePrefix => {
                write!(
                    f,
                    "password begins with the literal \"ENV \"; if environment expansion was \
                     intended, write \"!ENV NAME\" instead"
                )
            }
        }
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a candidate password against the strength policy.
///
/// Checks run in order and the first failure wins. A successful result
/// carries zero or more non-fatal warnings for the host to surface.
///
/// # Errors
/// Returns [`PolicyViolation`] when the password is too short or matches the
/// common-password denylist.
pub fn validate_password(password: &str) -> Result<Vec<PolicyWarning>, PolicyViolation> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(PolicyViolation::TooShort {
            length: password.len(),
        });
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORD_DENYLIST.contains(&lowered.as_str()) {
        return Err(PolicyViolation::TooCommon);
    }

    let mut warnings = Vec::new();
    if password.starts_with(ENV_DIRECTIVE_COLLISION_PREFIX) {
        warnings.push(PolicyWarning::EnvDirectivePrefix);
    }
    Ok(warnings)
}

// Tests are in the central tests module (tests/policy.rs)
