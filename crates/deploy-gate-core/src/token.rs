// crates/deploy-gate-core/src/token.rs
// ============================================================================
// Module: Deploy Gate Cookie Token Encoder
// Description: Deterministic password-to-cookie-token encoding.
// Purpose: Produce pattern-safe cookie values that are stable across builds.
// Dependencies: base64, serde
// ============================================================================

//! ## Overview
//! The cookie token is the value half of the `name=value` pair matched by the
//! generated cookie rule. Encoding is pure and deterministic so a browser
//! cookie set before a no-op rebuild keeps matching afterwards. The URL-safe
//! base64 alphabet without padding keeps the token free of regex
//! metacharacters, cookie delimiters, and whitespace.
//!
//! The bundled login page produces the same alphabet client-side, so the
//! value a visitor's browser stores is byte-identical to the value compiled
//! into the route table.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as TOKEN_ENGINE;
use serde::Serialize;

// ============================================================================
// SECTION: Cookie Token
// ============================================================================

/// Opaque cookie-value token derived from the gate password.
///
/// # Invariants
/// - Same password always yields the same token.
/// - Token text uses only `[A-Za-z0-9_-]`, safe inside a header pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CookieToken(String);

impl CookieToken {
    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CookieToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Encoding
// ============================================================================

/// Encodes a password into its cookie-matchable token.
///
/// The encoding is a byte-level reversible transform of the raw password
/// bytes, hence injective: distinct passwords never collide.
#[must_use]
pub fn encode_password(password: &str) -> CookieToken {
    CookieToken(TOKEN_ENGINE.encode(password.as_bytes()))
}

// Tests are in the central tests module (tests/proptest_token.rs)
