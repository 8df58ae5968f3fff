// crates/deploy-gate-core/src/rules.rs
// ============================================================================
// Module: Deploy Gate Rule Compiler
// Description: Route-rule model and access-gate rule synthesis.
// Purpose: Compile the ordered, non-overlapping rule set implementing the gate.
// Dependencies: crate::token, serde, thiserror
// ============================================================================

//! ## Overview
//! The rule compiler turns a cookie name, an encoded token, and an optional
//! canonical-hostname constraint into an ordered route list. Evaluation at
//! the edge is first-match-wins, so the stricter domain rule must precede the
//! cookie rule. Conditions carry an explicit `match_absent` flag instead of a
//! platform-specific sentinel field, keeping the compiler output independent
//! of any one deployment platform's manifest schema.
//!
//! Every value interpolated into a pattern is escaped or validated first.
//! Cookie names must be RFC 6265 tokens; the cookie token alphabet is
//! re-checked here even though the encoder guarantees it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::token::CookieToken;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Path pattern matching every request path.
pub const MATCH_ALL_PATHS: &str = "/.*";

/// Destination served when a request arrives via a non-canonical hostname.
pub const FORBIDDEN_DESTINATION: &str = "/deployment_forbidden.html";

/// Destination served when a request lacks the gate cookie.
pub const NOT_FOUND_DESTINATION: &str = "/deployment_not_found.html";

/// Status code for the domain-restriction rule.
pub const STATUS_FORBIDDEN: u16 = 403;

/// Status code for the cookie rule.
///
/// 404 rather than 401/403 is deliberate: an unauthorized visitor cannot
/// distinguish a gated page from a genuinely missing one.
pub const STATUS_NOT_FOUND: u16 = 404;

// ============================================================================
// SECTION: Rule Model
// ============================================================================

/// Single header condition attached to a route rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCondition {
    /// Header name, lowercase.
    pub key: String,
    /// Pattern matched against the raw header value.
    pub value: String,
    /// When `true`, the rule fires only if the header is absent or does not
    /// match the pattern.
    pub match_absent: bool,
}

/// Single entry in the compiled route list.
///
/// # Invariants
/// - A rule fires for a request matching `path_pattern` when none of its
///   `match_absent` conditions match the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRule {
    /// Pattern matched against the request path.
    pub path_pattern: String,
    /// Header conditions, all of which must hold for the rule to fire.
    pub conditions: Vec<HeaderCondition>,
    /// Destination rendered when the rule fires.
    pub destination: String,
    /// Response status code when the rule fires.
    pub status: u16,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Rule compilation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// Cookie name is empty or not an RFC 6265 token.
    #[error("cookie name is not a valid cookie token: {name:?}")]
    InvalidCookieName {
        /// The rejected cookie name.
        name: String,
    },

    /// Cookie token contains characters outside its declared alphabet.
    #[error("cookie token contains unsafe characters")]
    UnsafeToken,

    /// Domain restriction is empty.
    #[error("domain restriction must be non-empty")]
    EmptyDomain,
}

// ============================================================================
// SECTION: Pattern Escaping
// ============================================================================

/// Returns whether a character is allowed in an RFC 6265 cookie name.
const fn is_cookie_token_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' | '^' | '_' | '`' | '|' | '~'
        )
}

/// Returns whether a character belongs to the cookie token alphabet.
const fn is_token_alphabet_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_')
}

/// Escapes regex metacharacters so a value matches literally inside a
/// pattern condition.
fn escape_pattern_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(
            ch,
            '.' | '^' | '$' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\'
        ) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

// ============================================================================
// SECTION: Compilation
// ============================================================================

/// Compiles the ordered route list implementing the access gate.
///
/// When `restrict_to_domain` is present the domain rule is emitted first:
/// requests arriving via alias hostnames (preview or branch URLs) are
/// rejected outright rather than merely cookie-gated. The cookie rule is
/// always emitted last and matches the `name=token` pair as a substring,
/// since a `Cookie` header may carry multiple pairs.
///
/// # Errors
/// Returns [`RuleError`] when the cookie name is not an RFC 6265 token, the
/// token alphabet is violated, or the domain restriction is empty.
pub fn compile_routes(
    cookie_name: &str,
    token: &CookieToken,
    restrict_to_domain: Option<&str>,
) -> Result<Vec<MatchRule>, RuleError> {
    if cookie_name.is_empty() || !cookie_name.chars().all(is_cookie_token_char) {
        return Err(RuleError::InvalidCookieName {
            name: cookie_name.to_string(),
        });
    }
    if !token.as_str().chars().all(is_token_alphabet_char) {
        return Err(RuleError::UnsafeToken);
    }

    let mut routes = Vec::with_capacity(2);

    if let Some(domain) = restrict_to_domain {
        if domain.is_empty() {
            return Err(RuleError::EmptyDomain);
        }
        routes.push(MatchRule {
            path_pattern: MATCH_ALL_PATHS.to_string(),
            conditions: vec![HeaderCondition {
                key: "host".to_string(),
                value: escape_pattern_literal(domain),
                match_absent: true,
            }],
            destination: FORBIDDEN_DESTINATION.to_string(),
            status: STATUS_FORBIDDEN,
        });
    }

    routes.push(MatchRule {
        path_pattern: MATCH_ALL_PATHS.to_string(),
        conditions: vec![HeaderCondition {
            key: "cookie".to_string(),
            value: format!(".*{}={}.*", escape_pattern_literal(cookie_name), token.as_str()),
            match_absent: true,
        }],
        destination: NOT_FOUND_DESTINATION.to_string(),
        status: STATUS_NOT_FOUND,
    });

    Ok(routes)
}

// Tests are in the central tests module (tests/rules.rs)
