// crates/deploy-gate-core/tests/rules.rs
// ============================================================================
// Module: Rule Compiler Tests
// Description: Validate route synthesis, ordering, and pattern escaping.
// Purpose: Ensure the compiled gate rules match the documented semantics.
// ============================================================================
//! ## Overview
//! Covers the one-rule and two-rule shapes, the mandatory domain-before-
//! cookie ordering, cookie-name validation, and literal escaping of every
//! value interpolated into a pattern.

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

use deploy_gate_core::FORBIDDEN_DESTINATION;
use deploy_gate_core::MATCH_ALL_PATHS;
use deploy_gate_core::NOT_FOUND_DESTINATION;
use deploy_gate_core::RuleError;
use deploy_gate_core::STATUS_FORBIDDEN;
use deploy_gate_core::STATUS_NOT_FOUND;
use deploy_gate_core::compile_routes;
use deploy_gate_core::encode_password;

/// Strips the substring-match wrapper from a condition pattern, leaving the
/// literal the rule requires inside the header value.
fn inner_literal(pattern: &str) -> &str {
    pattern
        .strip_prefix(".*")
        .and_then(|rest| rest.strip_suffix(".*"))
        .unwrap_or(pattern)
}

#[test]
fn no_domain_restriction_compiles_to_one_rule() {
    let token = encode_password("CorrectHorseBattery9");
    let routes = compile_routes("ID", &token, None).unwrap();

    assert_eq!(routes.len(), 1);
    let rule = &routes[0];
    assert_eq!(rule.path_pattern, MATCH_ALL_PATHS);
    assert_eq!(rule.destination, NOT_FOUND_DESTINATION);
    assert_eq!(rule.status, STATUS_NOT_FOUND);
    assert_eq!(rule.conditions.len(), 1);
    assert_eq!(rule.conditions[0].key, "cookie");
    assert!(rule.conditions[0].match_absent);
}

#[test]
fn domain_restriction_compiles_to_two_ordered_rules() {
    let token = encode_password("CorrectHorseBattery9");
    let routes = compile_routes("ID", &token, Some("docs.example.com")).unwrap();

    assert_eq!(routes.len(), 2);

    let domain_rule = &routes[0];
    assert_eq!(domain_rule.destination, FORBIDDEN_DESTINATION);
    assert_eq!(domain_rule.status, STATUS_FORBIDDEN);
    assert_eq!(domain_rule.conditions.len(), 1);
    assert_eq!(domain_rule.conditions[0].key, "host");
    assert!(domain_rule.conditions[0].match_absent);

    let cookie_rule = &routes[1];
    assert_eq!(cookie_rule.destination, NOT_FOUND_DESTINATION);
    assert_eq!(cookie_rule.status, STATUS_NOT_FOUND);
}

#[test]
fn cookie_condition_requires_the_name_value_pair() {
    let token = encode_password("CorrectHorseBattery9");
    let routes = compile_routes("ID", &token, None).unwrap();

    let pattern = &routes[0].conditions[0].value;
    assert_eq!(pattern, &format!(".*ID={token}.*"));

    // A Cookie header may carry multiple pairs; the rule only needs the
    // pair as a substring.
    let required = inner_literal(pattern);
    let authorized = format!("theme=dark; ID={token}; lang=en");
    let unauthorized = "theme=dark; lang=en";
    assert!(authorized.contains(required));
    assert!(!unauthorized.contains(required));
}

#[test]
fn domain_pattern_escapes_literal_dots() {
    let token = encode_password("CorrectHorseBattery9");
    let routes = compile_routes("ID", &token, Some("docs.example.com")).unwrap();
    assert_eq!(routes[0].conditions[0].value, "docs\\.example\\.com");
}

#[test]
fn cookie_name_metacharacters_are_escaped() {
    let token = encode_password("CorrectHorseBattery9");
    // '+' is a valid RFC 6265 cookie-name character but a regex
    // metacharacter; it must be escaped in the pattern.
    let routes = compile_routes("SESSION+ID", &token, None).unwrap();
    let pattern = &routes[0].conditions[0].value;
    assert_eq!(pattern, &format!(".*SESSION\\+ID={token}.*"));
}

#[test]
fn invalid_cookie_names_are_rejected() {
    let token = encode_password("CorrectHorseBattery9");
    for name in ["", "bad name", "bad;name", "bad=name", "bad\"name", "bad,name"] {
        let err = compile_routes(name, &token, None).unwrap_err();
        assert!(matches!(err, RuleError::InvalidCookieName { .. }), "accepted {name:?}");
    }
}

#[test]
fn empty_domain_restriction_is_rejected() {
    let token = encode_password("CorrectHorseBattery9");
    let err = compile_routes("ID", &token, Some("")).unwrap_err();
    assert_eq!(err, RuleError::EmptyDomain);
}
