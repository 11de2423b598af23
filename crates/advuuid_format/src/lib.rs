//! # advuuid Format
//!
//! Regex-driven identifier generation and validation.
//!
//! This crate provides:
//! - Random generation of strings matching a regex body
//! - Anchored, case-insensitive validation against the same body
//! - A v4 UUID fallback whenever no body is configured
//!
//! ## Usage
//!
//! ```
//! use advuuid_format::{generate, validate};
//!
//! let sku = generate(Some("[0-9a-zA-Z-]{8}")).unwrap();
//! assert_eq!(sku.len(), 8);
//! assert!(validate(Some("[0-9a-zA-Z-]{8}"), Some(&sku)));
//!
//! // No body: plain v4 UUIDs.
//! let id = generate(None).unwrap();
//! assert!(validate(None, Some(&id)));
//!
//! // Unparseable bodies never panic; generation just yields nothing.
//! assert_eq!(generate(Some("[a-")), None);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod format;
mod program;

pub use error::{FormatError, FormatResult};
pub use format::{Format, UUID_V4_PATTERN};
pub use program::{CharSet, Node, MAX_UNBOUNDED_EXTRA};

/// Generates a value matching `format`, or a v4 UUID when it is absent or empty.
///
/// Returns `None` if the body cannot be compiled. Callers are expected to let
/// the missing value fail validation rather than treat this as fatal.
pub fn generate(format: Option<&str>) -> Option<String> {
    Format::parse_optional(format).ok().map(|f| f.generate())
}

/// Checks `value` against `^(?:format)$`, ignoring case.
///
/// Falls back to v4 UUID syntax when `format` is absent or empty. Absent or
/// empty values are invalid, as are values checked against a body that does
/// not compile.
pub fn validate(format: Option<&str>, value: Option<&str>) -> bool {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return false;
    };
    Format::parse_optional(format)
        .map(|f| f.is_match(value))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn five_char_alphanumeric() {
        let value = generate(Some("^[A-Za-z0-9]{5}$")).unwrap();
        assert_eq!(value.len(), 5);
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(validate(Some("^[A-Za-z0-9]{5}$"), Some(&value)));
    }

    #[test]
    fn sku_rejects_wrong_length() {
        assert!(!validate(Some("^[0-9a-zA-Z-]{8}$"), Some("invalidsku")));
        assert!(validate(Some("^[0-9a-zA-Z-]{8}$"), Some("abcd-123")));
    }

    #[test]
    fn validation_ignores_case() {
        assert!(validate(Some("[A-Z]{4}"), Some("wxyz")));
    }

    #[test]
    fn missing_value_is_invalid() {
        assert!(!validate(Some("[A-Z]{4}"), None));
        assert!(!validate(Some("[A-Z]{4}"), Some("")));
        assert!(!validate(None, None));
    }

    #[test]
    fn invalid_body_fails_both_ways() {
        assert_eq!(generate(Some("(unclosed")), None);
        assert!(!validate(Some("(unclosed"), Some("unclosed")));
    }

    #[test]
    fn empty_body_means_uuid() {
        let value = generate(Some("")).unwrap();
        assert!(validate(Some(""), Some(&value)));
        assert!(validate(None, Some(&value)));
    }

    proptest! {
        #[test]
        fn generated_values_always_validate(
            body in prop::sample::select(vec![
                "[A-Za-z0-9]{5}",
                "^[0-9a-zA-Z-]{8}$",
                "[A-Z0-9]{6}",
                "PRD-\\d{4}-[a-f]{2}",
                "(INV|ORD)_[0-9]{3,6}",
                "[a-z]+\\.[a-z]{2,3}",
                "x?y*z+",
                "[^\\s]{10}",
                "",
            ])
        ) {
            let value = generate(Some(body)).unwrap();
            prop_assert!(validate(Some(body), Some(&value)), "{} did not match {}", value, body);
        }

        #[test]
        fn case_does_not_affect_validity(value in "[a-f0-9]{8}") {
            let upper = value.to_uppercase();
            prop_assert!(validate(Some("[0-9a-f]{8}"), Some(&value)), "{} did not match", value);
            prop_assert!(validate(Some("[0-9a-f]{8}"), Some(&upper)), "{} did not match", upper);
        }
    }
}
