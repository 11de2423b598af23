//! Property-based test generators using proptest.
//!
//! Provides strategies for identifier formats, locales and document IDs
//! along with values known to satisfy a format.

use proptest::prelude::*;

/// Format bodies hosts commonly configure, each able to generate values.
pub const SAMPLE_FORMATS: &[&str] = &[
    "^[A-Za-z0-9]{5}$",
    "^[0-9a-zA-Z-]{8}$",
    "^[A-Z0-9]{6}$",
    "^[A-Z]{4}$",
    "[A-Z]{3}-\\d{4}",
    "^(INV|ORD)-[0-9]{6}$",
    "^[a-f0-9]{8}(-[a-f0-9]{4}){3}-[a-f0-9]{12}$",
    "^user_[a-z]{3,10}$",
    "^\\w{2,4}\\.\\d+$",
    "[[:upper:]]{2}[[:digit:]]{2}",
];

/// Strategy for generating one of [`SAMPLE_FORMATS`].
pub fn format_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(SAMPLE_FORMATS)
}

/// Strategy for generating bounded character-class formats like `^[A-Z0-9]{n}$`.
pub fn class_format_strategy() -> impl Strategy<Value = String> {
    (
        prop::sample::select(&["A-Z", "a-z", "0-9", "A-Z0-9", "a-zA-Z0-9-", "a-f0-9"][..]),
        1usize..16,
    )
        .prop_map(|(class, len)| format!("^[{class}]{{{len}}}$"))
}

/// Strategy for generating locale codes.
pub fn locale_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{2}(-[A-Z]{2})?").expect("Invalid regex")
}

/// Strategy for generating an ordered, duplicate-free locale list.
pub fn locales_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(locale_strategy(), 1..5).prop_map(|set| set.into_iter().collect())
}

/// Strategy for generating document IDs.
pub fn document_id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]{24}").expect("Invalid regex")
}

/// Strategy for generating strings that are not valid v4 UUIDs.
pub fn non_uuid_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9 -]{0,40}").expect("Invalid regex")
}
