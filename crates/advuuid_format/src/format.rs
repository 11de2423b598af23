//! Compiled identifier formats.

use crate::error::{FormatError, FormatResult};
use crate::program::{self, Node};
use rand::Rng;
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::sync::OnceLock;
use uuid::Builder;

/// Canonical v4 UUID syntax: 8-4-4-4-12 hex, version nibble 4, RFC 4122 variant.
pub const UUID_V4_PATTERN: &str =
    "[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}";

fn uuid_v4_matcher() -> &'static Regex {
    static MATCHER: OnceLock<Regex> = OnceLock::new();
    MATCHER.get_or_init(|| anchored(UUID_V4_PATTERN).expect("UUID_V4_PATTERN is valid"))
}

fn anchored(body: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!("^(?:{body})$"))
        .case_insensitive(true)
        .build()
}

/// A compiled identifier format.
///
/// A format either wraps a user-supplied regex body or falls back to
/// standard v4 UUID syntax when no body is configured. Compiling once and
/// reusing the result avoids re-parsing the pattern for every value.
///
/// # Example
///
/// ```
/// use advuuid_format::Format;
///
/// let format = Format::parse("[A-Z]{3}-[0-9]{4}").unwrap();
/// let value = format.generate();
/// assert!(format.is_match(&value));
/// assert!(format.is_match("abc-1234")); // validation ignores case
/// ```
#[derive(Clone)]
pub struct Format {
    body: Option<String>,
    program: Option<Node>,
    matcher: Regex,
}

impl Format {
    /// Compiles a regex body. An empty body yields [`Format::uuid_v4`].
    pub fn parse(body: &str) -> FormatResult<Self> {
        if body.is_empty() {
            return Ok(Self::uuid_v4());
        }

        let program = program::compile(body)?;
        let matcher = anchored(body).map_err(|e| FormatError::invalid_pattern(body, e))?;

        Ok(Self {
            body: Some(body.to_string()),
            program: Some(program),
            matcher,
        })
    }

    /// Compiles an optional regex body, treating `None` as empty.
    pub fn parse_optional(body: Option<&str>) -> FormatResult<Self> {
        Self::parse(body.unwrap_or_default())
    }

    /// The standard v4 UUID format.
    #[must_use]
    pub fn uuid_v4() -> Self {
        Self {
            body: None,
            program: None,
            matcher: uuid_v4_matcher().clone(),
        }
    }

    /// Returns the configured regex body, or `None` for the UUID fallback.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Returns true if this is the v4 UUID fallback.
    pub fn is_uuid_v4(&self) -> bool {
        self.program.is_none()
    }

    /// Generates a random value using the thread-local RNG.
    pub fn generate(&self) -> String {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generates a random value from the given RNG.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        match &self.program {
            Some(node) => {
                let mut out = String::new();
                node.emit(rng, &mut out);
                out
            }
            None => {
                let bytes: [u8; 16] = rng.gen();
                Builder::from_random_bytes(bytes)
                    .into_uuid()
                    .hyphenated()
                    .to_string()
            }
        }
    }

    /// Checks `value` against the anchored, case-insensitive format.
    ///
    /// Empty values never match.
    pub fn is_match(&self, value: &str) -> bool {
        !value.is_empty() && self.matcher.is_match(value)
    }
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Some(body) => write!(f, "Format({body:?})"),
            None => write!(f, "Format(uuid-v4)"),
        }
    }
}

impl PartialEq for Format {
    fn eq(&self, other: &Self) -> bool {
        self.body == other.body
    }
}

impl Eq for Format {}
