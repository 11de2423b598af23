//! Generator program compiled from a parsed regular expression.
//!
//! The regex syntax tree is lowered into a small [`Node`] tree that can be
//! sampled repeatedly without re-parsing. Zero-width assertions (anchors,
//! word boundaries) produce nothing.

use crate::error::{FormatError, FormatResult};
use rand::Rng;
use regex_syntax::hir::{Class, Hir, HirKind};

/// Extra repetitions allowed for unbounded quantifiers (`*`, `+`, `{n,}`).
pub const MAX_UNBOUNDED_EXTRA: u32 = 8;

const PRINTABLE_START: u32 = 0x20;
const PRINTABLE_END: u32 = 0x7E;
const SURROGATE_START: u32 = 0xD800;
const SURROGATE_END: u32 = 0xDFFF;

/// A set of code points sampled uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharSet {
    ranges: Vec<(u32, u32)>,
    total: u32,
}

impl CharSet {
    /// Builds a set from inclusive code point ranges.
    ///
    /// Surrogate code points are removed. Returns `None` if nothing remains.
    fn new(ranges: impl IntoIterator<Item = (u32, u32)>) -> Option<Self> {
        let mut clean = Vec::new();
        for (start, end) in ranges {
            if end < SURROGATE_START || start > SURROGATE_END {
                clean.push((start, end));
                continue;
            }
            if start < SURROGATE_START {
                clean.push((start, SURROGATE_START - 1));
            }
            if end > SURROGATE_END {
                clean.push((SURROGATE_END + 1, end));
            }
        }

        let total = clean.iter().map(|(s, e)| e - s + 1).sum::<u32>();
        if total == 0 {
            None
        } else {
            Some(Self {
                ranges: clean,
                total,
            })
        }
    }

    /// Builds a set from ranges, preferring their printable ASCII subset.
    fn preferring_printable(ranges: Vec<(u32, u32)>) -> Option<Self> {
        let printable: Vec<(u32, u32)> = ranges
            .iter()
            .filter_map(|&(s, e)| {
                let s = s.max(PRINTABLE_START);
                let e = e.min(PRINTABLE_END);
                (s <= e).then_some((s, e))
            })
            .collect();

        if printable.is_empty() {
            Self::new(ranges)
        } else {
            Self::new(printable)
        }
    }

    /// Number of code points in the set.
    pub fn len(&self) -> u32 {
        self.total
    }

    /// Returns true if the set holds no code point.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Returns true if the set contains `c`.
    pub fn contains(&self, c: char) -> bool {
        let c = c as u32;
        self.ranges.iter().any(|&(s, e)| s <= c && c <= e)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        let mut n = rng.gen_range(0..self.total);
        for &(start, end) in &self.ranges {
            let len = end - start + 1;
            if n < len {
                return char::from_u32(start + n).unwrap_or(char::REPLACEMENT_CHARACTER);
            }
            n -= len;
        }
        char::REPLACEMENT_CHARACTER
    }
}

/// One node of a generator program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Produces nothing.
    Empty,
    /// Produces fixed text.
    Literal(String),
    /// Produces one character from the set.
    Class(CharSet),
    /// Produces `min..=max` repetitions of the inner node.
    Repeat {
        /// Minimum repetitions.
        min: u32,
        /// Maximum repetitions.
        max: u32,
        /// Repeated node.
        node: Box<Node>,
    },
    /// Produces each node in order.
    Concat(Vec<Node>),
    /// Produces one randomly chosen branch.
    Alternation(Vec<Node>),
}

impl Node {
    /// Appends a random production of this node to `out`.
    pub fn emit<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut String) {
        match self {
            Node::Empty => {}
            Node::Literal(text) => out.push_str(text),
            Node::Class(set) => out.push(set.sample(rng)),
            Node::Repeat { min, max, node } => {
                let count = rng.gen_range(*min..=*max);
                for _ in 0..count {
                    node.emit(rng, out);
                }
            }
            Node::Concat(nodes) => {
                for node in nodes {
                    node.emit(rng, out);
                }
            }
            Node::Alternation(branches) => {
                let idx = rng.gen_range(0..branches.len());
                branches[idx].emit(rng, out);
            }
        }
    }
}

/// Parses `pattern` and lowers it into a generator program.
pub fn compile(pattern: &str) -> FormatResult<Node> {
    let hir = regex_syntax::ParserBuilder::new()
        .build()
        .parse(pattern)
        .map_err(|e| FormatError::invalid_pattern(pattern, e))?;

    lower(&hir).ok_or_else(|| FormatError::unsatisfiable(pattern))
}

/// Lowers a syntax tree node. `None` means the node can never match.
fn lower(hir: &Hir) -> Option<Node> {
    match hir.kind() {
        HirKind::Empty | HirKind::Look(_) => Some(Node::Empty),
        HirKind::Literal(lit) => Some(Node::Literal(
            String::from_utf8_lossy(&lit.0).into_owned(),
        )),
        HirKind::Class(Class::Unicode(cls)) => {
            let ranges = cls
                .ranges()
                .iter()
                .map(|r| (r.start() as u32, r.end() as u32))
                .collect();
            CharSet::preferring_printable(ranges).map(Node::Class)
        }
        HirKind::Class(Class::Bytes(cls)) => {
            // Only the ASCII half of a byte class maps onto characters.
            let ranges = cls
                .ranges()
                .iter()
                .filter(|r| r.start() < 0x80)
                .map(|r| (u32::from(r.start()), u32::from(r.end().min(0x7F))))
                .collect();
            CharSet::preferring_printable(ranges).map(Node::Class)
        }
        HirKind::Repetition(rep) => {
            let max = rep
                .max
                .unwrap_or_else(|| rep.min.saturating_add(MAX_UNBOUNDED_EXTRA));
            match lower(&rep.sub) {
                Some(node) => Some(Node::Repeat {
                    min: rep.min,
                    max,
                    node: Box::new(node),
                }),
                None if rep.min == 0 => Some(Node::Empty),
                None => None,
            }
        }
        HirKind::Capture(cap) => lower(&cap.sub),
        HirKind::Concat(subs) => subs
            .iter()
            .map(lower)
            .collect::<Option<Vec<_>>>()
            .map(Node::Concat),
        HirKind::Alternation(subs) => {
            let branches: Vec<Node> = subs.iter().filter_map(lower).collect();
            if branches.is_empty() {
                None
            } else {
                Some(Node::Alternation(branches))
            }
        }
    }
}
