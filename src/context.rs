use crate::ast::{AnyValue, AstNode};
use std::borrow::Cow;
use std::fmt::Debug;

/// Outcome of a single parser invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Matched,
    Unmatched,
    Error,
}

/// `min`/`max` repetition bound. `max < 0` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Times {
    pub min: i64,
    pub max: i64,
}

impl Times {
    pub const fn new(min: i64, max: i64) -> Self {
        Times { min, max }
    }

    pub const ONCE: Times = Times::new(1, 1);
    pub const ZERO_OR_ONCE: Times = Times::new(0, 1);
    pub const ZERO_OR_MORE: Times = Times::new(0, -1);
    pub const ONE_OR_MORE: Times = Times::new(1, -1);

    pub fn is_unbounded(&self) -> bool {
        self.max < 0
    }
}

/// The uniform view a combinator is run over: either a byte-indexed Unicode
/// string, or a generic item-indexed sequence. Kept as a two-variant enum
/// rather than a dynamic-dispatch `SliceLike` trait object (as the Go
/// source has it) since both concrete shapes are known at compile time and
/// Rust slicing plus `V: PartialEq` already supply reslice/copy/equality
/// for free.
#[derive(Debug, Clone, Copy)]
pub enum Source<'s, V> {
    Str(&'s str),
    Slice(&'s [V]),
}

impl<'s, V> Source<'s, V> {
    /// Length in bytes (string source) or items (slice source).
    pub fn len(&self) -> usize {
        match self {
            Source::Str(s) => s.len(),
            Source::Slice(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_str(&self) -> &'s str {
        match self {
            Source::Str(s) => s,
            Source::Slice(_) => panic!("source is not a string source"),
        }
    }

    pub fn as_slice(&self) -> &'s [V] {
        match self {
            Source::Slice(s) => s,
            Source::Str(_) => panic!("source is not a slice source"),
        }
    }
}

/// A `Copy`-able record of the mutable fields a combinator must roll back
/// to on an unmatched branch. Rollback is truncation of `ast_stack` back to
/// `ast_len`, never a deep copy of the stack itself.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    pub position: usize,
    pub length: usize,
    pub quantity: i64,
    pub ast_len: usize,
}

/// The cursor, AST stack, match status and user tag threaded through every
/// parser invocation. A context is a plain value: parsers take one by
/// value and return a new one: there is no suspension or shared mutable
/// state across concurrent parses.
#[derive(Debug, Clone)]
pub struct ParserContext<'s, V> {
    pub source: Source<'s, V>,
    pub position: usize,
    pub length: usize,
    pub quantity: i64,
    pub ast_stack: Vec<AstNode>,
    pub match_status: MatchStatus,
    pub class_name: Cow<'static, str>,
    pub tag: Option<AnyValue>,
}

impl<'s, V: Clone + PartialEq + Debug> ParserContext<'s, V> {
    fn fresh(source: Source<'s, V>, tag: Option<AnyValue>) -> Self {
        ParserContext {
            source,
            position: 0,
            length: 0,
            quantity: 0,
            ast_stack: Vec::with_capacity(1024),
            match_status: MatchStatus::Unmatched,
            class_name: Cow::Borrowed(""),
            tag,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            position: self.position,
            length: self.length,
            quantity: self.quantity,
            ast_len: self.ast_stack.len(),
        }
    }

    /// Restore the mutable cursor fields and truncate `ast_stack` back to
    /// the saved baseline. O(items truncated), never a deep copy.
    pub fn restore(&mut self, snap: Snapshot) {
        self.position = snap.position;
        self.length = snap.length;
        self.quantity = snap.quantity;
        self.ast_stack.truncate(snap.ast_len);
    }

    /// The AST suffix produced since `baseline`, the unit transformers
    /// operate on.
    pub fn suffix(&self, baseline: usize) -> &[AstNode] {
        &self.ast_stack[baseline..]
    }

}

impl<'s> ParserContext<'s, ()> {
    pub fn from_str(s: &'s str) -> Self {
        ParserContext::fresh(Source::Str(s), None)
    }

    pub fn from_str_with_tag(s: &'s str, tag: AnyValue) -> Self {
        ParserContext::fresh(Source::Str(s), Some(tag))
    }
}

impl<'s, V: Clone + PartialEq + Debug> ParserContext<'s, V> {
    pub fn from_slice(slice: &'s [V]) -> Self {
        ParserContext::fresh(Source::Slice(slice), None)
    }

    pub fn from_slice_with_tag(slice: &'s [V], tag: AnyValue) -> Self {
        ParserContext::fresh(Source::Slice(slice), Some(tag))
    }
}
