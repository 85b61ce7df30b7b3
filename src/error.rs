use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

/// A grammar-construction-time misuse: an empty `First`/`FlatGroup`, a
/// quantifier with `max < min` and `max >= 0`, etc. Raised while building a
/// parser tree, never while running one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplementationError {
    pub message: String,
    pub what: String,
}

impl ImplementationError {
    pub fn new(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            message: message.into(),
        }
    }
}

impl Display for ImplementationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ImplementationError: {}-{}", self.what, self.message)
    }
}

impl StdError for ImplementationError {}

/// A failure raised by the production-rule driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductionError {
    /// A full pass produced no rewrite and `check` still did not match.
    Unparsed,
    /// `check` never matched but rewriting reached a byte/item position
    /// that the caller's own validator rejected with a message.
    Validation(usize, String),
}

impl ProductionError {
    pub fn is_unparsed(&self) -> bool {
        matches!(self, ProductionError::Unparsed)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ProductionError::Validation(_, _))
    }
}

impl Display for ProductionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ProductionError::Unparsed => write!(f, "production rules not matched"),
            ProductionError::Validation(pos, message) => {
                write!(f, "production rule validation failed at {}: {}", pos, message)
            }
        }
    }
}

impl StdError for ProductionError {}

/// A parse-time `Error` outcome: fatal, carries the byte/item offset where
/// it was raised. Rendered with [`crate::position`] at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub pointer: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(pointer: usize, message: impl Into<String>) -> Self {
        Self {
            pointer,
            message: message.into(),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "SyntaxError: {}", self.message)
    }
}

impl StdError for ParseError {}
