//! `pegcomb` is the core of a parser combinator engine that operates over
//! heterogeneous input sequences — Unicode strings and arbitrary value
//! lists — and produces a shared, flat abstract-syntax representation
//! ([`AstNode`]).
//!
//! The library's value is not any single grammar it ships; it is the
//! combinator algebra, the backtracking contract, the AST-stack
//! discipline, and a post-parse production-rule rewriter that applies
//! precedence-ordered tree transformations to the resulting token stream.
//!
//! # Architecture
//!
//! Parsing is a two-stage pipeline:
//!
//! 1. **Combinator parsing** ([`kernel`], [`combinators`], [`primitives`])
//!    lowers source into a flat [`AstNode`] stack, via a
//!    [`context::ParserContext`] threaded through a tree of parsers built
//!    from one reusable driver ([`kernel::kernel`]).
//! 2. **Production-rule rewriting** ([`production`]) folds that flat
//!    stream into a tree, under explicit, precedence-layered rewrite
//!    rules — used for anything a context-free grammar alone can't
//!    express cleanly, like operator precedence.
//!
//! [`transformers`] are the AST-slice rewriters both stages apply
//! post-match; [`match_case`] adds `Match`/`Case` dispatch on an operand's
//! concrete payload type, which most non-trivial production rules need.
//! [`position`] renders source positions and error guides at the API
//! boundary; [`tracer`] is an optional, explicitly-threaded debug hook.
//! [`extra`] composes numeric-literal and ISO-8601-shaped parsers from the
//! primitives, as worked examples of the algebra rather than a grammar
//! this crate ships.
//!
//! # Example
//!
//! ```
//! use pegcomb::combinators::{first, flat_group, one_or_more_times, trans};
//! use pegcomb::context::{MatchStatus, ParserContext};
//! use pegcomb::primitives::string::{number, seq};
//! use pegcomb::transformers::{concat, parse_int};
//!
//! let digits = one_or_more_times(vec![number()]).unwrap();
//! let literal = trans(digits, vec![concat(), parse_int()]);
//! let plus_or_minus = first(vec![seq("+"), seq("-")]).unwrap();
//! let sum = flat_group(vec![literal.clone(), plus_or_minus, literal]).unwrap();
//!
//! let ctx = ParserContext::from_str("12+7");
//! let out = sum(ctx).unwrap();
//! assert_eq!(out.match_status, MatchStatus::Matched);
//! assert_eq!(out.position, 4);
//! ```

pub mod ast;
pub mod combinators;
pub mod context;
pub mod error;
pub mod extra;
pub mod kernel;
pub mod logger;
pub mod match_case;
pub mod position;
pub mod primitives;
pub mod production;
pub mod tracer;
pub mod transformers;

use crate::ast::AstNode;
use crate::context::{MatchStatus, ParserContext};
use crate::kernel::ParserFn;

/// Run `root` over the entirety of `input`, requiring it to consume every
/// byte. On success returns the AST stack `root` produced. On failure —
/// a parser `Error`, an unmatched root, or unconsumed trailing input —
/// returns a human-readable message with a source-position guide (§4.7),
/// the crate's top-level user-visible failure surface.
pub fn parse_str(root: ParserFn<()>, input: &str) -> Result<Vec<AstNode>, String> {
    let ctx = ParserContext::from_str(input);
    match root(ctx) {
        Ok(out) if out.match_status == MatchStatus::Matched && out.position == input.len() => {
            Ok(out.ast_stack)
        }
        Ok(out) if out.match_status == MatchStatus::Matched => Err(format!(
            "SyntaxError: unexpected trailing input\n{}",
            position::describe(input, out.position, 4)
        )),
        Ok(out) => Err(format!(
            "SyntaxError: input did not match\n{}",
            position::describe(input, out.position, 4)
        )),
        Err(err) => Err(format!(
            "SyntaxError: {}\n{}",
            err.message,
            position::describe(input, err.pointer, 4)
        )),
    }
}
