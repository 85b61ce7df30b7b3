//! `Match`/`Case` dispatch on the payload of the top-of-stack AST node
//! (§4.5a). Not named in the distilled module list, but present in the
//! source corpus (`base/match.go`) and used pervasively by production
//! rules that branch on an operand's concrete payload type — e.g.
//! distinguishing an already-reduced numeric literal from a nested list
//! while folding an RPN translation.

use crate::ast::{AnyValue, AstNode, Payload};
use crate::context::{MatchStatus, ParserContext};
use crate::kernel::{ParserFn, TransformContext, TransformerFn};
use std::fmt::Debug;
use std::rc::Rc;

/// A predicate over the AST stack, used to pick a [`Case`].
pub type CaseIf = Rc<dyn Fn(&[AstNode]) -> bool>;

/// One branch of a [`match_top`] dispatch: a predicate and the
/// transformer chain to run when it matches.
#[derive(Clone)]
pub struct Case {
    pub if_: CaseIf,
    pub let_: Vec<TransformerFn>,
}

impl Case {
    pub fn new(if_: CaseIf, let_: Vec<TransformerFn>) -> Self {
        Case { if_, let_ }
    }
}

/// Inspect the `n`-th node from the top of the AST stack and dispatch to
/// the first [`Case`] whose predicate matches, running its transformer
/// chain over the suffix starting at that node. Falls through to
/// Unmatched if no case matches.
pub fn match_top<V: Clone + PartialEq + Debug + 'static>(n: usize, cases: Vec<Case>) -> ParserFn<V> {
    Rc::new(move |mut ctx: ParserContext<'_, V>| {
        ctx.length = 0;
        ctx.match_status = MatchStatus::Unmatched;
        ctx.class_name = std::borrow::Cow::Borrowed("Match");

        if ctx.ast_stack.len() < n {
            return Ok(ctx);
        }
        let sp = ctx.ast_stack.len() - n;

        for case in &cases {
            if !(case.if_)(&ctx.ast_stack) {
                continue;
            }
            let suffix = ctx.ast_stack.split_off(sp);
            let tctx = TransformContext { position: ctx.position, tag: ctx.tag.clone() };
            let mut cur = suffix;
            for tr in &case.let_ {
                cur = tr(&tctx, cur)?;
            }
            ctx.ast_stack.extend(cur);
            ctx.match_status = MatchStatus::Matched;
            return Ok(ctx);
        }
        Ok(ctx)
    })
}

fn top_payload(asts: &[AstNode]) -> Option<&Payload> {
    asts.last().map(|n| &n.payload)
}

/// Matches when the top node's payload is `Rune` and equal to one of `v`.
pub fn top_is_rune(v: Vec<char>) -> CaseIf {
    Rc::new(move |asts| matches!(top_payload(asts), Some(Payload::Rune(c)) if v.contains(c)))
}

/// Matches when the top node's payload is `Int64` and equal to one of `v`.
pub fn top_is_int(v: Vec<i64>) -> CaseIf {
    Rc::new(move |asts| matches!(top_payload(asts), Some(Payload::Int64(n)) if v.contains(n)))
}

/// Matches when the top node's payload is `Uint64` and equal to one of `v`.
pub fn top_is_uint(v: Vec<u64>) -> CaseIf {
    Rc::new(move |asts| matches!(top_payload(asts), Some(Payload::Uint64(n)) if v.contains(n)))
}

/// Matches when the top node's payload is `Float64` and equal to one of `v`.
pub fn top_is_float(v: Vec<f64>) -> CaseIf {
    Rc::new(move |asts| matches!(top_payload(asts), Some(Payload::Float64(n)) if v.contains(n)))
}

/// Matches when the top node's payload is `Bool` and equal to one of `v`.
pub fn top_is_bool(v: Vec<bool>) -> CaseIf {
    Rc::new(move |asts| matches!(top_payload(asts), Some(Payload::Bool(b)) if v.contains(b)))
}

/// Matches when the top node's payload is `String` and equal to one of `v`.
pub fn top_is_str(v: Vec<String>) -> CaseIf {
    Rc::new(move |asts| matches!(top_payload(asts), Some(Payload::String(s)) if v.contains(s)))
}

/// Matches when the top node's payload equals one of `v` (structural
/// equality, any payload shape).
pub fn top_is(v: Vec<Payload>) -> CaseIf {
    Rc::new(move |asts| top_payload(asts).map_or(false, |p| v.iter().any(|w| w == p)))
}

/// Matches when the top node's `Any`/`Function` payload downcasts to `T`
/// and equals one of `v`.
pub fn top_is_any<T: Debug + PartialEq + Clone + 'static>(v: Vec<T>) -> CaseIf {
    Rc::new(move |asts| {
        let value: Option<&AnyValue> = match top_payload(asts) {
            Some(Payload::Any(a)) | Some(Payload::Function(a)) => Some(a),
            _ => None,
        };
        value
            .and_then(|a| a.downcast_ref::<T>())
            .map_or(false, |found| v.iter().any(|w| w == found))
    })
}

/// Always matches; the catch-all case.
pub fn top_is_any_always() -> CaseIf {
    Rc::new(|_asts| true)
}

#[cfg(test)]
mod __tests__ {
    use super::*;
    use crate::context::ParserContext;

    #[test]
    fn dispatches_to_first_matching_case() {
        let cases = vec![
            Case::new(top_is_int(vec![1, 2]), vec![crate::transformers::change_class_name("small")]),
            Case::new(top_is_any_always(), vec![crate::transformers::change_class_name("other")]),
        ];
        let p = match_top::<()>(1, cases);
        let mut ctx = ParserContext::from_str("");
        ctx.ast_stack.push(AstNode::new("X", Payload::Int64(1), 0, 0));
        let result = p(ctx).unwrap();
        assert_eq!(result.match_status, MatchStatus::Matched);
        assert_eq!(result.ast_stack[0].class_name, "small");
    }

    #[test]
    fn falls_through_to_unmatched_with_no_case() {
        let p = match_top::<()>(1, vec![Case::new(top_is_int(vec![99]), vec![])]);
        let mut ctx = ParserContext::from_str("");
        ctx.ast_stack.push(AstNode::new("X", Payload::Int64(1), 0, 0));
        let result = p(ctx).unwrap();
        assert_eq!(result.match_status, MatchStatus::Unmatched);
    }
}
