//! Leaf parsers over a generic item-indexed sequence (§4.3): a mirror of
//! the string primitives, delegating equality to `V: PartialEq`.

use super::common::leaf;
use crate::ast::{AnyValue, AstNode, Payload};
use crate::kernel::ParserFn;
use std::fmt::Debug;

/// Assertion that always matches, consuming one item.
pub fn any<V: Clone + PartialEq + Debug + 'static>() -> ParserFn<V> {
    leaf("Any", |ctx| {
        let slice = ctx.source.as_slice();
        if let Some(item) = slice.get(ctx.position) {
            ctx.ast_stack.push(AstNode::new(
                "Any",
                Payload::Any(AnyValue::new(DebugItem(item.clone()))),
                ctx.position,
                1,
            ));
            ctx.position += 1;
            ctx.length = 1;
            ctx.match_status = crate::context::MatchStatus::Matched;
        }
    })
}

/// Zero-width assertion at the end of the source.
pub fn end<V: Clone + PartialEq + Debug + 'static>() -> ParserFn<V> {
    leaf("End", |ctx| {
        if ctx.position == ctx.source.len() {
            ctx.match_status = crate::context::MatchStatus::Matched;
        }
    })
}

/// Assertion that matches a sequence of values. Gated on genuine
/// element-wise equality: the upstream Go `Seq` breaks its comparison
/// loop on the first mismatch but never uses the comparison result to
/// gate the match, so it always reports Matched regardless of content.
/// That is a latent bug, not one of the three explicitly-preserved
/// ambiguities, so this rewrite requires every element to compare equal.
pub fn seq<V: Clone + PartialEq + Debug + 'static>(values: Vec<V>) -> ParserFn<V> {
    leaf("Seq", move |ctx| {
        let slice = ctx.source.as_slice();
        let len = values.len();
        if ctx.position + len <= slice.len() {
            let window = &slice[ctx.position..ctx.position + len];
            if window == values.as_slice() {
                ctx.ast_stack.push(AstNode::new(
                    "Seq",
                    Payload::ListOfAny(
                        window
                            .iter()
                            .map(|v| AnyValue::new(DebugItem(v.clone())))
                            .collect(),
                    ),
                    ctx.position,
                    len,
                ));
                ctx.position += len;
                ctx.length = len;
                ctx.match_status = crate::context::MatchStatus::Matched;
            }
        }
    })
}

/// Assertion that matches if the next item belongs to a set of values.
pub fn obj_class<V: Clone + PartialEq + Debug + 'static>(set: Vec<V>) -> ParserFn<V> {
    leaf("ObjClass", move |ctx| {
        let slice = ctx.source.as_slice();
        if let Some(item) = slice.get(ctx.position) {
            if set.iter().any(|candidate| candidate == item) {
                ctx.ast_stack.push(AstNode::new(
                    "ObjClass",
                    Payload::Any(AnyValue::new(DebugItem(item.clone()))),
                    ctx.position,
                    1,
                ));
                ctx.position += 1;
                ctx.length = 1;
                ctx.match_status = crate::context::MatchStatus::Matched;
            }
        }
    })
}

/// Assertion that matches if the next item belongs to no set of values.
pub fn obj_class_n<V: Clone + PartialEq + Debug + 'static>(set: Vec<V>) -> ParserFn<V> {
    leaf("ObjClassN", move |ctx| {
        let slice = ctx.source.as_slice();
        if let Some(item) = slice.get(ctx.position) {
            if !set.iter().any(|candidate| candidate == item) {
                ctx.ast_stack.push(AstNode::new(
                    "ObjClassN",
                    Payload::Any(AnyValue::new(DebugItem(item.clone()))),
                    ctx.position,
                    1,
                ));
                ctx.position += 1;
                ctx.length = 1;
                ctx.match_status = crate::context::MatchStatus::Matched;
            }
        }
    })
}

/// Assertion that matches if the next item satisfies a predicate.
pub fn obj_class_fn<V: Clone + PartialEq + Debug + 'static>(
    pred: impl Fn(&V) -> bool + 'static,
) -> ParserFn<V> {
    leaf("ObjClassFn", move |ctx| {
        let slice = ctx.source.as_slice();
        if let Some(item) = slice.get(ctx.position) {
            if pred(item) {
                ctx.ast_stack.push(AstNode::new(
                    "ObjClassFn",
                    Payload::Any(AnyValue::new(DebugItem(item.clone()))),
                    ctx.position,
                    1,
                ));
                ctx.position += 1;
                ctx.length = 1;
                ctx.match_status = crate::context::MatchStatus::Matched;
            }
        }
    })
}

/// Wraps an arbitrary `V` so it can live behind [`AnyValue`]'s
/// `Debug + PartialEq` erasure bound.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DebugItem<V>(pub(crate) V);

/// Recover the original `V` pushed by [`any`]/[`obj_class`]/[`seq`]/etc.
/// from the `Any`-payload wrapper node they produce. Used by
/// [`crate::production`] to unwrap an `AstNode` item back out of the
/// object-source wrapper the production engine's own primitives push it
/// into, mirroring the upstream `unwrapOperandItem` helper.
pub fn unwrap_item<V: Clone + Debug + PartialEq + 'static>(payload: &Payload) -> Option<V> {
    match payload {
        Payload::Any(a) => a.downcast_ref::<DebugItem<V>>().map(|d| d.0.clone()),
        _ => None,
    }
}
