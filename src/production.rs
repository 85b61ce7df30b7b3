//! The production-rule engine (§4.6): an iterative, precedence-ordered
//! rewriter over an AST slice, expressed in the same combinator algebra
//! as source parsers but run over an object source of `AstNode` items.
//! Wired up as a [`TransformerFn`] so it composes with [`crate::combinators::trans`]
//! the same way every other post-match rewrite does.

use crate::ast::{AstNode, Payload};
use crate::context::{MatchStatus, ParserContext};
use crate::error::ParseError;
use crate::kernel::{ParserFn, TransformContext, TransformerFn};
use crate::primitives::object;
use std::rc::Rc;

/// One precedence layer: an ordered list of rewrite rules and a scan
/// direction. `rtol = true` means rightmost match wins (scan positions
/// from the end of the slice backward).
#[derive(Clone)]
pub struct Precedence {
    pub rules: Vec<ParserFn<AstNode>>,
    pub rtol: bool,
}

impl Precedence {
    pub fn new(rules: Vec<ParserFn<AstNode>>) -> Self {
        Precedence { rules, rtol: false }
    }

    pub fn rtol(rules: Vec<ParserFn<AstNode>>) -> Self {
        Precedence { rules, rtol: true }
    }
}

/// Recover the plain `AstNode` an object-source primitive (`Any`,
/// `ObjClassFn`, ...) wrapped while matching over an `AstNode` slice,
/// mirroring the upstream `unwrapOperandItem` helper: without it, every
/// rule would have to downcast the wrapper itself.
fn unwrap_operand_item() -> TransformerFn {
    Rc::new(|_ctx, asts| {
        let node = asts
            .into_iter()
            .next()
            .ok_or_else(|| ParseError::new(0, "Transformer:unwrapOperandItem: empty suffix"))?;
        let position = node.source_span.position;
        let inner = object::unwrap_item::<AstNode>(&node.payload).ok_or_else(|| {
            ParseError::new(position, "Transformer:unwrapOperandItem: not an object-source item")
        })?;
        Ok(vec![inner])
    })
}

/// A rule fragment that matches (and unwraps) any single AST item,
/// regardless of class or payload.
pub fn any_operand() -> ParserFn<AstNode> {
    crate::combinators::trans(object::any::<AstNode>(), vec![unwrap_operand_item()])
}

/// A rule fragment that matches (and unwraps) a single AST item whose
/// class name is `class_name` and whose `String` payload is one of
/// `values` — the shape every worked grammar uses to recognize an
/// operator token produced earlier in the same parse.
pub fn is_operator(class_name: &'static str, values: Vec<&'static str>) -> ParserFn<AstNode> {
    let matcher = object::obj_class_fn(move |item: &AstNode| {
        item.class_name == class_name
            && matches!(&item.payload, Payload::String(s) if values.iter().any(|v| v == s))
    });
    crate::combinators::trans(matcher, vec![unwrap_operand_item()])
}

/// Run the production-rule driver over `asts`: repeatedly scan the
/// precedence layers in order, splice in the first matching rule's
/// output at the first position its layer's direction finds, and restart
/// from the highest-precedence layer. Terminates successfully once
/// `check` matches the current slice; fails with
/// [`ProductionError::Unparsed`]-equivalent message if a full pass finds
/// no rewrite and `check` still does not match.
pub fn production_rule(precedences: Vec<Precedence>, check: ParserFn<AstNode>) -> TransformerFn {
    Rc::new(move |tctx: &TransformContext, asts: Vec<AstNode>| {
        let mut asts = asts;
        'pass: loop {
            for prec in &precedences {
                let n = asts.len();
                for i in 0..=n {
                    let pos = if prec.rtol { n - i } else { i };
                    for rule in &prec.rules {
                        let mut ctx = ParserContext::from_slice(&asts);
                        ctx.tag = tctx.tag.clone();
                        ctx.position = pos;
                        let out = rule(ctx)?;
                        if out.match_status != MatchStatus::Matched {
                            continue;
                        }
                        let consumed_to = out.position;
                        let replacement = out.ast_stack;
                        let mut spliced = Vec::with_capacity(asts.len());
                        spliced.extend_from_slice(&asts[0..pos]);
                        spliced.extend(replacement);
                        spliced.extend_from_slice(&asts[consumed_to..]);
                        asts = spliced;
                        continue 'pass;
                    }
                }
            }

            let mut check_ctx = ParserContext::from_slice(&asts);
            check_ctx.tag = tctx.tag.clone();
            let checked = check(check_ctx)?;
            if checked.match_status == MatchStatus::Matched {
                return Ok(asts);
            }
            return Err(ParseError::new(tctx.position, "production rules not matched"));
        }
    })
}
