//! The single driver every non-primitive combinator delegates to. Every
//! combinator in [`crate::combinators`] is, underneath, one [`KernelSpec`]
//! plus a wrapping closure.

use crate::ast::AstNode;
use crate::context::{ParserContext, Times};
use crate::error::ParseError;
use std::fmt::Debug;
use std::rc::Rc;

pub type ParserFn<V> = Rc<dyn for<'s> Fn(ParserContext<'s, V>) -> Result<ParserContext<'s, V>, ParseError>>;

/// Minimal, lifetime-free view a transformer needs: the position the
/// owning combinator ended at, and the user tag. Transformers never see
/// the source itself, only the AST suffix handed to them.
pub struct TransformContext {
    pub position: usize,
    pub tag: Option<crate::ast::AnyValue>,
}

pub type TransformerFn = Rc<dyn Fn(&TransformContext, Vec<AstNode>) -> Result<Vec<AstNode>, ParseError>>;

/// Outcome of a hook invoked after a successful kernel iteration; lets a
/// combinator downgrade a structurally-successful iteration to Unmatched
/// or Error after inspecting what it produced.
pub enum HookOutcome {
    Keep,
    Unmatched,
    Error(String),
}

pub type HookFn = Rc<dyn Fn(usize, &[AstNode]) -> HookOutcome>;

pub struct KernelSpec<V> {
    pub class_name: &'static str,
    pub times: Times,
    pub negative: bool,
    pub there_exists: bool,
    pub rewind: bool,
    pub children: Vec<ParserFn<V>>,
    pub transformers: Vec<TransformerFn>,
    pub hook: Option<HookFn>,
}

impl<V> KernelSpec<V> {
    pub fn new(class_name: &'static str, children: Vec<ParserFn<V>>) -> Self {
        KernelSpec {
            class_name,
            times: Times::ONCE,
            negative: false,
            there_exists: false,
            rewind: false,
            children,
            transformers: Vec::new(),
            hook: None,
        }
    }
}

enum IterOutcome<'s, V> {
    Matched(ParserContext<'s, V>),
    Unmatched(ParserContext<'s, V>),
}

fn run_conjunctive<'s, V: Clone + PartialEq + Debug>(
    children: &[ParserFn<V>],
    mut ctx: ParserContext<'s, V>,
) -> Result<IterOutcome<'s, V>, ParseError> {
    for child in children {
        ctx = child(ctx)?;
        if ctx.match_status == crate::context::MatchStatus::Unmatched {
            return Ok(IterOutcome::Unmatched(ctx));
        }
    }
    Ok(IterOutcome::Matched(ctx))
}

fn run_disjunctive<'s, V: Clone + PartialEq + Debug>(
    children: &[ParserFn<V>],
    ctx: ParserContext<'s, V>,
) -> Result<IterOutcome<'s, V>, ParseError> {
    let mut cur = ctx;
    for child in children {
        cur = child(cur)?;
        if cur.match_status == crate::context::MatchStatus::Matched {
            return Ok(IterOutcome::Matched(cur));
        }
        // A child reporting Unmatched must have already restored itself
        // (backtracking transparency); try the next alternative from the
        // same state.
    }
    Ok(IterOutcome::Unmatched(cur))
}

/// Run `spec` against `ctx`. Implements the full kernel contract: bounded
/// repetition, conjunctive/disjunctive child dispatch, an optional
/// post-iteration hook, negation, transformer application over the
/// produced suffix, and rewind.
pub fn kernel<'s, V: Clone + PartialEq + Debug>(
    spec: &KernelSpec<V>,
    ctx0: ParserContext<'s, V>,
) -> Result<ParserContext<'s, V>, ParseError> {
    let entry = ctx0.snapshot();
    let ast_baseline = entry.ast_len;
    let mut ctx = ctx0;

    let mut iterations: i64 = 0;
    loop {
        if spec.times.max >= 0 && iterations >= spec.times.max {
            break;
        }
        let saved = ctx.snapshot();
        let outcome = if spec.there_exists {
            run_disjunctive(&spec.children, ctx)?
        } else {
            run_conjunctive(&spec.children, ctx)?
        };
        match outcome {
            IterOutcome::Matched(mut matched_ctx) => {
                if let Some(hook) = &spec.hook {
                    match hook(
                        (iterations + 1) as usize,
                        &matched_ctx.ast_stack[ast_baseline..],
                    ) {
                        HookOutcome::Keep => {}
                        HookOutcome::Unmatched => {
                            matched_ctx.restore(saved);
                            matched_ctx.match_status = crate::context::MatchStatus::Unmatched;
                            ctx = matched_ctx;
                            break;
                        }
                        HookOutcome::Error(message) => {
                            return Err(ParseError::new(matched_ctx.position, message));
                        }
                    }
                }
                ctx = matched_ctx;
                iterations += 1;
            }
            IterOutcome::Unmatched(mut unmatched_ctx) => {
                unmatched_ctx.restore(saved);
                ctx = unmatched_ctx;
                break;
            }
        }
    }

    if iterations < spec.times.min {
        ctx.restore(entry);
        ctx.match_status = crate::context::MatchStatus::Unmatched;
    } else {
        ctx.match_status = crate::context::MatchStatus::Matched;
    }

    if spec.negative {
        match ctx.match_status {
            crate::context::MatchStatus::Matched => {
                ctx.restore(entry);
                ctx.match_status = crate::context::MatchStatus::Unmatched;
            }
            crate::context::MatchStatus::Unmatched => {
                ctx.restore(entry);
                ctx.match_status = crate::context::MatchStatus::Matched;
                ctx.length = 0;
            }
            crate::context::MatchStatus::Error => {}
        }
    }

    if ctx.match_status == crate::context::MatchStatus::Matched && !spec.transformers.is_empty() {
        let suffix = ctx.ast_stack.split_off(ast_baseline);
        let tctx = TransformContext {
            position: ctx.position,
            tag: ctx.tag.clone(),
        };
        let mut cur = suffix;
        for tr in &spec.transformers {
            cur = tr(&tctx, cur)?;
        }
        ctx.ast_stack.extend(cur);
    }

    if spec.rewind {
        ctx.position = entry.position;
        ctx.length = 0;
    }

    ctx.class_name = std::borrow::Cow::Borrowed(spec.class_name);
    Ok(ctx)
}
