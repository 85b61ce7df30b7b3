//! Named wrappers around [`crate::kernel`] (§4.4): every combinator below
//! is one [`KernelSpec`] plus, where the shape can be misused at
//! construction time (an empty alternation, a backwards quantifier), a
//! validation check raising [`ImplementationError`] instead of silently
//! building a parser that can never match.

use crate::ast::AstNode;
use crate::context::{MatchStatus, ParserContext, Times};
use crate::error::ImplementationError;
use crate::kernel::{kernel, KernelSpec, ParserFn, TransformerFn};
use once_cell::unsync::OnceCell;
use std::fmt::Debug;
use std::rc::Rc;

fn require_children<V>(what: &'static str, children: &[ParserFn<V>]) -> Result<(), ImplementationError> {
    if children.is_empty() {
        Err(ImplementationError::new(what, "at least one child parser is required"))
    } else {
        Ok(())
    }
}

/// Defers construction of a child parser until first use, enabling
/// recursive grammars. The factory runs at most once, memoized in a
/// `OnceCell`: a one-time, non-idempotent build, matching §5's
/// non-reentrant-construction/safe-execution split.
pub fn indirect<V: Clone + PartialEq + Debug + 'static>(
    factory: impl Fn() -> ParserFn<V> + 'static,
) -> ParserFn<V> {
    let cell: Rc<OnceCell<ParserFn<V>>> = Rc::new(OnceCell::new());
    Rc::new(move |ctx: ParserContext<'_, V>| {
        let parser = cell.get_or_init(|| factory());
        parser(ctx)
    })
}

/// Zero-width assertion; always fails with `message`.
pub fn error<V: Clone + PartialEq + Debug + 'static>(message: impl Into<String> + 'static) -> ParserFn<V> {
    Rc::new(move |mut ctx: ParserContext<'_, V>| {
        ctx.length = 0;
        ctx.match_status = MatchStatus::Error;
        Err(crate::error::ParseError::new(ctx.position, message.into()))
    })
}

/// Zero-width assertion; always Unmatched.
pub fn unmatched<V: Clone + PartialEq + Debug + 'static>() -> ParserFn<V> {
    Rc::new(|mut ctx: ParserContext<'_, V>| {
        ctx.length = 0;
        ctx.match_status = MatchStatus::Unmatched;
        Ok(ctx)
    })
}

/// Zero-width assertion; always Matched, injecting the given literal
/// nodes (with their span rewritten to the current position).
pub fn zero<V: Clone + PartialEq + Debug + 'static>(nodes: Vec<AstNode>) -> ParserFn<V> {
    Rc::new(move |mut ctx: ParserContext<'_, V>| {
        let position = ctx.position;
        for mut node in nodes.clone() {
            node.source_span.position = position;
            ctx.ast_stack.push(node);
        }
        ctx.length = 0;
        ctx.match_status = MatchStatus::Matched;
        Ok(ctx)
    })
}

/// Conjunctive sequencing; children's AST suffixes are concatenated flat
/// (no grouping transformer).
pub fn flat_group<V: Clone + PartialEq + Debug + 'static>(
    children: Vec<ParserFn<V>>,
) -> Result<ParserFn<V>, ImplementationError> {
    require_children("FlatGroup", &children)?;
    Ok(build(KernelSpec::new("FlatGroup", children)))
}

/// Same as [`flat_group`], but the produced suffix is wrapped into a
/// single `ListOfAst` node by the grouping transformer.
pub fn group<V: Clone + PartialEq + Debug + 'static>(
    children: Vec<ParserFn<V>>,
) -> Result<ParserFn<V>, ImplementationError> {
    require_children("Group", &children)?;
    let mut spec = KernelSpec::new("Group", children);
    spec.transformers = vec![crate::transformers::grouping_transform()];
    Ok(build(spec))
}

/// Ordered alternation (PEG `/`): the leftmost matching child commits,
/// even if a later child would consume more.
pub fn first<V: Clone + PartialEq + Debug + 'static>(
    children: Vec<ParserFn<V>>,
) -> Result<ParserFn<V>, ImplementationError> {
    require_children("First", &children)?;
    let mut spec = KernelSpec::new("First", children);
    spec.there_exists = true;
    Ok(build(spec))
}

/// Bounded repetition `{min,max}` (`max < 0` is unbounded) over a
/// conjunctive sequence of children.
pub fn repeat<V: Clone + PartialEq + Debug + 'static>(
    times: Times,
    children: Vec<ParserFn<V>>,
) -> Result<ParserFn<V>, ImplementationError> {
    require_children("Repeat", &children)?;
    if times.max >= 0 && times.max < times.min {
        return Err(ImplementationError::new(
            "Repeat",
            "max must not be less than min unless unbounded",
        ));
    }
    let mut spec = KernelSpec::new("Repeat", children);
    spec.times = times;
    Ok(build(spec))
}

pub fn once<V: Clone + PartialEq + Debug + 'static>(
    children: Vec<ParserFn<V>>,
) -> Result<ParserFn<V>, ImplementationError> {
    repeat(Times::ONCE, children)
}

pub fn zero_or_once<V: Clone + PartialEq + Debug + 'static>(
    children: Vec<ParserFn<V>>,
) -> Result<ParserFn<V>, ImplementationError> {
    repeat(Times::ZERO_OR_ONCE, children)
}

pub fn zero_or_more_times<V: Clone + PartialEq + Debug + 'static>(
    children: Vec<ParserFn<V>>,
) -> Result<ParserFn<V>, ImplementationError> {
    repeat(Times::ZERO_OR_MORE, children)
}

pub fn one_or_more_times<V: Clone + PartialEq + Debug + 'static>(
    children: Vec<ParserFn<V>>,
) -> Result<ParserFn<V>, ImplementationError> {
    repeat(Times::ONE_OR_MORE, children)
}

/// Match with rewind: `position` is restored regardless of outcome.
pub fn look_ahead<V: Clone + PartialEq + Debug + 'static>(
    children: Vec<ParserFn<V>>,
) -> Result<ParserFn<V>, ImplementationError> {
    require_children("LookAhead", &children)?;
    let mut spec = KernelSpec::new("LookAhead", children);
    spec.rewind = true;
    Ok(build(spec))
}

/// Negated look-ahead: succeeds (with rewind) exactly when the inner
/// parser does not match.
pub fn look_ahead_n<V: Clone + PartialEq + Debug + 'static>(
    children: Vec<ParserFn<V>>,
) -> Result<ParserFn<V>, ImplementationError> {
    require_children("LookAheadN", &children)?;
    let mut spec = KernelSpec::new("LookAheadN", children);
    spec.rewind = true;
    spec.negative = true;
    Ok(build(spec))
}

fn look_behind_base<V: Clone + PartialEq + Debug + 'static>(
    negative: bool,
    min_n: i64,
    max_n: i64,
    children: Vec<ParserFn<V>>,
) -> Result<ParserFn<V>, ImplementationError> {
    require_children("LookBehind", &children)?;
    if max_n < min_n {
        return Err(ImplementationError::new("LookBehind", "maxN must not be less than minN"));
    }
    let class_name = if negative { "LookBehindN" } else { "LookBehind" };
    let mut spec = KernelSpec::new(class_name, children);
    spec.rewind = true;
    let inner = build(spec);

    Ok(Rc::new(move |ctx: ParserContext<'_, V>| {
        let entry = ctx.snapshot();
        let mut i = min_n;
        while i <= max_n {
            if (entry.position as i64) - i < 0 {
                i += 1;
                continue;
            }
            let mut candidate = ctx.clone();
            candidate.position = (entry.position as i64 - i) as usize;
            let out = inner(candidate)?;
            if out.match_status == MatchStatus::Matched {
                if negative {
                    let mut result = ctx.clone();
                    result.match_status = MatchStatus::Unmatched;
                    result.length = 0;
                    result.class_name = std::borrow::Cow::Borrowed(class_name);
                    return Ok(result);
                }
                // Carry the winning candidate's AST suffix forward (the
                // rewind flag on `inner` already restored its position,
                // not its stack growth).
                let mut result = out;
                result.position = entry.position;
                result.length = 0;
                result.match_status = MatchStatus::Matched;
                result.class_name = std::borrow::Cow::Borrowed(class_name);
                return Ok(result);
            }
            i += 1;
        }
        let mut result = ctx;
        result.match_status = if negative { MatchStatus::Matched } else { MatchStatus::Unmatched };
        result.length = 0;
        result.class_name = std::borrow::Cow::Borrowed(class_name);
        Ok(result)
    }))
}

/// Re-run the inner parser at each candidate position `current - i` for
/// `i` in `[minN, maxN]`; success at any `i` counts. The cursor is always
/// restored.
pub fn look_behind<V: Clone + PartialEq + Debug + 'static>(
    min_n: i64,
    max_n: i64,
    children: Vec<ParserFn<V>>,
) -> Result<ParserFn<V>, ImplementationError> {
    look_behind_base(false, min_n, max_n, children)
}

/// Negated look-behind: succeeds only if no candidate position matches.
pub fn look_behind_n<V: Clone + PartialEq + Debug + 'static>(
    min_n: i64,
    max_n: i64,
    children: Vec<ParserFn<V>>,
) -> Result<ParserFn<V>, ImplementationError> {
    look_behind_base(true, min_n, max_n, children)
}

/// Run `child`, then apply `transformers` in order over its AST suffix.
pub fn trans<V: Clone + PartialEq + Debug + 'static>(
    child: ParserFn<V>,
    transformers: Vec<TransformerFn>,
) -> ParserFn<V> {
    let mut spec = KernelSpec::new("Trans", vec![child]);
    spec.transformers = transformers;
    build(spec)
}

fn build<V: Clone + PartialEq + Debug + 'static>(spec: KernelSpec<V>) -> ParserFn<V> {
    let spec = Rc::new(spec);
    Rc::new(move |ctx: ParserContext<'_, V>| kernel(&spec, ctx))
}

#[cfg(test)]
mod __tests__ {
    use super::*;
    use crate::primitives::string::seq;

    #[test]
    fn first_prefers_leftmost_even_if_shorter() {
        let p = first(vec![seq("foo"), seq("foobar")]).unwrap();
        let ctx = ParserContext::from_str("foobar");
        let result = p(ctx).unwrap();
        assert_eq!(result.match_status, MatchStatus::Matched);
        assert_eq!(result.position, 3);
    }

    #[test]
    fn look_ahead_never_advances_position() {
        let p = look_ahead(vec![seq("foo")]).unwrap();
        let ctx = ParserContext::from_str("foobar");
        let result = p(ctx).unwrap();
        assert_eq!(result.match_status, MatchStatus::Matched);
        assert_eq!(result.position, 0);
    }

    #[test]
    fn look_ahead_n_matches_when_inner_fails() {
        let p = look_ahead_n(vec![seq("qux")]).unwrap();
        let ctx = ParserContext::from_str("foobar");
        let result = p(ctx).unwrap();
        assert_eq!(result.match_status, MatchStatus::Matched);
        assert_eq!(result.position, 0);
    }

    #[test]
    fn empty_first_is_an_implementation_error() {
        let err = first::<()>(vec![]).unwrap_err();
        assert_eq!(err.what, "First");
    }

    #[test]
    fn look_behind_finds_candidate_position() {
        // After matching "foo" at position 3, look behind for "foo" ending here.
        let p = look_behind(3, 3, vec![seq("foo")]).unwrap();
        let mut ctx = ParserContext::from_str("foobar");
        ctx.position = 3;
        let result = p(ctx).unwrap();
        assert_eq!(result.match_status, MatchStatus::Matched);
        assert_eq!(result.position, 3);
    }

    #[test]
    fn indirect_supports_recursion() {
        // A grammar for balanced parens: '(' expr? ')' | 'x'
        fn make_expr() -> ParserFn<()> {
            indirect(|| {
                first(vec![
                    flat_group(vec![seq("("), zero_or_once(vec![make_expr()]).unwrap(), seq(")")]).unwrap(),
                    seq("x"),
                ])
                .unwrap()
            })
        }
        let p = make_expr();
        let ctx = ParserContext::from_str("((x))");
        let result = p(ctx).unwrap();
        assert_eq!(result.match_status, MatchStatus::Matched);
        assert_eq!(result.position, 5);
    }
}
