//! AST-slice rewriters applied post-match (§4.5). Every transformer has
//! signature `(ctx, slice) -> (slice, error)`, matching
//! [`crate::kernel::TransformerFn`]; they only ever see the suffix their
//! companion parser produced, never the stack below the baseline.

use crate::ast::{AstNode, Payload, PayloadType};
use crate::error::ParseError;
use crate::kernel::{TransformContext, TransformerFn};
use std::rc::Rc;

fn bad_source(class: &str, got: PayloadType) -> ParseError {
    ParseError::new(0, format!("Transformer:{}: bad source type: {:?}", class, got))
}

/// Drop everything in the suffix.
pub fn erase() -> TransformerFn {
    Rc::new(|_ctx, _asts| Ok(Vec::new()))
}

/// Always fails with `message`.
pub fn transform_error(message: impl Into<String> + 'static) -> TransformerFn {
    Rc::new(move |_ctx, asts| Err(ParseError::new(0, message.into())))
}

/// Concatenate `String`-payload nodes in the suffix into one `String`
/// node, inheriting the first node's class name and span.
pub fn concat() -> TransformerFn {
    Rc::new(|ctx: &TransformContext, asts: Vec<AstNode>| {
        if asts.is_empty() {
            return Ok(vec![AstNode::new("Concat", Payload::String(String::new()), ctx.position, 0)]);
        }
        let mut buf = String::new();
        for node in &asts {
            match &node.payload {
                Payload::String(s) => buf.push_str(s),
                other => return Err(bad_source("Concat", other.payload_type())),
            }
        }
        let position = asts[0].source_span.position;
        let length: usize = asts.iter().map(|n| n.source_span.length).sum();
        Ok(vec![AstNode {
            opcode: asts[0].opcode,
            class_name: asts[0].class_name.clone(),
            payload_type: PayloadType::String,
            payload: Payload::String(buf),
            source_span: crate::ast::SourceSpan { position, length },
        }])
    })
}

const WHITESPACE_CUTSET: &[char] = &['\u{09}', '\u{0A}', '\u{0B}', '\u{0C}', '\u{0D}', '\u{20}', '\u{85}', '\u{A0}'];

fn with_concat_then(
    f: impl Fn(AstNode) -> Result<AstNode, ParseError> + 'static,
) -> TransformerFn {
    let cc = concat();
    Rc::new(move |ctx, asts| {
        let mut result = cc(ctx, asts)?;
        let node = result.pop().unwrap();
        result.push(f(node)?);
        Ok(result)
    })
}

/// `Concat` then strip whitespace from both ends per [`WHITESPACE_CUTSET`].
pub fn trim() -> TransformerFn {
    with_concat_then(|mut node| {
        if let Payload::String(s) = &node.payload {
            node.payload = Payload::String(s.trim_matches(WHITESPACE_CUTSET).to_string());
        }
        Ok(node)
    })
}

/// `Concat` then strip leading whitespace only.
pub fn trim_start() -> TransformerFn {
    with_concat_then(|mut node| {
        if let Payload::String(s) = &node.payload {
            node.payload = Payload::String(s.trim_start_matches(WHITESPACE_CUTSET).to_string());
        }
        Ok(node)
    })
}

/// `Concat` then strip trailing whitespace only.
pub fn trim_end() -> TransformerFn {
    with_concat_then(|mut node| {
        if let Payload::String(s) = &node.payload {
            node.payload = Payload::String(s.trim_end_matches(WHITESPACE_CUTSET).to_string());
        }
        Ok(node)
    })
}

/// `Concat` then parse a signed integer with the given radix.
pub fn parse_int_radix(radix: u32) -> TransformerFn {
    with_concat_then(move |mut node| {
        if let Payload::String(s) = &node.payload {
            let num = i64::from_str_radix(s, radix)
                .map_err(|e| ParseError::new(node.source_span.position, format!("Transformer:ParseIntRadix: bad number format: {}: {}", s, e)))?;
            node.payload = Payload::Int64(num);
            node.payload_type = PayloadType::Int64;
        }
        Ok(node)
    })
}

/// `Concat` then parse a base-10 signed integer.
pub fn parse_int() -> TransformerFn {
    parse_int_radix(10)
}

/// `Concat` then parse an unsigned integer with the given radix. A
/// leading `+` is stripped before delegating to the radix parse, matching
/// upstream.
pub fn parse_uint_radix(radix: u32) -> TransformerFn {
    with_concat_then(move |mut node| {
        if let Payload::String(s) = &node.payload {
            let stripped = s.strip_prefix('+').unwrap_or(s);
            let num = u64::from_str_radix(stripped, radix)
                .map_err(|e| ParseError::new(node.source_span.position, format!("Transformer:ParseUintRadix: bad number format: {}: {}", s, e)))?;
            node.payload = Payload::Uint64(num);
            node.payload_type = PayloadType::Uint64;
        }
        Ok(node)
    })
}

/// `Concat` then parse a base-10 unsigned integer.
pub fn parse_uint() -> TransformerFn {
    parse_uint_radix(10)
}

/// `Concat` then parse a 64-bit float.
pub fn parse_float() -> TransformerFn {
    with_concat_then(|mut node| {
        if let Payload::String(s) = &node.payload {
            let num: f64 = s
                .parse()
                .map_err(|_| ParseError::new(node.source_span.position, format!("Transformer:ParseFloat: bad number format: {}", s)))?;
            node.payload = Payload::Float64(num);
            node.payload_type = PayloadType::Float64;
        }
        Ok(node)
    })
}

/// Wrap the whole suffix into one `ListOfAst` node with class `"group"`.
pub fn grouping_transform() -> TransformerFn {
    Rc::new(|ctx: &TransformContext, asts: Vec<AstNode>| {
        let position = asts.first().map(|n| n.source_span.position).unwrap_or(ctx.position);
        let length: usize = asts.iter().map(|n| n.source_span.length).sum();
        Ok(vec![AstNode::new("group", Payload::ListOfAst(asts), position, length)])
    })
}

/// Rewrite the class name of the first node of the suffix.
pub fn change_class_name(name: &'static str) -> TransformerFn {
    Rc::new(move |_ctx, mut asts| {
        if let Some(first) = asts.first_mut() {
            first.class_name = std::borrow::Cow::Borrowed(name);
        }
        Ok(asts)
    })
}

/// Rewrite the opcode of the first node of the suffix.
pub fn set_op_code(opcode: u64) -> TransformerFn {
    Rc::new(move |_ctx, mut asts| {
        if let Some(first) = asts.first_mut() {
            first.opcode = opcode;
        }
        Ok(asts)
    })
}

/// Rewrite both the opcode and class name of the first node of the suffix.
pub fn set_op_code_and_class_name(opcode: u64, name: &'static str) -> TransformerFn {
    Rc::new(move |_ctx, mut asts| {
        if let Some(first) = asts.first_mut() {
            first.opcode = opcode;
            first.class_name = std::borrow::Cow::Borrowed(name);
        }
        Ok(asts)
    })
}

/// Rewrite the payload of the first node of the suffix.
pub fn set_value(payload: Payload) -> TransformerFn {
    Rc::new(move |_ctx, mut asts| {
        if let Some(first) = asts.first_mut() {
            first.payload_type = payload.payload_type();
            first.payload = payload.clone();
        }
        Ok(asts)
    })
}

/// Insert a literal node at the start of the suffix, inheriting the
/// (former) first node's source span.
pub fn prepend(node: AstNode) -> TransformerFn {
    Rc::new(move |_ctx, asts| {
        let mut out = Vec::with_capacity(asts.len() + 1);
        let mut head = node.clone();
        if let Some(first) = asts.first() {
            head.source_span = first.source_span;
        }
        out.push(head);
        out.extend(asts);
        Ok(out)
    })
}

/// Append a literal node to the end of the suffix, inheriting the
/// (former) last node's source span.
pub fn push(node: AstNode) -> TransformerFn {
    Rc::new(move |_ctx, asts| {
        let mut out = asts;
        let mut tail = node.clone();
        if let Some(last) = out.last() {
            tail.source_span = last.source_span;
        }
        out.push(tail);
        Ok(out)
    })
}

/// Drop the last node of the suffix.
pub fn pop() -> TransformerFn {
    Rc::new(|_ctx, mut asts| {
        asts.pop();
        Ok(asts)
    })
}

/// Swap the last two nodes of the suffix.
pub fn exchange() -> TransformerFn {
    Rc::new(|_ctx, mut asts| {
        let len = asts.len();
        if len >= 2 {
            asts.swap(len - 1, len - 2);
        }
        Ok(asts)
    })
}

/// Cyclically rotate the top `|n|` items of the suffix: positive `n`
/// rotates bottom-to-top, negative rotates top-to-bottom.
///
/// Upstream's `Roll(n)` is a no-op under every branch of its source (see
/// DESIGN.md); this is the genuine rotation its doc comment describes.
pub fn roll(n: i64) -> TransformerFn {
    Rc::new(move |_ctx, mut asts| {
        let len = asts.len();
        let window = n.unsigned_abs() as usize;
        if window == 0 || window > len {
            return Ok(asts);
        }
        let start = len - window;
        if n >= 0 {
            asts[start..].rotate_right(1);
        } else {
            asts[start..].rotate_left(1);
        }
        Ok(asts)
    })
}

/// Materialize the suffix as a single `ListOfAny` node whose payload is a
/// sequence of each node's payload (captured as [`crate::ast::AnyValue`]).
pub fn to_slice() -> TransformerFn {
    Rc::new(|ctx: &TransformContext, asts: Vec<AstNode>| {
        if asts.is_empty() {
            return Ok(vec![AstNode::new("ToSlice", Payload::ListOfAny(Vec::new()), ctx.position, 0)]);
        }
        let position = asts[0].source_span.position;
        let length: usize = asts.iter().map(|n| n.source_span.length).sum();
        let class_name = asts[0].class_name.clone();
        let values = asts
            .into_iter()
            .map(|n| crate::ast::AnyValue::new(n.payload))
            .collect();
        Ok(vec![AstNode {
            opcode: 0,
            class_name,
            payload_type: PayloadType::ListOfAny,
            payload: Payload::ListOfAny(values),
            source_span: crate::ast::SourceSpan { position, length },
        }])
    })
}

#[cfg(test)]
mod __tests__ {
    use super::*;
    use crate::kernel::TransformContext;

    fn tctx() -> TransformContext {
        TransformContext { position: 0, tag: None }
    }

    fn s(text: &str, pos: usize) -> AstNode {
        AstNode::new("Lit", Payload::String(text.to_string()), pos, text.len())
    }

    #[test]
    fn concat_joins_strings() {
        let out = concat()(&tctx(), vec![s("foo", 0), s("bar", 3)]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].payload, Payload::String("foobar".to_string()));
    }

    #[test]
    fn trim_strips_whitespace_after_concat() {
        let out = trim()(&tctx(), vec![s("  hi  ", 0)]).unwrap();
        assert_eq!(out[0].payload, Payload::String("hi".to_string()));
    }

    #[test]
    fn parse_int_radix_parses_hex() {
        let out = parse_int_radix(16)(&tctx(), vec![s("ff", 0)]).unwrap();
        assert_eq!(out[0].payload, Payload::Int64(255));
    }

    #[test]
    fn parse_uint_radix_strips_leading_plus() {
        let out = parse_uint_radix(10)(&tctx(), vec![s("+7", 0)]).unwrap();
        assert_eq!(out[0].payload, Payload::Uint64(7));
    }

    #[test]
    fn roll_positive_rotates_bottom_to_top() {
        let nodes = vec![s("a", 0), s("b", 1), s("c", 2)];
        let out = roll(3)(&tctx(), nodes).unwrap();
        let texts: Vec<_> = out.iter().map(|n| match &n.payload { Payload::String(s) => s.clone(), _ => unreachable!() }).collect();
        assert_eq!(texts, vec!["c", "a", "b"]);
    }

    #[test]
    fn roll_negative_rotates_top_to_bottom() {
        let nodes = vec![s("a", 0), s("b", 1), s("c", 2)];
        let out = roll(-3)(&tctx(), nodes).unwrap();
        let texts: Vec<_> = out.iter().map(|n| match &n.payload { Payload::String(s) => s.clone(), _ => unreachable!() }).collect();
        assert_eq!(texts, vec!["b", "c", "a"]);
    }

    #[test]
    fn exchange_swaps_last_two() {
        let nodes = vec![s("a", 0), s("b", 1), s("c", 2)];
        let out = exchange()(&tctx(), nodes).unwrap();
        let texts: Vec<_> = out.iter().map(|n| match &n.payload { Payload::String(s) => s.clone(), _ => unreachable!() }).collect();
        assert_eq!(texts, vec!["a", "c", "b"]);
    }

    #[test]
    fn to_slice_materializes_payloads() {
        let out = to_slice()(&tctx(), vec![s("a", 0), s("b", 1)]).unwrap();
        match &out[0].payload {
            Payload::ListOfAny(v) => assert_eq!(v.len(), 2),
            _ => panic!("expected ListOfAny"),
        }
    }
}
