//! Leaf parsers over a Unicode-string source (§4.2): one logical scalar
//! read per primitive, each appending exactly one `String`-payload node
//! tagged with its class name and source span.

use super::common::{
    is_line_break, is_utf8_lead_byte, is_whitespace, is_whitespace_no_line_break, is_word,
    leaf, next_char, prev_char,
};
use crate::ast::{AstNode, Payload};
use crate::kernel::ParserFn;

fn push_match(ctx: &mut crate::context::ParserContext<'_, ()>, class: &'static str, text: &str, start: usize, len: usize) {
    ctx.ast_stack.push(AstNode::new(class, Payload::String(text.to_string()), start, len));
    ctx.position += len;
    ctx.length = len;
    ctx.match_status = crate::context::MatchStatus::Matched;
}

/// Decode one Unicode scalar, unconditionally.
pub fn any_char() -> ParserFn<()> {
    leaf("AnyChar", |ctx| {
        let src = ctx.source.as_str();
        if let Some((c, len)) = next_char(src, ctx.position) {
            let start = ctx.position;
            push_match(ctx, "AnyChar", &src[start..start + len], start, len);
            let _ = c;
        }
    })
}

/// Match a byte-exact literal.
pub fn seq(literal: &'static str) -> ParserFn<()> {
    leaf("Seq", move |ctx| {
        let src = ctx.source.as_str();
        let start = ctx.position;
        if src.as_bytes().get(start..start + literal.len()) == Some(literal.as_bytes()) {
            push_match(ctx, "Seq", literal, start, literal.len());
        }
    })
}

/// Match a literal, case-insensitively (ASCII case folding).
pub fn seq_i(literal: &'static str) -> ParserFn<()> {
    leaf("SeqI", move |ctx| {
        let src = ctx.source.as_str();
        let start = ctx.position;
        if let Some(candidate) = src.get(start..start + literal.len()) {
            if candidate.eq_ignore_ascii_case(literal) {
                push_match(ctx, "SeqI", candidate, start, literal.len());
            }
        }
    })
}

/// One scalar within any of the given inclusive ranges.
pub fn char_range(ranges: Vec<(char, char)>) -> ParserFn<()> {
    leaf("CharRange", move |ctx| {
        let src = ctx.source.as_str();
        let start = ctx.position;
        if let Some((c, len)) = next_char(src, start) {
            if ranges.iter().any(|(a, b)| *a <= c && c <= *b) {
                push_match(ctx, "CharRange", &src[start..start + len], start, len);
            }
        }
    })
}

/// One scalar outside all of the given inclusive ranges.
pub fn char_range_n(ranges: Vec<(char, char)>) -> ParserFn<()> {
    leaf("CharRangeN", move |ctx| {
        let src = ctx.source.as_str();
        let start = ctx.position;
        if let Some((c, len)) = next_char(src, start) {
            if !ranges.iter().any(|(a, b)| *a <= c && c <= *b) {
                push_match(ctx, "CharRangeN", &src[start..start + len], start, len);
            }
        }
    })
}

/// Match if the next bytes equal one of the given literal alternatives.
pub fn char_class(alts: Vec<&'static str>) -> ParserFn<()> {
    leaf("CharClass", move |ctx| {
        let src = ctx.source.as_str();
        let start = ctx.position;
        if let Some(found) = alts.iter().find(|alt| src[start..].starts_with(**alt)) {
            push_match(ctx, "CharClass", *found, start, found.len());
        }
    })
}

/// Match if the next bytes equal none of the given alternatives; then
/// consume one scalar.
pub fn char_class_n(alts: Vec<&'static str>) -> ParserFn<()> {
    leaf("CharClassN", move |ctx| {
        let src = ctx.source.as_str();
        let start = ctx.position;
        if alts.iter().any(|alt| src[start..].starts_with(*alt)) {
            return;
        }
        if let Some((c, len)) = next_char(src, start) {
            push_match(ctx, "CharClassN", &src[start..start + len], start, len);
            let _ = c;
        }
    })
}

/// One scalar accepted by a predicate.
pub fn char_class_fn(pred: impl Fn(char) -> bool + 'static) -> ParserFn<()> {
    leaf("CharClassFn", move |ctx| {
        let src = ctx.source.as_str();
        let start = ctx.position;
        if let Some((c, len)) = next_char(src, start) {
            if pred(c) {
                push_match(ctx, "CharClassFn", &src[start..start + len], start, len);
            }
        }
    })
}

pub fn whitespace() -> ParserFn<()> {
    char_class_predicate("Whitespace", is_whitespace)
}

pub fn whitespace_no_line_break() -> ParserFn<()> {
    char_class_predicate("WhitespaceNoLineBreak", is_whitespace_no_line_break)
}

pub fn line_break() -> ParserFn<()> {
    char_class_predicate("LineBreak", is_line_break)
}

pub fn alpha() -> ParserFn<()> {
    char_class_predicate("Alpha", |c| c.is_ascii_alphabetic())
}

pub fn number() -> ParserFn<()> {
    char_class_predicate("Number", |c| c.is_ascii_digit())
}

pub fn alnum() -> ParserFn<()> {
    char_class_predicate("Alnum", |c| c.is_ascii_alphanumeric())
}

pub fn bin_number() -> ParserFn<()> {
    char_class_predicate("BinNumber", |c| c == '0' || c == '1')
}

pub fn oct_number() -> ParserFn<()> {
    char_class_predicate("OctNumber", |c| ('0'..='7').contains(&c))
}

pub fn hex_number() -> ParserFn<()> {
    char_class_predicate("HexNumber", |c| c.is_ascii_hexdigit())
}

fn char_class_predicate(class: &'static str, pred: impl Fn(char) -> bool + 'static) -> ParserFn<()> {
    leaf(class, move |ctx| {
        let src = ctx.source.as_str();
        let start = ctx.position;
        if let Some((c, len)) = next_char(src, start) {
            if pred(c) {
                push_match(ctx, class, &src[start..start + len], start, len);
            }
        }
    })
}

/// Zero-width assertion at the start of the source.
pub fn start() -> ParserFn<()> {
    leaf("Start", |ctx| {
        if ctx.position == 0 {
            ctx.match_status = crate::context::MatchStatus::Matched;
        }
    })
}

/// Zero-width assertion at the end of the source.
pub fn end() -> ParserFn<()> {
    leaf("End", |ctx| {
        if ctx.position == ctx.source.len() {
            ctx.match_status = crate::context::MatchStatus::Matched;
        }
    })
}

/// Zero-width transition between word (`[A-Za-z0-9_]`) and non-word.
pub fn word_boundary() -> ParserFn<()> {
    leaf("WordBoundary", |ctx| {
        let src = ctx.source.as_str();
        let before = prev_char(src, ctx.position).map(|(c, _)| is_word(c)).unwrap_or(false);
        let after = next_char(src, ctx.position).map(|(c, _)| is_word(c)).unwrap_or(false);
        if before != after {
            ctx.match_status = crate::context::MatchStatus::Matched;
        }
    })
}

#[cfg(test)]
mod __tests__ {
    use super::*;
    use crate::context::{MatchStatus, ParserContext};

    #[test]
    fn seq_matches_and_advances() {
        let parser = seq("foo");
        let ctx = ParserContext::from_str("foobar");
        let ctx = parser(ctx).unwrap();
        assert_eq!(ctx.match_status, MatchStatus::Matched);
        assert_eq!(ctx.position, 3);
        assert_eq!(ctx.ast_stack.len(), 1);
    }

    #[test]
    fn seq_i_is_case_insensitive() {
        let parser = seq_i("FOO");
        let ctx = ParserContext::from_str("foobar");
        let ctx = parser(ctx).unwrap();
        assert_eq!(ctx.match_status, MatchStatus::Matched);
    }

    #[test]
    fn word_boundary_fires_between_word_and_space() {
        let ctx = ParserContext::from_str("ab cd");
        let mut ctx2 = ctx.clone();
        ctx2.position = 2;
        let result = word_boundary()(ctx2).unwrap();
        assert_eq!(result.match_status, MatchStatus::Matched);

        let mut ctx3 = ctx;
        ctx3.position = 1;
        let result3 = word_boundary()(ctx3).unwrap();
        assert_eq!(result3.match_status, MatchStatus::Unmatched);
    }

    #[test]
    fn start_and_end() {
        let ctx = ParserContext::from_str("x");
        assert_eq!(start()(ctx.clone()).unwrap().match_status, MatchStatus::Matched);
        let mut at_end = ctx;
        at_end.position = 1;
        assert_eq!(end()(at_end).unwrap().match_status, MatchStatus::Matched);
    }

    #[test]
    fn lead_byte_helper_exported_for_position_module() {
        assert!(is_utf8_lead_byte(b'a'));
    }
}
