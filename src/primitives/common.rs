//! Shared plumbing for leaf parsers: a single wrapper that tags a
//! hand-rolled match/no-match body with a class name, mirroring the Go
//! source's `LightBaseParser` (a leaf never loops or backtracks itself;
//! it either advances once or leaves the context untouched).

use crate::context::{MatchStatus, ParserContext};
use crate::error::ParseError;
use crate::kernel::ParserFn;
use std::fmt::Debug;
use std::rc::Rc;

/// Build a leaf parser from a body that mutates `ctx` in place. The body
/// must set `ctx.match_status` to `Matched` on success (having already
/// pushed whatever AST node and advanced `position`/`length`); it is
/// entered with `match_status` already reset to `Unmatched`, so a body
/// that does nothing on failure is automatically correct.
pub fn leaf<V: Clone + PartialEq + Debug + 'static>(
    class_name: &'static str,
    body: impl Fn(&mut ParserContext<'_, V>) + 'static,
) -> ParserFn<V> {
    Rc::new(
        move |mut ctx: ParserContext<'_, V>| -> Result<ParserContext<'_, V>, ParseError> {
            ctx.match_status = MatchStatus::Unmatched;
            ctx.length = 0;
            body(&mut ctx);
            ctx.class_name = std::borrow::Cow::Borrowed(class_name);
            Ok(ctx)
        },
    )
}

/// Lead-byte test for the start of a UTF-8 sequence. Fixed range: the
/// upstream word-boundary back-scan used `0xc2..=0xf0, 0xf3`, silently
/// omitting `0xf1, 0xf2, 0xf4` and mis-detecting boundaries just before
/// some 4-byte sequences. `0x00..=0x7F ∪ 0xC2..=0xF4` is the correct set.
pub fn is_utf8_lead_byte(b: u8) -> bool {
    b <= 0x7F || (0xC2..=0xF4).contains(&b)
}

/// Decode the Unicode scalar starting at byte offset `pos`, if any.
/// Returns the char and its UTF-8 length in bytes.
pub fn next_char(s: &str, pos: usize) -> Option<(char, usize)> {
    s.get(pos..)?.chars().next().map(|c| (c, c.len_utf8()))
}

/// Decode the Unicode scalar immediately before byte offset `pos`, by
/// scanning backward for a lead byte using [`is_utf8_lead_byte`].
pub fn prev_char(s: &str, pos: usize) -> Option<(char, usize)> {
    if pos == 0 {
        return None;
    }
    let bytes = s.as_bytes();
    let mut i = pos - 1;
    while i > 0 && !is_utf8_lead_byte(bytes[i]) {
        i -= 1;
    }
    s.get(i..pos)?.chars().next().map(|c| (c, pos - i))
}

pub const HT: char = '\u{09}';
pub const LF: char = '\u{0A}';
pub const VT: char = '\u{0B}';
pub const FF: char = '\u{0C}';
pub const CR: char = '\u{0D}';
pub const SP: char = '\u{20}';
pub const NEL: char = '\u{85}';
pub const NBSP: char = '\u{A0}';

pub fn is_whitespace(c: char) -> bool {
    matches!(c, HT | LF | VT | FF | CR | SP | NEL | NBSP)
}

pub fn is_whitespace_no_line_break(c: char) -> bool {
    is_whitespace(c) && !is_line_break(c)
}

pub fn is_line_break(c: char) -> bool {
    matches!(c, LF | VT | FF | CR | NEL)
}

/// ASCII-only, matching the upstream `isWord`: `[A-Za-z0-9_]`.
pub fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
