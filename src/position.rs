//! Maps a byte offset into a source string to a 1-based line/column, and
//! renders a three-line error guide (§4.7): the preceding line (if any),
//! the offending line prefixed with `> `, and a caret underline aligned to
//! the column after tab expansion.

use std::fmt::{self, Display, Formatter};

/// A 1-based line/column pair. Field order matters: the derived
/// [`PartialOrd`]/[`Ord`] compares `line` then `column`, which is exactly
/// the lexicographic ordering source-position monotonicity requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte range `[start, end)` of the line containing `byte_offset`, not
/// including its terminator. CR, LF, and CRLF each count as a single
/// terminator.
fn line_bounds(src: &str, byte_offset: usize) -> (usize, usize) {
    let bytes = src.as_bytes();
    let offset = byte_offset.min(bytes.len());
    let mut start = 0;
    let mut i = 0;
    while i < offset {
        match bytes[i] {
            b'\n' => {
                i += 1;
                start = i;
            }
            b'\r' => {
                i += 1;
                if i < bytes.len() && bytes[i] == b'\n' {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    let mut end = start;
    while end < bytes.len() && bytes[end] != b'\n' && bytes[end] != b'\r' {
        end += 1;
    }
    (start, end)
}

/// Compute the 1-based line and column of `byte_offset` in `src`. `column`
/// counts codepoints (a logical column), not screen cells; tab expansion
/// only applies to the caret alignment in [`render_guide`].
pub fn position_at(src: &str, byte_offset: usize) -> Position {
    let bytes = src.as_bytes();
    let clamped = byte_offset.min(bytes.len());
    let mut line = 1usize;
    let mut i = 0usize;
    let mut line_start = 0usize;
    while i < clamped {
        match bytes[i] {
            b'\n' => {
                line += 1;
                i += 1;
                line_start = i;
            }
            b'\r' => {
                line += 1;
                i += 1;
                if i < clamped && bytes[i] == b'\n' {
                    i += 1;
                }
                line_start = i;
            }
            _ => i += 1,
        }
    }
    let column = src[line_start..clamped].chars().count() + 1;
    Position { line, column }
}

/// Render a three-line error guide around `byte_offset`: the preceding
/// line (if any), the offending line prefixed with `> `, and a caret
/// underline aligned to the column after tab expansion (each tab expands
/// to `tab_size` screen columns).
pub fn render_guide(src: &str, byte_offset: usize, tab_size: usize) -> String {
    let clamped = byte_offset.min(src.len());
    let (cur_start, cur_end) = line_bounds(src, clamped);
    let mut out = String::new();

    if cur_start > 0 {
        let (prev_start, prev_end) = line_bounds(src, cur_start - 1);
        out.push_str(&src[prev_start..prev_end]);
        out.push('\n');
    }

    out.push_str("> ");
    out.push_str(&src[cur_start..cur_end]);
    out.push('\n');

    let screen_col: usize = src[cur_start..clamped]
        .chars()
        .map(|c| if c == '\t' { tab_size } else { 1 })
        .sum();
    out.push_str("  ");
    out.push_str(&" ".repeat(screen_col));
    out.push('^');
    out
}

/// Convenience combination of [`position_at`] and [`render_guide`], the
/// shape the top-level parse-error helper renders at the API boundary.
pub fn describe(src: &str, byte_offset: usize, tab_size: usize) -> String {
    format!("{}\n{}", position_at(src, byte_offset), render_guide(src, byte_offset, tab_size))
}
