//! Numeric-literal and ISO-8601 date/time *shape* parsers composed from
//! the string primitives (§4.9). These recognize lexical shape only: no
//! semantic `chrono`/`time`-crate value construction happens here. Date
//! values outside the `[1, 9999]`-year range are not addressed; that is
//! left to an external date library, matching upstream (§9).

use crate::combinators::{first, flat_group, one_or_more_times, repeat, trans, zero_or_more_times, zero_or_once};
use crate::context::Times;
use crate::error::ImplementationError;
use crate::kernel::ParserFn;
use crate::primitives::string::{bin_number, char_class, char_class_fn, hex_number, number, oct_number, seq};
use crate::transformers::{change_class_name, concat};

fn named_concat(class: &'static str, body: ParserFn<()>) -> ParserFn<()> {
    trans(body, vec![concat(), change_class_name(class)])
}

fn sign() -> Result<ParserFn<()>, ImplementationError> {
    zero_or_once(vec![char_class(vec!["+", "-"])])
}

fn digits_n(n: i64) -> Result<ParserFn<()>, ImplementationError> {
    repeat(Times::new(n, n), vec![number()])
}

/// `0b`/`0B` followed by one or more binary digits.
pub fn binary_number_str() -> Result<ParserFn<()>, ImplementationError> {
    let body = flat_group(vec![char_class(vec!["0b", "0B"]), one_or_more_times(vec![bin_number()])?])?;
    Ok(named_concat("BinaryNumberStr", body))
}

/// `0o`/`0O` followed by one or more octal digits.
pub fn octal_number_str() -> Result<ParserFn<()>, ImplementationError> {
    let body = flat_group(vec![char_class(vec!["0o", "0O"]), one_or_more_times(vec![oct_number()])?])?;
    Ok(named_concat("OctalNumberStr", body))
}

/// `0x`/`0X` followed by one or more hex digits.
pub fn hex_number_str() -> Result<ParserFn<()>, ImplementationError> {
    let body = flat_group(vec![char_class(vec!["0x", "0X"]), one_or_more_times(vec![hex_number()])?])?;
    Ok(named_concat("HexNumberStr", body))
}

/// An optional sign followed by one or more decimal digits.
pub fn integer_number_str() -> Result<ParserFn<()>, ImplementationError> {
    let body = flat_group(vec![sign()?, one_or_more_times(vec![number()])?])?;
    Ok(named_concat("IntegerNumberStr", body))
}

/// An optional sign, decimal digits, a `.`-separated fractional part, and
/// an optional exponent — or decimal digits with a mandatory exponent.
/// Either the integer or the fractional half of the dotted form may be
/// empty, but a float shape always carries a `.` or an exponent; a bare
/// run of digits is [`integer_number_str`]'s shape, not this one's.
pub fn float_number_str() -> Result<ParserFn<()>, ImplementationError> {
    let exponent = || -> Result<ParserFn<()>, ImplementationError> {
        flat_group(vec![char_class(vec!["e", "E"]), sign()?, one_or_more_times(vec![number()])?])
    };
    let with_dot = flat_group(vec![
        sign()?,
        zero_or_more_times(vec![number()])?,
        seq("."),
        zero_or_more_times(vec![number()])?,
        zero_or_once(vec![exponent()?])?,
    ])?;
    let without_dot = flat_group(vec![sign()?, one_or_more_times(vec![number()])?, exponent()?])?;
    let body = first(vec![with_dot, without_dot])?;
    Ok(named_concat("FloatNumberStr", body))
}

/// Any numeric literal shape, tried radix-prefixed forms first so a
/// leading `0b`/`0o`/`0x` is never misread as a decimal literal starting
/// with `0`.
pub fn numeric_str() -> Result<ParserFn<()>, ImplementationError> {
    first(vec![
        binary_number_str()?,
        octal_number_str()?,
        hex_number_str()?,
        float_number_str()?,
        integer_number_str()?,
    ])
}

/// `[-]YYYY(Y...)-MM-DD`: at least 4 year digits (unbounded above) and an
/// optional leading `-` for negative years, matching upstream's shape.
pub fn date_str() -> Result<ParserFn<()>, ImplementationError> {
    let year = flat_group(vec![zero_or_once(vec![seq("-")])?, repeat(Times::new(4, -1), vec![number()])?])?;
    let body = flat_group(vec![year, seq("-"), digits_n(2)?, seq("-"), digits_n(2)?])?;
    Ok(named_concat("DateStr", body))
}

/// `HH:MM:SS(.fff...)?`.
pub fn time_str() -> Result<ParserFn<()>, ImplementationError> {
    let frac = zero_or_once(vec![flat_group(vec![seq("."), one_or_more_times(vec![number()])?])?])?;
    let body = flat_group(vec![digits_n(2)?, seq(":"), digits_n(2)?, seq(":"), digits_n(2)?, frac])?;
    Ok(named_concat("TimeStr", body))
}

/// `DateStr 'T' TimeStr` with an optional trailing `Z` or `±HH:MM` offset.
pub fn date_time_str() -> Result<ParserFn<()>, ImplementationError> {
    let offset = first(vec![
        seq("Z"),
        flat_group(vec![char_class(vec!["+", "-"]), digits_n(2)?, seq(":"), digits_n(2)?])?,
    ])?;
    let body = flat_group(vec![date_str()?, seq("T"), time_str()?, zero_or_once(vec![offset])?])?;
    Ok(named_concat("DateTimeStr", body))
}

/// A Unicode-identifier-shaped parser: an ID_Start-like leading character
/// (alphabetic or `_`) followed by zero or more ID_Continue-like
/// characters (alphanumeric, `_`, ZWNJ `\u{200C}`, ZWJ `\u{200D}`).
/// Grounded on `extra/util.go`'s `isUnicodeWord`, which upstream defines
/// and gives a class-name constant but never wires into an exported
/// parser function; wiring it up completes an otherwise-orphaned
/// primitive rather than inventing new surface.
pub fn identifier_str() -> Result<ParserFn<()>, ImplementationError> {
    let head = char_class_fn(|c| c.is_alphabetic() || c == '_');
    let tail = zero_or_more_times(vec![char_class_fn(|c| {
        c.is_alphanumeric() || c == '_' || c == '\u{200C}' || c == '\u{200D}'
    })])?;
    let body = flat_group(vec![head, tail])?;
    Ok(named_concat("IdentifierStr", body))
}
