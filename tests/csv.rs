//! A minimal RFC-4180-shaped CSV grammar, built entirely from `pegcomb`'s
//! public combinator and transformer surface: quoted and unquoted fields,
//! `""`-escaped quotes inside a quoted field, and CRLF or LF row
//! separators. An opening `"` commits to the quoted-field shape; a missing
//! closing quote is a hard parse error, not a backtrackable alternative.

use pegcomb::ast::{AstNode, Payload};
use pegcomb::combinators::{flat_group, trans, zero_or_more_times};
use pegcomb::kernel::{ParserFn, TransformerFn};
use pegcomb::parse_str;
use pegcomb::primitives::string::{char_class_n, seq};
use pegcomb::transformers::{change_class_name, concat, grouping_transform, set_value};
use std::rc::Rc;

fn keep_second() -> TransformerFn {
    Rc::new(|_ctx, asts| Ok(vec![asts[1].clone()]))
}

fn quoted_inner() -> ParserFn<()> {
    let escaped_quote = trans(seq("\"\""), vec![set_value(Payload::String("\"".to_string()))]);
    let plain_char = char_class_n(vec!["\""]);
    let body = zero_or_more_times(vec![pegcomb::combinators::first(vec![escaped_quote, plain_char]).unwrap()]).unwrap();
    trans(body, vec![concat()])
}

fn field_quoted() -> ParserFn<()> {
    let closing_or_error = pegcomb::combinators::first(vec![
        seq("\""),
        pegcomb::combinators::error("unterminated quoted field"),
    ])
    .unwrap();
    let body = flat_group(vec![seq("\""), quoted_inner(), closing_or_error]).unwrap();
    trans(body, vec![keep_second(), change_class_name("Field")])
}

fn field_unquoted() -> ParserFn<()> {
    let body = zero_or_more_times(vec![char_class_n(vec![",", "\n", "\r", "\""])]).unwrap();
    trans(body, vec![concat(), change_class_name("Field")])
}

fn field() -> ParserFn<()> {
    pegcomb::combinators::first(vec![field_quoted(), field_unquoted()]).unwrap()
}

fn comma_field() -> ParserFn<()> {
    trans(flat_group(vec![seq(","), field()]).unwrap(), vec![keep_second()])
}

fn record() -> ParserFn<()> {
    let body = flat_group(vec![field(), zero_or_more_times(vec![comma_field()]).unwrap()]).unwrap();
    trans(body, vec![grouping_transform(), change_class_name("Record")])
}

fn line_break() -> ParserFn<()> {
    pegcomb::combinators::first(vec![seq("\r\n"), seq("\n")]).unwrap()
}

fn row_after_break() -> ParserFn<()> {
    trans(flat_group(vec![line_break(), record()]).unwrap(), vec![keep_second()])
}

fn csv() -> ParserFn<()> {
    let body = flat_group(vec![record(), zero_or_more_times(vec![row_after_break()]).unwrap()]).unwrap();
    trans(body, vec![grouping_transform(), change_class_name("Csv")])
}

fn text(node: &AstNode) -> &str {
    match &node.payload {
        Payload::String(s) => s,
        _ => panic!("expected a String payload, got {:?}", node.payload),
    }
}

fn rows(node: &AstNode) -> &[AstNode] {
    match &node.payload {
        Payload::ListOfAst(v) => v,
        _ => panic!("expected a ListOfAst payload, got {:?}", node.payload),
    }
}

#[test]
fn csv_minimal_two_fields() {
    let out = parse_str(csv(), "foo,bar").unwrap();
    assert_eq!(out.len(), 1);
    let csv_node = &out[0];
    let records = rows(csv_node);
    assert_eq!(records.len(), 1);
    let fields = rows(&records[0]);
    let values: Vec<&str> = fields.iter().map(text).collect();
    assert_eq!(values, vec!["foo", "bar"]);
}

#[test]
fn csv_quoted_fields_with_crlf_rows() {
    let input = "\"foo\",\"bar\"\r\n\"1\",\"2\"";
    let out = parse_str(csv(), input).unwrap();
    let records = rows(&out[0]);
    assert_eq!(records.len(), 2);
    let row0: Vec<&str> = rows(&records[0]).iter().map(text).collect();
    let row1: Vec<&str> = rows(&records[1]).iter().map(text).collect();
    assert_eq!(row0, vec!["foo", "bar"]);
    assert_eq!(row1, vec!["1", "2"]);
}

#[test]
fn csv_quoted_field_keeps_embedded_comma_and_escaped_quote() {
    let q = '"';
    let input = format!("{q}a,b{q},{q}say {q}{q}hi{q}{q}{q}");
    let out = parse_str(csv(), &input).unwrap();
    let fields: Vec<&str> = rows(&rows(&out[0])[0]).iter().map(text).collect();
    assert_eq!(fields, vec!["a,b", "say \"hi\""]);
}

#[test]
fn csv_unterminated_quote_is_an_error_at_final_position() {
    let input = "\"foo";
    let err = parse_str(csv(), input).unwrap_err();
    assert!(err.contains("unterminated quoted field"), "{}", err);
    assert!(err.contains("1:5"), "{}", err);
}
