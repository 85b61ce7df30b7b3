//! A small arithmetic-formula grammar demonstrating the precedence-layered
//! production-rule rewriter: parenthesized sub-expressions recurse via
//! [`indirect`], and a flat run of numbers and operators is folded by
//! [`production_rule`] under three precedence layers (right-to-left unary
//! minus, then `*`/`/`, then `+`/`-`).

use pegcomb::ast::{AstNode, Payload};
use pegcomb::combinators::{flat_group, indirect, one_or_more_times, trans, zero_or_more_times};
use pegcomb::context::{MatchStatus, ParserContext};
use pegcomb::kernel::{ParserFn, TransformContext};
use pegcomb::parse_str;
use pegcomb::primitives::object;
use pegcomb::primitives::string::{char_class, number, seq};
use pegcomb::production::{any_operand, is_operator, production_rule, Precedence};
use pegcomb::transformers::{change_class_name, concat, parse_int};
use std::rc::Rc;

fn number_tok() -> ParserFn<()> {
    let body = one_or_more_times(vec![number()]).unwrap();
    trans(body, vec![concat(), parse_int(), change_class_name("Number")])
}

fn operator_tok() -> ParserFn<()> {
    trans(char_class(vec!["+", "-", "*", "/"]), vec![change_class_name("Operator")])
}

fn start() -> ParserFn<AstNode> {
    Rc::new(|mut ctx: ParserContext<'_, AstNode>| {
        ctx.match_status = if ctx.position == 0 { MatchStatus::Matched } else { MatchStatus::Unmatched };
        ctx.length = 0;
        Ok(ctx)
    })
}

fn end() -> ParserFn<AstNode> {
    Rc::new(|mut ctx: ParserContext<'_, AstNode>| {
        ctx.match_status = if ctx.position == ctx.source.len() { MatchStatus::Matched } else { MatchStatus::Unmatched };
        ctx.length = 0;
        Ok(ctx)
    })
}

fn reduced_to_one() -> ParserFn<AstNode> {
    flat_group(vec![start(), object::any::<AstNode>(), end()]).unwrap()
}

fn int_payload(node: &AstNode) -> i64 {
    match &node.payload {
        Payload::Int64(n) => *n,
        other => panic!("expected Int64, got {:?}", other),
    }
}

fn unary_rule() -> ParserFn<AstNode> {
    trans(
        flat_group(vec![is_operator("UnaryOperator", vec!["-"]), any_operand()]).unwrap(),
        vec![Rc::new(|_ctx: &TransformContext, asts: Vec<AstNode>| {
            let n = int_payload(&asts[1]);
            Ok(vec![AstNode::new("Number", Payload::Int64(-n), 0, 0)])
        })],
    )
}

fn mul_rule() -> ParserFn<AstNode> {
    trans(
        flat_group(vec![any_operand(), is_operator("Operator", vec!["*", "/"]), any_operand()]).unwrap(),
        vec![Rc::new(|_ctx: &TransformContext, asts: Vec<AstNode>| {
            let a = int_payload(&asts[0]);
            let b = int_payload(&asts[2]);
            let op = match &asts[1].payload {
                Payload::String(s) => s.clone(),
                other => panic!("expected String operator, got {:?}", other),
            };
            let v = if op == "*" { a * b } else { a / b };
            Ok(vec![AstNode::new("Number", Payload::Int64(v), 0, 0)])
        })],
    )
}

fn add_rule() -> ParserFn<AstNode> {
    trans(
        flat_group(vec![any_operand(), is_operator("Operator", vec!["+", "-"]), any_operand()]).unwrap(),
        vec![Rc::new(|_ctx: &TransformContext, asts: Vec<AstNode>| {
            let a = int_payload(&asts[0]);
            let b = int_payload(&asts[2]);
            let op = match &asts[1].payload {
                Payload::String(s) => s.clone(),
                other => panic!("expected String operator, got {:?}", other),
            };
            let v = if op == "+" { a + b } else { a - b };
            Ok(vec![AstNode::new("Number", Payload::Int64(v), 0, 0)])
        })],
    )
}

fn precedences() -> Vec<Precedence> {
    vec![
        Precedence::rtol(vec![unary_rule()]),
        Precedence::new(vec![mul_rule()]),
        Precedence::new(vec![add_rule()]),
    ]
}

fn unary_minus_tok() -> ParserFn<()> {
    trans(seq("-"), vec![change_class_name("UnaryOperator")])
}

/// `atom := '-'* (Number | '(' expr ')')`. The leading `'-'*` run is left
/// untransformed here — it lands in the flat token stream as raw
/// `UnaryOperator` nodes for [`production_rule`]'s unary layer to fold,
/// wherever an atom occurs (expression start, after a binary operator, or
/// inside parens). Kept a distinct class from the binary `Operator`
/// tokens `operator_tok` emits: collapsing the two would let the unary
/// layer (which runs first and restarts after every rewrite) steal a
/// binary `-` that happens to have an operand to its right. Recursive
/// through [`indirect`] since `expr` is defined in terms of `atom`.
fn atom() -> ParserFn<()> {
    indirect(|| {
        let prefix = zero_or_more_times(vec![unary_minus_tok()]).unwrap();
        let parenthesized = trans(
            flat_group(vec![seq("("), expr(), seq(")")]).unwrap(),
            vec![Rc::new(|_ctx: &TransformContext, asts: Vec<AstNode>| Ok(vec![asts[1].clone()]))],
        );
        let core = pegcomb::combinators::first(vec![number_tok(), parenthesized]).unwrap();
        flat_group(vec![prefix, core]).unwrap()
    })
}

/// A flat run of atoms and operators, folded to a single `Number` node by
/// [`production_rule`] before returning.
fn expr() -> ParserFn<()> {
    indirect(|| {
        let tail = zero_or_more_times(vec![flat_group(vec![operator_tok(), atom()]).unwrap()]).unwrap();
        let body = flat_group(vec![atom(), tail]).unwrap();
        trans(body, vec![production_rule(precedences(), reduced_to_one())])
    })
}

fn eval(input: &str) -> i64 {
    let out = parse_str(expr(), input).unwrap();
    assert_eq!(out.len(), 1);
    int_payload(&out[0])
}

#[test]
fn precedence_across_three_layers_with_parens() {
    assert_eq!(eval("(1*2+3)*(4-5*6)+7"), -123);
}

#[test]
fn unary_minus_chain_is_right_to_left() {
    assert_eq!(eval("----17"), 17);
    assert_eq!(eval("---17"), -17);
}

#[test]
fn plain_left_to_right_addition() {
    assert_eq!(eval("1+2+3"), 6);
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(eval("1+2*3"), 7);
}

#[test]
fn binary_subtraction_is_not_stolen_by_the_unary_layer() {
    assert_eq!(eval("5-2"), 3);
    assert_eq!(eval("-7+(1*2+3)*(4-5*6)"), -137);
}
