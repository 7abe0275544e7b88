#![allow(dead_code)]

//! Tree builders shared by the integration tests.
//!
//! Every builder takes the line it sits on; columns are always 1. That is
//! enough to tell diagnostics and synthesized statements apart.

use std::process::Command;

use collectsugar::span::{Pos, Spanned};
use collectsugar::syntax::*;
use collectsugar::{Config, Diagnostic, SugarError};

pub fn collectsugar() -> Command {
    Command::new(env!("CARGO_BIN_EXE_collectsugar"))
}

pub fn pos(line: u32) -> Pos {
    Pos::new(line, 1)
}

pub fn ident(s: &str, line: u32) -> Name {
    Spanned::new(s.to_string(), pos(line))
}

pub fn name(s: &str, line: u32) -> Spanned<Expr> {
    Expr::name(s, pos(line))
}

pub fn placeholder(line: u32) -> Spanned<Expr> {
    name(PLACEHOLDER, line)
}

/// `fun(args...)`
pub fn call(fun: &str, args: Vec<Spanned<Expr>>, line: u32) -> Spanned<Expr> {
    Spanned::new(Expr::Call { fun: Box::new(name(fun, line)), args, has_dots: false }, pos(line))
}

pub fn list(items: Vec<Spanned<Expr>>, line: u32) -> Spanned<Expr> {
    Spanned::new(Expr::List(items), pos(line))
}

/// `x.sel`
pub fn selector(x: Spanned<Expr>, sel: &str, line: u32) -> Spanned<Expr> {
    Spanned::new(Expr::Selector { x: Box::new(x), sel: ident(sel, line) }, pos(line))
}

/// `x[index]`
pub fn index(x: Spanned<Expr>, index: Spanned<Expr>, line: u32) -> Spanned<Expr> {
    Spanned::new(Expr::Index { x: Box::new(x), index: Box::new(index) }, pos(line))
}

pub fn assign(lhs: Spanned<Expr>, rhs: Spanned<Expr>, line: u32) -> Spanned<Stmt> {
    Spanned::new(Stmt::Assign { op: AssignOp::Assign, lhs, rhs: Some(rhs) }, pos(line))
}

pub fn define(lhs: Spanned<Expr>, rhs: Spanned<Expr>, line: u32) -> Spanned<Stmt> {
    Spanned::new(Stmt::Assign { op: AssignOp::Define, lhs, rhs: Some(rhs) }, pos(line))
}

/// `_! = f()`
pub fn collect_call(fun: &str, line: u32) -> Spanned<Stmt> {
    assign(placeholder(line), call(fun, vec![], line), line)
}

pub fn block(stmts: Vec<Spanned<Stmt>>, open: u32, close: u32) -> Spanned<Block> {
    Spanned::new(Block::new(stmts, pos(close)), pos(open))
}

/// `collect target { body }` opening on `line` and closing on `close`.
pub fn collect(target: Spanned<Expr>, body: Vec<Spanned<Stmt>>, line: u32, close: u32) -> Spanned<Stmt> {
    Spanned::new(Stmt::Collect { target, body: block(body, line, close) }, pos(line))
}

/// `var <name> <ty>`
pub fn var(name_: &str, ty: &str, line: u32) -> Spanned<Stmt> {
    Spanned::new(
        Stmt::Decl(vec![LocalDecl::Var(VarDecl {
            names: vec![ident(name_, line)],
            ty: Some(name(ty, line)),
            values: None,
        })]),
        pos(line),
    )
}

pub fn param(name_: &str, ty: &str, line: u32) -> Field {
    Field { name: Some(ident(name_, line)), ty: name(ty, line) }
}

pub fn func(name_: &str, params: Vec<Field>, body: Vec<Spanned<Stmt>>) -> Decl {
    Decl::Func(FuncDecl {
        recv: None,
        name: ident(name_, 1),
        ty: Spanned::new(FuncType { params, results: vec![] }, pos(1)),
        body: Some(block(body, 1, 100)),
    })
}

pub fn file(decls: Vec<Decl>) -> File {
    File { package: ident("main", 1), decls }
}

/// `package main; func f() { var err error; <body> }`
pub fn func_with_err(body: Vec<Spanned<Stmt>>) -> File {
    let mut stmts = vec![var("err", "error", 2)];
    stmts.extend(body);
    file(vec![func("f", vec![], stmts)])
}

/// Statements of the `n`th function body.
pub fn body(file: &File, n: usize) -> &[Spanned<Stmt>] {
    let func = file.funcs().nth(n).expect("no such function");
    &func.body.as_ref().expect("function has no body").node.stmts
}

/// True for `if <target> != nil { goto <label> }`.
pub fn is_guard(stmt: &Spanned<Stmt>, target: &Expr, label: &str) -> bool {
    let Stmt::If { init: None, cond, then, els: None } = &stmt.node else {
        return false;
    };
    let Expr::Operation { op: Operator::Neq, x, y: Some(y) } = &cond.node else {
        return false;
    };
    if &x.node != target || y.node.as_name() != Some("nil") || then.node.stmts.len() != 1 {
        return false;
    }
    matches!(
        &then.node.stmts[0].node,
        Stmt::Branch { tok: BranchTok::Goto, label: Some(l) } if l.node == label
    )
}

/// The label of `label: ;`.
pub fn end_label(stmt: &Spanned<Stmt>) -> Option<&str> {
    match &stmt.node {
        Stmt::Labeled { label, stmt } if stmt.node == Stmt::Empty => Some(&label.node),
        _ => None,
    }
}

pub fn block_stmts(stmt: &Spanned<Stmt>) -> &[Spanned<Stmt>] {
    match &stmt.node {
        Stmt::Block(block) => &block.stmts,
        other => panic!("expected block, got {other:?}"),
    }
}

pub fn target(n: &str) -> Expr {
    Expr::Name(n.to_string())
}

pub fn run(file: &mut File) -> Result<(), SugarError> {
    collectsugar::desugar_file(file, &Config::default())
}

/// Run with a handler and return every diagnostic alongside the result.
pub fn run_collecting(file: &mut File) -> (Result<(), SugarError>, Vec<Diagnostic>) {
    let mut seen = Vec::new();
    let result = collectsugar::desugar_file_with_handler(file, &Config::default(), |d| seen.push(d.clone()));
    (result, seen)
}
