//! Name resolution of collect targets across the constructs that declare names.

mod common;
use common::*;

use collectsugar::span::Spanned;
use collectsugar::syntax::*;
use collectsugar::DiagnosticKind;

fn undeclared_name(result: Result<(), collectsugar::SugarError>) -> Option<String> {
    let err = result.err()?;
    match &err.diagnostic()?.kind {
        DiagnosticKind::UndeclaredIdentifier { name } => Some(name.clone()),
        _ => None,
    }
}

fn guarded_collect(target_name: &str, line: u32) -> Spanned<Stmt> {
    collect(name(target_name, line), vec![collect_call("f", line + 1)], line, line + 2)
}

#[test]
fn if_init_definition_is_visible_in_branches_only() {
    let if_stmt = Spanned::new(
        Stmt::If {
            init: Some(Box::new(define(name("ierr", 3), call("check", vec![], 3), 3))),
            cond: name("ok", 3),
            then: block(vec![guarded_collect("ierr", 4)], 3, 7),
            els: None,
        },
        pos(3),
    );
    let mut ok = func_with_err(vec![if_stmt.clone()]);
    run(&mut ok).unwrap();

    let mut bad = func_with_err(vec![if_stmt, guarded_collect("ierr", 8)]);
    assert_eq!(undeclared_name(run(&mut bad)), Some("ierr".to_string()));
}

#[test]
fn type_switch_binding_is_a_target() {
    let guard = Spanned::new(
        Expr::TypeSwitchGuard { lhs: Some(ident("v", 4)), x: Box::new(name("x", 4)) },
        pos(4),
    );
    let switch = Spanned::new(
        Stmt::Switch {
            init: None,
            tag: Some(guard),
            body: vec![CaseClause { cases: Some(name("error", 5)), body: vec![guarded_collect("v", 6)], pos: pos(5) }],
        },
        pos(4),
    );
    let mut f = func_with_err(vec![var("x", "any", 3), switch]);
    run(&mut f).unwrap();
}

#[test]
fn range_definition_is_a_target_inside_the_loop() {
    let range = Spanned::new(
        Stmt::Range { lhs: Some(list(vec![name("_", 4), name("e", 4)], 4)), define: true, x: name("errs", 4) },
        pos(4),
    );
    let for_stmt = Spanned::new(
        Stmt::For { init: Some(Box::new(range)), cond: None, post: None, body: block(vec![guarded_collect("e", 5)], 4, 8) },
        pos(4),
    );
    let mut ok = func_with_err(vec![var("errs", "errlist", 3), for_stmt.clone()]);
    run(&mut ok).unwrap();

    let mut bad = func_with_err(vec![var("errs", "errlist", 3), for_stmt, guarded_collect("e", 9)]);
    assert_eq!(undeclared_name(run(&mut bad)), Some("e".to_string()));
}

#[test]
fn blank_identifier_is_never_a_target() {
    let mut f = func_with_err(vec![
        define(list(vec![name("_", 3), name("x", 3)], 3), call("f", vec![], 3), 3),
        guarded_collect("_", 4),
    ]);
    assert_eq!(undeclared_name(run(&mut f)), Some("_".to_string()));
}

#[test]
fn func_literal_parameter_is_scoped_to_the_literal() {
    let lit = Spanned::new(
        Expr::FuncLit {
            ty: Spanned::new(FuncType { params: vec![param("cerr", "error", 3)], results: vec![] }, pos(3)),
            body: block(vec![guarded_collect("cerr", 4)], 3, 7),
        },
        pos(3),
    );
    let lit_stmt = Spanned::new(Stmt::Expr(lit), pos(3));

    let mut ok = func_with_err(vec![lit_stmt.clone()]);
    run(&mut ok).unwrap();

    let mut bad = func_with_err(vec![lit_stmt, guarded_collect("cerr", 8)]);
    assert_eq!(undeclared_name(run(&mut bad)), Some("cerr".to_string()));
}

#[test]
fn receiver_field_is_a_target() {
    let recv = Field { name: Some(ident("s", 1)), ty: name("state", 1) };
    let mut f = file(vec![Decl::Func(FuncDecl {
        recv: Some(recv),
        name: ident("run", 1),
        ty: Spanned::new(FuncType::default(), pos(1)),
        body: Some(block(
            vec![collect(selector(name("s", 2), "err", 2), vec![collect_call("f", 3)], 2, 4)],
            1,
            5,
        )),
    })]);
    run(&mut f).unwrap();
}

#[test]
fn select_clause_definition_is_a_target_in_its_clause() {
    let recv = Spanned::new(
        Expr::Operation { op: Operator::Recv, x: Box::new(name("errc", 4)), y: None },
        pos(4),
    );
    let clause = CommClause {
        comm: Some(Box::new(define(name("got", 4), recv, 4))),
        body: vec![guarded_collect("got", 5)],
        pos: pos(4),
    };
    let mut f = func_with_err(vec![
        var("errc", "chan", 2),
        Spanned::new(Stmt::Select { body: vec![clause] }, pos(3)),
    ]);
    run(&mut f).unwrap();
}

#[test]
fn inner_declaration_shadows_for_the_block() {
    // The inner `err` is a different variable, but either way it resolves.
    let inner = Spanned::new(
        Stmt::Block(Block::new(vec![var("err", "error", 4), guarded_collect("err", 5)], pos(8))),
        pos(3),
    );
    let mut f = func_with_err(vec![inner, guarded_collect("err", 9)]);
    run(&mut f).unwrap();
}

#[test]
fn target_must_be_declared_before_the_block() {
    let mut f = func_with_err(vec![guarded_collect("late", 3), var("late", "error", 6)]);
    assert_eq!(undeclared_name(run(&mut f)), Some("late".to_string()));
}
