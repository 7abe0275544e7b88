#![no_main]
use arbitrary::Arbitrary;
use collectsugar::span::{Pos, Spanned};
use collectsugar::syntax::*;
use libfuzzer_sys::fuzz_target;

/// Fuzzing-friendly statement shapes around the placeholder
#[derive(Arbitrary, Debug)]
enum FuzzStmt {
    AssignPlaceholder,
    AssignPair,
    DefinePlaceholder,
    AssignName,
    IndexPlaceholder,
    Collect { target: FuzzTarget, body: Vec<FuzzStmt> },
    Block(Vec<FuzzStmt>),
    IfInit(Box<FuzzStmt>),
    Closure(Vec<FuzzStmt>),
}

#[derive(Arbitrary, Debug)]
enum FuzzTarget {
    Err,
    Undeclared,
    Placeholder,
    Call,
}

fn p(line: u32) -> Pos {
    Pos::new(line, 1)
}

fn call(line: u32) -> Spanned<Expr> {
    Spanned::new(Expr::Call { fun: Box::new(Expr::name("f", p(line))), args: vec![], has_dots: false }, p(line))
}

fn assign(op: AssignOp, lhs: Spanned<Expr>, line: u32) -> Spanned<Stmt> {
    Spanned::new(Stmt::Assign { op, lhs, rhs: Some(call(line)) }, p(line))
}

fn block(stmts: &[FuzzStmt], line: &mut u32) -> Spanned<Block> {
    let pos = p(*line);
    let stmts = stmts.iter().map(|s| lower(s, line)).collect();
    Spanned::new(Block::new(stmts, p(*line)), pos)
}

fn lower(stmt: &FuzzStmt, line: &mut u32) -> Spanned<Stmt> {
    *line += 1;
    let l = *line;
    match stmt {
        FuzzStmt::AssignPlaceholder => assign(AssignOp::Assign, Expr::name("_!", p(l)), l),
        FuzzStmt::AssignPair => assign(
            AssignOp::Assign,
            Spanned::new(Expr::List(vec![Expr::name("x", p(l)), Expr::name("_!", p(l))]), p(l)),
            l,
        ),
        FuzzStmt::DefinePlaceholder => assign(AssignOp::Define, Expr::name("_!", p(l)), l),
        FuzzStmt::AssignName => assign(AssignOp::Assign, Expr::name("x", p(l)), l),
        FuzzStmt::IndexPlaceholder => assign(
            AssignOp::Assign,
            Spanned::new(Expr::Index { x: Box::new(Expr::name("m", p(l))), index: Box::new(Expr::name("_!", p(l))) }, p(l)),
            l,
        ),
        FuzzStmt::Collect { target, body } => {
            let target = match target {
                FuzzTarget::Err => Expr::name("err", p(l)),
                FuzzTarget::Undeclared => Expr::name("nope", p(l)),
                FuzzTarget::Placeholder => Expr::name("_!", p(l)),
                FuzzTarget::Call => call(l),
            };
            Spanned::new(Stmt::Collect { target, body: block(body, line) }, p(l))
        }
        FuzzStmt::Block(stmts) => Spanned::new(Stmt::Block(block(stmts, line).node), p(l)),
        FuzzStmt::IfInit(init) => Spanned::new(
            Stmt::If {
                init: Some(Box::new(lower(init, line))),
                cond: Expr::name("ok", p(l)),
                then: block(&[], line),
                els: None,
            },
            p(l),
        ),
        FuzzStmt::Closure(stmts) => Spanned::new(
            Stmt::Expr(Spanned::new(
                Expr::FuncLit { ty: Spanned::new(FuncType::default(), p(l)), body: block(stmts, line) },
                p(l),
            )),
            p(l),
        ),
    }
}

fuzz_target!(|input: Vec<FuzzStmt>| {
    let mut line = 1;
    let mut stmts = vec![Spanned::new(
        Stmt::Decl(vec![LocalDecl::Var(VarDecl {
            names: vec![Spanned::new("err".to_string(), p(1))],
            ty: Some(Expr::name("error", p(1))),
            values: None,
        })]),
        p(1),
    )];
    stmts.extend(input.iter().map(|s| lower(s, &mut line)));

    let mut file = File {
        package: Spanned::new("main".to_string(), p(1)),
        decls: vec![Decl::Func(FuncDecl {
            recv: None,
            name: Spanned::new("f".to_string(), p(1)),
            ty: Spanned::new(FuncType::default(), p(1)),
            body: Some(Spanned::new(Block::new(stmts, p(line + 1)), p(1))),
        })],
    };

    // Diagnostics are fine; internal errors are bugs.
    let config = collectsugar::Config::default();
    let result = collectsugar::desugar_file_with_handler(&mut file, &config, |_| {});
    assert!(!matches!(result, Err(ref e) if e.is_internal()), "internal error: {result:?}");
});
