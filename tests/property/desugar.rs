// Property tests for the collect pass.
//
// 1. Guard count: a block with N `_!` assignments gets exactly N guards
// 2. Nesting: every block gets its own label, numbered in visit order
// 3. Idempotence: running the pass over its own output changes nothing
// 4. Misplaced `_!` is a diagnostic, never an internal error

#[path = "../integration/common/mod.rs"]
mod common;
use common::*;

use collectsugar::span::Spanned;
use collectsugar::syntax::*;
use collectsugar::{Config, Desugarer};
use proptest::prelude::*;

/// One statement of a generated body.
#[derive(Debug, Clone)]
enum Item {
    /// `_! = f()`
    Collect,
    /// `x = f()`
    Plain,
    /// `collect err { ... }`
    Nested(Vec<Item>),
}

fn arb_items(depth: u32) -> impl Strategy<Value = Vec<Item>> {
    let leaf = prop_oneof![3 => Just(Item::Collect), 1 => Just(Item::Plain)];
    let item = leaf.prop_recursive(depth, 24, 4, |inner| {
        prop_oneof![
            3 => Just(Item::Collect),
            1 => Just(Item::Plain),
            1 => prop::collection::vec(inner, 0..4).prop_map(Item::Nested),
        ]
    });
    prop::collection::vec(item, 0..8)
}

fn lower(items: &[Item], line: &mut u32) -> Vec<Spanned<Stmt>> {
    items
        .iter()
        .map(|item| {
            *line += 1;
            let at = *line;
            match item {
                Item::Collect => collect_call("f", at),
                Item::Plain => assign(name("x", at), call("f", vec![], at), at),
                Item::Nested(inner) => {
                    let body = lower(inner, line);
                    *line += 1;
                    collect(name("err", at), body, at, *line)
                }
            }
        })
        .collect()
}

fn blocks_in(items: &[Item]) -> usize {
    items
        .iter()
        .map(|item| match item {
            Item::Nested(inner) => 1 + blocks_in(inner),
            _ => 0,
        })
        .sum()
}

/// `func f() { var err error; var x int; collect err { <items> } }`
fn wrapped(items: &[Item]) -> File {
    let mut line = 4;
    let body = lower(items, &mut line);
    func_with_err(vec![var("x", "int", 3), collect(name("err", 4), body, 4, line + 1)])
}

fn count_guards(stmts: &[Spanned<Stmt>]) -> usize {
    stmts
        .iter()
        .map(|s| match &s.node {
            Stmt::If { init: None, cond, els: None, .. }
                if matches!(&cond.node, Expr::Operation { op: Operator::Neq, .. }) =>
            {
                1
            }
            Stmt::Block(block) => count_guards(&block.stmts),
            _ => 0,
        })
        .sum()
}

fn collects_in(items: &[Item]) -> usize {
    items
        .iter()
        .map(|item| match item {
            Item::Collect => 1,
            Item::Plain => 0,
            Item::Nested(inner) => collects_in(inner),
        })
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn one_guard_per_placeholder(n in 0usize..24) {
        let items = vec![Item::Collect; n];
        let mut f = wrapped(&items);
        run(&mut f).unwrap();

        let stmts = body(&f, 0);
        prop_assert_eq!(stmts.len(), 4);
        let inner = block_stmts(&stmts[2]);
        prop_assert_eq!(inner.len(), 2 * n);
        for pair in inner.chunks(2) {
            prop_assert!(is_guard(&pair[1], &target("err"), "___collect_end_1"));
        }
        prop_assert_eq!(end_label(&stmts[3]), Some("___collect_end_1"));
    }

    #[test]
    fn every_block_gets_a_label(items in arb_items(4)) {
        let mut f = wrapped(&items);
        let mut desugarer = Desugarer::new(&Config::default());
        desugarer.run(&mut f).unwrap();

        let blocks = 1 + blocks_in(&items);
        prop_assert_eq!(desugarer.labels_issued(), blocks);
        prop_assert_eq!(count_guards(body(&f, 0)), collects_in(&items));

        let func_body = f.funcs().next().unwrap().body.as_ref().unwrap();
        let labels = collectsugar::visit::composers::collect_labels(func_body);
        let mut sorted: Vec<String> = labels.into_iter().collect();
        sorted.sort_by_key(|l| l.trim_start_matches("___collect_end_").parse::<usize>().unwrap_or(0));
        let expected: Vec<String> = (1..=blocks).map(|n| format!("___collect_end_{n}")).collect();
        prop_assert_eq!(sorted, expected);
    }

    #[test]
    fn pass_is_idempotent(items in arb_items(3)) {
        let mut f = wrapped(&items);
        run(&mut f).unwrap();
        let once = f.clone();
        run(&mut f).unwrap();
        prop_assert_eq!(f, once);
    }

    #[test]
    fn stray_placeholder_is_a_diagnostic(items in arb_items(3), stray_at in 0usize..4) {
        let mut line = 4;
        let mut stmts = lower(&items, &mut line);
        let stray = collect_call("g", line + 1);
        let at = stray_at.min(stmts.len());
        stmts.insert(at, stray);
        let mut f = func_with_err(vec![var("x", "int", 3)].into_iter().chain(stmts).collect());

        let (result, seen) = run_collecting(&mut f);
        let err = result.unwrap_err();
        prop_assert!(!err.is_internal());
        prop_assert!(!seen.is_empty());
        prop_assert!(seen.iter().all(|d| d.kind == collectsugar::DiagnosticKind::OutsideCollect));
    }
}
