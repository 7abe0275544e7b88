//! Small visitors for common questions about a tree.

use std::collections::HashSet;

use crate::span::Spanned;
use crate::syntax::*;
use crate::visit::{walk_block, walk_expr, walk_stmt, Visitor};

// ============================================================================
// Detection
// ============================================================================

/// True when a function has anything the collect pass must look at: a collect
/// statement, or `_!` anywhere in its receiver, signature or body.
pub fn mentions_collect(func: &FuncDecl) -> bool {
    #[derive(Default)]
    struct Finder {
        found: bool,
    }

    impl Visitor for Finder {
        fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
            if self.found {
                return;
            }
            if matches!(stmt.node, Stmt::Collect { .. }) {
                self.found = true;
                return;
            }
            walk_stmt(self, stmt);
        }

        fn visit_expr(&mut self, expr: &Spanned<Expr>) {
            if self.found {
                return;
            }
            if matches!(&expr.node, Expr::Name(n) if is_placeholder(n)) {
                self.found = true;
                return;
            }
            walk_expr(self, expr);
        }

        fn visit_name(&mut self, name: &Name) {
            if is_placeholder(&name.node) {
                self.found = true;
            }
        }
    }

    let mut finder = Finder::default();
    finder.visit_func_decl(func);
    finder.found
}

// ============================================================================
// Counting / Collecting
// ============================================================================

/// Count statements matching a predicate across every function in a file.
pub fn count_stmts_in_file<F>(file: &File, predicate: F) -> usize
where
    F: Fn(&Stmt) -> bool,
{
    struct Counter<F> {
        predicate: F,
        count: usize,
    }

    impl<F> Visitor for Counter<F>
    where
        F: Fn(&Stmt) -> bool,
    {
        fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
            if (self.predicate)(&stmt.node) {
                self.count += 1;
            }
            walk_stmt(self, stmt);
        }
    }

    let mut counter = Counter { predicate, count: 0 };
    counter.visit_file(file);
    counter.count
}

/// Every label defined in a block, nested function literals included.
pub fn collect_labels(block: &Spanned<Block>) -> HashSet<String> {
    #[derive(Default)]
    struct Labels {
        names: HashSet<String>,
    }

    impl Visitor for Labels {
        fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
            if let Stmt::Labeled { label, .. } = &stmt.node {
                self.names.insert(label.node.clone());
            }
            walk_stmt(self, stmt);
        }
    }

    let mut labels = Labels::default();
    walk_block(&mut labels, block);
    labels.names
}
