//! Read-only AST visitor.
//!
//! Implement `Visitor` for an analysis, overriding only the methods you need,
//! and call the matching `walk_*` function inside an override to keep the
//! default recursion. Leaving the walk call out prunes the traversal there.
//!
//! ```ignore
//! use collectsugar::visit::{walk_expr, Visitor};
//!
//! struct NameCounter(usize);
//!
//! impl Visitor for NameCounter {
//!     fn visit_expr(&mut self, expr: &Spanned<Expr>) {
//!         if let Expr::Name(_) = &expr.node {
//!             self.0 += 1;
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//! ```
//!
//! The desugaring pass itself uses a hand-written match, since nearly every
//! arm there carries its own rules.

pub mod composers;

use crate::span::Spanned;
use crate::syntax::*;

// ============================================================================
// Visitor Trait
// ============================================================================

pub trait Visitor: Sized {
    fn visit_file(&mut self, file: &File) {
        walk_file(self, file);
    }

    fn visit_func_decl(&mut self, func: &FuncDecl) {
        walk_func_decl(self, func);
    }

    fn visit_block(&mut self, block: &Spanned<Block>) {
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        walk_expr(self, expr);
    }

    fn visit_field(&mut self, field: &Field) {
        walk_field(self, field);
    }

    /// Names that are not expressions: declared names, labels, field names
    /// and selectors.
    fn visit_name(&mut self, _name: &Name) {}
}

// ============================================================================
// Walk Functions
// ============================================================================

pub fn walk_file<V: Visitor>(v: &mut V, file: &File) {
    for decl in &file.decls {
        match decl {
            Decl::Import(import) => {
                if let Some(name) = &import.local_name {
                    v.visit_name(name);
                }
            }
            Decl::Const(c) => walk_value_decl(v, &c.names, c.ty.as_ref(), c.values.as_ref()),
            Decl::Var(d) => walk_value_decl(v, &d.names, d.ty.as_ref(), d.values.as_ref()),
            Decl::Type(t) => walk_type_decl(v, t),
            Decl::Func(f) => v.visit_func_decl(f),
        }
    }
}

pub fn walk_func_decl<V: Visitor>(v: &mut V, func: &FuncDecl) {
    if let Some(recv) = &func.recv {
        v.visit_field(recv);
    }
    v.visit_name(&func.name);
    walk_func_type(v, &func.ty.node);
    if let Some(body) = &func.body {
        v.visit_block(body);
    }
}

pub fn walk_func_type<V: Visitor>(v: &mut V, ty: &FuncType) {
    for field in ty.params.iter().chain(&ty.results) {
        v.visit_field(field);
    }
}

pub fn walk_field<V: Visitor>(v: &mut V, field: &Field) {
    if let Some(name) = &field.name {
        v.visit_name(name);
    }
    v.visit_expr(&field.ty);
}

pub fn walk_block<V: Visitor>(v: &mut V, block: &Spanned<Block>) {
    for stmt in &block.node.stmts {
        v.visit_stmt(stmt);
    }
}

fn walk_value_decl<V: Visitor>(
    v: &mut V,
    names: &[Name],
    ty: Option<&Spanned<Expr>>,
    values: Option<&Spanned<Expr>>,
) {
    for name in names {
        v.visit_name(name);
    }
    if let Some(ty) = ty {
        v.visit_expr(ty);
    }
    if let Some(values) = values {
        v.visit_expr(values);
    }
}

fn walk_type_decl<V: Visitor>(v: &mut V, decl: &TypeDecl) {
    v.visit_name(&decl.name);
    v.visit_expr(&decl.ty);
}

pub fn walk_stmt<V: Visitor>(v: &mut V, stmt: &Spanned<Stmt>) {
    match &stmt.node {
        Stmt::Empty => {}
        Stmt::Labeled { label, stmt } => {
            v.visit_name(label);
            v.visit_stmt(stmt);
        }
        Stmt::Block(block) => {
            for stmt in &block.stmts {
                v.visit_stmt(stmt);
            }
        }
        Stmt::Expr(x) | Stmt::Call { call: x, .. } | Stmt::Return(Some(x)) => v.visit_expr(x),
        Stmt::Return(None) => {}
        Stmt::Send { chan, value } => {
            v.visit_expr(chan);
            v.visit_expr(value);
        }
        Stmt::Decl(decls) => {
            for decl in decls {
                match decl {
                    LocalDecl::Const(c) => walk_value_decl(v, &c.names, c.ty.as_ref(), c.values.as_ref()),
                    LocalDecl::Var(d) => walk_value_decl(v, &d.names, d.ty.as_ref(), d.values.as_ref()),
                    LocalDecl::Type(t) => walk_type_decl(v, t),
                }
            }
        }
        Stmt::Assign { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            if let Some(rhs) = rhs {
                v.visit_expr(rhs);
            }
        }
        Stmt::Branch { label, .. } => {
            if let Some(label) = label {
                v.visit_name(label);
            }
        }
        Stmt::If { init, cond, then, els } => {
            if let Some(init) = init {
                v.visit_stmt(init);
            }
            v.visit_expr(cond);
            v.visit_block(then);
            if let Some(els) = els {
                v.visit_stmt(els);
            }
        }
        Stmt::For { init, cond, post, body } => {
            if let Some(init) = init {
                v.visit_stmt(init);
            }
            if let Some(cond) = cond {
                v.visit_expr(cond);
            }
            if let Some(post) = post {
                v.visit_stmt(post);
            }
            v.visit_block(body);
        }
        Stmt::Switch { init, tag, body } => {
            if let Some(init) = init {
                v.visit_stmt(init);
            }
            if let Some(tag) = tag {
                v.visit_expr(tag);
            }
            for clause in body {
                if let Some(cases) = &clause.cases {
                    v.visit_expr(cases);
                }
                for stmt in &clause.body {
                    v.visit_stmt(stmt);
                }
            }
        }
        Stmt::Select { body } => {
            for clause in body {
                if let Some(comm) = &clause.comm {
                    v.visit_stmt(comm);
                }
                for stmt in &clause.body {
                    v.visit_stmt(stmt);
                }
            }
        }
        Stmt::Collect { target, body } => {
            v.visit_expr(target);
            v.visit_block(body);
        }
        Stmt::Range { lhs, x, .. } => {
            if let Some(lhs) = lhs {
                v.visit_expr(lhs);
            }
            v.visit_expr(x);
        }
    }
}

pub fn walk_expr<V: Visitor>(v: &mut V, expr: &Spanned<Expr>) {
    match &expr.node {
        // Leaves
        Expr::Bad | Expr::Name(_) | Expr::BasicLit { .. } => {}

        Expr::CompositeLit { ty, elems } => {
            if let Some(ty) = ty {
                v.visit_expr(ty);
            }
            for elem in elems {
                v.visit_expr(elem);
            }
        }
        Expr::KeyValue { key, value } | Expr::MapType { key, value } => {
            v.visit_expr(key);
            v.visit_expr(value);
        }
        Expr::Paren(x) => v.visit_expr(x),
        Expr::FuncLit { ty, body } => {
            walk_func_type(v, &ty.node);
            v.visit_block(body);
        }
        Expr::Selector { x, sel } => {
            v.visit_expr(x);
            v.visit_name(sel);
        }
        Expr::Index { x, index } => {
            v.visit_expr(x);
            v.visit_expr(index);
        }
        Expr::Slice { x, low, high, max } => {
            v.visit_expr(x);
            for bound in [low, high, max].into_iter().flatten() {
                v.visit_expr(bound);
            }
        }
        Expr::Assert { x, ty } => {
            v.visit_expr(x);
            if let Some(ty) = ty {
                v.visit_expr(ty);
            }
        }
        Expr::TypeSwitchGuard { lhs, x } => {
            if let Some(lhs) = lhs {
                v.visit_name(lhs);
            }
            v.visit_expr(x);
        }
        Expr::Operation { x, y, .. } => {
            v.visit_expr(x);
            if let Some(y) = y {
                v.visit_expr(y);
            }
        }
        Expr::Call { fun, args, .. } => {
            v.visit_expr(fun);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::List(elems) => {
            for elem in elems {
                v.visit_expr(elem);
            }
        }
        Expr::ArrayType { len, elem } => {
            if let Some(len) = len {
                v.visit_expr(len);
            }
            v.visit_expr(elem);
        }
        Expr::SliceType { elem } | Expr::DotsType { elem } | Expr::ChanType { elem, .. } => v.visit_expr(elem),
        Expr::StructType { fields: members } | Expr::InterfaceType { methods: members } => {
            for member in members {
                v.visit_field(member);
            }
        }
        Expr::FuncType(ty) => walk_func_type(v, ty),
    }
}
