//! Statement rewriting.
//!
//! Every statement walker returns the statements that must follow it in the
//! enclosing list: the guard after an assignment that accepted `_!`, or the
//! end label after an expanded collect block. Slots that hold exactly one
//! statement (`if` init, `for` post, ...) deal with those themselves.

use std::mem;

use tracing::{debug, trace};

use crate::diagnostics::{DiagnosticKind, SugarError};
use crate::span::{Pos, Spanned};
use crate::syntax::{
    is_placeholder, AssignOp, Block, ConstDecl, Expr, LocalDecl, Name, Operator, Stmt, TypeDecl, VarDecl,
};

use super::rules::Rules;
use super::targets::CollectFrame;
use super::Desugarer;

impl Desugarer<'_> {
    /// Rewrite a statement list, splicing each statement's followers in
    /// right after it. On error the list keeps every statement it had.
    pub(crate) fn stmt_list(&mut self, list: &mut Vec<Spanned<Stmt>>, rules: Rules) -> Result<(), SugarError> {
        let mut i = 0;
        while i < list.len() {
            let followers = self.stmt(&mut list[i], rules)?;
            let n = followers.len();
            list.splice(i + 1..i + 1, followers);
            i += 1 + n;
        }
        Ok(())
    }

    pub(crate) fn stmt(&mut self, stmt: &mut Spanned<Stmt>, rules: Rules) -> Result<Vec<Spanned<Stmt>>, SugarError> {
        let (hoisted, followers) = self.rewrite(stmt, rules)?;
        if !hoisted.is_empty() {
            hoist_init(stmt, hoisted);
        }
        Ok(followers)
    }

    /// Returns the guards an `if`/`for`/`switch` init produced, still to be
    /// hoisted, and the statement's followers.
    fn rewrite(&mut self, stmt: &mut Spanned<Stmt>, rules: Rules) -> Result<(Vec<Spanned<Stmt>>, Vec<Spanned<Stmt>>), SugarError> {
        let pos = stmt.pos;
        let mut hoisted = Vec::new();
        let mut expanded = false;

        let followers = match &mut stmt.node {
            Stmt::Empty | Stmt::Branch { .. } => Vec::new(),

            Stmt::Labeled { label, stmt: inner } => {
                self.scopes.declare(label)?;
                // The label has to stay on the statement it names, so hoisting
                // happens out here.
                let (inner_hoisted, followers) = self.rewrite(inner, rules)?;
                hoisted = inner_hoisted;
                followers
            }

            Stmt::Block(block) => {
                self.scopes.open();
                self.stmt_list(&mut block.stmts, rules)?;
                self.scopes.close()?;
                Vec::new()
            }

            Stmt::Expr(x) => {
                self.expr(x, rules.as_operand())?;
                Vec::new()
            }

            Stmt::Send { chan, value } => {
                self.expr(chan, rules.as_operand())?;
                self.expr(value, rules.as_operand())?;
                Vec::new()
            }

            Stmt::Decl(decls) => {
                for decl in decls {
                    match decl {
                        LocalDecl::Const(c) => self.const_decl(c, rules)?,
                        LocalDecl::Var(v) => self.var_decl(v, rules)?,
                        LocalDecl::Type(t) => self.type_decl(t, rules)?,
                    }
                }
                Vec::new()
            }

            Stmt::Assign { op, lhs, rhs } => self.assign(*op, lhs, rhs.as_mut(), pos, rules)?,

            Stmt::Call { call, .. } => {
                self.expr(call, rules.as_operand())?;
                Vec::new()
            }

            Stmt::Return(results) => {
                if let Some(results) = results {
                    self.expr(results, rules.as_operand())?;
                }
                Vec::new()
            }

            Stmt::If { init, cond, then, els } => {
                self.scopes.open();
                if let Some(init) = init {
                    hoisted = self.stmt(init, rules)?;
                }
                self.expr(cond, rules.as_operand())?;
                self.block(then, rules)?;
                if let Some(els) = els {
                    self.single(els, rules)?;
                }
                self.scopes.close()?;
                Vec::new()
            }

            Stmt::For { init, cond, post, body } => {
                self.scopes.open();
                let mut body_guards = Vec::new();
                if let Some(init) = init {
                    let guards = self.stmt(init, rules)?;
                    if matches!(init.node, Stmt::Range { .. }) {
                        body_guards = guards;
                    } else {
                        hoisted = guards;
                    }
                }
                if let Some(cond) = cond {
                    self.expr(cond, rules.as_operand())?;
                }
                if let Some(post) = post {
                    let guards = self.stmt(post, rules)?;
                    if !guards.is_empty() {
                        self.report(DiagnosticKind::PlaceholderInPost, post.pos)?;
                    }
                }
                self.block(body, rules)?;
                if !body_guards.is_empty() {
                    // Re-check on every iteration, before the body runs.
                    body.node.stmts.splice(0..0, body_guards);
                }
                self.scopes.close()?;
                Vec::new()
            }

            Stmt::Switch { init, tag, body } => {
                self.scopes.open();
                if let Some(init) = init {
                    hoisted = self.stmt(init, rules)?;
                }
                let mut type_switch = false;
                if let Some(tag) = tag {
                    self.expr(tag, rules.as_operand())?;
                    if let Expr::TypeSwitchGuard { lhs, .. } = &tag.node {
                        type_switch = true;
                        if let Some(binding) = lhs {
                            self.scopes.declare(binding)?;
                        }
                    }
                }
                for clause in body {
                    if let Some(cases) = &mut clause.cases {
                        let case_rules = if type_switch { rules.as_operand().as_type() } else { rules.as_operand() };
                        self.expr(cases, case_rules)?;
                    }
                    self.scopes.open();
                    self.stmt_list(&mut clause.body, rules)?;
                    self.scopes.close()?;
                }
                self.scopes.close()?;
                Vec::new()
            }

            Stmt::Select { body } => {
                for clause in body {
                    self.scopes.open();
                    let guards = match &mut clause.comm {
                        Some(comm) => self.stmt(comm, rules)?,
                        None => Vec::new(),
                    };
                    self.stmt_list(&mut clause.body, rules)?;
                    if !guards.is_empty() {
                        clause.body.splice(0..0, guards);
                    }
                    self.scopes.close()?;
                }
                Vec::new()
            }

            Stmt::Collect { target, body } => match self.collect(target, body, rules)? {
                Some(label) => {
                    expanded = true;
                    vec![Stmt::empty_labeled(label, body.node.rbrace)]
                }
                None => Vec::new(),
            },

            Stmt::Range { lhs, define, x } => {
                self.expr(x, rules.as_operand())?;
                match lhs {
                    Some(lhs) if *define => {
                        self.pending = false;
                        self.expr(lhs, rules.as_lhs().in_definition())?;
                        self.declare_lhs(lhs)?;
                        Vec::new()
                    }
                    Some(lhs) => self.assign_lhs(lhs, pos, rules)?,
                    None => Vec::new(),
                }
            }
        };

        if expanded {
            if let Stmt::Collect { body, .. } = mem::take(&mut stmt.node) {
                stmt.node = Stmt::Block(body.node);
            }
        }
        Ok((hoisted, followers))
    }

    /// Walk a statement in a slot that holds exactly one statement.
    fn single(&mut self, stmt: &mut Spanned<Stmt>, rules: Rules) -> Result<(), SugarError> {
        let followers = self.stmt(stmt, rules)?;
        if !followers.is_empty() {
            return Err(SugarError::internal(format!(
                "statement at {} produced {} followers in a single-statement slot",
                stmt.pos,
                followers.len()
            )));
        }
        Ok(())
    }

    /// Rewrite a block in its own scope.
    fn block(&mut self, block: &mut Spanned<Block>, rules: Rules) -> Result<(), SugarError> {
        self.scopes.open();
        self.stmt_list(&mut block.node.stmts, rules)?;
        self.scopes.close()
    }

    fn assign(
        &mut self,
        op: AssignOp,
        lhs: &mut Spanned<Expr>,
        rhs: Option<&mut Spanned<Expr>>,
        pos: Pos,
        rules: Rules,
    ) -> Result<Vec<Spanned<Stmt>>, SugarError> {
        if op == AssignOp::Define {
            self.pending = false;
            self.expr(lhs, rules.as_lhs().in_definition())?;
            if let Some(rhs) = rhs {
                self.expr(rhs, rules.as_operand())?;
            }
            self.declare_lhs(lhs)?;
            return Ok(Vec::new());
        }

        let guards = self.assign_lhs(lhs, pos, rules)?;
        if let Some(rhs) = rhs {
            self.expr(rhs, rules.as_operand())?;
        }
        Ok(guards)
    }

    /// Walk a plain assignment's left side. Returns the guard when a `_!` was
    /// accepted there.
    fn assign_lhs(&mut self, lhs: &mut Spanned<Expr>, pos: Pos, rules: Rules) -> Result<Vec<Spanned<Stmt>>, SugarError> {
        self.pending = false;
        self.expr(lhs, rules.as_lhs())?;
        if !mem::take(&mut self.pending) {
            return Ok(Vec::new());
        }
        let frame = self.targets.current()?;
        trace!(label = %frame.label, %pos, "guarding assignment");
        Ok(vec![guard(frame, &self.zero_value, pos)])
    }

    fn declare_lhs(&mut self, lhs: &Spanned<Expr>) -> Result<(), SugarError> {
        match &lhs.node {
            Expr::Name(name) => self.scopes.declare(&Spanned::new(name.clone(), lhs.pos)),
            Expr::List(elems) => elems.iter().try_for_each(|e| self.declare_lhs(e)),
            _ => Ok(()),
        }
    }

    /// Check the target, then rewrite the body with the target on the stack.
    /// Returns the end label when the block should be expanded.
    fn collect(
        &mut self,
        target: &Spanned<Expr>,
        body: &mut Spanned<Block>,
        rules: Rules,
    ) -> Result<Option<String>, SugarError> {
        let label = self.labels.next_label();
        if !self.check_target(target)? {
            return Ok(None);
        }
        trace!(%label, pos = %target.pos, "entering collect block");

        self.targets.push(CollectFrame { target: target.clone(), label: label.clone() });
        self.scopes.open();
        self.stmt_list(&mut body.node.stmts, rules.in_collector())?;
        self.scopes.close()?;
        self.targets.pop()?;

        debug!(%label, "expanded collect block");
        Ok(Some(label))
    }

    fn check_target(&mut self, target: &Spanned<Expr>) -> Result<bool, SugarError> {
        let Some(root) = target.node.root_name() else {
            self.report(DiagnosticKind::InvalidTarget, target.pos)?;
            return Ok(false);
        };
        if is_placeholder(root) {
            self.report(DiagnosticKind::PlaceholderAsTarget, target.pos)?;
            return Ok(false);
        }
        if !self.scopes.is_declared(root) {
            let name = root.to_string();
            self.report(DiagnosticKind::UndeclaredIdentifier { name }, target.pos)?;
            return Ok(false);
        }
        Ok(true)
    }

    pub(crate) fn const_decl(&mut self, decl: &mut ConstDecl, rules: Rules) -> Result<(), SugarError> {
        self.declared_names(&decl.names)?;
        if let Some(ty) = &mut decl.ty {
            self.expr(ty, rules.as_type())?;
        }
        if let Some(values) = &mut decl.values {
            self.expr(values, rules.as_operand())?;
        }
        decl.names.iter().try_for_each(|n| self.scopes.declare(n))
    }

    pub(crate) fn var_decl(&mut self, decl: &mut VarDecl, rules: Rules) -> Result<(), SugarError> {
        self.declared_names(&decl.names)?;
        if let Some(ty) = &mut decl.ty {
            self.expr(ty, rules.as_type())?;
        }
        if let Some(values) = &mut decl.values {
            self.expr(values, rules.as_operand())?;
        }
        decl.names.iter().try_for_each(|n| self.scopes.declare(n))
    }

    pub(crate) fn type_decl(&mut self, decl: &mut TypeDecl, rules: Rules) -> Result<(), SugarError> {
        self.declared_names(std::slice::from_ref(&decl.name))?;
        // Declared first so the type may refer to itself.
        self.scopes.declare(&decl.name)?;
        self.expr(&mut decl.ty, rules.as_type())
    }

    pub(crate) fn declared_names(&mut self, names: &[Name]) -> Result<(), SugarError> {
        for name in names {
            if is_placeholder(&name.node) {
                self.report(DiagnosticKind::DeclaredPlaceholder, name.pos)?;
            }
        }
        Ok(())
    }
}

/// `if <target> != <zero> { goto <label> }`
fn guard(frame: &CollectFrame, zero_value: &str, pos: Pos) -> Spanned<Stmt> {
    let cond = Expr::Operation {
        op: Operator::Neq,
        x: Box::new(frame.target.clone()),
        y: Some(Box::new(Expr::name(zero_value, pos))),
    };
    let then = Block::new(vec![Stmt::goto(frame.label.clone(), pos)], pos);
    Spanned::new(
        Stmt::If {
            init: None,
            cond: Spanned::new(cond, pos),
            then: Spanned::new(then, pos),
            els: None,
        },
        pos,
    )
}

/// Move a header's init statement and its guards in front of the statement:
/// `{ init; guards...; stmt }`. A label stays on the statement.
fn hoist_init(stmt: &mut Spanned<Stmt>, guards: Vec<Spanned<Stmt>>) {
    let pos = stmt.pos;
    let mut inner = mem::take(stmt);
    let init = take_init(&mut inner.node);

    let mut stmts = Vec::with_capacity(guards.len() + 2);
    stmts.extend(init.map(|init| *init));
    stmts.extend(guards);
    stmts.push(inner);
    *stmt = Spanned::new(Stmt::Block(Block::new(stmts, pos)), pos);
}

fn take_init(stmt: &mut Stmt) -> Option<Box<Spanned<Stmt>>> {
    match stmt {
        Stmt::If { init, .. } | Stmt::For { init, .. } | Stmt::Switch { init, .. } => init.take(),
        Stmt::Labeled { stmt, .. } => take_init(&mut stmt.node),
        _ => None,
    }
}
