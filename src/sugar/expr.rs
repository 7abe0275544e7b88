use tracing::trace;

use crate::diagnostics::{DiagnosticKind, SugarError};
use crate::span::{Pos, Spanned};
use crate::syntax::{is_placeholder, Expr, Field, FuncType, Name};

use super::rules::{PlaceholderUse, Rules};
use super::Desugarer;

impl Desugarer<'_> {
    /// Walk an expression, replacing each legal `_!` with the current collect
    /// target and reporting every illegal one.
    pub(crate) fn expr(&mut self, expr: &mut Spanned<Expr>, rules: Rules) -> Result<(), SugarError> {
        match &mut expr.node {
            Expr::Name(name) => {
                if is_placeholder(name) {
                    if let Some(target) = self.placeholder(expr.pos, rules)? {
                        *expr = target;
                    }
                }
            }

            Expr::Bad | Expr::BasicLit { .. } => {}

            Expr::CompositeLit { ty, elems } => {
                if let Some(ty) = ty {
                    self.expr(ty, rules.as_type())?;
                }
                for elem in elems {
                    self.expr(elem, rules.as_operand())?;
                }
            }

            Expr::KeyValue { key, value } => {
                self.expr(key, rules.as_operand())?;
                self.expr(value, rules.as_operand())?;
            }

            Expr::Paren(inner) => self.expr(inner, rules)?,

            Expr::FuncLit { ty, body } => {
                self.func_type(ty, rules)?;
                self.scopes.open();
                self.func_body(&ty.node, body)?;
                self.scopes.close()?;
            }

            Expr::Selector { x, sel } => {
                let rules = rules.in_selector();
                self.name_site(sel, rules)?;
                self.expr(x, rules)?;
            }

            Expr::Index { x, index } => {
                let rules = rules.in_index().as_value();
                self.expr(x, rules)?;
                self.expr(index, rules)?;
            }

            Expr::Slice { x, low, high, max } => {
                let rules = rules.in_slice().as_value();
                self.expr(x, rules)?;
                for bound in [low, high, max].into_iter().flatten() {
                    self.expr(bound, rules)?;
                }
            }

            Expr::Assert { x, ty } => {
                self.expr(x, rules.as_operand())?;
                if let Some(ty) = ty {
                    self.expr(ty, rules.as_type())?;
                }
            }

            Expr::TypeSwitchGuard { lhs, x } => {
                if let Some(lhs) = lhs {
                    self.name_site(lhs, rules.as_operand())?;
                }
                self.expr(x, rules.as_operand())?;
            }

            // `*p = v` assigns through a unary operand, so it keeps the
            // left-hand side context. Binary results never do.
            Expr::Operation { x, y: None, .. } => self.expr(x, rules.as_value())?,
            Expr::Operation { x, y: Some(y), .. } => {
                self.expr(x, rules.as_operand())?;
                self.expr(y, rules.as_operand())?;
            }

            Expr::Call { fun, args, .. } => {
                self.expr(fun, rules.as_operand())?;
                for arg in args {
                    self.expr(arg, rules.as_operand())?;
                }
            }

            Expr::List(elems) => {
                for elem in elems {
                    self.expr(elem, rules.as_value())?;
                }
            }

            Expr::ArrayType { len, elem } => {
                if let Some(len) = len {
                    self.expr(len, rules.as_operand())?;
                }
                self.expr(elem, rules.as_type())?;
            }

            Expr::SliceType { elem } | Expr::DotsType { elem } | Expr::ChanType { elem, .. } => {
                self.expr(elem, rules.as_type())?
            }

            Expr::MapType { key, value } => {
                self.expr(key, rules.as_type())?;
                self.expr(value, rules.as_type())?;
            }

            Expr::StructType { fields } => {
                for field in fields {
                    self.field(field, rules)?;
                }
            }

            Expr::InterfaceType { methods } => {
                for method in methods {
                    self.field(method, rules)?;
                }
            }

            Expr::FuncType(ft) => self.func_type_fields(ft, rules)?,
        }
        Ok(())
    }

    /// Decide what a `_!` at `pos` becomes. `Some` carries the substitute.
    fn placeholder(&mut self, pos: Pos, rules: Rules) -> Result<Option<Spanned<Expr>>, SugarError> {
        match rules.classify(self.pending) {
            PlaceholderUse::Target => {
                let target = self.targets.current()?.target.node.clone();
                self.pending = true;
                trace!(%pos, "placeholder replaced by collect target");
                Ok(Some(Spanned::new(target, pos)))
            }
            PlaceholderUse::Invalid(invalid) => {
                self.report(invalid.kind(), pos)?;
                Ok(None)
            }
        }
    }

    /// A name that is not an expression (field name, selector, type switch
    /// binding). `_!` is never legal there and is never replaced.
    fn name_site(&mut self, name: &Name, rules: Rules) -> Result<(), SugarError> {
        if !is_placeholder(&name.node) {
            return Ok(());
        }
        let kind = match rules.classify(self.pending) {
            PlaceholderUse::Invalid(invalid) => invalid.kind(),
            PlaceholderUse::Target => DiagnosticKind::UsedAsValue,
        };
        self.report(kind, name.pos)
    }

    pub(crate) fn field(&mut self, field: &mut Field, rules: Rules) -> Result<(), SugarError> {
        if let Some(name) = &field.name {
            self.name_site(name, rules.as_operand())?;
        }
        self.expr(&mut field.ty, rules.as_type())
    }

    pub(crate) fn func_type(&mut self, ty: &mut Spanned<FuncType>, rules: Rules) -> Result<(), SugarError> {
        self.func_type_fields(&mut ty.node, rules)
    }

    fn func_type_fields(&mut self, ty: &mut FuncType, rules: Rules) -> Result<(), SugarError> {
        for field in ty.params.iter_mut().chain(ty.results.iter_mut()) {
            self.field(field, rules)?;
        }
        Ok(())
    }
}
