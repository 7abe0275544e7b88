//! Collect-block desugaring.
//!
//! Rewrites
//!
//! ```text
//! collect err {
//!     data, _! = json.Marshal(x)
//!     _! = os.WriteFile(path, data, 0o644)
//! }
//! ```
//!
//! into
//!
//! ```text
//! {
//!     data, err = json.Marshal(x)
//!     if err != nil { goto ___collect_end_1 }
//!     err = os.WriteFile(path, data, 0o644)
//!     if err != nil { goto ___collect_end_1 }
//! }
//! ___collect_end_1:
//! ```
//!
//! and checks that `_!` only appears as a direct assignment target inside a
//! collect block. This pass runs after parsing and before type checking.

pub mod expr;
pub mod rules;
pub mod scope;
pub mod stmt;
pub mod targets;

use tracing::{debug, trace};

use crate::config::Config;
use crate::diagnostics::{Diagnostic, DiagnosticKind, SugarError};
use crate::span::{Pos, Spanned};
use crate::syntax::{Block, Decl, File, FuncDecl, FuncType};
use crate::visit::composers::mentions_collect;

use rules::Rules;
use scope::ScopeChain;
use targets::{CollectTargets, LabelGen};

/// Desugar every function in `file`. The first diagnostic stops the pass and
/// is returned.
pub fn desugar_file(file: &mut File, config: &Config) -> Result<(), SugarError> {
    Desugarer::new(config).run(file)
}

/// Desugar every function in `file`, reporting each diagnostic to `handler`
/// and carrying on. The first diagnostic is still returned as the result.
pub fn desugar_file_with_handler<F>(file: &mut File, config: &Config, handler: F) -> Result<(), SugarError>
where
    F: FnMut(&Diagnostic),
{
    Desugarer::new(config).with_handler(handler).run(file)
}

/// State for one run over one file. Build a fresh one per file.
pub struct Desugarer<'h> {
    handler: Option<Box<dyn FnMut(&Diagnostic) + 'h>>,
    first: Option<Diagnostic>,
    reported: usize,
    scopes: ScopeChain,
    targets: CollectTargets,
    labels: LabelGen,
    /// Set once the current assignment's left side accepted a `_!`.
    pending: bool,
    zero_value: String,
    /// Why the config was rejected, if it was.
    invalid_config: Option<String>,
}

impl<'h> Desugarer<'h> {
    pub fn new(config: &Config) -> Self {
        Self {
            handler: None,
            first: None,
            reported: 0,
            scopes: ScopeChain::new(),
            targets: CollectTargets::new(),
            labels: LabelGen::new(config.label_prefix.clone()),
            pending: false,
            zero_value: config.zero_value.clone(),
            invalid_config: config.validate().err().map(|e| e.to_string()),
        }
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&Diagnostic) + 'h,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Rewrite `file`. A config that fails [`Config::validate`] is refused
    /// before anything is touched.
    pub fn run(&mut self, file: &mut File) -> Result<(), SugarError> {
        if let Some(msg) = &self.invalid_config {
            return Err(SugarError::Config { msg: msg.clone() });
        }
        self.file(file)?;
        match &self.first {
            Some(first) => Err(SugarError::Diagnostic(first.clone())),
            None => Ok(()),
        }
    }

    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.first.as_ref()
    }

    pub fn diagnostics_reported(&self) -> usize {
        self.reported
    }

    pub fn labels_issued(&self) -> usize {
        self.labels.count()
    }

    /// Record a diagnostic. Without a handler this is the end of the run.
    pub(crate) fn report(&mut self, kind: DiagnosticKind, pos: Pos) -> Result<(), SugarError> {
        let diag = Diagnostic::new(kind, pos);
        debug!(%diag, "collect diagnostic");
        self.reported += 1;
        if self.first.is_none() {
            self.first = Some(diag.clone());
        }
        match self.handler.as_mut() {
            Some(handler) => {
                handler(&diag);
                Ok(())
            }
            None => Err(SugarError::Diagnostic(diag)),
        }
    }

    fn file(&mut self, file: &mut File) -> Result<(), SugarError> {
        self.scopes.open();

        // Package-level names are visible everywhere in the file, regardless
        // of declaration order.
        for decl in &file.decls {
            match decl {
                Decl::Import(_) => {}
                Decl::Const(c) => c.names.iter().try_for_each(|n| self.scopes.declare(n))?,
                Decl::Var(v) => v.names.iter().try_for_each(|n| self.scopes.declare(n))?,
                Decl::Type(t) => self.scopes.declare(&t.name)?,
                Decl::Func(f) if f.recv.is_none() => self.scopes.declare(&f.name)?,
                Decl::Func(_) => {}
            }
        }

        let rules = Rules::default();
        for decl in &mut file.decls {
            match decl {
                Decl::Import(_) => {}
                Decl::Const(c) => self.const_decl(c, rules)?,
                Decl::Var(v) => self.var_decl(v, rules)?,
                Decl::Type(t) => self.type_decl(t, rules)?,
                Decl::Func(f) => self.func_decl(f)?,
            }
        }

        self.scopes.close()?;
        debug!(
            package = %file.package.node,
            labels = self.labels.count(),
            diagnostics = self.reported,
            "collect desugaring finished"
        );
        Ok(())
    }

    fn func_decl(&mut self, func: &mut FuncDecl) -> Result<(), SugarError> {
        if !mentions_collect(func) {
            trace!(func = %func.name.node, "no collect syntax, skipping");
            return Ok(());
        }
        debug!(func = %func.name.node, "desugaring function");

        self.declared_names(std::slice::from_ref(&func.name))?;
        self.scopes.open();
        if let Some(recv) = &mut func.recv {
            self.field(recv, Rules::default())?;
            if let Some(name) = &recv.name {
                self.scopes.declare(name)?;
            }
        }
        self.func_type(&mut func.ty, Rules::default())?;
        if let Some(body) = func.body.as_mut() {
            self.func_body(&func.ty.node, body)?;
        }
        self.scopes.close()
    }

    /// Declare the signature's names and rewrite the body. The caller opens
    /// the function scope.
    pub(crate) fn func_body(&mut self, ty: &FuncType, body: &mut Spanned<Block>) -> Result<(), SugarError> {
        for param in &ty.params {
            if let Some(name) = &param.name {
                self.scopes.declare(name)?;
            }
        }
        for result in &ty.results {
            if let Some(name) = &result.name {
                self.scopes.declare_if_absent(name)?;
            }
        }

        // An assignment's pending placeholder never spans into a nested body.
        let outer_pending = std::mem::take(&mut self.pending);
        let result = self.stmt_list(&mut body.node.stmts, Rules::function_body());
        self.pending = outer_pending;
        result
    }
}
