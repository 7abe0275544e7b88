//! Lexical scope chain used to resolve collect targets and register labels.
//!
//! Scopes live in an arena owned by one pass invocation. Each scope links to
//! its parent by index, so the chain is walked without a second owner. Since
//! scopes open and close in strict LIFO order matching block structure, the
//! current scope is always the last one in the arena.

use std::collections::HashMap;

use crate::diagnostics::SugarError;
use crate::syntax::{Name, BLANK, PLACEHOLDER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScopeId(usize);

#[derive(Debug)]
struct Scope {
    parent: Option<ScopeId>,
    names: HashMap<String, Name>,
}

#[derive(Debug, Default)]
pub struct ScopeChain {
    scopes: Vec<Scope>,
}

impl ScopeChain {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Open a child of the current scope and make it current.
    pub fn open(&mut self) {
        let parent = self.current();
        self.scopes.push(Scope { parent, names: HashMap::new() });
    }

    /// Discard the current scope and make its parent current.
    pub fn close(&mut self) -> Result<(), SugarError> {
        match self.scopes.pop() {
            Some(_) => Ok(()),
            None => Err(SugarError::internal("close of scope with no open scope")),
        }
    }

    fn current(&self) -> Option<ScopeId> {
        self.scopes.len().checked_sub(1).map(ScopeId)
    }

    /// Declare `name` in the innermost scope, shadowing outer declarations.
    /// Redeclaring in the same scope overwrites. The blank identifier and the
    /// placeholder are never recorded.
    pub fn declare(&mut self, name: &Name) -> Result<(), SugarError> {
        if name.node == BLANK || name.node == PLACEHOLDER {
            return Ok(());
        }
        let scope = self
            .scopes
            .last_mut()
            .ok_or_else(|| SugarError::internal(format!("declare of '{}' with no open scope", name.node)))?;
        scope.names.insert(name.node.clone(), name.clone());
        Ok(())
    }

    /// Declare only if no enclosing scope already knows the name.
    pub fn declare_if_absent(&mut self, name: &Name) -> Result<(), SugarError> {
        if self.lookup(&name.node).is_some() {
            return Ok(());
        }
        self.declare(name)
    }

    /// Find the declaring name node, innermost scope first.
    pub fn lookup(&self, name: &str) -> Option<&Name> {
        let mut cursor = self.current();
        while let Some(ScopeId(idx)) = cursor {
            let scope = &self.scopes[idx];
            if let Some(found) = scope.names.get(name) {
                return Some(found);
            }
            cursor = scope.parent;
        }
        None
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}
