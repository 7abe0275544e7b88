//! Syntax tree consumed and produced by the collect desugaring pass.
//!
//! The tree is built by an upstream parser (or read from a tree file, see
//! [`crate::tree_io`]); this crate never tokenizes source text.

pub mod ast;

pub use ast::*;

/// Reserved placeholder token: "assign into the active collect target".
pub const PLACEHOLDER: &str = "_!";

/// The blank identifier. Never declared into a scope.
pub const BLANK: &str = "_";

pub fn is_placeholder(name: &str) -> bool {
    name == PLACEHOLDER
}
