pub mod span;
pub mod syntax;
pub mod diagnostics;
pub mod config;
pub mod visit;
pub mod sugar;
pub mod tree_io;

pub use config::Config;
pub use diagnostics::{Diagnostic, DiagnosticKind, SugarError};
pub use sugar::{desugar_file, desugar_file_with_handler, Desugarer};
pub use syntax::File;

/// Desugar a parsed file with the default configuration, stopping at the
/// first diagnostic.
pub fn desugar_tree(file: &mut File) -> Result<(), SugarError> {
    desugar_file(file, &Config::default())
}
