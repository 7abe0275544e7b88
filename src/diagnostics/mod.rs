pub mod line_index;

use std::io;

use thiserror::Error;

use crate::span::Pos;

use line_index::LineIndex;

/// What went wrong, independent of where.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
    #[error("cannot declare _!")]
    DeclaredPlaceholder,

    #[error("_! used as type")]
    UsedAsType,

    #[error("_! used as value")]
    UsedAsValue,

    #[error("cannot use _! outside of a collect block")]
    OutsideCollect,

    #[error("multiple _! on left side of assignment")]
    MultiplePlaceholders,

    #[error("illegal use of \"_!\" as collect target")]
    PlaceholderAsTarget,

    #[error("undeclared identifier \"{name}\"")]
    UndeclaredIdentifier { name: String },

    #[error("invalid collect target: expected a variable or field selector")]
    InvalidTarget,

    #[error("cannot use _! in a for loop post statement")]
    PlaceholderInPost,
}

/// A user-facing error at a source position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{pos}: {kind}")]
pub struct Diagnostic {
    pub pos: Pos,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, pos: Pos) -> Self {
        Self { pos, kind }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SugarError {
    /// First diagnostic of the run. Without a handler it is also the reason the
    /// run stopped.
    #[error(transparent)]
    Diagnostic(#[from] Diagnostic),

    /// The pass was built from a config that fails validation. Nothing was
    /// rewritten.
    #[error("{msg}")]
    Config { msg: String },

    /// The pass broke one of its own invariants. Never caused by user input.
    #[error("internal error in collect desugaring: {msg}")]
    Internal { msg: String },
}

impl SugarError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal { msg: msg.into() }
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            SugarError::Diagnostic(d) => Some(d),
            SugarError::Config { .. } | SugarError::Internal { .. } => None,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, SugarError::Internal { .. })
    }
}

/// Render a diagnostic with ariadne against the original source text.
pub fn render_diagnostic<W: io::Write>(
    source: &str,
    filename: &str,
    diag: &Diagnostic,
    out: W,
) -> io::Result<()> {
    use ariadne::{Config, Label, Report, ReportKind, Source};

    let index = LineIndex::new(source);
    let start = index.pos_to_offset(diag.pos);
    let end = index.token_end(source, start);

    Report::build(ReportKind::Error, (), start)
        .with_config(Config::default().with_color(false))
        .with_message(format!("collect error in {filename}"))
        .with_label(Label::new(start..end).with_message(diag.message()))
        .finish()
        .write(Source::from(source), out)
}

/// Render without source text: `file:line:col: message`.
pub fn format_plain(filename: &str, diag: &Diagnostic) -> String {
    format!("{filename}:{}:{}: {}", diag.pos.line, diag.pos.col, diag.kind)
}
