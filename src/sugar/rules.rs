//! Traversal context: where in the grammar the walk currently is.
//!
//! `Rules` is a `Copy` value handed down the recursion. A flag set for one
//! subtree is gone as soon as that call returns, so siblings never see it.

use crate::diagnostics::DiagnosticKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rules {
    pub lhs: bool,
    pub definition: bool,
    pub index: bool,
    pub selector: bool,
    pub slice: bool,
    pub type_position: bool,
    pub collector: bool,
}

/// Outcome of meeting the placeholder under a given context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderUse {
    /// Legal: replace with the current collect target.
    Target,
    Invalid(InvalidUse),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidUse {
    AsType,
    AsValue,
    OutsideCollect,
    InDefinition,
    Duplicate,
}

impl InvalidUse {
    pub fn kind(self) -> DiagnosticKind {
        match self {
            InvalidUse::AsType => DiagnosticKind::UsedAsType,
            InvalidUse::AsValue => DiagnosticKind::UsedAsValue,
            InvalidUse::OutsideCollect => DiagnosticKind::OutsideCollect,
            InvalidUse::InDefinition => DiagnosticKind::DeclaredPlaceholder,
            InvalidUse::Duplicate => DiagnosticKind::MultiplePlaceholders,
        }
    }
}

impl Rules {
    pub fn as_type(self) -> Self {
        Self { type_position: true, ..self }
    }

    pub fn as_value(self) -> Self {
        Self { type_position: false, ..self }
    }

    /// Value position that can never be assigned through: call arguments,
    /// operands, literal elements, right-hand sides.
    pub fn as_operand(self) -> Self {
        Self { type_position: false, lhs: false, ..self }
    }

    pub fn as_lhs(self) -> Self {
        Self { lhs: true, ..self }
    }

    pub fn in_definition(self) -> Self {
        Self { definition: true, ..self }
    }

    pub fn in_index(self) -> Self {
        Self { index: true, ..self }
    }

    pub fn in_selector(self) -> Self {
        Self { selector: true, ..self }
    }

    pub fn in_slice(self) -> Self {
        Self { slice: true, ..self }
    }

    pub fn in_collector(self) -> Self {
        Self { collector: true, ..self }
    }

    /// Context for a function body. A body is its own jump domain, so nothing
    /// from the enclosing function carries over.
    pub fn function_body() -> Self {
        Self::default()
    }

    /// Position inside an index, selector or slice sub-expression.
    pub fn nested_access(&self) -> bool {
        self.index || self.selector || self.slice
    }

    /// Decide what the placeholder means here. `pending` is whether the
    /// current assignment already accepted one.
    pub fn classify(&self, pending: bool) -> PlaceholderUse {
        if self.type_position {
            return PlaceholderUse::Invalid(InvalidUse::AsType);
        }
        if !self.lhs || self.nested_access() {
            return PlaceholderUse::Invalid(InvalidUse::AsValue);
        }
        // Declaring `_!` is wrong everywhere, collect block or not.
        if self.definition {
            PlaceholderUse::Invalid(InvalidUse::InDefinition)
        } else if !self.collector {
            PlaceholderUse::Invalid(InvalidUse::OutsideCollect)
        } else if pending {
            PlaceholderUse::Invalid(InvalidUse::Duplicate)
        } else {
            PlaceholderUse::Target
        }
    }
}
