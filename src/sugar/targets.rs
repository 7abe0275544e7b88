use crate::diagnostics::SugarError;
use crate::span::Spanned;
use crate::syntax::Expr;

/// One active collect block: what `_!` stands for and where its guards jump.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectFrame {
    pub target: Spanned<Expr>,
    pub label: String,
}

/// Stack of active collect blocks, innermost last.
#[derive(Debug, Default)]
pub struct CollectTargets {
    frames: Vec<CollectFrame>,
}

impl CollectTargets {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn push(&mut self, frame: CollectFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Result<CollectFrame, SugarError> {
        self.frames
            .pop()
            .ok_or_else(|| SugarError::internal("pop of empty collect target stack"))
    }

    pub fn current(&self) -> Result<&CollectFrame, SugarError> {
        self.frames
            .last()
            .ok_or_else(|| SugarError::internal("collect target requested outside any collect block"))
    }
}

/// Issues `<prefix><n>` labels, `n` counting from 1 per pass invocation.
#[derive(Debug)]
pub struct LabelGen {
    prefix: String,
    count: usize,
}

impl LabelGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), count: 0 }
    }

    pub fn next_label(&mut self) -> String {
        self.count += 1;
        format!("{}{}", self.prefix, self.count)
    }

    pub fn count(&self) -> usize {
        self.count
    }
}
