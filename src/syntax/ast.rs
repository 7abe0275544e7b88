use serde::{Deserialize, Serialize};

use crate::span::{Pos, Spanned};

/// An identifier together with its position.
pub type Name = Spanned<String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub package: Name,
    pub decls: Vec<Decl>,
}

impl File {
    pub fn funcs(&self) -> impl Iterator<Item = &FuncDecl> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Func(f) => Some(f),
            _ => None,
        })
    }
}

/// Top-level declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Import(ImportDecl),
    Const(ConstDecl),
    Var(VarDecl),
    Type(TypeDecl),
    Func(FuncDecl),
}

/// Declaration allowed inside a function body (`Stmt::Decl`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LocalDecl {
    Const(ConstDecl),
    Var(VarDecl),
    Type(TypeDecl),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDecl {
    pub local_name: Option<Name>,
    pub path: Spanned<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstDecl {
    pub names: Vec<Name>,
    pub ty: Option<Spanned<Expr>>,
    pub values: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub names: Vec<Name>,
    pub ty: Option<Spanned<Expr>>,
    pub values: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: Name,
    pub alias: bool,
    pub ty: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncDecl {
    pub recv: Option<Field>,
    pub name: Name,
    pub ty: Spanned<FuncType>,
    /// `None` for declarations without a body (assembly or linkname stubs).
    pub body: Option<Spanned<Block>>,
}

/// Parameter, result, struct field or interface method. `name` is `None`
/// for anonymous parameters and embedded fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: Option<Name>,
    pub ty: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FuncType {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
    pub rbrace: Pos,
}

impl Block {
    pub fn new(stmts: Vec<Spanned<Stmt>>, rbrace: Pos) -> Self {
        Self { stmts, rbrace }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `:=`
    Define,
    /// `op=`, and `++`/`--` when the right-hand side is absent
    Op(Operator),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchTok {
    Break,
    Continue,
    Fallthrough,
    Goto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallTok {
    Go,
    Defer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Not,
    Recv,
    Tilde,
    OrOr,
    AndAnd,
    Eql,
    Neq,
    Lss,
    Leq,
    Gtr,
    Geq,
    Add,
    Sub,
    Or,
    Xor,
    Mul,
    Div,
    Rem,
    And,
    AndNot,
    Shl,
    Shr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Rune,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Stmt {
    #[default]
    Empty,
    Labeled {
        label: Name,
        stmt: Box<Spanned<Stmt>>,
    },
    Block(Block),
    Expr(Spanned<Expr>),
    Send {
        chan: Spanned<Expr>,
        value: Spanned<Expr>,
    },
    Decl(Vec<LocalDecl>),
    Assign {
        op: AssignOp,
        lhs: Spanned<Expr>,
        rhs: Option<Spanned<Expr>>,
    },
    Branch {
        tok: BranchTok,
        label: Option<Name>,
    },
    Call {
        tok: CallTok,
        call: Spanned<Expr>,
    },
    Return(Option<Spanned<Expr>>),
    If {
        init: Option<Box<Spanned<Stmt>>>,
        cond: Spanned<Expr>,
        then: Spanned<Block>,
        /// Either `Stmt::Block` or a chained `Stmt::If`.
        els: Option<Box<Spanned<Stmt>>>,
    },
    For {
        /// A simple statement or a `Stmt::Range` clause.
        init: Option<Box<Spanned<Stmt>>>,
        cond: Option<Spanned<Expr>>,
        post: Option<Box<Spanned<Stmt>>>,
        body: Spanned<Block>,
    },
    Switch {
        init: Option<Box<Spanned<Stmt>>>,
        tag: Option<Spanned<Expr>>,
        body: Vec<CaseClause>,
    },
    Select {
        body: Vec<CommClause>,
    },
    /// `collect target { body }`
    Collect {
        target: Spanned<Expr>,
        body: Spanned<Block>,
    },
    /// `lhs = range x` / `lhs := range x`, only valid as a `for` init.
    Range {
        lhs: Option<Spanned<Expr>>,
        define: bool,
        x: Spanned<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseClause {
    /// `None` is the `default` clause.
    pub cases: Option<Spanned<Expr>>,
    pub body: Vec<Spanned<Stmt>>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommClause {
    /// Send or receive statement; `None` is the `default` clause.
    pub comm: Option<Box<Spanned<Stmt>>>,
    pub body: Vec<Spanned<Stmt>>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Expr {
    /// Placeholder left by parser error recovery.
    #[default]
    Bad,
    Name(String),
    BasicLit {
        kind: LitKind,
        value: String,
    },
    CompositeLit {
        ty: Option<Box<Spanned<Expr>>>,
        elems: Vec<Spanned<Expr>>,
    },
    KeyValue {
        key: Box<Spanned<Expr>>,
        value: Box<Spanned<Expr>>,
    },
    Paren(Box<Spanned<Expr>>),
    FuncLit {
        ty: Spanned<FuncType>,
        body: Spanned<Block>,
    },
    Selector {
        x: Box<Spanned<Expr>>,
        sel: Name,
    },
    Index {
        x: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },
    Slice {
        x: Box<Spanned<Expr>>,
        low: Option<Box<Spanned<Expr>>>,
        high: Option<Box<Spanned<Expr>>>,
        max: Option<Box<Spanned<Expr>>>,
    },
    /// `x.(T)`; `ty` is `None` for `x.(type)`.
    Assert {
        x: Box<Spanned<Expr>>,
        ty: Option<Box<Spanned<Expr>>>,
    },
    /// `lhs := x.(type)` in a type switch header.
    TypeSwitchGuard {
        lhs: Option<Name>,
        x: Box<Spanned<Expr>>,
    },
    /// Binary operation, or unary when `y` is `None`.
    Operation {
        op: Operator,
        x: Box<Spanned<Expr>>,
        y: Option<Box<Spanned<Expr>>>,
    },
    Call {
        fun: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
        has_dots: bool,
    },
    /// `a, b, c` as an assignment side or result list.
    List(Vec<Spanned<Expr>>),
    /// `[len]elem`; `len` is `None` for `[...]elem`.
    ArrayType {
        len: Option<Box<Spanned<Expr>>>,
        elem: Box<Spanned<Expr>>,
    },
    SliceType {
        elem: Box<Spanned<Expr>>,
    },
    DotsType {
        elem: Box<Spanned<Expr>>,
    },
    StructType {
        fields: Vec<Field>,
    },
    InterfaceType {
        methods: Vec<Field>,
    },
    FuncType(FuncType),
    MapType {
        key: Box<Spanned<Expr>>,
        value: Box<Spanned<Expr>>,
    },
    ChanType {
        dir: ChanDir,
        elem: Box<Spanned<Expr>>,
    },
}

impl Expr {
    pub fn name(value: impl Into<String>, pos: Pos) -> Spanned<Expr> {
        Spanned::new(Expr::Name(value.into()), pos)
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Expr::Name(n) => Some(n),
            _ => None,
        }
    }

    /// Innermost name of a selector chain: `a` for `a`, `a.b` and `a.b.c`.
    pub fn root_name(&self) -> Option<&str> {
        match self {
            Expr::Name(n) => Some(n),
            Expr::Selector { x, .. } => x.node.root_name(),
            _ => None,
        }
    }
}

impl Stmt {
    pub fn goto(label: impl Into<String>, pos: Pos) -> Spanned<Stmt> {
        Spanned::new(
            Stmt::Branch {
                tok: BranchTok::Goto,
                label: Some(Spanned::new(label.into(), pos)),
            },
            pos,
        )
    }

    /// `label: ;`
    pub fn empty_labeled(label: impl Into<String>, pos: Pos) -> Spanned<Stmt> {
        Spanned::new(
            Stmt::Labeled {
                label: Spanned::new(label.into(), pos),
                stmt: Box::new(Spanned::new(Stmt::Empty, pos)),
            },
            pos,
        )
    }
}
