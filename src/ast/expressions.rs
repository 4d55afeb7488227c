use serde::Serialize;

use crate::{
    lexer::tokens::{TokenKind, TokenValue},
    Position, Span,
};

use super::{
    ast::Ident,
    statements::BlockStmt,
    types::{FuncType, TypeExpr},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Ident(Ident),
    BasicLit(BasicLit),
    FuncLit(FuncLit),
    CompositeLit(CompositeLit),
    Paren(ParenExpr),
    Selector(SelectorExpr),
    Index(IndexExpr),
    IndexList(IndexListExpr),
    Call(CallExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    KeyValue(KeyValueExpr),
    Type(TypeExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Ident(ident) => ident.span,
            Expr::BasicLit(lit) => lit.span,
            Expr::FuncLit(lit) => lit.span,
            Expr::CompositeLit(lit) => lit.span,
            Expr::Paren(expr) => expr.span,
            Expr::Selector(expr) => expr.span,
            Expr::Index(expr) => expr.span,
            Expr::IndexList(expr) => expr.span,
            Expr::Call(expr) => expr.span,
            Expr::Unary(expr) => expr.span,
            Expr::Binary(expr) => expr.span,
            Expr::KeyValue(expr) => expr.span,
            Expr::Type(ty) => ty.span(),
        }
    }

    pub fn pos(&self) -> Position {
        self.span().start
    }
}

// LITERALS

/// Integer, float, imaginary, rune or string literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicLit {
    pub kind: TokenKind,
    pub value: TokenValue,
    /// Source spelling.
    pub literal: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuncLit {
    pub ty: FuncType,
    pub body: BlockStmt,
    pub span: Span,
}

/// `T{elts}`; `ty` is absent for elided inner literals like `{1, 2}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeLit {
    pub ty: Option<Box<Expr>>,
    pub elts: Vec<Expr>,
    pub span: Span,
}

// COMPOUND

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParenExpr {
    pub x: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorExpr {
    pub x: Box<Expr>,
    pub sel: Ident,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexExpr {
    pub x: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

/// `x[a, b, ...]`, an index with more than one entry (instantiation).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexListExpr {
    pub x: Box<Expr>,
    pub indices: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallExpr {
    pub fun: Box<Expr>,
    pub args: Vec<Expr>,
    /// `f(xs...)`
    pub has_ellipsis: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryExpr {
    pub op: TokenKind,
    pub x: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryExpr {
    pub x: Box<Expr>,
    pub op: TokenKind,
    pub op_pos: Position,
    pub y: Box<Expr>,
    pub span: Span,
}

/// `key: value` inside a composite literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyValueExpr {
    pub key: Box<Expr>,
    pub value: Box<Expr>,
    pub span: Span,
}
