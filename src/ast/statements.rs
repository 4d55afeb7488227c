use serde::Serialize;

use crate::{lexer::tokens::TokenKind, Position, Span};

use super::{declarations::Decl, expressions::Expr};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    Decl(DeclStmt),
    Expr(ExprStmt),
    IncDec(IncDecStmt),
    Assign(AssignStmt),
    Return(ReturnStmt),
    Block(BlockStmt),
    If(IfStmt),
    For(ForStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Decl(stmt) => stmt.span,
            Stmt::Expr(stmt) => stmt.span,
            Stmt::IncDec(stmt) => stmt.span,
            Stmt::Assign(stmt) => stmt.span,
            Stmt::Return(stmt) => stmt.span,
            Stmt::Block(stmt) => stmt.span,
            Stmt::If(stmt) => stmt.span,
            Stmt::For(stmt) => stmt.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockStmt {
    pub list: Vec<Stmt>,
    pub span: Span,
}

/// A `const`, `var` or `type` declaration inside a function body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclStmt {
    pub decl: Decl,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExprStmt {
    pub x: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncDecStmt {
    pub x: Expr,
    /// `PlusPlus` or `MinusMinus`
    pub tok: TokenKind,
    pub span: Span,
}

/// `lhs tok rhs` where `tok` is `=`, `:=` or an `op=`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignStmt {
    pub lhs: Vec<Expr>,
    pub tok: TokenKind,
    pub tok_pos: Position,
    pub rhs: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStmt {
    pub results: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub body: BlockStmt,
    /// Either another `If` or a `Block`.
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: BlockStmt,
    pub span: Span,
}
