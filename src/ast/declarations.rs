use serde::Serialize;

use crate::{lexer::tokens::TokenKind, Position, Span};

use super::{
    ast::Ident,
    expressions::Expr,
    statements::BlockStmt,
    types::{FieldList, FuncType},
};

/// Top-level declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

impl Decl {
    pub fn span(&self) -> Span {
        match self {
            Decl::Gen(decl) => decl.span,
            Decl::Func(decl) => decl.span,
        }
    }
}

/// `const`, `var`, `type` or `import` with one spec or a parenthesised
/// group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenDecl {
    pub tok: TokenKind,
    pub specs: Vec<Spec>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuncDecl {
    pub name: Ident,
    pub ty: FuncType,
    /// Absent for external declarations without a body.
    pub body: Option<BlockStmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Spec {
    Value(ValueSpec),
    Type(TypeSpec),
    Import(ImportSpec),
}

impl Spec {
    pub fn span(&self) -> Span {
        match self {
            Spec::Value(spec) => spec.span,
            Spec::Type(spec) => spec.span,
            Spec::Import(spec) => spec.span,
        }
    }
}

/// `names [type] [= values]` of a `const` or `var` declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
    pub span: Span,
}

/// `name [type params] [=] type`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSpec {
    pub name: Ident,
    pub type_params: Option<FieldList>,
    /// Position of `=` for aliases.
    pub assign: Option<Position>,
    pub ty: Expr,
    pub span: Span,
}

/// `[name] "path"`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSpec {
    pub name: Option<Ident>,
    pub path: Expr,
    pub span: Span,
}
