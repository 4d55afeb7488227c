//! Type expressions in the AST.
//!
//! Named types are plain identifiers or selectors (`pkg.T`) and live in
//! [`Expr`]; this module holds the composite forms:
//!
//! - `[len]T` and `[]T` arrays
//! - `struct { ... }`
//! - `func(...) ...` signatures, shared with function declarations and
//!   literals
//!
//! Parameter, result, type parameter and struct field lists are all
//! [`FieldList`]s.

use serde::Serialize;

use crate::Span;

use super::{ast::Ident, expressions::Expr};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeExpr {
    Array(ArrayType),
    Struct(StructType),
    Function(FuncType),
}

impl TypeExpr {
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Array(ty) => ty.span,
            TypeExpr::Struct(ty) => ty.span,
            TypeExpr::Function(ty) => ty.span,
        }
    }
}

/// `[len]elem`; `len` is absent for `[]elem`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayType {
    pub len: Option<Box<Expr>>,
    pub elem: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructType {
    pub fields: FieldList,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuncType {
    pub type_params: Option<FieldList>,
    pub params: FieldList,
    pub results: Option<FieldList>,
    pub span: Span,
}

/// One entry of a field list: `a, b int`, or an unnamed `int`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldList {
    pub list: Vec<Field>,
    pub span: Span,
}

impl FieldList {
    /// Number of declared entries, counting each name separately.
    pub fn num_fields(&self) -> usize {
        self.list
            .iter()
            .map(|field| field.names.len().max(1))
            .sum()
    }
}
