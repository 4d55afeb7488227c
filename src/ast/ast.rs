use std::cell::Cell;

use serde::Serialize;

use crate::{resolver::scope::ObjectId, Position, Span};

use super::{
    declarations::{Decl, Spec},
    expressions::Expr,
    statements::{BlockStmt, Stmt},
    types::{Field, FieldList, FuncType, TypeExpr},
};

/// Resolution state of an identifier.
///
/// Moves forward only: `Unresolved` (never looked up) to `Pending`
/// (queued for the global pass) to `Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Binding {
    #[default]
    Unresolved,
    Pending,
    Resolved(ObjectId),
}

/// Identifier node.
///
/// The binding slot is interior mutable so the resolver can bind while
/// only borrowing the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
    pub binding: Cell<Binding>,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Ident {
            name: name.into(),
            span,
            binding: Cell::new(Binding::Unresolved),
        }
    }

    pub fn pos(&self) -> Position {
        self.span.start
    }

    /// The blank identifier `_` is never declared or resolved.
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }

    pub fn binding(&self) -> Binding {
        self.binding.get()
    }

    pub fn object(&self) -> Option<ObjectId> {
        match self.binding.get() {
            Binding::Resolved(id) => Some(id),
            _ => None,
        }
    }

    /// Binds the identifier to its declaring object.
    ///
    /// # Panics
    ///
    /// Panics if the identifier is already bound.
    pub fn bind(&self, object: ObjectId) {
        if let Binding::Resolved(previous) = self.binding.get() {
            panic!(
                "identifier {} at {} bound twice ({:?}, then {:?})",
                self.name,
                self.pos(),
                previous,
                object
            );
        }
        self.binding.set(Binding::Resolved(object));
    }

    /// Queues the identifier for the global pass.
    pub fn mark_pending(&self) {
        if self.binding.get() == Binding::Unresolved {
            self.binding.set(Binding::Pending);
        }
    }
}

/// Borrowed view of any node, used by the visitor and the resolver.
///
/// Identifiers and blocks always appear as `Node::Ident` and
/// `Node::Block`, never wrapped in `Node::Expr`/`Node::Stmt`.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Decl(&'a Decl),
    Spec(&'a Spec),
    Stmt(&'a Stmt),
    Block(&'a BlockStmt),
    Expr(&'a Expr),
    Ident(&'a Ident),
    FuncType(&'a FuncType),
    FieldList(&'a FieldList),
    Field(&'a Field),
}

impl<'a> Node<'a> {
    pub fn expr(expr: &'a Expr) -> Self {
        match expr {
            Expr::Ident(ident) => Node::Ident(ident),
            expr => Node::Expr(expr),
        }
    }

    pub fn stmt(stmt: &'a Stmt) -> Self {
        match stmt {
            Stmt::Block(block) => Node::Block(block),
            stmt => Node::Stmt(stmt),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Node::Decl(decl) => decl.span(),
            Node::Spec(spec) => spec.span(),
            Node::Stmt(stmt) => stmt.span(),
            Node::Block(block) => block.span,
            Node::Expr(expr) => expr.span(),
            Node::Ident(ident) => ident.span,
            Node::FuncType(ty) => ty.span,
            Node::FieldList(list) => list.span,
            Node::Field(field) => field.span,
        }
    }

    pub fn pos(&self) -> Position {
        self.span().start
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<Node<'a>> {
        let mut children = vec![];

        match *self {
            Node::Decl(Decl::Gen(decl)) => {
                children.extend(decl.specs.iter().map(Node::Spec));
            }
            Node::Decl(Decl::Func(decl)) => {
                children.push(Node::Ident(&decl.name));
                children.push(Node::FuncType(&decl.ty));
                if let Some(body) = &decl.body {
                    children.push(Node::Block(body));
                }
            }
            Node::Spec(Spec::Value(spec)) => {
                children.extend(spec.names.iter().map(Node::Ident));
                children.extend(spec.ty.iter().map(Node::expr));
                children.extend(spec.values.iter().map(Node::expr));
            }
            Node::Spec(Spec::Type(spec)) => {
                children.push(Node::Ident(&spec.name));
                children.extend(spec.type_params.iter().map(Node::FieldList));
                children.push(Node::expr(&spec.ty));
            }
            Node::Spec(Spec::Import(spec)) => {
                children.extend(spec.name.iter().map(Node::Ident));
                children.push(Node::expr(&spec.path));
            }
            Node::Stmt(stmt) => stmt_children(stmt, &mut children),
            Node::Block(block) => {
                children.extend(block.list.iter().map(Node::stmt));
            }
            Node::Expr(expr) => expr_children(expr, &mut children),
            Node::Ident(_) => {}
            Node::FuncType(ty) => {
                children.extend(ty.type_params.iter().map(Node::FieldList));
                children.push(Node::FieldList(&ty.params));
                children.extend(ty.results.iter().map(Node::FieldList));
            }
            Node::FieldList(list) => {
                children.extend(list.list.iter().map(Node::Field));
            }
            Node::Field(field) => {
                children.extend(field.names.iter().map(Node::Ident));
                children.push(Node::expr(&field.ty));
            }
        }

        children
    }
}

fn stmt_children<'a>(stmt: &'a Stmt, children: &mut Vec<Node<'a>>) {
    match stmt {
        Stmt::Decl(stmt) => children.push(Node::Decl(&stmt.decl)),
        Stmt::Expr(stmt) => children.push(Node::expr(&stmt.x)),
        Stmt::IncDec(stmt) => children.push(Node::expr(&stmt.x)),
        Stmt::Assign(stmt) => {
            children.extend(stmt.lhs.iter().map(Node::expr));
            children.extend(stmt.rhs.iter().map(Node::expr));
        }
        Stmt::Return(stmt) => children.extend(stmt.results.iter().map(Node::expr)),
        Stmt::Block(block) => children.extend(block.list.iter().map(Node::stmt)),
        Stmt::If(stmt) => {
            children.extend(stmt.init.iter().map(|init| Node::stmt(init)));
            children.push(Node::expr(&stmt.cond));
            children.push(Node::Block(&stmt.body));
            children.extend(stmt.else_branch.iter().map(|branch| Node::stmt(branch)));
        }
        Stmt::For(stmt) => {
            children.extend(stmt.init.iter().map(|init| Node::stmt(init)));
            children.extend(stmt.cond.iter().map(Node::expr));
            children.extend(stmt.post.iter().map(|post| Node::stmt(post)));
            children.push(Node::Block(&stmt.body));
        }
    }
}

fn expr_children<'a>(expr: &'a Expr, children: &mut Vec<Node<'a>>) {
    match expr {
        Expr::Ident(_) | Expr::BasicLit(_) => {}
        Expr::FuncLit(lit) => {
            children.push(Node::FuncType(&lit.ty));
            children.push(Node::Block(&lit.body));
        }
        Expr::CompositeLit(lit) => {
            children.extend(lit.ty.iter().map(|ty| Node::expr(ty)));
            children.extend(lit.elts.iter().map(Node::expr));
        }
        Expr::Paren(expr) => children.push(Node::expr(&expr.x)),
        Expr::Selector(expr) => {
            children.push(Node::expr(&expr.x));
            children.push(Node::Ident(&expr.sel));
        }
        Expr::Index(expr) => {
            children.push(Node::expr(&expr.x));
            children.push(Node::expr(&expr.index));
        }
        Expr::IndexList(expr) => {
            children.push(Node::expr(&expr.x));
            children.extend(expr.indices.iter().map(Node::expr));
        }
        Expr::Call(call) => {
            children.push(Node::expr(&call.fun));
            children.extend(call.args.iter().map(Node::expr));
        }
        Expr::Unary(expr) => children.push(Node::expr(&expr.x)),
        Expr::Binary(expr) => {
            children.push(Node::expr(&expr.x));
            children.push(Node::expr(&expr.y));
        }
        Expr::KeyValue(expr) => {
            children.push(Node::expr(&expr.key));
            children.push(Node::expr(&expr.value));
        }
        Expr::Type(TypeExpr::Array(array)) => {
            children.extend(array.len.iter().map(|len| Node::expr(len)));
            children.push(Node::expr(&array.elem));
        }
        Expr::Type(TypeExpr::Struct(ty)) => children.push(Node::FieldList(&ty.fields)),
        Expr::Type(TypeExpr::Function(ty)) => children.push(Node::FuncType(ty)),
    }
}
