//! Lexical scope resolution.
//!
//! The resolver walks the declarations once, opening a scope for every
//! function, struct type, function type, block and `if`/`for` header, and
//! binds each identifier to the innermost declaration of its name.
//! Identifiers with no declaration in sight are queued and looked up once
//! more in the global scope after the walk, which settles forward
//! references to later top-level declarations.

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Ident, Node},
        declarations::{Decl, Spec},
        expressions::Expr,
        statements::{AssignStmt, Stmt},
        types::{FieldList, FuncType, TypeExpr},
        visitor::{walk, walk_list, Visit, Visitor},
    },
    errors::errors::ErrorImpl,
    lexer::tokens::TokenKind,
    Position,
};

use super::scope::{Object, ObjectId, ObjectKind, Scope, ScopeId};

/// Result of resolving a set of declarations.
#[derive(Debug)]
pub struct ResolverOutcome<'a> {
    pub objects: Vec<Object<'a>>,
    pub scopes: Vec<Scope>,
    pub global: ScopeId,
    /// Identifiers still unbound after the global pass, in source order of
    /// their first lookup.
    pub unresolved: Vec<&'a Ident>,
}

impl<'a> ResolverOutcome<'a> {
    pub fn object(&self, id: ObjectId) -> &Object<'a> {
        &self.objects[id.index()]
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn global_scope(&self) -> &Scope {
        self.scope(self.global)
    }

    /// Object the identifier is bound to, if any.
    pub fn object_of(&self, ident: &Ident) -> Option<&Object<'a>> {
        ident.object().map(|id| self.object(id))
    }

    pub fn unresolved_names(&self) -> Vec<&str> {
        self.unresolved
            .iter()
            .map(|ident| ident.name.as_str())
            .collect()
    }
}

struct Resolver<'a, F> {
    scopes: Vec<Scope>,
    objects: Vec<Object<'a>>,
    top_scope: ScopeId,
    global: ScopeId,
    unresolved: Vec<&'a Ident>,
    on_declaration_error: F,
}

/// Binds every identifier in `nodes` to its declaration.
///
/// Redeclarations and `:=` statements without new names are reported
/// through `on_declaration_error` and do not stop resolution. An AST can
/// only be resolved once: binding an already bound identifier panics.
pub fn resolve<'a, F>(nodes: &'a [Decl], on_declaration_error: F) -> ResolverOutcome<'a>
where
    F: FnMut(Position, String),
{
    let global_pos = nodes
        .first()
        .map(|decl| decl.span().start)
        .unwrap_or_else(Position::start);

    let mut resolver = Resolver {
        scopes: vec![Scope::new(None, global_pos)],
        objects: vec![],
        top_scope: ScopeId(0),
        global: ScopeId(0),
        unresolved: vec![],
        on_declaration_error,
    };

    walk_list(&mut resolver, nodes.iter().map(Node::Decl));

    resolver.finish()
}

impl<'a, F: FnMut(Position, String)> Resolver<'a, F> {
    fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    fn open_scope(&mut self, pos: Position) {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(Some(self.top_scope), pos));
        trace!(scope = id.index(), %pos, "open scope");
        self.top_scope = id;
    }

    fn close_scope(&mut self) {
        match self.scope(self.top_scope).outer {
            Some(outer) => {
                trace!(scope = self.top_scope.index(), "close scope");
                self.top_scope = outer;
            }
            None => panic!("attempted to close the global scope"),
        }
    }

    fn new_object(
        &mut self,
        ident: &Ident,
        kind: ObjectKind,
        decl: Node<'a>,
        scope: ScopeId,
    ) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.objects.push(Object {
            name: ident.name.clone(),
            kind,
            pos: ident.pos(),
            decl,
            scope,
        });
        id
    }

    /// Declares each identifier in `scope`. On a collision the first
    /// declaration stays in the scope and the new identifier is bound to
    /// its own, uninserted object.
    fn declare(
        &mut self,
        decl: Node<'a>,
        scope: ScopeId,
        kind: ObjectKind,
        idents: impl IntoIterator<Item = &'a Ident>,
    ) {
        for ident in idents {
            let id = self.new_object(ident, kind, decl, scope);
            ident.bind(id);

            if ident.is_blank() {
                continue;
            }

            match self.scopes[scope.index()].insert(&ident.name, id) {
                None => {
                    trace!(name = %ident.name, %kind, pos = %ident.pos(), "declare");
                }
                Some(previous) => {
                    let error = ErrorImpl::Redeclared {
                        name: ident.name.clone(),
                        previous: self.objects[previous.index()].pos,
                    };
                    debug!(name = %ident.name, pos = %ident.pos(), "redeclared");
                    (self.on_declaration_error)(ident.pos(), error.to_string());
                }
            }
        }
    }

    /// Looks `ident` up from the innermost scope outwards. Misses are
    /// queued for the global pass when `collect_unresolved` is set.
    fn resolve_ident(&mut self, ident: &'a Ident, collect_unresolved: bool) {
        if ident.is_blank() {
            return;
        }

        let mut scope = Some(self.top_scope);
        while let Some(id) = scope {
            if let Some(object) = self.scope(id).lookup(&ident.name) {
                ident.bind(object);
                return;
            }
            scope = self.scope(id).outer;
        }

        if collect_unresolved {
            ident.mark_pending();
            self.unresolved.push(ident);
        }
    }

    fn walk_expr(&mut self, expr: &'a Expr) {
        walk(self, Node::expr(expr));
    }

    fn walk_exprs(&mut self, exprs: &'a [Expr]) {
        for expr in exprs {
            self.walk_expr(expr);
        }
    }

    fn walk_stmts(&mut self, stmts: &'a [Stmt]) {
        walk_list(self, stmts.iter().map(Node::stmt));
    }

    fn resolve_list(&mut self, list: Option<&'a FieldList>) {
        for field in list.into_iter().flat_map(|list| &list.list) {
            self.walk_expr(&field.ty);
        }
    }

    fn declare_list(&mut self, list: Option<&'a FieldList>, kind: ObjectKind) {
        for field in list.into_iter().flat_map(|list| &list.list) {
            self.declare(Node::Field(field), self.top_scope, kind, &field.names);
        }
    }

    /// Type parameters are declared before their constraints are resolved
    /// so constraints may mention them.
    fn walk_type_params(&mut self, list: Option<&'a FieldList>) {
        self.declare_list(list, ObjectKind::Type);
        self.resolve_list(list);
    }

    /// Parameters and results of a signature, in the current scope.
    fn walk_signature(&mut self, ty: &'a FuncType) {
        self.walk_type_params(ty.type_params.as_ref());
        self.resolve_list(Some(&ty.params));
        self.resolve_list(ty.results.as_ref());
        self.declare_list(Some(&ty.params), ObjectKind::Variable);
        self.declare_list(ty.results.as_ref(), ObjectKind::Variable);
    }

    fn walk_composite_elements(&mut self, elts: &'a [Expr]) {
        for elt in elts {
            let Expr::KeyValue(kv) = elt else {
                self.walk_expr(elt);
                continue;
            };

            // A bare key may name a struct field, so a miss is not queued
            match kv.key.as_ref() {
                Expr::Ident(ident) => self.resolve_ident(ident, false),
                key => self.walk_expr(key),
            }
            self.walk_expr(&kv.value);
        }
    }

    fn short_var_decl(&mut self, stmt: &'a Stmt, assign: &'a AssignStmt) {
        let mut new_names = 0;

        for expr in &assign.lhs {
            let Expr::Ident(ident) = expr else {
                continue;
            };

            if ident.is_blank() {
                let id = self.new_object(
                    ident,
                    ObjectKind::Variable,
                    Node::Stmt(stmt),
                    self.top_scope,
                );
                ident.bind(id);
                continue;
            }

            match self.scope(self.top_scope).lookup(&ident.name) {
                Some(existing) => ident.bind(existing),
                None => {
                    let id = self.new_object(
                        ident,
                        ObjectKind::Variable,
                        Node::Stmt(stmt),
                        self.top_scope,
                    );
                    self.scopes[self.top_scope.index()].insert(&ident.name, id);
                    ident.bind(id);
                    new_names += 1;
                }
            }
        }

        if new_names == 0 {
            debug!(pos = %assign.tok_pos, "no new variables");
            (self.on_declaration_error)(assign.tok_pos, ErrorImpl::NoNewVariables.to_string());
        }
    }

    fn visit_decl(&mut self, decl: &'a Decl) {
        match decl {
            Decl::Gen(gen) => match gen.tok {
                TokenKind::Const | TokenKind::Var => {
                    let kind = if gen.tok == TokenKind::Var {
                        ObjectKind::Variable
                    } else {
                        ObjectKind::Const
                    };

                    for spec in &gen.specs {
                        if let Spec::Value(value) = spec {
                            self.walk_exprs(&value.values);
                            if let Some(ty) = &value.ty {
                                self.walk_expr(ty);
                            }
                            self.declare(Node::Spec(spec), self.top_scope, kind, &value.names);
                        }
                    }
                }
                TokenKind::Type => {
                    for spec in &gen.specs {
                        if let Spec::Type(ty) = spec {
                            self.declare(
                                Node::Spec(spec),
                                self.top_scope,
                                ObjectKind::Type,
                                [&ty.name],
                            );

                            if ty.type_params.is_some() {
                                self.open_scope(ty.name.pos());
                                self.walk_type_params(ty.type_params.as_ref());
                                self.walk_expr(&ty.ty);
                                self.close_scope();
                            } else {
                                self.walk_expr(&ty.ty);
                            }
                        }
                    }
                }
                _ => {}
            },
            Decl::Func(func) => {
                self.open_scope(func.span.start);
                self.walk_signature(&func.ty);
                if let Some(body) = &func.body {
                    self.walk_stmts(&body.list);
                }
                self.close_scope();

                self.declare(Node::Decl(decl), self.global, ObjectKind::Function, [&func.name]);
            }
        }
    }

    fn visit_stmt(&mut self, stmt: &'a Stmt) -> Visit {
        match stmt {
            Stmt::Assign(assign) => {
                self.walk_exprs(&assign.rhs);
                if assign.tok == TokenKind::Define {
                    self.short_var_decl(stmt, assign);
                } else {
                    self.walk_exprs(&assign.lhs);
                }
            }
            Stmt::If(if_stmt) => {
                self.open_scope(if_stmt.span.start);
                if let Some(init) = &if_stmt.init {
                    walk(self, Node::stmt(init));
                }
                self.walk_expr(&if_stmt.cond);
                walk(self, Node::Block(&if_stmt.body));
                if let Some(else_branch) = &if_stmt.else_branch {
                    walk(self, Node::stmt(else_branch));
                }
                self.close_scope();
            }
            Stmt::For(for_stmt) => {
                self.open_scope(for_stmt.span.start);
                if let Some(init) = &for_stmt.init {
                    walk(self, Node::stmt(init));
                }
                if let Some(cond) = &for_stmt.cond {
                    self.walk_expr(cond);
                }
                if let Some(post) = &for_stmt.post {
                    walk(self, Node::stmt(post));
                }
                walk(self, Node::Block(&for_stmt.body));
                self.close_scope();
            }
            _ => return Visit::Descend,
        }

        Visit::Skip
    }

    fn visit_expr(&mut self, expr: &'a Expr) -> Visit {
        match expr {
            Expr::FuncLit(lit) => {
                self.open_scope(lit.span.start);
                self.walk_signature(&lit.ty);
                self.walk_stmts(&lit.body.list);
                self.close_scope();
            }
            Expr::Selector(selector) => self.walk_expr(&selector.x),
            Expr::Type(TypeExpr::Struct(ty)) => {
                self.open_scope(ty.span.start);
                self.resolve_list(Some(&ty.fields));
                self.declare_list(Some(&ty.fields), ObjectKind::Variable);
                self.close_scope();
            }
            Expr::Type(TypeExpr::Function(ty)) => {
                self.open_scope(ty.span.start);
                self.walk_signature(ty);
                self.close_scope();
            }
            Expr::CompositeLit(lit) => {
                if let Some(ty) = &lit.ty {
                    self.walk_expr(ty);
                }
                self.walk_composite_elements(&lit.elts);
            }
            _ => return Visit::Descend,
        }

        Visit::Skip
    }

    /// Settles the queued identifiers against the global scope.
    fn finish(mut self) -> ResolverOutcome<'a> {
        if self.top_scope != self.global {
            panic!("unbalanced scopes: {:?} still open", self.top_scope);
        }

        let queued = std::mem::take(&mut self.unresolved);
        let global = self.global;
        let mut unresolved = vec![];

        for ident in queued {
            match self.scope(global).lookup(&ident.name) {
                Some(object) => ident.bind(object),
                None => unresolved.push(ident),
            }
        }

        debug!(
            objects = self.objects.len(),
            scopes = self.scopes.len(),
            unresolved = unresolved.len(),
            "resolved"
        );

        ResolverOutcome {
            objects: self.objects,
            scopes: self.scopes,
            global,
            unresolved,
        }
    }
}

impl<'a, F: FnMut(Position, String)> Visitor<'a> for Resolver<'a, F> {
    fn visit(&mut self, node: Node<'a>) -> Visit {
        match node {
            Node::Ident(ident) => {
                self.resolve_ident(ident, true);
                Visit::Skip
            }
            Node::Decl(decl) => {
                self.visit_decl(decl);
                Visit::Skip
            }
            Node::Block(block) => {
                self.open_scope(block.span.start);
                self.walk_stmts(&block.list);
                self.close_scope();
                Visit::Skip
            }
            Node::Stmt(stmt) => self.visit_stmt(stmt),
            Node::Expr(expr) => self.visit_expr(expr),
            _ => Visit::Descend,
        }
    }
}
