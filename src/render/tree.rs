use std::fmt::Display;

use crate::ast::{
    declarations::{Decl, Spec},
    expressions::Expr,
    statements::{BlockStmt, Stmt},
    types::{Field, FieldList, FuncType, TypeExpr},
};

/// A labelled node of a text tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tree {
    pub label: String,
    pub children: Vec<Tree>,
}

impl Tree {
    pub fn new(label: impl Into<String>) -> Self {
        Tree {
            label: label.into(),
            children: vec![],
        }
    }

    pub fn add_node(&mut self, label: impl Into<String>) {
        self.children.push(Tree::new(label));
    }

    /// Adds a child and returns it so further nodes can hang off it.
    pub fn add_branch(&mut self, label: impl Into<String>) -> &mut Tree {
        let index = self.children.len();
        self.children.push(Tree::new(label));
        &mut self.children[index]
    }

    fn write_children(&self, f: &mut std::fmt::Formatter<'_>, prefix: &str) -> std::fmt::Result {
        let count = self.children.len();

        for (i, child) in self.children.iter().enumerate() {
            let last = i + 1 == count;
            let (connector, indent) = if last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };

            writeln!(f, "{}{}{}", prefix, connector, child.label)?;
            child.write_children(f, &format!("{}{}", prefix, indent))?;
        }

        Ok(())
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.label)?;
        self.write_children(f, "")
    }
}

/// Renders each top-level declaration as its own tree rooted at `.`.
pub fn render_tree(decls: &[Decl]) -> String {
    let mut out = String::new();

    for decl in decls {
        let mut tree = Tree::new(".");
        print_decl(&mut tree, decl);
        out.push_str(&tree.to_string());
    }

    out
}

pub fn print_decl(tree: &mut Tree, decl: &Decl) {
    match decl {
        Decl::Gen(decl) => {
            let label = decl.tok.symbol().unwrap_or_default();
            let t = tree.add_branch(label);
            for spec in &decl.specs {
                print_spec(t, spec);
            }
        }
        Decl::Func(decl) => {
            let t = tree.add_branch(decl.name.name.as_str());
            if let Some(body) = &decl.body {
                print_block(t.add_branch("body"), body);
            }
            print_func_type(t.add_branch("type"), &decl.ty);
        }
    }
}

fn print_spec(tree: &mut Tree, spec: &Spec) {
    match spec {
        Spec::Value(spec) => {
            let names = tree.add_branch("names");
            for name in &spec.names {
                names.add_node(name.name.as_str());
            }

            let ty = tree.add_branch("type");
            if let Some(spec_ty) = &spec.ty {
                print_expr(ty, spec_ty);
            }

            let values = tree.add_branch("values");
            for value in &spec.values {
                print_expr(values, value);
            }
        }
        Spec::Type(spec) => {
            let t = tree.add_branch("spec");
            t.add_branch("name").add_node(spec.name.name.as_str());
            if let Some(params) = &spec.type_params {
                print_field_list(t.add_branch("type_params"), params);
            }
            print_expr(t.add_branch("type"), &spec.ty);
        }
        Spec::Import(spec) => {
            let t = tree.add_branch("import");
            if let Some(name) = &spec.name {
                t.add_branch("name").add_node(name.name.as_str());
            }
            print_expr(t.add_branch("path"), &spec.path);
        }
    }
}

/// Statements of a block, hung directly off `tree`.
fn print_block(tree: &mut Tree, block: &BlockStmt) {
    for stmt in &block.list {
        print_stmt(tree, stmt);
    }
}

fn print_stmt(tree: &mut Tree, stmt: &Stmt) {
    match stmt {
        Stmt::Decl(stmt) => print_decl(tree.add_branch("declaration"), &stmt.decl),
        Stmt::Expr(stmt) => print_expr(tree, &stmt.x),
        Stmt::IncDec(stmt) => {
            let t = tree.add_branch(stmt.tok.symbol().unwrap_or_default());
            print_expr(t, &stmt.x);
        }
        Stmt::Assign(stmt) => {
            let t = tree.add_branch(stmt.tok.symbol().unwrap_or_default());
            let left = t.add_branch("left");
            for expr in &stmt.lhs {
                print_expr(left, expr);
            }
            let right = t.add_branch("right");
            for expr in &stmt.rhs {
                print_expr(right, expr);
            }
        }
        Stmt::Return(stmt) => {
            let t = tree.add_branch("return");
            for expr in &stmt.results {
                print_expr(t, expr);
            }
        }
        Stmt::Block(block) => print_block(tree.add_branch("block"), block),
        Stmt::If(stmt) => {
            let t = tree.add_branch("if");
            if let Some(init) = &stmt.init {
                print_stmt(t.add_branch("init"), init);
            }
            print_expr(t.add_branch("condition"), &stmt.cond);
            print_block(t.add_branch("body"), &stmt.body);
            if let Some(else_branch) = &stmt.else_branch {
                print_stmt(t.add_branch("else"), else_branch);
            }
        }
        Stmt::For(stmt) => {
            let t = tree.add_branch("for");
            if let Some(init) = &stmt.init {
                print_stmt(t.add_branch("init"), init);
            }
            if let Some(cond) = &stmt.cond {
                print_expr(t.add_branch("condition"), cond);
            }
            if let Some(post) = &stmt.post {
                print_stmt(t.add_branch("post"), post);
            }
            print_block(t.add_branch("body"), &stmt.body);
        }
    }
}

fn print_expr(tree: &mut Tree, expr: &Expr) {
    match expr {
        Expr::Ident(ident) => tree.add_node(ident.name.as_str()),
        Expr::BasicLit(lit) => tree.add_node(format!(
            "{} {}",
            lit.kind.to_string().to_uppercase(),
            lit.literal
        )),
        Expr::FuncLit(lit) => {
            let t = tree.add_branch("func");
            print_func_type(t.add_branch("type"), &lit.ty);
            print_block(t.add_branch("body"), &lit.body);
        }
        Expr::CompositeLit(lit) => {
            let t = tree.add_branch("composite_literal");
            if let Some(ty) = &lit.ty {
                print_expr(t.add_branch("type"), ty);
            }
            let elements = t.add_branch("elements");
            for elt in &lit.elts {
                print_expr(elements, elt);
            }
        }
        Expr::Paren(expr) => print_expr(tree.add_branch("paren"), &expr.x),
        Expr::Selector(expr) => {
            let t = tree.add_branch("selector");
            t.add_branch("name").add_node(expr.sel.name.as_str());
            print_expr(t.add_branch("method"), &expr.x);
        }
        Expr::Index(expr) => {
            let t = tree.add_branch("index_expression");
            print_expr(t.add_branch("name"), &expr.x);
            print_expr(t.add_branch("index"), &expr.index);
        }
        Expr::IndexList(expr) => {
            let t = tree.add_branch("index_expression");
            print_expr(t.add_branch("name"), &expr.x);
            let indices = t.add_branch("indices");
            for index in &expr.indices {
                print_expr(indices, index);
            }
        }
        Expr::Call(call) => {
            let fun = tree.add_branch("method");
            print_expr(fun, &call.fun);
            let args = fun.add_branch(if call.has_ellipsis { "args..." } else { "args" });
            for arg in &call.args {
                print_expr(args, arg);
            }
        }
        Expr::Unary(expr) => {
            let t = tree.add_branch(expr.op.symbol().unwrap_or_default());
            print_expr(t, &expr.x);
        }
        Expr::Binary(expr) => {
            let t = tree.add_branch(expr.op.symbol().unwrap_or_default());
            print_expr(t, &expr.x);
            print_expr(t, &expr.y);
        }
        Expr::KeyValue(expr) => {
            let t = tree.add_branch("key_value");
            print_expr(t.add_branch("key"), &expr.key);
            print_expr(t.add_branch("value"), &expr.value);
        }
        Expr::Type(TypeExpr::Array(array)) => {
            let t = tree.add_branch("array");
            if let Some(len) = &array.len {
                print_expr(t.add_branch("length"), len);
            }
            print_expr(t.add_branch("type"), &array.elem);
        }
        Expr::Type(TypeExpr::Struct(ty)) => print_field_list(tree.add_branch("struct"), &ty.fields),
        Expr::Type(TypeExpr::Function(ty)) => print_func_type(tree.add_branch("func"), ty),
    }
}

fn print_func_type(tree: &mut Tree, ty: &FuncType) {
    if let Some(params) = &ty.type_params {
        print_field_list(tree.add_branch("type_params"), params);
    }
    if !ty.params.list.is_empty() {
        print_field_list(tree.add_branch("params"), &ty.params);
    }
    if let Some(results) = &ty.results {
        print_field_list(tree.add_branch("results"), results);
    }
}

fn print_field_list(tree: &mut Tree, list: &FieldList) {
    for field in &list.list {
        print_field(tree, field);
    }
}

fn print_field(tree: &mut Tree, field: &Field) {
    let t = tree.add_branch("field");
    if !field.names.is_empty() {
        let names = t.add_branch("names");
        for name in &field.names {
            names.add_node(name.name.as_str());
        }
    }
    print_expr(t.add_branch("type"), &field.ty);
}
