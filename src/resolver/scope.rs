use std::{collections::HashMap, fmt::Display};

use serde::Serialize;

use crate::{ast::ast::Node, Position};

/// Index of an [`Object`] in the resolver's object table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectId(pub(crate) usize);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a [`Scope`] in the resolver's scope arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ScopeId(pub(crate) usize);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObjectKind {
    Const,
    Type,
    Variable,
    Function,
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ObjectKind::Const => "const",
            ObjectKind::Type => "type",
            ObjectKind::Variable => "var",
            ObjectKind::Function => "func",
        };
        write!(f, "{}", name)
    }
}

/// A declared entity.
///
/// `decl` is the node that introduced the name: a field, value or type
/// spec, function declaration or `:=` statement.
#[derive(Debug, Clone)]
pub struct Object<'a> {
    pub name: String,
    pub kind: ObjectKind,
    pub pos: Position,
    pub decl: Node<'a>,
    pub scope: ScopeId,
}

/// Names declared in one lexical block, chained to the enclosing block.
#[derive(Debug, Clone)]
pub struct Scope {
    pub outer: Option<ScopeId>,
    /// Position of the node that opened the scope.
    pub pos: Position,
    objects: HashMap<String, ObjectId>,
}

impl Scope {
    pub fn new(outer: Option<ScopeId>, pos: Position) -> Self {
        Scope {
            outer,
            pos,
            objects: HashMap::new(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<ObjectId> {
        self.objects.get(name).copied()
    }

    /// Inserts `object` under `name` unless the name is taken, in which
    /// case the existing object is returned and the scope is unchanged.
    pub fn insert(&mut self, name: &str, object: ObjectId) -> Option<ObjectId> {
        if let Some(existing) = self.lookup(name) {
            return Some(existing);
        }

        self.objects.insert(name.to_string(), object);
        None
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Declared names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.objects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
