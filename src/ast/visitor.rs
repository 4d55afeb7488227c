//! Generic depth-first traversal over [`Node`].
//!
//! A [`Visitor`] decides per node whether its children are walked. Nodes
//! whose children were walked get a matching [`Visitor::leave`] call
//! afterwards, so scoped state can be pushed in `visit` and popped in
//! `leave`.

use super::ast::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Descend,
    Skip,
}

pub trait Visitor<'a> {
    fn visit(&mut self, node: Node<'a>) -> Visit;

    /// Called after the children of a node visited with `Descend`.
    fn leave(&mut self, _node: Node<'a>) {}
}

pub fn walk<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, node: Node<'a>) {
    if visitor.visit(node) == Visit::Skip {
        return;
    }

    for child in node.children() {
        walk(visitor, child);
    }

    visitor.leave(node);
}

pub fn walk_list<'a, V: Visitor<'a> + ?Sized>(
    visitor: &mut V,
    nodes: impl IntoIterator<Item = Node<'a>>,
) {
    for node in nodes {
        walk(visitor, node);
    }
}

struct Inspector<F>(F);

impl<'a, F: FnMut(Node<'a>) -> bool> Visitor<'a> for Inspector<F> {
    fn visit(&mut self, node: Node<'a>) -> Visit {
        if (self.0)(node) {
            Visit::Descend
        } else {
            Visit::Skip
        }
    }
}

/// Walks `node` in depth-first order calling `f` on each node; children
/// are skipped when `f` returns false.
pub fn inspect<'a>(node: Node<'a>, f: impl FnMut(Node<'a>) -> bool) {
    walk(&mut Inspector(f), node);
}
