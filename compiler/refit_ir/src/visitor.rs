//! Read-only tree walking.
//!
//! A `Visitor` sees each node with its ancestor path on the way down
//! (`enter`) and on the way up (`leave`). The tree itself is never mutated;
//! rewriting is the driver's job.

use super::{Ancestors, Node};

/// Whether to descend into the children of the node just entered.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Walk {
    Continue,
    SkipChildren,
}

pub trait Visitor {
    fn enter(&mut self, node: &Node, ancestors: Ancestors<'_>) -> Walk {
        let _ = (node, ancestors);
        Walk::Continue
    }

    fn leave(&mut self, node: &Node, ancestors: Ancestors<'_>) {
        let _ = (node, ancestors);
    }
}

/// Walk `root` and its descendants.
pub fn walk<V: Visitor + ?Sized>(root: &Node, visitor: &mut V) {
    let mut path = Vec::new();
    walk_node(root, &mut path, visitor);
}

/// Walk `node`, which sits below `ancestors`.
pub fn walk_from<V: Visitor + ?Sized>(node: &Node, ancestors: Ancestors<'_>, visitor: &mut V) {
    let mut path = ancestors.as_slice().to_vec();
    walk_node(node, &mut path, visitor);
}

fn walk_node<V: Visitor + ?Sized>(node: &Node, path: &mut Vec<Node>, visitor: &mut V) {
    if visitor.enter(node, Ancestors::new(path)) == Walk::Continue {
        path.push(node.clone());
        for child in node.children() {
            walk_node(&child, path, visitor);
        }
        path.pop();
    }
    visitor.leave(node, Ancestors::new(path));
}
