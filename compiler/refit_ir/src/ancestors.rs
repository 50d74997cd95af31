//! Immutable ancestor paths.
//!
//! Traversals hand every node an `Ancestors` view (root first, parent last)
//! instead of exposing a mutable cursor. Scope resolution and context
//! checks are pure functions of `(node, ancestors)`.

use super::{Node, NodeTag};

#[derive(Clone, Copy, Debug)]
pub struct Ancestors<'a> {
    path: &'a [Node],
}

impl<'a> Ancestors<'a> {
    pub fn new(path: &'a [Node]) -> Self {
        Ancestors { path }
    }

    /// Ancestors of a root node.
    pub fn none() -> Ancestors<'static> {
        Ancestors { path: &[] }
    }

    pub fn as_slice(&self) -> &'a [Node] {
        self.path
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn parent(&self) -> Option<&'a Node> {
        self.path.last()
    }

    /// The parent together with the parent's own ancestors.
    pub fn split_parent(&self) -> Option<(&'a Node, Ancestors<'a>)> {
        let (parent, rest) = self.path.split_last()?;
        Some((parent, Ancestors { path: rest }))
    }

    /// Ancestors nearest-first.
    pub fn outward(&self) -> impl Iterator<Item = &'a Node> + 'a {
        self.path.iter().rev()
    }

    /// Nearest ancestor with the given tag, with its own ancestors.
    pub fn nearest(&self, tag: NodeTag) -> Option<(&'a Node, Ancestors<'a>)> {
        let idx = self.path.iter().rposition(|n| n.tag() == tag)?;
        Some((
            &self.path[idx],
            Ancestors {
                path: &self.path[..idx],
            },
        ))
    }

    /// The node directly below the ancestor at `depth` on the way down to
    /// `leaf` (which is `leaf` itself when `depth` is the parent).
    pub fn below<'b>(&'b self, depth: usize, leaf: &'b Node) -> &'b Node {
        self.path.get(depth + 1).unwrap_or(leaf)
    }

    /// Owned copy of the path extended by `node`, for descending further.
    pub fn extended(&self, node: &Node) -> Vec<Node> {
        let mut path = self.path.to_vec();
        path.push(node.clone());
        path
    }
}
