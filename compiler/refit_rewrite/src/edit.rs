//! Trivia-preserving tree edits shared by the matchers.
//!
//! Removing a statement never drops its comments: they move onto the next
//! surviving statement as leading comments, or onto the previous one as
//! trailing comments when nothing follows. Relative order is kept.

use refit_ir::{Comment, Node, NodeId, NodeKind, Trivia};
use rustc_hash::FxHashMap;

/// What to do with one statement of a list.
#[derive(Clone, Debug)]
pub(crate) enum Edit {
    Remove,
    Replace(Node),
}

/// A statement list after applying `edits` (keyed by statement id).
#[derive(Debug)]
pub(crate) struct Edited {
    pub stmts: Vec<Node>,
    /// Trivia of removed statements with no survivor to land on.
    pub orphaned: Trivia,
    pub relocated: Vec<Comment>,
}

pub(crate) fn edit_statements(stmts: &[Node], edits: &FxHashMap<NodeId, Edit>) -> Edited {
    let mut out: Vec<Node> = Vec::with_capacity(stmts.len());
    let mut carry: Option<Trivia> = None;
    let mut relocated = Vec::new();
    for stmt in stmts {
        let survivor = match edits.get(&stmt.id()) {
            Some(Edit::Remove) => {
                relocated.extend(stmt.trivia().comments().cloned());
                carry = Some(match carry {
                    Some(prev) => Trivia::merged_before(&prev, stmt.trivia()),
                    None => stmt.trivia().clone(),
                });
                continue;
            }
            Some(Edit::Replace(node)) => node.clone(),
            None => stmt.clone(),
        };
        let survivor = match carry.take() {
            Some(removed) => {
                let trivia = Trivia::merged_before(&removed, survivor.trivia());
                survivor.with_trivia(trivia)
            }
            None => survivor,
        };
        out.push(survivor);
    }
    let mut orphaned = Trivia::new();
    if let Some(removed) = carry {
        match out.last_mut() {
            Some(last) => {
                let trivia = Trivia::merged_after(last.trivia(), &removed);
                *last = last.with_trivia(trivia);
            }
            None => orphaned = flatten(&removed),
        }
    }
    Edited {
        stmts: out,
        orphaned,
        relocated,
    }
}

/// Collapse all comments of `trivia` into trailing position.
fn flatten(trivia: &Trivia) -> Trivia {
    Trivia::merged_after(&Trivia::new(), trivia)
}

/// Rebuild a block or case group with a new statement list. Orphaned
/// trivia lands on the container itself.
pub(crate) fn with_statements(container: &Node, edited: Edited) -> Node {
    let kind = match container.kind() {
        NodeKind::Case { labels, .. } => NodeKind::Case {
            labels: labels.clone(),
            body: edited.stmts,
        },
        _ => NodeKind::Block {
            stmts: edited.stmts,
        },
    };
    let node = container.with_kind(kind);
    if edited.orphaned.has_comments() {
        let trivia = Trivia::merged_after(container.trivia(), &edited.orphaned);
        node.with_trivia(trivia)
    } else {
        node
    }
}

/// Apply `edits` to every statement list in the subtree of `root`.
pub(crate) fn edit_tree(root: &Node, edits: &FxHashMap<NodeId, Edit>) -> (Node, Vec<Comment>) {
    let mut relocated = Vec::new();
    let node = transform(root, &mut |node| {
        let stmts = node.statements()?;
        if !stmts.iter().any(|s| edits.contains_key(&s.id())) {
            return None;
        }
        let edited = edit_statements(stmts, edits);
        relocated.extend(edited.relocated.iter().cloned());
        Some(with_statements(node, edited))
    });
    (node, relocated)
}

/// Post-order rebuild: `f` may replace each node after its children have
/// been rebuilt. Untouched subtrees are shared.
pub(crate) fn transform(node: &Node, f: &mut impl FnMut(&Node) -> Option<Node>) -> Node {
    let children = node.children();
    let rebuilt: Vec<Node> = children.iter().map(|c| transform(c, f)).collect();
    let changed = children
        .iter()
        .zip(&rebuilt)
        .any(|(old, new)| !Node::ptr_eq(old, new));
    let node = if changed {
        node.with_children(rebuilt)
    } else {
        node.clone()
    };
    f(&node).unwrap_or(node)
}
