//! Shared helpers for matcher unit tests.

#![allow(clippy::expect_used)]

use refit_analysis::SafetyGate;
use refit_ir::visitor::{walk, Visitor, Walk};
use refit_ir::{sketch, Ancestors, Modifiers, Node, NodeTag, Type, TypeTable};

use crate::matcher::{MatchContext, MatchResult, Matcher, Rewrite};

struct Locate<'p> {
    pred: &'p dyn Fn(&Node) -> bool,
    found: Option<(Node, Vec<Node>)>,
}

impl Visitor for Locate<'_> {
    fn enter(&mut self, node: &Node, ancestors: Ancestors<'_>) -> Walk {
        if self.found.is_none() && (self.pred)(node) {
            self.found = Some((node.clone(), ancestors.as_slice().to_vec()));
        }
        if self.found.is_some() {
            Walk::SkipChildren
        } else {
            Walk::Continue
        }
    }
}

/// First node (pre-order) satisfying `pred`, with its ancestor path.
pub(crate) fn locate(root: &Node, pred: impl Fn(&Node) -> bool) -> (Node, Vec<Node>) {
    let mut locate = Locate {
        pred: &pred,
        found: None,
    };
    walk(root, &mut locate);
    locate.found.expect("node not found")
}

/// Offer the first node with `tag` to `matcher`.
pub(crate) fn try_at(
    matcher: &dyn Matcher,
    root: &Node,
    types: &TypeTable,
    tag: NodeTag,
) -> MatchResult {
    let (node, path) = locate(root, |n| n.tag() == tag);
    let gate = SafetyGate::new();
    let cx = MatchContext {
        ancestors: Ancestors::new(&path),
        types,
        gate: &gate,
    };
    matcher.try_match(&node, &cx)
}

/// The rewrite produced at the first node with `tag`, or `None`.
pub(crate) fn rewrite_at(
    matcher: &dyn Matcher,
    root: &Node,
    types: &TypeTable,
    tag: NodeTag,
) -> Option<Rewrite> {
    match try_at(matcher, root, types, tag) {
        MatchResult::Matched(rewrite) => Some(rewrite),
        MatchResult::NoMatch => None,
    }
}

/// Sketch of the replacement produced at the first node with `tag`.
pub(crate) fn sketch_at(
    matcher: &dyn Matcher,
    root: &Node,
    types: &TypeTable,
    tag: NodeTag,
) -> Option<String> {
    rewrite_at(matcher, root, types, tag).map(|r| sketch(&r.replacement))
}

/// `void run() { <stmts> }` inside `class C`.
pub(crate) fn in_method(b: &refit_ir::build::TreeBuilder, stmts: Vec<Node>) -> Node {
    b.class(
        Modifiers::empty(),
        "C",
        vec![b.method(Modifiers::empty(), Type::Void, "run", vec![], b.block(stmts))],
    )
}
