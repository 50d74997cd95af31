//! Shared helpers for unit tests.

#![allow(clippy::expect_used)]

use refit_ir::visitor::{walk, Visitor, Walk};
use refit_ir::{Ancestors, Node};

struct Locate<'p> {
    pred: &'p dyn Fn(&Node) -> bool,
    skip: usize,
    found: Option<(Node, Vec<Node>)>,
}

impl Visitor for Locate<'_> {
    fn enter(&mut self, node: &Node, ancestors: Ancestors<'_>) -> Walk {
        if self.found.is_some() {
            return Walk::SkipChildren;
        }
        if (self.pred)(node) {
            if self.skip == 0 {
                self.found = Some((node.clone(), ancestors.as_slice().to_vec()));
                return Walk::SkipChildren;
            }
            self.skip -= 1;
        }
        Walk::Continue
    }
}

/// The `nth` node (pre-order) satisfying `pred`, with its ancestor path.
pub(crate) fn locate_nth(root: &Node, nth: usize, pred: impl Fn(&Node) -> bool) -> (Node, Vec<Node>) {
    let mut locate = Locate {
        pred: &pred,
        skip: nth,
        found: None,
    };
    walk(root, &mut locate);
    locate.found.expect("node not found")
}

pub(crate) fn locate(root: &Node, pred: impl Fn(&Node) -> bool) -> (Node, Vec<Node>) {
    locate_nth(root, 0, pred)
}

/// The `nth` identifier expression spelled `name`.
pub(crate) fn ident(root: &Node, name: &str, nth: usize) -> (Node, Vec<Node>) {
    locate_nth(root, nth, |n| n.as_ident().is_some_and(|i| i == name))
}
