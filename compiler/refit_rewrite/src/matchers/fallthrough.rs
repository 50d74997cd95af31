//! Missing `break` at the end of a switch case group.
//!
//! A non-empty case group that is not the last one must end in a statement
//! that never completes normally, or carry a comment saying the
//! fall-through is intended. Otherwise a `break;` is appended.

use regex::Regex;
use refit_ir::{Comment, Literal, Name, Node, NodeKind, NodeTag, Trivia};
use tracing::trace;

use crate::matcher::{MatchContext, MatchResult, Matcher, Rewrite};

pub struct FallthroughMatcher {
    marker: Regex,
    check_last_case_group: bool,
}

impl FallthroughMatcher {
    pub const NAME: &'static str = "fallthrough";

    pub fn new(marker: Regex, check_last_case_group: bool) -> Self {
        FallthroughMatcher {
            marker,
            check_last_case_group,
        }
    }

    fn is_marker(&self, comments: &[Comment]) -> bool {
        comments.iter().any(|c| self.marker.is_match(&c.text))
    }

    /// Whether case group `idx` ends with, or the next group opens with,
    /// a fall-through marker.
    fn marked_fallthrough(&self, cases: &[Node], idx: usize) -> bool {
        let case = &cases[idx];
        let last_stmt = case
            .statements()
            .and_then(<[Node]>::last)
            .is_some_and(|s| self.is_marker(&s.trivia().trailing));
        last_stmt
            || self.is_marker(&case.trivia().trailing)
            || cases.get(idx + 1).is_some_and(|next| {
                self.is_marker(&next.trivia().leading)
                    || next
                        .statements()
                        .and_then(<[Node]>::first)
                        .is_some_and(|s| self.is_marker(&s.trivia().leading))
            })
    }
}

impl Matcher for FallthroughMatcher {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> u16 {
        10
    }

    fn applies_to(&self, tag: NodeTag) -> bool {
        tag == NodeTag::Switch
    }

    fn try_match(&self, node: &Node, _cx: &MatchContext<'_>) -> MatchResult {
        let NodeKind::Switch { selector, cases } = node.kind() else {
            return MatchResult::NoMatch;
        };
        let checked = if self.check_last_case_group {
            cases.len()
        } else {
            cases.len().saturating_sub(1)
        };

        let mut changed = false;
        let new_cases: Vec<Node> = cases
            .iter()
            .enumerate()
            .map(|(idx, case)| {
                let NodeKind::Case { labels, body } = case.kind() else {
                    return case.clone();
                };
                let Some(last) = body.last() else {
                    // `case 1: case 2:` groups labels on purpose.
                    return case.clone();
                };
                if idx >= checked || is_terminal(last) || self.marked_fallthrough(cases, idx) {
                    return case.clone();
                }
                trace!(case = idx, "appending break");
                changed = true;
                let mut body = body.clone();
                let trivia = Trivia {
                    whitespace: last.trivia().whitespace.clone(),
                    ..Trivia::default()
                };
                body.push(Node::synthetic(NodeKind::Break { label: None }).with_trivia(trivia));
                case.with_kind(NodeKind::Case {
                    labels: labels.clone(),
                    body,
                })
            })
            .collect();

        if !changed {
            return MatchResult::NoMatch;
        }
        MatchResult::Matched(Rewrite::new(node.with_kind(NodeKind::Switch {
            selector: selector.clone(),
            cases: new_cases,
        })))
    }
}

/// Whether `stmt` can never complete normally.
fn is_terminal(stmt: &Node) -> bool {
    match stmt.kind() {
        NodeKind::Return { .. }
        | NodeKind::Throw { .. }
        | NodeKind::Break { .. }
        | NodeKind::Continue { .. } => true,
        NodeKind::Block { stmts } => stmts.last().is_some_and(is_terminal),
        NodeKind::If {
            then_branch,
            else_branch: Some(else_branch),
            ..
        } => is_terminal(then_branch) && is_terminal(else_branch),
        NodeKind::Try {
            body,
            catches,
            finally,
            ..
        } => {
            finally.as_ref().is_some_and(is_terminal)
                || (is_terminal(body)
                    && catches.iter().all(|c| match c.kind() {
                        NodeKind::Catch { body, .. } => is_terminal(body),
                        _ => false,
                    }))
        }
        NodeKind::Switch { cases, .. } => {
            let exhaustive = cases.iter().any(|c| {
                matches!(c.kind(), NodeKind::Case { labels, .. } if labels.is_empty())
            });
            exhaustive
                && !cases.iter().any(breaks_out)
                && cases
                    .last()
                    .and_then(Node::statements)
                    .and_then(<[Node]>::last)
                    .is_some_and(is_terminal)
        }
        NodeKind::While { cond, body } | NodeKind::DoWhile { body, cond } => {
            is_true(cond) && !breaks_out(body)
        }
        NodeKind::For { cond, body, .. } => {
            cond.as_ref().is_none_or(is_true) && !breaks_out(body)
        }
        // Unlabeled breaks in the body leave an enclosing construct, or a
        // labeled loop, which `is_terminal(body)` already accounts for.
        NodeKind::Labeled { label, body } => is_terminal(body) && !breaks_to(body, label),
        _ => false,
    }
}

fn is_true(cond: &Node) -> bool {
    matches!(cond.strip_parens().kind(), NodeKind::Literal(Literal::Bool(true)))
}

/// Whether a `break` inside `node` leaves the construct that contains it:
/// an unlabeled break not nested in an inner loop or switch, or any
/// labeled break (its target is unknown here).
fn breaks_out(node: &Node) -> bool {
    match node.kind() {
        NodeKind::Break { .. } => true,
        NodeKind::Lambda { .. } => false,
        NodeKind::Switch { cases, .. } => cases.iter().any(has_labeled_break),
        kind if NodeKind::tag(kind).is_loop() => node.children().iter().any(has_labeled_break),
        _ => node.children().iter().any(breaks_out),
    }
}

fn has_labeled_break(node: &Node) -> bool {
    node.descendants()
        .any(|n| matches!(n.kind(), NodeKind::Break { label: Some(_) }))
}

/// Whether `node` contains `break label;`.
fn breaks_to(node: &Node, label: &Name) -> bool {
    node.descendants().any(|n| {
        matches!(n.kind(), NodeKind::Break { label: Some(target) } if target == label)
    })
}
