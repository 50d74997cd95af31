//! `try`/`finally` resource cleanup to `try`-with-resources.
//!
//! ```text
//! Closeable c = open();                try (Closeable c = open()) {
//! try {                                    use(c);
//!     use(c);                      ⇒   }
//! } finally {
//!     if (c != null) c.close();
//! }
//! ```
//!
//! A declaration without an initializer (or initialized to `null`) takes
//! its initializer from a `c = …;` that opens the try body.
//!
//! The matcher declines when the resource is used from a catch clause,
//! used in `finally` other than to close it, written again in the body, or
//! referenced after the try statement.

use refit_analysis::{statement_scope, Access, Binding, Reference, References};
use refit_ir::{Ancestors, AssignOp, BinaryOp, Comment, Name, Node, NodeId, NodeKind, NodeTag, Trivia};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::edit::{edit_statements, with_statements, Edit};
use crate::matcher::{MatchContext, MatchResult, Matcher, Rewrite};

#[derive(Default)]
pub struct TryFinallyToScopedMatcher;

impl TryFinallyToScopedMatcher {
    pub const NAME: &'static str = "try-finally-to-scoped";

    pub fn new() -> Self {
        TryFinallyToScopedMatcher
    }
}

impl Matcher for TryFinallyToScopedMatcher {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> u16 {
        10
    }

    fn applies_to(&self, tag: NodeTag) -> bool {
        matches!(tag, NodeTag::Block | NodeTag::Case)
    }

    fn try_match(&self, node: &Node, cx: &MatchContext<'_>) -> MatchResult {
        let Some(stmts) = node.statements() else {
            return MatchResult::NoMatch;
        };
        let Some(scope) = statement_scope(node, cx.ancestors) else {
            return MatchResult::NoMatch;
        };
        let path = cx.ancestors.extended(node);
        for pair in stmts.windows(2) {
            let [decl, try_stmt] = pair else { continue };
            let Some(binding) = scope.bindings().iter().find(|b| b.id() == decl.id()) else {
                continue;
            };
            let Some(converted) = convert(decl, try_stmt, binding, &path, cx) else {
                continue;
            };
            // Later statements, or later case groups of a switch, must not
            // see the resource.
            let escapes = References::under(scope.owner(), scope.ancestors(), binding)
                .iter()
                .any(|r| !r.ancestors().as_slice().iter().any(|a| a.same_node(try_stmt)));
            if escapes {
                trace!(resource = %binding.name(), "resource used after try");
                continue;
            }

            trace!(resource = %binding.name(), "converting to scoped resource");
            let mut edits: FxHashMap<NodeId, Edit> = FxHashMap::default();
            edits.insert(decl.id(), Edit::Remove);
            edits.insert(try_stmt.id(), Edit::Replace(converted.node));
            let edited = edit_statements(stmts, &edits);
            let relocated: Vec<_> = converted
                .relocated
                .into_iter()
                .chain(edited.relocated.iter().cloned())
                .collect();
            return MatchResult::Matched(
                Rewrite::new(with_statements(node, edited)).relocating(relocated),
            );
        }
        MatchResult::NoMatch
    }
}

struct Converted {
    node: Node,
    relocated: Vec<Comment>,
}

/// Where a reference to the resource sits inside the try statement.
enum Site {
    Resource,
    Body(usize),
    Catch,
    Finally(NodeId),
}

fn convert(
    decl: &Node,
    try_stmt: &Node,
    binding: &Binding,
    block_path: &[Node],
    cx: &MatchContext<'_>,
) -> Option<Converted> {
    let NodeKind::LocalVar { ty, init, .. } = decl.kind() else {
        return None;
    };
    let NodeKind::Try {
        resources,
        body,
        catches,
        finally: Some(finally),
    } = try_stmt.kind()
    else {
        return None;
    };
    if !cx.types.is_closeable(ty) {
        return None;
    }
    let name = binding.name();
    let body_stmts = body.statements()?;
    let finally_stmts = finally.statements()?;

    let closes: FxHashMap<NodeId, Edit> = finally_stmts
        .iter()
        .filter(|s| is_close(s, name))
        .map(|s| (s.id(), Edit::Remove))
        .collect();
    if closes.is_empty() {
        return None;
    }

    // Without a usable initializer the body must supply one.
    let needs_init = match init {
        None => true,
        Some(value) => value.strip_parens().is_null_literal(),
    };
    let assignment = if needs_init {
        // Only the opening statement: anything before it would run after
        // the resource is acquired.
        Some(assigned_value(body_stmts.first()?, name)?.clone())
    } else {
        None
    };

    let depth = block_path.len();
    for reference in &References::under(try_stmt, Ancestors::new(block_path), binding) {
        let site = site_of(&reference, depth, try_stmt)?;
        let allowed = match (site, &assignment) {
            (Site::Resource, _) => true,
            (Site::Catch, _) => false,
            (Site::Finally(stmt), _) => closes.contains_key(&stmt),
            (Site::Body(0), Some(_)) => reference.access() == Access::Write,
            (Site::Body(_), _) => !reference.access().writes(),
        };
        if !allowed {
            trace!(resource = %name, "resource reference blocks conversion");
            return None;
        }
    }

    let mut relocated = Vec::new();
    let new_body = match &assignment {
        Some(_) => {
            let mut edits = FxHashMap::default();
            edits.insert(body_stmts[0].id(), Edit::Remove);
            let edited = edit_statements(body_stmts, &edits);
            relocated.extend(edited.relocated.iter().cloned());
            with_statements(body, edited)
        }
        None => body.clone(),
    };
    let resource_init = match assignment {
        Some(value) => value,
        None => init.clone()?,
    };
    let resource = decl
        .with_kind(match decl.kind() {
            NodeKind::LocalVar {
                annotations,
                modifiers,
                ty,
                name,
                ..
            } => NodeKind::LocalVar {
                annotations: annotations.clone(),
                modifiers: *modifiers,
                ty: ty.clone(),
                name: name.clone(),
                init: Some(resource_init),
            },
            other => other.clone(),
        })
        .with_trivia(Trivia::new());
    let mut new_resources = Vec::with_capacity(resources.len() + 1);
    new_resources.push(resource);
    new_resources.extend(resources.iter().cloned());

    let edited = edit_statements(finally_stmts, &closes);
    relocated.extend(edited.relocated.iter().cloned());
    let mut trivia = try_stmt.trivia().clone();
    let new_finally = if edited.stmts.is_empty() {
        // The dropped clause leaves its comments on the try statement.
        trivia = Trivia::merged_after(&trivia, finally.trivia());
        trivia = Trivia::merged_after(&trivia, &edited.orphaned);
        None
    } else {
        Some(with_statements(finally, edited))
    };

    let node = try_stmt
        .with_kind(NodeKind::Try {
            resources: new_resources,
            body: new_body,
            catches: catches.clone(),
            finally: new_finally,
        })
        .with_trivia(trivia);
    Some(Converted { node, relocated })
}

fn site_of(reference: &Reference, depth: usize, try_stmt: &Node) -> Option<Site> {
    let path = reference.ancestors().as_slice();
    let child = path.get(depth + 1).unwrap_or(reference.node());
    let NodeKind::Try {
        resources,
        body,
        catches,
        finally,
    } = try_stmt.kind()
    else {
        return None;
    };
    if resources.iter().any(|r| r.same_node(child)) {
        return Some(Site::Resource);
    }
    if catches.iter().any(|c| c.same_node(child)) {
        return Some(Site::Catch);
    }
    let stmt = path.get(depth + 2).unwrap_or(reference.node());
    if body.same_node(child) {
        return body.child_index(stmt).map(Site::Body);
    }
    if finally.as_ref().is_some_and(|f| f.same_node(child)) {
        return Some(Site::Finally(stmt.id()));
    }
    None
}

/// `v = value;` as a whole statement.
fn assigned_value<'n>(stmt: &'n Node, name: &Name) -> Option<&'n Node> {
    let NodeKind::ExprStmt { expr } = stmt.kind() else {
        return None;
    };
    match expr.kind() {
        NodeKind::Assign {
            op: AssignOp::Plain,
            target,
            value,
        } if target.strip_parens().as_ident() == Some(name) => Some(value),
        _ => None,
    }
}

/// `v.close();`, optionally wrapped in `if (v != null)` and braces.
fn is_close(stmt: &Node, name: &Name) -> bool {
    match stmt.kind() {
        NodeKind::ExprStmt { expr } => matches!(
            expr.kind(),
            NodeKind::MethodCall { receiver: Some(receiver), name: method, args, .. }
                if method == "close"
                    && args.is_empty()
                    && receiver.strip_parens().as_ident() == Some(name)
        ),
        NodeKind::Block { stmts } => matches!(stmts.as_slice(), [only] if is_close(only, name)),
        NodeKind::If {
            cond,
            then_branch,
            else_branch: None,
        } => is_non_null_check(cond, name) && is_close(then_branch, name),
        _ => false,
    }
}

fn is_non_null_check(cond: &Node, name: &Name) -> bool {
    let NodeKind::Binary {
        op: BinaryOp::NotEq,
        lhs,
        rhs,
    } = cond.strip_parens().kind()
    else {
        return false;
    };
    let operand = if rhs.is_null_literal() {
        lhs
    } else if lhs.is_null_literal() {
        rhs
    } else {
        return false;
    };
    operand.strip_parens().as_ident() == Some(name)
}
