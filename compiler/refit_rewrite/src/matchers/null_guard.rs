//! Required-parameter detection from leading null guards.
//!
//! A public method whose body opens with null checks on its parameters
//! documents those parameters as required. The matcher annotates them and
//! drops guard statements that only restate the annotation:
//!
//! ```text
//! public void f(String a, String b) {      public void f(@NonNull String a,
//!     if (a == null || b == null)                    @NonNull String b) {
//!         throw new IAE();               ⇒       use(a, b);
//!     use(a, b);                             }
//! }
//! ```
//!
//! - `if (p == null) throw|return` marks `p` and is removed.
//! - An `||` chain of null checks marks every parameter in it; an `&&`
//!   chain proves nothing about any single one and ends the guard prefix.
//! - `Objects.requireNonNull(p)` and configured null-checking calls mark
//!   `p` but stay in place: they still throw with their own message.

use refit_analysis::MethodPattern;
use refit_ir::{BinaryOp, Modifiers, Name, Node, NodeId, NodeKind, NodeTag};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::edit::{edit_statements, with_statements, Edit};
use crate::matcher::{DeferredAction, MatchContext, MatchResult, Matcher, Rewrite};

const REQUIRE_NON_NULL: &str = "java.util.Objects requireNonNull(..)";

pub struct NullGuardMatcher {
    annotation: Name,
    null_checks: Vec<MethodPattern>,
}

impl NullGuardMatcher {
    pub const NAME: &'static str = "null-guard";

    pub fn new(annotation: &str, additional_null_checks: Vec<MethodPattern>) -> Self {
        let mut null_checks: Vec<MethodPattern> =
            MethodPattern::parse(REQUIRE_NON_NULL).into_iter().collect();
        null_checks.extend(additional_null_checks);
        NullGuardMatcher {
            annotation: Name::new(annotation),
            null_checks,
        }
    }

    /// Parameters a leading statement proves non-null, and whether the
    /// statement is a removable `if` guard. `None` ends the guard prefix.
    fn guard(&self, stmt: &Node, params: &FxHashSet<&str>) -> Option<(Vec<Name>, bool)> {
        match stmt.kind() {
            NodeKind::If {
                cond,
                then_branch,
                else_branch: None,
            } if exits(then_branch) => {
                let mut marked = Vec::new();
                null_checked(cond, params, &mut marked).then_some((marked, true))
            }
            NodeKind::ExprStmt { expr } => {
                let call = match expr.kind() {
                    NodeKind::Assign { value, .. } => value,
                    _ => expr,
                };
                self.checked_argument(call, params)
                    .map(|name| (vec![name], false))
            }
            _ => None,
        }
    }

    fn checked_argument(&self, call: &Node, params: &FxHashSet<&str>) -> Option<Name> {
        let NodeKind::MethodCall { args, .. } = call.kind() else {
            return None;
        };
        if !self.null_checks.iter().any(|p| p.matches_call(call)) {
            return None;
        }
        let name = args.first()?.strip_parens().as_ident()?;
        params.contains(name.as_str()).then(|| name.clone())
    }

    fn has_annotation(&self, annotations: &[Node]) -> bool {
        annotations.iter().any(|a| {
            a.name()
                .is_some_and(|n| *n == self.annotation || n.as_str() == self.annotation.simple())
        })
    }
}

impl Matcher for NullGuardMatcher {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> u16 {
        10
    }

    fn applies_to(&self, tag: NodeTag) -> bool {
        tag == NodeTag::Method
    }

    fn try_match(&self, node: &Node, _cx: &MatchContext<'_>) -> MatchResult {
        let NodeKind::Method {
            modifiers,
            annotations,
            return_type,
            name,
            params,
            body: Some(body),
        } = node.kind()
        else {
            return MatchResult::NoMatch;
        };
        if !modifiers.contains(Modifiers::PUBLIC) || params.is_empty() {
            return MatchResult::NoMatch;
        }
        let Some(stmts) = body.statements() else {
            return MatchResult::NoMatch;
        };

        let reference_params: FxHashSet<&str> = params
            .iter()
            .filter_map(|p| match p.kind() {
                NodeKind::Param { ty, name, .. } if ty.is_reference() => Some(name.as_str()),
                _ => None,
            })
            .collect();

        let mut marked: FxHashSet<Name> = FxHashSet::default();
        let mut removals: FxHashMap<NodeId, Edit> = FxHashMap::default();
        for stmt in stmts {
            let Some((names, removable)) = self.guard(stmt, &reference_params) else {
                break;
            };
            marked.extend(names);
            if removable {
                removals.insert(stmt.id(), Edit::Remove);
            }
        }

        let mut annotated = false;
        let new_params: Vec<Node> = params
            .iter()
            .map(|param| match param.kind() {
                NodeKind::Param {
                    annotations,
                    ty,
                    name,
                } if marked.contains(name) && !self.has_annotation(annotations) => {
                    annotated = true;
                    let mut annotations = annotations.clone();
                    annotations.push(Node::synthetic(NodeKind::Annotation {
                        name: Name::new(self.annotation.simple()),
                    }));
                    param.with_kind(NodeKind::Param {
                        annotations,
                        ty: ty.clone(),
                        name: name.clone(),
                    })
                }
                _ => param.clone(),
            })
            .collect();

        if removals.is_empty() && !annotated {
            return MatchResult::NoMatch;
        }
        trace!(method = %name, guards = removals.len(), "null guards found");

        let edited = edit_statements(stmts, &removals);
        let relocated = edited.relocated.clone();
        let new_body = with_statements(body, edited);
        let method = node.with_kind(NodeKind::Method {
            modifiers: *modifiers,
            annotations: annotations.clone(),
            return_type: return_type.clone(),
            name: name.clone(),
            params: new_params,
            body: Some(new_body),
        });

        let mut rewrite = Rewrite::new(method).relocating(relocated);
        if annotated {
            rewrite = rewrite
                .referencing(self.annotation.clone())
                .defer(DeferredAction::AddImport(self.annotation.clone()));
        }
        MatchResult::Matched(rewrite)
    }
}

/// A guard body: `throw …` or `return …`, alone or in a block.
fn exits(stmt: &Node) -> bool {
    match stmt.kind() {
        NodeKind::Throw { .. } | NodeKind::Return { .. } => true,
        NodeKind::Block { stmts } => matches!(stmts.as_slice(), [only] if exits(only)),
        _ => false,
    }
}

/// Collect the parameters `cond` compares against `null`. Only a single
/// comparison or an `||` chain of them qualifies.
fn null_checked(cond: &Node, params: &FxHashSet<&str>, out: &mut Vec<Name>) -> bool {
    let cond = cond.strip_parens();
    match cond.kind() {
        NodeKind::Binary {
            op: BinaryOp::Or,
            lhs,
            rhs,
        } => null_checked(lhs, params, out) && null_checked(rhs, params, out),
        NodeKind::Binary {
            op: BinaryOp::Eq,
            lhs,
            rhs,
        } => {
            let operand = if rhs.is_null_literal() {
                lhs
            } else if lhs.is_null_literal() {
                rhs
            } else {
                return false;
            };
            match operand.strip_parens().as_ident() {
                Some(name) if params.contains(name.as_str()) => {
                    out.push(name.clone());
                    true
                }
                _ => false,
            }
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests;
