//! Casts the surrounding context makes unnecessary.
//!
//! The context that receives the cast value decides the type it needs:
//!
//! | Context | Needed type |
//! |---------|-------------|
//! | `T x = (C) e;` | `T` |
//! | `x = (C) e;` | type of `x` |
//! | `return (C) e;` | return type of the enclosing method |
//! | `m((C) e)` | parameter type of the resolved `m` |
//!
//! The cast goes when the static type of `e` is already a subtype of both
//! `C` and the needed type. Primitive casts only go when the types are
//! identical. Casts feeding generic calls, lambdas or ambiguous overloads
//! stay, since they may steer inference or overload selection.

use refit_ir::{Ancestors, AssignOp, Node, NodeKind, NodeTag, Trivia, Type};
use tracing::trace;

use crate::matcher::{DeferredAction, MatchContext, MatchResult, Matcher, Rewrite};

#[derive(Default)]
pub struct RedundantCastMatcher;

impl RedundantCastMatcher {
    pub const NAME: &'static str = "redundant-cast";

    pub fn new() -> Self {
        RedundantCastMatcher
    }
}

impl Matcher for RedundantCastMatcher {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> u16 {
        10
    }

    fn applies_to(&self, tag: NodeTag) -> bool {
        tag == NodeTag::Cast
    }

    fn try_match(&self, node: &Node, cx: &MatchContext<'_>) -> MatchResult {
        let NodeKind::Cast { ty: cast_ty, expr } = node.kind() else {
            return MatchResult::NoMatch;
        };
        let Some(expr_ty) = expr.ty().filter(|t| t.is_known()) else {
            return MatchResult::NoMatch;
        };
        if steers_inference(expr) {
            return MatchResult::NoMatch;
        }
        let Some(needed) = needed_type(node, cx) else {
            trace!("cast context has no usable target type");
            return MatchResult::NoMatch;
        };
        if !removable(expr_ty, cast_ty, &needed, cx) {
            return MatchResult::NoMatch;
        }

        trace!(cast = %cast_ty, from = %expr_ty, to = %needed, "redundant cast");
        let replacement = expr.with_trivia(Trivia::merged_before(node.trivia(), expr.trivia()));
        let mut rewrite = Rewrite::new(replacement);
        if let Some(name) = cast_ty.class_name().filter(|n| n.qualifier().is_some()) {
            rewrite = rewrite.defer(DeferredAction::RemoveImport(name.clone()));
        }
        MatchResult::Matched(rewrite)
    }
}

fn removable(expr_ty: &Type, cast_ty: &Type, needed: &Type, cx: &MatchContext<'_>) -> bool {
    if expr_ty.is_primitive() || cast_ty.is_primitive() || needed.is_primitive() {
        return expr_ty == cast_ty && cast_ty == needed;
    }
    cx.types.is_subtype(expr_ty, cast_ty) && cx.types.is_assignable(expr_ty, needed)
}

/// Expressions whose type depends on the target type they flow into.
fn steers_inference(expr: &Node) -> bool {
    let expr = expr.strip_parens();
    match expr.kind() {
        NodeKind::Lambda { .. } | NodeKind::Conditional { .. } => true,
        NodeKind::MethodCall { method, .. } => method.as_ref().is_some_and(|sig| sig.generic),
        _ => false,
    }
}

/// The type the cast value is needed as, looking through parentheses.
fn needed_type(cast: &Node, cx: &MatchContext<'_>) -> Option<Type> {
    let path = cx.ancestors.as_slice();
    let mut child = cast;
    for (depth, parent) in path.iter().enumerate().rev() {
        let above = Ancestors::new(&path[..depth]);
        let needed = match parent.kind() {
            NodeKind::Paren { .. } => {
                child = parent;
                continue;
            }
            NodeKind::LocalVar {
                ty, init: Some(init), ..
            } if init.same_node(child) => Some(ty.clone()),
            NodeKind::Assign {
                op: AssignOp::Plain,
                target,
                value,
            } if value.same_node(child) => target.ty().cloned(),
            NodeKind::Return { value: Some(_) } => return_type(above),
            NodeKind::MethodCall { args, method, .. } => {
                let idx = args.iter().position(|a| a.same_node(child))?;
                let sig = method.as_ref()?;
                if sig.generic || cx.gate.is_overload_ambiguous(parent, above, cx.types) {
                    return None;
                }
                sig.param_types.get(idx).cloned()
            }
            _ => None,
        };
        return needed.filter(|t| t.is_known() && !t.mentions_type_var());
    }
    None
}

/// Return type of the method a `return` at `ancestors` leaves. A lambda
/// in between hides it.
fn return_type(ancestors: Ancestors<'_>) -> Option<Type> {
    for node in ancestors.outward() {
        match node.kind() {
            NodeKind::Lambda { .. } => return None,
            NodeKind::Method { return_type, .. } => return Some(return_type.clone()),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests;
