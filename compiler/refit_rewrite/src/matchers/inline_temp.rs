//! Temporaries that exist only to be returned or thrown.
//!
//! `T x = e; return x;` at the end of a statement list becomes `return e;`
//! (likewise `throw x;`). Comments of both statements end up on the
//! result. The value must already have type `T`, otherwise the local was
//! converting it and inlining would change which conversion happens. In a
//! case group the local must not be used by a later group either.

use refit_analysis::{statement_scope, References};
use refit_ir::{Node, NodeId, NodeKind, NodeTag, Type, TypeTable};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::edit::{edit_statements, with_statements, Edit};
use crate::matcher::{MatchContext, MatchResult, Matcher, Rewrite};

#[derive(Default)]
pub struct InlineTempMatcher;

impl InlineTempMatcher {
    pub const NAME: &'static str = "inline-temp";

    pub fn new() -> Self {
        InlineTempMatcher
    }
}

impl Matcher for InlineTempMatcher {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> u16 {
        20
    }

    fn applies_to(&self, tag: NodeTag) -> bool {
        matches!(tag, NodeTag::Block | NodeTag::Case)
    }

    fn try_match(&self, node: &Node, cx: &MatchContext<'_>) -> MatchResult {
        let Some(stmts) = node.statements() else {
            return MatchResult::NoMatch;
        };
        let [.., decl, exit] = stmts else {
            return MatchResult::NoMatch;
        };
        let NodeKind::LocalVar {
            annotations,
            ty,
            name,
            init: Some(init),
            ..
        } = decl.kind()
        else {
            return MatchResult::NoMatch;
        };
        if !annotations.is_empty() || !same_type(init, ty, cx.types) {
            return MatchResult::NoMatch;
        }
        if escapes_exit(decl, exit, node, cx) {
            trace!(local = %name, "temporary is used outside the exit statement");
            return MatchResult::NoMatch;
        }
        let inlined = match exit.kind() {
            NodeKind::Return { value: Some(value) }
                if value.strip_parens().as_ident() == Some(name) =>
            {
                NodeKind::Return {
                    value: Some(init.clone()),
                }
            }
            NodeKind::Throw { value } if value.strip_parens().as_ident() == Some(name) => {
                NodeKind::Throw {
                    value: init.clone(),
                }
            }
            _ => return MatchResult::NoMatch,
        };

        trace!(local = %name, "inlining temporary");
        let mut edits: FxHashMap<NodeId, Edit> = FxHashMap::default();
        edits.insert(decl.id(), Edit::Remove);
        edits.insert(exit.id(), Edit::Replace(exit.with_kind(inlined)));
        let edited = edit_statements(stmts, &edits);
        let relocated = edited.relocated.clone();
        MatchResult::Matched(Rewrite::new(with_statements(node, edited)).relocating(relocated))
    }
}

/// Whether the local declared by `decl` is referenced anywhere but inside
/// `exit`. Only a case group can hit this: later groups of the same switch
/// still see its locals.
fn escapes_exit(decl: &Node, exit: &Node, container: &Node, cx: &MatchContext<'_>) -> bool {
    let Some(scope) = statement_scope(container, cx.ancestors) else {
        return true;
    };
    let Some(binding) = scope.bindings().iter().find(|b| b.id() == decl.id()) else {
        return true;
    };
    References::under(scope.owner(), scope.ancestors(), binding)
        .iter()
        .any(|r| !r.ancestors().as_slice().iter().any(|a| a.same_node(exit)))
}

/// Whether `init` already has the declared type, so the local performs no
/// conversion.
fn same_type(init: &Node, declared: &Type, types: &TypeTable) -> bool {
    if !declared.is_known() {
        return true;
    }
    match init.ty() {
        Some(actual) if actual == declared => true,
        Some(actual) => {
            actual.is_reference() && declared.is_reference() && types.is_subtype(actual, declared)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests;
