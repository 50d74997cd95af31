//! Unused local variables and parameters.
//!
//! Offered at two levels:
//!
//! 1. **Blocks and switches**: locals they declare that are never read.
//!    The case groups of a switch share one scope, so a local declared in
//!    one group is only unused if no later group touches it either.
//!    A local that is only ever assigned takes its assignment statements
//!    with it. Initializers and assigned values must be free of side
//!    effects unless `remove_side_effecting_initializers` is set, in which
//!    case they are kept as expression statements.
//! 2. **Classes**: parameters of private, non-overloaded methods that are
//!    never referenced, removed together with the matching argument at
//!    every call site in the class. Every such argument must be free of
//!    side effects. A nested class is skipped when its enclosing classes
//!    call a method of the same name.
//!
//! Loop variables, catch parameters, resources and lambda parameters are
//! never touched.

use refit_analysis::{Access, BindingKind, References, Scope};
use refit_ir::{Ancestors, AssignOp, MethodSig, Modifiers, Name, Node, NodeId, NodeKind, NodeTag};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::edit::{edit_tree, transform, Edit};
use crate::matcher::{MatchContext, MatchResult, Matcher, Rewrite};

pub struct UnusedBindingMatcher {
    ignored: FxHashSet<Name>,
    remove_side_effecting: bool,
}

impl UnusedBindingMatcher {
    pub const NAME: &'static str = "unused-binding";

    pub fn new(ignored_names: &[String], remove_side_effecting: bool) -> Self {
        UnusedBindingMatcher {
            ignored: ignored_names.iter().map(|n| Name::new(n)).collect(),
            remove_side_effecting,
        }
    }

    /// The edit that drops a statement whose only job was to compute
    /// `value`, or `None` when the value must stay and cannot.
    fn drop_keeping(&self, stmt: &Node, value: Option<&Node>, cx: &MatchContext<'_>) -> Option<Edit> {
        let Some(value) = value else {
            return Some(Edit::Remove);
        };
        if !cx.gate.has_side_effect(value) {
            return Some(Edit::Remove);
        }
        if !self.remove_side_effecting || !is_statement_expression(value) {
            return None;
        }
        let kept = Node::synthetic(NodeKind::ExprStmt {
            expr: value.clone(),
        })
        .with_trivia(stmt.trivia().clone());
        Some(Edit::Replace(kept))
    }

    fn unused_locals(&self, container: &Node, cx: &MatchContext<'_>) -> MatchResult {
        let Some(scope) = Scope::of(container, cx.ancestors) else {
            return MatchResult::NoMatch;
        };
        let mut edits: FxHashMap<NodeId, Edit> = FxHashMap::default();
        'bindings: for binding in scope.bindings() {
            if binding.kind() != BindingKind::Local || self.ignored.contains(binding.name()) {
                continue;
            }
            let NodeKind::LocalVar {
                annotations, init, ..
            } = binding.decl().kind()
            else {
                continue;
            };
            if !annotations.is_empty() {
                continue;
            }

            let refs = References::under(container, cx.ancestors, binding);
            let mut binding_edits = Vec::new();
            for reference in &refs {
                if reference.access() != Access::Write {
                    continue 'bindings;
                }
                // Only `x = value;` as a whole statement in a statement
                // list can go.
                let path = reference.ancestors().as_slice();
                let [.., list, stmt, assign] = path else {
                    continue 'bindings;
                };
                let value = match assign.kind() {
                    NodeKind::Assign {
                        op: AssignOp::Plain,
                        value,
                        ..
                    } if list.statements().is_some() && stmt.tag() == NodeTag::ExprStmt => value,
                    _ => continue 'bindings,
                };
                let Some(edit) = self.drop_keeping(stmt, Some(value), cx) else {
                    continue 'bindings;
                };
                binding_edits.push((stmt.id(), edit));
            }
            let Some(edit) = self.drop_keeping(binding.decl(), init.as_ref(), cx) else {
                trace!(local = %binding.name(), "initializer has side effects");
                continue;
            };
            trace!(local = %binding.name(), writes = binding_edits.len(), "removing unused local");
            edits.insert(binding.id(), edit);
            edits.extend(binding_edits);
        }

        if edits.is_empty() {
            return MatchResult::NoMatch;
        }
        let (replacement, relocated) = edit_tree(container, &edits);
        MatchResult::Matched(Rewrite::new(replacement).relocating(relocated))
    }

    fn unused_params(&self, class: &Node, cx: &MatchContext<'_>) -> MatchResult {
        let NodeKind::Class {
            name: class_name,
            members,
            ..
        } = class.kind()
        else {
            return MatchResult::NoMatch;
        };
        let class_path = cx.ancestors.extended(class);
        // Private members of a nested class are reachable from the whole
        // top-level class, and only this class can be rewritten here.
        let top_level = cx.ancestors.as_slice().iter().find(|a| a.tag() == NodeTag::Class);
        let mut removals: FxHashMap<Name, (NodeId, Vec<usize>)> = FxHashMap::default();
        for method in members {
            let NodeKind::Method {
                modifiers,
                name: method_name,
                params,
                body: Some(_),
                ..
            } = method.kind()
            else {
                continue;
            };
            if !modifiers.contains(Modifiers::PRIVATE) || params.is_empty() {
                continue;
            }
            let overloaded = members
                .iter()
                .filter(|m| m.tag() == NodeTag::Method && m.name() == Some(method_name))
                .count()
                > 1;
            if overloaded {
                continue;
            }
            let called_outside = top_level
                .is_some_and(|top| calls_named(top, method_name) != calls_named(class, method_name));
            if called_outside {
                trace!(method = %method_name, "called from outside the nested class");
                continue;
            }
            let Some(scope) = Scope::of(method, Ancestors::new(&class_path)) else {
                continue;
            };
            let unused: Vec<usize> = scope
                .bindings()
                .iter()
                .enumerate()
                .filter(|(_, binding)| {
                    let plain = matches!(
                        binding.decl().kind(),
                        NodeKind::Param { annotations, .. } if annotations.is_empty()
                    );
                    plain
                        && !self.ignored.contains(binding.name())
                        && References::under(method, scope.ancestors(), binding).is_empty()
                })
                .map(|(idx, _)| idx)
                .collect();
            if unused.is_empty() {
                continue;
            }
            if call_sites_allow(class, class_name, method_name, params.len(), &unused, cx) {
                removals.insert(method_name.clone(), (method.id(), unused));
            }
        }

        if removals.is_empty() {
            return MatchResult::NoMatch;
        }
        let method_ids: FxHashMap<NodeId, &Vec<usize>> =
            removals.values().map(|(id, idxs)| (*id, idxs)).collect();
        let replacement = transform(class, &mut |node| match node.kind() {
            NodeKind::Method {
                modifiers,
                annotations,
                return_type,
                name,
                params,
                body,
            } => {
                let dropped = method_ids.get(&node.id())?;
                trace!(method = %name, params = dropped.len(), "removing unused parameters");
                Some(node.with_kind(NodeKind::Method {
                    modifiers: *modifiers,
                    annotations: annotations.clone(),
                    return_type: return_type.clone(),
                    name: name.clone(),
                    params: without_indices(params, dropped),
                    body: body.clone(),
                }))
            }
            NodeKind::MethodCall {
                receiver,
                name: called,
                args,
                method,
            } => {
                let (_, dropped) = removals.get(called)?;
                if !calls_into(class_name, receiver.as_ref(), method.as_ref()) {
                    return None;
                }
                Some(node.with_kind(NodeKind::MethodCall {
                    receiver: receiver.clone(),
                    name: called.clone(),
                    args: without_indices(args, dropped),
                    method: method.clone().map(|mut sig| {
                        sig.param_types = without_indices(&sig.param_types, dropped);
                        sig
                    }),
                }))
            }
            _ => None,
        });
        MatchResult::Matched(Rewrite::new(replacement))
    }
}

impl Matcher for UnusedBindingMatcher {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn priority(&self) -> u16 {
        30
    }

    fn applies_to(&self, tag: NodeTag) -> bool {
        matches!(tag, NodeTag::Block | NodeTag::Switch | NodeTag::Class)
    }

    fn try_match(&self, node: &Node, cx: &MatchContext<'_>) -> MatchResult {
        if node.tag() == NodeTag::Class {
            self.unused_params(node, cx)
        } else {
            self.unused_locals(node, cx)
        }
    }
}

/// Expressions that may stand alone as a statement.
fn is_statement_expression(expr: &Node) -> bool {
    match expr.kind() {
        NodeKind::MethodCall { .. } | NodeKind::New { .. } | NodeKind::Assign { .. } => true,
        NodeKind::Unary { op, .. } => op.is_update(),
        _ => false,
    }
}

/// Whether a call named like the private method actually targets it.
fn calls_into(class_name: &Name, receiver: Option<&Node>, method: Option<&MethodSig>) -> bool {
    match (method, receiver) {
        (Some(sig), _) => sig.declaring_type.simple() == class_name.simple(),
        (None, None) => true,
        (None, Some(r)) => r.as_ident().is_some_and(|n| n == "this"),
    }
}

/// Every call to `method_name` in the class passes a side-effect free
/// argument at each removed position.
fn call_sites_allow(
    class: &Node,
    class_name: &Name,
    method_name: &Name,
    arity: usize,
    unused: &[usize],
    cx: &MatchContext<'_>,
) -> bool {
    class.descendants().all(|node| match node.kind() {
        NodeKind::MethodCall {
            receiver,
            name,
            args,
            method,
        } if name == method_name => {
            if !calls_into(class_name, receiver.as_ref(), method.as_ref()) {
                // Unresolved calls on another receiver may still reach the
                // private method through another instance.
                return method.is_some();
            }
            args.len() == arity && unused.iter().all(|&i| !cx.gate.has_side_effect(&args[i]))
        }
        _ => true,
    })
}

fn calls_named(root: &Node, method_name: &Name) -> usize {
    root.descendants()
        .filter(|node| {
            matches!(node.kind(), NodeKind::MethodCall { name, .. } if name == method_name)
        })
        .count()
}

fn without_indices<T: Clone>(items: &[T], drop: &[usize]) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter(|(idx, _)| !drop.contains(idx))
        .map(|(_, item)| item.clone())
        .collect()
}
