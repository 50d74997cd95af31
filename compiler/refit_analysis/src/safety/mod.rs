//! Safety gate: the checks a matcher runs before committing a rewrite.
//!
//! Every query is a pure function of its arguments and the gate's
//! allow-list. The gate holds no memoized state, so a rejected match
//! leaves nothing behind. A `true` from any of these checks is a veto.

mod liveness;

use refit_ir::{Ancestors, MethodSig, Node, NodeKind, NodeTag, Type, TypeTable};
use tracing::trace;

use crate::scope::Binding;
use crate::MethodPattern;

/// Calls known not to have observable side effects.
const BASE_PURE_METHODS: &[&str] = &[
    "java.lang.String length()",
    "java.lang.String isEmpty()",
    "java.lang.String charAt(int)",
    "java.lang.String equals(java.lang.Object)",
    "java.lang.String valueOf(..)",
    "java.lang.Object toString()",
    "java.lang.Object hashCode()",
    "java.lang.Object equals(java.lang.Object)",
    "java.lang.Object getClass()",
    "java.util.Collection size()",
    "java.util.Collection isEmpty()",
    "java.util.List get(int)",
    "java.util.Map get(java.lang.Object)",
    "java.lang.Math *(..)",
    "java.lang.Integer valueOf(..)",
    "java.lang.Long valueOf(..)",
    "java.lang.Boolean valueOf(..)",
];

#[derive(Clone, Debug)]
pub struct SafetyGate {
    pure: Vec<MethodPattern>,
}

impl Default for SafetyGate {
    fn default() -> Self {
        SafetyGate::new()
    }
}

impl SafetyGate {
    /// A gate trusting only the built-in pure accessors.
    pub fn new() -> Self {
        SafetyGate::with_pure_methods(Vec::new())
    }

    /// A gate trusting the built-in pure accessors plus `additional`.
    pub fn with_pure_methods(additional: impl IntoIterator<Item = MethodPattern>) -> Self {
        let mut pure: Vec<MethodPattern> = BASE_PURE_METHODS
            .iter()
            .filter_map(|p| MethodPattern::parse(p).ok())
            .collect();
        pure.extend(additional);
        SafetyGate { pure }
    }

    pub fn pure_methods(&self) -> &[MethodPattern] {
        &self.pure
    }

    pub fn is_pure_call(&self, call: &Node) -> bool {
        self.pure.iter().any(|p| p.matches_call(call))
    }

    /// Conservative side-effect check. Calls outside the allow-list, object
    /// creation, assignments and increments are side effects. A lambda is
    /// not: building it runs none of its body.
    pub fn has_side_effect(&self, expr: &Node) -> bool {
        match expr.kind() {
            NodeKind::MethodCall { .. } if !self.is_pure_call(expr) => true,
            NodeKind::New { .. } | NodeKind::Assign { .. } => true,
            NodeKind::Unary { op, .. } if op.is_update() => true,
            NodeKind::Lambda { .. } => false,
            _ => expr.children().iter().any(|c| self.has_side_effect(c)),
        }
    }

    /// Whether changing an argument of `call` could change which overload
    /// is selected.
    ///
    /// Candidates are the same-named methods visible on the declaring type
    /// (including inherited ones) and, for unqualified calls, same-named
    /// methods declared by enclosing classes. The call is ambiguous when at
    /// least two candidates share its arity and some lambda or cast
    /// argument position has differing parameter types across them. An
    /// unresolved call is always treated as ambiguous.
    pub fn is_overload_ambiguous(
        &self,
        call: &Node,
        ancestors: Ancestors<'_>,
        types: &TypeTable,
    ) -> bool {
        let NodeKind::MethodCall {
            receiver,
            name,
            args,
            method,
        } = call.kind()
        else {
            return false;
        };
        let Some(sig) = method else {
            trace!(call = %name, "unresolved call treated as ambiguous");
            return true;
        };

        let mut candidates: Vec<MethodSig> = types
            .methods_named(&sig.declaring_type, name)
            .into_iter()
            .cloned()
            .collect();
        if receiver.is_none() {
            for class in ancestors.outward().filter(|n| n.tag() == NodeTag::Class) {
                for decl in declared_methods(class, name) {
                    if !candidates.iter().any(|c| c.param_types == decl.param_types) {
                        candidates.push(decl);
                    }
                }
            }
        }
        if !candidates.iter().any(|c| c.param_types == sig.param_types) {
            candidates.push(sig.clone());
        }

        let same_arity: Vec<&MethodSig> = candidates
            .iter()
            .filter(|c| c.arity() == args.len())
            .collect();
        let [first, rest @ ..] = same_arity.as_slice() else {
            return false;
        };
        if rest.is_empty() {
            return false;
        }
        args.iter().enumerate().any(|(idx, arg)| {
            matches!(arg.strip_parens().tag(), NodeTag::Lambda | NodeTag::Cast)
                && rest
                    .iter()
                    .any(|c| c.param_types[idx] != first.param_types[idx])
        })
    }

    /// Whether `binding` may be read after `point` completes. `ancestors`
    /// are the ancestors of `point`.
    pub fn is_live_after(&self, binding: &Binding, point: &Node, ancestors: Ancestors<'_>) -> bool {
        liveness::is_live_after(binding, point, ancestors)
    }
}

/// Signatures of the methods named `name` declared directly in `class`.
fn declared_methods(class: &Node, name: &str) -> Vec<MethodSig> {
    let NodeKind::Class {
        name: class_name,
        members,
        ..
    } = class.kind()
    else {
        return Vec::new();
    };
    members
        .iter()
        .filter_map(|member| match member.kind() {
            NodeKind::Method {
                name: method_name,
                params,
                return_type,
                ..
            } if method_name == name => Some(MethodSig::new(
                class_name,
                method_name,
                params
                    .iter()
                    .map(|p| match p.kind() {
                        NodeKind::Param { ty, .. } => ty.clone(),
                        _ => Type::Unknown,
                    })
                    .collect(),
                return_type.clone(),
            )),
            _ => None,
        })
        .collect()
}
