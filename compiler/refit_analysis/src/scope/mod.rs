//! Scope and shadowing resolution.
//!
//! Scopes are derived from the tree, never stored in it. A `Scope` is a
//! scope-introducing node together with the ancestor path above it; its
//! bindings are computed the first time they are asked for. Trees are
//! immutable, so a rewrite that changes a statement list produces new
//! scope values and stale bindings cannot be observed.
//!
//! Binding identity is the `NodeId` of the declaring node. Two bindings
//! spelled the same way in different scopes are different bindings.
//!
//! | Construct | Introduces |
//! |-----------|------------|
//! | class | fields |
//! | method, lambda | parameters |
//! | block | locals, visible after their declaration |
//! | switch | locals of every case group, visible after their declaration |
//! | for | init declarations |
//! | for-each | the loop variable |
//! | catch | the caught parameter |
//! | try | resources, visible to later resources and the body |

mod references;

use std::cell::OnceCell;

use refit_ir::{Ancestors, Name, Node, NodeId, NodeKind, NodeTag};
use smallvec::SmallVec;

use crate::ScopeError;

pub use references::{find_references, Access, Reference, ReferenceIter, References};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BindingKind {
    Parameter,
    LambdaParam,
    Local,
    Field,
    CatchParam,
    LoopVar,
    Resource,
}

/// A name bound by a declaration.
#[derive(Clone, Debug)]
pub struct Binding {
    name: Name,
    decl: Node,
    kind: BindingKind,
    owner: NodeId,
}

impl Binding {
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The declaring node (`LocalVar`, `Param` or `Field`).
    pub fn decl(&self) -> &Node {
        &self.decl
    }

    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    pub fn id(&self) -> NodeId {
        self.decl.id()
    }

    /// Id of the scope-introducing node that owns this binding.
    pub fn owner(&self) -> NodeId {
        self.owner
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Binding) -> bool {
        self.decl.same_node(&other.decl)
    }
}

impl Eq for Binding {}

/// A scope-introducing node viewed from its position in a tree.
#[derive(Debug)]
pub struct Scope<'a> {
    owner: Node,
    ancestors: Ancestors<'a>,
    bindings: OnceCell<Vec<Binding>>,
}

impl<'a> Scope<'a> {
    /// The scope introduced by `owner`, if it introduces one.
    pub fn of(owner: &Node, ancestors: Ancestors<'a>) -> Option<Self> {
        is_scope_owner(owner).then(|| Scope {
            owner: owner.clone(),
            ancestors,
            bindings: OnceCell::new(),
        })
    }

    pub fn owner(&self) -> &Node {
        &self.owner
    }

    /// Ancestors of the owner.
    pub fn ancestors(&self) -> Ancestors<'a> {
        self.ancestors
    }

    /// Bindings this scope introduces, in declaration order.
    pub fn bindings(&self) -> &[Binding] {
        self.bindings.get_or_init(|| {
            declarations(&self.owner)
                .into_iter()
                .map(|(decl, kind)| binding(&self.owner, decl, kind))
                .collect()
        })
    }

    /// A binding introduced directly by this scope.
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.bindings().iter().find(|b| b.name == name)
    }

    /// The next scope outward.
    pub fn parent(&self) -> Option<Scope<'a>> {
        enclosing_scope(&self.owner, self.ancestors).ok()
    }
}

/// The innermost scope strictly above `node`.
pub fn enclosing_scope<'a>(node: &Node, ancestors: Ancestors<'a>) -> Result<Scope<'a>, ScopeError> {
    let slice = ancestors.as_slice();
    slice
        .iter()
        .rposition(is_scope_owner)
        .and_then(|idx| Scope::of(&slice[idx], Ancestors::new(&slice[..idx])))
        .ok_or(ScopeError::NoScopeFound(node.id().raw()))
}

/// The scope owning locals declared directly in the statement list
/// `container`: a block itself, or the switch around a case group.
pub fn statement_scope<'a>(container: &Node, ancestors: Ancestors<'a>) -> Option<Scope<'a>> {
    match container.kind() {
        NodeKind::Block { .. } => Scope::of(container, ancestors),
        NodeKind::Case { .. } => {
            let (switch, above) = ancestors.split_parent()?;
            Scope::of(switch, above)
        }
        _ => None,
    }
}

/// Innermost-first lookup starting at `scope`, ignoring declaration order.
pub fn resolve(scope: &Scope<'_>, name: &str) -> Option<Binding> {
    if let Some(found) = scope.lookup(name) {
        return Some(found.clone());
    }
    let mut current = scope.parent();
    while let Some(outer) = current {
        if let Some(found) = outer.lookup(name) {
            return Some(found.clone());
        }
        current = outer.parent();
    }
    None
}

/// Resolve `name` as used at `leaf`, honouring declaration order: a local
/// is visible only to statements after its declaration, a for-each
/// variable only to the loop body, and so on.
pub fn resolve_at(ancestors: Ancestors<'_>, leaf: &Node, name: &str) -> Option<Binding> {
    let path = ancestors.as_slice();
    for depth in (0..path.len()).rev() {
        let owner = &path[depth];
        let via = ancestors.below(depth, leaf);
        let inner = ancestors.below(depth + 1, leaf);
        let found = declarations(owner).into_iter().find(|(decl, _)| {
            decl.name().is_some_and(|n| n == name) && visible_from(owner, decl, via, inner)
        });
        if let Some((decl, kind)) = found {
            return Some(binding(owner, decl, kind));
        }
    }
    None
}

/// Whether a scope strictly nested inside `scope` declares `name`.
pub fn is_shadowed_below(scope: &Scope<'_>, name: &str) -> bool {
    scope.owner.descendants().skip(1).any(|node| {
        declarations(&node)
            .iter()
            .any(|(decl, _)| decl.name().is_some_and(|n| n == name))
    })
}

/// Whether `binding` can be renamed to `new_name` without capturing or
/// being captured by another binding.
pub fn is_safe_rename(scope: &Scope<'_>, binding: &Binding, new_name: &str) -> bool {
    if binding.name == new_name {
        return true;
    }
    if resolve(scope, new_name).is_some() || is_shadowed_below(scope, new_name) {
        return false;
    }
    References::under(&scope.owner, scope.ancestors, binding)
        .iter()
        .all(|r| resolve_at(r.ancestors(), r.node(), new_name).is_none())
}

pub(crate) fn is_scope_owner(node: &Node) -> bool {
    matches!(
        node.tag(),
        NodeTag::Class
            | NodeTag::Method
            | NodeTag::Lambda
            | NodeTag::Block
            | NodeTag::Switch
            | NodeTag::For
            | NodeTag::ForEach
            | NodeTag::Catch
            | NodeTag::Try
    )
}

fn binding(owner: &Node, decl: &Node, kind: BindingKind) -> Binding {
    Binding {
        name: decl.name().cloned().unwrap_or_default(),
        decl: decl.clone(),
        kind,
        owner: owner.id(),
    }
}

/// Declarations owned directly by a scope-introducing node.
fn declarations(owner: &Node) -> SmallVec<[(&Node, BindingKind); 4]> {
    let mut out = SmallVec::new();
    match owner.kind() {
        NodeKind::Class { members, .. } => out.extend(
            members
                .iter()
                .filter(|m| m.tag() == NodeTag::Field)
                .map(|m| (m, BindingKind::Field)),
        ),
        NodeKind::Method { params, .. } => {
            out.extend(params.iter().map(|p| (p, BindingKind::Parameter)));
        }
        NodeKind::Lambda { params, .. } => {
            out.extend(params.iter().map(|p| (p, BindingKind::LambdaParam)));
        }
        NodeKind::Block { stmts } => out.extend(locals(stmts, BindingKind::Local)),
        // A switch body is one block split into case groups.
        NodeKind::Switch { cases, .. } => out.extend(
            cases
                .iter()
                .flat_map(|case| locals(case.statements().unwrap_or_default(), BindingKind::Local)),
        ),
        NodeKind::For { init, .. } => out.extend(locals(init, BindingKind::LoopVar)),
        NodeKind::ForEach { var, .. } => out.push((var, BindingKind::LoopVar)),
        NodeKind::Catch { param, .. } => out.push((param, BindingKind::CatchParam)),
        NodeKind::Try { resources, .. } => out.extend(locals(resources, BindingKind::Resource)),
        _ => {}
    }
    out
}

fn locals(nodes: &[Node], kind: BindingKind) -> impl Iterator<Item = (&Node, BindingKind)> {
    nodes
        .iter()
        .filter(|n| n.tag() == NodeTag::LocalVar)
        .map(move |n| (n, kind))
}

fn position(nodes: &[Node], node: &Node) -> Option<usize> {
    nodes.iter().position(|n| n.same_node(node))
}

/// Case group of `cases` holding `decl`, and its position there.
fn case_position(cases: &[Node], decl: &Node) -> Option<(usize, usize)> {
    cases.iter().enumerate().find_map(|(group, case)| {
        position(case.statements()?, decl).map(|stmt| (group, stmt))
    })
}

/// Whether `decl`, owned by `owner`, is visible below the child `via`.
/// `inner` is the node below `via` on the same path.
fn visible_from(owner: &Node, decl: &Node, via: &Node, inner: &Node) -> bool {
    match owner.kind() {
        NodeKind::Block { stmts } => matches!(
            (position(stmts, decl), position(stmts, via)),
            (Some(i), Some(j)) if i < j
        ),
        NodeKind::Switch { cases, .. } => {
            let (Some((decl_group, decl_stmt)), Some(via_group)) =
                (case_position(cases, decl), position(cases, via))
            else {
                return false;
            };
            decl_group < via_group
                || (decl_group == via_group
                    && via
                        .statements()
                        .and_then(|body| position(body, inner))
                        .is_some_and(|stmt| decl_stmt < stmt))
        }
        NodeKind::For { init, .. } => match position(init, via) {
            Some(j) => position(init, decl).is_some_and(|i| i < j),
            None => true,
        },
        NodeKind::Try {
            resources, body, ..
        } => {
            via.same_node(body)
                || match position(resources, via) {
                    Some(j) => position(resources, decl).is_some_and(|i| i < j),
                    None => false,
                }
        }
        NodeKind::ForEach { body, .. }
        | NodeKind::Catch { body, .. }
        | NodeKind::Lambda { body, .. } => via.same_node(body),
        NodeKind::Method { body, .. } => body.as_ref().is_some_and(|b| via.same_node(b)),
        NodeKind::Class { .. } => true,
        _ => false,
    }
}
