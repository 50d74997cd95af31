//! Per-unit rewrite session.
//!
//! The session collects what matchers ask for beyond their own
//! replacement: deferred actions and the names their rewrites refer to.
//! It lives for one `Driver::run` over one unit, is cleared at the start of
//! every pass, and is drained into the tree between passes.

use refit_ir::{Name, Node, NodeKind, Type};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::matcher::{DeferredAction, SideTable};

#[derive(Debug, Default)]
pub struct RewriteSession {
    pending: Vec<DeferredAction>,
    referenced: FxHashSet<Name>,
}

impl RewriteSession {
    pub fn new() -> Self {
        RewriteSession::default()
    }

    /// Forget everything recorded in the previous pass.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.referenced.clear();
    }

    pub fn record(&mut self, side: SideTable) {
        self.referenced.extend(side.referenced);
        for action in side.deferred {
            if !self.pending.contains(&action) {
                self.pending.push(action);
            }
        }
    }

    pub fn pending(&self) -> &[DeferredAction] {
        &self.pending
    }

    pub fn referenced(&self) -> impl Iterator<Item = &Name> {
        self.referenced.iter()
    }

    /// Apply pending actions to `root`. Returns the new root, or `None`
    /// when nothing changed.
    pub fn apply(&mut self, root: &Node) -> Option<Node> {
        let pending = std::mem::take(&mut self.pending);
        let NodeKind::CompilationUnit {
            package,
            imports,
            types,
        } = root.kind()
        else {
            return None;
        };
        let mut next = imports.clone();
        let mut changed = false;
        for action in &pending {
            match action {
                DeferredAction::AddImport(path) => {
                    if needs_import(package.as_ref(), &next, path) {
                        debug!(import = %path, "adding import");
                        next.push(Node::synthetic(NodeKind::Import {
                            path: path.clone(),
                            is_static: false,
                        }));
                        changed = true;
                    }
                }
                DeferredAction::RemoveImport(path) => {
                    let before = next.len();
                    if !mentions_simple_name(types, path.simple()) {
                        next.retain(|i| import_path(i) != Some(path));
                    }
                    if next.len() != before {
                        debug!(import = %path, "removing import");
                        changed = true;
                    }
                }
            }
        }
        if !changed {
            return None;
        }
        next.sort_by(|a, b| import_key(a).cmp(&import_key(b)));
        Some(root.with_kind(NodeKind::CompilationUnit {
            package: package.clone(),
            imports: next,
            types: types.clone(),
        }))
    }
}

fn import_path(import: &Node) -> Option<&Name> {
    match import.kind() {
        NodeKind::Import { path, .. } => Some(path),
        _ => None,
    }
}

/// Static imports sort after regular ones, then by path.
fn import_key(import: &Node) -> (bool, &str) {
    match import.kind() {
        NodeKind::Import { path, is_static } => (*is_static, path.as_str()),
        _ => (true, ""),
    }
}

fn needs_import(package: Option<&Name>, imports: &[Node], path: &Name) -> bool {
    let Some(qualifier) = path.qualifier() else {
        return false;
    };
    if qualifier == "java.lang" || package.is_some_and(|p| p == qualifier) {
        return false;
    }
    let wildcard = format!("{qualifier}.*");
    !imports.iter().filter_map(import_path).any(|existing| {
        existing == path || *existing == *wildcard || existing.simple() == path.simple()
    })
}

/// Whether any type, annotation or identifier in `types` spells `simple`.
fn mentions_simple_name(types: &[Node], simple: &str) -> bool {
    let mentions = |ty: &Type| type_mentions(ty, simple);
    types.iter().flat_map(Node::descendants).any(|node| match node.kind() {
        NodeKind::Method { return_type, .. } => mentions(return_type),
        NodeKind::Field { ty, .. }
        | NodeKind::Param { ty, .. }
        | NodeKind::LocalVar { ty, .. }
        | NodeKind::New { ty, .. }
        | NodeKind::Cast { ty, .. }
        | NodeKind::InstanceOf { ty, .. } => mentions(ty),
        NodeKind::Annotation { name } | NodeKind::Ident { name } => {
            name.simple() == simple || *name == *simple
        }
        _ => false,
    })
}

fn type_mentions(ty: &Type, simple: &str) -> bool {
    match ty {
        Type::Class { name, args } => {
            name.simple() == simple || args.iter().any(|a| type_mentions(a, simple))
        }
        Type::Array(element) => type_mentions(element, simple),
        _ => false,
    }
}
