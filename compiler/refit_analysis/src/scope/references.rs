//! Reference search.

use refit_ir::{Ancestors, AssignOp, Node, NodeKind};

use super::{resolve_at, Binding};

/// How a reference site uses its binding.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Access {
    Read,
    /// Target of a plain assignment.
    Write,
    /// Target of a compound assignment or an increment/decrement.
    ReadWrite,
}

impl Access {
    pub fn reads(self) -> bool {
        matches!(self, Access::Read | Access::ReadWrite)
    }

    pub fn writes(self) -> bool {
        matches!(self, Access::Write | Access::ReadWrite)
    }
}

/// One identifier use resolving to the searched binding.
#[derive(Clone, Debug)]
pub struct Reference {
    node: Node,
    access: Access,
    path: Vec<Node>,
}

impl Reference {
    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn access(&self) -> Access {
        self.access
    }

    /// Ancestors of the reference, root first.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors::new(&self.path)
    }
}

/// Every use of a binding below some root.
///
/// The search is lazy and restartable: each call to `iter` walks the tree
/// afresh. Only bare identifiers resolving to the binding itself count; a
/// same-named identifier captured by a shadowing declaration does not.
#[derive(Clone, Debug)]
pub struct References {
    root: Node,
    base: Vec<Node>,
    binding: Binding,
}

/// References to `binding` anywhere under `root`.
pub fn find_references(root: &Node, binding: &Binding) -> References {
    References::under(root, Ancestors::none(), binding)
}

impl References {
    /// References to `binding` under `root`, which sits below `ancestors`.
    pub fn under(root: &Node, ancestors: Ancestors<'_>, binding: &Binding) -> Self {
        References {
            root: root.clone(),
            base: ancestors.as_slice().to_vec(),
            binding: binding.clone(),
        }
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn iter(&self) -> ReferenceIter<'_> {
        ReferenceIter {
            refs: self,
            path: self.base.clone(),
            stack: vec![(self.root.clone(), self.base.len())],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn any_reads(&self) -> bool {
        self.iter().any(|r| r.access.reads())
    }
}

impl<'r> IntoIterator for &'r References {
    type Item = Reference;
    type IntoIter = ReferenceIter<'r>;

    fn into_iter(self) -> ReferenceIter<'r> {
        self.iter()
    }
}

/// Depth-first pre-order search, one reference at a time.
pub struct ReferenceIter<'r> {
    refs: &'r References,
    path: Vec<Node>,
    stack: Vec<(Node, usize)>,
}

impl Iterator for ReferenceIter<'_> {
    type Item = Reference;

    fn next(&mut self) -> Option<Reference> {
        while let Some((node, depth)) = self.stack.pop() {
            self.path.truncate(depth);
            let hit = self.matches(&node);
            self.stack
                .extend(node.children().into_iter().rev().map(|c| (c, depth + 1)));
            if let Some(access) = hit {
                let reference = Reference {
                    node: node.clone(),
                    access,
                    path: self.path.clone(),
                };
                self.path.push(node);
                return Some(reference);
            }
            self.path.push(node);
        }
        None
    }
}

impl ReferenceIter<'_> {
    fn matches(&self, node: &Node) -> Option<Access> {
        let binding = &self.refs.binding;
        let name = node.as_ident()?;
        if name != binding.name() {
            return None;
        }
        let resolved = resolve_at(Ancestors::new(&self.path), node, name)?;
        (resolved == *binding).then(|| access_at(&self.path, node))
    }
}

/// Classify the use of `node` from its parent chain.
fn access_at(path: &[Node], node: &Node) -> Access {
    let mut child = node;
    for parent in path.iter().rev() {
        match parent.kind() {
            NodeKind::Paren { .. } => child = parent,
            NodeKind::Assign { op, target, .. } if target.same_node(child) => {
                return match op {
                    AssignOp::Plain => Access::Write,
                    AssignOp::Compound(_) => Access::ReadWrite,
                };
            }
            NodeKind::Unary { op, .. } if op.is_update() => return Access::ReadWrite,
            _ => return Access::Read,
        }
    }
    Access::Read
}
