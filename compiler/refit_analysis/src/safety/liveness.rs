//! Structured liveness over the syntax tree.
//!
//! There is no control-flow graph here. Liveness is decided by walking
//! outward from the query point to the binding's owning scope, looking at
//! what can execute after the point at each level:
//!
//! 1. **Sequences** (block and case bodies): the statements after the
//!    point, in order, until one reads, redefines, or leaves.
//! 2. **Loops**: the back edge re-runs the condition, update and body, so
//!    any read anywhere in them counts.
//! 3. **Try**: a catch or finally may run after any statement of the body.
//! 4. **Switch**: case groups after the current one may be reached by
//!    falling through.
//! 5. **Lambdas**: a lambda body may run at any time, so a point inside one
//!    is live whenever the binding has any read at all.
//!
//! A redefinition only counts when it is a whole statement (`x = e;`) on
//! the straight-line path; conditional redefinitions kill only when every
//! branch kills.

use refit_ir::{AssignOp, Ancestors, Node, NodeId, NodeKind};
use rustc_hash::FxHashSet;

use crate::scope::{Binding, References};

/// Summary of one statement for a single binding.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Flow {
    /// May read the binding before redefining it.
    Reads,
    /// Definitely redefines it without reading first.
    Kills,
    /// Leaves the enclosing method on every path.
    Exits,
    Neutral,
}

struct Uses {
    reads: FxHashSet<NodeId>,
    writes: FxHashSet<NodeId>,
}

impl Uses {
    fn reads_in(&self, node: &Node) -> bool {
        node.descendants().any(|n| self.reads.contains(&n.id()))
    }

    fn sequence<'n>(&self, stmts: impl IntoIterator<Item = &'n Node>) -> Flow {
        for stmt in stmts {
            match self.flow(stmt) {
                Flow::Neutral => {}
                other => return other,
            }
        }
        Flow::Neutral
    }

    fn flow(&self, stmt: &Node) -> Flow {
        match stmt.kind() {
            NodeKind::Block { stmts } => self.sequence(stmts),
            NodeKind::Labeled { body, .. } => self.flow(body),
            NodeKind::ExprStmt { expr } => match expr.kind() {
                NodeKind::Assign {
                    op: AssignOp::Plain,
                    target,
                    value,
                } if self.writes.contains(&target.strip_parens().id()) => {
                    if self.reads_in(value) {
                        Flow::Reads
                    } else {
                        Flow::Kills
                    }
                }
                _ => self.touch(expr),
            },
            NodeKind::Return { value } => match value {
                Some(value) if self.reads_in(value) => Flow::Reads,
                _ => Flow::Exits,
            },
            NodeKind::Throw { value } => {
                if self.reads_in(value) {
                    Flow::Reads
                } else {
                    Flow::Exits
                }
            }
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.reads_in(cond) {
                    return Flow::Reads;
                }
                let then_flow = self.flow(then_branch);
                let else_flow = else_branch
                    .as_ref()
                    .map_or(Flow::Neutral, |e| self.flow(e));
                match (then_flow, else_flow) {
                    (Flow::Reads, _) | (_, Flow::Reads) => Flow::Reads,
                    (Flow::Exits, Flow::Exits) => Flow::Exits,
                    (Flow::Kills | Flow::Exits, Flow::Kills | Flow::Exits) => Flow::Kills,
                    _ => Flow::Neutral,
                }
            }
            _ => self.touch(stmt),
        }
    }

    fn touch(&self, node: &Node) -> Flow {
        if self.reads_in(node) {
            Flow::Reads
        } else {
            Flow::Neutral
        }
    }

    fn any_reads_in<'n>(&self, nodes: impl IntoIterator<Item = &'n Node>) -> bool {
        nodes.into_iter().any(|n| self.reads_in(n))
    }
}

/// Whether `binding` may be read after `point` completes.
pub(super) fn is_live_after(binding: &Binding, point: &Node, ancestors: Ancestors<'_>) -> bool {
    let path = ancestors.as_slice();
    let Some(owner_depth) = path.iter().rposition(|n| n.id() == binding.owner()) else {
        // Outside the binding's scope.
        return false;
    };
    let owner = &path[owner_depth];
    let mut uses = Uses {
        reads: FxHashSet::default(),
        writes: FxHashSet::default(),
    };
    for reference in &References::under(owner, Ancestors::new(&path[..owner_depth]), binding) {
        if reference.access().reads() {
            uses.reads.insert(reference.node().id());
        } else {
            uses.writes.insert(reference.node().id());
        }
    }
    if uses.reads.is_empty() {
        return false;
    }

    let mut child = point;
    for depth in (owner_depth..path.len()).rev() {
        let parent = &path[depth];
        let flow = step(&uses, parent, child, depth > owner_depth);
        match flow {
            Flow::Reads => return true,
            Flow::Kills => return false,
            Flow::Exits => return finally_reads(&uses, &path[owner_depth..=depth]),
            Flow::Neutral => {}
        }
        child = parent;
    }
    false
}

/// What can run inside `parent` after its child `child` completes.
fn step(uses: &Uses, parent: &Node, child: &Node, nested: bool) -> Flow {
    match parent.kind() {
        NodeKind::Block { stmts } | NodeKind::Case { body: stmts, .. } => {
            uses.sequence(after(stmts, child))
        }
        NodeKind::Switch { cases, .. } => uses.sequence(
            after(cases, child)
                .iter()
                .filter_map(Node::statements)
                .flatten(),
        ),
        NodeKind::While { cond, body } | NodeKind::DoWhile { body, cond } => {
            reads_if(uses.any_reads_in([cond, body]))
        }
        NodeKind::For {
            cond, update, body, ..
        } => reads_if(uses.any_reads_in(cond.iter().chain(update).chain([body]))),
        NodeKind::ForEach { body, .. } => reads_if(uses.reads_in(body)),
        NodeKind::Try {
            body,
            catches,
            finally,
            ..
        } => {
            let finally_read = finally.as_ref().is_some_and(|f| uses.reads_in(f));
            if body.same_node(child) {
                reads_if(finally_read || uses.any_reads_in(catches))
            } else if catches.iter().any(|c| c.same_node(child)) {
                reads_if(finally_read)
            } else {
                Flow::Neutral
            }
        }
        NodeKind::If { cond, .. } if cond.same_node(child) => uses.flow(parent),
        NodeKind::Lambda { .. } if nested => Flow::Reads,
        NodeKind::Class { .. } => Flow::Reads,
        NodeKind::If { .. }
        | NodeKind::Lambda { .. }
        | NodeKind::Method { .. }
        | NodeKind::Catch { .. }
        | NodeKind::Labeled { .. } => Flow::Neutral,
        // Inside an expression or a simple statement: the operands still
        // to be evaluated.
        _ => {
            let children = parent.children();
            reads_if(uses.any_reads_in(after(&children, child)))
        }
    }
}

/// Siblings of `child` that follow it.
fn after<'n>(nodes: &'n [Node], child: &Node) -> &'n [Node] {
    nodes
        .iter()
        .position(|n| n.same_node(child))
        .map_or(&[], |idx| &nodes[idx + 1..])
}

fn reads_if(read: bool) -> Flow {
    if read {
        Flow::Reads
    } else {
        Flow::Neutral
    }
}

/// A `finally` on the way out still runs after a `return` or `throw`.
fn finally_reads(uses: &Uses, enclosing: &[Node]) -> bool {
    enclosing.iter().any(|node| match node.kind() {
        NodeKind::Try {
            finally: Some(finally),
            ..
        } => uses.reads_in(finally),
        _ => false,
    })
}
