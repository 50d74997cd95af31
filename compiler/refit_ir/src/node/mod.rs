//! Persistent syntax tree nodes.
//!
//! A `Node` is a cheap-clone handle onto immutable node data. Rewrites never
//! mutate a node in place: `with_kind`, `with_children` and friends return a
//! new node that shares every untouched child by reference.
//!
//! # Identity vs. equality
//!
//! - `NodeId` is the identity of a node. Moving a node keeps its id;
//!   nodes built by a rewrite start out `NodeId::SYNTHETIC` and the driver
//!   assigns fresh ids before the next pass.
//! - `==` is structural: ids and trivia are ignored, kinds, names, literals
//!   and attributed types must match. This is the "semantically equal"
//!   check rewrites use to compare expressions.

mod children;
mod ops;

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::{MethodSig, Name, Trivia, Type};

pub use ops::{AssignOp, BinaryOp, Literal, Modifiers, UnaryOp};

/// Identity of a node within one tree.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Id carried by nodes a rewrite has just built.
    pub const SYNTHETIC: NodeId = NodeId(0);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        NodeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_synthetic(self) -> bool {
        self.0 == 0
    }
}

/// Node kinds for a Java-like statement and expression language.
///
/// Child nodes are listed in source order; `Node::children` yields them in
/// the order the fields are declared here.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum NodeKind {
    // Declarations
    CompilationUnit {
        package: Option<Name>,
        imports: Vec<Node>,
        types: Vec<Node>,
    },
    Import {
        path: Name,
        is_static: bool,
    },
    Class {
        modifiers: Modifiers,
        name: Name,
        members: Vec<Node>,
    },
    Method {
        modifiers: Modifiers,
        annotations: Vec<Node>,
        return_type: Type,
        name: Name,
        params: Vec<Node>,
        body: Option<Node>,
    },
    Field {
        modifiers: Modifiers,
        ty: Type,
        name: Name,
        init: Option<Node>,
    },
    Param {
        annotations: Vec<Node>,
        ty: Type,
        name: Name,
    },
    Annotation {
        name: Name,
    },

    // Statements
    Block {
        stmts: Vec<Node>,
    },
    LocalVar {
        annotations: Vec<Node>,
        modifiers: Modifiers,
        ty: Type,
        name: Name,
        init: Option<Node>,
    },
    ExprStmt {
        expr: Node,
    },
    If {
        cond: Node,
        then_branch: Node,
        else_branch: Option<Node>,
    },
    While {
        cond: Node,
        body: Node,
    },
    DoWhile {
        body: Node,
        cond: Node,
    },
    For {
        init: Vec<Node>,
        cond: Option<Node>,
        update: Vec<Node>,
        body: Node,
    },
    ForEach {
        var: Node,
        iterable: Node,
        body: Node,
    },
    Switch {
        selector: Node,
        cases: Vec<Node>,
    },
    /// One case group. An empty `labels` list is the `default` group.
    Case {
        labels: Vec<Node>,
        body: Vec<Node>,
    },
    Return {
        value: Option<Node>,
    },
    Throw {
        value: Node,
    },
    Break {
        label: Option<Name>,
    },
    Continue {
        label: Option<Name>,
    },
    Try {
        resources: Vec<Node>,
        body: Node,
        catches: Vec<Node>,
        finally: Option<Node>,
    },
    Catch {
        param: Node,
        body: Node,
    },
    Labeled {
        label: Name,
        body: Node,
    },
    Empty,

    // Expressions
    Ident {
        name: Name,
    },
    Literal(Literal),
    Binary {
        op: BinaryOp,
        lhs: Node,
        rhs: Node,
    },
    Unary {
        op: UnaryOp,
        operand: Node,
    },
    Assign {
        op: AssignOp,
        target: Node,
        value: Node,
    },
    MethodCall {
        receiver: Option<Node>,
        name: Name,
        args: Vec<Node>,
        /// Signature the front end resolved the call to.
        method: Option<MethodSig>,
    },
    New {
        ty: Type,
        args: Vec<Node>,
    },
    FieldAccess {
        target: Node,
        name: Name,
    },
    Cast {
        ty: Type,
        expr: Node,
    },
    Lambda {
        params: Vec<Node>,
        body: Node,
    },
    Paren {
        expr: Node,
    },
    Conditional {
        cond: Node,
        then_expr: Node,
        else_expr: Node,
    },
    InstanceOf {
        expr: Node,
        ty: Type,
    },
}

/// Fieldless mirror of `NodeKind`, used to route nodes to matchers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeTag {
    CompilationUnit,
    Import,
    Class,
    Method,
    Field,
    Param,
    Annotation,
    Block,
    LocalVar,
    ExprStmt,
    If,
    While,
    DoWhile,
    For,
    ForEach,
    Switch,
    Case,
    Return,
    Throw,
    Break,
    Continue,
    Try,
    Catch,
    Labeled,
    Empty,
    Ident,
    Literal,
    Binary,
    Unary,
    Assign,
    MethodCall,
    New,
    FieldAccess,
    Cast,
    Lambda,
    Paren,
    Conditional,
    InstanceOf,
}

impl NodeTag {
    pub fn is_loop(self) -> bool {
        matches!(
            self,
            NodeTag::While | NodeTag::DoWhile | NodeTag::For | NodeTag::ForEach
        )
    }
}

impl NodeKind {
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::CompilationUnit { .. } => NodeTag::CompilationUnit,
            NodeKind::Import { .. } => NodeTag::Import,
            NodeKind::Class { .. } => NodeTag::Class,
            NodeKind::Method { .. } => NodeTag::Method,
            NodeKind::Field { .. } => NodeTag::Field,
            NodeKind::Param { .. } => NodeTag::Param,
            NodeKind::Annotation { .. } => NodeTag::Annotation,
            NodeKind::Block { .. } => NodeTag::Block,
            NodeKind::LocalVar { .. } => NodeTag::LocalVar,
            NodeKind::ExprStmt { .. } => NodeTag::ExprStmt,
            NodeKind::If { .. } => NodeTag::If,
            NodeKind::While { .. } => NodeTag::While,
            NodeKind::DoWhile { .. } => NodeTag::DoWhile,
            NodeKind::For { .. } => NodeTag::For,
            NodeKind::ForEach { .. } => NodeTag::ForEach,
            NodeKind::Switch { .. } => NodeTag::Switch,
            NodeKind::Case { .. } => NodeTag::Case,
            NodeKind::Return { .. } => NodeTag::Return,
            NodeKind::Throw { .. } => NodeTag::Throw,
            NodeKind::Break { .. } => NodeTag::Break,
            NodeKind::Continue { .. } => NodeTag::Continue,
            NodeKind::Try { .. } => NodeTag::Try,
            NodeKind::Catch { .. } => NodeTag::Catch,
            NodeKind::Labeled { .. } => NodeTag::Labeled,
            NodeKind::Empty => NodeTag::Empty,
            NodeKind::Ident { .. } => NodeTag::Ident,
            NodeKind::Literal(_) => NodeTag::Literal,
            NodeKind::Binary { .. } => NodeTag::Binary,
            NodeKind::Unary { .. } => NodeTag::Unary,
            NodeKind::Assign { .. } => NodeTag::Assign,
            NodeKind::MethodCall { .. } => NodeTag::MethodCall,
            NodeKind::New { .. } => NodeTag::New,
            NodeKind::FieldAccess { .. } => NodeTag::FieldAccess,
            NodeKind::Cast { .. } => NodeTag::Cast,
            NodeKind::Lambda { .. } => NodeTag::Lambda,
            NodeKind::Paren { .. } => NodeTag::Paren,
            NodeKind::Conditional { .. } => NodeTag::Conditional,
            NodeKind::InstanceOf { .. } => NodeTag::InstanceOf,
        }
    }
}

#[derive(Debug)]
struct NodeData {
    id: NodeId,
    kind: NodeKind,
    trivia: Trivia,
    ty: Option<Type>,
}

/// Handle onto an immutable tree node.
#[derive(Clone)]
pub struct Node(Arc<NodeData>);

/// Ordered child sequence returned by `Node::children`.
pub type Children = SmallVec<[Node; 4]>;

impl Node {
    pub fn new(id: NodeId, kind: NodeKind) -> Node {
        Node(Arc::new(NodeData {
            id,
            kind,
            trivia: Trivia::default(),
            ty: None,
        }))
    }

    /// A node built by a rewrite; the driver assigns its id.
    pub fn synthetic(kind: NodeKind) -> Node {
        Node::new(NodeId::SYNTHETIC, kind)
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.0.id
    }

    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.0.kind
    }

    #[inline]
    pub fn tag(&self) -> NodeTag {
        self.0.kind.tag()
    }

    #[inline]
    pub fn trivia(&self) -> &Trivia {
        &self.0.trivia
    }

    /// Static type attributed by the front end.
    #[inline]
    pub fn ty(&self) -> Option<&Type> {
        self.0.ty.as_ref()
    }

    fn rebuild(&self, id: NodeId, kind: NodeKind, trivia: Trivia, ty: Option<Type>) -> Node {
        Node(Arc::new(NodeData {
            id,
            kind,
            trivia,
            ty,
        }))
    }

    /// Same id, trivia and type; new kind.
    #[must_use]
    pub fn with_kind(&self, kind: NodeKind) -> Node {
        self.rebuild(self.id(), kind, self.trivia().clone(), self.0.ty.clone())
    }

    #[must_use]
    pub fn with_trivia(&self, trivia: Trivia) -> Node {
        self.rebuild(self.id(), self.kind().clone(), trivia, self.0.ty.clone())
    }

    #[must_use]
    pub fn with_type(&self, ty: Type) -> Node {
        self.rebuild(self.id(), self.kind().clone(), self.trivia().clone(), Some(ty))
    }

    #[must_use]
    pub fn with_id(&self, id: NodeId) -> Node {
        self.rebuild(id, self.kind().clone(), self.trivia().clone(), self.0.ty.clone())
    }

    /// Pointer identity: the very same node value.
    #[inline]
    pub fn ptr_eq(a: &Node, b: &Node) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Same logical node: pointer-equal, or sharing a non-synthetic id.
    pub fn same_node(&self, other: &Node) -> bool {
        Node::ptr_eq(self, other) || (!self.id().is_synthetic() && self.id() == other.id())
    }

    /// The declared or referenced name of identifiers and declarations.
    pub fn name(&self) -> Option<&Name> {
        match self.kind() {
            NodeKind::Ident { name }
            | NodeKind::Class { name, .. }
            | NodeKind::Method { name, .. }
            | NodeKind::Field { name, .. }
            | NodeKind::Param { name, .. }
            | NodeKind::LocalVar { name, .. }
            | NodeKind::Annotation { name } => Some(name),
            _ => None,
        }
    }

    /// The name of a bare identifier expression.
    pub fn as_ident(&self) -> Option<&Name> {
        match self.kind() {
            NodeKind::Ident { name } => Some(name),
            _ => None,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn strip_parens(&self) -> &Node {
        let mut current = self;
        while let NodeKind::Paren { expr } = current.kind() {
            current = expr;
        }
        current
    }

    pub fn is_null_literal(&self) -> bool {
        matches!(self.strip_parens().kind(), NodeKind::Literal(Literal::Null))
    }

    /// Statement list of a block or case group.
    pub fn statements(&self) -> Option<&[Node]> {
        match self.kind() {
            NodeKind::Block { stmts } => Some(stmts),
            NodeKind::Case { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Position of `child` among this node's children.
    pub fn child_index(&self, child: &Node) -> Option<usize> {
        self.children().iter().position(|c| c.same_node(child))
    }

    /// Lazy pre-order iterator over this node and all its descendants.
    pub fn descendants(&self) -> Descendants {
        Descendants {
            stack: vec![self.clone()],
        }
    }

    /// Largest id in this subtree.
    pub fn max_id(&self) -> NodeId {
        self.descendants()
            .map(|n| n.id())
            .max()
            .unwrap_or(NodeId::SYNTHETIC)
    }

    /// Assign fresh ids to every synthetic node in this subtree, children
    /// before parents. `next` is advanced past every id handed out.
    #[must_use]
    pub fn renumber_synthetic(&self, next: &mut u32) -> Node {
        let children = self.children();
        let renumbered: Children = children
            .iter()
            .map(|child| child.renumber_synthetic(next))
            .collect();
        let changed = children
            .iter()
            .zip(renumbered.iter())
            .any(|(old, new)| !Node::ptr_eq(old, new));
        let node = if changed {
            self.with_children(renumbered)
        } else {
            self.clone()
        };
        if node.id().is_synthetic() {
            let fresh = NodeId::new(*next);
            *next += 1;
            node.with_id(fresh)
        } else {
            node
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Node) -> bool {
        Node::ptr_eq(self, other) || (self.0.kind == other.0.kind && self.0.ty == other.0.ty)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id().raw(), crate::sketch(self))
    }
}

/// Pre-order traversal produced by `Node::descendants`.
pub struct Descendants {
    stack: Vec<Node>,
}

impl Iterator for Descendants {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}
