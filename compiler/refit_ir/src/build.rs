//! Tree construction helpers.
//!
//! Front-end adapters and tests build trees through `TreeBuilder`, which
//! hands out unique, increasing `NodeId`s starting at 1. Expression helpers
//! attach the obvious static type where one exists (literals, casts,
//! resolved calls, object creation).

use std::cell::Cell;

use super::{
    AssignOp, BinaryOp, Comment, Literal, MethodSig, Modifiers, Name, Node, NodeId, NodeKind,
    Primitive, Type, UnaryOp,
};

pub struct TreeBuilder {
    next: Cell<u32>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        TreeBuilder::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder { next: Cell::new(1) }
    }

    pub fn node(&self, kind: NodeKind) -> Node {
        let id = self.next.get();
        self.next.set(id + 1);
        Node::new(NodeId::new(id), kind)
    }

    // Trivia

    /// Attach a leading line comment.
    pub fn with_comment(&self, node: Node, text: &str) -> Node {
        let trivia = node.trivia().clone().with_leading(Comment::line(text));
        node.with_trivia(trivia)
    }

    /// Attach a trailing line comment.
    pub fn with_trailing_comment(&self, node: Node, text: &str) -> Node {
        let trivia = node.trivia().clone().with_trailing(Comment::line(text));
        node.with_trivia(trivia)
    }

    // Expressions

    pub fn ident(&self, name: &str) -> Node {
        self.node(NodeKind::Ident {
            name: Name::new(name),
        })
    }

    pub fn typed_ident(&self, name: &str, ty: Type) -> Node {
        self.ident(name).with_type(ty)
    }

    pub fn literal(&self, literal: Literal, ty: Type) -> Node {
        self.node(NodeKind::Literal(literal)).with_type(ty)
    }

    pub fn int(&self, value: i64) -> Node {
        self.literal(Literal::Int(value), Type::int())
    }

    pub fn bool(&self, value: bool) -> Node {
        self.literal(Literal::Bool(value), Type::Primitive(Primitive::Boolean))
    }

    pub fn string(&self, value: &str) -> Node {
        self.literal(
            Literal::Str(Name::new(value)),
            Type::class("java.lang.String"),
        )
    }

    pub fn null(&self) -> Node {
        self.literal(Literal::Null, Type::Null)
    }

    pub fn binary(&self, op: BinaryOp, lhs: Node, rhs: Node) -> Node {
        let node = self.node(NodeKind::Binary { op, lhs, rhs });
        match op {
            BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq
            | BinaryOp::And
            | BinaryOp::Or => node.with_type(Type::Primitive(Primitive::Boolean)),
            _ => node,
        }
    }

    /// `name == null`
    pub fn is_null(&self, name: &str) -> Node {
        self.binary(BinaryOp::Eq, self.ident(name), self.null())
    }

    /// `name != null`
    pub fn not_null(&self, name: &str) -> Node {
        self.binary(BinaryOp::NotEq, self.ident(name), self.null())
    }

    pub fn unary(&self, op: UnaryOp, operand: Node) -> Node {
        self.node(NodeKind::Unary { op, operand })
    }

    pub fn assign(&self, target: Node, value: Node) -> Node {
        self.node(NodeKind::Assign {
            op: AssignOp::Plain,
            target,
            value,
        })
    }

    pub fn compound_assign(&self, op: BinaryOp, target: Node, value: Node) -> Node {
        self.node(NodeKind::Assign {
            op: AssignOp::Compound(op),
            target,
            value,
        })
    }

    /// A call the front end could not resolve.
    pub fn call(&self, receiver: Option<Node>, name: &str, args: Vec<Node>) -> Node {
        self.node(NodeKind::MethodCall {
            receiver,
            name: Name::new(name),
            args,
            method: None,
        })
    }

    /// A call resolved to `sig`; typed with the signature's return type.
    pub fn call_to(&self, receiver: Option<Node>, sig: &MethodSig, args: Vec<Node>) -> Node {
        let ty = sig.return_type.clone();
        self.node(NodeKind::MethodCall {
            receiver,
            name: sig.name.clone(),
            args,
            method: Some(sig.clone()),
        })
        .with_type(ty)
    }

    pub fn new_object(&self, ty: Type, args: Vec<Node>) -> Node {
        self.node(NodeKind::New {
            ty: ty.clone(),
            args,
        })
        .with_type(ty)
    }

    pub fn field_access(&self, target: Node, name: &str) -> Node {
        self.node(NodeKind::FieldAccess {
            target,
            name: Name::new(name),
        })
    }

    pub fn cast(&self, ty: Type, expr: Node) -> Node {
        self.node(NodeKind::Cast {
            ty: ty.clone(),
            expr,
        })
        .with_type(ty)
    }

    pub fn lambda(&self, params: Vec<Node>, body: Node) -> Node {
        self.node(NodeKind::Lambda { params, body })
    }

    pub fn paren(&self, expr: Node) -> Node {
        let ty = expr.ty().cloned();
        let node = self.node(NodeKind::Paren { expr });
        match ty {
            Some(ty) => node.with_type(ty),
            None => node,
        }
    }

    // Declarations

    pub fn annotation(&self, name: &str) -> Node {
        self.node(NodeKind::Annotation {
            name: Name::new(name),
        })
    }

    pub fn param(&self, ty: Type, name: &str) -> Node {
        self.node(NodeKind::Param {
            annotations: Vec::new(),
            ty,
            name: Name::new(name),
        })
    }

    /// Untyped lambda parameter.
    pub fn lambda_param(&self, name: &str) -> Node {
        self.param(Type::Unknown, name)
    }

    pub fn local(&self, ty: Type, name: &str, init: Option<Node>) -> Node {
        self.node(NodeKind::LocalVar {
            annotations: Vec::new(),
            modifiers: Modifiers::empty(),
            ty,
            name: Name::new(name),
            init,
        })
    }

    pub fn field(&self, modifiers: Modifiers, ty: Type, name: &str, init: Option<Node>) -> Node {
        self.node(NodeKind::Field {
            modifiers,
            ty,
            name: Name::new(name),
            init,
        })
    }

    pub fn method(
        &self,
        modifiers: Modifiers,
        return_type: Type,
        name: &str,
        params: Vec<Node>,
        body: Node,
    ) -> Node {
        self.node(NodeKind::Method {
            modifiers,
            annotations: Vec::new(),
            return_type,
            name: Name::new(name),
            params,
            body: Some(body),
        })
    }

    pub fn class(&self, modifiers: Modifiers, name: &str, members: Vec<Node>) -> Node {
        self.node(NodeKind::Class {
            modifiers,
            name: Name::new(name),
            members,
        })
    }

    pub fn import(&self, path: &str) -> Node {
        self.node(NodeKind::Import {
            path: Name::new(path),
            is_static: false,
        })
    }

    pub fn unit(&self, imports: Vec<Node>, types: Vec<Node>) -> Node {
        self.node(NodeKind::CompilationUnit {
            package: None,
            imports,
            types,
        })
    }

    // Statements

    pub fn block(&self, stmts: Vec<Node>) -> Node {
        self.node(NodeKind::Block { stmts })
    }

    pub fn expr_stmt(&self, expr: Node) -> Node {
        self.node(NodeKind::ExprStmt { expr })
    }

    pub fn ret(&self, value: Option<Node>) -> Node {
        self.node(NodeKind::Return { value })
    }

    pub fn throw(&self, value: Node) -> Node {
        self.node(NodeKind::Throw { value })
    }

    pub fn brk(&self) -> Node {
        self.node(NodeKind::Break { label: None })
    }

    pub fn brk_label(&self, label: &str) -> Node {
        self.node(NodeKind::Break {
            label: Some(Name::new(label)),
        })
    }

    pub fn cont(&self) -> Node {
        self.node(NodeKind::Continue { label: None })
    }

    pub fn if_(&self, cond: Node, then_branch: Node, else_branch: Option<Node>) -> Node {
        self.node(NodeKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    pub fn while_(&self, cond: Node, body: Node) -> Node {
        self.node(NodeKind::While { cond, body })
    }

    pub fn do_while(&self, body: Node, cond: Node) -> Node {
        self.node(NodeKind::DoWhile { body, cond })
    }

    pub fn for_(&self, init: Vec<Node>, cond: Option<Node>, update: Vec<Node>, body: Node) -> Node {
        self.node(NodeKind::For {
            init,
            cond,
            update,
            body,
        })
    }

    pub fn for_each(&self, var: Node, iterable: Node, body: Node) -> Node {
        self.node(NodeKind::ForEach {
            var,
            iterable,
            body,
        })
    }

    pub fn switch(&self, selector: Node, cases: Vec<Node>) -> Node {
        self.node(NodeKind::Switch { selector, cases })
    }

    pub fn case(&self, labels: Vec<Node>, body: Vec<Node>) -> Node {
        self.node(NodeKind::Case { labels, body })
    }

    pub fn default_case(&self, body: Vec<Node>) -> Node {
        self.case(Vec::new(), body)
    }

    pub fn try_(
        &self,
        resources: Vec<Node>,
        body: Node,
        catches: Vec<Node>,
        finally: Option<Node>,
    ) -> Node {
        self.node(NodeKind::Try {
            resources,
            body,
            catches,
            finally,
        })
    }

    pub fn catch(&self, param: Node, body: Node) -> Node {
        self.node(NodeKind::Catch { param, body })
    }

    pub fn labeled(&self, label: &str, body: Node) -> Node {
        self.node(NodeKind::Labeled {
            label: Name::new(label),
            body,
        })
    }
}
