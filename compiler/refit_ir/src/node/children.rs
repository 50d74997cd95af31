//! Generic child projection for the tree model adapter.
//!
//! `children` and `with_children` agree on a single fixed order per kind
//! (the field order of `NodeKind`), skipping absent optional children.

use super::{Children, Node, NodeKind};

/// Hands out replacement children in order, falling back to the original
/// child when the replacement sequence runs short.
struct Refill<I> {
    replacements: I,
}

impl<I: Iterator<Item = Node>> Refill<I> {
    fn one(&mut self, old: &Node) -> Node {
        self.replacements.next().unwrap_or_else(|| old.clone())
    }

    fn opt(&mut self, old: Option<&Node>) -> Option<Node> {
        old.map(|node| self.one(node))
    }

    fn many(&mut self, old: &[Node]) -> Vec<Node> {
        old.iter().map(|node| self.one(node)).collect()
    }
}

impl Node {
    /// Present children in a fixed order; leaf kinds yield nothing.
    pub fn children(&self) -> Children {
        let mut out = Children::new();
        match self.kind() {
            NodeKind::CompilationUnit { imports, types, .. } => {
                out.extend(imports.iter().cloned());
                out.extend(types.iter().cloned());
            }
            NodeKind::Class { members, .. } => out.extend(members.iter().cloned()),
            NodeKind::Method {
                annotations,
                params,
                body,
                ..
            } => {
                out.extend(annotations.iter().cloned());
                out.extend(params.iter().cloned());
                out.extend(body.iter().cloned());
            }
            NodeKind::Field { init, .. } => out.extend(init.iter().cloned()),
            NodeKind::Param { annotations, .. } => out.extend(annotations.iter().cloned()),
            NodeKind::Block { stmts } => out.extend(stmts.iter().cloned()),
            NodeKind::LocalVar {
                annotations, init, ..
            } => {
                out.extend(annotations.iter().cloned());
                out.extend(init.iter().cloned());
            }
            NodeKind::ExprStmt { expr }
            | NodeKind::Paren { expr }
            | NodeKind::Cast { expr, .. }
            | NodeKind::InstanceOf { expr, .. } => out.push(expr.clone()),
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                out.push(cond.clone());
                out.push(then_branch.clone());
                out.extend(else_branch.iter().cloned());
            }
            NodeKind::While { cond, body } => {
                out.push(cond.clone());
                out.push(body.clone());
            }
            NodeKind::DoWhile { body, cond } => {
                out.push(body.clone());
                out.push(cond.clone());
            }
            NodeKind::For {
                init,
                cond,
                update,
                body,
            } => {
                out.extend(init.iter().cloned());
                out.extend(cond.iter().cloned());
                out.extend(update.iter().cloned());
                out.push(body.clone());
            }
            NodeKind::ForEach {
                var,
                iterable,
                body,
            } => {
                out.push(var.clone());
                out.push(iterable.clone());
                out.push(body.clone());
            }
            NodeKind::Switch { selector, cases } => {
                out.push(selector.clone());
                out.extend(cases.iter().cloned());
            }
            NodeKind::Case { labels, body } => {
                out.extend(labels.iter().cloned());
                out.extend(body.iter().cloned());
            }
            NodeKind::Return { value } => out.extend(value.iter().cloned()),
            NodeKind::Throw { value } => out.push(value.clone()),
            NodeKind::Try {
                resources,
                body,
                catches,
                finally,
            } => {
                out.extend(resources.iter().cloned());
                out.push(body.clone());
                out.extend(catches.iter().cloned());
                out.extend(finally.iter().cloned());
            }
            NodeKind::Catch { param, body } => {
                out.push(param.clone());
                out.push(body.clone());
            }
            NodeKind::Labeled { body, .. } => out.push(body.clone()),
            NodeKind::Binary { lhs, rhs, .. } => {
                out.push(lhs.clone());
                out.push(rhs.clone());
            }
            NodeKind::Unary { operand, .. } => out.push(operand.clone()),
            NodeKind::Assign { target, value, .. } => {
                out.push(target.clone());
                out.push(value.clone());
            }
            NodeKind::MethodCall { receiver, args, .. } => {
                out.extend(receiver.iter().cloned());
                out.extend(args.iter().cloned());
            }
            NodeKind::New { args, .. } => out.extend(args.iter().cloned()),
            NodeKind::FieldAccess { target, .. } => out.push(target.clone()),
            NodeKind::Lambda { params, body } => {
                out.extend(params.iter().cloned());
                out.push(body.clone());
            }
            NodeKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                out.push(cond.clone());
                out.push(then_expr.clone());
                out.push(else_expr.clone());
            }
            NodeKind::Import { .. }
            | NodeKind::Annotation { .. }
            | NodeKind::Break { .. }
            | NodeKind::Continue { .. }
            | NodeKind::Empty
            | NodeKind::Ident { .. }
            | NodeKind::Literal(_) => {}
        }
        out
    }

    /// Structural copy with replacement children, in `children()` order.
    ///
    /// Id, trivia and attributed type are preserved. Surplus replacements
    /// are ignored; missing ones keep the original child.
    #[must_use]
    pub fn with_children(&self, children: impl IntoIterator<Item = Node>) -> Node {
        let mut r = Refill {
            replacements: children.into_iter(),
        };
        let kind = match self.kind() {
            NodeKind::CompilationUnit {
                package,
                imports,
                types,
            } => NodeKind::CompilationUnit {
                package: package.clone(),
                imports: r.many(imports),
                types: r.many(types),
            },
            NodeKind::Class {
                modifiers,
                name,
                members,
            } => NodeKind::Class {
                modifiers: *modifiers,
                name: name.clone(),
                members: r.many(members),
            },
            NodeKind::Method {
                modifiers,
                annotations,
                return_type,
                name,
                params,
                body,
            } => NodeKind::Method {
                modifiers: *modifiers,
                annotations: r.many(annotations),
                return_type: return_type.clone(),
                name: name.clone(),
                params: r.many(params),
                body: r.opt(body.as_ref()),
            },
            NodeKind::Field {
                modifiers,
                ty,
                name,
                init,
            } => NodeKind::Field {
                modifiers: *modifiers,
                ty: ty.clone(),
                name: name.clone(),
                init: r.opt(init.as_ref()),
            },
            NodeKind::Param {
                annotations,
                ty,
                name,
            } => NodeKind::Param {
                annotations: r.many(annotations),
                ty: ty.clone(),
                name: name.clone(),
            },
            NodeKind::Block { stmts } => NodeKind::Block {
                stmts: r.many(stmts),
            },
            NodeKind::LocalVar {
                annotations,
                modifiers,
                ty,
                name,
                init,
            } => NodeKind::LocalVar {
                annotations: r.many(annotations),
                modifiers: *modifiers,
                ty: ty.clone(),
                name: name.clone(),
                init: r.opt(init.as_ref()),
            },
            NodeKind::ExprStmt { expr } => NodeKind::ExprStmt { expr: r.one(expr) },
            NodeKind::Paren { expr } => NodeKind::Paren { expr: r.one(expr) },
            NodeKind::Cast { ty, expr } => NodeKind::Cast {
                ty: ty.clone(),
                expr: r.one(expr),
            },
            NodeKind::InstanceOf { expr, ty } => NodeKind::InstanceOf {
                expr: r.one(expr),
                ty: ty.clone(),
            },
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => NodeKind::If {
                cond: r.one(cond),
                then_branch: r.one(then_branch),
                else_branch: r.opt(else_branch.as_ref()),
            },
            NodeKind::While { cond, body } => NodeKind::While {
                cond: r.one(cond),
                body: r.one(body),
            },
            NodeKind::DoWhile { body, cond } => NodeKind::DoWhile {
                body: r.one(body),
                cond: r.one(cond),
            },
            NodeKind::For {
                init,
                cond,
                update,
                body,
            } => NodeKind::For {
                init: r.many(init),
                cond: r.opt(cond.as_ref()),
                update: r.many(update),
                body: r.one(body),
            },
            NodeKind::ForEach {
                var,
                iterable,
                body,
            } => NodeKind::ForEach {
                var: r.one(var),
                iterable: r.one(iterable),
                body: r.one(body),
            },
            NodeKind::Switch { selector, cases } => NodeKind::Switch {
                selector: r.one(selector),
                cases: r.many(cases),
            },
            NodeKind::Case { labels, body } => NodeKind::Case {
                labels: r.many(labels),
                body: r.many(body),
            },
            NodeKind::Return { value } => NodeKind::Return {
                value: r.opt(value.as_ref()),
            },
            NodeKind::Throw { value } => NodeKind::Throw {
                value: r.one(value),
            },
            NodeKind::Try {
                resources,
                body,
                catches,
                finally,
            } => NodeKind::Try {
                resources: r.many(resources),
                body: r.one(body),
                catches: r.many(catches),
                finally: r.opt(finally.as_ref()),
            },
            NodeKind::Catch { param, body } => NodeKind::Catch {
                param: r.one(param),
                body: r.one(body),
            },
            NodeKind::Labeled { label, body } => NodeKind::Labeled {
                label: label.clone(),
                body: r.one(body),
            },
            NodeKind::Binary { op, lhs, rhs } => NodeKind::Binary {
                op: *op,
                lhs: r.one(lhs),
                rhs: r.one(rhs),
            },
            NodeKind::Unary { op, operand } => NodeKind::Unary {
                op: *op,
                operand: r.one(operand),
            },
            NodeKind::Assign { op, target, value } => NodeKind::Assign {
                op: *op,
                target: r.one(target),
                value: r.one(value),
            },
            NodeKind::MethodCall {
                receiver,
                name,
                args,
                method,
            } => NodeKind::MethodCall {
                receiver: r.opt(receiver.as_ref()),
                name: name.clone(),
                args: r.many(args),
                method: method.clone(),
            },
            NodeKind::New { ty, args } => NodeKind::New {
                ty: ty.clone(),
                args: r.many(args),
            },
            NodeKind::FieldAccess { target, name } => NodeKind::FieldAccess {
                target: r.one(target),
                name: name.clone(),
            },
            NodeKind::Lambda { params, body } => NodeKind::Lambda {
                params: r.many(params),
                body: r.one(body),
            },
            NodeKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => NodeKind::Conditional {
                cond: r.one(cond),
                then_expr: r.one(then_expr),
                else_expr: r.one(else_expr),
            },
            NodeKind::Import { .. }
            | NodeKind::Annotation { .. }
            | NodeKind::Break { .. }
            | NodeKind::Continue { .. }
            | NodeKind::Empty
            | NodeKind::Ident { .. }
            | NodeKind::Literal(_) => return self.clone(),
        };
        self.with_kind(kind)
    }
}
