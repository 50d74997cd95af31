//! Compact single-line rendering for logs and tests.
//!
//! This is not a formatter: layout policy belongs to the external printer.
//! The sketch exists so tracing output and assertions can show a tree as
//! recognisable source. Comments render as `/*text*/`.

use super::{Node, NodeKind, Trivia};

/// Render `node` on a single line.
pub fn sketch(node: &Node) -> String {
    let mut sketcher = Sketcher { out: String::new() };
    sketcher.node(node);
    sketcher.out
}

struct Sketcher {
    out: String,
}

impl Sketcher {
    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn leading(&mut self, trivia: &Trivia) {
        for comment in &trivia.leading {
            self.push("/*");
            self.push(&comment.text);
            self.push("*/ ");
        }
    }

    fn trailing(&mut self, trivia: &Trivia) {
        for comment in &trivia.trailing {
            self.push(" /*");
            self.push(&comment.text);
            self.push("*/");
        }
    }

    fn node(&mut self, node: &Node) {
        self.leading(node.trivia());
        self.bare(node, true);
        self.trailing(node.trivia());
    }

    fn list(&mut self, nodes: &[Node], sep: &str) {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.push(sep);
            }
            self.node(node);
        }
    }

    /// Declarations inside `for (...)` and `try (...)` headers carry no `;`.
    fn header_item(&mut self, node: &Node) {
        self.leading(node.trivia());
        self.bare(node, false);
        self.trailing(node.trivia());
    }

    fn header_list(&mut self, nodes: &[Node], sep: &str) {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.push(sep);
            }
            self.header_item(node);
        }
    }

    fn annotations(&mut self, annotations: &[Node]) {
        for annotation in annotations {
            self.node(annotation);
            self.push(" ");
        }
    }

    fn bare(&mut self, node: &Node, terminate: bool) {
        let semi = if terminate { ";" } else { "" };
        match node.kind() {
            NodeKind::CompilationUnit {
                package,
                imports,
                types,
            } => {
                let mut parts = 0;
                if let Some(package) = package {
                    self.push("package ");
                    self.push(package);
                    self.push(";");
                    parts += 1;
                }
                for node in imports.iter().chain(types) {
                    if parts > 0 {
                        self.push(" ");
                    }
                    self.node(node);
                    parts += 1;
                }
            }
            NodeKind::Import { path, is_static } => {
                self.push(if *is_static { "import static " } else { "import " });
                self.push(path);
                self.push(";");
            }
            NodeKind::Class {
                modifiers,
                name,
                members,
            } => {
                if !modifiers.is_empty() {
                    self.push(&format!("{modifiers} "));
                }
                self.push("class ");
                self.push(name);
                self.push(" ");
                self.braced(members);
            }
            NodeKind::Method {
                modifiers,
                annotations,
                return_type,
                name,
                params,
                body,
            } => {
                self.annotations(annotations);
                if !modifiers.is_empty() {
                    self.push(&format!("{modifiers} "));
                }
                self.push(&format!("{return_type} "));
                self.push(name);
                self.push("(");
                self.list(params, ", ");
                self.push(")");
                match body {
                    Some(body) => {
                        self.push(" ");
                        self.node(body);
                    }
                    None => self.push(";"),
                }
            }
            NodeKind::Field {
                modifiers,
                ty,
                name,
                init,
            } => {
                if !modifiers.is_empty() {
                    self.push(&format!("{modifiers} "));
                }
                self.push(&format!("{ty} "));
                self.push(name);
                if let Some(init) = init {
                    self.push(" = ");
                    self.node(init);
                }
                self.push(";");
            }
            NodeKind::Param {
                annotations,
                ty,
                name,
            } => {
                self.annotations(annotations);
                if ty.is_known() {
                    self.push(&format!("{ty} "));
                }
                self.push(name);
            }
            NodeKind::Annotation { name } => {
                self.push("@");
                self.push(name.simple());
            }
            NodeKind::Block { stmts } => self.braced(stmts),
            NodeKind::LocalVar {
                annotations,
                modifiers,
                ty,
                name,
                init,
            } => {
                self.annotations(annotations);
                if !modifiers.is_empty() {
                    self.push(&format!("{modifiers} "));
                }
                self.push(&format!("{ty} "));
                self.push(name);
                if let Some(init) = init {
                    self.push(" = ");
                    self.node(init);
                }
                self.push(semi);
            }
            NodeKind::ExprStmt { expr } => {
                self.node(expr);
                self.push(semi);
            }
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.push("if (");
                self.node(cond);
                self.push(") ");
                self.node(then_branch);
                if let Some(else_branch) = else_branch {
                    self.push(" else ");
                    self.node(else_branch);
                }
            }
            NodeKind::While { cond, body } => {
                self.push("while (");
                self.node(cond);
                self.push(") ");
                self.node(body);
            }
            NodeKind::DoWhile { body, cond } => {
                self.push("do ");
                self.node(body);
                self.push(" while (");
                self.node(cond);
                self.push(");");
            }
            NodeKind::For {
                init,
                cond,
                update,
                body,
            } => {
                self.push("for (");
                self.header_list(init, ", ");
                self.push(";");
                if let Some(cond) = cond {
                    self.push(" ");
                    self.node(cond);
                }
                self.push(";");
                if !update.is_empty() {
                    self.push(" ");
                    self.header_list(update, ", ");
                }
                self.push(") ");
                self.node(body);
            }
            NodeKind::ForEach {
                var,
                iterable,
                body,
            } => {
                self.push("for (");
                self.header_item(var);
                self.push(" : ");
                self.node(iterable);
                self.push(") ");
                self.node(body);
            }
            NodeKind::Switch { selector, cases } => {
                self.push("switch (");
                self.node(selector);
                self.push(") ");
                self.braced(cases);
            }
            NodeKind::Case { labels, body } => {
                if labels.is_empty() {
                    self.push("default:");
                } else {
                    self.push("case ");
                    self.list(labels, ", ");
                    self.push(":");
                }
                for stmt in body {
                    self.push(" ");
                    self.node(stmt);
                }
            }
            NodeKind::Return { value } => {
                self.push("return");
                if let Some(value) = value {
                    self.push(" ");
                    self.node(value);
                }
                self.push(";");
            }
            NodeKind::Throw { value } => {
                self.push("throw ");
                self.node(value);
                self.push(";");
            }
            NodeKind::Break { label } => {
                self.push("break");
                if let Some(label) = label {
                    self.push(" ");
                    self.push(label);
                }
                self.push(";");
            }
            NodeKind::Continue { label } => {
                self.push("continue");
                if let Some(label) = label {
                    self.push(" ");
                    self.push(label);
                }
                self.push(";");
            }
            NodeKind::Try {
                resources,
                body,
                catches,
                finally,
            } => {
                self.push("try ");
                if !resources.is_empty() {
                    self.push("(");
                    self.header_list(resources, "; ");
                    self.push(") ");
                }
                self.node(body);
                for catch in catches {
                    self.push(" ");
                    self.node(catch);
                }
                if let Some(finally) = finally {
                    self.push(" finally ");
                    self.node(finally);
                }
            }
            NodeKind::Catch { param, body } => {
                self.push("catch (");
                self.node(param);
                self.push(") ");
                self.node(body);
            }
            NodeKind::Labeled { label, body } => {
                self.push(label);
                self.push(": ");
                self.node(body);
            }
            NodeKind::Empty => self.push(";"),
            NodeKind::Ident { name } => self.push(name),
            NodeKind::Literal(literal) => self.push(&literal.to_string()),
            NodeKind::Binary { op, lhs, rhs } => {
                self.node(lhs);
                self.push(" ");
                self.push(op.symbol());
                self.push(" ");
                self.node(rhs);
            }
            NodeKind::Unary { op, operand } => {
                if op.is_postfix() {
                    self.node(operand);
                    self.push(op.symbol());
                } else {
                    self.push(op.symbol());
                    self.node(operand);
                }
            }
            NodeKind::Assign { op, target, value } => {
                self.node(target);
                self.push(&format!(" {op} "));
                self.node(value);
            }
            NodeKind::MethodCall {
                receiver,
                name,
                args,
                ..
            } => {
                if let Some(receiver) = receiver {
                    self.node(receiver);
                    self.push(".");
                }
                self.push(name);
                self.push("(");
                self.list(args, ", ");
                self.push(")");
            }
            NodeKind::New { ty, args } => {
                self.push(&format!("new {ty}("));
                self.list(args, ", ");
                self.push(")");
            }
            NodeKind::FieldAccess { target, name } => {
                self.node(target);
                self.push(".");
                self.push(name);
            }
            NodeKind::Cast { ty, expr } => {
                self.push(&format!("({ty}) "));
                self.node(expr);
            }
            NodeKind::Lambda { params, body } => {
                self.push("(");
                self.list(params, ", ");
                self.push(") -> ");
                self.node(body);
            }
            NodeKind::Paren { expr } => {
                self.push("(");
                self.node(expr);
                self.push(")");
            }
            NodeKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                self.node(cond);
                self.push(" ? ");
                self.node(then_expr);
                self.push(" : ");
                self.node(else_expr);
            }
            NodeKind::InstanceOf { expr, ty } => {
                self.node(expr);
                self.push(&format!(" instanceof {ty}"));
            }
        }
    }

    fn braced(&mut self, nodes: &[Node]) {
        if nodes.is_empty() {
            self.push("{}");
        } else {
            self.push("{ ");
            self.list(nodes, " ");
            self.push(" }");
        }
    }
}
