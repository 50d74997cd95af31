use pretty_assertions::assert_eq;
use refit_analysis::MethodPattern;
use refit_ir::build::TreeBuilder;
use refit_ir::{BinaryOp, Modifiers, Node, NodeTag, Type, TypeTable};

use super::NullGuardMatcher;
use crate::matcher::DeferredAction;
use crate::test_helpers::{rewrite_at, sketch_at};

fn matcher() -> NullGuardMatcher {
    NullGuardMatcher::new("org.jspecify.annotations.NonNull", Vec::new())
}

fn string() -> Type {
    Type::class("java.lang.String")
}

fn iae(b: &TreeBuilder) -> Node {
    b.throw(b.new_object(Type::class("java.lang.IllegalArgumentException"), vec![]))
}

fn public_method(b: &TreeBuilder, params: &[&str], stmts: Vec<Node>) -> Node {
    b.method(
        Modifiers::PUBLIC,
        Type::Void,
        "f",
        params.iter().map(|p| b.param(string(), p)).collect(),
        b.block(stmts),
    )
}

fn use_all(b: &TreeBuilder, names: &[&str]) -> Node {
    b.expr_stmt(b.call(None, "use", names.iter().map(|n| b.ident(n)).collect()))
}

#[test]
fn throwing_guard_is_replaced_by_annotation() {
    let b = TreeBuilder::new();
    let method = public_method(
        &b,
        &["x"],
        vec![b.if_(b.is_null("x"), iae(&b), None), use_all(&b, &["x"])],
    );
    let rewrite = rewrite_at(&matcher(), &method, &TypeTable::new(), NodeTag::Method);
    let rewrite = rewrite.unwrap_or_else(|| panic!("guard not matched"));
    assert_eq!(
        refit_ir::sketch(&rewrite.replacement),
        "public void f(@NonNull String x) { use(x); }"
    );
    assert_eq!(
        rewrite.side.deferred,
        vec![DeferredAction::AddImport("org.jspecify.annotations.NonNull".into())]
    );
}

#[test]
fn or_chain_marks_every_parameter() {
    let b = TreeBuilder::new();
    let cond = b.binary(BinaryOp::Or, b.is_null("a"), b.is_null("b"));
    let method = public_method(
        &b,
        &["a", "b", "c"],
        vec![
            b.if_(cond, b.block(vec![b.ret(None)]), None),
            use_all(&b, &["a", "b", "c"]),
        ],
    );
    assert_eq!(
        sketch_at(&matcher(), &method, &TypeTable::new(), NodeTag::Method).as_deref(),
        Some("public void f(@NonNull String a, @NonNull String b, String c) { use(a, b, c); }")
    );
}

#[test]
fn and_chain_marks_nothing() {
    let b = TreeBuilder::new();
    let cond = b.binary(BinaryOp::And, b.is_null("a"), b.is_null("b"));
    let method = public_method(
        &b,
        &["a", "b"],
        vec![b.if_(cond, iae(&b), None), use_all(&b, &["a", "b"])],
    );
    assert!(sketch_at(&matcher(), &method, &TypeTable::new(), NodeTag::Method).is_none());
}

#[test]
fn require_non_null_marks_but_stays() {
    let b = TreeBuilder::new();
    let check = b.expr_stmt(b.call(
        Some(b.ident("Objects")),
        "requireNonNull",
        vec![b.ident("x")],
    ));
    let method = public_method(&b, &["x"], vec![check, use_all(&b, &["x"])]);
    assert_eq!(
        sketch_at(&matcher(), &method, &TypeTable::new(), NodeTag::Method).as_deref(),
        Some("public void f(@NonNull String x) { Objects.requireNonNull(x); use(x); }")
    );
}

#[test]
fn configured_null_checks_are_recognised() {
    let b = TreeBuilder::new();
    let check = b.expr_stmt(b.call(Some(b.ident("Guard")), "notNull", vec![b.ident("x")]));
    let method = public_method(&b, &["x"], vec![check, use_all(&b, &["x"])]);
    let plain = matcher();
    assert!(sketch_at(&plain, &method, &TypeTable::new(), NodeTag::Method).is_none());

    let configured = NullGuardMatcher::new(
        "org.jspecify.annotations.NonNull",
        vec![MethodPattern::parse("demo.Guard notNull(..)").unwrap_or_else(|e| panic!("{e}"))],
    );
    assert!(sketch_at(&configured, &method, &TypeTable::new(), NodeTag::Method).is_some());
}

#[test]
fn only_leading_guards_count() {
    let b = TreeBuilder::new();
    let method = public_method(
        &b,
        &["x"],
        vec![use_all(&b, &["x"]), b.if_(b.is_null("x"), iae(&b), None)],
    );
    assert!(sketch_at(&matcher(), &method, &TypeTable::new(), NodeTag::Method).is_none());
}

#[test]
fn non_public_methods_are_left_alone() {
    let b = TreeBuilder::new();
    let method = b.method(
        Modifiers::PRIVATE,
        Type::Void,
        "f",
        vec![b.param(string(), "x")],
        b.block(vec![b.if_(b.is_null("x"), iae(&b), None)]),
    );
    assert!(sketch_at(&matcher(), &method, &TypeTable::new(), NodeTag::Method).is_none());
}

#[test]
fn guard_comments_move_to_the_next_statement() {
    let b = TreeBuilder::new();
    let guard = b.with_comment(b.if_(b.is_null("x"), iae(&b), None), "validate");
    let method = public_method(&b, &["x"], vec![guard, use_all(&b, &["x"])]);
    assert_eq!(
        sketch_at(&matcher(), &method, &TypeTable::new(), NodeTag::Method).as_deref(),
        Some("public void f(@NonNull String x) { /*validate*/ use(x); }")
    );
}

#[test]
fn already_annotated_parameters_are_stable() {
    let b = TreeBuilder::new();
    let check = b.expr_stmt(b.call(
        Some(b.ident("Objects")),
        "requireNonNull",
        vec![b.ident("x")],
    ));
    let mut param = b.param(string(), "x");
    if let refit_ir::NodeKind::Param { ty, name, .. } = param.kind().clone() {
        param = param.with_kind(refit_ir::NodeKind::Param {
            annotations: vec![b.annotation("NonNull")],
            ty,
            name,
        });
    }
    let method = b.method(Modifiers::PUBLIC, Type::Void, "f", vec![param], b.block(vec![check]));
    assert!(sketch_at(&matcher(), &method, &TypeTable::new(), NodeTag::Method).is_none());
}
