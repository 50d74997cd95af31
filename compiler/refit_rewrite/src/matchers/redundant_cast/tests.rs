use pretty_assertions::assert_eq;
use refit_ir::build::TreeBuilder;
use refit_ir::{ClassInfo, MethodSig, Modifiers, Name, Node, NodeTag, Type, TypeTable};

use super::RedundantCastMatcher;
use crate::matcher::DeferredAction;
use crate::test_helpers::{rewrite_at, sketch_at};

const FOO: &str = "com.acme.Foo";
const BASE: &str = "com.acme.Base";

fn types() -> TypeTable {
    TypeTable::new()
        .with(ClassInfo::new(BASE))
        .with(ClassInfo::new(FOO).extends(BASE))
}

fn get_foo(b: &TreeBuilder) -> Node {
    b.call_to(None, &MethodSig::new("C", "getFoo", vec![], Type::class(FOO)), vec![])
}

fn rewrite(root: &Node) -> Option<String> {
    sketch_at(&RedundantCastMatcher::new(), root, &types(), NodeTag::Cast)
}

#[test]
fn cast_to_the_exact_type_is_removed() {
    let b = TreeBuilder::new();
    let block = b.block(vec![b.local(
        Type::class(FOO),
        "f",
        Some(b.cast(Type::class(FOO), get_foo(&b))),
    )]);
    assert_eq!(rewrite(&block).as_deref(), Some("getFoo()"));
}

#[test]
fn upcast_into_supertype_context_is_removed() {
    let b = TreeBuilder::new();
    let block = b.block(vec![b.local(
        Type::class(BASE),
        "f",
        Some(b.cast(Type::class(BASE), get_foo(&b))),
    )]);
    assert_eq!(rewrite(&block).as_deref(), Some("getFoo()"));
}

#[test]
fn downcast_stays() {
    let b = TreeBuilder::new();
    let base = b.call_to(None, &MethodSig::new("C", "getBase", vec![], Type::class(BASE)), vec![]);
    let block = b.block(vec![b.local(
        Type::class(FOO),
        "f",
        Some(b.cast(Type::class(FOO), base)),
    )]);
    assert!(rewrite(&block).is_none());
}

#[test]
fn primitive_widening_stays() {
    let b = TreeBuilder::new();
    let block = b.block(vec![b.local(
        Type::Primitive(refit_ir::Primitive::Long),
        "x",
        Some(b.cast(
            Type::Primitive(refit_ir::Primitive::Long),
            b.typed_ident("i", Type::int()),
        )),
    )]);
    assert!(rewrite(&block).is_none());
}

#[test]
fn identical_primitive_cast_is_removed() {
    let b = TreeBuilder::new();
    let block = b.block(vec![b.local(
        Type::int(),
        "x",
        Some(b.cast(Type::int(), b.typed_ident("i", Type::int()))),
    )]);
    assert_eq!(rewrite(&block).as_deref(), Some("i"));
}

#[test]
fn untyped_local_gives_no_target() {
    let b = TreeBuilder::new();
    let block = b.block(vec![b.local(
        Type::Unknown,
        "f",
        Some(b.cast(Type::class(FOO), get_foo(&b))),
    )]);
    assert!(rewrite(&block).is_none());
}

#[test]
fn return_uses_method_return_type() {
    let b = TreeBuilder::new();
    let method = b.method(
        Modifiers::empty(),
        Type::class(BASE),
        "make",
        vec![],
        b.block(vec![b.ret(Some(b.cast(Type::class(FOO), get_foo(&b))))]),
    );
    assert_eq!(rewrite(&method).as_deref(), Some("getFoo()"));
}

#[test]
fn return_inside_lambda_is_left_alone() {
    let b = TreeBuilder::new();
    let lambda = b.lambda(
        vec![],
        b.block(vec![b.ret(Some(b.cast(Type::class(FOO), get_foo(&b))))]),
    );
    let method = b.method(
        Modifiers::empty(),
        Type::class(FOO),
        "make",
        vec![],
        b.block(vec![b.expr_stmt(b.call(None, "run", vec![lambda]))]),
    );
    assert!(rewrite(&method).is_none());
}

#[test]
fn assignment_uses_target_type() {
    let b = TreeBuilder::new();
    let block = b.block(vec![b.expr_stmt(b.assign(
        b.typed_ident("f", Type::class(FOO)),
        b.paren(b.cast(Type::class(FOO), get_foo(&b))),
    ))]);
    assert_eq!(rewrite(&block).as_deref(), Some("getFoo()"));
}

#[test]
fn argument_of_single_overload_is_removed() {
    let b = TreeBuilder::new();
    let take = MethodSig::new("C", "take", vec![Type::class(FOO)], Type::Void);
    let call = b.call_to(None, &take, vec![b.cast(Type::class(FOO), get_foo(&b))]);
    let types = types().with(ClassInfo::new("C").method(take));
    let out = sketch_at(&RedundantCastMatcher::new(), &b.expr_stmt(call), &types, NodeTag::Cast);
    assert_eq!(out.as_deref(), Some("getFoo()"));
}

#[test]
fn argument_selecting_an_overload_stays() {
    let b = TreeBuilder::new();
    let take_foo = MethodSig::new("C", "take", vec![Type::class(FOO)], Type::Void);
    let take_base = MethodSig::new("C", "take", vec![Type::class(BASE)], Type::Void);
    let call = b.call_to(None, &take_base, vec![b.cast(Type::class(BASE), get_foo(&b))]);
    let types = types().with(ClassInfo::new("C").method(take_foo).method(take_base));
    let out = sketch_at(&RedundantCastMatcher::new(), &b.expr_stmt(call), &types, NodeTag::Cast);
    assert!(out.is_none());
}

#[test]
fn argument_of_unresolved_call_stays() {
    let b = TreeBuilder::new();
    let call = b.call(None, "take", vec![b.cast(Type::class(FOO), get_foo(&b))]);
    assert!(rewrite(&b.expr_stmt(call)).is_none());
}

#[test]
fn generic_call_result_stays() {
    let b = TreeBuilder::new();
    let make = MethodSig::new("C", "make", vec![], Type::class(FOO)).generic();
    let block = b.block(vec![b.local(
        Type::class(FOO),
        "f",
        Some(b.cast(Type::class(FOO), b.call_to(None, &make, vec![]))),
    )]);
    assert!(rewrite(&block).is_none());
}

#[test]
fn cast_comments_stay_with_the_expression() {
    let b = TreeBuilder::new();
    let block = b.block(vec![b.local(
        Type::class(FOO),
        "f",
        Some(b.with_comment(b.cast(Type::class(FOO), get_foo(&b)), "checked")),
    )]);
    assert_eq!(rewrite(&block).as_deref(), Some("/*checked*/ getFoo()"));
}

#[test]
fn import_of_the_cast_type_is_released() {
    let b = TreeBuilder::new();
    let block = b.block(vec![b.local(
        Type::class(FOO),
        "f",
        Some(b.cast(Type::class(FOO), get_foo(&b))),
    )]);
    let rewrite = rewrite_at(&RedundantCastMatcher::new(), &block, &types(), NodeTag::Cast);
    let deferred = rewrite.map(|r| r.side.deferred).unwrap_or_default();
    assert_eq!(deferred, vec![DeferredAction::RemoveImport(Name::new(FOO))]);
}
