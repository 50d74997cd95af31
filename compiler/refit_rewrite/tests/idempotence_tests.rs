//! Idempotence: rewriting already rewritten output changes nothing.
//!
//! Every matcher family gets an input it rewrites; the output of the first
//! run must be a fixed point for a second run with the same driver.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use refit_ir::build::TreeBuilder;
use refit_ir::{
    sketch, ClassInfo, MethodSig, Modifiers, Node, SourceUnit, Type, TypeTable, AUTO_CLOSEABLE,
};
use refit_rewrite::{matchers::NAMES, Driver, RewriteConfig};

fn method_unit(b: &TreeBuilder, modifiers: Modifiers, params: Vec<Node>, stmts: Vec<Node>) -> Node {
    let method = b.method(modifiers, Type::Void, "f", params, b.block(stmts));
    b.unit(vec![], vec![b.class(Modifiers::empty(), "C", vec![method])])
}

fn call(b: &TreeBuilder, name: &str, args: Vec<Node>) -> Node {
    b.expr_stmt(b.call(None, name, args))
}

fn null_guard_input(b: &TreeBuilder) -> Node {
    method_unit(
        b,
        Modifiers::PUBLIC,
        vec![
            b.param(Type::class("java.lang.String"), "a"),
            b.param(Type::class("java.lang.String"), "b"),
        ],
        vec![
            b.if_(
                b.binary(refit_ir::BinaryOp::Or, b.is_null("a"), b.is_null("b")),
                b.ret(None),
                None,
            ),
            call(b, "use", vec![b.ident("a"), b.ident("b")]),
        ],
    )
}

fn fallthrough_input(b: &TreeBuilder) -> Node {
    method_unit(
        b,
        Modifiers::empty(),
        vec![],
        vec![b.switch(
            b.ident("k"),
            vec![
                b.case(vec![b.int(1)], vec![call(b, "one", vec![])]),
                b.case(vec![b.int(2)], vec![call(b, "two", vec![])]),
                b.default_case(vec![call(b, "other", vec![])]),
            ],
        )],
    )
}

fn unused_binding_input(b: &TreeBuilder) -> Node {
    let helper = b.method(
        Modifiers::PRIVATE,
        Type::Void,
        "helper",
        vec![b.param(Type::int(), "used"), b.param(Type::int(), "unused")],
        b.block(vec![call(b, "use", vec![b.ident("used")])]),
    );
    let run = b.method(
        Modifiers::empty(),
        Type::Void,
        "run",
        vec![],
        b.block(vec![
            b.local(Type::int(), "dead", Some(b.int(3))),
            call(b, "helper", vec![b.int(1), b.int(2)]),
        ]),
    );
    b.unit(vec![], vec![b.class(Modifiers::empty(), "C", vec![helper, run])])
}

fn redundant_cast_input(b: &TreeBuilder) -> Node {
    let foo = Type::class("app.Foo");
    let get = MethodSig::new("C", "get", vec![], foo.clone());
    method_unit(
        b,
        Modifiers::empty(),
        vec![],
        vec![
            b.local(foo.clone(), "x", Some(b.cast(foo, b.call_to(None, &get, vec![])))),
            call(b, "use", vec![b.ident("x")]),
        ],
    )
}

fn try_finally_input(b: &TreeBuilder) -> Node {
    method_unit(
        b,
        Modifiers::empty(),
        vec![],
        vec![
            b.local(Type::class("java.io.Closeable"), "c", None),
            b.try_(
                vec![],
                b.block(vec![
                    b.expr_stmt(b.assign(b.ident("c"), b.call(None, "open", vec![]))),
                    call(b, "use", vec![b.ident("c")]),
                ]),
                vec![],
                Some(b.block(vec![b.expr_stmt(b.call(Some(b.ident("c")), "close", vec![]))])),
            ),
        ],
    )
}

fn inline_temp_input(b: &TreeBuilder) -> Node {
    let method = b.method(
        Modifiers::empty(),
        Type::class("java.lang.String"),
        "f",
        vec![],
        b.block(vec![
            b.local(Type::class("java.lang.String"), "s", Some(b.string("x"))),
            b.ret(Some(b.ident("s"))),
        ]),
    );
    b.unit(vec![], vec![b.class(Modifiers::empty(), "C", vec![method])])
}

fn types() -> TypeTable {
    TypeTable::new()
        .with(ClassInfo::new("java.io.Closeable").extends(AUTO_CLOSEABLE))
        .with(ClassInfo::new("app.Foo"))
}

/// Run `family` alone on `input`, then again on its output.
fn assert_idempotent(family: &str, input: Node) {
    let driver = Driver::from_config(&RewriteConfig::only(&[family])).unwrap();
    let first = driver.run(&SourceUnit::new(input, types()));
    assert!(first.changed(), "{family} did not fire");
    assert!(first.stable);
    assert!(first.applied.iter().all(|a| a.matcher == family));

    let second = driver.run(&first.unit);
    assert!(!second.changed(), "{family} fired again: {:?}", second.applied);
    assert_eq!(second.passes, 1);
    assert_eq!(sketch(&second.unit.root), sketch(&first.unit.root));
}

#[test]
fn null_guard_is_idempotent() {
    assert_idempotent("null-guard", null_guard_input(&TreeBuilder::new()));
}

#[test]
fn fallthrough_is_idempotent() {
    assert_idempotent("fallthrough", fallthrough_input(&TreeBuilder::new()));
}

#[test]
fn unused_binding_is_idempotent() {
    assert_idempotent("unused-binding", unused_binding_input(&TreeBuilder::new()));
}

#[test]
fn redundant_cast_is_idempotent() {
    assert_idempotent("redundant-cast", redundant_cast_input(&TreeBuilder::new()));
}

#[test]
fn try_finally_is_idempotent() {
    assert_idempotent("try-finally-to-scoped", try_finally_input(&TreeBuilder::new()));
}

#[test]
fn inline_temp_is_idempotent() {
    assert_idempotent("inline-temp", inline_temp_input(&TreeBuilder::new()));
}

#[test]
fn all_families_together_are_idempotent() {
    let b = TreeBuilder::new();
    let inputs = [
        null_guard_input(&b),
        fallthrough_input(&b),
        unused_binding_input(&b),
        redundant_cast_input(&b),
        try_finally_input(&b),
        inline_temp_input(&b),
    ];
    let driver = Driver::from_config(&RewriteConfig::default()).unwrap();
    let units: Vec<SourceUnit> = inputs
        .into_iter()
        .map(|root| SourceUnit::new(root, types()))
        .collect();
    let first = driver.run_all(&units);
    let rewritten: Vec<SourceUnit> = first.iter().map(|o| o.unit.clone()).collect();
    for outcome in driver.run_all(&rewritten) {
        assert!(!outcome.changed(), "{:?}", outcome.applied);
    }
    assert_eq!(driver.matcher_names().len(), NAMES.len());
}
