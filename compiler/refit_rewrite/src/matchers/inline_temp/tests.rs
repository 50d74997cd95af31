use pretty_assertions::assert_eq;
use refit_ir::build::TreeBuilder;
use refit_ir::{ClassInfo, MethodSig, Node, NodeTag, Primitive, Type, TypeTable};

use super::InlineTempMatcher;
use crate::test_helpers::sketch_at;

fn rewrite(container: &Node, tag: NodeTag) -> Option<String> {
    let types = TypeTable::new().with(ClassInfo::new("app.Failure").extends("java.lang.RuntimeException"));
    sketch_at(&InlineTempMatcher::new(), container, &types, tag)
}

#[test]
fn returned_temporary_is_inlined() {
    let b = TreeBuilder::new();
    let block = b.block(vec![
        b.local(Type::int(), "y", Some(b.int(5))),
        b.ret(Some(b.ident("y"))),
    ]);
    assert_eq!(rewrite(&block, NodeTag::Block).as_deref(), Some("{ return 5; }"));
}

#[test]
fn thrown_temporary_is_inlined() {
    let b = TreeBuilder::new();
    let failure = Type::class("app.Failure");
    let block = b.block(vec![
        b.local(
            Type::class("java.lang.RuntimeException"),
            "e",
            Some(b.new_object(failure, vec![b.string("bad")])),
        ),
        b.throw(b.ident("e")),
    ]);
    assert_eq!(
        rewrite(&block, NodeTag::Block).as_deref(),
        Some("{ throw new Failure(\"bad\"); }")
    );
}

#[test]
fn comments_from_both_statements_are_merged() {
    let b = TreeBuilder::new();
    let block = b.block(vec![
        b.with_comment(b.local(Type::int(), "y", Some(b.int(5))), "answer"),
        b.with_comment(b.ret(Some(b.ident("y"))), "done"),
    ]);
    assert_eq!(
        rewrite(&block, NodeTag::Block).as_deref(),
        Some("{ /*answer*/ /*done*/ return 5; }")
    );
}

#[test]
fn only_the_tail_is_considered() {
    let b = TreeBuilder::new();
    let block = b.block(vec![
        b.local(Type::int(), "y", Some(b.int(5))),
        b.expr_stmt(b.call(None, "log", vec![])),
        b.ret(Some(b.ident("y"))),
    ]);
    assert!(rewrite(&block, NodeTag::Block).is_none());
}

#[test]
fn converting_temporary_stays() {
    let b = TreeBuilder::new();
    let block = b.block(vec![
        b.local(
            Type::Primitive(Primitive::Long),
            "y",
            Some(b.typed_ident("i", Type::int())),
        ),
        b.ret(Some(b.ident("y"))),
    ]);
    assert!(rewrite(&block, NodeTag::Block).is_none());
}

#[test]
fn annotated_temporary_stays() {
    let b = TreeBuilder::new();
    let local = b.local(Type::int(), "y", Some(b.int(5)));
    let local = match local.kind() {
        refit_ir::NodeKind::LocalVar {
            modifiers,
            ty,
            name,
            init,
            ..
        } => local.with_kind(refit_ir::NodeKind::LocalVar {
            annotations: vec![b.annotation("SuppressWarnings")],
            modifiers: *modifiers,
            ty: ty.clone(),
            name: name.clone(),
            init: init.clone(),
        }),
        _ => local,
    };
    let block = b.block(vec![local, b.ret(Some(b.ident("y")))]);
    assert!(rewrite(&block, NodeTag::Block).is_none());
}

#[test]
fn case_groups_are_handled() {
    let b = TreeBuilder::new();
    let lookup = MethodSig::new("C", "lookup", vec![], Type::class("java.lang.String"));
    let switch = b.switch(
        b.ident("k"),
        vec![b.case(
            vec![b.int(1)],
            vec![
                b.local(
                    Type::class("java.lang.String"),
                    "s",
                    Some(b.call_to(None, &lookup, vec![])),
                ),
                b.ret(Some(b.ident("s"))),
            ],
        )],
    );
    assert_eq!(
        rewrite(&switch, NodeTag::Case).as_deref(),
        Some("case 1: return lookup();")
    );
}

fn lookup_group(b: &TreeBuilder) -> Node {
    let lookup = MethodSig::new("C", "lookup", vec![], Type::class("java.lang.String"));
    b.case(
        vec![b.int(1)],
        vec![
            b.local(
                Type::class("java.lang.String"),
                "s",
                Some(b.call_to(None, &lookup, vec![])),
            ),
            b.ret(Some(b.ident("s"))),
        ],
    )
}

#[test]
fn temporary_seen_by_a_later_case_group_stays() {
    let b = TreeBuilder::new();
    let switch = b.switch(
        b.ident("k"),
        vec![
            lookup_group(&b),
            b.case(
                vec![b.int(2)],
                vec![b.expr_stmt(b.assign(b.ident("s"), b.string("x"))), b.ret(Some(b.ident("s")))],
            ),
        ],
    );
    assert!(rewrite(&switch, NodeTag::Case).is_none());
}

#[test]
fn shadowing_lambda_in_a_later_case_group_does_not_block_inlining() {
    let b = TreeBuilder::new();
    let printer = b.lambda(
        vec![b.lambda_param("s")],
        b.call(None, "print", vec![b.ident("s")]),
    );
    let switch = b.switch(
        b.ident("k"),
        vec![
            lookup_group(&b),
            b.case(
                vec![b.int(2)],
                vec![b.expr_stmt(b.call(None, "each", vec![printer])), b.brk()],
            ),
        ],
    );
    assert_eq!(
        rewrite(&switch, NodeTag::Case).as_deref(),
        Some("case 1: return lookup();")
    );
}
