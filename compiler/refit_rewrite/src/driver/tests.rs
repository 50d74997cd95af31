use pretty_assertions::assert_eq;
use refit_ir::build::TreeBuilder;
use refit_ir::{sketch, Literal, Node, NodeKind, NodeTag, SourceUnit, Type, TypeTable};
use rustc_hash::FxHashSet;

use super::{AppliedRewrite, Diagnostic, Driver};
use crate::config::RewriteConfig;
use crate::matcher::{MatchContext, MatchResult, Matcher, Rewrite};
use crate::ConfigError;

/// Rewrites the int literal `from` to `to`.
struct Relabel {
    name: &'static str,
    priority: u16,
    from: i64,
    to: i64,
}

impl Matcher for Relabel {
    fn name(&self) -> &'static str {
        self.name
    }

    fn priority(&self) -> u16 {
        self.priority
    }

    fn applies_to(&self, tag: NodeTag) -> bool {
        tag == NodeTag::Literal
    }

    fn try_match(&self, node: &Node, _cx: &MatchContext<'_>) -> MatchResult {
        match node.kind() {
            NodeKind::Literal(Literal::Int(v)) if *v == self.from => MatchResult::Matched(
                Rewrite::new(Node::synthetic(NodeKind::Literal(Literal::Int(self.to)))),
            ),
            _ => MatchResult::NoMatch,
        }
    }
}

/// Appends an empty statement to blocks that have none.
struct AppendEmpty;

impl Matcher for AppendEmpty {
    fn name(&self) -> &'static str {
        "append-empty"
    }

    fn priority(&self) -> u16 {
        50
    }

    fn applies_to(&self, tag: NodeTag) -> bool {
        tag == NodeTag::Block
    }

    fn try_match(&self, node: &Node, _cx: &MatchContext<'_>) -> MatchResult {
        let NodeKind::Block { stmts } = node.kind() else {
            return MatchResult::NoMatch;
        };
        if stmts.iter().any(|s| s.tag() == NodeTag::Empty) {
            return MatchResult::NoMatch;
        }
        let mut stmts = stmts.clone();
        stmts.push(Node::synthetic(NodeKind::Empty));
        MatchResult::Matched(Rewrite::new(node.with_kind(NodeKind::Block { stmts })))
    }
}

fn relabel(name: &'static str, priority: u16, from: i64, to: i64) -> Box<dyn Matcher> {
    Box::new(Relabel {
        name,
        priority,
        from,
        to,
    })
}

fn unit(root: Node) -> SourceUnit {
    SourceUnit::new(root, TypeTable::new())
}

fn names(applied: &[AppliedRewrite]) -> Vec<(&'static str, usize)> {
    applied.iter().map(|a| (a.matcher, a.pass)).collect()
}

#[test]
fn empty_driver_settles_immediately() {
    let b = TreeBuilder::new();
    let input = unit(b.block(vec![b.expr_stmt(b.call(None, "foo", vec![b.int(1)]))]));
    let outcome = Driver::new().run(&input);
    assert!(outcome.stable);
    assert!(!outcome.changed());
    assert_eq!(outcome.passes, 1);
    assert!(Node::ptr_eq(&outcome.unit.root, &input.root));
}

#[test]
fn zero_passes_is_a_config_error() {
    let config = RewriteConfig {
        max_passes: 0,
        ..RewriteConfig::default()
    };
    assert!(matches!(Driver::from_config(&config), Err(ConfigError::NoPasses)));
}

#[test]
fn bad_pure_method_pattern_is_a_config_error() {
    let mut config = RewriteConfig::default();
    config.side_effects.pure_methods = vec!["size".to_string()];
    assert!(matches!(
        Driver::from_config(&config),
        Err(ConfigError::Pattern {
            option: "side_effects.pure_methods",
            ..
        })
    ));
}

#[test]
fn configured_pure_methods_reach_the_gate() {
    let mut config = RewriteConfig::default();
    config.side_effects.pure_methods = vec!["app.Point x()".to_string()];
    let driver = Driver::from_config(&config).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(
        driver.gate().pure_methods().len(),
        refit_analysis::SafetyGate::new().pure_methods().len() + 1
    );
}

#[test]
fn priority_orders_matchers_and_ties_keep_registration_order() {
    let mut driver = Driver::new();
    driver.register(relabel("late", 20, 1, 2));
    driver.register(relabel("first-tie", 10, 1, 2));
    driver.register(relabel("second-tie", 10, 1, 2));
    assert_eq!(driver.matcher_names(), vec!["first-tie", "second-tie", "late"]);
}

#[test]
fn first_matching_matcher_wins() {
    let b = TreeBuilder::new();
    let mut driver = Driver::new();
    driver.register(relabel("to-two", 10, 1, 2));
    driver.register(relabel("to-three", 20, 1, 3));
    let outcome = driver.run(&unit(b.block(vec![b.expr_stmt(b.int(1))])));
    assert_eq!(sketch(&outcome.unit.root), "{ 2; }");
    assert_eq!(names(&outcome.applied), vec![("to-two", 1)]);
}

#[test]
fn one_rewrite_exposes_another_in_a_later_pass() {
    let b = TreeBuilder::new();
    let mut driver = Driver::new();
    driver.register(relabel("one-to-two", 10, 1, 2));
    driver.register(relabel("two-to-three", 10, 2, 3));
    let outcome = driver.run(&unit(b.block(vec![b.expr_stmt(b.int(1))])));
    assert_eq!(sketch(&outcome.unit.root), "{ 3; }");
    assert_eq!(
        names(&outcome.applied),
        vec![("one-to-two", 1), ("two-to-three", 2)]
    );
    assert_eq!(outcome.passes, 3);
    assert!(outcome.stable);
}

#[test]
fn changed_subtree_is_not_matched_again_in_the_same_pass() {
    let b = TreeBuilder::new();
    let mut driver = Driver::new();
    driver.register(relabel("one-to-two", 10, 1, 2));
    driver.register(Box::new(AppendEmpty));
    let outcome = driver.run(&unit(b.block(vec![b.expr_stmt(b.int(1))])));
    assert_eq!(sketch(&outcome.unit.root), "{ 2; ; }");
    assert_eq!(
        names(&outcome.applied),
        vec![("one-to-two", 1), ("append-empty", 2)]
    );
}

#[test]
fn oscillation_stops_at_the_pass_cap() {
    let b = TreeBuilder::new();
    let mut driver = Driver::new().with_max_passes(3);
    driver.register(relabel("one-to-two", 10, 1, 2));
    driver.register(relabel("two-to-one", 10, 2, 1));
    let outcome = driver.run(&unit(b.block(vec![b.expr_stmt(b.int(1))])));
    assert!(!outcome.stable);
    assert_eq!(outcome.passes, 3);
    assert_eq!(
        outcome.diagnostics,
        vec![Diagnostic::IterationCapReached { max_passes: 3 }]
    );
    // The tree of the last pass is returned.
    assert_eq!(sketch(&outcome.unit.root), "{ 2; }");
    assert_eq!(outcome.counts(), vec![("one-to-two", 2), ("two-to-one", 1)]);
}

#[test]
fn synthetic_nodes_get_fresh_unique_ids() {
    let b = TreeBuilder::new();
    let mut driver = Driver::new();
    driver.register(relabel("one-to-two", 10, 1, 2));
    driver.register(Box::new(AppendEmpty));
    let root = b.block(vec![b.expr_stmt(b.int(1)), b.expr_stmt(b.int(1))]);
    let outcome = driver.run(&unit(root));
    let mut seen = FxHashSet::default();
    for node in outcome.unit.root.descendants() {
        assert!(!node.id().is_synthetic(), "{node:?}");
        assert!(seen.insert(node.id()), "duplicate id on {node:?}");
    }
}

#[test]
fn built_in_matchers_chain_to_a_fixed_point() {
    let b = TreeBuilder::new();
    let block = b.block(vec![
        b.local(Type::int(), "unused", Some(b.int(1))),
        b.local(Type::int(), "y", Some(b.int(5))),
        b.ret(Some(b.ident("y"))),
    ]);
    let root = b.class(
        refit_ir::Modifiers::empty(),
        "C",
        vec![b.method(refit_ir::Modifiers::empty(), Type::int(), "f", vec![], block)],
    );
    let driver = Driver::from_config(&RewriteConfig::default()).unwrap_or_else(|e| panic!("{e}"));
    let outcome = driver.run(&unit(root));
    assert_eq!(sketch(&outcome.unit.root), "class C { int f() { return 5; } }");
    assert_eq!(
        names(&outcome.applied),
        vec![("inline-temp", 1), ("unused-binding", 2)]
    );
    assert!(outcome.stable);
}

#[test]
fn run_all_keeps_input_order() {
    let b = TreeBuilder::new();
    let mut driver = Driver::new();
    driver.register(relabel("one-to-two", 10, 1, 2));
    let units: Vec<SourceUnit> = (0..8)
        .map(|i| unit(b.block(vec![b.expr_stmt(b.int(i % 2))])))
        .collect();
    let outcomes = driver.run_all(&units);
    let sketches: Vec<String> = outcomes.iter().map(|o| sketch(&o.unit.root)).collect();
    let expected: Vec<String> = (0..8)
        .map(|i| if i % 2 == 1 { "{ 2; }" } else { "{ 0; }" }.to_string())
        .collect();
    assert_eq!(sketches, expected);
}
