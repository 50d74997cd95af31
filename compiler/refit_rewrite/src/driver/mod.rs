//! The fixed-point rewrite driver.
//!
//! One `run` takes a unit through these phases:
//!
//! ```text
//! Idle -> Visiting -> (Applying -> Visiting)* -> Stable
//! ```
//!
//! A pass visits the tree depth-first and offers each node, after its
//! children, to every matcher that applies to its tag in priority order.
//! The first match replaces the node. A node whose subtree already changed
//! in this pass is not offered again until the next one, so every match
//! sees the tree as it was when the pass began. Between passes the
//! session's deferred actions are applied to the root.
//!
//! The run ends at the first pass that changes nothing, or after
//! `max_passes` passes with a `Diagnostic::IterationCapReached`.

use std::fmt;

use rayon::prelude::*;
use refit_analysis::SafetyGate;
use refit_ir::{sketch, Ancestors, Node, NodeId, SourceUnit, TypeTable};
use tracing::{debug, debug_span, trace, warn};

use crate::config::{parse_patterns, RewriteConfig, DEFAULT_MAX_PASSES};
use crate::matcher::{MatchContext, MatchResult, Matcher};
use crate::session::RewriteSession;
use crate::{matchers, ConfigError};

/// A registry of matchers plus the safety gate they share.
///
/// A driver is immutable once built and may rewrite many units at once.
pub struct Driver {
    matchers: Vec<Box<dyn Matcher>>,
    gate: SafetyGate,
    max_passes: usize,
}

impl Default for Driver {
    fn default() -> Self {
        Driver::new()
    }
}

impl Driver {
    /// A driver with no matchers and the built-in pure methods.
    pub fn new() -> Self {
        Driver {
            matchers: Vec::new(),
            gate: SafetyGate::new(),
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    /// A driver with every built-in matcher `config` enables.
    pub fn from_config(config: &RewriteConfig) -> Result<Self, ConfigError> {
        if config.max_passes == 0 {
            return Err(ConfigError::NoPasses);
        }
        let pure = parse_patterns("side_effects.pure_methods", &config.side_effects.pure_methods)?;
        let mut driver = Driver {
            matchers: Vec::new(),
            gate: SafetyGate::with_pure_methods(pure),
            max_passes: config.max_passes,
        };
        for matcher in matchers::build(config)? {
            driver.register(matcher);
        }
        Ok(driver)
    }

    /// Add a matcher. Equal priorities keep registration order.
    pub fn register(&mut self, matcher: Box<dyn Matcher>) {
        self.matchers.push(matcher);
        self.matchers.sort_by_key(|m| m.priority());
    }

    #[must_use]
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    /// Registered matcher names in the order they are tried.
    pub fn matcher_names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    pub fn gate(&self) -> &SafetyGate {
        &self.gate
    }

    /// Rewrite one unit to a fixed point.
    pub fn run(&self, unit: &SourceUnit) -> RewriteOutcome {
        let _span = debug_span!("rewrite_unit", root = unit.root.id().raw()).entered();
        let mut phase = Phase::Idle;
        let mut session = RewriteSession::new();
        let mut root = unit.root.clone();
        let mut next_id = root.max_id().raw() + 1;
        let mut applied = Vec::new();
        let mut passes = 0;
        let mut stable = false;

        while passes < self.max_passes {
            passes += 1;
            session.clear();
            phase.enter(Phase::Visiting);
            let mut pass = Pass {
                driver: self,
                types: &unit.types,
                session: &mut session,
                next_id: &mut next_id,
                number: passes,
                applied: &mut applied,
                rewrites: 0,
            };
            root = pass.visit(&root, &mut Vec::new());
            let rewrites = pass.rewrites;

            phase.enter(Phase::Applying);
            let deferred = match session.apply(&root) {
                Some(updated) => {
                    root = updated.renumber_synthetic(&mut next_id);
                    true
                }
                None => false,
            };
            debug!(pass = passes, rewrites, deferred, "pass finished");
            if rewrites == 0 && !deferred {
                stable = true;
                break;
            }
        }

        let mut diagnostics = Vec::new();
        if stable {
            phase.enter(Phase::Stable);
        } else {
            warn!(
                max_passes = self.max_passes,
                "no fixed point within the pass limit"
            );
            diagnostics.push(Diagnostic::IterationCapReached {
                max_passes: self.max_passes,
            });
        }
        RewriteOutcome {
            unit: unit.with_root(root),
            passes,
            applied,
            diagnostics,
            stable,
        }
    }

    /// Rewrite independent units in parallel, one session per unit.
    /// Outcomes come back in input order.
    pub fn run_all(&self, units: &[SourceUnit]) -> Vec<RewriteOutcome> {
        units.par_iter().map(|unit| self.run(unit)).collect()
    }
}

/// One traversal of the tree.
struct Pass<'p> {
    driver: &'p Driver,
    types: &'p TypeTable,
    session: &'p mut RewriteSession,
    next_id: &'p mut u32,
    number: usize,
    applied: &'p mut Vec<AppliedRewrite>,
    rewrites: usize,
}

impl Pass<'_> {
    /// Rebuild `node` bottom-up. `path` holds its ancestors.
    fn visit(&mut self, node: &Node, path: &mut Vec<Node>) -> Node {
        let children = node.children();
        path.push(node.clone());
        let rebuilt: Vec<Node> = children.iter().map(|c| self.visit(c, path)).collect();
        path.pop();

        let changed = children
            .iter()
            .zip(&rebuilt)
            .any(|(old, new)| !Node::ptr_eq(old, new));
        if changed {
            return node.with_children(rebuilt);
        }
        self.offer(node, path).unwrap_or_else(|| node.clone())
    }

    fn offer(&mut self, node: &Node, path: &[Node]) -> Option<Node> {
        let tag = node.tag();
        let cx = MatchContext {
            ancestors: Ancestors::new(path),
            types: self.types,
            gate: &self.driver.gate,
        };
        for matcher in self.driver.matchers.iter().filter(|m| m.applies_to(tag)) {
            let MatchResult::Matched(rewrite) = matcher.try_match(node, &cx) else {
                continue;
            };
            let replacement = rewrite.replacement.renumber_synthetic(self.next_id);
            debug!(
                matcher = matcher.name(),
                pass = self.number,
                before = %sketch(node),
                after = %sketch(&replacement),
                "rewrite applied"
            );
            self.session.record(rewrite.side);
            self.applied.push(AppliedRewrite {
                matcher: matcher.name(),
                pass: self.number,
                target: node.id(),
            });
            self.rewrites += 1;
            return Some(replacement);
        }
        None
    }
}

/// Driver state, tracked for tracing only.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Visiting,
    Applying,
    Stable,
}

impl Phase {
    fn enter(&mut self, next: Phase) {
        trace!(from = ?*self, to = ?next, "driver phase");
        *self = next;
    }
}

/// Record of one accepted rewrite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedRewrite {
    pub matcher: &'static str,
    /// 1-based pass number.
    pub pass: usize,
    /// Id of the node that was replaced.
    pub target: NodeId,
}

/// Non-fatal conditions reported alongside a result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// Rewrites were still being found when the pass limit ran out. The
    /// tree is the result of the last pass.
    IterationCapReached { max_passes: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::IterationCapReached { max_passes } => {
                write!(f, "rewriting did not settle within {max_passes} passes")
            }
        }
    }
}

/// Result of rewriting one unit.
#[derive(Clone, Debug)]
pub struct RewriteOutcome {
    pub unit: SourceUnit,
    pub passes: usize,
    pub applied: Vec<AppliedRewrite>,
    pub diagnostics: Vec<Diagnostic>,
    /// The last pass found nothing left to do.
    pub stable: bool,
}

impl RewriteOutcome {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }

    /// Applied rewrite counts per matcher, in first-applied order.
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        let mut counts: Vec<(&'static str, usize)> = Vec::new();
        for rewrite in &self.applied {
            match counts.iter_mut().find(|(name, _)| *name == rewrite.matcher) {
                Some((_, n)) => *n += 1,
                None => counts.push((rewrite.matcher, 1)),
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests;
