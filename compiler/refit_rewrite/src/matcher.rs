//! The matcher contract.
//!
//! A matcher is a stateless predicate plus rewrite producer for one code
//! idiom. The driver offers it every node whose tag it `applies_to`, in
//! post-order, together with a `MatchContext`. A matcher never mutates
//! anything: it either declines or returns a replacement for the node it
//! was offered, plus a side table the driver records in the session.

use refit_analysis::SafetyGate;
use refit_ir::{Ancestors, Comment, Name, Node, NodeTag, TypeTable};

/// Everything a matcher may consult besides the node itself.
#[derive(Clone, Copy)]
pub struct MatchContext<'a> {
    /// Ancestors of the offered node, root first.
    pub ancestors: Ancestors<'a>,
    pub types: &'a TypeTable,
    pub gate: &'a SafetyGate,
}

/// Work a rewrite asks the driver to do after the current pass.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeferredAction {
    /// Import this fully qualified name if it is not imported yet.
    AddImport(Name),
    /// Drop the import of this fully qualified name once nothing in the
    /// unit mentions its simple name any more.
    RemoveImport(Name),
}

/// Auxiliary output of a successful match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SideTable {
    /// Comments moved from removed nodes onto survivors.
    pub relocated: Vec<Comment>,
    /// Names the replacement introduces or refers to.
    pub referenced: Vec<Name>,
    pub deferred: Vec<DeferredAction>,
}

/// A replacement for the offered node.
#[derive(Clone, Debug)]
pub struct Rewrite {
    pub replacement: Node,
    pub side: SideTable,
}

impl Rewrite {
    pub fn new(replacement: Node) -> Self {
        Rewrite {
            replacement,
            side: SideTable::default(),
        }
    }

    #[must_use]
    pub fn defer(mut self, action: DeferredAction) -> Self {
        self.side.deferred.push(action);
        self
    }

    #[must_use]
    pub fn relocating(mut self, comments: impl IntoIterator<Item = Comment>) -> Self {
        self.side.relocated.extend(comments);
        self
    }

    #[must_use]
    pub fn referencing(mut self, name: Name) -> Self {
        self.side.referenced.push(name);
        self
    }
}

#[derive(Clone, Debug)]
pub enum MatchResult {
    NoMatch,
    Matched(Rewrite),
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }
}

impl From<Option<Rewrite>> for MatchResult {
    fn from(rewrite: Option<Rewrite>) -> Self {
        rewrite.map_or(MatchResult::NoMatch, MatchResult::Matched)
    }
}

/// One recognised idiom.
///
/// Implementations must be deterministic and side-effect free: the same
/// node and context always give the same result, and declining leaves no
/// trace.
pub trait Matcher: Send + Sync {
    /// Stable name used in configuration and logs.
    fn name(&self) -> &'static str;

    /// Lower runs first. Specific matchers use lower numbers than generic
    /// ones sharing a node kind.
    fn priority(&self) -> u16;

    fn applies_to(&self, tag: NodeTag) -> bool;

    fn try_match(&self, node: &Node, cx: &MatchContext<'_>) -> MatchResult;
}
