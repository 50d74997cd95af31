//! Pattern-matching tree rewrites driven to a fixed point.
//!
//! A [`Driver`] holds a registry of [`Matcher`]s, each recognising one
//! code idiom, and rewrites a [`SourceUnit`](refit_ir::SourceUnit) until no
//! matcher finds anything left to do:
//!
//! ```text
//! RewriteConfig ─► Driver::from_config ─► Driver::run(unit) ─► RewriteOutcome
//!                                             │
//!                         matchers ◄──────────┤ post-order, priority order
//!                         RewriteSession ◄────┘ deferred import edits
//! ```
//!
//! Matchers never mutate: they return a replacement for the node they were
//! offered, and consult `refit_analysis` before doing so. Anything unsafe
//! or ambiguous is simply not rewritten.
//!
//! # Tracing
//!
//! Call [`init_tracing`] and set `RUST_LOG=refit_rewrite=debug` to see each
//! applied rewrite, or `=trace` for rejected candidates and driver phases.
//! `REFIT_LOG_TREE=1` switches to an indented span tree.

mod config;
mod driver;
mod edit;
mod error;
mod matcher;
pub mod matchers;
mod session;

#[cfg(test)]
mod test_helpers;

use std::sync::Once;

pub use config::{
    FallthroughOptions, NullGuardOptions, RewriteConfig, SideEffectOptions, UnusedBindingOptions,
    DEFAULT_FALLTHROUGH_MARKER, DEFAULT_MAX_PASSES, DEFAULT_NON_NULL_ANNOTATION,
};
pub use driver::{AppliedRewrite, Diagnostic, Driver, RewriteOutcome};
pub use error::ConfigError;
pub use matcher::{DeferredAction, MatchContext, MatchResult, Matcher, Rewrite, SideTable};
pub use session::RewriteSession;

static TRACING_INIT: Once = Once::new();

/// Install a global tracing subscriber.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        let registry = tracing_subscriber::registry().with(filter);
        // A host may already have installed a subscriber.
        let _ = if std::env::var_os("REFIT_LOG_TREE").is_some() {
            registry
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .try_init()
        } else {
            registry
                .with(fmt::layer().with_target(true).with_level(true))
                .try_init()
        };
    });
}
