//! The matcher families.
//!
//! Each family is a struct implementing `Matcher`, built once from its
//! option record and shared read-only by every unit the driver rewrites.
//!
//! # Families
//!
//! 1. **`NullGuardMatcher`** (method): leading null guards become
//!    annotations on the parameters they check
//! 2. **`FallthroughMatcher`** (switch): open case groups get a `break;`
//! 3. **`RedundantCastMatcher`** (cast): casts the context already implies
//! 4. **`TryFinallyToScopedMatcher`** (block, case): close-in-finally
//!    becomes try-with-resources
//! 5. **`InlineTempMatcher`** (block, case): `T x = e; return x;`
//! 6. **`UnusedBindingMatcher`** (block, case, class): unread locals and
//!    unreferenced private parameters
//!
//! Families sharing a node kind are ordered by priority: the block-level
//! conversions run before unused-binding removal, which would otherwise
//! see their temporaries as dead stores.

mod fallthrough;
mod inline_temp;
mod null_guard;
mod redundant_cast;
mod try_finally;
mod unused_binding;

pub use fallthrough::FallthroughMatcher;
pub use inline_temp::InlineTempMatcher;
pub use null_guard::NullGuardMatcher;
pub use redundant_cast::RedundantCastMatcher;
pub use try_finally::TryFinallyToScopedMatcher;
pub use unused_binding::UnusedBindingMatcher;

use regex::Regex;

use crate::config::{parse_patterns, RewriteConfig};
use crate::matcher::Matcher;
use crate::ConfigError;

/// Names of every built-in matcher, in registration order.
pub const NAMES: &[&str] = &[
    NullGuardMatcher::NAME,
    FallthroughMatcher::NAME,
    RedundantCastMatcher::NAME,
    TryFinallyToScopedMatcher::NAME,
    InlineTempMatcher::NAME,
    UnusedBindingMatcher::NAME,
];

/// Build the enabled built-in matchers, in registration order.
pub(crate) fn build(config: &RewriteConfig) -> Result<Vec<Box<dyn Matcher>>, ConfigError> {
    if let Some(unknown) = config
        .disabled
        .iter()
        .find(|name| !NAMES.contains(&name.as_str()))
    {
        return Err(ConfigError::UnknownMatcher(unknown.clone()));
    }
    let enabled = |name: &str| !config.disabled.iter().any(|d| d == name);

    let mut matchers: Vec<Box<dyn Matcher>> = Vec::with_capacity(NAMES.len());
    if enabled(NullGuardMatcher::NAME) {
        let checks = parse_patterns(
            "null_guard.additional_null_checking_methods",
            &config.null_guard.additional_null_checking_methods,
        )?;
        matchers.push(Box::new(NullGuardMatcher::new(
            &config.null_guard.annotation,
            checks,
        )));
    }
    if enabled(FallthroughMatcher::NAME) {
        let marker = Regex::new(&config.fallthrough.marker_pattern).map_err(|source| {
            ConfigError::Regex {
                option: "fallthrough.marker_pattern",
                source,
            }
        })?;
        matchers.push(Box::new(FallthroughMatcher::new(
            marker,
            config.fallthrough.check_last_case_group,
        )));
    }
    if enabled(RedundantCastMatcher::NAME) {
        matchers.push(Box::new(RedundantCastMatcher::new()));
    }
    if enabled(TryFinallyToScopedMatcher::NAME) {
        matchers.push(Box::new(TryFinallyToScopedMatcher::new()));
    }
    if enabled(InlineTempMatcher::NAME) {
        matchers.push(Box::new(InlineTempMatcher::new()));
    }
    if enabled(UnusedBindingMatcher::NAME) {
        matchers.push(Box::new(UnusedBindingMatcher::new(
            &config.unused_binding.ignored_names,
            config.unused_binding.remove_side_effecting_initializers,
        )));
    }
    Ok(matchers)
}
