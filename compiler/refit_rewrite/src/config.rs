//! Rewrite configuration.
//!
//! Options are plain records handed in by the host. Nothing here is
//! validated until `Driver::from_config` compiles them into matchers, so a
//! host can build, merge and (with the `serde` feature) load them freely.

use refit_analysis::MethodPattern;

use crate::ConfigError;

/// Default cap on fixed-point passes per unit.
pub const DEFAULT_MAX_PASSES: usize = 8;

/// Default pattern for comments that mark an intentional fall-through.
pub const DEFAULT_FALLTHROUGH_MARKER: &str = r"(?i)falls?\s?-?\s?thr(ough|u)";

/// Default annotation placed on parameters that must not be null.
pub const DEFAULT_NON_NULL_ANNOTATION: &str = "org.jspecify.annotations.NonNull";

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewriteConfig {
    /// Maximum number of full passes over one unit.
    pub max_passes: usize,
    /// Names of matchers that are not registered.
    pub disabled: Vec<String>,
    pub null_guard: NullGuardOptions,
    pub fallthrough: FallthroughOptions,
    pub unused_binding: UnusedBindingOptions,
    pub side_effects: SideEffectOptions,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        RewriteConfig {
            max_passes: DEFAULT_MAX_PASSES,
            disabled: Vec::new(),
            null_guard: NullGuardOptions::default(),
            fallthrough: FallthroughOptions::default(),
            unused_binding: UnusedBindingOptions::default(),
            side_effects: SideEffectOptions::default(),
        }
    }
}

impl RewriteConfig {
    /// A config with only the named matchers enabled.
    pub fn only(matchers: &[&str]) -> Self {
        RewriteConfig {
            disabled: crate::matchers::NAMES
                .iter()
                .filter(|name| !matchers.contains(name))
                .map(|name| (*name).to_string())
                .collect(),
            ..RewriteConfig::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NullGuardOptions {
    /// Fully qualified annotation added to required parameters.
    pub annotation: String,
    /// Extra method patterns that throw when their first argument is null.
    pub additional_null_checking_methods: Vec<String>,
}

impl Default for NullGuardOptions {
    fn default() -> Self {
        NullGuardOptions {
            annotation: DEFAULT_NON_NULL_ANNOTATION.to_string(),
            additional_null_checking_methods: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FallthroughOptions {
    /// Comments matching this pattern mark an intentional fall-through.
    pub marker_pattern: String,
    /// Also terminate the last case group of a switch.
    pub check_last_case_group: bool,
}

impl Default for FallthroughOptions {
    fn default() -> Self {
        FallthroughOptions {
            marker_pattern: DEFAULT_FALLTHROUGH_MARKER.to_string(),
            check_last_case_group: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UnusedBindingOptions {
    /// Bindings with these names are never removed.
    pub ignored_names: Vec<String>,
    /// Remove unused locals even when their initializer has side effects,
    /// keeping the initializer as an expression statement.
    pub remove_side_effecting_initializers: bool,
}

impl Default for UnusedBindingOptions {
    fn default() -> Self {
        UnusedBindingOptions {
            ignored_names: vec!["ignored".to_string(), "_".to_string()],
            remove_side_effecting_initializers: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SideEffectOptions {
    /// Method patterns treated as side-effect free, on top of the
    /// built-in accessors.
    pub pure_methods: Vec<String>,
}

/// Parse every pattern of one option.
pub(crate) fn parse_patterns(
    option: &'static str,
    patterns: &[String],
) -> Result<Vec<MethodPattern>, ConfigError> {
    patterns
        .iter()
        .map(|p| MethodPattern::parse(p).map_err(|source| ConfigError::Pattern { option, source }))
        .collect()
}

#[cfg(test)]
mod tests;
