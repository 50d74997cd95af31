#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use super::{parse_patterns, RewriteConfig, DEFAULT_MAX_PASSES};
use crate::ConfigError;

#[test]
fn defaults() {
    let config = RewriteConfig::default();
    assert_eq!(config.max_passes, DEFAULT_MAX_PASSES);
    assert!(config.disabled.is_empty());
    assert!(!config.fallthrough.check_last_case_group);
    assert!(!config.unused_binding.remove_side_effecting_initializers);
    assert_eq!(config.unused_binding.ignored_names, vec!["ignored", "_"]);
}

#[test]
fn only_disables_everything_else() {
    let config = RewriteConfig::only(&["inline-temp"]);
    assert!(!config.disabled.iter().any(|n| n == "inline-temp"));
    assert!(config.disabled.iter().any(|n| n == "fallthrough"));
    assert_eq!(config.disabled.len(), crate::matchers::NAMES.len() - 1);
}

#[test]
fn bad_patterns_name_their_option() {
    let err = parse_patterns("side_effects.pure_methods", &["length()".to_string()]);
    match err {
        Err(ConfigError::Pattern { option, .. }) => assert_eq!(option, "side_effects.pure_methods"),
        other => panic!("unexpected {other:?}"),
    }
}

#[cfg(feature = "serde")]
#[test]
fn partial_records_fill_in_defaults() {
    let config: RewriteConfig = serde_json::from_str(
        r#"{ "max_passes": 3, "fallthrough": { "check_last_case_group": true } }"#,
    )
    .unwrap();
    assert_eq!(config.max_passes, 3);
    assert!(config.fallthrough.check_last_case_group);
    assert_eq!(
        config.fallthrough.marker_pattern,
        super::DEFAULT_FALLTHROUGH_MARKER
    );
}
