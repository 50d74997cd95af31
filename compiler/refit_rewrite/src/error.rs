//! Configuration errors.
//!
//! These are the only errors the engine reports. They surface while a
//! `Driver` is being built; once built, a driver never fails. Match-time
//! problems degrade to "no rewrite".

use refit_analysis::PatternError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid method pattern in `{option}`")]
    Pattern {
        option: &'static str,
        #[source]
        source: PatternError,
    },
    #[error("invalid regular expression in `{option}`")]
    Regex {
        option: &'static str,
        #[source]
        source: regex::Error,
    },
    #[error("`{0}` is not a known matcher")]
    UnknownMatcher(String),
    #[error("`max_passes` must be at least 1")]
    NoPasses,
}
