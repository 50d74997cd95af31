//! Error types for analysis construction and structural preconditions.

use thiserror::Error;

/// Scope lookups that cannot even start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// The node has no scope-introducing ancestor (a root or detached node).
    #[error("no enclosing scope for node #{0}")]
    NoScopeFound(u32),
}

/// A method signature pattern that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("method pattern `{0}` is missing a declaring type or method name")]
    MissingParts(String),
    #[error("method pattern `{0}` is missing its argument list")]
    MissingArguments(String),
    #[error("method pattern `{pattern}` has an invalid argument list: {reason}")]
    BadArguments {
        pattern: String,
        reason: &'static str,
    },
}
