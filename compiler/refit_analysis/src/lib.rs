//! Analyses the rewrite matchers consult before committing a rewrite.
//!
//! - **Scope resolution** ([`scope`]): enclosing scopes, declaration-order
//!   aware name resolution, shadowing and reference search. Identity is
//!   always the declaring node's `NodeId`, never the name string.
//! - **Safety gate** ([`SafetyGate`]): side-effect analysis, overload
//!   ambiguity, and liveness. Every query is pure; a `true` answer is an
//!   unconditional veto for the asking matcher.
//! - **Method patterns** ([`MethodPattern`]): signature patterns used for
//!   allow-lists such as "pure accessors" or "null-checking methods".
//!
//! # Pipeline Position
//!
//! ```text
//! front end → refit_ir tree → **refit_analysis** ← refit_rewrite matchers
//! ```

mod error;
mod method_pattern;
mod safety;
pub mod scope;

#[cfg(test)]
mod test_helpers;

pub use error::{PatternError, ScopeError};
pub use method_pattern::MethodPattern;
pub use safety::SafetyGate;
pub use scope::{
    enclosing_scope, find_references, is_safe_rename, is_shadowed_below, resolve, resolve_at,
    statement_scope, Access, Binding, BindingKind, Reference, References, Scope,
};
