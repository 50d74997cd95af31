//! Refit IR - persistent syntax tree model.
//!
//! This crate contains the minimal tree abstraction the rewrite engine needs:
//! - `Name` for cheap-clone identifiers
//! - `Node` handles onto immutable, structurally shared node data
//! - `Trivia` (whitespace and comments) carried independently of semantics
//! - `Type` and `TypeTable` for the static types supplied by the front end
//! - `Ancestors`, an immutable ancestor path used instead of a mutable cursor
//!
//! # Design Philosophy
//!
//! - **Persistent**: a rewrite never mutates a node; it builds a new node and
//!   shares every unedited child by reference.
//! - **Identity by id**: every node carries a `NodeId`. Declarations are
//!   compared by id, never by name.
//! - **Equality is structural**: `Node == Node` ignores ids and trivia.

mod ancestors;
pub mod build;
mod name;
mod node;
mod sketch;
mod trivia;
mod types;
mod unit;
pub mod visitor;

pub use ancestors::Ancestors;
pub use name::Name;
pub use node::{
    AssignOp, BinaryOp, Children, Descendants, Literal, Modifiers, Node, NodeId, NodeKind, NodeTag,
    UnaryOp,
};
pub use sketch::sketch;
pub use trivia::{Comment, CommentKind, Trivia};
pub use types::{ClassInfo, MethodSig, Primitive, Type, TypeTable, AUTO_CLOSEABLE, OBJECT};
pub use unit::SourceUnit;
