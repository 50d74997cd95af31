//! The unit of work handed to and returned from the engine.

use std::sync::Arc;

use super::{Node, TypeTable};

/// One compilation unit: its tree plus the types visible to it.
///
/// The type table is read-only and shared; rewriting only ever replaces
/// `root`.
#[derive(Clone, Debug)]
pub struct SourceUnit {
    pub root: Node,
    pub types: Arc<TypeTable>,
}

impl SourceUnit {
    pub fn new(root: Node, types: TypeTable) -> Self {
        SourceUnit {
            root,
            types: Arc::new(types),
        }
    }

    #[must_use]
    pub fn with_root(&self, root: Node) -> Self {
        SourceUnit {
            root,
            types: Arc::clone(&self.types),
        }
    }
}
