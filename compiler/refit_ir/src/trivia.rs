//! Source trivia: whitespace and comments attached to a node.
//!
//! Trivia is preserved independently of a node's semantic content. When a
//! rewrite removes or merges statements, the comments of the removed node
//! are moved onto a surviving node in their original relative order.

use smallvec::SmallVec;

use super::Name;

/// The syntactic form of a comment.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CommentKind {
    /// `// text`
    Line,
    /// `/* text */`
    Block,
    /// `/** text */`
    Doc,
}

/// A single source comment, without its delimiters.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Comment {
    pub text: Name,
    pub kind: CommentKind,
}

impl Comment {
    pub fn new(text: &str, kind: CommentKind) -> Self {
        Comment {
            text: Name::new(text),
            kind,
        }
    }

    pub fn line(text: &str) -> Self {
        Comment::new(text, CommentKind::Line)
    }

    pub fn block(text: &str) -> Self {
        Comment::new(text, CommentKind::Block)
    }
}

type Comments = SmallVec<[Comment; 2]>;

/// Whitespace and comments surrounding a node.
///
/// `whitespace` is the indentation/newlines preceding the node; layout
/// policy belongs to the external formatter, so the engine only ever moves
/// it along with the node it belongs to.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Trivia {
    pub whitespace: Name,
    pub leading: Comments,
    pub trailing: Comments,
}

impl Trivia {
    pub fn new() -> Self {
        Trivia::default()
    }

    pub fn with_leading(mut self, comment: Comment) -> Self {
        self.leading.push(comment);
        self
    }

    pub fn with_trailing(mut self, comment: Comment) -> Self {
        self.trailing.push(comment);
        self
    }

    pub fn has_comments(&self) -> bool {
        !self.leading.is_empty() || !self.trailing.is_empty()
    }

    /// All comments, leading before trailing.
    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.leading.iter().chain(self.trailing.iter())
    }

    /// Trivia for a survivor that takes the place of `removed`, which came
    /// first in source order.
    ///
    /// The survivor inherits the removed node's whitespace and all of its
    /// comments ahead of its own leading comments.
    pub fn merged_before(removed: &Trivia, survivor: &Trivia) -> Trivia {
        let mut leading = Comments::new();
        leading.extend(removed.comments().cloned());
        leading.extend(survivor.leading.iter().cloned());
        let whitespace = if removed.whitespace.is_empty() {
            survivor.whitespace.clone()
        } else {
            removed.whitespace.clone()
        };
        Trivia {
            whitespace,
            leading,
            trailing: survivor.trailing.clone(),
        }
    }

    /// Trivia for a survivor absorbing `removed`, which came after it in
    /// source order. The removed comments become trailing comments.
    pub fn merged_after(survivor: &Trivia, removed: &Trivia) -> Trivia {
        let mut trailing = survivor.trailing.clone();
        trailing.extend(removed.comments().cloned());
        Trivia {
            whitespace: survivor.whitespace.clone(),
            leading: survivor.leading.clone(),
            trailing,
        }
    }
}
