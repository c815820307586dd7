//! Errors reported when a tree's structure no longer matches its ordering.
//!
//! Nothing in this crate fails during normal use. These errors only come out of
//! [`OrderedTree::validate`](crate::OrderedTree::validate), which re-derives the ordering of a
//! tree from scratch. Trees can only get into a broken state when a key is changed in place
//! through a [`CursorMut`](crate::CursorMut) or an [`IterMut`](crate::iter::IterMut).

use thiserror::Error;

/// The first problem found while walking a tree to check its ordering.
///
/// Depths count nodes from the root, so the root itself is at depth 1 (matching
/// [`OrderedTree::height`](crate::OrderedTree::height)).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantError {
    /// A key in the left subtree of the node at `depth` does not compare less than it.
    #[error("left subtree of the node at depth {depth} holds a key that is not less than it")]
    LeftNotLess {
        /// Depth of the node whose left subtree is out of order.
        depth: usize,
    },
    /// A key in the right subtree of the node at `depth` does not compare greater than it.
    #[error("right subtree of the node at depth {depth} holds a key that is not greater than it")]
    RightNotGreater {
        /// Depth of the node whose right subtree is out of order.
        depth: usize,
    },
    /// The child of the node at `depth` has a parent pointer to some other node.
    #[error("child of the node at depth {depth} does not point back at it")]
    ParentMismatch {
        /// Depth of the parent whose child has the stale back-reference.
        depth: usize,
    },
    /// Walking the tree found a different number of nodes than the tree has recorded.
    #[error("tree records {recorded} nodes but {counted} are reachable")]
    LenMismatch {
        /// Nodes reachable from the root.
        counted: usize,
        /// The tree's own count.
        recorded: usize,
    },
}

/// A `Result` whose error is an [`InvariantError`].
pub type Result<T> = std::result::Result<T, InvariantError>;
