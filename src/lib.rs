//! This crate exposes an unbalanced Binary Search Tree of keys, [`OrderedTree`], and a key/value
//! map layered on top of it, [`OrderedMap`].
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert and find stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of value (the value that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    value greater than its own value.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! The benefits of these invariants are many. For instance, searching for
//! values in the tree takes `O(height)` (where `height` is the number of nodes
//! on the longest path from the root `Node` to a leaf `Node`). BSTs also naturally
//! support sorted iteration by visiting the left subtree, then the subtree root,
//! then the right subtree.
//!
//! The trees in this crate never rebalance, so the height is entirely decided by
//! insertion order and is exposed through [`OrderedTree::height`]. Keys can be
//! changed in place through a [`CursorMut`], which can break the invariants above;
//! [`OrderedTree::check_sorting_invariant`] re-checks them from scratch.
//!
//! ## Ordering
//!
//! Both containers are ordered by a [`compare::Compare`] implementation. By default
//! that is [`compare::Natural`], the key type's own [`Ord`].

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod error;
pub mod iter;
pub mod map;
pub mod tree;

pub use error::InvariantError;
pub use iter::{Cursor, CursorMut};
pub use map::OrderedMap;
pub use tree::OrderedTree;
