//! Cursors and iterators over an [`OrderedTree`](crate::OrderedTree).
//!
//! A [`Cursor`] is a position in a tree: either a node or the end. The end sits between the
//! largest and the smallest key, so moving forward from the largest key reaches the end and
//! moving forward again wraps around to the smallest key. Moving backward works the same way in
//! reverse.
//!
//! Cursors compare equal when they point at the same node, not when they point at equal keys.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::OrderedTree;
//!
//! let tree: OrderedTree<_> = [4, 2, 6].into_iter().collect();
//!
//! let mut cursor = tree.begin();
//! let mut seen: Vec<&i32> = Vec::new();
//! while cursor != tree.end() {
//!     seen.extend(cursor.get());
//!     cursor.move_next();
//! }
//! assert_eq!(seen, [&2, &4, &6]);
//! ```

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::tree::Link;

/// A read-only position in a tree.
pub struct Cursor<'a, K> {
    pub(crate) current: Link<K>,
    root: Link<K>,
    marker: PhantomData<&'a K>,
}

impl<K> Clone for Cursor<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K> Copy for Cursor<'_, K> {}

impl<K> PartialEq for Cursor<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}
impl<K> Eq for Cursor<'_, K> {}

impl<K> fmt::Debug for Cursor<'_, K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

impl<'a, K> Cursor<'a, K> {
    pub(crate) fn new(current: Link<K>, root: Link<K>) -> Self {
        Self {
            current,
            root,
            marker: PhantomData,
        }
    }

    /// The key at this position, or `None` at the end.
    pub fn get(&self) -> Option<&'a K> {
        // SAFETY: The cursor borrows its tree for `'a`, so no `&mut` into the tree can exist and
        // every node stays alive.
        unsafe { self.current.key() }
    }

    /// Whether this cursor is at the end.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Moves to the next larger key. Moves to the end from the largest key, and to the smallest
    /// key from the end.
    pub fn move_next(&mut self) {
        self.current = if self.current.is_none() {
            self.root.first()
        } else {
            self.current.next()
        };
    }

    /// Moves to the next smaller key. Moves to the end from the smallest key, and to the largest
    /// key from the end.
    pub fn move_prev(&mut self) {
        self.current = if self.current.is_none() {
            self.root.last()
        } else {
            self.current.prev()
        };
    }

    /// The key [`move_next`](Self::move_next) would move to, if any.
    pub fn peek_next(&self) -> Option<&'a K> {
        let mut next = *self;
        next.move_next();
        next.get()
    }

    /// The key [`move_prev`](Self::move_prev) would move to, if any.
    pub fn peek_prev(&self) -> Option<&'a K> {
        let mut prev = *self;
        prev.move_prev();
        prev.get()
    }
}

/// A position in a tree through which the key can be changed.
///
/// Changing a key can break the tree's ordering; nothing checks that it doesn't. See
/// [`OrderedTree::check_sorting_invariant`](crate::OrderedTree::check_sorting_invariant).
pub struct CursorMut<'a, K> {
    current: Link<K>,
    root: Link<K>,
    marker: PhantomData<&'a mut K>,
}

impl<K> fmt::Debug for CursorMut<'_, K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.get()).finish()
    }
}

impl<'a, K> CursorMut<'a, K> {
    pub(crate) fn new(current: Link<K>, root: Link<K>) -> Self {
        Self {
            current,
            root,
            marker: PhantomData,
        }
    }

    /// The key at this position, or `None` at the end.
    pub fn get(&self) -> Option<&K> {
        // SAFETY: The cursor mutably borrows its tree for `'a` and hands out keys for no longer
        // than it is itself borrowed, so this shared reference can't alias a `&mut` to the key.
        unsafe { self.current.key() }
    }

    /// A mutable reference to the key at this position, or `None` at the end.
    pub fn get_mut(&mut self) -> Option<&mut K> {
        // SAFETY: As in `get`, and `&mut self` rules out any other reference from this cursor.
        unsafe { self.current.key_mut() }
    }

    /// Turns the cursor into a mutable reference to its key that lives as long as the borrow of
    /// the tree.
    pub fn into_mut(self) -> Option<&'a mut K> {
        // SAFETY: The cursor is consumed, so the returned reference is the only one to this key
        // for the rest of `'a`.
        unsafe { self.current.key_mut() }
    }

    /// A read-only view of this position.
    pub fn as_cursor(&self) -> Cursor<'_, K> {
        Cursor::new(self.current, self.root)
    }

    /// Whether this cursor is at the end.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Moves to the next larger key, wrapping through the end like [`Cursor::move_next`].
    pub fn move_next(&mut self) {
        self.current = if self.current.is_none() {
            self.root.first()
        } else {
            self.current.next()
        };
    }

    /// Moves to the next smaller key, wrapping through the end like [`Cursor::move_prev`].
    pub fn move_prev(&mut self) {
        self.current = if self.current.is_none() {
            self.root.last()
        } else {
            self.current.prev()
        };
    }
}

/// An iterator over a tree's keys in ascending order.
///
/// Created by [`OrderedTree::iter`](crate::OrderedTree::iter).
pub struct Iter<'a, K> {
    front: Link<K>,
    back: Link<K>,
    remaining: usize,
    marker: PhantomData<&'a K>,
}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(front: Link<K>, back: Link<K>, remaining: usize) -> Self {
        Self {
            front,
            back,
            remaining,
            marker: PhantomData,
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: The iterator borrows its tree for `'a`.
        let key = unsafe { self.front.key() }?;
        self.front = self.front.next();
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> DoubleEndedIterator for Iter<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: The iterator borrows its tree for `'a`.
        let key = unsafe { self.back.key() }?;
        self.back = self.back.prev();
        self.remaining -= 1;
        Some(key)
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
impl<K> FusedIterator for Iter<'_, K> {}

/// An iterator over mutable references to a tree's keys in ascending order.
///
/// Created by [`OrderedTree::iter_mut`](crate::OrderedTree::iter_mut).
pub struct IterMut<'a, K> {
    front: Link<K>,
    back: Link<K>,
    remaining: usize,
    marker: PhantomData<&'a mut K>,
}

impl<'a, K> IterMut<'a, K> {
    pub(crate) fn new(front: Link<K>, back: Link<K>, remaining: usize) -> Self {
        Self {
            front,
            back,
            remaining,
            marker: PhantomData,
        }
    }
}

impl<'a, K> Iterator for IterMut<'a, K> {
    type Item = &'a mut K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: The iterator mutably borrows its tree for `'a`. `remaining` stops the front and
        // back from crossing, so each key is handed out once. Moving to the next node only reads
        // link fields, never the keys already handed out.
        let key = unsafe { self.front.key_mut() }?;
        self.front = self.front.next();
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> DoubleEndedIterator for IterMut<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: See `next`.
        let key = unsafe { self.back.key_mut() }?;
        self.back = self.back.prev();
        self.remaining -= 1;
        Some(key)
    }
}

impl<K> ExactSizeIterator for IterMut<'_, K> {}
impl<K> FusedIterator for IterMut<'_, K> {}
