//! An unbalanced BST over keys alone. Each node keeps a pointer back to its parent so cursors can
//! walk to a node's successor or predecessor without a stack.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::OrderedTree;
//!
//! let mut tree = OrderedTree::new();
//!
//! // Nothing in here yet.
//! assert!(tree.find(&1).is_end());
//!
//! tree.insert(1);
//! assert_eq!(tree.find(&1).get(), Some(&1));
//!
//! // Inserting an existing key leaves the tree alone.
//! tree.insert(1);
//! assert_eq!(tree.len(), 1);
//!
//! // Keys come back out in order.
//! tree.insert(0);
//! let mut sink = String::new();
//! tree.traverse_inorder(&mut sink).unwrap();
//! assert_eq!(sink, "0 1 ");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use compare::{Compare, Natural};

use crate::error::{InvariantError, Result};
use crate::iter::{Cursor, CursorMut, Iter, IterMut};

/// A Binary Search Tree of unique keys, ordered by the comparator `C`.
///
/// The tree never rebalances itself, so its [`height`](Self::height) depends on the order keys
/// were inserted in. Inserting keys in ascending order builds a chain as tall as the tree is
/// long.
pub struct OrderedTree<K, C = Natural<K>> {
    // Nodes are heap allocated and never move, so the parent pointers of the root's children stay
    // valid when the `OrderedTree` itself is moved.
    root: Link<K>,
    len: usize,
    cmp: C,
    marker: PhantomData<Box<Node<K>>>,
}

impl<K> Default for OrderedTree<K>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> Drop for OrderedTree<K, C> {
    fn drop(&mut self) {
        let mut stack: Vec<_> = self.root.take().0.into_iter().collect();
        while let Some(node) = stack.pop() {
            // SAFETY: Every node was allocated with `Box::new` in `Node::new_leaked` and is owned
            // by exactly one link (its parent's child link or the tree's root). We took that link
            // out of the tree before pushing the node here, so each node is freed once.
            let node = unsafe { Box::from_raw(node.as_ptr()) };
            stack.extend(node.left.0);
            stack.extend(node.right.0);
        }
    }
}

impl<K, C> Clone for OrderedTree<K, C>
where
    K: Clone,
    C: Clone,
{
    fn clone(&self) -> Self {
        let mut copy = Self::with_cmp(self.cmp.clone());
        let Some(root) = self.node(self.root) else {
            return copy;
        };

        // Each new node is attached to the copy before the next key is cloned, so a panicking
        // `K::clone` drops the half-built copy instead of leaking it.
        copy.root = Node::new_leaked(root.key.clone(), Link::NONE);
        let mut stack = vec![(self.root, copy.root)];
        while let Some((source, target)) = stack.pop() {
            let Some(source) = self.node(source) else {
                continue;
            };
            if let Some(left) = self.node(source.left) {
                let new_left = Node::new_leaked(left.key.clone(), target);
                if let Some(target) = copy.node_mut(target) {
                    target.left = new_left;
                }
                stack.push((source.left, new_left));
            }
            if let Some(right) = self.node(source.right) {
                let new_right = Node::new_leaked(right.key.clone(), target);
                if let Some(target) = copy.node_mut(target) {
                    target.right = new_right;
                }
                stack.push((source.right, new_right));
            }
        }
        copy.len = self.len;

        log::trace!("cloned tree of {} nodes", copy.len);
        copy
    }
}

impl<K, C> fmt::Debug for OrderedTree<K, C>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Trees are equal when they hold equal keys, whatever their shapes.
impl<K, C> PartialEq for OrderedTree<K, C>
where
    K: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, C> Eq for OrderedTree<K, C> where K: Eq {}

impl<K> FromIterator<K> for OrderedTree<K>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K, C> Extend<K> for OrderedTree<K, C>
where
    C: Compare<K>,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.attach(key);
        }
    }
}

impl<'a, K, C> IntoIterator for &'a OrderedTree<K, C> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, C> IntoIterator for &'a mut OrderedTree<K, C> {
    type Item = &'a mut K;
    type IntoIter = IterMut<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K> OrderedTree<K>
where
    K: Ord,
{
    /// Generate a new, empty `OrderedTree` using the keys' natural order.
    pub fn new() -> Self {
        Self::with_cmp(compare::natural())
    }
}

impl<K, C> OrderedTree<K, C> {
    /// Generate a new, empty `OrderedTree` ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{natural, Compare};
    /// use ordered_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::with_cmp(natural().rev());
    /// tree.extend([1, 3, 2]);
    ///
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    pub fn with_cmp(cmp: C) -> Self {
        Self {
            root: Link::NONE,
            len: 0,
            cmp,
            marker: PhantomData,
        }
    }

    /// The comparator ordering this tree.
    pub fn cmp(&self) -> &C {
        &self.cmp
    }

    /// The number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of nodes on the longest path from the root down to a leaf. An empty tree has a
    /// height of 0 and a single node has a height of 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::OrderedTree;
    ///
    /// let balanced: OrderedTree<_> = [2, 1, 3].into_iter().collect();
    /// assert_eq!(balanced.height(), 2);
    ///
    /// let chain: OrderedTree<_> = [1, 2, 3].into_iter().collect();
    /// assert_eq!(chain.height(), 3);
    /// ```
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = vec![(self.root, 1)];
        while let Some((link, depth)) = stack.pop() {
            if let Some(node) = self.node(link) {
                height = height.max(depth);
                stack.push((node.left, depth + 1));
                stack.push((node.right, depth + 1));
            }
        }
        height
    }

    /// A cursor at the smallest key, or at the end when the tree is empty.
    pub fn begin(&self) -> Cursor<'_, K> {
        self.cursor_at(self.root.first())
    }

    /// A mutable cursor at the smallest key, or at the end when the tree is empty.
    pub fn begin_mut(&mut self) -> CursorMut<'_, K> {
        self.cursor_mut_at(self.root.first())
    }

    /// A cursor one past the largest key. It never points at a key.
    pub fn end(&self) -> Cursor<'_, K> {
        self.cursor_at(Link::NONE)
    }

    /// A cursor at the smallest key, or at the end when the tree is empty.
    pub fn min_element(&self) -> Cursor<'_, K> {
        self.begin()
    }

    /// A cursor at the largest key, or at the end when the tree is empty.
    pub fn max_element(&self) -> Cursor<'_, K> {
        self.cursor_at(self.root.last())
    }

    /// An iterator over the keys in ascending order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self.root.first(), self.root.last(), self.len)
    }

    /// An iterator over mutable references to the keys in ascending order.
    ///
    /// Nothing stops a key from being changed into one that breaks the tree's ordering. Searches
    /// on such a tree give unspecified (but safe) answers until the key is changed back; use
    /// [`check_sorting_invariant`](Self::check_sorting_invariant) to detect it.
    pub fn iter_mut(&mut self) -> IterMut<'_, K> {
        IterMut::new(self.root.first(), self.root.last(), self.len)
    }

    /// Writes every key in ascending order to `sink`, each followed by a single space.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::OrderedTree;
    ///
    /// let tree: OrderedTree<_> = [2, 1, 3].into_iter().collect();
    /// let mut sink = String::new();
    /// tree.traverse_inorder(&mut sink).unwrap();
    ///
    /// assert_eq!(sink, "1 2 3 ");
    /// ```
    pub fn traverse_inorder<W>(&self, sink: &mut W) -> fmt::Result
    where
        K: fmt::Display,
        W: fmt::Write,
    {
        for key in self {
            write!(sink, "{} ", key)?;
        }
        Ok(())
    }

    /// Writes every key to `sink` with each node before its left subtree and its left subtree
    /// before its right subtree. Each key is followed by a single space.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::OrderedTree;
    ///
    /// let tree: OrderedTree<_> = [2, 1, 3].into_iter().collect();
    /// let mut sink = String::new();
    /// tree.traverse_preorder(&mut sink).unwrap();
    ///
    /// assert_eq!(sink, "2 1 3 ");
    /// ```
    pub fn traverse_preorder<W>(&self, sink: &mut W) -> fmt::Result
    where
        K: fmt::Display,
        W: fmt::Write,
    {
        let mut stack = vec![self.root];
        while let Some(link) = stack.pop() {
            if let Some(node) = self.node(link) {
                write!(sink, "{} ", node.key)?;
                stack.push(node.right);
                stack.push(node.left);
            }
        }
        Ok(())
    }

    /// Descends from the root following `probe`, which compares the sought key against a node's
    /// key. Returns the node `probe` reports as `Equal`, if any.
    pub(crate) fn locate<F>(&self, mut probe: F) -> Link<K>
    where
        F: FnMut(&K) -> Ordering,
    {
        let mut current = self.root;
        while let Some(node) = self.node(current) {
            current = match probe(&node.key) {
                Ordering::Less => node.left,
                Ordering::Equal => return current,
                Ordering::Greater => node.right,
            };
        }
        Link::NONE
    }

    /// Like [`locate`](Self::locate) but finds the smallest node that compares greater than the
    /// sought key.
    pub(crate) fn locate_min_greater<F>(&self, mut probe: F) -> Link<K>
    where
        F: FnMut(&K) -> Ordering,
    {
        let mut best = Link::NONE;
        let mut current = self.root;
        while let Some(node) = self.node(current) {
            current = match probe(&node.key) {
                // This node is bigger than the sought key. Remember it and look for a smaller
                // candidate on the left.
                Ordering::Less => {
                    best = current;
                    node.left
                }
                Ordering::Equal | Ordering::Greater => node.right,
            };
        }
        best
    }

    pub(crate) fn cursor_at(&self, link: Link<K>) -> Cursor<'_, K> {
        Cursor::new(link, self.root)
    }

    pub(crate) fn cursor_mut_at(&mut self, link: Link<K>) -> CursorMut<'_, K> {
        CursorMut::new(link, self.root)
    }

    fn node(&self, link: Link<K>) -> Option<&Node<K>> {
        // SAFETY: Every link reachable from `self.root` points at a live node owned by this tree.
        // Because we take `&self` here, no `&mut` to any node of this tree can be alive.
        unsafe { link.as_ref() }
    }

    fn node_mut(&mut self, link: Link<K>) -> Option<&mut Node<K>> {
        // SAFETY: As in `node`, and because we take `&mut self` nothing else borrows the tree.
        unsafe { link.as_mut() }
    }
}

impl<K, C> OrderedTree<K, C>
where
    C: Compare<K>,
{
    /// Inserts `key` into the tree and returns a cursor at it. If an equal key is already in the
    /// tree, nothing changes and the cursor points at the existing key.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    ///
    /// assert_eq!(tree.insert(5).get(), Some(&5));
    /// assert_eq!(tree.insert(5).get(), Some(&5));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> CursorMut<'_, K> {
        let (link, _) = self.attach(key);
        self.cursor_mut_at(link)
    }

    /// A cursor at the key equal to `key`, or at the end if there isn't one.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::OrderedTree;
    ///
    /// let tree: OrderedTree<_> = [1, 2].into_iter().collect();
    ///
    /// assert_eq!(tree.find(&1).get(), Some(&1));
    /// assert!(tree.find(&42) == tree.end());
    /// ```
    pub fn find(&self, key: &K) -> Cursor<'_, K> {
        self.cursor_at(self.locate(|probe| self.cmp.compare(key, probe)))
    }

    /// A mutable cursor at the key equal to `key`, or at the end if there isn't one.
    pub fn find_mut(&mut self, key: &K) -> CursorMut<'_, K> {
        let link = self.locate(|probe| self.cmp.compare(key, probe));
        self.cursor_mut_at(link)
    }

    /// Whether the tree holds a key equal to `key`.
    pub fn contains(&self, key: &K) -> bool {
        !self.find(key).is_end()
    }

    /// A cursor at the smallest key strictly greater than `key`, or at the end if every key is
    /// less than or equal to it. `key` doesn't need to be in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::OrderedTree;
    ///
    /// let tree: OrderedTree<_> = [10, 5, 20].into_iter().collect();
    ///
    /// assert_eq!(tree.min_greater_than(&5).get(), Some(&10));
    /// assert_eq!(tree.min_greater_than(&7).get(), Some(&10));
    /// assert!(tree.min_greater_than(&20).is_end());
    /// ```
    pub fn min_greater_than(&self, key: &K) -> Cursor<'_, K> {
        self.cursor_at(self.locate_min_greater(|probe| self.cmp.compare(key, probe)))
    }

    /// Checks every node against every key below it, without trusting how the tree was built.
    /// Returns the first violation found.
    ///
    /// Keys are only ever out of order after being changed in place through a
    /// [`CursorMut`] or an [`IterMut`].
    pub fn validate(&self) -> Result<()> {
        let result = self.walk_bounds();
        if let Err(err) = &result {
            log::debug!("ordering check failed: {}", err);
        }
        result
    }

    /// Whether every key in every node's left subtree is less than it and every key in its right
    /// subtree is greater. See [`validate`](Self::validate) for the reason when it isn't.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::OrderedTree;
    ///
    /// let mut tree: OrderedTree<_> = [1, 0].into_iter().collect();
    /// assert!(tree.check_sorting_invariant());
    ///
    /// *tree.find_mut(&0).get_mut().unwrap() = 2;
    /// assert!(!tree.check_sorting_invariant());
    /// ```
    pub fn check_sorting_invariant(&self) -> bool {
        self.validate().is_ok()
    }

    /// Walks the tree carrying the tightest bounds imposed by the node's ancestors, along with the
    /// depth of the ancestor that imposed each one.
    fn walk_bounds(&self) -> Result<()> {
        let mut counted = 0;
        let mut stack: Vec<(Link<K>, Option<(&K, usize)>, Option<(&K, usize)>, usize)> =
            vec![(self.root, None, None, 1)];
        while let Some((link, lower, upper, depth)) = stack.pop() {
            let Some(node) = self.node(link) else {
                continue;
            };
            counted += 1;

            if let Some((bound, bound_depth)) = lower {
                if self.cmp.compare(&node.key, bound) != Ordering::Greater {
                    return Err(InvariantError::RightNotGreater { depth: bound_depth });
                }
            }
            if let Some((bound, bound_depth)) = upper {
                if self.cmp.compare(&node.key, bound) != Ordering::Less {
                    return Err(InvariantError::LeftNotLess { depth: bound_depth });
                }
            }

            for child in [node.left, node.right] {
                if let Some(child) = self.node(child) {
                    if child.parent != link {
                        return Err(InvariantError::ParentMismatch { depth });
                    }
                }
            }

            stack.push((node.left, lower, Some((&node.key, depth)), depth + 1));
            stack.push((node.right, Some((&node.key, depth)), upper, depth + 1));
        }

        if counted != self.len {
            return Err(InvariantError::LenMismatch {
                counted,
                recorded: self.len,
            });
        }
        Ok(())
    }

    /// Attaches `key` below the node it belongs under. Returns the node holding the key and
    /// whether it was newly created.
    pub(crate) fn attach(&mut self, key: K) -> (Link<K>, bool) {
        let mut parent = Link::NONE;
        let mut side = Ordering::Equal;
        let mut current = self.root;
        let mut depth = 1;
        while let Some(node) = self.node(current) {
            side = self.cmp.compare(&key, &node.key);
            parent = current;
            current = match side {
                Ordering::Less => node.left,
                Ordering::Equal => return (current, false),
                Ordering::Greater => node.right,
            };
            depth += 1;
        }

        let new = Node::new_leaked(key, parent);
        match self.node_mut(parent) {
            Some(parent) if side == Ordering::Less => parent.left = new,
            Some(parent) => parent.right = new,
            None => self.root = new,
        }
        self.len += 1;
        log::trace!("attached new node at depth {}", depth);

        if cfg!(debug_assertions) {
            if let (Some(parent), Some(new)) = (self.node(parent), self.node(new)) {
                assert_eq!(self.cmp.compare(&new.key, &parent.key), side);
            }
        }

        (new, true)
    }
}

/// A possibly missing pointer to a node. Child links own the node they point at; parent links
/// and links held by cursors and iterators don't.
pub(crate) struct Link<K>(pub(crate) Option<NonNull<Node<K>>>);

impl<K> Clone for Link<K> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K> Copy for Link<K> {}

impl<K> PartialEq for Link<K> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl<K> Eq for Link<K> {}

impl<K> Link<K> {
    pub(crate) const NONE: Self = Link(None);

    pub(crate) fn is_none(self) -> bool {
        self.0.is_none()
    }

    fn take(&mut self) -> Self {
        Link(self.0.take())
    }

    /// # Safety
    ///
    /// The link must be empty or point at a live node, and nothing may hold a `&mut` to that node
    /// for `'a`.
    pub(crate) unsafe fn as_ref<'a>(self) -> Option<&'a Node<K>> {
        self.0.map(|ptr| ptr.as_ref())
    }

    /// # Safety
    ///
    /// The link must be empty or point at a live node, and nothing else may reference that node
    /// for `'a`.
    pub(crate) unsafe fn as_mut<'a>(self) -> Option<&'a mut Node<K>> {
        self.0.map(|mut ptr| ptr.as_mut())
    }

    /// # Safety
    ///
    /// As [`as_ref`](Self::as_ref), except only the key needs to be free of `&mut` borrows.
    pub(crate) unsafe fn key<'a>(self) -> Option<&'a K> {
        self.0.map(|ptr| &(*ptr.as_ptr()).key)
    }

    /// # Safety
    ///
    /// As [`as_mut`](Self::as_mut), except only the key needs to be free of other borrows.
    pub(crate) unsafe fn key_mut<'a>(self) -> Option<&'a mut K> {
        self.0.map(|ptr| &mut (*ptr.as_ptr()).key)
    }

    // The navigation methods below read single link fields through the raw pointer rather than
    // borrowing whole nodes, so they stay valid while an `IterMut` has handed out `&mut` keys.

    fn left(self) -> Self {
        // SAFETY: Links inside a tree only point at live nodes of that tree.
        self.0.map_or(Link::NONE, |ptr| unsafe { (*ptr.as_ptr()).left })
    }

    fn right(self) -> Self {
        // SAFETY: See `left`.
        self.0.map_or(Link::NONE, |ptr| unsafe { (*ptr.as_ptr()).right })
    }

    fn parent(self) -> Self {
        // SAFETY: See `left`.
        self.0.map_or(Link::NONE, |ptr| unsafe { (*ptr.as_ptr()).parent })
    }

    /// The leftmost node of the subtree rooted here.
    pub(crate) fn first(self) -> Self {
        let mut current = self;
        while !current.left().is_none() {
            current = current.left();
        }
        current
    }

    /// The rightmost node of the subtree rooted here.
    pub(crate) fn last(self) -> Self {
        let mut current = self;
        while !current.right().is_none() {
            current = current.right();
        }
        current
    }

    /// The in-order successor of this node, or nothing if this is the largest node.
    pub(crate) fn next(self) -> Self {
        if self.is_none() {
            return Link::NONE;
        }
        if !self.right().is_none() {
            return self.right().first();
        }
        // Climb until we arrive at a parent from its left side.
        let mut child = self;
        let mut parent = self.parent();
        while !parent.is_none() && parent.left() != child {
            child = parent;
            parent = parent.parent();
        }
        parent
    }

    /// The in-order predecessor of this node, or nothing if this is the smallest node.
    pub(crate) fn prev(self) -> Self {
        if self.is_none() {
            return Link::NONE;
        }
        if !self.left().is_none() {
            return self.left().last();
        }
        let mut child = self;
        let mut parent = self.parent();
        while !parent.is_none() && parent.right() != child {
            child = parent;
            parent = parent.parent();
        }
        parent
    }
}

pub(crate) struct Node<K> {
    pub(crate) key: K,
    left: Link<K>,
    right: Link<K>,
    /// Only followed to find successors and predecessors, never to free or copy nodes.
    parent: Link<K>,
}

impl<K> Node<K> {
    /// Allocates a childless node and gives up ownership of it. Whoever stores the returned link
    /// as a child (or root) link becomes its owner.
    fn new_leaked(key: K, parent: Link<K>) -> Link<K> {
        let node = Box::new(Node {
            key,
            left: Link::NONE,
            right: Link::NONE,
            parent,
        });
        Link(Some(NonNull::from(Box::leak(node))))
    }
}
