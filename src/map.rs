//! A map built on [`OrderedTree`] by storing `(key, value)` pairs and ordering them by key alone.
//!
//! The map never duplicates the tree's searching or iteration. It only translates between pairs
//! and keys, and it keeps keys read-only so the tree's ordering can't be broken through a map.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::OrderedMap;
//!
//! let mut map = OrderedMap::new();
//!
//! let (_, inserted) = map.insert("apple", 3);
//! assert!(inserted);
//!
//! // The first value for a key sticks.
//! let (entry, inserted) = map.insert("apple", 10);
//! assert!(!inserted);
//! assert_eq!(entry.value(), Some(&3));
//!
//! // Keyed access inserts a default value when the key is missing.
//! *map.get_or_insert_default("banana") += 5;
//! assert_eq!(map.get(&"banana"), Some(&5));
//! assert_eq!(map.len(), 2);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::ops::Index;

use compare::{Compare, Natural};

use crate::iter;
use crate::tree::OrderedTree;

/// Orders `(key, value)` pairs by comparing their keys with `C`. Values never take part.
#[derive(Clone, Copy, Debug, Default)]
pub struct ByKey<C>(C);

impl<K, V, C> Compare<(K, V)> for ByKey<C>
where
    C: Compare<K>,
{
    fn compare(&self, l: &(K, V), r: &(K, V)) -> Ordering {
        self.0.compare(&l.0, &r.0)
    }
}

/// An ordered map from unique keys to values, ordered by the comparator `C`.
#[derive(Clone)]
pub struct OrderedMap<K, V, C = Natural<K>> {
    tree: OrderedTree<(K, V), ByKey<C>>,
}

impl<K, V> Default for OrderedMap<K, V>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> fmt::Debug for OrderedMap<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C> PartialEq for OrderedMap<K, V, C>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K, V, C> Eq for OrderedMap<K, V, C>
where
    K: Eq,
    V: Eq,
{
}

impl<K, V> FromIterator<(K, V)> for OrderedMap<K, V>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

/// Like [`OrderedMap::insert`], a key already in the map keeps its value.
impl<K, V, C> Extend<(K, V)> for OrderedMap<K, V, C>
where
    C: Compare<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.tree.extend(iter);
    }
}

impl<K, V, C> Index<&K> for OrderedMap<K, V, C>
where
    C: Compare<K>,
{
    type Output = V;

    /// # Panics
    ///
    /// When `key` isn't in the map.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a, K, V, C> IntoIterator for &'a OrderedMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut OrderedMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: Ord,
{
    /// Generate a new, empty `OrderedMap` using the keys' natural order.
    pub fn new() -> Self {
        Self::with_cmp(compare::natural())
    }
}

impl<K, V, C> OrderedMap<K, V, C> {
    /// Generate a new, empty `OrderedMap` whose keys are ordered by `cmp`.
    pub fn with_cmp(cmp: C) -> Self {
        Self {
            tree: OrderedTree::with_cmp(ByKey(cmp)),
        }
    }

    /// The comparator ordering this map's keys.
    pub fn cmp(&self) -> &C {
        &self.tree.cmp().0
    }

    /// The number of entries in the map.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The height of the underlying tree. See [`OrderedTree::height`].
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// A cursor at the entry with the smallest key, or at the end when the map is empty.
    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor(self.tree.begin())
    }

    /// A cursor one past the entry with the largest key.
    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor(self.tree.end())
    }

    /// An iterator over the entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter(self.tree.iter())
    }

    /// An iterator over the entries in ascending key order that can change values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut(self.tree.iter_mut())
    }

    /// An iterator over the keys in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// An iterator over the values in ascending key order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }
}

impl<K, V, C> OrderedMap<K, V, C>
where
    C: Compare<K>,
{
    /// Inserts `value` under `key` unless `key` is already in the map. Returns a cursor at the
    /// entry for `key` and whether `value` was inserted. An existing entry keeps its value.
    pub fn insert(&mut self, key: K, value: V) -> (CursorMut<'_, K, V>, bool) {
        let (link, inserted) = self.tree.attach((key, value));
        (CursorMut(self.tree.cursor_mut_at(link)), inserted)
    }

    /// A cursor at the entry for `key`, or at the end if there isn't one.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::OrderedMap;
    ///
    /// let map: OrderedMap<_, _> = [(1, 'a'), (2, 'b')].into_iter().collect();
    ///
    /// assert_eq!(map.find(&2).get(), Some((&2, &'b')));
    /// assert!(map.find(&3) == map.end());
    /// ```
    pub fn find(&self, key: &K) -> Cursor<'_, K, V> {
        let link = self.tree.locate(|(probe, _)| self.cmp().compare(key, probe));
        Cursor(self.tree.cursor_at(link))
    }

    /// A mutable cursor at the entry for `key`, or at the end if there isn't one.
    pub fn find_mut(&mut self, key: &K) -> CursorMut<'_, K, V> {
        let link = self.tree.locate(|(probe, _)| self.cmp().compare(key, probe));
        CursorMut(self.tree.cursor_mut_at(link))
    }

    /// A cursor at the entry with the smallest key strictly greater than `key`, or at the end.
    pub fn min_greater_than(&self, key: &K) -> Cursor<'_, K, V> {
        let link = self
            .tree
            .locate_min_greater(|(probe, _)| self.cmp().compare(key, probe));
        Cursor(self.tree.cursor_at(link))
    }

    /// The value stored under `key`, if any.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).value()
    }

    /// A mutable reference to the value stored under `key`, if any.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.find_mut(key).into_value_mut()
    }

    /// Whether the map has an entry for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        !self.find(key).is_end()
    }

    /// A mutable reference to the value under `key`, inserting the value returned by `default`
    /// first if `key` isn't in the map yet.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let found = self
            .tree
            .locate(|(probe, _)| self.cmp().compare(&key, probe));
        let link = if found.is_none() {
            self.tree.attach((key, default())).0
        } else {
            found
        };
        CursorMut(self.tree.cursor_mut_at(link))
            .into_value_mut()
            .expect("an entry was just found or inserted")
    }

    /// A mutable reference to the value under `key`, inserting `V::default()` first if `key`
    /// isn't in the map yet. Never changes the length when `key` is present.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::OrderedMap;
    ///
    /// let mut map = OrderedMap::new();
    ///
    /// *map.get_or_insert_default("x") = 10;
    /// *map.get_or_insert_default("x") = 20;
    /// assert_eq!(map.get(&"x"), Some(&20));
    /// assert_eq!(map.len(), 1);
    ///
    /// assert_eq!(*map.get_or_insert_default("y"), 0);
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Whether the underlying tree is still ordered by key. Keys can't be changed through a map,
    /// so this only fails if the comparator itself is inconsistent.
    pub fn check_sorting_invariant(&self) -> bool {
        self.tree.check_sorting_invariant()
    }
}

/// A read-only position in an [`OrderedMap`].
pub struct Cursor<'a, K, V>(iter::Cursor<'a, (K, V)>);

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K, V> Copy for Cursor<'_, K, V> {}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K, V> fmt::Debug for Cursor<'_, K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

impl<'a, K, V> Cursor<'a, K, V> {
    /// The entry at this position, or `None` at the end.
    pub fn get(&self) -> Option<(&'a K, &'a V)> {
        self.0.get().map(|(key, value)| (key, value))
    }

    /// The key at this position, or `None` at the end.
    pub fn key(&self) -> Option<&'a K> {
        self.0.get().map(|(key, _)| key)
    }

    /// The value at this position, or `None` at the end.
    pub fn value(&self) -> Option<&'a V> {
        self.0.get().map(|(_, value)| value)
    }

    /// Whether this cursor is at the end.
    pub fn is_end(&self) -> bool {
        self.0.is_end()
    }

    /// Moves to the entry with the next larger key. See [`iter::Cursor::move_next`].
    pub fn move_next(&mut self) {
        self.0.move_next();
    }

    /// Moves to the entry with the next smaller key. See [`iter::Cursor::move_prev`].
    pub fn move_prev(&mut self) {
        self.0.move_prev();
    }
}

/// A position in an [`OrderedMap`] through which the value (but not the key) can be changed.
pub struct CursorMut<'a, K, V>(iter::CursorMut<'a, (K, V)>);

impl<K, V> fmt::Debug for CursorMut<'_, K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.get()).finish()
    }
}

impl<'a, K, V> CursorMut<'a, K, V> {
    /// The entry at this position, or `None` at the end.
    pub fn get(&self) -> Option<(&K, &V)> {
        self.0.get().map(|(key, value)| (key, value))
    }

    /// The key at this position, or `None` at the end.
    pub fn key(&self) -> Option<&K> {
        self.0.get().map(|(key, _)| key)
    }

    /// The value at this position, or `None` at the end.
    pub fn value(&self) -> Option<&V> {
        self.0.get().map(|(_, value)| value)
    }

    /// A mutable reference to the value at this position, or `None` at the end.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.0.get_mut().map(|(_, value)| value)
    }

    /// Turns the cursor into a mutable reference to its value that lives as long as the borrow
    /// of the map.
    pub fn into_value_mut(self) -> Option<&'a mut V> {
        self.0.into_mut().map(|(_, value)| value)
    }

    /// Whether this cursor is at the end.
    pub fn is_end(&self) -> bool {
        self.0.is_end()
    }

    /// Moves to the entry with the next larger key.
    pub fn move_next(&mut self) {
        self.0.move_next();
    }

    /// Moves to the entry with the next smaller key.
    pub fn move_prev(&mut self) {
        self.0.move_prev();
    }
}

/// An iterator over a map's entries in ascending key order.
pub struct Iter<'a, K, V>(iter::Iter<'a, (K, V)>);

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(key, value)| (key, value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over a map's entries in ascending key order with mutable values.
pub struct IterMut<'a, K, V>(iter::IterMut<'a, (K, V)>);

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, value)| (&*key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(key, value)| (&*key, value))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An iterator over a map's keys in ascending order.
pub struct Keys<'a, K, V>(Iter<'a, K, V>);

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over a map's values in ascending key order.
pub struct Values<'a, K, V>(Iter<'a, K, V>);

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_stay_out_of_ordering() {
        let mut map = OrderedMap::new();
        map.insert(1, "z");
        map.insert(2, "a");

        assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 2]);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), ["z", "a"]);
    }

    #[test]
    fn keys_and_values_resume_from_clones() {
        let map: OrderedMap<_, _> = [(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();

        let mut keys = map.keys();
        assert_eq!(keys.next(), Some(&1));
        assert_eq!(keys.clone().collect::<Vec<_>>(), [&2, &3]);
        assert_eq!(keys.by_ref().count(), 2);
        assert_eq!(keys.next(), None);
        assert_eq!(keys.next(), None);

        let mut values = map.values();
        assert_eq!(values.next_back(), Some(&'c'));
        assert_eq!(values.clone().len(), 2);
        assert_eq!(values.by_ref().count(), 2);
        assert_eq!(values.next(), None);
    }

    #[test]
    fn insert_cursor_writes_value() {
        let mut map = OrderedMap::new();
        let (mut cursor, inserted) = map.insert('a', 1);
        assert!(inserted);
        *cursor.value_mut().unwrap() += 1;
        assert_eq!(cursor.key(), Some(&'a'));

        assert_eq!(map[&'a'], 2);
        assert!(map.check_sorting_invariant());
    }

    #[test]
    fn get_or_insert_with_only_calls_default_when_missing() {
        let mut map = OrderedMap::new();
        map.insert("x", 1);

        *map.get_or_insert_with("x", || unreachable!()) += 1;
        *map.get_or_insert_with("y", || 7) += 1;

        assert_eq!(map.get(&"x"), Some(&2));
        assert_eq!(map.get(&"y"), Some(&8));
    }

    #[test]
    #[should_panic(expected = "no entry found for key")]
    fn index_panics_on_missing_key() {
        let map: OrderedMap<i32, i32> = OrderedMap::new();
        let _ = map[&1];
    }

    #[test]
    fn iter_mut_updates_values() {
        let mut map: OrderedMap<_, _> = (1..=3).map(|k| (k, k * 10)).collect();
        for (key, value) in &mut map {
            *value += key;
        }
        assert_eq!(map.values().copied().collect::<Vec<_>>(), [11, 22, 33]);
        assert_eq!(map.iter_mut().rev().next(), Some((&3, &mut 33)));
    }

    #[test]
    fn extend_keeps_first_value() {
        let map: OrderedMap<_, _> = [(1, 'a'), (1, 'b'), (0, 'c')].into_iter().collect();

        assert_eq!(format!("{:?}", map), "{0: 'c', 1: 'a'}");
    }

    #[test]
    fn min_greater_than_ignores_values() {
        let map: OrderedMap<_, _> = [(10, ()), (5, ()), (20, ()), (15, ()), (30, ())]
            .into_iter()
            .collect();

        assert_eq!(map.min_greater_than(&10).key(), Some(&15));
        assert_eq!(map.min_greater_than(&9).key(), Some(&10));
        assert!(map.min_greater_than(&30).is_end());
    }

    #[test]
    fn reversed_keys() {
        let mut map = OrderedMap::with_cmp(compare::natural().rev());
        map.extend([(1, 'a'), (3, 'c'), (2, 'b')]);

        assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 2, 1]);
        assert_eq!(map.find(&2).value(), Some(&'b'));
    }
}
