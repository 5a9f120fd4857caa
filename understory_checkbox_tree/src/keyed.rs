// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered, uniquely keyed container with functional transforms.

use alloc::string::String;
use core::cmp::Ordering;
use core::fmt;

use hashbrown::DefaultHashBuilder;
use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Ordered `String → T` container.
///
/// Iteration follows insertion order. Re-inserting an existing key replaces the
/// value but keeps the entry's position.
///
/// The transforms [`concat`](Self::concat), [`map`](Self::map),
/// [`filter`](Self::filter), and [`sort_by`](Self::sort_by) never mutate
/// `self`; they return a new container.
///
/// Equality is order-sensitive: two containers are equal when they hold the
/// same entries in the same order.
///
/// ## Example
///
/// ```rust
/// use understory_checkbox_tree::KeyedMap;
///
/// let a: KeyedMap<u32> = [("a", 1), ("b", 2)].into_iter().collect();
/// let b: KeyedMap<u32> = [("c", 3)].into_iter().collect();
///
/// let all = a.concat(&b).unwrap();
/// assert_eq!(all.keys().collect::<Vec<_>>(), ["a", "b", "c"]);
///
/// // Colliding keys are rejected.
/// assert!(all.concat(&b).is_err());
/// ```
#[derive(Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct KeyedMap<T> {
    entries: IndexMap<String, T, DefaultHashBuilder>,
}

impl<T> KeyedMap<T> {
    /// Create an empty container.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::with_hasher(DefaultHashBuilder::default()),
        }
    }

    /// Create an empty container with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity_and_hasher(capacity, DefaultHashBuilder::default()),
        }
    }

    /// Build a container from entries, failing on the first repeated key.
    ///
    /// Collecting with [`FromIterator`] instead lets the last entry win.
    pub fn try_from_entries<K, I>(entries: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, T)>,
    {
        let entries = entries.into_iter();
        let mut map = Self::with_capacity(entries.size_hint().0);
        for (key, value) in entries {
            let key = key.into();
            if map.entries.contains_key(&key) {
                return Err(Error::DuplicateKey(key));
            }
            map.entries.insert(key, value);
        }
        Ok(map)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `value` under `key`, returning the value it replaced.
    ///
    /// A replaced entry keeps its position; a new entry is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: T) -> Option<T> {
        self.entries.insert(key.into(), value)
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    /// Look up a value by key, mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.entries.get_mut(key)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove an entry, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<T> {
        self.entries.shift_remove(key)
    }

    /// Entry at `index` in iteration order.
    pub fn get_index(&self, index: usize) -> Option<(&str, &T)> {
        self.entries
            .get_index(index)
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Position of `key` in iteration order.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.get_index_of(key)
    }

    /// Iterate entries in order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter(self.entries.iter())
    }

    /// Iterate entries in order with mutable values.
    pub fn iter_mut(&mut self) -> impl ExactSizeIterator<Item = (&str, &mut T)> {
        self.entries
            .iter_mut()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Iterate keys in order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> + DoubleEndedIterator {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate values in order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &T> + DoubleEndedIterator {
        self.entries.values()
    }

    /// Iterate values in order, mutably.
    pub fn values_mut(&mut self) -> impl ExactSizeIterator<Item = &mut T> {
        self.entries.values_mut()
    }

    /// All entries of `self` followed by all entries of `other`.
    ///
    /// Fails with [`Error::DuplicateKey`] naming the first key of `other` that
    /// is already present in `self`.
    pub fn concat(&self, other: &Self) -> Result<Self>
    where
        T: Clone,
    {
        let mut merged = self.clone();
        merged.entries.reserve(other.len());
        for (key, value) in &other.entries {
            if self.entries.contains_key(key) {
                return Err(Error::DuplicateKey(key.clone()));
            }
            merged.entries.insert(key.clone(), value.clone());
        }
        Ok(merged)
    }

    /// Same keys in the same order, each value replaced by
    /// `f(key, value, index)`.
    pub fn map<R>(&self, mut f: impl FnMut(&str, &T, usize) -> R) -> KeyedMap<R> {
        let mut mapped = KeyedMap::with_capacity(self.len());
        for (idx, (key, value)) in self.entries.iter().enumerate() {
            let next = f(key, value, idx);
            mapped.entries.insert(key.clone(), next);
        }
        mapped
    }

    /// Entries for which `f(key, value, index)` holds, in order.
    pub fn filter(&self, mut f: impl FnMut(&str, &T, usize) -> bool) -> Self
    where
        T: Clone,
    {
        self.entries
            .iter()
            .enumerate()
            .filter(|(idx, (key, value))| f(key, value, *idx))
            .map(|(_, (key, value))| (key.clone(), value.clone()))
            .collect()
    }

    /// Entries reordered by a comparator over `(key, value)` pairs.
    ///
    /// The sort is stable: entries comparing equal keep their relative order.
    pub fn sort_by(&self, mut cmp: impl FnMut((&str, &T), (&str, &T)) -> Ordering) -> Self
    where
        T: Clone,
    {
        let mut sorted = self.clone();
        sorted
            .entries
            .sort_by(|ka, va, kb, vb| cmp((ka.as_str(), va), (kb.as_str(), vb)));
        sorted
    }

    /// Reorder in place by a comparator over `(key, value)` pairs. Stable.
    pub(crate) fn sort_in_place_by(
        &mut self,
        mut cmp: impl FnMut((&str, &T), (&str, &T)) -> Ordering,
    ) {
        self.entries
            .sort_by(|ka, va, kb, vb| cmp((ka.as_str(), va), (kb.as_str(), vb)));
    }

    /// Consume the container, yielding values in order.
    pub fn into_values(self) -> impl ExactSizeIterator<Item = T> + DoubleEndedIterator {
        self.entries.into_values()
    }
}

impl<T> Default for KeyedMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for KeyedMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for KeyedMap<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for KeyedMap<T> {}

/// Last write wins on repeated keys, keeping the first position.
impl<K: Into<String>, T> FromIterator<(K, T)> for KeyedMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, T> Extend<(K, T)> for KeyedMap<T> {
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.entries.insert(key.into(), value);
        }
    }
}

impl<T> IntoIterator for KeyedMap<T> {
    type Item = (String, T);
    type IntoIter = indexmap::map::IntoIter<String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a KeyedMap<T> {
    type Item = (&'a str, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`KeyedMap`], in order.
#[derive(Clone, Debug)]
pub struct Iter<'a, T>(indexmap::map::Iter<'a, String, T>);

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a str, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, value)| (key.as_str(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(key, value)| (key.as_str(), value))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
