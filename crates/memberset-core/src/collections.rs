//! # Ordered Multimap and Slice Diff
//!
//! Container helpers shared by both indices.
//!
//! ## Invariants
//!
//! - A `MultiMap` key is present iff at least one value is associated with
//!   it. Removing the last value deletes the key; no empty sets are stored.
//! - Iteration order is a deterministic function of the update history, so
//!   the callback order it produces is reproducible run to run. Removal is
//!   O(1): the last entry is swapped into the vacated slot, so order after a
//!   removal is not plain insertion order.

use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};

// ─── MultiMap ────────────────────────────────────────────────────────

/// Map from a key to an insertion-ordered set of values.
#[derive(Debug, Clone)]
pub struct MultiMap<K, V> {
    inner: IndexMap<K, IndexSet<V>>,
}

impl<K, V> Default for MultiMap<K, V> {
    fn default() -> Self {
        Self {
            inner: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq, V: Hash + Eq> MultiMap<K, V> {
    /// Create an empty multimap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `value` with `key`. Returns `true` if the association is new.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.inner.entry(key).or_default().insert(value)
    }

    /// Remove one association. Returns `true` if it was present.
    ///
    /// The key itself is removed once its last value goes.
    pub fn remove(&mut self, key: &K, value: &V) -> bool {
        let Some(values) = self.inner.get_mut(key) else {
            return false;
        };
        let removed = values.swap_remove(value);
        if values.is_empty() {
            self.inner.swap_remove(key);
        }
        removed
    }

    /// Whether `key` has at least one value.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Iterate the values for `key`. Empty if the key is absent.
    pub fn values<'a>(&'a self, key: &K) -> impl Iterator<Item = &'a V> + 'a {
        self.inner.get(key).into_iter().flatten()
    }

    /// Number of values associated with `key`.
    pub fn count(&self, key: &K) -> usize {
        self.inner.get(key).map_or(0, IndexSet::len)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.inner.keys()
    }

    /// Iterate every `(key, value)` association.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.inner
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |value| (key, value)))
    }
}

// ─── Slice Diff ──────────────────────────────────────────────────────

/// Result of diffing two ordered slices with set semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceDiff<T> {
    /// Elements of the old slice absent from the new one.
    pub removed: Vec<T>,
    /// Elements of the new slice absent from the old one.
    pub added: Vec<T>,
}

impl<T> SliceDiff<T> {
    /// True when the two slices hold the same set of elements.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Diff `old` against `new`, ignoring position and duplicates.
///
/// Each output is deduplicated and ordered by first occurrence in its
/// source slice. An element present in both slices appears in neither.
pub fn diff<T: Hash + Eq + Clone>(old: &[T], new: &[T]) -> SliceDiff<T> {
    let old_set: IndexSet<&T> = old.iter().collect();
    let new_set: IndexSet<&T> = new.iter().collect();

    let mut removed = Vec::new();
    for item in &old_set {
        if !new_set.contains(item) {
            removed.push((*item).clone());
        }
    }

    let mut added = Vec::new();
    for item in &new_set {
        if !old_set.contains(item) {
            added.push((*item).clone());
        }
    }

    SliceDiff { removed, added }
}
