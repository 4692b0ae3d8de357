//! Ordered set and ordered map over the red-black tree engine.
//!
//! Keys with a natural order ([`NaturalKey`]) get a default comparator;
//! any other key type, [`OpaqueRef`](crate::scalar::OpaqueRef) in
//! particular, needs [`OrderedSet::with_comparator`] /
//! [`OrderedMap::with_comparator`].

use std::fmt;
use std::iter::FusedIterator;

use crate::error::Result;
use crate::rbtree::{self, RbTree};
use crate::scalar::{NaturalKey, Scalar, ScalarKind};

pub use crate::rbtree::{Comparator, Cursor, NaturalOrder};

// =============================================================================
// OrderedSet
// =============================================================================

/// Sorted set of unique keys.
#[derive(Clone)]
pub struct OrderedSet<K, C = NaturalOrder> {
    tree: RbTree<K, (), C>,
}

impl<K: NaturalKey> OrderedSet<K> {
    /// Empty set ordered by the key type's natural order.
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K: NaturalKey> Default for OrderedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> OrderedSet<K, C> {
    /// Empty set ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            tree: RbTree::new(cmp),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Keys in ascending order.
    pub fn iter(&self) -> Keys<'_, K, (), C> {
        Keys {
            inner: self.tree.iter(),
        }
    }

    /// Restartable cursor positioned on the smallest key.
    pub fn cursor(&self) -> SetCursor<'_, K, C> {
        SetCursor {
            inner: self.tree.cursor(),
        }
    }

    pub fn first(&self) -> Option<&K> {
        self.tree.first().map(|id| self.tree.key(id))
    }

    pub fn last(&self) -> Option<&K> {
        self.tree.last().map(|id| self.tree.key(id))
    }

    /// Underlying tree, for structural inspection.
    pub fn tree(&self) -> &RbTree<K, (), C> {
        &self.tree
    }
}

impl<K: Scalar, C> OrderedSet<K, C> {
    /// Type tag shared by every key in the set.
    pub fn key_kind(&self) -> ScalarKind {
        K::KIND
    }
}

impl<K, C: Comparator<K>> OrderedSet<K, C> {
    /// Insert `key`. Returns `true` if it was already present.
    pub fn add(&mut self, key: K) -> Result<bool> {
        let (_, inserted) = self.tree.insert(key)?;
        Ok(!inserted)
    }

    pub fn has(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Remove `key`. Returns `true` if it was present.
    pub fn del(&mut self, key: &K) -> bool {
        self.tree.delete(key).is_some()
    }
}

impl<K: fmt::Debug, C> fmt::Debug for OrderedSet<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, K, C> IntoIterator for &'a OrderedSet<K, C> {
    type Item = &'a K;
    type IntoIter = Keys<'a, K, (), C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Cursor over an [`OrderedSet`] yielding keys.
pub struct SetCursor<'a, K, C> {
    inner: Cursor<'a, K, (), C>,
}

impl<'a, K, C> SetCursor<'a, K, C> {
    /// Move back to the smallest key.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Whether the cursor is on a key.
    pub fn valid(&self) -> bool {
        self.inner.valid()
    }

    /// Step to the next larger key.
    pub fn next(&mut self) {
        self.inner.next();
    }

    /// Key under the cursor.
    pub fn current(&self) -> Option<&'a K> {
        self.inner.current().map(|(k, _)| k)
    }
}

/// Ascending key iterator.
pub struct Keys<'a, K, P, C> {
    inner: rbtree::Iter<'a, K, P, C>,
}

impl<'a, K, P, C> Iterator for Keys<'a, K, P, C> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, P, C> DoubleEndedIterator for Keys<'_, K, P, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, P, C> ExactSizeIterator for Keys<'_, K, P, C> {}

impl<K, P, C> FusedIterator for Keys<'_, K, P, C> {}

// =============================================================================
// OrderedMap
// =============================================================================

/// Sorted map from unique keys to values.
#[derive(Clone)]
pub struct OrderedMap<K, V, C = NaturalOrder> {
    tree: RbTree<K, V, C>,
}

impl<K: NaturalKey, V> OrderedMap<K, V> {
    /// Empty map ordered by the key type's natural order.
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K: NaturalKey, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> OrderedMap<K, V, C> {
    /// Empty map ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            tree: RbTree::new(cmp),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// `(key, value)` pairs in ascending key order.
    pub fn iter(&self) -> rbtree::Iter<'_, K, V, C> {
        self.tree.iter()
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V, C> {
        Keys {
            inner: self.tree.iter(),
        }
    }

    /// Values in ascending key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.tree.iter().map(|(_, v)| v)
    }

    /// Restartable cursor positioned on the smallest key.
    pub fn cursor(&self) -> Cursor<'_, K, V, C> {
        self.tree.cursor()
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.tree
            .first()
            .map(|id| (self.tree.key(id), self.tree.payload(id)))
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.tree
            .last()
            .map(|id| (self.tree.key(id), self.tree.payload(id)))
    }

    /// Underlying tree, for structural inspection.
    pub fn tree(&self) -> &RbTree<K, V, C> {
        &self.tree
    }
}

impl<K: Scalar, V, C> OrderedMap<K, V, C> {
    /// Type tag shared by every key in the map.
    pub fn key_kind(&self) -> ScalarKind {
        K::KIND
    }
}

impl<K, V: Scalar, C> OrderedMap<K, V, C> {
    /// Type tag shared by every value in the map.
    pub fn value_kind(&self) -> ScalarKind {
        V::KIND
    }
}

impl<K, V, C: Comparator<K>> OrderedMap<K, V, C> {
    /// Associate `value` with `key`, replacing any previous value.
    /// Returns `true` if the key was already present.
    pub fn add(&mut self, key: K, value: V) -> Result<bool> {
        let (id, unused) = self.tree.insert_payload(key, value)?;
        match unused {
            Some(value) => {
                *self.tree.payload_mut(id) = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn has(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.search(key).map(|id| self.tree.payload(id))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.tree.search(key)?;
        Some(self.tree.payload_mut(id))
    }

    /// Remove `key`, returning its value.
    pub fn del(&mut self, key: &K) -> Option<V> {
        self.tree.delete(key).map(|(_, v)| v)
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for OrderedMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, C> IntoIterator for &'a OrderedMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = rbtree::Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
