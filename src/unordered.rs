//! Unordered set and unordered map over the hash table engine.
//!
//! Keys are hashed and compared by a [`KeyHasher`]. [`NaturalHash`] covers
//! every [`NaturalKey`]; opaque references have no default hash, so their
//! containers are built with [`UnorderedSet::with_hasher`] and an explicit
//! [`FnHasher`] (or any other [`KeyHasher`]).

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

use crate::error::Result;
use crate::hashtable::{self, Config, HashTable};
use crate::scalar::{NaturalKey, Scalar, ScalarKind};

pub use crate::hashtable::KeyEq;

// =============================================================================
// Hashers
// =============================================================================

/// Hash plus equality for one key type.
///
/// Keys that are equal under [`KeyEq::key_eq`] must hash the same.
pub trait KeyHasher<K>: KeyEq<K> {
    fn hash_key(&self, key: &K) -> u64;
}

/// Default hasher: [`NaturalKey::natural_hash`] and natural equality.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalHash;

impl<K: NaturalKey> KeyEq<K> for NaturalHash {
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        a.natural_cmp(b) == Ordering::Equal
    }
}

impl<K: NaturalKey> KeyHasher<K> for NaturalHash {
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        key.natural_hash()
    }
}

/// Hasher assembled from a hash closure and an equality closure.
#[derive(Clone, Copy)]
pub struct FnHasher<H, E> {
    hash: H,
    eq: E,
}

impl<H, E> FnHasher<H, E> {
    pub fn new(hash: H, eq: E) -> Self {
        Self { hash, eq }
    }
}

impl<K, H, E> KeyEq<K> for FnHasher<H, E>
where
    E: Fn(&K, &K) -> bool,
{
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        (self.eq)(a, b)
    }
}

impl<K, H, E> KeyHasher<K> for FnHasher<H, E>
where
    H: Fn(&K) -> u64,
    E: Fn(&K, &K) -> bool,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        (self.hash)(key)
    }
}

// =============================================================================
// UnorderedSet
// =============================================================================

/// Hash set of unique keys.
#[derive(Clone)]
pub struct UnorderedSet<K, H = NaturalHash> {
    table: HashTable<K, (), H>,
}

impl<K: NaturalKey> UnorderedSet<K> {
    pub fn new() -> Self {
        Self::with_hasher(NaturalHash)
    }

    /// Empty set with a custom load factor or initial capacity.
    pub fn with_config(config: &Config) -> Result<Self> {
        Self::with_config_and_hasher(config, NaturalHash)
    }
}

impl<K: NaturalKey> Default for UnorderedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, H> UnorderedSet<K, H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            table: HashTable::new(hasher),
        }
    }

    pub fn with_config_and_hasher(config: &Config, hasher: H) -> Result<Self> {
        Ok(Self {
            table: HashTable::with_config(config, hasher)?,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Slot count of the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Remove every key. Capacity is kept.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Keys in slot order.
    pub fn iter(&self) -> Keys<'_, K, ()> {
        Keys {
            inner: self.table.iter(),
        }
    }

    /// Underlying table, for structural inspection.
    pub fn table(&self) -> &HashTable<K, (), H> {
        &self.table
    }
}

impl<K: Scalar, H> UnorderedSet<K, H> {
    pub fn key_kind(&self) -> ScalarKind {
        K::KIND
    }
}

impl<K, H: KeyHasher<K>> UnorderedSet<K, H> {
    /// Insert `key`. Returns `true` if it was already present.
    pub fn add(&mut self, key: K) -> Result<bool> {
        let hash = self.table.key_eq().hash_key(&key);
        let (_, inserted) = self.table.insert(hash, key)?;
        Ok(!inserted)
    }

    pub fn has(&self, key: &K) -> bool {
        let hash = self.table.key_eq().hash_key(key);
        self.table.contains(hash, key)
    }

    /// Remove `key`. Returns `true` if it was present.
    pub fn del(&mut self, key: &K) -> bool {
        let hash = self.table.key_eq().hash_key(key);
        self.table.delete(hash, key).is_some()
    }
}

impl<K: fmt::Debug, H> fmt::Debug for UnorderedSet<K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, K, H> IntoIterator for &'a UnorderedSet<K, H> {
    type Item = &'a K;
    type IntoIter = Keys<'a, K, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Key iterator in slot order.
pub struct Keys<'a, K, P> {
    inner: hashtable::Iter<'a, K, P>,
}

impl<'a, K, P> Iterator for Keys<'a, K, P> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, P> ExactSizeIterator for Keys<'_, K, P> {}

impl<K, P> FusedIterator for Keys<'_, K, P> {}

// =============================================================================
// UnorderedMap
// =============================================================================

/// Hash map from unique keys to values.
#[derive(Clone)]
pub struct UnorderedMap<K, V, H = NaturalHash> {
    table: HashTable<K, V, H>,
}

impl<K: NaturalKey, V> UnorderedMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(NaturalHash)
    }

    /// Empty map with a custom load factor or initial capacity.
    pub fn with_config(config: &Config) -> Result<Self> {
        Self::with_config_and_hasher(config, NaturalHash)
    }
}

impl<K: NaturalKey, V> Default for UnorderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> UnorderedMap<K, V, H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            table: HashTable::new(hasher),
        }
    }

    pub fn with_config_and_hasher(config: &Config, hasher: H) -> Result<Self> {
        Ok(Self {
            table: HashTable::with_config(config, hasher)?,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Slot count of the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Remove every entry. Capacity is kept.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// `(key, value)` pairs in slot order.
    pub fn iter(&self) -> hashtable::Iter<'_, K, V> {
        self.table.iter()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.table.iter(),
        }
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + '_ {
        self.table.iter().map(|(_, v)| v)
    }

    /// Underlying table, for structural inspection.
    pub fn table(&self) -> &HashTable<K, V, H> {
        &self.table
    }
}

impl<K: Scalar, V, H> UnorderedMap<K, V, H> {
    pub fn key_kind(&self) -> ScalarKind {
        K::KIND
    }
}

impl<K, V: Scalar, H> UnorderedMap<K, V, H> {
    pub fn value_kind(&self) -> ScalarKind {
        V::KIND
    }
}

impl<K, V, H: KeyHasher<K>> UnorderedMap<K, V, H> {
    /// Associate `value` with `key`, replacing any previous value.
    /// Returns `true` if the key was already present.
    ///
    /// Replacing the value of an existing key never grows the table, so it
    /// cannot fail.
    pub fn add(&mut self, key: K, value: V) -> Result<bool> {
        let hash = self.table.key_eq().hash_key(&key);
        let (slot, unused) = self.table.insert_payload(hash, key, value)?;
        match unused {
            Some(value) => {
                *self.table.payload_mut(slot) = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn has(&self, key: &K) -> bool {
        let hash = self.table.key_eq().hash_key(key);
        self.table.contains(hash, key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.table.key_eq().hash_key(key);
        self.table
            .search(hash, key)
            .map(|slot| self.table.payload(slot))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.table.key_eq().hash_key(key);
        let slot = self.table.search(hash, key)?;
        Some(self.table.payload_mut(slot))
    }

    /// Remove `key`, returning its value.
    pub fn del(&mut self, key: &K) -> Option<V> {
        let hash = self.table.key_eq().hash_key(key);
        self.table.delete(hash, key).map(|(_, v)| v)
    }
}

impl<K: fmt::Debug, V: fmt::Debug, H> fmt::Debug for UnorderedMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, H> IntoIterator for &'a UnorderedMap<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = hashtable::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
