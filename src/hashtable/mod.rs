//! Open-addressing hash table engine.
//!
//! Slots form one array whose length is always a prime from
//! [`primes::CAPACITIES`]. Collisions are resolved by linear probing from
//! `hash % capacity`. Each occupied slot caches the key's full hash, which
//! short-circuits most key comparisons and lets the table rehash without
//! calling back into the hasher.
//!
//! Deletion shifts later members of the probe run back into the hole
//! instead of leaving a tombstone, so a probe always stops at the first
//! empty slot and every stored key stays reachable from its home slot.
//!
//! The first slot array is allocated on the first insert.

mod config;
mod debug;

pub use config::{Config, DEFAULT_LOAD_FACTOR};

use std::fmt;
use std::iter::FusedIterator;

use crate::error::{Error, Result};
use crate::primes;

/// Key equality used by a table.
///
/// Any `Fn(&K, &K) -> bool` closure is a key equality.
pub trait KeyEq<K> {
    /// Whether two keys are the same key.
    fn key_eq(&self, a: &K, b: &K) -> bool;
}

impl<K, F> KeyEq<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

/// Handle to an occupied slot.
///
/// Valid until the next mutation of the table: deletion may shift entries
/// and growth rehashes all of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

impl SlotId {
    /// Position in the slot array.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone)]
struct Bucket<K, P> {
    hash: u64,
    key: K,
    payload: P,
}

/// Outcome of a probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Probe {
    Found(usize),
    Vacant(usize),
}

/// Hash table over keys `K` with a per-slot payload `P`.
///
/// Callers hash keys themselves and pass the hash with every call. Equal
/// keys must be passed equal hashes.
#[derive(Clone)]
pub struct HashTable<K, P, Q> {
    slots: Vec<Option<Bucket<K, P>>>,
    len: usize,
    growth_index: usize,
    load_factor: f64,
    eq: Q,
}

impl<K, P, Q> HashTable<K, P, Q> {
    /// Create an empty table with the default configuration.
    pub fn new(eq: Q) -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
            growth_index: 0,
            load_factor: DEFAULT_LOAD_FACTOR,
            eq,
        }
    }

    /// Create an empty table from `config`.
    pub fn with_config(config: &Config, eq: Q) -> Result<Self> {
        let growth_index = config.growth_index()?;
        Ok(Self {
            slots: Vec::new(),
            len: 0,
            growth_index,
            load_factor: config.load_factor,
            eq,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current slot count. Always a member of [`primes::CAPACITIES`].
    #[inline]
    pub fn capacity(&self) -> usize {
        primes::CAPACITIES[self.growth_index]
    }

    /// Position of [`HashTable::capacity`] in the prime sequence.
    #[inline]
    pub fn growth_index(&self) -> usize {
        self.growth_index
    }

    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Fraction of slots in use.
    pub fn occupancy(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// The key equality this table was built with.
    pub fn key_eq(&self) -> &Q {
        &self.eq
    }

    /// Empty every slot. Capacity is kept.
    pub fn clear(&mut self) {
        log::trace!("hashtable: clearing {} entries", self.len);
        for slot in &mut self.slots {
            *slot = None;
        }
        self.len = 0;
    }

    /// Key stored at `slot`.
    ///
    /// # Panics
    /// Panics if `slot` is not occupied.
    pub fn key(&self, slot: SlotId) -> &K {
        &self.bucket(slot).key
    }

    /// Payload stored at `slot`.
    ///
    /// # Panics
    /// Panics if `slot` is not occupied.
    pub fn payload(&self, slot: SlotId) -> &P {
        &self.bucket(slot).payload
    }

    /// Mutable payload stored at `slot`.
    ///
    /// # Panics
    /// Panics if `slot` is not occupied.
    pub fn payload_mut(&mut self, slot: SlotId) -> &mut P {
        match self.slots.get_mut(slot.0).and_then(Option::as_mut) {
            Some(bucket) => &mut bucket.payload,
            None => panic!("{slot:?} is not occupied"),
        }
    }

    /// Occupied slots in slot order.
    pub fn iter(&self) -> Iter<'_, K, P> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    fn bucket(&self, slot: SlotId) -> &Bucket<K, P> {
        match self.slots.get(slot.0).and_then(Option::as_ref) {
            Some(bucket) => bucket,
            None => panic!("{slot:?} is not occupied"),
        }
    }

    #[inline]
    fn home(&self, hash: u64) -> usize {
        (hash % self.slots.len() as u64) as usize
    }

    #[inline]
    fn next_slot(&self, idx: usize) -> usize {
        let next = idx + 1;
        if next == self.slots.len() {
            0
        } else {
            next
        }
    }

    fn alloc_slots(capacity: usize) -> Result<Vec<Option<Bucket<K, P>>>> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| Error::out_of_memory(capacity))?;
        slots.resize_with(capacity, || None);
        Ok(slots)
    }
}

impl<K, P, Q: KeyEq<K>> HashTable<K, P, Q> {
    /// Walk the probe run starting at `hash`'s home slot.
    ///
    /// With `key` set, stops at a slot holding an equal key or at the first
    /// empty slot. With `key` unset, stops at the first empty slot only.
    /// Terminates because at least one slot is always empty.
    fn probe(&self, hash: u64, key: Option<&K>) -> Probe {
        debug_assert!(!self.slots.is_empty());
        let mut idx = self.home(hash);
        loop {
            match (&self.slots[idx], key) {
                (None, _) => return Probe::Vacant(idx),
                (Some(b), Some(key)) if b.hash == hash && self.eq.key_eq(&b.key, key) => {
                    return Probe::Found(idx)
                }
                _ => idx = self.next_slot(idx),
            }
        }
    }

    /// Find the slot holding a key equal to `key`.
    pub fn search(&self, hash: u64, key: &K) -> Option<SlotId> {
        if self.slots.is_empty() {
            return None;
        }
        match self.probe(hash, Some(key)) {
            Probe::Found(idx) => Some(SlotId(idx)),
            Probe::Vacant(_) => None,
        }
    }

    /// Whether a key equal to `key` is present.
    pub fn contains(&self, hash: u64, key: &K) -> bool {
        self.search(hash, key).is_some()
    }

    /// Insert `key` with a default payload.
    ///
    /// Returns the slot and whether the key was new.
    pub fn insert(&mut self, hash: u64, key: K) -> Result<(SlotId, bool)>
    where
        P: Default,
    {
        self.insert_with(hash, key, P::default)
    }

    /// Insert `key`, building the payload with `make` only if the key is new.
    pub fn insert_with<F: FnOnce() -> P>(
        &mut self,
        hash: u64,
        key: K,
        make: F,
    ) -> Result<(SlotId, bool)> {
        let (slot, unused) = self.insert_impl(hash, key, make)?;
        Ok((slot, unused.is_none()))
    }

    /// Insert `key` with `payload`. If the key already exists the table is
    /// unchanged and `payload` is handed back.
    pub fn insert_payload(&mut self, hash: u64, key: K, payload: P) -> Result<(SlotId, Option<P>)> {
        let (slot, unused) = self.insert_impl(hash, key, move || payload)?;
        Ok((slot, unused.map(|make| make())))
    }

    fn insert_impl<F: FnOnce() -> P>(
        &mut self,
        hash: u64,
        key: K,
        make: F,
    ) -> Result<(SlotId, Option<F>)> {
        if self.slots.is_empty() {
            self.slots = Self::alloc_slots(self.capacity())?;
        }
        let mut vacant = match self.probe(hash, Some(&key)) {
            Probe::Found(idx) => return Ok((SlotId(idx), Some(make))),
            Probe::Vacant(idx) => idx,
        };

        // Only a new key can push occupancy to the load factor.
        if (self.len + 1) as f64 >= self.load_factor * self.slots.len() as f64 {
            while (self.len + 1) as f64 >= self.load_factor * self.slots.len() as f64 {
                self.grow()?;
            }
            vacant = match self.probe(hash, None) {
                Probe::Vacant(idx) => idx,
                Probe::Found(_) => unreachable!("key-less probe only stops on empty slots"),
            };
        }

        self.slots[vacant] = Some(Bucket {
            hash,
            key,
            payload: make(),
        });
        self.len += 1;
        Ok((SlotId(vacant), None))
    }

    /// Remove the entry for `key`, returning its key and payload.
    pub fn delete(&mut self, hash: u64, key: &K) -> Option<(K, P)> {
        let slot = self.search(hash, key)?;
        Some(self.remove_at(slot.0))
    }

    /// Empty slot `idx` and close the hole by shifting back every later
    /// member of the run whose home does not lie cyclically in `(gap, j]`.
    fn remove_at(&mut self, idx: usize) -> (K, P) {
        let removed = match self.slots[idx].take() {
            Some(bucket) => bucket,
            None => panic!("slot {idx} is not occupied"),
        };
        self.len -= 1;

        let mut gap = idx;
        let mut j = self.next_slot(idx);
        while let Some(bucket) = &self.slots[j] {
            let home = self.home(bucket.hash);
            let stays = if gap <= j {
                gap < home && home <= j
            } else {
                gap < home || home <= j
            };
            if !stays {
                self.slots[gap] = self.slots[j].take();
                gap = j;
            }
            j = self.next_slot(j);
        }

        (removed.key, removed.payload)
    }

    /// Move to the next prime capacity and rehash every entry by its cached
    /// hash.
    fn grow(&mut self) -> Result<()> {
        let next = self.growth_index + 1;
        let Some(&new_capacity) = primes::CAPACITIES.get(next) else {
            return Err(Error::capacity_exhausted(self.capacity()));
        };
        let new_slots = Self::alloc_slots(new_capacity)?;
        let old_slots = std::mem::replace(&mut self.slots, new_slots);
        log::debug!(
            "hashtable: growing {} -> {} slots ({} entries)",
            old_slots.len(),
            new_capacity,
            self.len
        );
        self.growth_index = next;

        for bucket in old_slots.into_iter().flatten() {
            match self.probe(bucket.hash, None) {
                Probe::Vacant(idx) => self.slots[idx] = Some(bucket),
                Probe::Found(_) => unreachable!("key-less probe only stops on empty slots"),
            }
        }
        Ok(())
    }
}

impl<K: fmt::Debug, P: fmt::Debug, Q> fmt::Debug for HashTable<K, P, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over occupied slots as `(key, payload)` pairs.
pub struct Iter<'a, K, P> {
    slots: std::slice::Iter<'a, Option<Bucket<K, P>>>,
    remaining: usize,
}

impl<'a, K, P> Iterator for Iter<'a, K, P> {
    type Item = (&'a K, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Some(bucket) = slot {
                self.remaining -= 1;
                return Some((&bucket.key, &bucket.payload));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, P> ExactSizeIterator for Iter<'_, K, P> {}

impl<K, P> FusedIterator for Iter<'_, K, P> {}

impl<'a, K, P, Q> IntoIterator for &'a HashTable<K, P, Q> {
    type Item = (&'a K, &'a P);
    type IntoIter = Iter<'a, K, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
