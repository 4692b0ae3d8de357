//! # assoc
//!
//! Associative containers over two engines: a red-black tree for ordered
//! sets and maps, and an open-addressing hash table with prime capacities
//! for unordered ones.
//!
//! Every container is monomorphic in its key type. Keys with a natural
//! order and hash (integers, doubles, strings, byte strings) work out of
//! the box; opaque references must be given a comparator or hasher.
//!
//! ## Example
//!
//! ```rust
//! use assoc::{OrderedMap, UnorderedSet};
//!
//! let mut ages = OrderedMap::new();
//! ages.add("bob".to_string(), 31).unwrap();
//! ages.add("alice".to_string(), 29).unwrap();
//! assert_eq!(ages.get(&"alice".to_string()), Some(&29));
//! assert_eq!(ages.keys().next().map(String::as_str), Some("alice"));
//!
//! let mut seen = UnorderedSet::new();
//! assert!(!seen.add(42i64).unwrap());
//! assert!(seen.add(42).unwrap());
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

pub mod error;
pub mod hash;
pub mod hashtable;
pub mod ordered;
pub mod primes;
pub mod rbtree;
pub mod scalar;
pub mod unordered;

pub use error::{Error, Result};
pub use hashtable::{Config, HashTable, SlotId};
pub use ordered::{OrderedMap, OrderedSet};
pub use rbtree::{Comparator, NaturalOrder, NodeId, RbTree};
pub use scalar::{NaturalKey, OpaqueRef, Scalar, ScalarKind};
pub use unordered::{FnHasher, KeyHasher, NaturalHash, UnorderedMap, UnorderedSet};

#[cfg(test)]
mod proptests;
