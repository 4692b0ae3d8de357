//! djb2 running hash.
//!
//! `h = h * 33 + byte`, seeded with 5381, wrapping on overflow. Used by the
//! default key hashing of the unordered containers.

const SEED: u64 = 5381;

#[inline]
fn step(hash: u64, byte: u8) -> u64 {
    (hash << 5).wrapping_add(hash).wrapping_add(u64::from(byte))
}

/// Hash an arbitrary byte sequence.
#[inline]
pub fn hash_bytes(data: &[u8]) -> u64 {
    data.iter().fold(SEED, |h, &b| step(h, b))
}

/// Hash the UTF-8 bytes of a string.
#[inline]
pub fn hash_str(s: &str) -> u64 {
    hash_bytes(s.as_bytes())
}
