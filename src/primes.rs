//! Prime capacities for the hash table.
//!
//! Each entry is the largest prime below a power of two, so successive
//! capacities roughly double.

/// Ascending slot counts the hash table grows through.
pub const CAPACITIES: [usize; 30] = [
    3,
    7,
    13,
    31,
    61,
    127,
    251,
    509,
    1021,
    2039,
    4093,
    8191,
    16381,
    32749,
    65521,
    131071,
    262139,
    524287,
    1048573,
    2097143,
    4194301,
    8388593,
    16777213,
    33554393,
    67108859,
    134217689,
    268435399,
    536870909,
    1073741789,
    2147483647,
];

/// Trial division primality test.
pub fn is_prime(x: u64) -> bool {
    if x < 2 {
        return false;
    }
    if x < 4 {
        return true;
    }
    if x % 2 == 0 {
        return false;
    }
    let mut i = 3u64;
    while i <= x / i {
        if x % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// Smallest prime `>= x`.
pub fn next_prime(x: u64) -> u64 {
    if x <= 2 {
        return 2;
    }
    let mut candidate = x | 1;
    while !is_prime(candidate) {
        candidate += 2;
    }
    candidate
}

/// Index of the first capacity able to hold `entries` while staying strictly
/// below `load_factor`. `None` when even the largest capacity is too small.
pub fn capacity_index_for(entries: usize, load_factor: f64) -> Option<usize> {
    CAPACITIES
        .iter()
        .position(|&cap| (entries as f64) < load_factor * cap as f64)
}
