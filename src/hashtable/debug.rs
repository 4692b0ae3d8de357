//! Structural checks for troubleshooting.

use super::{HashTable, KeyEq, Probe};
use crate::primes;

impl<K, P, Q: KeyEq<K>> HashTable<K, P, Q> {
    /// Verify table integrity - returns list of issues found.
    ///
    /// Checks that the capacity is a listed prime, that occupancy stays
    /// below the load factor, that the occupied-slot count matches
    /// [`HashTable::len`], and that every entry is found by probing from its
    /// home slot.
    pub fn verify_integrity(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !primes::CAPACITIES.contains(&self.capacity()) {
            issues.push(format!("capacity {} is not a listed prime", self.capacity()));
        }
        if self.slots.is_empty() {
            if self.len != 0 {
                issues.push(format!("no slots allocated but len() = {}", self.len));
            }
            return issues;
        }
        if self.slots.len() != self.capacity() {
            issues.push(format!(
                "{} slots allocated for capacity {}",
                self.slots.len(),
                self.capacity()
            ));
        }
        if self.len > 0 && self.occupancy() >= self.load_factor {
            issues.push(format!(
                "occupancy {:.3} reached load factor {}",
                self.occupancy(),
                self.load_factor
            ));
        }

        let mut occupied = 0usize;
        for (idx, slot) in self.slots.iter().enumerate() {
            let Some(bucket) = slot else { continue };
            occupied += 1;
            match self.probe(bucket.hash, Some(&bucket.key)) {
                Probe::Found(at) if at == idx => {}
                Probe::Found(at) => {
                    issues.push(format!("slot {idx} duplicates the key in slot {at}"))
                }
                Probe::Vacant(at) => issues.push(format!(
                    "slot {idx} is unreachable: probe stops at empty slot {at}"
                )),
            }
        }
        if occupied == self.slots.len() {
            issues.push("no empty slot left".to_string());
        }
        if occupied != self.len {
            issues.push(format!("{occupied} occupied slots but len() = {}", self.len));
        }

        issues
    }
}
