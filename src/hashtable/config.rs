//! Hash table configuration.

use crate::error::{Error, Result};
use crate::primes;

/// Occupancy ratio at which the table grows, unless configured otherwise.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.8;

/// Configuration for a [`HashTable`](super::HashTable).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Occupied/capacity ratio that must not be reached. In `(0, 1]`.
    pub load_factor: f64,
    /// Number of entries the first slot array should hold without growing.
    /// `0` starts at the smallest prime capacity.
    pub initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            load_factor: DEFAULT_LOAD_FACTOR,
            initial_capacity: 0,
        }
    }
}

impl Config {
    /// Override the load factor.
    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Override the initial capacity hint.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Reject out-of-range parameters.
    ///
    /// The load factor must lie in `(0, 1]` and leave room for at least one
    /// entry in some capacity of [`primes::CAPACITIES`].
    pub fn validate(&self) -> Result<()> {
        if !(self.load_factor > 0.0 && self.load_factor <= 1.0)
            || primes::capacity_index_for(1, self.load_factor).is_none()
        {
            return Err(Error::invalid_load_factor(self.load_factor));
        }
        Ok(())
    }

    /// Index into [`primes::CAPACITIES`] of the first slot array.
    pub(crate) fn growth_index(&self) -> Result<usize> {
        self.validate()?;
        primes::capacity_index_for(self.initial_capacity, self.load_factor).ok_or_else(|| {
            Error::configuration(format!(
                "initial capacity {} exceeds the largest table",
                self.initial_capacity
            ))
        })
    }
}
