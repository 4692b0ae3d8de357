//! Error handling for the container engines.
//!
//! Lookups that miss are not errors: `has`/`get`/`del` report them through
//! `bool` or `Option`. The variants below cover the few ways a structural
//! operation can be rejected before it touches any shared state.

use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Growing the node arena or a slot array failed.
    #[error("Memory allocation failed: requested {requested} elements")]
    OutOfMemory {
        /// Number of elements the failed reservation asked for
        requested: usize,
    },

    /// The hash table is already at the last prime in its capacity table.
    #[error("Capacity exhausted: cannot grow past {capacity} slots")]
    CapacityExhausted {
        /// Capacity at the time growth was requested
        capacity: usize,
    },

    /// Load factor outside `(0, 1]`.
    #[error("Invalid load factor: {load_factor}")]
    InvalidLoadFactor {
        /// The rejected value
        load_factor: f64,
    },

    /// Any other rejected construction parameter.
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl Error {
    /// Create an out of memory error
    pub fn out_of_memory(requested: usize) -> Self {
        Self::OutOfMemory { requested }
    }

    /// Create a capacity exhausted error
    pub fn capacity_exhausted(capacity: usize) -> Self {
        Self::CapacityExhausted { capacity }
    }

    /// Create an invalid load factor error
    pub fn invalid_load_factor(load_factor: f64) -> Self {
        Self::InvalidLoadFactor { load_factor }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::OutOfMemory { .. } => "memory",
            Self::CapacityExhausted { .. } => "capacity",
            Self::InvalidLoadFactor { .. } | Self::Configuration { .. } => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::out_of_memory(64).to_string(),
            "Memory allocation failed: requested 64 elements"
        );
        assert_eq!(
            Error::capacity_exhausted(7).to_string(),
            "Capacity exhausted: cannot grow past 7 slots"
        );
        assert_eq!(
            Error::invalid_load_factor(1.5).to_string(),
            "Invalid load factor: 1.5"
        );
        assert_eq!(
            Error::configuration("bad").to_string(),
            "Invalid configuration: bad"
        );
    }

    #[test]
    fn test_category() {
        assert_eq!(Error::out_of_memory(1).category(), "memory");
        assert_eq!(Error::capacity_exhausted(3).category(), "capacity");
        assert_eq!(Error::invalid_load_factor(0.0).category(), "config");
        assert_eq!(Error::configuration("x").category(), "config");
    }
}
