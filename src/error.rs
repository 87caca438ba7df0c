//! Error taxonomy for packing operations.
//!
//! Running out of time is not an error: a search that hits its budget
//! returns the best packing it has, with
//! [`StopReason::TimeBudget`](crate::hyper::StopReason::TimeBudget).

use thiserror::Error;

/// Errors raised by decoders, the orchestrator and the batch driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackingError {
    /// An item is larger than the bin capacity, so no conforming packing
    /// exists for this instance.
    #[error("item of size {item} exceeds bin capacity {capacity}")]
    InfeasibleInstance { item: u64, capacity: u64 },

    /// Bin capacity must be positive.
    #[error("bin capacity must be positive")]
    InvalidCapacity,

    /// A packing does not contain exactly the input items.
    ///
    /// This is a bug in a decoder or the improver, never a property of the
    /// instance.
    #[error("packing holds {found} items (total size {found_size}), expected {expected} items (total size {expected_size}) with identical sizes")]
    ConservationViolation {
        expected: usize,
        expected_size: u64,
        found: usize,
        found_size: u64,
    },

    /// A bin's load exceeds capacity. Also a bug, never an instance property.
    #[error("bin {bin} has load {load} above capacity {capacity}")]
    CapacityViolation { bin: usize, load: u64, capacity: u64 },

    /// The search configuration was rejected by `validate()`.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Checks capacity and item sizes before any bin is built.
pub(crate) fn check_feasible(items: &[u64], capacity: u64) -> Result<(), PackingError> {
    if capacity == 0 {
        return Err(PackingError::InvalidCapacity);
    }
    match items.iter().copied().find(|&item| item > capacity) {
        Some(item) => Err(PackingError::InfeasibleInstance { item, capacity }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feasible_ok() {
        assert!(check_feasible(&[1, 10, 3], 10).is_ok());
        assert!(check_feasible(&[], 1).is_ok());
    }

    #[test]
    fn test_reports_first_oversized_item() {
        let err = check_feasible(&[3, 12, 15], 10).unwrap_err();
        assert_eq!(
            err,
            PackingError::InfeasibleInstance {
                item: 12,
                capacity: 10
            }
        );
    }

    #[test]
    fn test_zero_capacity() {
        assert_eq!(
            check_feasible(&[], 0).unwrap_err(),
            PackingError::InvalidCapacity
        );
    }

    #[test]
    fn test_display() {
        let err = PackingError::InfeasibleInstance {
            item: 11,
            capacity: 10,
        };
        assert_eq!(err.to_string(), "item of size 11 exceeds bin capacity 10");
    }
}
