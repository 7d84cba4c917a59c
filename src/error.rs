//! Errors reported by the fallible table API.

use std::collections::TryReserveError;

use thiserror::Error;

/// Reasons a `try_*` table operation can fail. The table is left unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The slot array could not be allocated.
    #[error("failed to allocate slot array: {0}")]
    AllocationFailure(#[from] TryReserveError),

    /// No prime slot count exists for the requested capacity.
    #[error("no slot count available for a base capacity of {0}")]
    CapacityOverflow(usize),

    /// An explicit resize asked for fewer slots than there are live entries.
    #[error("cannot resize to {requested} slots while holding {len} entries")]
    CapacityTooSmall {
        /// Slot count the resize would have produced
        requested: usize,
        /// Live entries in the table
        len: usize,
    },
}
