//! Error and outcome types shared by every table.
//!
//! Outcomes (`Inserted`, `AlreadyPresent`, ...) are ordinary results of
//! an operation. `Error` is reserved for calls that could not run at
//! all; a call that returns `Err` has left the table unchanged.

use std::collections::TryReserveError;
use thiserror::Error;

/// Failure of a table operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Allocating a slot array or copying a key/value buffer failed.
    #[error("out of memory")]
    OutOfMemory,

    /// A table was requested with an unusable capacity.
    #[error("invalid capacity {capacity}, must be at least 1")]
    InvalidCapacity { capacity: usize },
}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Self::OutOfMemory
    }
}

/// Crate result
pub type Result<T> = std::result::Result<T, Error>;

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyPresent,
}

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
}
