//! blob-table: open-addressing Set and Dictionary over owned byte strings.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one collision-resolution, growth and tombstone-deletion
//!   algorithm, specialized twice.
//! - Layers:
//!   - RawTable<V, S>: flat slot array with linear probing. Owns the
//!     probe rules, insert/remove/search and every resize. `V` is the
//!     per-slot payload.
//!   - Set<S>: RawTable<(), S>; identity is the whole item. Adds union,
//!     intersection, difference and their in-place forms, written only in
//!     terms of insert/remove/contains and iteration.
//!   - Dict<S>: RawTable<Value, S>; identity is the key, the value buffer
//!     rides along and can be replaced with `set_value`.
//!
//! Constraints
//! - Single-threaded, no internal locking. `&mut self` serializes
//!   mutation; a stateless `next(after)` cursor is offered as well as
//!   borrowing iterators, and its results are unspecified if the table
//!   changes between calls.
//! - Each table exclusively owns deep copies of the bytes it was given.
//! - `len < capacity` at all times; capacity only doubles or halves.
//!
//! Failure boundaries
//! - Allocation failure is reported as `Error::OutOfMemory` and leaves
//!   the table exactly as it was: every buffer and slot array is
//!   allocated before anything is modified.
//! - Operation results (`Inserted`, `AlreadyPresent`, `Removed`,
//!   `NotFound`, `Updated`) are returned in `Ok`, never as errors.
//!
//! Hasher and rehashing invariants
//! - Keys are hashed with one raw `write(&bytes)` into `S::Hasher`
//!   (DJB2 by default). Each entry caches its `u64` hash; resizing
//!   reuses it and never calls the hasher again.
//!
//! Notes and non-goals
//! - The hash is not collision-resistant; do not feed adversarial keys.
//! - Iteration order is slot order, not insertion order.
//! - Nothing is persisted.

mod config;
mod dict;
mod error;
mod format;
pub mod hash;
mod set;
mod slot;
mod table;
mod table_proptest;

// Public surface
pub use config::{Config, DEFAULT_DICT_CAPACITY, DEFAULT_SET_CAPACITY};
pub use dict::Dict;
pub use error::{Error, InsertOutcome, RemoveOutcome, Result, UpdateOutcome};
pub use format::Format;
pub use hash::{hash_bytes, DefaultHashBuilder};
pub use set::Set;

pub mod iter {
    //! Borrowing iterators.
    pub use crate::dict::Iter as DictIter;
    pub use crate::set::Iter as SetIter;
}
