//! Buckets of the open-addressing table.

use crate::error::Result;
use crate::format::Format;
#[cfg(test)]
use core::cell::Cell;

/// Live item: the owned key, its cached hash and the per-table payload
/// (`()` for a set, the value buffer for a dictionary).
#[derive(Debug, Clone)]
pub(crate) struct Entry<V> {
    pub(crate) hash: u64,
    pub(crate) key: Box<[u8]>,
    pub(crate) format: Format,
    pub(crate) value: V,
}

impl<V> Entry<V> {
    #[inline]
    pub(crate) fn matches(&self, hash: u64, key: &[u8]) -> bool {
        self.hash == hash && *self.key == *key
    }
}

/// One bucket. A tombstone keeps probe chains running through a slot
/// whose item was removed; it is never carried across a resize.
#[derive(Debug, Clone, Default)]
pub(crate) enum Slot<V> {
    #[default]
    Empty,
    Tombstone,
    Occupied(Entry<V>),
}

impl<V> Slot<V> {
    #[inline]
    pub(crate) fn entry(&self) -> Option<&Entry<V>> {
        match self {
            Slot::Occupied(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn is_free(&self) -> bool {
        !matches!(self, Slot::Occupied(_))
    }
}

/// Deep-copies caller bytes into an owned buffer, reporting allocation
/// failure instead of aborting.
pub(crate) fn copy_bytes(src: &[u8]) -> Result<Box<[u8]>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(src.len())?;
    buf.extend_from_slice(src);
    Ok(buf.into_boxed_slice())
}

/// Allocates `capacity` empty slots.
pub(crate) fn empty_slots<V>(capacity: usize) -> Result<Vec<Slot<V>>> {
    #[cfg(test)]
    {
        if capacity > SLOT_LIMIT.with(Cell::get) {
            return Err(crate::error::Error::OutOfMemory);
        }
    }
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize_with(capacity, Slot::default);
    Ok(slots)
}

#[cfg(test)]
thread_local! {
    static SLOT_LIMIT: Cell<usize> = const { Cell::new(usize::MAX) };
}

/// Runs `f` with slot-array allocations above `limit` failing as out of
/// memory on this thread.
#[cfg(test)]
pub(crate) fn with_slot_limit<R>(limit: usize, f: impl FnOnce() -> R) -> R {
    let prev = SLOT_LIMIT.with(|l| l.replace(limit));
    let out = f();
    SLOT_LIMIT.with(|l| l.set(prev));
    out
}
