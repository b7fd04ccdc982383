//! RawTable: the open-addressing core shared by `Set` and `Dict`.
//!
//! Layout
//! - A flat `Vec<Slot<V>>`; the home bucket of a key is
//!   `hash % capacity` and collisions probe linearly with wraparound.
//! - Every probe is bounded by `capacity` steps, so a table whose free
//!   slots are all tombstones still terminates.
//!
//! Probe rules
//! - Search stops at the first `Empty` slot, skips `Tombstone`s and
//!   compares occupied slots on the cached hash, then the key bytes.
//! - Insert runs the search rule first; only when the key is absent does
//!   it take the first free slot (tombstone or empty) on the path.
//!
//! Growth and shrink
//! - Grow (double) before placing an item when `len + 1 >= capacity`,
//!   so `len < capacity` always holds.
//! - Shrink (halve) after a removal leaves `len <= capacity / 4`, never
//!   below the configured initial capacity.
//! - Every resize allocates the new slot array first and only then moves
//!   entries over. An allocation failure returns `Err` with the table
//!   untouched. Tombstones never survive a resize.

use crate::config::Config;
use crate::error::{Error, InsertOutcome, RemoveOutcome, Result};
use crate::format::Format;
use crate::slot::{copy_bytes, empty_slots, Entry, Slot};
use core::hash::{BuildHasher, Hasher};

/// Per-item payload stored next to the key.
pub(crate) trait Payload: Sized {
    /// Fallible deep copy, used by `try_clone`.
    fn try_copy(&self) -> Result<Self>;
}

impl Payload for () {
    fn try_copy(&self) -> Result<Self> {
        Ok(())
    }
}

/// Result of walking a probe sequence for one key.
enum Probe {
    Found(usize),
    /// Key absent; first reusable slot on the path, if any.
    Vacant(Option<usize>),
}

pub(crate) struct RawTable<V, S> {
    hasher: S,
    slots: Vec<Slot<V>>,
    len: usize,
    min_capacity: usize,
    shrink: bool,
}

impl<V, S> RawTable<V, S>
where
    S: BuildHasher,
{
    pub(crate) fn with_config(config: Config, hasher: S) -> Result<Self> {
        if config.initial_capacity == 0 {
            return Err(Error::InvalidCapacity { capacity: 0 });
        }
        Ok(Self {
            hasher,
            slots: empty_slots(config.initial_capacity)?,
            len: 0,
            min_capacity: config.initial_capacity,
            shrink: config.shrink,
        })
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn config(&self) -> Config {
        Config {
            initial_capacity: self.min_capacity,
            shrink: self.shrink,
        }
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hasher
    }

    fn make_hash(&self, key: &[u8]) -> u64 {
        let mut h = self.hasher.build_hasher();
        h.write(key);
        h.finish()
    }

    /// Bucket indices visited for `hash`, home bucket first.
    #[inline]
    fn probe_seq(&self, hash: u64) -> impl Iterator<Item = usize> {
        let cap = self.slots.len();
        let home = (hash % cap as u64) as usize;
        (0..cap).map(move |i| (home + i) % cap)
    }

    fn probe(&self, hash: u64, key: &[u8]) -> Probe {
        let mut reusable = None;
        for i in self.probe_seq(hash) {
            match &self.slots[i] {
                Slot::Empty => return Probe::Vacant(reusable.or(Some(i))),
                Slot::Tombstone => {
                    if reusable.is_none() {
                        reusable = Some(i);
                    }
                }
                Slot::Occupied(e) if e.matches(hash, key) => return Probe::Found(i),
                Slot::Occupied(_) => {}
            }
        }
        Probe::Vacant(reusable)
    }

    fn find_hashed(&self, hash: u64, key: &[u8]) -> Option<usize> {
        match self.probe(hash, key) {
            Probe::Found(i) => Some(i),
            Probe::Vacant(_) => None,
        }
    }

    /// Index of the slot holding `key`.
    pub(crate) fn find(&self, key: &[u8]) -> Option<usize> {
        self.find_hashed(self.make_hash(key), key)
    }

    pub(crate) fn contains(&self, key: &[u8]) -> bool {
        self.find(key).is_some()
    }

    pub(crate) fn get(&self, key: &[u8]) -> Option<&Entry<V>> {
        let i = self.find(key)?;
        self.slots[i].entry()
    }

    pub(crate) fn get_mut(&mut self, key: &[u8]) -> Option<&mut Entry<V>> {
        let i = self.find(key)?;
        match &mut self.slots[i] {
            Slot::Occupied(e) => Some(e),
            _ => None,
        }
    }

    /// Inserts `key` unless it is already present.
    ///
    /// `make_value` runs only when the key is absent. Everything that can
    /// fail (key copy, value construction, growth) happens before the
    /// table is modified.
    pub(crate) fn insert_with<F>(
        &mut self,
        key: &[u8],
        format: Format,
        make_value: F,
    ) -> Result<InsertOutcome>
    where
        F: FnOnce() -> Result<V>,
    {
        let hash = self.make_hash(key);
        let vacant = match self.probe(hash, key) {
            Probe::Found(_) => return Ok(InsertOutcome::AlreadyPresent),
            Probe::Vacant(v) => v,
        };

        let entry = Entry {
            hash,
            key: copy_bytes(key)?,
            format,
            value: make_value()?,
        };

        let idx = if self.len + 1 >= self.capacity() {
            let grown = self
                .capacity()
                .checked_mul(2)
                .ok_or(Error::OutOfMemory)?;
            self.resize(grown)?;
            self.vacant_slot(hash)
        } else {
            vacant.expect("len < capacity leaves a free slot on every probe path")
        };

        if matches!(self.slots[idx], Slot::Tombstone) {
            log::trace!("reusing tombstone at {idx}");
        }
        self.slots[idx] = Slot::Occupied(entry);
        self.len += 1;
        self.debug_check();
        Ok(InsertOutcome::Inserted)
    }

    /// First free slot on the probe path of `hash`. Only used when the key
    /// is known to be absent.
    fn vacant_slot(&self, hash: u64) -> usize {
        self.probe_seq(hash)
            .find(|&i| self.slots[i].is_free())
            .expect("len < capacity leaves a free slot on every probe path")
    }

    /// Removes `key`, halving the table when occupancy drops to a quarter.
    pub(crate) fn remove(&mut self, key: &[u8]) -> Result<RemoveOutcome> {
        let Some(idx) = self.find(key) else {
            return Ok(RemoveOutcome::NotFound);
        };

        let cap = self.capacity();
        let remaining = self.len - 1;
        if self.shrink && remaining <= cap / 4 && cap / 2 >= self.min_capacity {
            self.rebuild(cap / 2, Some(idx)).inspect_err(|_| {
                log::trace!("shrink to {} could not be allocated", cap / 2);
            })?;
        } else {
            self.slots[idx] = Slot::Tombstone;
        }
        self.len = remaining;
        self.debug_check();
        Ok(RemoveOutcome::Removed)
    }

    /// Rehashes every live item into `new_capacity` slots.
    pub(crate) fn resize(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity <= self.len {
            return Err(Error::InvalidCapacity {
                capacity: new_capacity,
            });
        }
        self.rebuild(new_capacity, None)
    }

    /// Moves all entries into a freshly allocated array, dropping the one
    /// at `skip`. Does not touch `len`.
    fn rebuild(&mut self, new_capacity: usize, skip: Option<usize>) -> Result<()> {
        let fresh = empty_slots(new_capacity)?;
        log::debug!(
            "resizing table {} -> {} slots ({} items)",
            self.capacity(),
            new_capacity,
            self.len
        );

        let old = std::mem::replace(&mut self.slots, fresh);
        for (i, slot) in old.into_iter().enumerate() {
            if let Slot::Occupied(e) = slot {
                if Some(i) == skip {
                    continue;
                }
                let to = self.vacant_slot(e.hash);
                self.slots[to] = Slot::Occupied(e);
            }
        }
        Ok(())
    }

    /// Drops every item; capacity is kept.
    pub(crate) fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.len = 0;
    }

    /// First occupied slot strictly after `after` (`None` starts at 0).
    pub(crate) fn next(&self, after: Option<usize>) -> Option<(usize, &Entry<V>)> {
        let start = after.map_or(0, |i| i.saturating_add(1));
        self.slots
            .iter()
            .enumerate()
            .skip(start)
            .find_map(|(i, s)| s.entry().map(|e| (i, e)))
    }

    pub(crate) fn iter(&self) -> Iter<'_, V, S> {
        Iter {
            table: self,
            cursor: None,
            remaining: self.len,
        }
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert!(self.len < self.capacity(), "len must stay below capacity");
        debug_assert_eq!(
            self.len,
            self.slots.iter().filter(|s| !s.is_free()).count(),
            "len disagrees with occupied slots"
        );
    }
}

impl<V, S> RawTable<V, S>
where
    V: Payload,
    S: BuildHasher + Clone,
{
    /// Deep copy that reports allocation failure. Slot positions,
    /// tombstones included, are preserved.
    pub(crate) fn try_clone(&self) -> Result<Self> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(self.slots.len())?;
        for slot in &self.slots {
            slots.push(match slot {
                Slot::Empty => Slot::Empty,
                Slot::Tombstone => Slot::Tombstone,
                Slot::Occupied(e) => Slot::Occupied(Entry {
                    hash: e.hash,
                    key: copy_bytes(&e.key)?,
                    format: e.format,
                    value: e.value.try_copy()?,
                }),
            });
        }
        Ok(Self {
            hasher: self.hasher.clone(),
            slots,
            len: self.len,
            min_capacity: self.min_capacity,
            shrink: self.shrink,
        })
    }
}

/// Iterator over live entries in slot order.
pub(crate) struct Iter<'a, V, S> {
    table: &'a RawTable<V, S>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, V, S> Iterator for Iter<'a, V, S>
where
    S: BuildHasher,
{
    type Item = &'a Entry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let (i, e) = self.table.next(self.cursor)?;
        self.cursor = Some(i);
        self.remaining -= 1;
        Some(e)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V, S: BuildHasher> ExactSizeIterator for Iter<'_, V, S> {}
