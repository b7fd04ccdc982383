//! Set: byte-exact membership over the shared table core, plus set
//! algebra built only from insert/remove/contains and iteration.

use crate::config::Config;
use crate::error::{InsertOutcome, RemoveOutcome, Result};
use crate::format::Format;
use crate::hash::DefaultHashBuilder;
use crate::table::{self, RawTable};
use core::fmt;
use core::hash::BuildHasher;

/// Set of owned byte strings.
///
/// Items are deep-copied in; identity is byte equality of the whole
/// item. Iteration follows slot order, not insertion order.
pub struct Set<S = DefaultHashBuilder> {
    table: RawTable<(), S>,
}

impl Set {
    /// Empty set with [`DEFAULT_SET_CAPACITY`](crate::DEFAULT_SET_CAPACITY) slots.
    pub fn new() -> Result<Self> {
        Self::with_config(Config::set())
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_config(Config::set().initial_capacity(capacity))
    }

    pub fn with_config(config: Config) -> Result<Self> {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl<S> Set<S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Result<Self> {
        Self::with_config_and_hasher(Config::set(), hasher)
    }

    pub fn with_config_and_hasher(config: Config, hasher: S) -> Result<Self> {
        Ok(Self {
            table: RawTable::with_config(config, hasher)?,
        })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Number of slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn config(&self) -> Config {
        self.table.config()
    }

    /// Adds a copy of `item`. Returns `AlreadyPresent` without touching
    /// the set when an equal item exists.
    pub fn insert(&mut self, item: impl AsRef<[u8]>) -> Result<InsertOutcome> {
        self.insert_formatted(item, Format::default())
    }

    /// Like [`insert`](Self::insert), remembering how to display the item.
    pub fn insert_formatted(
        &mut self,
        item: impl AsRef<[u8]>,
        format: Format,
    ) -> Result<InsertOutcome> {
        self.table.insert_with(item.as_ref(), format, || Ok(()))
    }

    pub fn remove(&mut self, item: impl AsRef<[u8]>) -> Result<RemoveOutcome> {
        self.table.remove(item.as_ref())
    }

    pub fn contains(&self, item: impl AsRef<[u8]>) -> bool {
        self.table.contains(item.as_ref())
    }

    /// Stateless cursor: the first item in a slot after `after`, with its
    /// slot index. Pass `None` to start. Results are unspecified if the
    /// set is modified between calls.
    pub fn next(&self, after: Option<usize>) -> Option<(usize, &[u8])> {
        self.table.next(after).map(|(i, e)| (i, &*e.key))
    }

    pub fn iter(&self) -> Iter<'_, S> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Removes every item; capacity is kept.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// `true` if every item of `self` is in `other`.
    pub fn is_subset(&self, other: &Set<S>) -> bool {
        self.len() <= other.len() && self.iter().all(|k| other.contains(k))
    }

    pub fn is_disjoint(&self, other: &Set<S>) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        !small.iter().any(|k| large.contains(k))
    }
}

impl<S> Set<S>
where
    S: BuildHasher + Clone,
{
    /// Inserts every item of `other` into `self`.
    ///
    /// The in-place operations work on a staged copy that replaces `self`
    /// only once every step has succeeded; on error `self` is unchanged.
    pub fn unionize(&mut self, other: &Set<S>) -> Result<()> {
        let mut staged = self.try_clone()?;
        for e in other.table.iter() {
            let _ = staged.table.insert_with(&e.key, e.format, || Ok(()))?;
        }
        *self = staged;
        Ok(())
    }

    /// Removes from `self` every item that is not in `other`.
    pub fn intersect(&mut self, other: &Set<S>) -> Result<()> {
        let mut staged = self.try_clone()?;
        for k in self.iter().filter(|k| !other.contains(k)) {
            let _ = staged.table.remove(k)?;
        }
        *self = staged;
        Ok(())
    }

    /// Removes from `self` every item that is in `other`.
    pub fn subtract(&mut self, other: &Set<S>) -> Result<()> {
        let mut staged = self.try_clone()?;
        for k in other.iter() {
            let _ = staged.table.remove(k)?;
        }
        *self = staged;
        Ok(())
    }

    /// Empty set sharing this set's config and hasher.
    fn empty_like(&self) -> Result<Self> {
        Self::with_config_and_hasher(self.config(), self.table.hasher().clone())
    }

    /// Items in `self` or `other`.
    pub fn union(&self, other: &Set<S>) -> Result<Self> {
        let mut out = self.empty_like()?;
        for e in self.table.iter().chain(other.table.iter()) {
            let _ = out.table.insert_with(&e.key, e.format, || Ok(()))?;
        }
        Ok(out)
    }

    /// Items in both `self` and `other`.
    pub fn intersection(&self, other: &Set<S>) -> Result<Self> {
        let mut out = self.empty_like()?;
        for e in other.table.iter().filter(|e| self.contains(&e.key)) {
            let _ = out.table.insert_with(&e.key, e.format, || Ok(()))?;
        }
        Ok(out)
    }

    /// Items in `self` that are not in `other`.
    pub fn difference(&self, other: &Set<S>) -> Result<Self> {
        let mut out = self.empty_like()?;
        for e in self.table.iter().filter(|e| !other.contains(&e.key)) {
            let _ = out.table.insert_with(&e.key, e.format, || Ok(()))?;
        }
        Ok(out)
    }

    /// Deep copy; every item buffer is re-allocated.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            table: self.table.try_clone()?,
        })
    }
}

/// Iterator over the items of a [`Set`], in slot order.
pub struct Iter<'a, S> {
    inner: table::Iter<'a, (), S>,
}

impl<'a, S> Iterator for Iter<'a, S>
where
    S: BuildHasher,
{
    type Item = &'a [u8];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| &*e.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<S: BuildHasher> ExactSizeIterator for Iter<'_, S> {}

impl<'a, S> IntoIterator for &'a Set<S>
where
    S: BuildHasher,
{
    type Item = &'a [u8];
    type IntoIter = Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Membership equality; capacity and slot layout are ignored.
impl<S: BuildHasher> PartialEq for Set<S> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.is_subset(other)
    }
}

impl<S: BuildHasher> Eq for Set<S> {}

impl<S: BuildHasher> fmt::Debug for Set<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<S: BuildHasher> fmt::Display for Set<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (n, e) in self.table.iter().enumerate() {
            if n > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", e.format.render(&e.key))?;
        }
        f.write_str("}")
    }
}
