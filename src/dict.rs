//! Dict: byte-string keys mapped to byte-string values on the shared
//! table core. Lookup and removal compare the key only.

use crate::config::Config;
use crate::error::{InsertOutcome, RemoveOutcome, Result, UpdateOutcome};
use crate::format::Format;
use crate::hash::DefaultHashBuilder;
use crate::slot::copy_bytes;
use crate::table::{self, Payload, RawTable};
use core::fmt;
use core::hash::BuildHasher;

/// Owned value buffer carried by each dictionary slot.
#[derive(Debug, Clone)]
pub(crate) struct Value {
    bytes: Box<[u8]>,
    format: Format,
}

impl Payload for Value {
    fn try_copy(&self) -> Result<Self> {
        Ok(Self {
            bytes: copy_bytes(&self.bytes)?,
            format: self.format,
        })
    }
}

/// Dictionary from owned byte-string keys to owned byte-string values.
pub struct Dict<S = DefaultHashBuilder> {
    table: RawTable<Value, S>,
}

impl Dict {
    /// Empty dictionary with [`DEFAULT_DICT_CAPACITY`](crate::DEFAULT_DICT_CAPACITY) slots.
    pub fn new() -> Result<Self> {
        Self::with_config(Config::dict())
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_config(Config::dict().initial_capacity(capacity))
    }

    pub fn with_config(config: Config) -> Result<Self> {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl<S> Dict<S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Result<Self> {
        Self::with_config_and_hasher(Config::dict(), hasher)
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

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn config(&self) -> Config {
        self.table.config()
    }

    /// Adds `key -> value` if `key` is absent. An existing key is left
    /// alone and reported as `AlreadyPresent`; use
    /// [`set_value`](Self::set_value) to overwrite.
    pub fn insert(
        &mut self,
        key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> Result<InsertOutcome> {
        self.insert_formatted(key, Format::default(), value, Format::default())
    }

    pub fn insert_formatted(
        &mut self,
        key: impl AsRef<[u8]>,
        key_format: Format,
        value: impl AsRef<[u8]>,
        value_format: Format,
    ) -> Result<InsertOutcome> {
        self.table.insert_with(key.as_ref(), key_format, || {
            Ok(Value {
                bytes: copy_bytes(value.as_ref())?,
                format: value_format,
            })
        })
    }

    /// Replaces the value stored under an existing key. The key buffer
    /// and the value's display format are kept.
    pub fn set_value(
        &mut self,
        key: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
    ) -> Result<UpdateOutcome> {
        let Some(e) = self.table.get_mut(key.as_ref()) else {
            return Ok(UpdateOutcome::NotFound);
        };
        e.value.bytes = copy_bytes(value.as_ref())?;
        Ok(UpdateOutcome::Updated)
    }

    pub fn get_value(&self, key: impl AsRef<[u8]>) -> Option<&[u8]> {
        self.table.get(key.as_ref()).map(|e| &*e.value.bytes)
    }

    pub fn has_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.table.contains(key.as_ref())
    }

    pub fn remove(&mut self, key: impl AsRef<[u8]>) -> Result<RemoveOutcome> {
        self.table.remove(key.as_ref())
    }

    /// Stateless cursor over `(slot, key, value)`; `None` starts the scan.
    /// Results are unspecified if the dictionary changes between calls.
    pub fn next(&self, after: Option<usize>) -> Option<(usize, &[u8], &[u8])> {
        self.table
            .next(after)
            .map(|(i, e)| (i, &*e.key, &*e.value.bytes))
    }

    pub fn iter(&self) -> Iter<'_, S> {
        Iter {
            inner: self.table.iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.iter().map(|(_, v)| v)
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }
}

impl<S> Dict<S>
where
    S: BuildHasher + Clone,
{
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            table: self.table.try_clone()?,
        })
    }
}

/// Iterator over `(key, value)` pairs of a [`Dict`], in slot order.
pub struct Iter<'a, S> {
    inner: table::Iter<'a, Value, S>,
}

impl<'a, S> Iterator for Iter<'a, S>
where
    S: BuildHasher,
{
    type Item = (&'a [u8], &'a [u8]);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| (&*e.key, &*e.value.bytes))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<S: BuildHasher> ExactSizeIterator for Iter<'_, S> {}

impl<'a, S> IntoIterator for &'a Dict<S>
where
    S: BuildHasher,
{
    type Item = (&'a [u8], &'a [u8]);
    type IntoIter = Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: BuildHasher> fmt::Debug for Dict<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<S: BuildHasher> fmt::Display for Dict<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (n, e) in self.table.iter().enumerate() {
            if n > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "{}: {}",
                e.format.render(&e.key),
                e.value.format.render(&e.value.bytes)
            )?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    /// Invariant: `set_value` only updates existing keys.
    #[test]
    fn overwrite_existing_key() {
        let mut d = Dict::new().unwrap();
        assert_eq!(d.insert("a", [1u8]).unwrap(), InsertOutcome::Inserted);
        assert_eq!(d.set_value("a", [2u8]).unwrap(), UpdateOutcome::Updated);
        assert_eq!(d.get_value("a"), Some(&[2u8][..]));
        assert_eq!(d.set_value("missing", [9u8]).unwrap(), UpdateOutcome::NotFound);
        assert!(!d.has_key("missing"));
        assert_eq!(d.len(), 1);
    }

    /// Invariant: `insert` on an existing key keeps the old value.
    #[test]
    fn insert_does_not_overwrite() {
        let mut d = Dict::new().unwrap();
        let _ = d.insert("k", "old").unwrap();
        assert_eq!(d.insert("k", "new").unwrap(), InsertOutcome::AlreadyPresent);
        assert_eq!(d.get_value("k"), Some(&b"old"[..]));
    }

    /// Invariant: identity is the key alone; the value plays no part.
    #[test]
    fn lookup_ignores_value() {
        let mut d = Dict::new().unwrap();
        let _ = d.insert("k", "v1").unwrap();
        assert!(d.has_key("k"));
        assert!(!d.has_key("v1"));
        assert_eq!(d.remove("k").unwrap(), RemoveOutcome::Removed);
        assert_eq!(d.get_value("k"), None);
    }

    #[test]
    fn empty_value_is_not_absence() {
        let mut d = Dict::new().unwrap();
        let _ = d.insert("k", b"").unwrap();
        assert_eq!(d.get_value("k"), Some(&b""[..]));
    }

    #[test]
    fn values_survive_growth() {
        let mut d = Dict::with_capacity(2).unwrap();
        for i in 0u64..100 {
            let _ = d.insert(i.to_le_bytes(), (i * 10).to_le_bytes()).unwrap();
        }
        assert!(d.capacity() >= 128);
        for i in 0u64..100 {
            assert_eq!(d.get_value(i.to_le_bytes()), Some(&(i * 10).to_le_bytes()[..]));
        }
        let mut keys: Vec<_> = d.keys().map(<[u8]>::to_vec).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 100);
        assert_eq!(d.values().count(), 100);
    }

    #[test]
    fn cursor_yields_pairs() {
        let mut d = Dict::new().unwrap();
        let _ = d.insert("k", "v").unwrap();
        let (i, k, v) = d.next(None).unwrap();
        assert_eq!((k, v), (&b"k"[..], &b"v"[..]));
        assert!(d.next(Some(i)).is_none());
    }

    #[test]
    fn display_uses_both_formats() {
        let mut d = Dict::new().unwrap();
        let _ = d
            .insert_formatted("a", Format::Utf8, 1u32.to_le_bytes(), Format::U32)
            .unwrap();
        assert_eq!(d.to_string(), "{\"a\": 1}");
        let _ = d.set_value("a", 5u32.to_le_bytes()).unwrap();
        assert_eq!(d.to_string(), "{\"a\": 5}");
    }

    #[test]
    fn try_clone_copies_values() {
        let mut d = Dict::new().unwrap();
        let _ = d.insert("a", "1").unwrap();
        let mut c = d.try_clone().unwrap();
        let _ = c.set_value("a", "2").unwrap();
        assert_eq!(d.get_value("a"), Some(&b"1"[..]));
        assert_eq!(c.get_value("a"), Some(&b"2"[..]));
    }
}
