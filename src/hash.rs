//! DJB2 variant used to place keys. Fast and deterministic; not meant to
//! resist adversarial input.

use core::hash::{BuildHasherDefault, Hasher};

const DJB2_SEED: u64 = 5381;

/// Hashes a byte span. The span length is folded into the seed.
#[inline]
pub fn hash_bytes(data: &[u8]) -> u64 {
    let seed = DJB2_SEED.wrapping_mul(data.len() as u64);
    mix(seed, data)
}

#[inline]
fn mix(mut hash: u64, data: &[u8]) -> u64 {
    for &b in data {
        hash = (hash << 5).wrapping_add(hash).wrapping_add(u64::from(b));
    }
    hash
}

/// [`Hasher`] form of [`hash_bytes`].
///
/// The first `write` seeds the state from its own length, so a single
/// `write(k)` followed by `finish()` equals `hash_bytes(k)`. Later writes
/// keep mixing into the same state.
#[derive(Debug, Default, Clone, Copy)]
pub struct Djb2Hasher {
    state: Option<u64>,
}

impl Hasher for Djb2Hasher {
    fn finish(&self) -> u64 {
        self.state.unwrap_or(0)
    }

    fn write(&mut self, bytes: &[u8]) {
        let start = self
            .state
            .unwrap_or_else(|| DJB2_SEED.wrapping_mul(bytes.len() as u64));
        self.state = Some(mix(start, bytes));
    }
}

/// Hasher builder used when a table is not given one explicitly.
pub type DefaultHashBuilder = BuildHasherDefault<Djb2Hasher>;

#[cfg(test)]
mod tests {
    use super::*;
    use core::hash::BuildHasher;

    #[test]
    fn empty_span_hashes_to_zero() {
        assert_eq!(hash_bytes(&[]), 0);
    }

    #[test]
    fn single_byte_matches_formula() {
        // seed = 5381 * 1, then seed * 33 + b
        assert_eq!(hash_bytes(b"a"), 5381 * 33 + u64::from(b'a'));
    }

    #[test]
    fn length_is_part_of_the_seed() {
        assert_ne!(hash_bytes(&[0]), hash_bytes(&[0, 0]));
    }

    /// Invariant: one `write` through the builder equals `hash_bytes`.
    #[test]
    fn hasher_matches_free_function() {
        let b = DefaultHashBuilder::default();
        for key in [&b""[..], b"x", b"hello world", &[0xff; 300][..]] {
            let mut h = b.build_hasher();
            h.write(key);
            assert_eq!(h.finish(), hash_bytes(key));
        }
    }

    #[test]
    fn long_input_wraps_without_panicking() {
        let data = vec![0xffu8; 1 << 16];
        let _ = hash_bytes(&data);
    }
}
