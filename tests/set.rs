// Set integration suite.
//
// Each test documents the behavior verified. The core invariants:
// - Round-trip: inserted items are found until removed.
// - Uniqueness: a duplicate insert is reported and changes nothing.
// - Tombstones: removed items never shadow items further down a chain.
// - Resize: growth and shrink keep membership exact.
use blob_table::{Config, Error, InsertOutcome, RemoveOutcome, Set, DEFAULT_SET_CAPACITY};
use std::hash::{BuildHasher, Hasher};
use test_log::test;

fn int(i: u32) -> [u8; 4] {
    i.to_le_bytes()
}

// Test: the reference scenario over a default-capacity set.
// Verifies: growth past the default, exact len, shrink-safe removal.
#[test]
fn integers_through_growth_and_removal() {
    let mut s = Set::new().unwrap();
    assert_eq!(s.capacity(), DEFAULT_SET_CAPACITY);
    for i in 0..128 {
        assert_eq!(s.insert(int(i)).unwrap(), InsertOutcome::Inserted);
    }
    assert!(s.capacity() > DEFAULT_SET_CAPACITY, "must have grown");
    assert_eq!(s.len(), 128);
    assert!(s.contains(int(64)));
    assert!(!s.contains(int(128)));

    for i in 0..64 {
        assert_eq!(s.remove(int(i)).unwrap(), RemoveOutcome::Removed);
    }
    assert_eq!(s.len(), 64);
    assert!(!s.contains(int(0)));
    assert!(s.contains(int(100)));
}

// Test: round-trip for arbitrary byte strings, including empty.
#[test]
fn insert_contains_remove_round_trip() {
    let mut s = Set::new().unwrap();
    for k in [&b""[..], b"\0", b"a", b"hello", &[0xff; 64][..]] {
        let _ = s.insert(k).unwrap();
        assert!(s.contains(k));
        assert_eq!(s.remove(k).unwrap(), RemoveOutcome::Removed);
        assert!(!s.contains(k));
    }
    assert!(s.is_empty());
}

// Test: duplicate insert is idempotent.
#[test]
fn duplicate_insert_counts_once() {
    let mut s = Set::new().unwrap();
    assert_eq!(s.insert("dup").unwrap(), InsertOutcome::Inserted);
    assert_eq!(s.insert("dup").unwrap(), InsertOutcome::AlreadyPresent);
    assert_eq!(s.len(), 1);
}

#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Test: tombstone transparency.
// Assumes: a constant hasher puts A and B in the same home bucket.
// Verifies: B is found past A's tombstone and A stays gone.
#[test]
fn tombstone_on_probe_path_is_transparent() {
    let mut s = Set::with_hasher(ConstBuildHasher).unwrap();
    let _ = s.insert("A").unwrap();
    let _ = s.remove("A").unwrap();
    let _ = s.insert("B").unwrap();
    assert!(s.contains("B"));
    assert!(!s.contains("A"));

    // B lands on A's old slot; a later C chains after it.
    let _ = s.insert("C").unwrap();
    let _ = s.remove("B").unwrap();
    assert!(s.contains("C"));
    assert_eq!(s.insert("C").unwrap(), InsertOutcome::AlreadyPresent);
    assert_eq!(s.len(), 1);
}

// Test: membership is exact after several doublings.
#[test]
fn resize_preserves_membership() {
    const N: u32 = 5_000;
    let mut s = Set::with_capacity(1).unwrap();
    for i in 0..N {
        let _ = s.insert(int(i)).unwrap();
    }
    assert_eq!(s.len(), N as usize);
    for i in 0..N {
        assert!(s.contains(int(i)), "lost {i}");
    }
    for i in N..2 * N {
        assert!(!s.contains(int(i)), "phantom {i}");
    }
}

// Test: removals down to a quarter halve the table; survivors stay.
#[test]
fn shrink_keeps_survivors() {
    let mut s = Set::new().unwrap();
    for i in 0..1_000 {
        let _ = s.insert(int(i)).unwrap();
    }
    let peak = s.capacity();
    for i in 0..950 {
        let _ = s.remove(int(i)).unwrap();
    }
    assert!(s.capacity() < peak, "expected at least one shrink");
    assert!(s.capacity() >= DEFAULT_SET_CAPACITY);
    for i in 950..1_000 {
        assert!(s.contains(int(i)));
    }
}

#[test]
fn shrink_can_be_disabled() {
    let mut s = Set::with_config(Config::set().shrink(false)).unwrap();
    for i in 0..500 {
        let _ = s.insert(int(i)).unwrap();
    }
    let peak = s.capacity();
    for i in 0..500 {
        let _ = s.remove(int(i)).unwrap();
    }
    assert_eq!(s.capacity(), peak);
    assert!(s.is_empty());
}

#[test]
fn invalid_and_oversized_capacities() {
    assert_eq!(
        Set::with_capacity(0).unwrap_err(),
        Error::InvalidCapacity { capacity: 0 }
    );
    assert_eq!(Set::with_capacity(1 << 60).unwrap_err(), Error::OutOfMemory);
}

// Test: the stateless cursor visits every item exactly once.
#[test]
fn cursor_visits_each_item_once() {
    let mut s = Set::new().unwrap();
    for i in 0..40 {
        let _ = s.insert(int(i)).unwrap();
    }
    let mut seen = Vec::new();
    let mut at = None;
    while let Some((i, item)) = s.next(at) {
        seen.push(u32::from_le_bytes(item.try_into().unwrap()));
        at = Some(i);
    }
    seen.sort_unstable();
    assert_eq!(seen, (0..40).collect::<Vec<_>>());
    assert_eq!((&s).into_iter().count(), 40);
}
