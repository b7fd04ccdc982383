#![cfg(test)]

// Property tests for the table core, kept inside the crate so they can
// observe slot capacity alongside the public surface.

use crate::{Config, Dict, InsertOutcome, RemoveOutcome, Set, UpdateOutcome};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, u8),
    SetValue(usize, u8),
    Remove(usize),
    Contains(Vec<u8>),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<Vec<u8>>, Vec<OpI>)> {
    proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..6), 1..=40).prop_flat_map(
        |pool| {
            let idxs: Vec<usize> = (0..pool.len()).collect();
            let idx = proptest::sample::select(idxs);
            let contains_pool = proptest::sample::select(pool.clone());
            let op = prop_oneof![
                3 => (idx.clone(), any::<u8>()).prop_map(|(i, v)| OpI::Insert(i, v)),
                1 => (idx.clone(), any::<u8>()).prop_map(|(i, v)| OpI::SetValue(i, v)),
                2 => idx.clone().prop_map(OpI::Remove),
                1 => prop_oneof![
                    contains_pool,
                    proptest::collection::vec(any::<u8>(), 0..6)
                ]
                .prop_map(OpI::Contains),
                1 => Just(OpI::Iterate),
            ];
            proptest::collection::vec(op, 1..200).prop_map(move |ops| (pool.clone(), ops))
        },
    )
}

// Collision variant using a constant hasher: every key shares one home
// bucket, so every lookup walks the full probe chain through tombstones.
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

fn run_dict<S: BuildHasher>(
    mut sut: Dict<S>,
    pool: &[Vec<u8>],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Vec<u8>, u8> = HashMap::new();
    let min_cap = sut.capacity();
    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let already = model.contains_key(k);
                match sut.insert(k, [v]).unwrap() {
                    InsertOutcome::Inserted => {
                        prop_assert!(!already);
                        model.insert(k.clone(), v);
                    }
                    InsertOutcome::AlreadyPresent => prop_assert!(already),
                }
            }
            OpI::SetValue(i, v) => {
                let k = &pool[i];
                match sut.set_value(k, [v]).unwrap() {
                    UpdateOutcome::Updated => {
                        let mv = model.get_mut(k);
                        prop_assert!(mv.is_some(), "updated a key the model lacks");
                        if let Some(mv) = mv {
                            *mv = v;
                        }
                    }
                    UpdateOutcome::NotFound => prop_assert!(!model.contains_key(k)),
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let expected = if model.remove(k).is_some() {
                    RemoveOutcome::Removed
                } else {
                    RemoveOutcome::NotFound
                };
                prop_assert_eq!(sut.remove(k).unwrap(), expected);
            }
            OpI::Contains(k) => {
                prop_assert_eq!(sut.has_key(&k), model.contains_key(&k));
                prop_assert_eq!(sut.get_value(&k), model.get(&k).map(std::slice::from_ref));
            }
            OpI::Iterate => {
                let s: BTreeSet<(Vec<u8>, Vec<u8>)> =
                    sut.iter().map(|(k, v)| (k.to_vec(), v.to_vec())).collect();
                let m: BTreeSet<(Vec<u8>, Vec<u8>)> =
                    model.iter().map(|(k, v)| (k.clone(), vec![*v])).collect();
                prop_assert_eq!(s, m);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert!(sut.len() < sut.capacity());
        prop_assert!(sut.capacity() >= min_cap);
        prop_assert_eq!(sut.capacity() % min_cap, 0);
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `insert` never overwrites; `AlreadyPresent` only when the model has the key.
// - `set_value` only touches existing keys.
// - `remove` reports `Removed` iff the model held the key.
// - Lookups never see removed keys through tombstones.
// - `len` parity, `len < capacity`, capacity stays a multiple of the start.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_dict_state_machine((pool, ops) in arb_scenario()) {
        let sut = Dict::with_config(Config::dict().initial_capacity(4)).unwrap();
        run_dict(sut, &pool, ops)?;
    }

    #[test]
    fn prop_dict_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut = Dict::with_config_and_hasher(Config::dict().initial_capacity(2), ConstBuildHasher).unwrap();
        run_dict(sut, &pool, ops)?;
    }
}

fn arb_members() -> impl Strategy<Value = HashSet<Vec<u8>>> {
    proptest::collection::hash_set(proptest::collection::vec(0u8..8, 0..3), 0..40)
}

fn build(items: &HashSet<Vec<u8>>) -> Set {
    let mut s = Set::with_capacity(4).unwrap();
    for k in items {
        let _ = s.insert(k).unwrap();
    }
    s
}

fn members(s: &Set) -> HashSet<Vec<u8>> {
    s.iter().map(<[u8]>::to_vec).collect()
}

// Property: set algebra agrees with std::collections::HashSet, and each
// in-place operation matches its allocating counterpart.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_set_algebra_laws(a in arb_members(), b in arb_members()) {
        let (sa, sb) = (build(&a), build(&b));

        let u = sa.union(&sb).unwrap();
        prop_assert_eq!(members(&u), a.union(&b).cloned().collect::<HashSet<_>>());

        let i = sa.intersection(&sb).unwrap();
        prop_assert_eq!(members(&i), a.intersection(&b).cloned().collect::<HashSet<_>>());

        let d = sa.difference(&sb).unwrap();
        prop_assert_eq!(members(&d), a.difference(&b).cloned().collect::<HashSet<_>>());

        let mut x = sa.try_clone().unwrap();
        x.unionize(&sb).unwrap();
        prop_assert!(x == u);

        let mut x = sa.try_clone().unwrap();
        x.intersect(&sb).unwrap();
        prop_assert!(x == i);

        let mut x = sa.try_clone().unwrap();
        x.subtract(&sb).unwrap();
        prop_assert!(x == d);

        prop_assert_eq!(sa.is_subset(&sb), a.is_subset(&b));
        prop_assert_eq!(sa.is_disjoint(&sb), a.is_disjoint(&b));
    }

    // Property: keys never inserted are never found, whatever mix of
    // growth, shrink and tombstones preceded the lookup.
    #[test]
    fn prop_no_false_positives(
        inserted in proptest::collection::hash_set(any::<u16>(), 0..300),
        removed_every in 1usize..5,
        probes in proptest::collection::vec(any::<u16>(), 0..100),
    ) {
        let mut s = Set::with_capacity(2).unwrap();
        for k in &inserted {
            let _ = s.insert(k.to_le_bytes()).unwrap();
        }
        let mut live: HashSet<u16> = inserted.clone();
        for k in inserted.iter().step_by(removed_every) {
            let _ = s.remove(k.to_le_bytes()).unwrap();
            live.remove(k);
        }
        for p in probes {
            prop_assert_eq!(s.contains(p.to_le_bytes()), live.contains(&p));
        }
        prop_assert_eq!(s.len(), live.len());
    }
}
