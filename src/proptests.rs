#![cfg(test)]

// Model-based property tests: every operation is mirrored on a std
// collection and the two must agree after each step.

use core::hash::BuildHasher;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::vec::Vec;

use proptest::prelude::*;

use crate::Config;
use crate::HashMap;
use crate::HashSet;
use crate::probe::ProbeStrategy;
use crate::test_util::IdentityState;
use crate::test_util::SipHashBuilder;

#[derive(Clone, Debug)]
enum Op {
    Insert(u64, u32),
    Remove(u64),
    Get(u64),
    Retain(u64),
    Clear,
}

// Keys are drawn from a small range so removals and upserts hit live keys,
// and the identity hasher piles them into long collision chains.
fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0u64..64, any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        4 => (0u64..64).prop_map(Op::Remove),
        3 => (0u64..64).prop_map(Op::Get),
        1 => (2u64..5).prop_map(Op::Retain),
        1 => Just(Op::Clear),
    ]
}

fn arb_config() -> impl Strategy<Value = Config> {
    (
        prop_oneof![Just(ProbeStrategy::Linear), Just(ProbeStrategy::DoubleHash)],
        50u8..=90,
        10u8..=40,
        prop_oneof![Just(1usize), Just(8), Just(32)],
    )
        .prop_map(|(strategy, grow, compact, min)| {
            Config::new()
                .with_probe_strategy(strategy)
                .with_grow_threshold(grow)
                .with_compact_threshold(compact)
                .with_min_capacity(min)
        })
}

fn run_against_model<S: BuildHasher>(
    mut sut: HashMap<u64, u32, S>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: BTreeMap<u64, u32> = BTreeMap::new();

    for op in ops {
        match op {
            Op::Insert(k, v) => {
                prop_assert_eq!(sut.insert(k, v), model.insert(k, v));
            }
            Op::Remove(k) => {
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
            }
            Op::Get(k) => {
                prop_assert_eq!(sut.get(&k), model.get(&k));
            }
            Op::Retain(m) => {
                sut.retain(|k, _| k % m != 0);
                model.retain(|k, _| k % m != 0);
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        sut.validate();
    }

    let mut seen: Vec<(u64, u32)> = sut.iter().map(|(k, v)| (*k, *v)).collect();
    seen.sort_unstable();
    let expected: Vec<(u64, u32)> = model.into_iter().collect();
    prop_assert_eq!(seen, expected);

    Ok(())
}

fn collect_unique<'a>(iter: impl Iterator<Item = &'a u32>) -> Result<BTreeSet<u32>, TestCaseError> {
    let mut out = BTreeSet::new();
    for v in iter {
        prop_assert!(out.insert(*v), "duplicate {} yielded", v);
    }
    Ok(out)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn prop_map_matches_model_sip(
        config in arb_config(),
        ops in proptest::collection::vec(arb_op(), 1..200),
    ) {
        let sut = HashMap::with_config_and_hasher(0, config, SipHashBuilder::default());
        run_against_model(sut, ops)?;
    }

    #[test]
    fn prop_map_matches_model_identity(
        config in arb_config(),
        ops in proptest::collection::vec(arb_op(), 1..200),
    ) {
        let sut = HashMap::with_config_and_hasher(0, config, IdentityState::default());
        run_against_model(sut, ops)?;
    }

    #[test]
    fn prop_set_algebra_matches_model(
        a in proptest::collection::btree_set(0u32..100, 0..40),
        b in proptest::collection::btree_set(0u32..100, 0..40),
    ) {
        let sa: HashSet<u32, SipHashBuilder> = a.iter().copied().collect();
        let sb: HashSet<u32, SipHashBuilder> = b.iter().copied().collect();

        prop_assert_eq!(collect_unique(sa.union(&sb))?, a.union(&b).copied().collect::<BTreeSet<_>>());
        prop_assert_eq!(
            collect_unique(sa.intersection(&sb))?,
            a.intersection(&b).copied().collect::<BTreeSet<_>>()
        );
        prop_assert_eq!(
            collect_unique(sa.difference(&sb))?,
            a.difference(&b).copied().collect::<BTreeSet<_>>()
        );
        prop_assert_eq!(
            collect_unique(sa.symmetric_difference(&sb))?,
            a.symmetric_difference(&b).copied().collect::<BTreeSet<_>>()
        );

        prop_assert_eq!(sa.is_subset(&sb), a.is_subset(&b));
        prop_assert_eq!(sa.is_disjoint(&sb), a.is_disjoint(&b));
    }
}
