//! # Counter Invariant Properties
//!
//! Random traces over small geometries, checked against the accounting
//! invariants every run must satisfy.

use std::collections::HashSet;

use csim_core::common::AddressLayout;
use csim_core::sim::{DispatchReport, Simulator};
use csim_core::trace::{TraceOp, TraceRecord};
use proptest::prelude::*;

use crate::common::harness::geometry;

fn op() -> impl Strategy<Value = TraceOp> {
    prop_oneof![
        Just(TraceOp::Ignore),
        Just(TraceOp::Load),
        Just(TraceOp::Store),
        Just(TraceOp::Modify),
    ]
}

fn record() -> impl Strategy<Value = TraceRecord> {
    (op(), 0u64..0x400, 1u32..9).prop_map(|(op, address, size)| TraceRecord::new(op, address, size))
}

/// Geometry plus an access sequence touching at most `E` distinct blocks per set.
fn fitting_trace() -> impl Strategy<Value = (u32, usize, u32, Vec<u64>)> {
    (0u32..3, 1usize..5, 0u32..3)
        .prop_flat_map(|(s, e, b)| {
            let tags = prop::collection::vec(prop::collection::hash_set(0u64..64, 0..=e), 1 << s);
            let picks = prop::collection::vec((any::<prop::sample::Index>(), 0u64..(1 << b)), 0..100);
            (Just(s), Just(e), Just(b), tags, picks)
        })
        .prop_map(|(s, e, b, tags, picks)| {
            let layout = AddressLayout::new(s, b);
            let blocks: Vec<(u64, usize)> = tags
                .iter()
                .enumerate()
                .flat_map(|(set, set_tags)| set_tags.iter().map(move |&tag| (tag, set)))
                .collect();
            let addrs = if blocks.is_empty() {
                Vec::new()
            } else {
                picks
                    .iter()
                    .map(|(pick, offset)| {
                        let (tag, set) = blocks[pick.index(blocks.len())];
                        layout.block_base(tag, set) | offset
                    })
                    .collect()
            };
            (s, e, b, addrs)
        })
}

proptest! {
    #[test]
    fn prop_counters_match_sub_accesses(
        s in 0u32..4,
        e in 1usize..5,
        b in 0u32..4,
        records in prop::collection::vec(record(), 0..200),
    ) {
        let mut sim = Simulator::new(&geometry(s, e, b)).unwrap();
        for r in &records {
            let _ = sim.dispatch(r);
        }
        let stats = sim.stats();
        let expected: u64 = records.iter().map(|r| r.op.accesses()).sum();

        prop_assert_eq!(stats.hits + stats.misses, expected);
        prop_assert!(stats.evictions <= stats.misses);
        prop_assert_eq!(sim.trace_stats().records, records.len() as u64);
    }

    #[test]
    fn prop_no_evictions_when_working_set_fits(
        (s, e, b, addrs) in fitting_trace(),
    ) {
        let layout = AddressLayout::new(s, b);
        let mut tags_per_set = vec![HashSet::new(); 1 << s];
        for &a in &addrs {
            let d = layout.decompose(a);
            let _ = tags_per_set[d.set_index].insert(d.tag);
        }
        prop_assert!(tags_per_set.iter().all(|t| t.len() <= e));

        let mut sim = Simulator::new(&geometry(s, e, b)).unwrap();
        for &a in &addrs {
            let _ = sim.access(a);
        }
        prop_assert_eq!(sim.stats().evictions, 0);
        prop_assert_eq!(sim.stats().accesses(), addrs.len() as u64);
    }

    #[test]
    fn prop_first_touch_of_block_misses(
        s in 0u32..3,
        e in 1usize..4,
        b in 0u32..3,
        addrs in prop::collection::vec(0u64..0x200, 1..100),
    ) {
        let layout = AddressLayout::new(s, b);
        let mut seen = HashSet::new();
        let mut sim = Simulator::new(&geometry(s, e, b)).unwrap();
        for &a in &addrs {
            let outcome = sim.access(a);
            let d = layout.decompose(a);
            if seen.insert((d.tag, d.set_index)) {
                prop_assert!(outcome.is_miss());
            }
        }
    }

    #[test]
    fn prop_modify_second_half_always_hits(
        s in 0u32..3,
        e in 1usize..3,
        b in 0u32..3,
        records in prop::collection::vec(record(), 1..100),
    ) {
        let mut sim = Simulator::new(&geometry(s, e, b)).unwrap();
        for r in &records {
            if let DispatchReport::Modify { store, .. } = sim.dispatch(r) {
                prop_assert!(store.is_hit());
            }
        }
    }

    #[test]
    fn prop_ignore_records_are_neutral(
        records in prop::collection::vec(record(), 0..100),
    ) {
        let config = geometry(1, 2, 1);
        let mut with_fetches = Simulator::new(&config).unwrap();
        let mut without = Simulator::new(&config).unwrap();
        for r in &records {
            let _ = with_fetches.dispatch(r);
            let _ = with_fetches.dispatch(&TraceRecord::new(TraceOp::Ignore, r.address ^ 0x55, 4));
            if r.op != TraceOp::Ignore {
                let _ = without.dispatch(r);
            }
        }
        prop_assert_eq!(with_fetches.stats(), without.stats());
    }

    #[test]
    fn prop_decomposition_recombines(
        s in 0u32..20,
        b in 0u32..20,
        addr in any::<u64>(),
    ) {
        let layout = AddressLayout::new(s, b);
        let d = layout.decompose(addr);
        prop_assert_eq!(layout.block_base(d.tag, d.set_index) | d.block_offset, addr);
        prop_assert_eq!(layout.decompose(addr), d);
    }
}
