/*!
 * Block List Invariant Tests
 * Random operation sequences must never break the partition of the address space
 */

use fitsim::memory::{BlockManager, MemoryError, Owner, Strategy as Placement};
use fitsim::Pid;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Allocate(usize),
    /// Free the live process at this index (modulo the live count)
    Free(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1usize..=12).prop_map(Op::Allocate),
        any::<usize>().prop_map(Op::Free),
    ]
}

fn placement() -> impl Strategy<Value = Placement> {
    prop_oneof![Just(Placement::FirstFit), Just(Placement::BestFit)]
}

fn check_partition(mgr: &BlockManager, total: usize) {
    let blocks = mgr.blocks();
    let mut expected_start = 0;
    for pair in blocks.windows(2) {
        assert!(
            !(pair[0].owner.is_free() && pair[1].owner.is_free()),
            "adjacent free blocks: {}",
            mgr
        );
    }
    for block in &blocks {
        assert_eq!(block.start, expected_start, "gap or overlap: {}", mgr);
        assert!(block.length >= 1);
        expected_start += block.length;
    }
    assert_eq!(expected_start, total);

    let small_holes = blocks
        .iter()
        .filter(|b| b.owner.is_free() && (b.length == 1 || b.length == 2))
        .count();
    assert_eq!(mgr.fragment_count(), small_holes);
    assert!(mgr.validate().is_ok());
}

proptest! {
    #[test]
    fn prop_operations_preserve_invariants(
        strategy in placement(),
        total in 8usize..=128,
        ops in prop::collection::vec(op(), 1..200),
    ) {
        let mut mgr = BlockManager::new(strategy, total).unwrap();
        let mut live: Vec<Pid> = Vec::new();
        let mut next_pid: Pid = 0;

        for op in ops {
            match op {
                Op::Allocate(units) => {
                    let pid = next_pid;
                    next_pid += 1;
                    let before = mgr.blocks();
                    let largest = mgr.largest_free_block();

                    match mgr.allocate(pid, units) {
                        Ok(nodes) => {
                            prop_assert!(units <= largest);
                            prop_assert!(nodes >= 1 && nodes <= before.len());
                            let owned = mgr
                                .blocks()
                                .into_iter()
                                .find(|b| b.owner == Owner::Process(pid));
                            prop_assert_eq!(owned.map(|b| b.length), Some(units));
                            live.push(pid);
                        }
                        Err(MemoryError::Denied { largest_free, .. }) => {
                            prop_assert!(units > largest);
                            prop_assert_eq!(largest_free, largest);
                            prop_assert_eq!(mgr.blocks(), before);
                        }
                        Err(other) => {
                            prop_assert!(false, "unexpected error {:?}", other);
                        }
                    }
                }
                Op::Free(selector) => {
                    if live.is_empty() {
                        prop_assert_eq!(mgr.deallocate(next_pid), Err(MemoryError::NotFound(next_pid)));
                        continue;
                    }
                    let pid = live.remove(selector % live.len());
                    let free_before = mgr.free_units();
                    mgr.deallocate(pid).unwrap();
                    prop_assert!(!mgr.contains(pid));
                    prop_assert!(mgr.free_units() > free_before);
                }
            }
            check_partition(&mgr, total);
        }

        for pid in &live {
            prop_assert!(mgr.contains(*pid));
        }
    }

    #[test]
    fn prop_observation_is_idempotent(
        strategy in placement(),
        sizes in prop::collection::vec(1usize..=10, 1..30),
    ) {
        let mut mgr = BlockManager::new(strategy, 64).unwrap();
        for (pid, units) in sizes.into_iter().enumerate() {
            let _ = mgr.allocate(pid as Pid, units);
            if pid % 3 == 0 {
                let _ = mgr.deallocate(pid as Pid);
            }
        }

        prop_assert_eq!(mgr.fragment_count(), mgr.fragment_count());
        prop_assert_eq!(mgr.stats(), mgr.stats());
        prop_assert_eq!(mgr.to_string(), mgr.to_string());
    }
}
