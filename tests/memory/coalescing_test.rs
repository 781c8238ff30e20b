/*!
 * Coalescing Test
 * Verifies that freed blocks merge with free neighbours in both directions
 */

use fitsim::memory::{BlockManager, BlockView, MemoryError, Owner, Strategy};
use pretty_assertions::assert_eq;

/// Three adjacent 4-unit processes followed by a 4-unit tail process
fn four_blocks(strategy: Strategy) -> BlockManager {
    let mut mgr = BlockManager::new(strategy, 16).unwrap();
    for pid in 1..=4 {
        mgr.allocate(pid, 4).expect("Failed to allocate setup block");
    }
    mgr
}

#[test]
fn test_three_way_merge() {
    for strategy in [Strategy::FirstFit, Strategy::BestFit] {
        let mut mgr = four_blocks(strategy);
        mgr.deallocate(1).unwrap();
        mgr.deallocate(3).unwrap();
        assert_eq!(mgr.block_count(), 4);

        // Both neighbours of P2 are free: one block spanning all three
        mgr.deallocate(2).unwrap();
        assert_eq!(
            mgr.blocks(),
            vec![
                BlockView {
                    start: 0,
                    length: 12,
                    owner: Owner::Free,
                },
                BlockView {
                    start: 12,
                    length: 4,
                    owner: Owner::Process(4),
                },
            ]
        );
        assert!(mgr.validate().is_ok());
    }
}

#[test]
fn test_no_merge_between_occupied_neighbours() {
    let mut mgr = four_blocks(Strategy::FirstFit);
    mgr.deallocate(2).unwrap();
    assert_eq!(
        mgr.to_string(),
        "Memory Layout: [0-3: ALLOC] [4-7: FREE] [8-11: ALLOC] [12-15: ALLOC] "
    );
}

#[test]
fn test_freeing_everything_restores_single_block() {
    let mut mgr = four_blocks(Strategy::BestFit);
    for pid in [3, 1, 4, 2] {
        mgr.deallocate(pid).unwrap();
        assert!(mgr.validate().is_ok());
    }
    assert_eq!(mgr.block_count(), 1);
    assert_eq!(mgr.free_units(), 16);
    assert_eq!(mgr.largest_free_block(), 16);
}

#[test]
fn test_double_deallocation() {
    let mut mgr = four_blocks(Strategy::FirstFit);
    mgr.deallocate(2).unwrap();

    let before = mgr.blocks();
    assert_eq!(mgr.deallocate(2), Err(MemoryError::NotFound(2)));
    assert_eq!(mgr.blocks(), before);
}

#[test]
fn test_freed_space_is_reused_first_fit() {
    let mut mgr = four_blocks(Strategy::FirstFit);
    mgr.deallocate(2).unwrap();

    // Three units fit in P2's old slot and leave a one-unit fragment
    assert_eq!(mgr.allocate(5, 3), Ok(2));
    assert_eq!(mgr.blocks()[1].owner, Owner::Process(5));
    assert_eq!(mgr.blocks()[1].start, 4);
    assert_eq!(mgr.fragment_count(), 1);

    // Freeing P5 folds the fragment back in
    mgr.deallocate(5).unwrap();
    assert_eq!(mgr.fragment_count(), 0);
    assert_eq!(mgr.block_count(), 4);
}
