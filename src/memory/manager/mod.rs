/*!
 * Block-List Memory Manager
 *
 * Fixed-size address space partitioned into an address-ordered chain of
 * blocks, each either owned by one process or free.
 *
 * ## Placement
 *
 * - **First fit**: walk from the head and take the first free block that is
 *   large enough. Stops as soon as one is found.
 * - **Best fit**: walk the whole chain and take the smallest free block that
 *   is large enough. Ties go to the block nearest the head.
 *
 * Either way the chosen block is split when it is larger than the request;
 * the remainder becomes a new free block right after it.
 *
 * ## Invariants
 *
 * - The chain is never empty and covers the address space exactly
 * - Blocks are contiguous and ordered by start unit
 * - No two neighbouring blocks are both free (coalescing runs on every free)
 * - A process owns at most one block
 *
 * ## Statistics
 *
 * Every allocation reports how many blocks it searched. Counters for
 * successes, denials, search cost and fragment samples are kept per
 * manager so two strategies can be compared on the same workload.
 */

mod allocator;
mod layout;
mod placement;
mod stats;

use super::block::{Block, BlockArena, BlockId};
use super::traits::{Allocator, MemoryInfo};
use super::types::{MemoryError, MemoryResult, MemoryStats, Owner, Strategy};
use crate::core::types::{Pid, Units};
use log::info;
use stats::AllocationCounters;

/// Block-list memory manager
#[derive(Debug)]
pub struct BlockManager {
    strategy: Strategy,
    total_units: Units,
    arena: BlockArena,
    head: BlockId,
    counters: AllocationCounters,
}

impl BlockManager {
    /// Create a manager whose whole address space is one free block
    pub fn new(strategy: Strategy, total_units: Units) -> MemoryResult<Self> {
        if total_units == 0 {
            return Err(MemoryError::ZeroCapacity);
        }

        let mut arena = BlockArena::new();
        let head = arena.insert(Block::new(0, total_units, Owner::Free));

        info!(
            "{} memory manager initialized with {} units",
            strategy, total_units
        );

        Ok(Self {
            strategy,
            total_units,
            arena,
            head,
            counters: AllocationCounters::default(),
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn total_units(&self) -> Units {
        self.total_units
    }
}

// Implement trait interfaces
impl Allocator for BlockManager {
    fn allocate(&mut self, pid: Pid, units: Units) -> MemoryResult<usize> {
        BlockManager::allocate(self, pid, units)
    }

    fn deallocate(&mut self, pid: Pid) -> MemoryResult<()> {
        BlockManager::deallocate(self, pid)
    }

    fn fragment_count(&self) -> usize {
        BlockManager::fragment_count(self)
    }

    fn record_fragment_sample(&mut self) {
        BlockManager::record_fragment_sample(self)
    }
}

impl MemoryInfo for BlockManager {
    fn strategy(&self) -> Strategy {
        BlockManager::strategy(self)
    }

    fn avg_nodes_visited(&self) -> f64 {
        BlockManager::avg_nodes_visited(self)
    }

    fn avg_fragments(&self) -> f64 {
        BlockManager::avg_fragments(self)
    }

    fn denial_percentage(&self) -> f64 {
        BlockManager::denial_percentage(self)
    }

    fn stats(&self) -> MemoryStats {
        BlockManager::stats(self)
    }
}
