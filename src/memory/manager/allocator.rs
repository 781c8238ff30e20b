/*!
 * Memory Allocator Implementation
 * Allocation, splitting, deallocation and coalescing
 */

use super::placement::Candidate;
use super::BlockManager;
use crate::core::types::{Pid, Units};
use crate::memory::block::{Block, BlockId};
use crate::memory::types::{MemoryError, MemoryResult, Owner};
use log::{debug, trace, warn};

impl BlockManager {
    /// Allocate `units` contiguous units to `pid`
    ///
    /// Returns the number of blocks searched. The caller guarantees `pid`
    /// does not already own a block.
    pub fn allocate(&mut self, pid: Pid, units: Units) -> MemoryResult<usize> {
        if units == 0 {
            warn!("Rejected zero-unit allocation request from PID {}", pid);
            return Err(MemoryError::InvalidRequest { pid, units });
        }

        let Candidate {
            block,
            nodes_visited,
        } = self.select_candidate(units);

        let Some(id) = block else {
            self.counters.record_denial();
            let largest_free = self.largest_free_block();
            debug!(
                "{}: denied {} units for PID {} after searching {} blocks (largest free block: {} units)",
                self.strategy, units, pid, nodes_visited, largest_free
            );
            return Err(MemoryError::Denied {
                requested: units,
                largest_free,
                nodes_visited,
            });
        };

        self.place(id, pid, units);
        self.counters.record_success(nodes_visited);

        debug!(
            "{}: allocated {} units at unit {} for PID {} ({} blocks searched)",
            self.strategy, units, self.arena[id].start, pid, nodes_visited
        );
        Ok(nodes_visited)
    }

    /// Hand a free block to `pid`, splitting off any excess as a new free block
    fn place(&mut self, id: BlockId, pid: Pid, units: Units) {
        let remainder = {
            let block = &mut self.arena[id];
            block.owner = Owner::Process(pid);
            if block.length == units {
                None
            } else {
                let mut rest = Block::new(block.start + units, block.length - units, Owner::Free);
                rest.next = block.next;
                block.length = units;
                Some(rest)
            }
        };

        if let Some(rest) = remainder {
            trace!(
                "Split block: keeping {} units, {} units free at unit {}",
                units,
                rest.length,
                rest.start
            );
            let rest_id = self.arena.insert(rest);
            self.arena[id].next = Some(rest_id);
        }
    }

    /// Free the block owned by `pid` and merge it with free neighbours
    pub fn deallocate(&mut self, pid: Pid) -> MemoryResult<()> {
        let mut prev = None;
        let mut cursor = Some(self.head);

        while let Some(id) = cursor {
            let (owner, next) = {
                let block = &self.arena[id];
                (block.owner, block.next)
            };

            if owner == Owner::Process(pid) {
                let units = self.arena[id].length;
                self.release(prev, id);
                debug!(
                    "{}: deallocated {} units for PID {}",
                    self.strategy, units, pid
                );
                return Ok(());
            }

            prev = Some(id);
            cursor = next;
        }

        debug!("{}: PID {} owns no block", self.strategy, pid);
        Err(MemoryError::NotFound(pid))
    }

    /// Successor is absorbed first, then the (possibly grown) block folds
    /// into a free predecessor. With no free neighbours beforehand this
    /// restores the no-adjacent-free invariant.
    fn release(&mut self, prev: Option<BlockId>, id: BlockId) {
        self.arena[id].owner = Owner::Free;

        if let Some(next_id) = self.arena[id].next {
            if self.arena[next_id].is_free() {
                if let Some(absorbed) = self.arena.remove(next_id) {
                    let block = &mut self.arena[id];
                    block.length += absorbed.length;
                    block.next = absorbed.next;
                    trace!(
                        "Coalesced with successor: block at unit {} now {} units",
                        block.start,
                        block.length
                    );
                }
            }
        }

        if let Some(prev_id) = prev {
            if self.arena[prev_id].is_free() {
                if let Some(absorbed) = self.arena.remove(id) {
                    let block = &mut self.arena[prev_id];
                    block.length += absorbed.length;
                    block.next = absorbed.next;
                    trace!(
                        "Coalesced into predecessor: block at unit {} now {} units",
                        block.start,
                        block.length
                    );
                }
            }
        }
    }
}
