/*!
 * Placement Strategies
 * Candidate block selection for first-fit and best-fit
 */

use super::BlockManager;
use crate::core::types::Units;
use crate::memory::block::BlockId;
use crate::memory::types::Strategy;

/// Outcome of one search over the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Candidate {
    pub block: Option<BlockId>,
    pub nodes_visited: usize,
}

impl BlockManager {
    /// Pick the free block to place `units` in, according to the strategy
    pub(super) fn select_candidate(&self, units: Units) -> Candidate {
        match self.strategy {
            Strategy::FirstFit => self.find_first_fit(units),
            Strategy::BestFit => self.find_best_fit(units),
        }
    }

    fn find_first_fit(&self, units: Units) -> Candidate {
        let mut nodes_visited = 0;

        for (id, block) in self.arena.chain(self.head) {
            nodes_visited += 1;
            if block.is_free() && block.length >= units {
                return Candidate {
                    block: Some(id),
                    nodes_visited,
                };
            }
        }

        Candidate {
            block: None,
            nodes_visited,
        }
    }

    /// Always scans the full chain; strict `<` keeps the first of equal sizes
    fn find_best_fit(&self, units: Units) -> Candidate {
        let mut nodes_visited = 0;
        let mut best: Option<(BlockId, Units)> = None;

        for (id, block) in self.arena.chain(self.head) {
            nodes_visited += 1;
            if !block.is_free() || block.length < units {
                continue;
            }
            let better = match best {
                Some((_, best_len)) => block.length < best_len,
                None => true,
            };
            if better {
                best = Some((id, block.length));
            }
        }

        Candidate {
            block: best.map(|(id, _)| id),
            nodes_visited,
        }
    }
}
