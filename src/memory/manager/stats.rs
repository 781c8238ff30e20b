/*!
 * Allocation Statistics
 * Running counters and the averages derived from them
 */

use super::BlockManager;
use crate::core::limits::SMALL_FRAGMENT_MAX;
use crate::memory::types::MemoryStats;
use log::trace;

/// Counters accumulated over the lifetime of a manager
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct AllocationCounters {
    pub successful: u64,
    pub denied: u64,
    pub nodes_visited: u64,
    pub fragment_total: u64,
    pub fragment_samples: u64,
}

impl AllocationCounters {
    pub fn record_success(&mut self, nodes_visited: usize) {
        self.successful += 1;
        self.nodes_visited += nodes_visited as u64;
    }

    pub fn record_denial(&mut self) {
        self.denied += 1;
    }

    pub fn record_fragments(&mut self, fragments: usize) {
        self.fragment_total += fragments as u64;
        self.fragment_samples += 1;
    }

    pub fn avg_nodes_visited(&self) -> f64 {
        ratio(self.nodes_visited, self.successful)
    }

    pub fn avg_fragments(&self) -> f64 {
        ratio(self.fragment_total, self.fragment_samples)
    }

    pub fn denial_percentage(&self) -> f64 {
        ratio(self.denied, self.denied + self.successful) * 100.0
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl BlockManager {
    /// Count free blocks of one or two units
    pub fn fragment_count(&self) -> usize {
        self.arena
            .chain(self.head)
            .filter(|(_, block)| block.is_free() && block.length <= SMALL_FRAGMENT_MAX)
            .count()
    }

    /// Add the current fragment count to the running average
    pub fn record_fragment_sample(&mut self) {
        let fragments = self.fragment_count();
        self.counters.record_fragments(fragments);
        trace!(
            "{}: fragment sample {} = {}",
            self.strategy,
            self.counters.fragment_samples,
            fragments
        );
    }

    pub fn avg_nodes_visited(&self) -> f64 {
        self.counters.avg_nodes_visited()
    }

    pub fn avg_fragments(&self) -> f64 {
        self.counters.avg_fragments()
    }

    pub fn denial_percentage(&self) -> f64 {
        self.counters.denial_percentage()
    }

    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            strategy: self.strategy,
            total_units: self.total_units,
            free_units: self.free_units(),
            block_count: self.block_count(),
            successful_allocations: self.counters.successful,
            denied_allocations: self.counters.denied,
            total_nodes_visited: self.counters.nodes_visited,
            fragment_samples: self.counters.fragment_samples,
            avg_nodes_visited: self.avg_nodes_visited(),
            avg_fragments: self.avg_fragments(),
            denial_percentage: self.denial_percentage(),
        }
    }
}
