/*!
 * Memory Traits
 * Allocator abstractions used by the workload driver
 */

use super::types::*;
use crate::core::types::{Pid, Units};

/// Process-keyed allocator interface
pub trait Allocator: Send {
    /// Give `units` contiguous units to `pid`, returning blocks searched
    fn allocate(&mut self, pid: Pid, units: Units) -> MemoryResult<usize>;

    /// Release whatever `pid` holds
    fn deallocate(&mut self, pid: Pid) -> MemoryResult<()>;

    /// Number of free holes too small to be useful
    fn fragment_count(&self) -> usize;

    /// Accumulate the current fragment count for averaging
    fn record_fragment_sample(&mut self);
}

/// Statistics provider
pub trait MemoryInfo {
    /// Placement policy the allocator runs
    fn strategy(&self) -> Strategy;

    /// Average blocks searched per successful allocation
    fn avg_nodes_visited(&self) -> f64;

    /// Average fragment count per recorded sample
    fn avg_fragments(&self) -> f64;

    /// Share of allocation requests that were denied, in percent
    fn denial_percentage(&self) -> f64;

    /// Full statistics snapshot
    fn stats(&self) -> MemoryStats;
}
