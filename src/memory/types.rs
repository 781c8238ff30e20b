/*!
 * Memory Types
 * Common types for the block-list allocator
 */

use crate::core::types::{Pid, Units};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
///
/// All of these are ordinary outcomes reported to the caller; none of them
/// leave the allocator in a modified state except where noted.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum MemoryError {
    #[error("Invalid request: PID {pid} asked for {units} units")]
    #[diagnostic(
        code(memory::invalid_request),
        help("Allocation requests must be for at least one unit.")
    )]
    InvalidRequest { pid: Pid, units: Units },

    #[error("Allocation denied: requested {requested} units, largest free block is {largest_free} units ({nodes_visited} blocks searched)")]
    #[diagnostic(
        code(memory::denied),
        help("No free block is large enough. Free memory may be fragmented.")
    )]
    Denied {
        requested: Units,
        largest_free: Units,
        nodes_visited: usize,
    },

    #[error("PID {0} does not own any block")]
    #[diagnostic(
        code(memory::not_found),
        help("The process may never have been allocated, or was already freed.")
    )]
    NotFound(Pid),

    #[error("Address space must contain at least one unit")]
    #[diagnostic(code(memory::zero_capacity))]
    ZeroCapacity,

    #[error("Block list corruption detected at unit {start}: {reason}")]
    #[diagnostic(code(memory::corruption))]
    CorruptionDetected { start: Units, reason: String },
}

impl MemoryError {
    /// Denials are expected under load and are counted, not escalated
    pub fn is_denied(&self) -> bool {
        matches!(self, MemoryError::Denied { .. })
    }
}

/// Placement policy, fixed for an allocator's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    FirstFit,
    BestFit,
}

impl Strategy {
    /// Compact identifier used as a key in result files
    pub fn key(&self) -> &'static str {
        match self {
            Strategy::FirstFit => "FirstFit",
            Strategy::BestFit => "BestFit",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Strategy::FirstFit => write!(f, "First Fit"),
            Strategy::BestFit => write!(f, "Best Fit"),
        }
    }
}

/// Who holds a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    Free,
    Process(Pid),
}

impl Owner {
    pub fn is_free(&self) -> bool {
        matches!(self, Owner::Free)
    }

    pub fn pid(&self) -> Option<Pid> {
        match self {
            Owner::Free => None,
            Owner::Process(pid) => Some(*pid),
        }
    }
}

/// Read-only copy of one block, as handed out to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockView {
    pub start: Units,
    pub length: Units,
    pub owner: Owner,
}

impl BlockView {
    /// Last unit covered by the block (inclusive)
    pub fn end(&self) -> Units {
        self.start + self.length - 1
    }
}

impl std::fmt::Display for BlockView {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let tag = if self.owner.is_free() { "FREE" } else { "ALLOC" };
        write!(f, "[{}-{}: {}]", self.start, self.end(), tag)
    }
}

/// Allocator statistics snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub strategy: Strategy,
    pub total_units: Units,
    pub free_units: Units,
    pub block_count: usize,
    pub successful_allocations: u64,
    pub denied_allocations: u64,
    pub total_nodes_visited: u64,
    pub fragment_samples: u64,
    pub avg_nodes_visited: f64,
    pub avg_fragments: f64,
    pub denial_percentage: f64,
}
