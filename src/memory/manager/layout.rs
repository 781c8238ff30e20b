/*!
 * Layout Inspection
 * Read-only views of the block chain and structural validation
 */

use super::BlockManager;
use crate::core::types::{Pid, Units};
use crate::memory::types::{BlockView, MemoryError, MemoryResult, Owner};
use std::collections::HashSet;
use std::fmt;

impl BlockManager {
    /// Ordered snapshot of every block
    pub fn blocks(&self) -> Vec<BlockView> {
        self.arena
            .chain(self.head)
            .map(|(_, block)| block.view())
            .collect()
    }

    pub fn block_count(&self) -> usize {
        self.arena.chain(self.head).count()
    }

    pub fn free_units(&self) -> Units {
        self.arena
            .chain(self.head)
            .filter(|(_, block)| block.is_free())
            .map(|(_, block)| block.length)
            .sum()
    }

    /// Length of the largest free block, 0 when memory is full
    pub fn largest_free_block(&self) -> Units {
        self.arena
            .chain(self.head)
            .filter(|(_, block)| block.is_free())
            .map(|(_, block)| block.length)
            .max()
            .unwrap_or(0)
    }

    /// Whether `pid` currently owns a block
    pub fn contains(&self, pid: Pid) -> bool {
        self.arena
            .chain(self.head)
            .any(|(_, block)| block.owner == Owner::Process(pid))
    }

    /// Check every structural invariant of the chain
    pub fn validate(&self) -> MemoryResult<()> {
        let corrupt = |start: Units, reason: String| MemoryError::CorruptionDetected { start, reason };

        let mut expected_start = 0;
        let mut prev_free = false;
        let mut owners = HashSet::new();
        let mut walked = 0;

        for (_, block) in self.arena.chain(self.head) {
            walked += 1;
            if walked > self.arena.len() {
                return Err(corrupt(block.start, "chain contains a cycle".into()));
            }
            if block.length == 0 {
                return Err(corrupt(block.start, "empty block".into()));
            }
            if block.start != expected_start {
                return Err(corrupt(
                    block.start,
                    format!("expected block to start at unit {}", expected_start),
                ));
            }
            match block.owner {
                Owner::Free if prev_free => {
                    return Err(corrupt(block.start, "adjacent free blocks".into()));
                }
                Owner::Process(pid) if !owners.insert(pid) => {
                    return Err(corrupt(block.start, format!("PID {} owns two blocks", pid)));
                }
                _ => {}
            }
            prev_free = block.is_free();
            expected_start = block.end();
        }

        if expected_start != self.total_units {
            return Err(corrupt(
                expected_start,
                format!("blocks cover {} of {} units", expected_start, self.total_units),
            ));
        }
        if walked != self.arena.len() {
            return Err(corrupt(
                expected_start,
                format!("{} blocks unreachable from head", self.arena.len() - walked),
            ));
        }
        Ok(())
    }
}

/// `Memory Layout: [0-2: ALLOC] [3-9: FREE] `
impl fmt::Display for BlockManager {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Memory Layout: ")?;
        for (_, block) in self.arena.chain(self.head) {
            write!(f, "{} ", block.view())?;
        }
        Ok(())
    }
}
