/*!
 * Block Arena
 * Address-ordered block chain stored in an index-addressed arena
 */

use super::types::{BlockView, Owner};
use crate::core::types::Units;
use std::ops::{Index, IndexMut};

/// Stable handle to a block slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(usize);

/// Contiguous run of units with a single owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub start: Units,
    pub length: Units,
    pub owner: Owner,
    pub next: Option<BlockId>,
}

impl Block {
    pub fn new(start: Units, length: Units, owner: Owner) -> Self {
        Self {
            start,
            length,
            owner,
            next: None,
        }
    }

    /// One past the last unit covered
    pub fn end(&self) -> Units {
        self.start + self.length
    }

    pub fn is_free(&self) -> bool {
        self.owner.is_free()
    }

    pub fn view(&self) -> BlockView {
        BlockView {
            start: self.start,
            length: self.length,
            owner: self.owner,
        }
    }
}

/// Slot storage for blocks
///
/// Released slots are reused by later insertions, so ids stay small and
/// the arena never grows beyond the peak block count.
#[derive(Debug, Default)]
pub struct BlockArena {
    slots: Vec<Option<Block>>,
    vacant: Vec<usize>,
}

impl BlockArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, block: Block) -> BlockId {
        match self.vacant.pop() {
            Some(slot) => {
                self.slots[slot] = Some(block);
                BlockId(slot)
            }
            None => {
                self.slots.push(Some(block));
                BlockId(self.slots.len() - 1)
            }
        }
    }

    /// Release a slot, returning the block it held
    pub fn remove(&mut self, id: BlockId) -> Option<Block> {
        let block = self.slots.get_mut(id.0)?.take()?;
        self.vacant.push(id.0);
        Some(block)
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.slots.get(id.0)?.as_ref()
    }

    /// Live blocks
    pub fn len(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Walk the chain starting at `head` in address order
    pub fn chain(&self, head: BlockId) -> Chain<'_> {
        Chain {
            arena: self,
            cursor: Some(head),
        }
    }
}

/// Panics if `id` refers to a released slot.
impl Index<BlockId> for BlockArena {
    type Output = Block;

    fn index(&self, id: BlockId) -> &Block {
        match self.slots.get(id.0) {
            Some(Some(block)) => block,
            _ => panic!("stale block id {}", id.0),
        }
    }
}

impl IndexMut<BlockId> for BlockArena {
    fn index_mut(&mut self, id: BlockId) -> &mut Block {
        match self.slots.get_mut(id.0) {
            Some(Some(block)) => block,
            _ => panic!("stale block id {}", id.0),
        }
    }
}

/// Iterator over `(id, block)` pairs following `next` links
pub struct Chain<'a> {
    arena: &'a BlockArena,
    cursor: Option<BlockId>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = (BlockId, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let arena = self.arena;
        let block = arena.get(id)?;
        self.cursor = block.next;
        Some((id, block))
    }
}
