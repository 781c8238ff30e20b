/*!
 * Memory Module
 * Block-list allocation with first-fit and best-fit placement
 */

pub mod block;
pub mod manager;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use manager::BlockManager;
pub use traits::*;
pub use types::*;
