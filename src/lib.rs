/*!
 * fitsim
 * First-fit vs best-fit block-list allocator simulator
 */

pub mod core;
pub mod memory;
pub mod monitoring;
pub mod simulation;

// Re-exports
pub use crate::core::{ConfigError, Pid, SimulationConfig, Units};
pub use memory::{
    Allocator, BlockManager, BlockView, MemoryError, MemoryInfo, MemoryResult, MemoryStats,
    Owner, Strategy,
};
pub use monitoring::init_tracing;
pub use simulation::{SimulationError, SimulationReport, Simulator};
