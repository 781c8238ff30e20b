/*!
 * Simulation Module
 * Randomized workload, multi-allocator driver and result reporting
 */

pub mod driver;
pub mod report;
pub mod workload;

use crate::core::ConfigError;
use crate::memory::MemoryError;
use miette::Diagnostic;
use thiserror::Error;

// Re-export for convenience
pub use driver::{AllocationOutcome, Simulator};
pub use report::{ReportError, SeriesPoint, SimulationReport, StrategySample};
pub use workload::{Request, WorkloadGenerator};

/// Simulation errors
#[derive(Error, Debug, Diagnostic)]
pub enum SimulationError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Report(#[from] ReportError),
}
