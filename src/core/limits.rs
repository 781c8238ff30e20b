/*!
 * Simulation Limits and Constants
 *
 * Centralized location for the reference configuration and every
 * threshold used by the allocator and the workload driver.
 * Organized by domain; the engine itself never reads these directly,
 * they only seed `SimulationConfig::default()`.
 */

// =============================================================================
// ADDRESS SPACE
// =============================================================================

/// Total simulated memory (256 KB split into 2 KB units)
pub const DEFAULT_TOTAL_UNITS: usize = 128;

/// Size of one allocation unit in kilobytes
/// Only used for reporting; the engine works in abstract units
pub const UNIT_SIZE_KB: usize = 2;

/// Free blocks of this length or shorter count as external fragments
pub const SMALL_FRAGMENT_MAX: usize = 2;

// =============================================================================
// WORKLOAD
// =============================================================================

/// Number of requests generated per simulation run
pub const DEFAULT_NUM_REQUESTS: usize = 10_000;

/// Smallest allocation request in units
pub const DEFAULT_MIN_REQUEST: usize = 3;

/// Largest allocation request in units
pub const DEFAULT_MAX_REQUEST: usize = 10;

/// Chance that a request is an allocation rather than a deallocation
pub const DEFAULT_ALLOCATE_PROBABILITY: f64 = 0.5;

// =============================================================================
// REPORTING
// =============================================================================

/// Record a time-series point every N requests
pub const DEFAULT_SERIES_INTERVAL: usize = 100;

/// Log progress every N requests
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1_000;

/// Final statistics file (key: value lines)
pub const RESULTS_FILE: &str = "simulation_results.txt";

/// Time series CSV file
pub const SERIES_FILE: &str = "fragmentation_data.txt";

/// Full run report as JSON
pub const REPORT_JSON_FILE: &str = "simulation_results.json";
