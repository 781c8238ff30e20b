/*!
 * Simulation Configuration
 *
 * Defaults come from `core::limits`; `from_env` overlays environment
 * variables so a run can be tuned without recompiling:
 * - FITSIM_TOTAL_UNITS: address space size in units
 * - FITSIM_REQUESTS: number of generated requests
 * - FITSIM_MIN_REQUEST / FITSIM_MAX_REQUEST: request size bounds
 * - FITSIM_SEED: workload seed (random when unset)
 * - FITSIM_OUTPUT_DIR: where result files are written
 */

use super::limits::{
    DEFAULT_ALLOCATE_PROBABILITY, DEFAULT_MAX_REQUEST, DEFAULT_MIN_REQUEST,
    DEFAULT_NUM_REQUESTS, DEFAULT_PROGRESS_INTERVAL, DEFAULT_SERIES_INTERVAL,
    DEFAULT_TOTAL_UNITS, UNIT_SIZE_KB,
};
use super::types::Units;
use crate::memory::Strategy;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Diagnostic)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {name}")]
    #[diagnostic(
        code(config::invalid_env),
        help("Environment overrides must parse as the field's numeric type.")
    )]
    InvalidEnv { name: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    #[diagnostic(code(config::zero_value))]
    ZeroValue(&'static str),

    #[error("Request bounds inverted: min {min} > max {max}")]
    #[diagnostic(code(config::inverted_bounds))]
    InvertedBounds { min: Units, max: Units },

    #[error("Largest request ({max} units) exceeds the address space ({total} units)")]
    #[diagnostic(
        code(config::request_too_large),
        help("No allocation of that size could ever succeed. Lower FITSIM_MAX_REQUEST.")
    )]
    RequestTooLarge { max: Units, total: Units },

    #[error("Allocation probability {0} is outside [0, 1]")]
    #[diagnostic(code(config::probability))]
    InvalidProbability(f64),

    #[error("At least one allocation strategy is required")]
    #[diagnostic(code(config::no_strategies))]
    NoStrategies,

    #[error("Strategy {0} listed more than once")]
    #[diagnostic(code(config::duplicate_strategy))]
    DuplicateStrategy(Strategy),
}

/// Everything the driver needs to run one comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub total_units: Units,
    pub unit_size_kb: usize,
    pub num_requests: usize,
    pub min_request: Units,
    pub max_request: Units,
    pub allocate_probability: f64,
    pub series_interval: usize,
    pub progress_interval: usize,
    pub strategies: Vec<Strategy>,
    pub seed: Option<u64>,
    pub output_dir: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            total_units: DEFAULT_TOTAL_UNITS,
            unit_size_kb: UNIT_SIZE_KB,
            num_requests: DEFAULT_NUM_REQUESTS,
            min_request: DEFAULT_MIN_REQUEST,
            max_request: DEFAULT_MAX_REQUEST,
            allocate_probability: DEFAULT_ALLOCATE_PROBABILITY,
            series_interval: DEFAULT_SERIES_INTERVAL,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            strategies: vec![Strategy::FirstFit, Strategy::BestFit],
            seed: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl SimulationConfig {
    /// Defaults overlaid with any FITSIM_* environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(total) = env_override("FITSIM_TOTAL_UNITS")? {
            config.total_units = total;
        }
        if let Some(requests) = env_override("FITSIM_REQUESTS")? {
            config.num_requests = requests;
        }
        if let Some(min) = env_override("FITSIM_MIN_REQUEST")? {
            config.min_request = min;
        }
        if let Some(max) = env_override("FITSIM_MAX_REQUEST")? {
            config.max_request = max;
        }
        if let Some(seed) = env_override("FITSIM_SEED")? {
            config.seed = Some(seed);
        }
        if let Ok(dir) = std::env::var("FITSIM_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_total_units(mut self, total_units: Units) -> Self {
        self.total_units = total_units;
        self
    }

    pub fn with_requests(mut self, num_requests: usize) -> Self {
        self.num_requests = num_requests;
        self
    }

    pub fn with_request_range(mut self, min: Units, max: Units) -> Self {
        self.min_request = min;
        self.max_request = max;
        self
    }

    pub fn with_allocate_probability(mut self, probability: f64) -> Self {
        self.allocate_probability = probability;
        self
    }

    pub fn with_series_interval(mut self, interval: usize) -> Self {
        self.series_interval = interval;
        self
    }

    pub fn with_strategies(mut self, strategies: Vec<Strategy>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Reject configurations the driver cannot run meaningfully
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_units == 0 {
            return Err(ConfigError::ZeroValue("total_units"));
        }
        if self.min_request == 0 {
            return Err(ConfigError::ZeroValue("min_request"));
        }
        if self.series_interval == 0 {
            return Err(ConfigError::ZeroValue("series_interval"));
        }
        if self.progress_interval == 0 {
            return Err(ConfigError::ZeroValue("progress_interval"));
        }
        if self.min_request > self.max_request {
            return Err(ConfigError::InvertedBounds {
                min: self.min_request,
                max: self.max_request,
            });
        }
        if self.max_request > self.total_units {
            return Err(ConfigError::RequestTooLarge {
                max: self.max_request,
                total: self.total_units,
            });
        }
        if !(0.0..=1.0).contains(&self.allocate_probability) {
            return Err(ConfigError::InvalidProbability(self.allocate_probability));
        }
        if self.strategies.is_empty() {
            return Err(ConfigError::NoStrategies);
        }
        for (i, strategy) in self.strategies.iter().enumerate() {
            if self.strategies[..i].contains(strategy) {
                return Err(ConfigError::DuplicateStrategy(*strategy));
            }
        }
        Ok(())
    }

    /// Address space size in kilobytes, for reporting
    pub fn total_kb(&self) -> usize {
        self.total_units * self.unit_size_kb
    }
}

fn env_override<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { name, value }),
        Err(_) => Ok(None),
    }
}
