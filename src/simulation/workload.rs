/*!
 * Workload Generator
 * Seeded source of allocate/deallocate requests
 */

use crate::core::types::{Pid, Units};
use crate::core::SimulationConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One simulated request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Allocate { pid: Pid, units: Units },
    /// Free a live process; the driver picks which one
    Deallocate,
}

/// Random request source, reproducible from its seed
#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    rng: StdRng,
    seed: u64,
    min_request: Units,
    max_request: Units,
    allocate_probability: f64,
}

impl WorkloadGenerator {
    pub fn new(seed: u64, min_request: Units, max_request: Units, allocate_probability: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            min_request,
            max_request,
            allocate_probability,
        }
    }

    /// Generator for `config`, drawing a fresh seed when none is set
    pub fn from_config(config: &SimulationConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::new(
            seed,
            config.min_request,
            config.max_request,
            config.allocate_probability,
        )
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Produce request number `index`
    ///
    /// Allocations are forced while nothing is live. The request index
    /// doubles as the process ID, so every allocation gets a fresh one.
    pub fn next_request(&mut self, index: usize, live: usize) -> Request {
        let allocate = self.rng.gen_bool(self.allocate_probability) || live == 0;

        if allocate {
            Request::Allocate {
                pid: index as Pid,
                units: self.rng.gen_range(self.min_request..=self.max_request),
            }
        } else {
            Request::Deallocate
        }
    }

    /// Uniformly pick an index into the live process list
    pub fn pick_victim(&mut self, live: usize) -> Option<usize> {
        if live == 0 {
            None
        } else {
            Some(self.rng.gen_range(0..live))
        }
    }
}
