/*!
 * Simulation Driver
 *
 * Feeds one request sequence to several allocators at once and keeps
 * their occupied sets in step. When an allocation succeeds on some
 * allocators but is denied on others, the successful side is rolled back
 * so every allocator keeps holding the same set of processes.
 */

use super::report::{SeriesPoint, SimulationReport, StrategySample};
use super::workload::{Request, WorkloadGenerator};
use super::SimulationError;
use crate::core::types::{Pid, Units};
use crate::core::{ConfigError, SimulationConfig};
use crate::memory::{Allocator, BlockManager, MemoryInfo, MemoryResult};
use crate::monitoring::span_run;
use tracing::{debug, info, warn};

/// Outcome of issuing one allocation to every allocator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationOutcome {
    /// Every allocator placed the process
    Placed,
    /// Every allocator denied the request
    Denied,
    /// Allocators disagreed; the successful ones were rolled back
    RolledBack,
}

/// Drives identical workloads through a set of allocators
pub struct Simulator<A = BlockManager> {
    config: SimulationConfig,
    allocators: Vec<A>,
    workload: WorkloadGenerator,
    live: Vec<Pid>,
    series: Vec<SeriesPoint>,
    requests_issued: usize,
    desyncs: usize,
}

impl Simulator<BlockManager> {
    /// One block-list manager per configured strategy
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let allocators = config
            .strategies
            .iter()
            .map(|strategy| BlockManager::new(*strategy, config.total_units))
            .collect::<MemoryResult<Vec<_>>>()?;
        Self::with_allocators(config, allocators)
    }
}

impl<A: Allocator + MemoryInfo> Simulator<A> {
    pub fn with_allocators(
        config: SimulationConfig,
        allocators: Vec<A>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        if allocators.is_empty() {
            return Err(ConfigError::NoStrategies.into());
        }

        let workload = WorkloadGenerator::from_config(&config);
        info!(
            seed = workload.seed(),
            allocators = allocators.len(),
            "Simulator ready"
        );

        Ok(Self {
            config,
            allocators,
            workload,
            live: Vec::new(),
            series: Vec::new(),
            requests_issued: 0,
            desyncs: 0,
        })
    }

    pub fn allocators(&self) -> &[A] {
        &self.allocators
    }

    /// Processes currently held by every allocator, oldest first
    pub fn live_processes(&self) -> &[Pid] {
        &self.live
    }

    pub fn seed(&self) -> u64 {
        self.workload.seed()
    }

    pub fn desyncs(&self) -> usize {
        self.desyncs
    }

    /// Run every configured request and summarize
    pub fn run(&mut self) -> SimulationReport {
        let span = span_run(self.seed(), self.config.num_requests);
        let _entered = span.enter();

        info!(
            "Starting memory allocation simulation with {} requests",
            self.config.num_requests
        );
        info!(
            "Memory size: {} KB ({} units of {} KB each)",
            self.config.total_kb(),
            self.config.total_units,
            self.config.unit_size_kb
        );
        info!(
            "Request sizes: {}-{} units",
            self.config.min_request, self.config.max_request
        );

        while self.requests_issued < self.config.num_requests {
            self.step();
        }

        span.record_desyncs(self.desyncs);
        info!(desyncs = self.desyncs, "Simulation complete");
        self.report()
    }

    /// Generate and apply the next request, then sample fragmentation
    pub fn step(&mut self) -> Request {
        let index = self.requests_issued;
        let request = self.workload.next_request(index, self.live.len());

        match request {
            Request::Allocate { pid, units } => {
                self.allocate_all(pid, units);
            }
            Request::Deallocate => {
                self.deallocate_random();
            }
        }

        for allocator in &mut self.allocators {
            allocator.record_fragment_sample();
        }

        self.requests_issued += 1;
        let done = self.requests_issued;
        if done % self.config.series_interval == 0 {
            let point = self.sample(done);
            self.series.push(point);
        }
        if done % self.config.progress_interval == 0 {
            info!("Processed {} requests...", done);
        }

        request
    }

    /// Issue one allocation to every allocator, rolling back on disagreement
    pub fn allocate_all(&mut self, pid: Pid, units: Units) -> AllocationOutcome {
        let results: Vec<bool> = self
            .allocators
            .iter_mut()
            .map(|allocator| allocator.allocate(pid, units).is_ok())
            .collect();

        if results.iter().all(|placed| *placed) {
            self.live.push(pid);
            return AllocationOutcome::Placed;
        }
        if !results.iter().any(|placed| *placed) {
            debug!(pid, units, "Allocation denied by every allocator");
            return AllocationOutcome::Denied;
        }

        self.desyncs += 1;
        for (allocator, placed) in self.allocators.iter_mut().zip(&results) {
            if !*placed {
                continue;
            }
            if let Err(e) = allocator.deallocate(pid) {
                warn!(pid, error = %e, "Rollback failed for {}", allocator.strategy());
                continue;
            }
            warn!(
                pid,
                "Another allocator denied {} units, rolled back {} allocation",
                units,
                allocator.strategy()
            );
        }
        AllocationOutcome::RolledBack
    }

    /// Free a uniformly chosen live process from every allocator
    pub fn deallocate_random(&mut self) -> Option<Pid> {
        let index = self.workload.pick_victim(self.live.len())?;
        let pid = self.live.remove(index);

        let results: Vec<bool> = self
            .allocators
            .iter_mut()
            .map(|allocator| allocator.deallocate(pid).is_ok())
            .collect();

        if results.windows(2).any(|pair| pair[0] != pair[1]) {
            warn!(pid, "Deallocation synchronization issue");
        }
        Some(pid)
    }

    fn sample(&self, request: usize) -> SeriesPoint {
        SeriesPoint {
            request,
            samples: self
                .allocators
                .iter()
                .map(|allocator| StrategySample {
                    strategy: allocator.strategy(),
                    avg_fragments: allocator.avg_fragments(),
                    avg_nodes_visited: allocator.avg_nodes_visited(),
                })
                .collect(),
        }
    }

    /// Snapshot of the run so far
    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            config: self.config.clone(),
            seed: self.seed(),
            requests: self.requests_issued,
            desyncs: self.desyncs,
            live_processes: self.live.len(),
            strategies: self.allocators.iter().map(|a| a.stats()).collect(),
            series: self.series.clone(),
        }
    }
}
