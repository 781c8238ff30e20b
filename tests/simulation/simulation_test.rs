/*!
 * Simulation Tests
 * End-to-end runs of the workload driver and report output
 */

use fitsim::memory::{BlockManager, Strategy};
use fitsim::simulation::{Request, SimulationReport, Simulator};
use fitsim::SimulationConfig;
use pretty_assertions::assert_eq;
use std::fs;

fn seeded(seed: u64, requests: usize) -> SimulationConfig {
    SimulationConfig::default()
        .with_requests(requests)
        .with_seed(seed)
}

#[test]
fn test_same_seed_reproduces_run() {
    let first = Simulator::new(seeded(2024, 2_000)).unwrap().run();
    let second = Simulator::new(seeded(2024, 2_000)).unwrap().run();
    assert_eq!(first, second);
}

#[test]
fn test_different_seeds_diverge() {
    let first = Simulator::new(seeded(1, 2_000)).unwrap().run();
    let second = Simulator::new(seeded(2, 2_000)).unwrap().run();
    assert_ne!(first.series, second.series);
}

#[test]
fn test_reference_run_statistics() {
    let mut sim = Simulator::new(seeded(77, 10_000)).unwrap();
    let report = sim.run();

    assert_eq!(report.seed, 77);
    assert_eq!(report.requests, 10_000);
    assert_eq!(report.series.len(), 100);
    assert_eq!(report.series.last().map(|p| p.request), Some(10_000));
    assert_eq!(report.live_processes, sim.live_processes().len());

    for stats in &report.strategies {
        assert_eq!(stats.total_units, 128);
        assert_eq!(stats.fragment_samples, 10_000);
        assert!(stats.successful_allocations > 0);
        assert!(stats.avg_nodes_visited >= 1.0);
        assert!((0.0..=100.0).contains(&stats.denial_percentage));
        assert!(stats.avg_fragments >= 0.0);
    }

    for allocator in sim.allocators() {
        assert!(allocator.validate().is_ok());
        for pid in sim.live_processes() {
            assert!(allocator.contains(*pid));
        }
        let held: usize = allocator
            .blocks()
            .iter()
            .filter(|b| !b.owner.is_free())
            .count();
        assert_eq!(held, sim.live_processes().len());
    }
}

#[test]
fn test_step_reports_requests() {
    let mut sim = Simulator::new(seeded(5, 100)).unwrap();

    // Nothing is live yet, so the first request must allocate
    match sim.step() {
        Request::Allocate { pid, units } => {
            assert_eq!(pid, 0);
            assert!((3..=10).contains(&units));
        }
        Request::Deallocate => panic!("first request must allocate"),
    }
    assert_eq!(sim.live_processes(), &[0]);
}

#[test]
fn test_single_strategy_run() {
    let config = seeded(9, 500).with_strategies(vec![Strategy::BestFit]);
    let allocators = vec![BlockManager::new(Strategy::BestFit, 128).unwrap()];
    let report = Simulator::with_allocators(config, allocators).unwrap().run();

    assert_eq!(report.strategies.len(), 1);
    assert_eq!(report.desyncs, 0);
    assert!(report.strategy(Strategy::FirstFit).is_none());
    assert!(report.strategy(Strategy::BestFit).is_some());
}

#[test]
fn test_invalid_config_rejected() {
    let config = SimulationConfig::default().with_request_range(10, 3);
    assert!(Simulator::new(config).is_err());
}

#[test]
fn test_write_all_result_files() {
    let dir = tempfile::tempdir().unwrap();
    let report = Simulator::new(seeded(31, 1_000).with_output_dir(dir.path()))
        .unwrap()
        .run();

    let written = report.write_all(dir.path()).unwrap();
    assert_eq!(written.len(), 3);

    let results = fs::read_to_string(dir.path().join("simulation_results.txt")).unwrap();
    let keys: Vec<&str> = results
        .lines()
        .filter_map(|line| line.split(": ").next())
        .collect();
    assert_eq!(
        keys,
        vec![
            "FirstFit_Fragments",
            "FirstFit_Nodes",
            "FirstFit_Denied",
            "BestFit_Fragments",
            "BestFit_Nodes",
            "BestFit_Denied",
        ]
    );

    let series = fs::read_to_string(dir.path().join("fragmentation_data.txt")).unwrap();
    let mut lines = series.lines();
    assert_eq!(
        lines.next(),
        Some("Request,FirstFit_Fragments,BestFit_Fragments,FirstFit_AvgNodes,BestFit_AvgNodes")
    );
    assert_eq!(lines.count(), 10);

    let json = fs::read_to_string(dir.path().join("simulation_results.json")).unwrap();
    let parsed: SimulationReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn test_write_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let report = Simulator::new(seeded(4, 100)).unwrap().run();
    let missing = dir.path().join("does-not-exist");
    assert!(report.write_all(&missing).is_err());
}
