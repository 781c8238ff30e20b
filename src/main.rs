/*!
 * fitsim - Main Entry Point
 *
 * Runs the randomized workload against a first-fit and a best-fit
 * allocator, prints the comparison and writes the result files.
 */

use fitsim::{init_tracing, SimulationConfig, Simulator};
use tracing::info;

fn main() -> miette::Result<()> {
    // Initialize structured tracing
    init_tracing();

    let config = SimulationConfig::from_env()?;
    let output_dir = config.output_dir.clone();

    let mut simulator = Simulator::new(config)?;
    info!(seed = simulator.seed(), "Replay this run with FITSIM_SEED");

    let report = simulator.run();
    print!("{}", report);

    let written = report.write_all(&output_dir)?;
    info!(files = written.len(), dir = %output_dir.display(), "Results saved for graphing");

    Ok(())
}
