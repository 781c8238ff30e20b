/*!
 * Simulation Reports
 *
 * Console summary plus three result files:
 * - simulation_results.txt: final averages as `Key: value` lines
 * - fragmentation_data.txt: time series CSV for graphing
 * - simulation_results.json: the whole report
 */

use crate::core::limits::{REPORT_JSON_FILE, RESULTS_FILE, SERIES_FILE};
use crate::core::SimulationConfig;
use crate::memory::{MemoryStats, Strategy};
use log::info;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Report output errors
#[derive(Error, Debug, Diagnostic)]
pub enum ReportError {
    #[error("Failed to write {path}: {source}")]
    #[diagnostic(
        code(report::io),
        help("Check that FITSIM_OUTPUT_DIR exists and is writable.")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    #[diagnostic(code(report::serialization))]
    Serialization(#[from] serde_json::Error),
}

/// Averages for one strategy at one point in the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySample {
    pub strategy: Strategy,
    pub avg_fragments: f64,
    pub avg_nodes_visited: f64,
}

/// Time-series row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub request: usize,
    pub samples: Vec<StrategySample>,
}

/// Everything a finished run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub config: SimulationConfig,
    pub seed: u64,
    pub requests: usize,
    pub desyncs: usize,
    pub live_processes: usize,
    pub strategies: Vec<MemoryStats>,
    pub series: Vec<SeriesPoint>,
}

impl SimulationReport {
    /// Final statistics for one strategy, if it took part
    pub fn strategy(&self, strategy: Strategy) -> Option<&MemoryStats> {
        self.strategies.iter().find(|s| s.strategy == strategy)
    }

    /// `FirstFit_Fragments: 0.123456` style lines
    pub fn results_text(&self) -> String {
        let mut out = String::new();
        for stats in &self.strategies {
            let key = stats.strategy.key();
            out.push_str(&format!("{}_Fragments: {:.6}\n", key, stats.avg_fragments));
            out.push_str(&format!("{}_Nodes: {:.6}\n", key, stats.avg_nodes_visited));
            out.push_str(&format!("{}_Denied: {:.6}\n", key, stats.denial_percentage));
        }
        out
    }

    /// Time series as CSV: fragment columns first, then node columns
    pub fn series_csv(&self) -> String {
        let mut out = String::from("Request");
        for stats in &self.strategies {
            out.push_str(&format!(",{}_Fragments", stats.strategy.key()));
        }
        for stats in &self.strategies {
            out.push_str(&format!(",{}_AvgNodes", stats.strategy.key()));
        }
        out.push('\n');

        for point in &self.series {
            out.push_str(&point.request.to_string());
            for sample in &point.samples {
                out.push_str(&format!(",{}", sample.avg_fragments));
            }
            for sample in &point.samples {
                out.push_str(&format!(",{}", sample.avg_nodes_visited));
            }
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write all result files into `dir`, returning their paths
    pub fn write_all(&self, dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
        let files = [
            (RESULTS_FILE, self.results_text()),
            (SERIES_FILE, self.series_csv()),
            (REPORT_JSON_FILE, self.to_json()?),
        ];

        let mut written = Vec::with_capacity(files.len());
        for (name, contents) in files {
            let path = dir.join(name);
            fs::write(&path, contents).map_err(|source| ReportError::Io {
                path: path.clone(),
                source,
            })?;
            info!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for stats in &self.strategies {
            writeln!(f, "End of {} Allocation", stats.strategy)?;
            writeln!(
                f,
                "Average External Fragments Each Request: {:.6}",
                stats.avg_fragments
            )?;
            writeln!(
                f,
                "Average Nodes Transversed Each Allocation: {:.6}",
                stats.avg_nodes_visited
            )?;
            writeln!(
                f,
                "Percentage Allocation Requests Denied Overall: {:.6}%",
                stats.denial_percentage
            )?;
            writeln!(f)?;
        }
        Ok(())
    }
}
