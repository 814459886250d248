//! Benchmark command: route every trajectory end to end with both queue backends.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use shiproute_lib::output::{write_heuristic_metrics, write_queue_metrics};
use shiproute_lib::{benchmark_paths, Heuristic, QueueKind};

use super::{create_file, open_graph};
use crate::args::HeuristicArg;
use crate::output::{render_json, OutputFormat};

/// Arguments for the benchmark command.
#[derive(Debug, Clone, Args)]
pub struct BenchmarkArgs {
    /// Graph container to benchmark.
    #[arg(long)]
    pub graph: PathBuf,
    /// Remaining-time estimator guiding every search.
    #[arg(long, value_enum, default_value_t = HeuristicArg::default())]
    pub heuristic: HeuristicArg,
    /// CSV with solution cost and expansion counts per trajectory.
    #[arg(long)]
    pub heuristic_metrics: Option<PathBuf>,
    /// CSV with queue operation timings per trajectory.
    #[arg(long)]
    pub queue_metrics: Option<PathBuf>,
}

/// Totals printed once the benchmark finishes.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BenchmarkTotals {
    pub heuristic: String,
    pub paths: usize,
    pub unreachable: usize,
    pub mean_expanded: Vec<(String, f64)>,
}

/// Handle the benchmark subcommand.
pub fn handle_benchmark(args: &BenchmarkArgs, format: OutputFormat) -> Result<()> {
    let heuristic: Heuristic = args.heuristic.into();
    let graph = open_graph(&args.graph)?;
    let results = benchmark_paths(&graph, heuristic).context("benchmark failed")?;

    if let Some(path) = &args.heuristic_metrics {
        write_heuristic_metrics(create_file(path)?, &results)?;
    }
    if let Some(path) = &args.queue_metrics {
        write_queue_metrics(create_file(path)?, &results)?;
    }

    let paths = results.len().max(1) as f64;
    let totals = BenchmarkTotals {
        heuristic: heuristic.to_string(),
        paths: results.len(),
        unreachable: results
            .iter()
            .filter(|result| result.runs.iter().any(|run| run.cost.is_none()))
            .count(),
        mean_expanded: QueueKind::ALL
            .into_iter()
            .map(|queue| {
                let expanded: usize = results
                    .iter()
                    .filter_map(|result| result.run(queue))
                    .map(|run| run.metrics.expanded)
                    .sum();
                (queue.to_string(), expanded as f64 / paths)
            })
            .collect(),
    };

    match format {
        OutputFormat::Json => render_json(&totals)?,
        OutputFormat::Text => {
            println!(
                "Benchmarked {} trajectories with the {} heuristic ({} unreachable)",
                totals.paths, totals.heuristic, totals.unreachable
            );
            for (queue, mean) in &totals.mean_expanded {
                println!("  {}: {:.1} nodes expanded on average", queue, mean);
            }
        }
    }
    Ok(())
}
