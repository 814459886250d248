//! Text, CSV and serde renderings of routes, diagnostics and benchmarks.

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use serde::Serialize;

use crate::error::Result;
use crate::graph::{Graph, NodeId};
use crate::queue::QueueKind;
use crate::routing::{NodeClassification, PathBenchmark, QueueRun, RouteCost, RoutePlan};

/// Render a float the way C's `%g` does: six significant digits, trailing
/// zeros removed, scientific notation for very small or large magnitudes.
pub fn format_g(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let scientific = format!("{:.5e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => return scientific,
    };
    if !(-4..6).contains(&exponent) {
        let mantissa = trim_fraction(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else {
        let decimals = (5 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// One line per route record, source first.
pub fn write_route_text<W: Write>(writer: &mut W, plan: &RoutePlan) -> Result<()> {
    for record in plan.route.records() {
        match record.cost {
            RouteCost::Source => writeln!(
                writer,
                "id = {} | {} | {} | travelling_time = Source",
                record.id,
                format_g(record.lat),
                format_g(record.lon)
            )?,
            RouteCost::Elapsed(seconds) => writeln!(
                writer,
                "id = {} | {} | {} | travelling_time = {:7.3}",
                record.id,
                format_g(record.lat),
                format_g(record.lon),
                seconds
            )?,
        }
    }
    Ok(())
}

fn write_positions<W: Write>(writer: &mut W, graph: &Graph, nodes: &[NodeId]) -> Result<()> {
    for &id in nodes {
        let node = graph.node(id)?;
        writeln!(writer, "{},{}", format_g(node.lon), format_g(node.lat))?;
    }
    Ok(())
}

/// Classification of the nodes a search touched, as plottable `lon,lat` blocks.
pub fn write_control_file<W: Write>(
    writer: &mut W,
    graph: &Graph,
    classification: &NodeClassification,
) -> Result<()> {
    writeln!(writer, "nnodes_path,next,npq")?;
    writeln!(
        writer,
        "{},{},{}",
        classification.on_route.len(),
        classification.expanded.len(),
        classification.queued.len()
    )?;
    writeln!(writer, "Nodes in path")?;
    write_positions(writer, graph, &classification.on_route)?;
    writeln!(writer, "Nodes extended")?;
    write_positions(writer, graph, &classification.expanded)?;
    writeln!(writer, "Nodes in PQ")?;
    write_positions(writer, graph, &classification.queued)?;
    Ok(())
}

fn seconds(duration: Duration) -> String {
    format!("{:.9}", duration.as_secs_f64())
}

fn side_by_side<F>(benchmark: &PathBenchmark, mut columns: F) -> Vec<String>
where
    F: FnMut(Option<&QueueRun>) -> Vec<String>,
{
    let mut row = vec![
        benchmark.path.to_string(),
        format!("{:.3}", benchmark.separation_km),
    ];
    for queue in QueueKind::ALL {
        row.extend(columns(benchmark.run(queue)));
    }
    row
}

fn headers(shared: &[&str], per_queue: &[&str]) -> Vec<String> {
    let mut headers: Vec<String> = shared.iter().map(|h| h.to_string()).collect();
    for queue in QueueKind::ALL {
        headers.extend(
            per_queue
                .iter()
                .map(|h| h.replace("{q}", queue.abbreviation())),
        );
    }
    headers
}

/// Solution quality and heuristic cost per trajectory.
pub fn write_heuristic_metrics<W: Write>(writer: W, results: &[PathBenchmark]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(headers(
        &["PATH ID", "SEPARATION [km]"],
        &[
            "SOLUTION COST {q} [s]",
            "NNODES IN SOLUTION PATH {q}",
            "NNODES EXPANDED {q}",
            "CALCULUS TIME {q} [s]",
        ],
    ))?;
    for benchmark in results {
        csv.write_record(side_by_side(benchmark, |run| match run {
            Some(run) => vec![
                run.cost.map(|c| format!("{:.3}", c)).unwrap_or_default(),
                run.solution_nodes.to_string(),
                run.metrics.expanded.to_string(),
                seconds(run.metrics.heuristic_time),
            ],
            None => vec![String::new(); 4],
        }))?;
    }
    csv.flush()?;
    Ok(())
}

/// Queue operation timings per trajectory.
pub fn write_queue_metrics<W: Write>(writer: W, results: &[PathBenchmark]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(headers(
        &["PATH ID", "SEPARATION [km]"],
        &[
            "NNODES IN SOLUTION PATH {q}",
            "TOTAL TIME {q} [s]",
            "ENQUEUE TIME {q} [s]",
            "DEQUEUE TIME {q} [s]",
            "REQUEUE TIME {q} [s]",
        ],
    ))?;
    for benchmark in results {
        csv.write_record(side_by_side(benchmark, |run| match run {
            Some(run) => vec![
                run.solution_nodes.to_string(),
                seconds(run.metrics.total_time),
                seconds(run.metrics.enqueue_time),
                seconds(run.metrics.dequeue_time),
                seconds(run.metrics.reposition_time),
            ],
            None => vec![String::new(); 5],
        }))?;
    }
    csv.flush()?;
    Ok(())
}

/// `<path> <count>` per trajectory.
pub fn write_intersection_counts<W: Write>(writer: &mut W, per_path: &[usize]) -> Result<()> {
    for (path, count) in per_path.iter().enumerate() {
        writeln!(writer, "{} {}", path, count)?;
    }
    Ok(())
}

/// `<shiptype> <paths>` per shiptype.
pub fn write_shiptype_counts<W: Write>(writer: &mut W, counts: &BTreeMap<i32, usize>) -> Result<()> {
    for (shiptype, paths) in counts {
        writeln!(writer, "{} {}", shiptype, paths)?;
    }
    Ok(())
}

/// Compact description of a planned route for JSON rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub source: NodeId,
    pub goal: NodeId,
    pub heuristic: String,
    pub queue: String,
    pub hops: usize,
    pub total_time_seconds: f64,
    pub nodes_on_route: usize,
    pub nodes_expanded: usize,
    pub nodes_queued: usize,
    pub records: Vec<crate::routing::RouteRecord>,
}

impl RouteSummary {
    pub fn from_plan(plan: &RoutePlan) -> Self {
        Self {
            source: plan.source,
            goal: plan.goal,
            heuristic: plan.heuristic.to_string(),
            queue: plan.queue.to_string(),
            hops: plan.hop_count(),
            total_time_seconds: plan.route.total_time(),
            nodes_on_route: plan.classification.on_route.len(),
            nodes_expanded: plan.classification.expanded.len(),
            nodes_queued: plan.classification.queued.len(),
            records: plan.route.records().to_vec(),
        }
    }
}
