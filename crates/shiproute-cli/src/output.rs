//! Rendering of command results on stdout.

use std::collections::BTreeMap;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use shiproute_lib::output::write_route_text;
use shiproute_lib::{Graph, IngestSummary, IntersectionReport, RoutePlan, RouteSummary};

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// Pretty-printed JSON document.
    Json,
}

/// Render any serializable value as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if JSON serialization or writing fails.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

/// Overview of a graph container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphInfo {
    pub nodes: usize,
    pub edges: usize,
    pub paths: usize,
    pub crossed: bool,
    pub shiptypes: BTreeMap<i32, usize>,
}

impl GraphInfo {
    pub fn from_graph(graph: &Graph) -> Self {
        Self {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            paths: graph.path_count(),
            crossed: graph.is_crossed(),
            shiptypes: shiproute_lib::shiptype_counts(graph),
        }
    }
}

impl OutputFormat {
    pub fn render_info(self, info: &GraphInfo) -> io::Result<()> {
        match self {
            OutputFormat::Json => render_json(info),
            OutputFormat::Text => {
                println!("Nodes: {}", info.nodes);
                println!("Edges: {}", info.edges);
                println!("Paths: {}", info.paths);
                println!("Intersected: {}", if info.crossed { "yes" } else { "no" });
                for (shiptype, paths) in &info.shiptypes {
                    println!("  shiptype {}: {} paths", shiptype, paths);
                }
                Ok(())
            }
        }
    }

    pub fn render_ingest(self, summary: &IngestSummary) -> io::Result<()> {
        match self {
            OutputFormat::Json => render_json(summary),
            OutputFormat::Text => {
                println!(
                    "Read {} rows ({} skipped): {} nodes, {} edges, {} paths",
                    summary.rows, summary.skipped, summary.nodes, summary.edges, summary.paths
                );
                Ok(())
            }
        }
    }

    pub fn render_intersections(self, report: &IntersectionReport) -> io::Result<()> {
        match self {
            OutputFormat::Json => render_json(report),
            OutputFormat::Text => {
                println!(
                    "Added {} crossing nodes from {} tested pairs",
                    report.added, report.pairs_tested
                );
                println!(
                    "Skipped {} pairs by shiptype, {} by bounding box",
                    report.pairs_skipped_shiptype, report.pairs_skipped_disjoint
                );
                println!(
                    "Ignored contacts: {} touching, {} overlapping",
                    report.touching, report.overlapping
                );
                Ok(())
            }
        }
    }

    pub fn render_route(self, plan: &RoutePlan) -> io::Result<()> {
        match self {
            OutputFormat::Json => render_json(&RouteSummary::from_plan(plan)),
            OutputFormat::Text => {
                println!(
                    "Route from node {} to node {} ({} heuristic, {} queue):",
                    plan.source, plan.goal, plan.heuristic, plan.queue
                );
                let mut stdout = io::stdout();
                write_route_text(&mut stdout, plan).map_err(io::Error::other)?;
                println!(
                    "Total travel time: {:.3} s over {} hops",
                    plan.route.total_time(),
                    plan.hop_count()
                );
                Ok(())
            }
        }
    }
}
