//! Store command: ingest CSV position reports into a graph container.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use shiproute_lib::output::write_shiptype_counts;
use shiproute_lib::{
    append_csv, retain_shiptype, save_graph, shiptype_counts, split_by_shiptype, Graph,
    IngestOptions, IngestSummary,
};

use super::create_file;
use crate::output::OutputFormat;

/// Arguments for the store command.
#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// CSV files with position reports, ingested in order.
    #[arg(long = "input", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,
    /// Graph container to write.
    #[arg(long)]
    pub output: PathBuf,
    /// Keep satellite-relayed rows instead of dropping them.
    #[arg(long)]
    pub keep_satellite: bool,
    /// Keep only trajectories of this shiptype.
    #[arg(long)]
    pub shiptype: Option<i32>,
    /// Write `<shiptype> <paths>` lines to this file.
    #[arg(long)]
    pub shiptype_counts: Option<PathBuf>,
    /// Also write one container per shiptype into this directory.
    #[arg(long)]
    pub split_dir: Option<PathBuf>,
}

/// Handle the store subcommand.
pub fn handle_store(args: &StoreArgs, format: OutputFormat) -> Result<()> {
    let options = IngestOptions {
        skip_satellite: !args.keep_satellite,
    };
    let mut graph = Graph::new();
    let mut total = IngestSummary::default();
    for input in &args.inputs {
        let summary = append_csv(&mut graph, input, &options)
            .with_context(|| format!("failed to ingest {}", input.display()))?;
        total.rows += summary.rows;
        total.skipped += summary.skipped;
        total.nodes += summary.nodes;
        total.edges += summary.edges;
        total.paths += summary.paths;
    }

    if let Some(shiptype) = args.shiptype {
        graph = retain_shiptype(&graph, shiptype).context("failed to filter by shiptype")?;
        total.nodes = graph.node_count();
        total.edges = graph.edge_count();
        total.paths = graph.path_count();
    }

    if graph.is_empty() {
        bail!("no trajectories left to store");
    }

    save_graph(&graph, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    if let Some(path) = &args.shiptype_counts {
        let mut writer = create_file(path)?;
        write_shiptype_counts(&mut writer, &shiptype_counts(&graph))?;
        writer.flush()?;
    }

    if let Some(dir) = &args.split_dir {
        write_split(&graph, &args.output, dir)?;
    }

    format.render_ingest(&total)?;
    Ok(())
}

fn write_split(graph: &Graph, output: &Path, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("graph");
    for (shiptype, part) in split_by_shiptype(graph)? {
        let path = dir.join(format!("{}_{}.srg", stem, shiptype));
        save_graph(&part, &path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(shiptype, paths = part.path_count(), path = %path.display(), "wrote shiptype graph");
    }
    Ok(())
}
