//! Intersect command: splice trajectory crossings into a stored graph.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use shiproute_lib::output::write_intersection_counts;
use shiproute_lib::{augment, save_graph};

use super::{create_file, open_graph};
use crate::output::OutputFormat;

/// Arguments for the intersect command.
#[derive(Debug, Clone, Args)]
pub struct IntersectArgs {
    /// Graph container to augment.
    #[arg(long)]
    pub graph: PathBuf,
    /// Where to write the augmented graph; defaults to overwriting `--graph`.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Write `<path> <count>` lines with crossings added per trajectory.
    #[arg(long)]
    pub counts: Option<PathBuf>,
}

/// Handle the intersect subcommand.
pub fn handle_intersect(args: &IntersectArgs, format: OutputFormat) -> Result<()> {
    let mut graph = open_graph(&args.graph)?;
    let report = augment(&mut graph).context("failed to compute intersections")?;

    let output = args.output.as_ref().unwrap_or(&args.graph);
    save_graph(&graph, output).with_context(|| format!("failed to write {}", output.display()))?;

    if let Some(path) = &args.counts {
        let mut writer = create_file(path)?;
        write_intersection_counts(&mut writer, &report.per_path)?;
        writer.flush()?;
    }

    format.render_intersections(&report)?;
    Ok(())
}
