//! Filter command: drop trajectories from a graph that has not been intersected.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use shiproute_lib::{retain_min_separation, retain_shiptype, save_graph};

use super::open_graph;
use crate::output::{GraphInfo, OutputFormat};

/// Arguments for the filter command.
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Graph container to read.
    #[arg(long)]
    pub graph: PathBuf,
    /// Graph container to write.
    #[arg(long)]
    pub output: PathBuf,
    /// Drop trajectories whose endpoints lie closer than this many kilometres.
    #[arg(long)]
    pub min_separation_km: Option<f64>,
    /// Keep only trajectories of this shiptype.
    #[arg(long)]
    pub shiptype: Option<i32>,
}

/// Handle the filter subcommand.
pub fn handle_filter(args: &FilterArgs, format: OutputFormat) -> Result<()> {
    if args.min_separation_km.is_none() && args.shiptype.is_none() {
        bail!("nothing to filter: pass --min-separation-km and/or --shiptype");
    }

    let mut graph = open_graph(&args.graph)?;
    if let Some(shiptype) = args.shiptype {
        graph = retain_shiptype(&graph, shiptype).context("failed to filter by shiptype")?;
    }
    if let Some(km) = args.min_separation_km {
        graph = retain_min_separation(&graph, km).context("failed to filter by separation")?;
    }

    save_graph(&graph, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    format.render_info(&GraphInfo::from_graph(&graph))?;
    Ok(())
}
