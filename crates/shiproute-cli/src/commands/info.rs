//! Info command: summarize a stored graph.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::open_graph;
use crate::output::{GraphInfo, OutputFormat};

/// Arguments for the info command.
#[derive(Debug, Clone, Args)]
pub struct InfoArgs {
    /// Graph container to inspect.
    #[arg(long)]
    pub graph: PathBuf,
}

/// Handle the info subcommand.
pub fn handle_info(args: &InfoArgs, format: OutputFormat) -> Result<()> {
    let graph = open_graph(&args.graph)?;
    format.render_info(&GraphInfo::from_graph(&graph))?;
    Ok(())
}
