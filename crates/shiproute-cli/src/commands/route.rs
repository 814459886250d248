//! Route command handler for planning a minimum-time route over a stored graph.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use shiproute_lib::output::{write_control_file, write_route_text};
use shiproute_lib::{plan_route, Coordinate, Endpoints, RouteRequest};

use super::{create_file, open_graph};
use crate::args::{parse_coordinate, HeuristicArg, QueueArg};
use crate::output::OutputFormat;

/// Arguments for the route command.
#[derive(Debug, Clone, Args)]
pub struct RouteArgs {
    /// Graph container to route over.
    #[arg(long)]
    pub graph: PathBuf,
    /// Departure position as `LAT,LON`; snapped to the nearest node.
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true, requires = "to")]
    pub from: Option<Coordinate>,
    /// Arrival position as `LAT,LON`; snapped to the nearest node.
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true, requires = "from")]
    pub to: Option<Coordinate>,
    /// Route between the first and last node of this trajectory instead.
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub path: Option<usize>,
    /// Remaining-time estimator guiding the search.
    #[arg(long, value_enum, default_value_t = HeuristicArg::default())]
    pub heuristic: HeuristicArg,
    /// Priority-queue backend.
    #[arg(long, value_enum, default_value_t = QueueArg::default())]
    pub queue: QueueArg,
    /// Write the route records to this file.
    #[arg(long)]
    pub route_file: Option<PathBuf>,
    /// Write the on-route, expanded and queued node positions to this file.
    #[arg(long)]
    pub control_file: Option<PathBuf>,
}

impl RouteArgs {
    /// Convert CLI args to a library RouteRequest.
    pub fn to_request(&self) -> Result<RouteRequest> {
        let endpoints = match (self.path, self.from, self.to) {
            (Some(path), _, _) => Endpoints::Trajectory(path),
            (None, Some(from), Some(to)) => Endpoints::Coordinates { from, to },
            _ => bail!("pass either --from and --to, or --path"),
        };
        Ok(RouteRequest::new(endpoints)
            .with_heuristic(self.heuristic.into())
            .with_queue(self.queue.into()))
    }
}

/// Handle the route subcommand.
pub fn handle_route(args: &RouteArgs, format: OutputFormat) -> Result<()> {
    let request = args.to_request()?;
    let graph = open_graph(&args.graph)?;
    let plan = plan_route(&graph, &request).context("failed to plan route")?;

    if let Some(path) = &args.route_file {
        let mut writer = create_file(path)?;
        write_route_text(&mut writer, &plan)?;
        writer.flush()?;
    }
    if let Some(path) = &args.control_file {
        let mut writer = create_file(path)?;
        write_control_file(&mut writer, &graph, &plan.classification)?;
        writer.flush()?;
    }

    format.render_route(&plan)?;
    Ok(())
}
