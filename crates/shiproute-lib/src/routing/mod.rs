//! Route planning over a finalized trajectory graph.
//!
//! This module provides:
//! - [`search`] - the A* engine, generic over queue backend and monitor
//! - [`RouteRequest`] - endpoints plus heuristic and queue selection
//! - [`RoutePlan`] - reconstructed route and node classification
//! - [`plan_route`] - main entry point for computing routes
//! - [`benchmark_paths`] - per-trajectory metrics for both queue backends
//!
//! Searches borrow the graph immutably and own their scratch state, so any
//! number of them may run over the same graph once augmentation is done.
//!
//! # Example
//!
//! ```ignore
//! use shiproute_lib::{load_graph, plan_route, Heuristic, RouteRequest};
//!
//! let graph = load_graph(std::path::Path::new("tracks.srg"))?;
//! let request = RouteRequest::along_path(0).with_heuristic(Heuristic::Haversine);
//! let plan = plan_route(&graph, &request)?;
//! println!("{} stops, {:.1} s", plan.route.len(), plan.route.total_time());
//! ```

mod benchmark;
mod engine;
mod monitor;
mod solution;
mod state;

pub use benchmark::{benchmark_paths, PathBenchmark, QueueRun};
pub use engine::{search, Search, SearchOutcome};
pub use monitor::{MetricsMonitor, NoOpMonitor, Operation, SearchMetrics, SearchMonitor};
pub use solution::{
    classify_nodes, reverse_parent_chain, NodeClassification, Route, RouteCost, RouteRecord,
};
pub use state::{NodeState, SearchState};

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, PathId};
use crate::heuristic::Heuristic;
use crate::queue::{BinaryHeap, OrderedList, QueueKind};

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// How the source and goal of a route are chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Endpoints {
    /// Nodes nearest to each coordinate.
    Coordinates { from: Coordinate, to: Coordinate },
    /// First and last node of a trajectory.
    Trajectory(PathId),
    /// Explicit node ids.
    Nodes { source: NodeId, goal: NodeId },
}

impl Endpoints {
    /// Resolve to `(source, goal)` node ids in `graph`.
    pub fn resolve(&self, graph: &Graph) -> Result<(NodeId, NodeId)> {
        match *self {
            Endpoints::Coordinates { from, to } => Ok((
                graph.nearest_node(from.lat, from.lon)?,
                graph.nearest_node(to.lat, to.lon)?,
            )),
            Endpoints::Trajectory(path) => graph.path_endpoints(path),
            Endpoints::Nodes { source, goal } => {
                graph.node(source)?;
                graph.node(goal)?;
                Ok((source, goal))
            }
        }
    }
}

/// High-level route planning request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub endpoints: Endpoints,
    pub heuristic: Heuristic,
    pub queue: QueueKind,
}

impl RouteRequest {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            heuristic: Heuristic::default(),
            queue: QueueKind::default(),
        }
    }

    pub fn between_nodes(source: NodeId, goal: NodeId) -> Self {
        Self::new(Endpoints::Nodes { source, goal })
    }

    pub fn between_coordinates(from: Coordinate, to: Coordinate) -> Self {
        Self::new(Endpoints::Coordinates { from, to })
    }

    pub fn along_path(path: PathId) -> Self {
        Self::new(Endpoints::Trajectory(path))
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_queue(mut self, queue: QueueKind) -> Self {
        self.queue = queue;
        self
    }
}

/// Planned route result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub source: NodeId,
    pub goal: NodeId,
    pub heuristic: Heuristic,
    pub queue: QueueKind,
    pub route: Route,
    pub classification: NodeClassification,
}

impl RoutePlan {
    /// Number of edges travelled.
    pub fn hop_count(&self) -> usize {
        self.route.len().saturating_sub(1)
    }
}

/// Run A* with the requested backend, dispatching on [`QueueKind`].
pub fn run_search<M>(
    graph: &Graph,
    source: NodeId,
    goal: NodeId,
    heuristic: Heuristic,
    queue: QueueKind,
    monitor: &mut M,
) -> Result<Search>
where
    M: SearchMonitor + ?Sized,
{
    match queue {
        QueueKind::OrderedList => search::<OrderedList, M>(graph, source, goal, heuristic, monitor),
        QueueKind::BinaryHeap => search::<BinaryHeap, M>(graph, source, goal, heuristic, monitor),
    }
}

/// Plan a route without instrumentation.
pub fn plan_route(graph: &Graph, request: &RouteRequest) -> Result<RoutePlan> {
    plan_route_with_monitor(graph, request, &mut NoOpMonitor)
}

/// Plan a route, reporting engine activity to `monitor`.
pub fn plan_route_with_monitor<M>(
    graph: &Graph,
    request: &RouteRequest,
    monitor: &mut M,
) -> Result<RoutePlan>
where
    M: SearchMonitor + ?Sized,
{
    let (source, goal) = request.endpoints.resolve(graph)?;
    let mut run = run_search(graph, source, goal, request.heuristic, request.queue, monitor)?;
    if !run.is_found() {
        return Err(Error::RouteNotFound {
            start: source,
            goal,
        });
    }

    let route = run.route(graph)?;
    let classification = run.classify(&route);
    info!(
        source,
        goal,
        stops = route.len(),
        travel_time = route.total_time(),
        expanded = classification.expanded.len(),
        queued = classification.queued.len(),
        "route planned"
    );

    Ok(RoutePlan {
        source,
        goal,
        heuristic: request.heuristic,
        queue: request.queue,
        route,
        classification,
    })
}
