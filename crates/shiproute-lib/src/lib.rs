//! shiproute library entry points.
//!
//! This crate turns AIS position reports into a routable graph of vessel
//! trajectories, splices crossing points between trajectories into that graph,
//! and plans minimum-time routes over it with A*. Higher-level consumers (the
//! CLI, benchmarks) should only depend on the functions exported here instead
//! of reimplementing behavior.
//!

#![deny(warnings)]

pub mod dataset;
pub mod error;
pub mod filter;
pub mod graph;
pub mod heuristic;
pub mod intersections;
pub mod output;
pub mod queue;
pub mod routing;
pub mod store;

pub use dataset::{append_csv, load_csv, shiptype_counts, IngestOptions, IngestSummary};
pub use error::{Error, Result};
pub use filter::{retain_min_separation, retain_shiptype, split_by_shiptype};
pub use graph::{Graph, NodeId, PathId};
pub use heuristic::Heuristic;
pub use intersections::{augment, IntersectionReport};
pub use output::RouteSummary;
pub use queue::QueueKind;
pub use routing::{
    benchmark_paths, plan_route, Coordinate, Endpoints, RoutePlan, RouteRequest,
};
pub use store::{load_graph, save_graph};
