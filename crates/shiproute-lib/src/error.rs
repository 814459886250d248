use std::path::PathBuf;

use thiserror::Error;

use crate::graph::{NodeId, PathId};

/// Convenient result alias for the shiproute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The graph contains no nodes, so no endpoint can be resolved.
    #[error("graph contains no nodes")]
    EmptyGraph,

    /// Raised when a node identifier does not exist in the graph.
    #[error("unknown node {node} (graph has {count} nodes)")]
    UnknownNode { node: NodeId, count: usize },

    /// Raised when a trajectory identifier does not exist in the graph.
    #[error("unknown path {path} (graph has {count} paths)")]
    UnknownPath { path: PathId, count: usize },

    /// Raised when no route could be found between two nodes.
    #[error("no route found between node {start} and node {goal}")]
    RouteNotFound { start: NodeId, goal: NodeId },

    /// Per-run search state could not be allocated.
    #[error("failed to allocate search state for {nodes} nodes")]
    SearchAllocation { nodes: usize },

    /// A priority-queue backend could not grow its storage.
    #[error("failed to allocate priority queue storage for {nodes} nodes")]
    QueueAllocation { nodes: usize },

    /// A reposition was requested for a node that is not in the queue.
    #[error("node {node} is not in the priority queue")]
    NotQueued { node: NodeId },

    /// Path pairs were presented out of order with respect to the checked frontier.
    #[error("path {other} is at or below the checked frontier {frontier} of path {path}")]
    PairOrder {
        path: PathId,
        other: PathId,
        frontier: PathId,
    },

    /// A trajectory step has no matching edge in the adjacency list.
    #[error("no edge from node {from} to node {to}")]
    MissingEdge { from: NodeId, to: NodeId },

    /// The parent chain of a solved search does not lead back to the source.
    #[error("parent chain from node {goal} does not reach start node {start}")]
    BrokenParentChain { start: NodeId, goal: NodeId },

    /// Heuristic code outside the supported range.
    #[error("unsupported heuristic code {code}; expected 0 (zero), 1 (haversine), 2 (spherical cosines) or 3 (equirectangular)")]
    UnsupportedHeuristic { code: u8 },

    /// Queue code outside the supported range.
    #[error("unsupported priority queue code {code}; expected 0 (ordered list) or 1 (binary heap)")]
    UnsupportedQueue { code: u8 },

    /// Raised when the CSV header lacks a required column.
    #[error("trajectory CSV missing required columns: {missing}. Available: {available}")]
    CsvHeader { missing: String, available: String },

    /// Raised when a CSV field cannot be parsed.
    #[error("invalid {field} value '{value}' on line {line}")]
    CsvField {
        line: u64,
        field: &'static str,
        value: String,
    },

    /// Raised when a filtering utility is applied to an already intersected graph.
    #[error("filtering is only supported on graphs that have not been intersected")]
    CrossedGraph,

    /// Raised when serializing a graph container fails.
    #[error("failed to serialize graph: {message}")]
    GraphStoreSerialize { message: String },

    /// Raised when loading a graph container from a file fails.
    #[error("failed to load graph from {path}: {message}")]
    GraphStoreLoad { path: PathBuf, message: String },

    /// Wrapper for CSV reader errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
