//! Shared graph builders and fixture helpers for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use shiproute_lib::{Graph, NodeId, PathId};

/// Path to the fixtures directory shared with the CLI tests.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// The sample AIS export: four ships, one satellite row, one crossing pair.
pub fn sample_tracks() -> PathBuf {
    fixtures_dir().join("sample_tracks.csv")
}

/// Append a trajectory through `points` (`(lat, lon)`), each leg taking `leg_seconds`.
pub fn add_track(graph: &mut Graph, shiptype: i32, points: &[(f64, f64)], leg_seconds: f64) -> PathId {
    let mut nodes = points
        .iter()
        .map(|&(lat, lon)| graph.add_node(lat, lon, 10.0))
        .collect::<Vec<_>>()
        .into_iter();
    let first = nodes.next().expect("track has at least one point");
    let path = graph.start_path(shiptype, first).expect("start path");
    let mut previous = first;
    for node in nodes {
        graph
            .add_edge(previous, node, leg_seconds)
            .expect("edge between new nodes");
        graph.extend_path(path, node).expect("extend path");
        previous = node;
    }
    path
}

/// Deterministic pseudo-random graph: `nodes` nodes on a small patch of sea,
/// `edges` directed edges with weights in `[1, 100)`.
pub fn scattered_graph(seed: u64, nodes: usize, edges: usize) -> Graph {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };

    let mut graph = Graph::with_capacity(nodes);
    for _ in 0..nodes {
        let (lat, lon, speed) = (next(), next(), 5.0 + 10.0 * next());
        graph.add_node(lat, lon, speed);
    }
    for _ in 0..edges {
        let from = (next() * nodes as f64) as NodeId % nodes;
        let to = (next() * nodes as f64) as NodeId % nodes;
        if from != to {
            graph
                .add_edge(from, to, 1.0 + 99.0 * next())
                .expect("endpoints exist");
        }
    }
    graph
}

/// Plain Dijkstra distances from `source`, used as ground truth.
pub fn dijkstra(graph: &Graph, source: NodeId) -> Vec<f64> {
    let mut distance = vec![f64::INFINITY; graph.node_count()];
    let mut done = vec![false; graph.node_count()];
    distance[source] = 0.0;
    loop {
        let current = (0..graph.node_count())
            .filter(|&n| !done[n] && distance[n].is_finite())
            .min_by(|&a, &b| distance[a].total_cmp(&distance[b]));
        let Some(current) = current else {
            return distance;
        };
        done[current] = true;
        for edge in graph.neighbours(current) {
            let candidate = distance[current] + edge.travel_time;
            if candidate < distance[edge.target] {
                distance[edge.target] = candidate;
            }
        }
    }
}
