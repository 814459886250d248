//! Trajectory selection over graphs that have not been intersected yet.
//!
//! Filters copy the retained trajectories in order and renumber their nodes
//! contiguously. Crossing nodes are shared between trajectories, so a graph
//! that went through augmentation cannot be split this way.

use std::collections::BTreeMap;

use tracing::info;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, Trajectory};
use crate::heuristic::haversine_km;

fn ensure_uncrossed(graph: &Graph) -> Result<()> {
    if graph.is_crossed() {
        Err(Error::CrossedGraph)
    } else {
        Ok(())
    }
}

/// Copy every trajectory accepted by `keep`, with nodes renumbered in order.
/// Edges leaving the retained node set are dropped.
fn copy_paths<F>(graph: &Graph, mut keep: F) -> Result<Graph>
where
    F: FnMut(&Graph, &Trajectory) -> Result<bool>,
{
    let mut renumbered: Vec<Option<NodeId>> = vec![None; graph.node_count()];
    let mut retained = Vec::new();
    let mut next_id = 0;
    for trajectory in graph.paths() {
        if !keep(graph, trajectory)? {
            continue;
        }
        for node in graph.path_nodes(trajectory.id())? {
            if renumbered[node].is_none() {
                renumbered[node] = Some(next_id);
                next_id += 1;
            }
        }
        retained.push(trajectory.id());
    }

    let mut order: Vec<(NodeId, NodeId)> = renumbered
        .iter()
        .enumerate()
        .filter_map(|(old, new)| new.map(|new| (new, old)))
        .collect();
    order.sort_unstable();

    let mut filtered = Graph::with_capacity(order.len());
    for &(_, old) in &order {
        let node = graph.node(old)?;
        filtered.add_node(node.lat, node.lon, node.speed);
    }
    for &(new, old) in &order {
        for edge in graph.neighbours(old) {
            if let Some(target) = renumbered[edge.target] {
                filtered.add_edge(new, target, edge.travel_time)?;
            }
        }
    }
    for path in retained {
        let shiptype = graph.path(path)?.shiptype();
        let mut nodes = graph
            .path_nodes(path)?
            .filter_map(|node| renumbered[node]);
        let Some(first) = nodes.next() else {
            continue;
        };
        let copy = filtered.start_path(shiptype, first)?;
        for node in nodes {
            filtered.extend_path(copy, node)?;
        }
    }
    Ok(filtered)
}

/// Keep only the trajectories of one shiptype.
pub fn retain_shiptype(graph: &Graph, shiptype: i32) -> Result<Graph> {
    ensure_uncrossed(graph)?;
    let filtered = copy_paths(graph, |_, path| Ok(path.shiptype() == shiptype))?;
    info!(
        shiptype,
        paths_before = graph.path_count(),
        paths_after = filtered.path_count(),
        "filtered by shiptype"
    );
    Ok(filtered)
}

/// One graph per shiptype present, in ascending shiptype order.
pub fn split_by_shiptype(graph: &Graph) -> Result<BTreeMap<i32, Graph>> {
    ensure_uncrossed(graph)?;
    let mut shiptypes: Vec<i32> = graph.paths().iter().map(Trajectory::shiptype).collect();
    shiptypes.sort_unstable();
    shiptypes.dedup();

    let mut split = BTreeMap::new();
    for shiptype in shiptypes {
        let part = copy_paths(graph, |_, path| Ok(path.shiptype() == shiptype))?;
        split.insert(shiptype, part);
    }
    info!(groups = split.len(), "split graph by shiptype");
    Ok(split)
}

/// Drop trajectories whose first and last nodes lie closer than `min_km`.
pub fn retain_min_separation(graph: &Graph, min_km: f64) -> Result<Graph> {
    ensure_uncrossed(graph)?;
    let filtered = copy_paths(graph, |graph, path| {
        let (first, last) = graph.path_endpoints(path.id())?;
        let (first, last) = (graph.node(first)?, graph.node(last)?);
        Ok(haversine_km(first.lat, first.lon, last.lat, last.lon) >= min_km)
    })?;
    info!(
        min_km,
        paths_before = graph.path_count(),
        paths_after = filtered.path_count(),
        "filtered by endpoint separation"
    );
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersections::record_checked;

    fn fleet() -> Graph {
        let mut graph = Graph::new();
        let tracks: [(i32, &[(f64, f64)]); 3] = [
            (70, &[(0.0, 0.0), (0.0, 0.5), (0.0, 1.0)]),
            (80, &[(10.0, 10.0), (10.0, 10.001)]),
            (70, &[(5.0, 5.0), (6.0, 5.0)]),
        ];
        for (shiptype, points) in tracks {
            let mut previous = None;
            let mut path = None;
            for &(lat, lon) in points {
                let node = graph.add_node(lat, lon, 10.0);
                match (previous, path) {
                    (Some(prev), Some(path)) => {
                        graph.add_edge(prev, node, 60.0).unwrap();
                        graph.extend_path(path, node).unwrap();
                    }
                    _ => path = Some(graph.start_path(shiptype, node).unwrap()),
                }
                previous = Some(node);
            }
        }
        graph
    }

    #[test]
    fn shiptype_filter_renumbers_nodes() {
        let filtered = retain_shiptype(&fleet(), 70).unwrap();
        assert_eq!(filtered.path_count(), 2);
        assert_eq!(filtered.node_count(), 5);
        assert_eq!(filtered.edge_count(), 3);
        assert_eq!(filtered.path_nodes(1).unwrap().collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(filtered.node(3).unwrap().lat, 5.0);
        assert_eq!(filtered.neighbours(3)[0].target, 4);
    }

    #[test]
    fn split_groups_every_shiptype() {
        let split = split_by_shiptype(&fleet()).unwrap();
        assert_eq!(split.keys().copied().collect::<Vec<_>>(), vec![70, 80]);
        assert_eq!(split[&80].path_count(), 1);
        assert_eq!(split[&80].node_count(), 2);
    }

    #[test]
    fn short_trips_are_dropped() {
        let filtered = retain_min_separation(&fleet(), 1.0).unwrap();
        assert_eq!(filtered.path_count(), 2);
        assert!(filtered.paths().iter().all(|p| p.shiptype() == 70));
    }

    #[test]
    fn crossed_graphs_are_refused() {
        let mut graph = fleet();
        record_checked(&mut graph, 0, 2).unwrap();
        assert!(matches!(retain_shiptype(&graph, 70), Err(Error::CrossedGraph)));
        assert!(matches!(split_by_shiptype(&graph), Err(Error::CrossedGraph)));
        assert!(matches!(
            retain_min_separation(&graph, 1.0),
            Err(Error::CrossedGraph)
        ));
    }
}
