mod common;

use shiproute_lib::{
    augment, load_csv, retain_min_separation, retain_shiptype, split_by_shiptype, Error,
};

use common::sample_tracks;

#[test]
fn shiptype_subset_keeps_order_and_edges() {
    let graph = load_csv(&sample_tracks()).unwrap();
    let tankers = retain_shiptype(&graph, 80).unwrap();

    assert_eq!(tankers.path_count(), 1);
    assert_eq!(tankers.node_count(), 2);
    assert_eq!(tankers.edge_count(), 1);
    assert_eq!(tankers.neighbours(0)[0].travel_time, 7200.0);
}

#[test]
fn split_covers_every_trajectory() {
    let graph = load_csv(&sample_tracks()).unwrap();
    let split = split_by_shiptype(&graph).unwrap();

    let total: usize = split.values().map(|part| part.path_count()).sum();
    assert_eq!(total, graph.path_count());
    let nodes: usize = split.values().map(|part| part.node_count()).sum();
    assert_eq!(nodes, graph.node_count());
}

#[test]
fn separation_threshold_drops_short_trips() {
    let graph = load_csv(&sample_tracks()).unwrap();
    // ALPHA ~157 km, BRAVO ~126 km, CHARLIE ~111 km, DELTA ~59 km.
    let long = retain_min_separation(&graph, 100.0).unwrap();
    assert_eq!(long.path_count(), 3);
    assert!(long.paths().iter().all(|path| path.len() >= 2));
}

#[test]
fn intersected_graphs_cannot_be_filtered() {
    let mut graph = load_csv(&sample_tracks()).unwrap();
    augment(&mut graph).unwrap();
    assert!(matches!(retain_shiptype(&graph, 70), Err(Error::CrossedGraph)));
}
