mod common;

use shiproute_lib::{append_csv, load_csv, shiptype_counts, Graph, IngestOptions};

use common::sample_tracks;

#[test]
fn sample_tracks_load_into_four_trajectories() {
    let graph = load_csv(&sample_tracks()).expect("fixture loads");

    assert_eq!(graph.path_count(), 4);
    assert_eq!(graph.node_count(), 9);
    assert_eq!(graph.edge_count(), 5);
    assert!(!graph.is_crossed());

    let bravo = graph.path(1).unwrap();
    assert_eq!(bravo.shiptype(), 70);
    let (first, last) = graph.path_endpoints(1).unwrap();
    assert_eq!(graph.neighbours(first)[0].target, last);
    assert_eq!(graph.neighbours(first)[0].travel_time, 5400.0);

    let delta_first = graph.path_endpoints(3).unwrap().0;
    assert_eq!(graph.neighbours(delta_first)[0].travel_time, 10800.5);
}

#[test]
fn shiptype_counts_group_trajectories() {
    let graph = load_csv(&sample_tracks()).unwrap();
    let counts = shiptype_counts(&graph);
    assert_eq!(counts.into_iter().collect::<Vec<_>>(), vec![(70, 3), (80, 1)]);
}

#[test]
fn appending_keeps_existing_ids() {
    let mut graph = Graph::new();
    let options = IngestOptions::default();
    let first = append_csv(&mut graph, &sample_tracks(), &options).unwrap();
    let second = append_csv(&mut graph, &sample_tracks(), &options).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.skipped, 1);
    assert_eq!(graph.path_count(), 8);
    assert_eq!(graph.path_nodes(4).unwrap().next(), Some(9));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_csv(&common::fixtures_dir().join("no_such_tracks.csv")).unwrap_err();
    assert!(matches!(err, shiproute_lib::Error::Io(_)));
}
