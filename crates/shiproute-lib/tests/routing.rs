mod common;

use shiproute_lib::queue::{BinaryHeap, OrderedList, PriorityQueue};
use shiproute_lib::routing::{run_search, search, NoOpMonitor, SearchMonitor};
use shiproute_lib::{
    plan_route, Coordinate, Error, Graph, Heuristic, NodeId, QueueKind, RouteRequest,
};

use common::{add_track, dijkstra, scattered_graph};

fn zero_heuristic_cost<Q: PriorityQueue>(graph: &Graph, source: NodeId, goal: NodeId) -> Option<f64> {
    search::<Q, _>(graph, source, goal, Heuristic::Zero, &mut NoOpMonitor)
        .expect("search runs")
        .cost()
}

#[test]
fn zero_heuristic_matches_dijkstra_on_both_backends() {
    for seed in 0..8 {
        let graph = scattered_graph(seed, 40, 160);
        let truth = dijkstra(&graph, 0);
        for goal in 1..graph.node_count() {
            let list = zero_heuristic_cost::<OrderedList>(&graph, 0, goal);
            let heap = zero_heuristic_cost::<BinaryHeap>(&graph, 0, goal);
            if truth[goal].is_finite() {
                let expected = truth[goal];
                let list = list.expect("ordered list reaches goal");
                let heap = heap.expect("binary heap reaches goal");
                assert!((list - expected).abs() < 1e-6, "seed {seed} goal {goal}");
                assert!((heap - expected).abs() < 1e-6, "seed {seed} goal {goal}");
            } else {
                assert_eq!(list, None);
                assert_eq!(heap, None);
            }
        }
    }
}

#[test]
fn reconstructed_route_follows_existing_edges() {
    let graph = scattered_graph(42, 30, 120);
    let truth = dijkstra(&graph, 0);
    let goal = (1..graph.node_count())
        .find(|&n| truth[n].is_finite())
        .expect("some node reachable");

    for queue in QueueKind::ALL {
        let mut run = run_search(&graph, 0, goal, Heuristic::Zero, queue, &mut NoOpMonitor)
            .expect("search runs");
        let route = run.route(&graph).expect("route reconstructs");
        let ids: Vec<NodeId> = route.node_ids().collect();
        assert_eq!(ids.first(), Some(&0));
        assert_eq!(ids.last(), Some(&goal));
        let mut total = 0.0;
        for pair in ids.windows(2) {
            let edge = graph
                .neighbours(pair[0])
                .iter()
                .filter(|edge| edge.target == pair[1])
                .map(|edge| edge.travel_time)
                .fold(f64::INFINITY, f64::min);
            assert!(edge.is_finite(), "route uses missing edge {pair:?}");
            total += edge;
        }
        assert!((total - route.total_time()).abs() < 1e-6);
    }
}

fn diamond(first_branch: NodeId) -> Graph {
    let mut graph = Graph::new();
    for (lat, lon) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
        graph.add_node(lat, lon, 10.0);
    }
    let second_branch = 3 - first_branch;
    graph.add_edge(0, first_branch, 1.0).unwrap();
    graph.add_edge(0, second_branch, 1.0).unwrap();
    graph.add_edge(1, 3, 1.0).unwrap();
    graph.add_edge(2, 3, 1.0).unwrap();
    graph
}

#[test]
fn diamond_ties_resolve_in_enqueue_order() {
    for first_branch in [1, 2] {
        let graph = diamond(first_branch);
        for queue in QueueKind::ALL {
            let mut run = run_search(&graph, 0, 3, Heuristic::Zero, queue, &mut NoOpMonitor)
                .expect("search runs");
            assert_eq!(run.cost(), Some(2.0));
            let route: Vec<NodeId> = run.route(&graph).unwrap().node_ids().collect();
            assert_eq!(route, vec![0, first_branch, 3], "{queue}");
        }
    }
}

#[test]
fn plan_by_coordinates_snaps_to_nearest_nodes() {
    let mut graph = Graph::new();
    add_track(&mut graph, 70, &[(0.0, 0.0), (0.0, 0.1), (0.0, 0.2)], 600.0);
    add_track(&mut graph, 70, &[(1.0, 1.0), (1.0, 1.1)], 600.0);

    let request = RouteRequest::between_coordinates(
        Coordinate::new(0.01, -0.01),
        Coordinate::new(0.02, 0.19),
    );
    let plan = plan_route(&graph, &request).expect("route exists");
    assert_eq!((plan.source, plan.goal), (0, 2));
    assert_eq!(plan.hop_count(), 2);
    assert_eq!(plan.route.total_time(), 1200.0);
    assert_eq!(plan.classification.on_route, vec![0, 1, 2]);
}

#[test]
fn plan_along_trajectory_uses_its_endpoints() {
    let mut graph = Graph::new();
    add_track(&mut graph, 70, &[(0.0, 0.0), (0.0, 0.1)], 60.0);
    let path = add_track(&mut graph, 70, &[(1.0, 1.0), (1.0, 1.1), (1.1, 1.1)], 90.0);

    for heuristic in Heuristic::ALL {
        let request = RouteRequest::along_path(path)
            .with_heuristic(heuristic)
            .with_queue(QueueKind::OrderedList);
        let plan = plan_route(&graph, &request).expect("route exists");
        assert_eq!((plan.source, plan.goal), (2, 4));
        assert_eq!(plan.route.total_time(), 180.0);
        assert_eq!(plan.heuristic, heuristic);
    }
}

#[test]
fn unreachable_goal_is_route_not_found() {
    let mut graph = Graph::new();
    add_track(&mut graph, 70, &[(0.0, 0.0), (0.0, 0.1)], 60.0);
    add_track(&mut graph, 70, &[(1.0, 1.0), (1.0, 1.1)], 60.0);

    let err = plan_route(&graph, &RouteRequest::between_nodes(0, 3)).unwrap_err();
    assert!(matches!(err, Error::RouteNotFound { start: 0, goal: 3 }));
}

#[derive(Default)]
struct ExpansionLog {
    expanded: Vec<NodeId>,
    finished: bool,
}

impl SearchMonitor for ExpansionLog {
    fn on_expand(&mut self, node: NodeId) {
        self.expanded.push(node);
    }

    fn on_finish(
        &mut self,
        _outcome: shiproute_lib::routing::SearchOutcome,
        _elapsed: std::time::Duration,
    ) {
        self.finished = true;
    }
}

#[test]
fn custom_monitor_sees_every_expansion() {
    let graph = diamond(1);
    let mut log = ExpansionLog::default();
    let run = run_search(&graph, 0, 3, Heuristic::Zero, QueueKind::BinaryHeap, &mut log).unwrap();
    assert!(run.is_found());
    assert_eq!(log.expanded, vec![0, 1, 2]);
    assert!(log.finished);
}
