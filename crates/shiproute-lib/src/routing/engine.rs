use std::time::Instant;

use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::heuristic::Heuristic;
use crate::queue::PriorityQueue;

use super::monitor::{Operation, SearchMonitor};
use super::solution::{classify_nodes, reverse_parent_chain, NodeClassification, Route};
use super::state::SearchState;

/// How an A* run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The goal was dequeued.
    Found,
    /// The open set emptied without reaching the goal.
    Exhausted,
}

/// Result of one A* run, owning its scratch state.
#[derive(Debug, Clone)]
pub struct Search {
    source: NodeId,
    goal: NodeId,
    outcome: SearchOutcome,
    state: SearchState,
    reversed: bool,
}

impl Search {
    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn goal(&self) -> NodeId {
        self.goal
    }

    pub fn outcome(&self) -> SearchOutcome {
        self.outcome
    }

    pub fn is_found(&self) -> bool {
        self.outcome == SearchOutcome::Found
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Travel time of the best route to the goal, if one was found.
    pub fn cost(&self) -> Option<f64> {
        self.is_found().then(|| self.state.get(self.goal).g)
    }

    /// Rebuild the source-to-goal route, reversing the parent chain in place
    /// on first use.
    pub fn route(&mut self, graph: &Graph) -> Result<Route> {
        if !self.is_found() {
            return Err(Error::RouteNotFound {
                start: self.source,
                goal: self.goal,
            });
        }
        if !self.reversed {
            reverse_parent_chain(&mut self.state, self.source, self.goal)?;
            self.reversed = true;
        }
        Route::from_forward_chain(graph, &self.state, self.source)
    }

    /// Split every touched node into on-route, expanded and still-queued sets.
    pub fn classify(&self, route: &Route) -> NodeClassification {
        classify_nodes(&self.state, route)
    }
}

/// Run `f`, reporting its duration to `monitor` when it is timing.
fn timed<M, T>(monitor: &mut M, operation: Operation, f: impl FnOnce() -> T) -> T
where
    M: SearchMonitor + ?Sized,
{
    if !monitor.is_timing() {
        return f();
    }
    let start = Instant::now();
    let value = f();
    monitor.record(operation, start.elapsed());
    value
}

/// A* from `source` to `goal` over `graph` using queue backend `Q`.
///
/// Stops as soon as the goal is dequeued; the remaining open set is left as
/// is. An exhausted open set is reported as [`SearchOutcome::Exhausted`],
/// not as an error.
pub fn search<Q, M>(
    graph: &Graph,
    source: NodeId,
    goal: NodeId,
    heuristic: Heuristic,
    monitor: &mut M,
) -> Result<Search>
where
    Q: PriorityQueue,
    M: SearchMonitor + ?Sized,
{
    let started = Instant::now();
    let goal_node = graph.node(goal)?;
    let source_node = graph.node(source)?;

    let mut state = SearchState::new(graph.node_count())?;
    let mut queue = Q::with_node_capacity(graph.node_count())?;

    let estimate = timed(monitor, Operation::Heuristic, || {
        heuristic.estimate(source_node, goal_node)
    });
    {
        let entry = state.get_mut(source);
        entry.g = 0.0;
        entry.f = estimate;
        entry.parent = None;
        entry.in_queue = true;
    }
    timed(monitor, Operation::Enqueue, || queue.enqueue(source, &state))?;

    let mut outcome = SearchOutcome::Exhausted;
    while let Some(current) = timed(monitor, Operation::Dequeue, || queue.dequeue(&state)) {
        {
            let entry = state.get_mut(current);
            entry.in_queue = false;
            entry.closed = true;
        }
        if current == goal {
            outcome = SearchOutcome::Found;
            break;
        }
        monitor.on_expand(current);

        let current_g = state.get(current).g;
        for edge in graph.neighbours(current) {
            let next = edge.target;
            if state.get(next).closed {
                continue;
            }

            let next_node = graph.node(next)?;
            let estimate = timed(monitor, Operation::Heuristic, || {
                heuristic.estimate(next_node, goal_node)
            });
            let g = current_g + edge.travel_time;
            let f = g + estimate;

            let entry = *state.get(next);
            if !entry.in_queue {
                let slot = state.get_mut(next);
                slot.g = g;
                slot.f = f;
                slot.parent = Some(current);
                slot.in_queue = true;
                timed(monitor, Operation::Enqueue, || queue.enqueue(next, &state))?;
            } else if f < entry.f {
                debug_assert!(f < entry.f, "reposition requires a strictly smaller key");
                let slot = state.get_mut(next);
                slot.g = g;
                slot.f = f;
                slot.parent = Some(current);
                timed(monitor, Operation::Reposition, || {
                    queue.reposition(next, &state)
                })?;
            }
        }
    }

    let elapsed = started.elapsed();
    monitor.on_finish(outcome, elapsed);
    debug!(
        source,
        goal,
        queue = %queue.kind(),
        heuristic = %heuristic,
        outcome = ?outcome,
        left_in_queue = queue.len(),
        elapsed_us = elapsed.as_micros() as u64,
        "search finished"
    );

    Ok(Search {
        source,
        goal,
        outcome,
        state,
        reversed: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::{BinaryHeap, OrderedList};
    use crate::routing::monitor::{MetricsMonitor, NoOpMonitor};

    /// Four nodes on a line with a detour: 0 -> 1 -> 3 (2 s) and 0 -> 2 -> 3 (5 s).
    fn detour_graph() -> Graph {
        let mut graph = Graph::new();
        for lon in 0..4 {
            graph.add_node(0.0, f64::from(lon), 10.0);
        }
        graph.add_edge(0, 1, 1.0).unwrap();
        graph.add_edge(1, 3, 1.0).unwrap();
        graph.add_edge(0, 2, 1.0).unwrap();
        graph.add_edge(2, 3, 4.0).unwrap();
        graph
    }

    #[test]
    fn finds_cheapest_route_with_both_backends() {
        let graph = detour_graph();
        for found in [
            search::<OrderedList, _>(&graph, 0, 3, Heuristic::Zero, &mut NoOpMonitor).unwrap(),
            search::<BinaryHeap, _>(&graph, 0, 3, Heuristic::Zero, &mut NoOpMonitor).unwrap(),
        ] {
            assert!(found.is_found());
            assert_eq!(found.cost(), Some(2.0));
            assert_eq!(found.state().get(3).parent, Some(1));
        }
    }

    #[test]
    fn unreachable_goal_exhausts() {
        let mut graph = detour_graph();
        let island = graph.add_node(5.0, 5.0, 10.0);
        let mut run =
            search::<BinaryHeap, _>(&graph, 0, island, Heuristic::Zero, &mut NoOpMonitor).unwrap();
        assert_eq!(run.outcome(), SearchOutcome::Exhausted);
        assert_eq!(run.cost(), None);
        assert!(matches!(
            run.route(&graph),
            Err(Error::RouteNotFound { start: 0, goal }) if goal == island
        ));
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        let graph = detour_graph();
        assert!(matches!(
            search::<OrderedList, _>(&graph, 0, 99, Heuristic::Zero, &mut NoOpMonitor),
            Err(Error::UnknownNode { node: 99, .. })
        ));
    }

    #[test]
    fn success_leaves_open_set_undrained() {
        // Star around node 0: the goal (1) is dequeued first, 2 and 3 stay queued.
        let mut graph = Graph::new();
        for lon in 0..4 {
            graph.add_node(0.0, f64::from(lon), 10.0);
        }
        graph.add_edge(0, 1, 1.0).unwrap();
        graph.add_edge(0, 2, 5.0).unwrap();
        graph.add_edge(0, 3, 6.0).unwrap();

        for mut run in [
            search::<OrderedList, _>(&graph, 0, 1, Heuristic::Zero, &mut NoOpMonitor).unwrap(),
            search::<BinaryHeap, _>(&graph, 0, 1, Heuristic::Zero, &mut NoOpMonitor).unwrap(),
        ] {
            assert!(run.is_found());
            let left: Vec<_> = run
                .state()
                .iter()
                .filter(|(_, s)| s.in_queue)
                .map(|(id, _)| id)
                .collect();
            assert_eq!(left, vec![2, 3]);

            let route = run.route(&graph).unwrap();
            let classes = run.classify(&route);
            assert_eq!(classes.on_route, vec![0, 1]);
            assert_eq!(classes.queued, vec![2, 3]);
            assert!(classes.expanded.is_empty());
        }
    }

    #[test]
    fn metrics_monitor_counts_expansions() {
        let graph = detour_graph();
        let mut monitor = MetricsMonitor::new();
        let run = search::<BinaryHeap, _>(&graph, 0, 3, Heuristic::Haversine, &mut monitor).unwrap();
        assert!(run.is_found());
        let metrics = monitor.into_metrics();
        assert!(metrics.expanded >= 2);
        assert!(metrics.total_time >= metrics.dequeue_time);
    }

    #[test]
    fn source_equal_to_goal_is_trivial() {
        let graph = detour_graph();
        let mut run =
            search::<BinaryHeap, _>(&graph, 2, 2, Heuristic::Haversine, &mut NoOpMonitor).unwrap();
        assert_eq!(run.cost(), Some(0.0));
        assert_eq!(run.route(&graph).unwrap().len(), 1);
    }
}
