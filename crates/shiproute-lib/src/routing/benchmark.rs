use tracing::{debug, info};

use crate::error::Result;
use crate::graph::{Graph, PathId};
use crate::heuristic::{haversine_km, Heuristic};
use crate::queue::QueueKind;

use super::monitor::{MetricsMonitor, SearchMetrics};
use super::run_search;

/// Outcome of routing one trajectory with one queue backend.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueRun {
    pub queue: QueueKind,
    /// Travel time of the route found, `None` when the goal was unreachable.
    pub cost: Option<f64>,
    pub solution_nodes: usize,
    pub metrics: SearchMetrics,
}

/// Metrics for routing a trajectory from its first to its last node.
#[derive(Debug, Clone, PartialEq)]
pub struct PathBenchmark {
    pub path: PathId,
    pub separation_km: f64,
    pub runs: Vec<QueueRun>,
}

impl PathBenchmark {
    pub fn run(&self, queue: QueueKind) -> Option<&QueueRun> {
        self.runs.iter().find(|run| run.queue == queue)
    }
}

/// Route every trajectory end to end with each queue backend under a
/// [`MetricsMonitor`].
pub fn benchmark_paths(graph: &Graph, heuristic: Heuristic) -> Result<Vec<PathBenchmark>> {
    let mut results = Vec::with_capacity(graph.path_count());
    let mut unreachable = 0usize;

    for trajectory in graph.paths() {
        let (source, goal) = graph.path_endpoints(trajectory.id())?;
        let (start, end) = (graph.node(source)?, graph.node(goal)?);
        let separation_km = haversine_km(start.lat, start.lon, end.lat, end.lon);

        let mut runs = Vec::with_capacity(QueueKind::ALL.len());
        for queue in QueueKind::ALL {
            let mut monitor = MetricsMonitor::new();
            let mut search = run_search(graph, source, goal, heuristic, queue, &mut monitor)?;
            let (cost, solution_nodes) = if search.is_found() {
                (search.cost(), search.route(graph)?.len())
            } else {
                unreachable += 1;
                (None, 0)
            };
            runs.push(QueueRun {
                queue,
                cost,
                solution_nodes,
                metrics: monitor.into_metrics(),
            });
        }

        debug!(path = trajectory.id(), separation_km, "benchmarked trajectory");
        results.push(PathBenchmark {
            path: trajectory.id(),
            separation_km,
            runs,
        });
    }

    info!(
        paths = results.len(),
        unreachable,
        heuristic = %heuristic,
        "benchmark complete"
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_backends_agree_on_every_trajectory() {
        let mut graph = Graph::new();
        let a = graph.add_node(0.0, 0.0, 10.0);
        let b = graph.add_node(0.1, 0.1, 10.0);
        let c = graph.add_node(0.2, 0.2, 12.0);
        graph.add_edge(a, b, 100.0).unwrap();
        graph.add_edge(b, c, 150.0).unwrap();
        let path = graph.start_path(1, a).unwrap();
        graph.extend_path(path, b).unwrap();
        graph.extend_path(path, c).unwrap();

        let results = benchmark_paths(&graph, Heuristic::Zero).unwrap();
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert!(result.separation_km > 31.0 && result.separation_km < 32.0);
        for queue in QueueKind::ALL {
            let run = result.run(queue).unwrap();
            assert_eq!(run.cost, Some(250.0));
            assert_eq!(run.solution_nodes, 3);
            assert_eq!(run.metrics.expanded, 2);
        }
    }
}
