use std::time::Duration;

use crate::graph::NodeId;

use super::engine::SearchOutcome;

/// Engine step that a monitor may be asked to time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Heuristic,
    Enqueue,
    Dequeue,
    Reposition,
}

/// Observer of an A* run. Every callback defaults to a no-op and none of them
/// can influence the search.
pub trait SearchMonitor {
    /// When `false` the engine skips clock reads and never calls [`Self::record`].
    fn is_timing(&self) -> bool {
        false
    }

    /// Time spent in one engine step.
    fn record(&mut self, _operation: Operation, _elapsed: Duration) {}

    /// Called once per node closed without being the goal.
    fn on_expand(&mut self, _node: NodeId) {}

    /// Called when the run terminates, with the wall time of the whole run.
    fn on_finish(&mut self, _outcome: SearchOutcome, _elapsed: Duration) {}
}

/// Monitor that observes nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpMonitor;

impl SearchMonitor for NoOpMonitor {}

/// Aggregated timings and counters of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchMetrics {
    pub expanded: usize,
    pub heuristic_time: Duration,
    pub enqueue_time: Duration,
    pub dequeue_time: Duration,
    pub reposition_time: Duration,
    pub total_time: Duration,
}

/// Monitor that accumulates [`SearchMetrics`].
#[derive(Debug, Clone, Default)]
pub struct MetricsMonitor {
    metrics: SearchMetrics,
}

impl MetricsMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }

    pub fn into_metrics(self) -> SearchMetrics {
        self.metrics
    }
}

impl SearchMonitor for MetricsMonitor {
    fn is_timing(&self) -> bool {
        true
    }

    fn record(&mut self, operation: Operation, elapsed: Duration) {
        let slot = match operation {
            Operation::Heuristic => &mut self.metrics.heuristic_time,
            Operation::Enqueue => &mut self.metrics.enqueue_time,
            Operation::Dequeue => &mut self.metrics.dequeue_time,
            Operation::Reposition => &mut self.metrics.reposition_time,
        };
        *slot += elapsed;
    }

    fn on_expand(&mut self, _node: NodeId) {
        self.metrics.expanded += 1;
    }

    fn on_finish(&mut self, _outcome: SearchOutcome, elapsed: Duration) {
        self.metrics.total_time = elapsed;
    }
}
