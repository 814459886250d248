use crate::error::{Error, Result};
use crate::graph::NodeId;
use crate::queue::Priority;

/// Per-node bookkeeping for one A* run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeState {
    /// Best known travel time from the source, in seconds.
    pub g: f64,
    /// `g` plus the heuristic estimate to the goal.
    pub f: f64,
    /// Predecessor on the best known route. After reconstruction this points
    /// to the successor instead.
    pub parent: Option<NodeId>,
    pub in_queue: bool,
    pub closed: bool,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            g: f64::INFINITY,
            f: f64::INFINITY,
            parent: None,
            in_queue: false,
            closed: false,
        }
    }
}

/// Scratch state of a single search, one entry per graph node.
#[derive(Debug, Clone)]
pub struct SearchState {
    nodes: Vec<NodeState>,
}

impl SearchState {
    /// Allocate state for `nodes` nodes, failing instead of aborting on exhaustion.
    pub fn new(nodes: usize) -> Result<Self> {
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(nodes)
            .map_err(|_| Error::SearchAllocation { nodes })?;
        entries.resize(nodes, NodeState::default());
        Ok(Self { nodes: entries })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, node: NodeId) -> &NodeState {
        &self.nodes[node]
    }

    pub(crate) fn get_mut(&mut self, node: NodeId) -> &mut NodeState {
        &mut self.nodes[node]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeState)> {
        self.nodes.iter().enumerate()
    }
}

impl Priority for SearchState {
    fn priority(&self, node: NodeId) -> f64 {
        self.nodes
            .get(node)
            .map(|state| state.f)
            .unwrap_or(f64::INFINITY)
    }
}
