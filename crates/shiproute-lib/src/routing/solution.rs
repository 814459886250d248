use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};

use super::state::SearchState;

/// Reverse the parent chain from `goal` back to `start` in place so each
/// entry's `parent` names its successor. Returns the number of nodes on the chain.
pub fn reverse_parent_chain(state: &mut SearchState, start: NodeId, goal: NodeId) -> Result<usize> {
    let broken = || Error::BrokenParentChain { start, goal };

    let mut son = goal;
    let mut parent = state.get(goal).parent;
    state.get_mut(goal).parent = None;
    let mut length = 1;

    while son != start {
        let current = parent.ok_or_else(broken)?;
        if length > state.len() {
            return Err(broken());
        }
        let grandparent = state.get(current).parent;
        state.get_mut(current).parent = Some(son);
        son = current;
        parent = grandparent;
        length += 1;
    }

    Ok(length)
}

/// Cumulative cost attached to a route record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteCost {
    /// The first record of a route.
    Source,
    /// Seconds elapsed since leaving the source.
    Elapsed(f64),
}

impl RouteCost {
    pub fn seconds(self) -> f64 {
        match self {
            RouteCost::Source => 0.0,
            RouteCost::Elapsed(seconds) => seconds,
        }
    }
}

impl Serialize for RouteCost {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            RouteCost::Source => serializer.serialize_str("source"),
            RouteCost::Elapsed(seconds) => serializer.serialize_f64(*seconds),
        }
    }
}

/// One stop of a reconstructed route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRecord {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
    pub cost: RouteCost,
}

/// Source-to-goal sequence of nodes with cumulative travel time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    records: Vec<RouteRecord>,
}

impl Route {
    /// Walk a reversed chain forward from `start`.
    pub(crate) fn from_forward_chain(graph: &Graph, state: &SearchState, start: NodeId) -> Result<Self> {
        let mut records = Vec::new();
        let mut cursor = Some(start);
        while let Some(id) = cursor {
            let node = graph.node(id)?;
            let cost = if id == start {
                RouteCost::Source
            } else {
                RouteCost::Elapsed(state.get(id).g)
            };
            records.push(RouteRecord {
                id,
                lat: node.lat,
                lon: node.lon,
                cost,
            });
            cursor = state.get(id).parent;
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.records.iter().map(|record| record.id)
    }

    /// Travel time to the last record, in seconds.
    pub fn total_time(&self) -> f64 {
        self.records
            .last()
            .map(|record| record.cost.seconds())
            .unwrap_or(0.0)
    }
}

/// Final state of every node touched by a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeClassification {
    pub on_route: Vec<NodeId>,
    pub expanded: Vec<NodeId>,
    pub queued: Vec<NodeId>,
}

/// Partition touched nodes; nodes on the route are excluded from the other sets.
pub fn classify_nodes(state: &SearchState, route: &Route) -> NodeClassification {
    let mut on_route: Vec<NodeId> = route.node_ids().collect();
    on_route.sort_unstable();

    let mut classification = NodeClassification::default();
    for (id, entry) in state.iter() {
        if on_route.binary_search(&id).is_ok() {
            continue;
        }
        if entry.in_queue {
            classification.queued.push(id);
        } else if entry.closed {
            classification.expanded.push(id);
        }
    }
    classification.on_route = on_route;
    classification
}
