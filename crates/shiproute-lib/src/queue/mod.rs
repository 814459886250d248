//! Priority queues driving the A* open set.
//!
//! Queues store node ids only. Priorities live with the caller (usually the
//! per-run [`SearchState`](crate::routing::SearchState)) and are read through
//! the [`Priority`] trait, so a decrease-key is "update the value, then call
//! [`PriorityQueue::reposition`]".

mod binary_heap;
mod ordered_list;

pub use binary_heap::{BinaryHeap, HeapSlot};
pub use ordered_list::OrderedList;

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::NodeId;

/// Source of the current priority (`f` value) of a node.
pub trait Priority {
    fn priority(&self, node: NodeId) -> f64;
}

impl Priority for [f64] {
    fn priority(&self, node: NodeId) -> f64 {
        self.get(node).copied().unwrap_or(f64::INFINITY)
    }
}

/// Min-priority queue over node ids.
pub trait PriorityQueue {
    /// Create an empty queue sized for a graph of `nodes` nodes.
    fn with_node_capacity(nodes: usize) -> Result<Self>
    where
        Self: Sized;

    fn kind(&self) -> QueueKind;

    /// Insert a node that is not currently queued.
    fn enqueue<P: Priority + ?Sized>(&mut self, node: NodeId, priorities: &P) -> Result<()>;

    /// Remove and return the node with the smallest priority.
    fn dequeue<P: Priority + ?Sized>(&mut self, priorities: &P) -> Option<NodeId>;

    /// Restore ordering after the priority of a queued node strictly decreased.
    fn reposition<P: Priority + ?Sized>(&mut self, node: NodeId, priorities: &P) -> Result<()>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, node: NodeId) -> bool;
}

/// Selectable queue backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    /// Sorted singly linked list, FIFO among equal priorities.
    OrderedList,
    /// Array-backed binary min-heap.
    #[default]
    BinaryHeap,
}

impl QueueKind {
    pub const ALL: [QueueKind; 2] = [QueueKind::OrderedList, QueueKind::BinaryHeap];

    /// Resolve the numeric selector used by batch tooling (0 or 1).
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(QueueKind::OrderedList),
            1 => Ok(QueueKind::BinaryHeap),
            _ => Err(Error::UnsupportedQueue { code }),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            QueueKind::OrderedList => 0,
            QueueKind::BinaryHeap => 1,
        }
    }

    /// Short column suffix used in metrics files.
    pub fn abbreviation(self) -> &'static str {
        match self {
            QueueKind::OrderedList => "LL",
            QueueKind::BinaryHeap => "BH",
        }
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            QueueKind::OrderedList => "ordered-list",
            QueueKind::BinaryHeap => "binary-heap",
        };
        f.write_str(value)
    }
}

/// Grow a node-indexed lookup table so `node` is addressable.
fn ensure_slot<T: Clone>(table: &mut Vec<T>, node: NodeId, fill: T) -> Result<()> {
    if node < table.len() {
        return Ok(());
    }
    let additional = node + 1 - table.len();
    table
        .try_reserve(additional)
        .map_err(|_| Error::QueueAllocation { nodes: node + 1 })?;
    table.resize(node + 1, fill);
    Ok(())
}
