use crate::error::{Error, Result};
use crate::graph::NodeId;

use super::{ensure_slot, Priority, PriorityQueue, QueueKind};

/// Coordinate of a heap cell: `depth` levels below the root, `slot` from the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapSlot {
    pub depth: u32,
    pub slot: usize,
}

impl HeapSlot {
    pub const ROOT: HeapSlot = HeapSlot { depth: 0, slot: 0 };

    /// Linear array index, `2^depth - 1 + slot`.
    pub fn index(self) -> usize {
        (1usize << self.depth) - 1 + self.slot
    }

    /// Coordinate of the cell stored at linear index `index`.
    pub fn from_index(index: usize) -> Self {
        let depth = usize::BITS - 1 - (index + 1).leading_zeros();
        HeapSlot {
            depth,
            slot: index + 1 - (1usize << depth),
        }
    }

    pub fn parent(self) -> Option<HeapSlot> {
        (self.depth > 0).then(|| HeapSlot {
            depth: self.depth - 1,
            slot: self.slot / 2,
        })
    }

    pub fn left(self) -> HeapSlot {
        HeapSlot {
            depth: self.depth + 1,
            slot: 2 * self.slot,
        }
    }

    pub fn right(self) -> HeapSlot {
        HeapSlot {
            depth: self.depth + 1,
            slot: 2 * self.slot + 1,
        }
    }
}

/// Binary min-heap stored level by level in a flat array.
///
/// `levels` counts the depth levels in use and `last_level_count` the occupied
/// cells of the deepest one; together they locate the next free cell without
/// a separate size field. A `node -> index` table makes reposition O(log n).
#[derive(Debug, Clone, Default)]
pub struct BinaryHeap {
    cells: Vec<NodeId>,
    index_of: Vec<Option<usize>>,
    levels: u32,
    last_level_count: usize,
}

impl BinaryHeap {
    fn next_free(&self) -> HeapSlot {
        if self.levels == 0 || self.last_level_count == 1usize << (self.levels - 1) {
            HeapSlot {
                depth: self.levels,
                slot: 0,
            }
        } else {
            HeapSlot {
                depth: self.levels - 1,
                slot: self.last_level_count,
            }
        }
    }

    fn last_occupied(&self) -> Option<HeapSlot> {
        (self.levels > 0).then(|| HeapSlot {
            depth: self.levels - 1,
            slot: self.last_level_count - 1,
        })
    }

    fn node_at(&self, slot: HeapSlot) -> NodeId {
        self.cells[slot.index()]
    }

    fn swap(&mut self, a: HeapSlot, b: HeapSlot) {
        let (ia, ib) = (a.index(), b.index());
        self.cells.swap(ia, ib);
        self.index_of[self.cells[ia]] = Some(ia);
        self.index_of[self.cells[ib]] = Some(ib);
    }

    fn sift_up<P: Priority + ?Sized>(&mut self, mut slot: HeapSlot, priorities: &P) {
        while let Some(parent) = slot.parent() {
            let key = priorities.priority(self.node_at(slot));
            if key < priorities.priority(self.node_at(parent)) {
                self.swap(slot, parent);
                slot = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down<P: Priority + ?Sized>(&mut self, mut slot: HeapSlot, priorities: &P) {
        let len = self.cells.len();
        loop {
            let left = slot.left();
            if left.index() >= len {
                break;
            }
            let right = slot.right();
            let mut child = left;
            if right.index() < len
                && priorities.priority(self.node_at(left)) > priorities.priority(self.node_at(right))
            {
                child = right;
            }
            if priorities.priority(self.node_at(slot)) <= priorities.priority(self.node_at(child)) {
                break;
            }
            self.swap(slot, child);
            slot = child;
        }
    }

    /// Node ids in array order (root first).
    pub fn as_slice(&self) -> &[NodeId] {
        &self.cells
    }

    /// Number of depth levels currently in use.
    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Occupied cells on the deepest level.
    pub fn last_level_count(&self) -> usize {
        self.last_level_count
    }
}

impl PriorityQueue for BinaryHeap {
    fn with_node_capacity(nodes: usize) -> Result<Self> {
        let mut cells = Vec::new();
        let mut index_of = Vec::new();
        cells
            .try_reserve_exact(nodes)
            .map_err(|_| Error::QueueAllocation { nodes })?;
        index_of
            .try_reserve_exact(nodes)
            .map_err(|_| Error::QueueAllocation { nodes })?;
        index_of.resize(nodes, None);
        Ok(Self {
            cells,
            index_of,
            levels: 0,
            last_level_count: 0,
        })
    }

    fn kind(&self) -> QueueKind {
        QueueKind::BinaryHeap
    }

    fn enqueue<P: Priority + ?Sized>(&mut self, node: NodeId, priorities: &P) -> Result<()> {
        debug_assert!(!self.contains(node), "node {node} enqueued twice");
        ensure_slot(&mut self.index_of, node, None)?;
        self.cells
            .try_reserve(1)
            .map_err(|_| Error::QueueAllocation {
                nodes: self.cells.len() + 1,
            })?;

        let slot = self.next_free();
        if slot.depth == self.levels {
            self.levels += 1;
            self.last_level_count = 1;
        } else {
            self.last_level_count += 1;
        }
        debug_assert_eq!(slot.index(), self.cells.len());
        self.cells.push(node);
        self.index_of[node] = Some(slot.index());
        self.sift_up(slot, priorities);
        Ok(())
    }

    fn dequeue<P: Priority + ?Sized>(&mut self, priorities: &P) -> Option<NodeId> {
        let last = self.last_occupied()?;
        let root = self.node_at(HeapSlot::ROOT);
        if last != HeapSlot::ROOT {
            self.swap(HeapSlot::ROOT, last);
        }
        self.cells.pop();
        self.index_of[root] = None;

        self.last_level_count -= 1;
        if self.last_level_count == 0 {
            self.levels -= 1;
            self.last_level_count = if self.levels > 0 {
                1usize << (self.levels - 1)
            } else {
                0
            };
        }

        if !self.cells.is_empty() {
            self.sift_down(HeapSlot::ROOT, priorities);
        }
        Some(root)
    }

    fn reposition<P: Priority + ?Sized>(&mut self, node: NodeId, priorities: &P) -> Result<()> {
        let index = self
            .index_of
            .get(node)
            .copied()
            .flatten()
            .ok_or(Error::NotQueued { node })?;
        self.sift_up(HeapSlot::from_index(index), priorities);
        Ok(())
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    fn contains(&self, node: NodeId) -> bool {
        matches!(self.index_of.get(node), Some(Some(_)))
    }
}
