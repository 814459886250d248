use crate::error::{Error, Result};
use crate::graph::NodeId;

use super::{ensure_slot, Priority, PriorityQueue, QueueKind};

#[derive(Debug, Clone, Copy)]
struct Entry {
    node: NodeId,
    next: Option<usize>,
}

/// Ascending singly linked list of node ids kept in a slot arena.
///
/// Insertion walks past every entry whose priority is `<=` the new one, so
/// entries with equal priority leave in the order they arrived. Dequeue is
/// O(1); enqueue and reposition are linear in the queue length.
#[derive(Debug, Clone, Default)]
pub struct OrderedList {
    entries: Vec<Entry>,
    free: Vec<usize>,
    head: Option<usize>,
    slot_of: Vec<Option<usize>>,
    len: usize,
}

impl OrderedList {
    fn allocate(&mut self, node: NodeId) -> Result<usize> {
        ensure_slot(&mut self.slot_of, node, None)?;
        let slot = match self.free.pop() {
            Some(slot) => {
                self.entries[slot] = Entry { node, next: None };
                slot
            }
            None => {
                self.entries
                    .try_reserve(1)
                    .map_err(|_| Error::QueueAllocation {
                        nodes: self.entries.len() + 1,
                    })?;
                self.entries.push(Entry { node, next: None });
                self.entries.len() - 1
            }
        };
        self.slot_of[node] = Some(slot);
        Ok(slot)
    }

    /// Link an unlinked slot into the chain at its ordered position.
    fn link<P: Priority + ?Sized>(&mut self, slot: usize, priorities: &P) {
        let key = priorities.priority(self.entries[slot].node);
        let Some(head) = self.head else {
            self.entries[slot].next = None;
            self.head = Some(slot);
            return;
        };

        if key < priorities.priority(self.entries[head].node) {
            self.entries[slot].next = Some(head);
            self.head = Some(slot);
            return;
        }

        let mut cursor = head;
        while let Some(next) = self.entries[cursor].next {
            if priorities.priority(self.entries[next].node) <= key {
                cursor = next;
            } else {
                break;
            }
        }
        self.entries[slot].next = self.entries[cursor].next;
        self.entries[cursor].next = Some(slot);
    }

    /// Detach a slot from the chain without releasing it.
    fn unlink(&mut self, slot: usize) {
        if self.head == Some(slot) {
            self.head = self.entries[slot].next;
            return;
        }
        let mut cursor = self.head;
        while let Some(current) = cursor {
            let next = self.entries[current].next;
            if next == Some(slot) {
                self.entries[current].next = self.entries[slot].next;
                return;
            }
            cursor = next;
        }
    }

    /// Node ids from front to back.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let slot = cursor?;
            cursor = self.entries[slot].next;
            Some(self.entries[slot].node)
        })
    }
}

impl PriorityQueue for OrderedList {
    fn with_node_capacity(nodes: usize) -> Result<Self> {
        let mut slot_of = Vec::new();
        slot_of
            .try_reserve_exact(nodes)
            .map_err(|_| Error::QueueAllocation { nodes })?;
        slot_of.resize(nodes, None);
        Ok(Self {
            slot_of,
            ..Self::default()
        })
    }

    fn kind(&self) -> QueueKind {
        QueueKind::OrderedList
    }

    fn enqueue<P: Priority + ?Sized>(&mut self, node: NodeId, priorities: &P) -> Result<()> {
        debug_assert!(!self.contains(node), "node {node} enqueued twice");
        let slot = self.allocate(node)?;
        self.link(slot, priorities);
        self.len += 1;
        Ok(())
    }

    fn dequeue<P: Priority + ?Sized>(&mut self, _priorities: &P) -> Option<NodeId> {
        let slot = self.head?;
        let entry = self.entries[slot];
        self.head = entry.next;
        self.slot_of[entry.node] = None;
        self.free.push(slot);
        self.len -= 1;
        Some(entry.node)
    }

    fn reposition<P: Priority + ?Sized>(&mut self, node: NodeId, priorities: &P) -> Result<()> {
        let slot = self
            .slot_of
            .get(node)
            .copied()
            .flatten()
            .ok_or(Error::NotQueued { node })?;
        self.unlink(slot);
        self.link(slot, priorities);
        Ok(())
    }

    fn len(&self) -> usize {
        self.len
    }

    fn contains(&self, node: NodeId) -> bool {
        matches!(self.slot_of.get(node), Some(Some(_)))
    }
}
