//! Insertion-ordered record storage.
//!
//! Records live in an arena of generational slots threaded into a doubly
//! linked list by index, giving O(1) append and O(1) removal by reference.

use crate::error::{GraphError, Result};
use crate::types::ListRecord;
use std::fmt;

/// Handle to a stored record.
///
/// A reference stops resolving once its record is removed, even if the
/// underlying slot is later reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reference {
    index: usize,
    generation: u64,
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref({}v{})", self.index, self.generation)
    }
}

struct Node {
    record: ListRecord,
    prev: Option<usize>,
    next: Option<usize>,
}

struct Slot {
    generation: u64,
    node: Option<Node>,
}

/// Ordered record store for a single list.
#[derive(Default)]
pub struct RecordStore {
    slots: Vec<Slot>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record at the tail.
    pub fn append(&mut self, record: ListRecord) -> Reference {
        let node = Node {
            record,
            prev: self.tail,
            next: None,
        };

        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index].node = Some(node);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        };

        match self.tail {
            Some(tail) => {
                if let Some(prev) = self.slots[tail].node.as_mut() {
                    prev.next = Some(index);
                }
            }
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;

        Reference {
            index,
            generation: self.slots[index].generation,
        }
    }

    /// Unlink a record, returning it.
    pub fn remove(&mut self, reference: Reference) -> Result<ListRecord> {
        if !self.contains(reference) {
            return Err(GraphError::StaleReference(reference));
        }
        let slot = &mut self.slots[reference.index];
        let node = slot
            .node
            .take()
            .ok_or(GraphError::StaleReference(reference))?;
        slot.generation += 1;

        match node.prev {
            Some(prev) => {
                if let Some(prev) = self.slots[prev].node.as_mut() {
                    prev.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => {
                if let Some(next) = self.slots[next].node.as_mut() {
                    next.prev = node.prev;
                }
            }
            None => self.tail = node.prev,
        }

        self.free.push(reference.index);
        self.len -= 1;
        Ok(node.record)
    }

    pub fn get(&self, reference: Reference) -> Option<&ListRecord> {
        let slot = self.slots.get(reference.index)?;
        if slot.generation != reference.generation {
            return None;
        }
        slot.node.as_ref().map(|node| &node.record)
    }

    fn contains(&self, reference: Reference) -> bool {
        self.get(reference).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate live records in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            store: self,
            cursor: self.head,
        }
    }
}

/// Iterator over `(Reference, &ListRecord)` in insertion order.
pub struct Iter<'a> {
    store: &'a RecordStore,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Reference, &'a ListRecord);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let slot = &self.store.slots[index];
        let node = slot.node.as_ref()?;
        self.cursor = node.next;
        Some((
            Reference {
                index,
                generation: slot.generation,
            },
            &node.record,
        ))
    }
}
