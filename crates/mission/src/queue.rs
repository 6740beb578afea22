//! Indexed binary min-heap of events.
//!
//! Every event records its own position in `heap_index`, and the queue keeps
//! an id → position map, so an event can be re-prioritised or cancelled in
//! O(log n) without searching. The queue has no lock of its own; it is owned
//! by the scheduler task.

use crate::event::{Event, EventId};
use exchange_core::GameTime;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct EventQueue {
    heap: Vec<Event>,
    positions: HashMap<EventId, usize>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Ordering by ascending scheduled time
    pub fn less(&self, i: usize, j: usize) -> bool {
        self.heap[i].scheduled_time < self.heap[j].scheduled_time
    }

    /// Swap two slots and keep both index records in step
    pub fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        for k in [i, j] {
            let event = &mut self.heap[k];
            event.heap_index = Some(k);
            self.positions.insert(event.id.clone(), k);
        }
    }

    /// Add an event. Its id must already be assigned.
    pub fn push(&mut self, mut event: Event) {
        let index = self.heap.len();
        event.heap_index = Some(index);
        self.positions.insert(event.id.clone(), index);
        self.heap.push(event);
        self.sift_up(index);
    }

    /// Remove and return the earliest event
    pub fn pop(&mut self) -> Option<Event> {
        let last = self.heap.len().checked_sub(1)?;
        self.swap(0, last);
        let mut event = self.heap.pop()?;
        self.positions.remove(&event.id);
        event.heap_index = None;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(event)
    }

    pub fn peek(&self) -> Option<&Event> {
        self.heap.first()
    }

    /// Change an event in place and restore the heap from its slot.
    ///
    /// Returns `false` if `index` is out of range.
    pub fn update(&mut self, index: usize, scheduled_time: GameTime, cancelled: bool) -> bool {
        let Some(event) = self.heap.get_mut(index) else {
            return false;
        };
        event.scheduled_time = scheduled_time;
        event.cancelled = cancelled;
        if !self.sift_down(index) {
            self.sift_up(index);
        }
        true
    }

    pub fn position(&self, id: &EventId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.positions.contains_key(id)
    }

    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.position(id).map(|index| &self.heap[index])
    }

    /// Events in heap order
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.heap.iter()
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.less(index, parent) {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
    }

    // Returns whether the element moved.
    fn sift_down(&mut self, start: usize) -> bool {
        let len = self.heap.len();
        let mut index = start;
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let mut child = left;
            let right = left + 1;
            if right < len && self.less(right, left) {
                child = right;
            }
            if !self.less(child, index) {
                break;
            }
            self.swap(index, child);
            index = child;
        }
        index > start
    }
}
