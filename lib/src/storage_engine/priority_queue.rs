// lib/src/storage_engine/priority_queue.rs

//! Array-backed binary min-heap ordered by triage priority.
//!
//! Uses 0-indexed storage with parent = (i-1)/2, children = 2i+1, 2i+2.
//! Comparisons are strict, so patients sharing a priority leave the queue in
//! whatever order the swaps produce; arrival order is not preserved.

use models::{PatientId, PatientRecord, PriorityLevel};

use super::storage_engine::PatientIndex;

#[derive(Debug, Clone, Default)]
pub struct PriorityQueue {
    heap: Vec<PatientRecord>,
}

impl PriorityQueue {
    pub fn new() -> Self {
        PriorityQueue { heap: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Appends `record` and sifts it up past every parent of strictly lower
    /// urgency.
    pub fn insert(&mut self, record: PatientRecord) {
        self.heap.push(record);
        self.sift_up(self.heap.len() - 1);
    }

    /// The most urgent queued patient, without removing it.
    pub fn peek(&self) -> Option<&PatientRecord> {
        self.heap.first()
    }

    /// Removes and returns the most urgent queued patient.
    ///
    /// The last element takes over the root slot and is sifted down.
    /// Returns `None` if the queue is empty.
    pub fn extract_min(&mut self) -> Option<PatientRecord> {
        if self.heap.is_empty() {
            return None;
        }
        let min = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(min)
    }

    /// The backing array in heap order. Only index 0 is guaranteed to be the
    /// most urgent; use [`PriorityQueue::treatment_order`] for a sorted view.
    pub fn patients(&self) -> &[PatientRecord] {
        &self.heap
    }

    /// Every queued patient in the order `extract_min` would return them,
    /// computed on a private copy.
    pub fn treatment_order(&self) -> Vec<PatientRecord> {
        let mut copy = self.clone();
        let mut ordered = Vec::with_capacity(copy.len());
        while let Some(record) = copy.extract_min() {
            ordered.push(record);
        }
        ordered
    }

    pub fn contains(&self, id: PatientId) -> bool {
        self.heap.iter().any(|record| record.id == id)
    }

    pub fn count_by_priority(&self, level: PriorityLevel) -> usize {
        self.heap.iter().filter(|record| record.priority == level).count()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.heap[index].priority < self.heap[parent].priority {
                self.heap.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            if left < len && self.heap[left].priority < self.heap[smallest].priority {
                smallest = left;
            }
            if right < len && self.heap[right].priority < self.heap[smallest].priority {
                smallest = right;
            }

            if smallest == index {
                break;
            }

            self.heap.swap(index, smallest);
            index = smallest;
        }
    }

    #[cfg(test)]
    fn holds_heap_property(&self) -> bool {
        (1..self.heap.len()).all(|i| self.heap[(i - 1) / 2].priority <= self.heap[i].priority)
    }
}

impl PatientIndex for PriorityQueue {
    fn insert(&mut self, record: PatientRecord) -> bool {
        PriorityQueue::insert(self, record);
        true
    }

    fn len(&self) -> usize {
        PriorityQueue::len(self)
    }

    fn count_by_priority(&self, level: PriorityLevel) -> usize {
        PriorityQueue::count_by_priority(self, level)
    }

    fn clear(&mut self) {
        PriorityQueue::clear(self)
    }

    fn get_type(&self) -> &'static str {
        "PriorityQueue"
    }
}
