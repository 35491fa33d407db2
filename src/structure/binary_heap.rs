//! Binary min-heap (priority queue) with step-recorded push and pop
//!
//! The heap lives in a flat array; a step is recorded for every comparison
//! swap while an element sifts up or down.

use tracing::debug;

use crate::trace::{highlight_indices, StepResult, Trace, TraceRecorder};

/// Array-backed min-heap over integer keys
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinHeap {
    data: Vec<i64>,
}

impl MinHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Heap contents in array order, for rendering
    pub fn data(&self) -> &[i64] {
        &self.data
    }

    /// Smallest key without removing it
    pub fn peek(&self) -> Option<i64> {
        self.data.first().copied()
    }

    /// Add `key`, sifting it up to its place
    pub fn push(&mut self, key: i64) -> Trace<MinHeap> {
        debug!(key, "heap push");
        let mut rec = TraceRecorder::new();

        let mut i = self.data.len();
        self.data.push(key);
        rec.record(
            self.clone(),
            highlight_indices(&[i]),
            format!("Appended {key} at index {i}"),
        );

        while i > 0 {
            let parent = (i - 1) / 2;
            if self.data[i] >= self.data[parent] {
                rec.record(
                    self.clone(),
                    highlight_indices(&[i, parent]),
                    format!(
                        "{} >= parent {}: heap property holds",
                        self.data[i], self.data[parent]
                    ),
                );
                break;
            }
            self.data.swap(i, parent);
            rec.record(
                self.clone(),
                highlight_indices(&[i, parent]),
                format!("{key} < parent {}: swapped up to index {parent}", self.data[i]),
            );
            i = parent;
        }
        rec.record(self.clone(), highlight_indices(&[i]), "Insertion complete");
        rec.finish()
    }

    /// Remove and return the minimum, sifting the replacement down
    ///
    /// Popping an empty heap is a "not found" terminal step.
    pub fn pop(&mut self) -> Trace<MinHeap> {
        debug!("heap pop");
        let mut rec = TraceRecorder::new();

        let Some(&min) = self.data.first() else {
            rec.record_result(
                self.clone(),
                highlight_indices(&[]),
                "Heap is empty: nothing to remove",
                StepResult::Found(false),
            );
            return rec.finish();
        };

        rec.record(
            self.clone(),
            highlight_indices(&[0]),
            format!("Minimum {min} sits at the root"),
        );

        let last = match self.data.pop() {
            Some(v) => v,
            None => return rec.finish(), // unreachable: checked non-empty above
        };
        if self.data.is_empty() {
            rec.record_result(
                self.clone(),
                highlight_indices(&[0]),
                format!("Removed the only element: extraction of {min} complete"),
                StepResult::Value(min),
            );
            return rec.finish();
        }

        self.data[0] = last;
        rec.record(
            self.clone(),
            highlight_indices(&[0]),
            format!("Moved last element {last} to the root"),
        );

        let mut i = 0usize;
        loop {
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            let mut smallest = i;
            if left < self.data.len() && self.data[left] < self.data[smallest] {
                smallest = left;
            }
            if right < self.data.len() && self.data[right] < self.data[smallest] {
                smallest = right;
            }
            if smallest == i {
                rec.record(
                    self.clone(),
                    highlight_indices(&[i]),
                    format!("{} is smaller than both children: stop", self.data[i]),
                );
                break;
            }
            self.data.swap(i, smallest);
            rec.record(
                self.clone(),
                highlight_indices(&[i, smallest]),
                format!(
                    "Child {} is smaller: swapped down to index {smallest}",
                    self.data[i]
                ),
            );
            i = smallest;
        }
        rec.record_result(
            self.clone(),
            highlight_indices(&[0]),
            format!("Extraction of {min} complete"),
            StepResult::Value(min),
        );
        rec.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::StepResult;

    #[test]
    fn pops_come_out_sorted() {
        let mut heap = MinHeap::new();
        for key in [5, 3, 8, 1, 9, 2] {
            heap.push(key);
        }
        let mut popped = Vec::new();
        while !heap.is_empty() {
            let trace = heap.pop();
            let last = trace.last().expect("trace is never empty");
            if let Some(StepResult::Value(v)) = last.result {
                popped.push(v);
            }
        }
        assert_eq!(popped, vec![1, 2, 3, 5, 8, 9]);
    }

    #[test]
    fn pop_on_empty_heap_is_not_found() {
        let mut heap = MinHeap::new();
        let trace = heap.pop();
        assert_eq!(trace.len(), 1);
        let last = trace.last().expect("trace is never empty");
        assert_eq!(last.result, Some(StepResult::Found(false)));
    }
}
