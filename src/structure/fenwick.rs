//! Fenwick (binary indexed) tree with step-recorded update and prefix sum
//!
//! Slots are 1-based; slot 0 is unused. Both operations walk the implicit
//! tree through the lowest-set-bit trick, one recorded step per touched
//! slot.

use tracing::debug;

use crate::trace::{highlight_indices, StepResult, Trace, TraceRecorder};

/// Prefix-sum structure over `n` 1-based slots
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FenwickTree {
    tree: Vec<i64>,
}

impl FenwickTree {
    /// Create a tree with `n` zeroed slots
    pub fn new(n: usize) -> Self {
        FenwickTree {
            tree: vec![0; n + 1],
        }
    }

    /// Number of addressable slots
    pub fn len(&self) -> usize {
        self.tree.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw slot contents, index 0 unused
    pub fn slots(&self) -> &[i64] {
        &self.tree
    }

    fn lowbit(i: usize) -> usize {
        i & i.wrapping_neg()
    }

    /// Add `delta` at slot `i`, rippling through every covering slot
    pub fn update(&mut self, i: usize, delta: i64) -> Trace<FenwickTree> {
        debug!(i, delta, "fenwick update");
        let mut rec = TraceRecorder::new();
        let n = self.len();

        if i == 0 || i > n {
            rec.record(
                self.clone(),
                highlight_indices(&[i]),
                format!("Slot {i} is out of range (1..={n}): nothing to update"),
            );
            return rec.finish();
        }

        let mut j = i;
        while j <= n {
            self.tree[j] += delta;
            rec.record(
                self.clone(),
                highlight_indices(&[j]),
                format!("Added {delta} at slot {j}, next slot {}", j + Self::lowbit(j)),
            );
            j += Self::lowbit(j);
        }
        rec.record(self.clone(), highlight_indices(&[i]), "Update complete");
        rec.finish()
    }

    /// Sum of slots `1..=i`
    pub fn prefix_sum(&mut self, i: usize) -> Trace<FenwickTree> {
        debug!(i, "fenwick prefix sum");
        let mut rec = TraceRecorder::new();
        let n = self.len();

        if i > n {
            rec.record(
                self.clone(),
                highlight_indices(&[i]),
                format!("Slot {i} is out of range (0..={n}): nothing to sum"),
            );
            return rec.finish();
        }
        if i == 0 {
            rec.record_result(
                self.clone(),
                highlight_indices(&[0]),
                "Empty prefix: sum is 0",
                StepResult::Value(0),
            );
            return rec.finish();
        }

        let mut sum = 0i64;
        let mut j = i;
        while j > 0 {
            sum += self.tree[j];
            rec.record(
                self.clone(),
                highlight_indices(&[j]),
                format!("Added slot {j} ({}), running sum {sum}", self.tree[j]),
            );
            j -= Self::lowbit(j);
        }
        rec.record_result(
            self.clone(),
            highlight_indices(&[i]),
            format!("Prefix sum of 1..={i} is {sum}"),
            StepResult::Value(sum),
        );
        rec.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::StepResult;

    #[test]
    fn prefix_sums_match_naive_accumulation() {
        let mut fw = FenwickTree::new(16);
        let values = [3, 1, 4, 1, 5, 9, 2, 6];
        for (i, &v) in values.iter().enumerate() {
            fw.update(i + 1, v);
        }
        for i in 1..=values.len() {
            let expected: i64 = values[..i].iter().sum();
            let trace = fw.prefix_sum(i);
            let last = trace.last().expect("trace is never empty");
            assert_eq!(last.result, Some(StepResult::Value(expected)));
        }
    }

    #[test]
    fn out_of_range_update_is_a_recorded_noop() {
        let mut fw = FenwickTree::new(4);
        let trace = fw.update(9, 5);
        assert_eq!(trace.len(), 1);
        assert!(fw.slots().iter().all(|&v| v == 0));
    }

    #[test]
    fn update_touches_logarithmic_slot_chain() {
        let mut fw = FenwickTree::new(16);
        let trace = fw.update(1, 7);
        // Slots 1, 2, 4, 8, 16 plus the terminal step.
        assert_eq!(trace.len(), 6);
    }
}
