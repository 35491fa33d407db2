//! Disjoint-set forest (union-find) with step-recorded operations
//!
//! Union by rank, find with full path compression. Every parent-pointer hop
//! and every compression rewrite is its own step, which is what makes the
//! flattening visible during replay.

use tracing::debug;

use crate::trace::{highlight_indices, StepResult, Trace, TraceRecorder};

/// Forest of `n` elements partitioned into disjoint sets
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl DisjointSet {
    /// Create `n` singleton sets
    pub fn new(n: usize) -> Self {
        DisjointSet {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Parent pointers, for rendering
    pub fn parents(&self) -> &[usize] {
        &self.parent
    }

    /// Walk to the representative of `x`, recording hops, then compress the
    /// path
    fn find_root_recorded(&mut self, x: usize, rec: &mut TraceRecorder<DisjointSet>) -> usize {
        let mut path = Vec::new();
        let mut current = x;
        while self.parent[current] != current {
            let next = self.parent[current];
            rec.record(
                self.clone(),
                highlight_indices(&[current, next]),
                format!("Parent of {current} is {next}: follow the pointer"),
            );
            path.push(current);
            current = next;
        }
        rec.record(
            self.clone(),
            highlight_indices(&[current]),
            format!("{current} is its own parent: representative found"),
        );
        for p in path {
            if self.parent[p] != current {
                self.parent[p] = current;
                rec.record(
                    self.clone(),
                    highlight_indices(&[p, current]),
                    format!("Path compression: parent of {p} set to {current}"),
                );
            }
        }
        current
    }

    /// Representative of `x`'s set, with path compression
    ///
    /// An out-of-range element is a "not found" terminal step.
    pub fn find(&mut self, x: usize) -> Trace<DisjointSet> {
        debug!(x, "disjoint-set find");
        let mut rec = TraceRecorder::new();
        if x >= self.len() {
            rec.record_result(
                self.clone(),
                highlight_indices(&[x]),
                format!("Element {x} is out of range (0..{}): not found", self.len()),
                StepResult::Found(false),
            );
            return rec.finish();
        }
        let root = self.find_root_recorded(x, &mut rec);
        rec.record_result(
            self.clone(),
            highlight_indices(&[x, root]),
            format!("Find complete: representative of {x} is {root}"),
            StepResult::Index(root),
        );
        rec.finish()
    }

    /// Merge the sets containing `a` and `b`, attaching by rank
    pub fn union(&mut self, a: usize, b: usize) -> Trace<DisjointSet> {
        debug!(a, b, "disjoint-set union");
        let mut rec = TraceRecorder::new();
        let n = self.len();
        if a >= n || b >= n {
            rec.record(
                self.clone(),
                highlight_indices(&[a, b]),
                format!("Elements must lie in 0..{n}: nothing to union"),
            );
            return rec.finish();
        }

        let root_a = self.find_root_recorded(a, &mut rec);
        let root_b = self.find_root_recorded(b, &mut rec);

        if root_a == root_b {
            rec.record(
                self.clone(),
                highlight_indices(&[a, b, root_a]),
                format!("{a} and {b} already share representative {root_a}: nothing to merge"),
            );
            return rec.finish();
        }

        // Attach the shallower tree under the deeper one.
        let (winner, loser) = if self.rank[root_a] >= self.rank[root_b] {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        self.parent[loser] = winner;
        if self.rank[winner] == self.rank[loser] {
            self.rank[winner] += 1;
            rec.record(
                self.clone(),
                highlight_indices(&[winner, loser]),
                format!(
                    "Equal ranks: attached root {loser} under {winner}, rank of {winner} now {}",
                    self.rank[winner]
                ),
            );
        } else {
            rec.record(
                self.clone(),
                highlight_indices(&[winner, loser]),
                format!("Attached lower-rank root {loser} under {winner}"),
            );
        }
        rec.record(
            self.clone(),
            highlight_indices(&[a, b]),
            "Union complete",
        );
        rec.finish()
    }

    /// Whether `a` and `b` share a representative
    pub fn connected(&mut self, a: usize, b: usize) -> Trace<DisjointSet> {
        debug!(a, b, "disjoint-set connected");
        let mut rec = TraceRecorder::new();
        let n = self.len();
        if a >= n || b >= n {
            rec.record_result(
                self.clone(),
                highlight_indices(&[a, b]),
                format!("Elements must lie in 0..{n}: not found"),
                StepResult::Found(false),
            );
            return rec.finish();
        }

        let root_a = self.find_root_recorded(a, &mut rec);
        let root_b = self.find_root_recorded(b, &mut rec);
        let connected = root_a == root_b;
        let verdict = if connected {
            format!("{a} and {b} share representative {root_a}: connected")
        } else {
            format!("{a} has representative {root_a}, {b} has {root_b}: not connected")
        };
        rec.record_result(
            self.clone(),
            highlight_indices(&[a, b]),
            verdict,
            StepResult::Found(connected),
        );
        rec.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::StepResult;

    #[test]
    fn chained_unions_connect_endpoints() {
        let mut dsu = DisjointSet::new(7);
        dsu.union(0, 1);
        dsu.union(1, 2);
        let trace = dsu.connected(0, 2);
        let last = trace.last().expect("trace is never empty");
        assert_eq!(last.result, Some(StepResult::Found(true)));
    }

    #[test]
    fn find_compresses_the_walked_path() {
        let mut dsu = DisjointSet::new(5);
        dsu.union(0, 1);
        dsu.union(2, 3);
        dsu.union(1, 3);
        // 3 -> 2 -> 0 is a two-hop chain before the find.
        assert_eq!(dsu.parents()[3], 2);
        let trace = dsu.find(3);
        assert!(trace.iter().any(|s| s.message.contains("Path compression")));
        assert_eq!(dsu.parents()[3], 0);
    }

    #[test]
    fn union_of_already_merged_sets_is_a_noop() {
        let mut dsu = DisjointSet::new(3);
        dsu.union(0, 1);
        let before = dsu.parents().to_vec();
        let trace = dsu.union(1, 0);
        let last = trace.last().expect("trace is never empty");
        assert!(last.message.contains("nothing to merge"));
        assert_eq!(dsu.parents(), &before[..]);
    }
}
