//! Order-statistic tree: a BST whose nodes carry subtree sizes
//!
//! The size augmentation answers `select(k)` (k-th smallest, 1-based) and
//! `rank(key)` by walking one root-to-node path. Inserting a key that is
//! already present records a no-op step; incrementing sizes for a duplicate
//! would silently corrupt every later rank query.

use std::cmp::Ordering;

use tracing::debug;

use super::arena::{Arena, NodeId};
use crate::trace::{highlight_keys, StepResult, Trace, TraceRecorder};

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OstNode {
    pub key: i64,
    /// Number of nodes in the subtree rooted here (including this node)
    pub size: usize,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

/// Size-augmented binary search tree
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderStatisticTree {
    arena: Arena<OstNode>,
    root: Option<NodeId>,
}

impl OrderStatisticTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &OstNode {
        &self.arena[id]
    }

    /// Total number of keys stored
    pub fn len(&self) -> usize {
        self.root.map(|r| self.arena[r].size).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn subtree_size(&self, id: Option<NodeId>) -> usize {
        id.map(|n| self.arena[n].size).unwrap_or(0)
    }

    /// Insert `key`, updating subtree sizes along the path
    pub fn insert(&mut self, key: i64) -> Trace<OrderStatisticTree> {
        debug!(key, "order-statistic insert");
        let mut rec = TraceRecorder::new();

        let Some(root) = self.root else {
            let id = self.arena.alloc(OstNode {
                key,
                size: 1,
                left: None,
                right: None,
            });
            self.root = Some(id);
            rec.record(
                self.clone(),
                highlight_keys(&[key]),
                format!("Tree is empty: {key} becomes the root (size 1)"),
            );
            rec.record(self.clone(), highlight_keys(&[key]), "Insertion complete");
            return rec.finish();
        };

        match self.insert_at(root, key, &mut rec) {
            Ok(()) => {
                rec.record(
                    self.clone(),
                    highlight_keys(&[key]),
                    "Updated subtree sizes along the insertion path",
                );
                rec.record(self.clone(), highlight_keys(&[key]), "Insertion complete");
            }
            Err(()) => {
                rec.record(
                    self.clone(),
                    highlight_keys(&[key]),
                    format!("Key {key} already present: sizes left untouched"),
                );
            }
        }
        rec.finish()
    }

    fn insert_at(
        &mut self,
        id: NodeId,
        key: i64,
        rec: &mut TraceRecorder<OrderStatisticTree>,
    ) -> Result<(), ()> {
        let node_key = self.arena[id].key;
        match key.cmp(&node_key) {
            Ordering::Equal => return Err(()),
            Ordering::Less => {
                if let Some(left) = self.arena[id].left {
                    rec.record(
                        self.clone(),
                        highlight_keys(&[key, node_key]),
                        format!("{key} < {node_key}: descend left"),
                    );
                    self.insert_at(left, key, rec)?;
                } else {
                    let leaf = self.arena.alloc(OstNode {
                        key,
                        size: 1,
                        left: None,
                        right: None,
                    });
                    self.arena[id].left = Some(leaf);
                    rec.record(
                        self.clone(),
                        highlight_keys(&[key]),
                        format!("Inserted {key} as left child of {node_key}"),
                    );
                }
            }
            Ordering::Greater => {
                if let Some(right) = self.arena[id].right {
                    rec.record(
                        self.clone(),
                        highlight_keys(&[key, node_key]),
                        format!("{key} > {node_key}: descend right"),
                    );
                    self.insert_at(right, key, rec)?;
                } else {
                    let leaf = self.arena.alloc(OstNode {
                        key,
                        size: 1,
                        left: None,
                        right: None,
                    });
                    self.arena[id].right = Some(leaf);
                    rec.record(
                        self.clone(),
                        highlight_keys(&[key]),
                        format!("Inserted {key} as right child of {node_key}"),
                    );
                }
            }
        }
        // Sizes grow on the unwind so a failed (duplicate) insert touches
        // nothing.
        self.arena[id].size += 1;
        Ok(())
    }

    /// Find the k-th smallest key (1-based)
    ///
    /// An out-of-range k is a "not found" terminal step, not an error.
    pub fn select(&mut self, k: usize) -> Trace<OrderStatisticTree> {
        debug!(k, "order-statistic select");
        let mut rec = TraceRecorder::new();

        let total = self.len();
        if k == 0 || k > total {
            rec.record_result(
                self.clone(),
                highlight_keys(&[]),
                format!("Rank {k} is out of range for {total} keys: not found"),
                StepResult::Found(false),
            );
            return rec.finish();
        }

        let mut remaining = k;
        let mut current = self.root;
        while let Some(id) = current {
            let node_key = self.arena[id].key;
            let left_size = self.subtree_size(self.arena[id].left);
            if remaining == left_size + 1 {
                rec.record_result(
                    self.clone(),
                    highlight_keys(&[node_key]),
                    format!("Left subtree holds {left_size} keys: {node_key} is rank {k}"),
                    StepResult::Value(node_key),
                );
                return rec.finish();
            }
            if remaining <= left_size {
                rec.record(
                    self.clone(),
                    highlight_keys(&[node_key]),
                    format!("Rank {remaining} lies in the left subtree of {node_key}"),
                );
                current = self.arena[id].left;
            } else {
                remaining -= left_size + 1;
                rec.record(
                    self.clone(),
                    highlight_keys(&[node_key]),
                    format!(
                        "Skip {node_key} and its left subtree: look for rank {remaining} on the right"
                    ),
                );
                current = self.arena[id].right;
            }
        }
        // Sizes are consistent, so the walk above always terminates at a node.
        rec.record_result(
            self.clone(),
            highlight_keys(&[]),
            format!("Rank {k} not found"),
            StepResult::Found(false),
        );
        rec.finish()
    }

    /// Number of keys <= `key`, provided `key` is present
    ///
    /// A missing key is a "not found" terminal step.
    pub fn rank(&mut self, key: i64) -> Trace<OrderStatisticTree> {
        debug!(key, "order-statistic rank");
        let mut rec = TraceRecorder::new();

        if self.root.is_none() {
            rec.record_result(
                self.clone(),
                highlight_keys(&[key]),
                format!("Tree is empty: key {key} not found"),
                StepResult::Found(false),
            );
            return rec.finish();
        }

        let mut acc = 0usize;
        let mut current = self.root;
        while let Some(id) = current {
            let node_key = self.arena[id].key;
            let left_size = self.subtree_size(self.arena[id].left);
            match key.cmp(&node_key) {
                Ordering::Equal => {
                    let rank = acc + left_size + 1;
                    rec.record_result(
                        self.clone(),
                        highlight_keys(&[key]),
                        format!("Key {key} has rank {rank}"),
                        StepResult::Value(rank as i64),
                    );
                    return rec.finish();
                }
                Ordering::Less => {
                    rec.record(
                        self.clone(),
                        highlight_keys(&[key, node_key]),
                        format!("{key} < {node_key}: descend left"),
                    );
                    current = self.arena[id].left;
                }
                Ordering::Greater => {
                    acc += left_size + 1;
                    rec.record(
                        self.clone(),
                        highlight_keys(&[key, node_key]),
                        format!("{key} > {node_key}: count {} keys and descend right", left_size + 1),
                    );
                    current = self.arena[id].right;
                }
            }
        }
        rec.record_result(
            self.clone(),
            highlight_keys(&[key]),
            format!("Key {key} not found"),
            StepResult::Found(false),
        );
        rec.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::StepResult;

    #[test]
    fn select_walks_by_subtree_size() {
        let mut tree = OrderStatisticTree::new();
        for key in [50, 30, 70, 20, 40, 60, 80] {
            tree.insert(key);
        }
        let trace = tree.select(3);
        let last = trace.last().expect("trace is never empty");
        assert_eq!(last.result, Some(StepResult::Value(40)));
    }

    #[test]
    fn rank_counts_skipped_subtrees() {
        let mut tree = OrderStatisticTree::new();
        for key in [50, 30, 70, 20, 40, 60, 80] {
            tree.insert(key);
        }
        let trace = tree.rank(70);
        let last = trace.last().expect("trace is never empty");
        assert_eq!(last.result, Some(StepResult::Value(6)));
    }

    #[test]
    fn duplicate_insert_keeps_sizes_intact() {
        let mut tree = OrderStatisticTree::new();
        tree.insert(10);
        tree.insert(20);
        tree.insert(10);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn select_out_of_range_is_not_found() {
        let mut tree = OrderStatisticTree::new();
        tree.insert(1);
        let trace = tree.select(5);
        let last = trace.last().expect("trace is never empty");
        assert_eq!(last.result, Some(StepResult::Found(false)));
    }
}
