//! B-tree (minimum degree 2, a 2-3-4 tree) with step-recorded insert and
//! search
//!
//! Insertion splits full nodes preemptively on the way down, so a node split
//! is always visible as its own step before the descent continues.

use tracing::debug;

use super::arena::{Arena, NodeId};
use crate::trace::{highlight_keys, StepResult, Trace, TraceRecorder};

const MIN_DEGREE: usize = 2;
const MAX_KEYS: usize = 2 * MIN_DEGREE - 1;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BTreeNode {
    pub keys: Vec<i64>,
    pub children: Vec<NodeId>,
    pub leaf: bool,
}

/// Multiway search tree with sorted key arrays per node
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BTree {
    arena: Arena<BTreeNode>,
    root: Option<NodeId>,
}

impl BTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &BTreeNode {
        &self.arena[id]
    }

    /// All keys in sorted order
    pub fn sorted_keys(&self) -> Vec<i64> {
        let mut out = Vec::new();
        if let Some(root) = self.root {
            self.collect(root, &mut out);
        }
        out
    }

    fn collect(&self, id: NodeId, out: &mut Vec<i64>) {
        let node = &self.arena[id];
        if node.leaf {
            out.extend_from_slice(&node.keys);
            return;
        }
        for (i, &key) in node.keys.iter().enumerate() {
            self.collect(node.children[i], out);
            out.push(key);
        }
        if let Some(&last) = node.children.last() {
            self.collect(last, out);
        }
    }

    /// Insert `key`, splitting full nodes on the way down
    ///
    /// A duplicate key records a no-op step instead of modifying the tree.
    pub fn insert(&mut self, key: i64) -> Trace<BTree> {
        debug!(key, "btree insert");
        let mut rec = TraceRecorder::new();

        let Some(mut id) = self.root else {
            let leaf = self.arena.alloc(BTreeNode {
                keys: vec![key],
                children: Vec::new(),
                leaf: true,
            });
            self.root = Some(leaf);
            rec.record(
                self.clone(),
                highlight_keys(&[key]),
                format!("Tree is empty: {key} becomes the root"),
            );
            rec.record(self.clone(), highlight_keys(&[key]), "Insertion complete");
            return rec.finish();
        };

        if self.arena[id].keys.len() == MAX_KEYS {
            let old_root = id;
            let new_root = self.arena.alloc(BTreeNode {
                keys: Vec::new(),
                children: vec![old_root],
                leaf: false,
            });
            self.root = Some(new_root);
            let median = self.split_child(new_root, 0);
            rec.record(
                self.clone(),
                highlight_keys(&[median]),
                format!("Root is full: split it, median {median} promoted to a new root"),
            );
            id = new_root;
        }

        loop {
            if self.arena[id].keys.contains(&key) {
                rec.record(
                    self.clone(),
                    highlight_keys(&[key]),
                    format!("Key {key} already present: tree unchanged"),
                );
                return rec.finish();
            }
            if self.arena[id].leaf {
                let pos = self.arena[id].keys.partition_point(|&k| k < key);
                self.arena[id].keys.insert(pos, key);
                rec.record(
                    self.clone(),
                    highlight_keys(&[key]),
                    format!("Inserted {key} into leaf {:?}", self.arena[id].keys),
                );
                break;
            }

            let mut i = self.arena[id].keys.partition_point(|&k| k < key);
            let child = self.arena[id].children[i];
            if self.arena[child].keys.len() == MAX_KEYS {
                let median = self.split_child(id, i);
                rec.record(
                    self.clone(),
                    highlight_keys(&[median]),
                    format!("Child is full: split it, median {median} moves up"),
                );
                if key == median {
                    rec.record(
                        self.clone(),
                        highlight_keys(&[key]),
                        format!("Key {key} already present: tree unchanged"),
                    );
                    return rec.finish();
                }
                if key > median {
                    i += 1;
                }
            }
            let next = self.arena[id].children[i];
            rec.record(
                self.clone(),
                highlight_keys(&[key]),
                format!("Descend into child {:?}", self.arena[next].keys),
            );
            id = next;
        }

        rec.record(self.clone(), highlight_keys(&[key]), "Insertion complete");
        rec.finish()
    }

    /// Split the full `i`-th child of `parent`, returning the promoted median
    fn split_child(&mut self, parent: NodeId, i: usize) -> i64 {
        let child = self.arena[parent].children[i];

        let right_keys = self.arena[child].keys.split_off(MIN_DEGREE);
        let median = match self.arena[child].keys.pop() {
            Some(k) => k,
            None => return 0, // unreachable: callers only split full nodes
        };
        let leaf = self.arena[child].leaf;
        let right_children = if leaf {
            Vec::new()
        } else {
            self.arena[child].children.split_off(MIN_DEGREE)
        };
        let right = self.arena.alloc(BTreeNode {
            keys: right_keys,
            children: right_children,
            leaf,
        });

        self.arena[parent].keys.insert(i, median);
        self.arena[parent].children.insert(i + 1, right);
        median
    }

    /// Search for `key`, scanning one node's key array per step
    pub fn search(&mut self, key: i64) -> Trace<BTree> {
        debug!(key, "btree search");
        let mut rec = TraceRecorder::new();

        let Some(mut id) = self.root else {
            rec.record_result(
                self.clone(),
                highlight_keys(&[key]),
                format!("Tree is empty: key {key} not found"),
                StepResult::Found(false),
            );
            return rec.finish();
        };

        loop {
            let keys = self.arena[id].keys.clone();
            if keys.contains(&key) {
                rec.record_result(
                    self.clone(),
                    highlight_keys(&[key]),
                    format!("Found key {key} in node {keys:?}"),
                    StepResult::Found(true),
                );
                return rec.finish();
            }
            if self.arena[id].leaf {
                rec.record_result(
                    self.clone(),
                    highlight_keys(&[key]),
                    format!("Leaf {keys:?} does not contain {key}: not found"),
                    StepResult::Found(false),
                );
                return rec.finish();
            }
            let i = keys.partition_point(|&k| k < key);
            let next = self.arena[id].children[i];
            rec.record(
                self.clone(),
                highlight_keys(&[key]),
                format!("{key} not in {keys:?}: descend into child {:?}", self.arena[next].keys),
            );
            id = next;
        }
    }
}
