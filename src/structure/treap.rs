//! Treap: BST ordering on keys, max-heap ordering on priorities
//!
//! Priorities come from a splitmix-style avalanche of the key, so a given
//! insertion sequence always replays identically. A rotation step is
//! recorded whenever the heap property forces a child above its parent.

use std::cmp::Ordering;

use tracing::debug;

use super::arena::{Arena, NodeId};
use crate::trace::{highlight_keys, StepResult, Trace, TraceRecorder};

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreapNode {
    pub key: i64,
    pub priority: u64,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

/// Deterministic priority for a key
fn priority_for(key: i64) -> u64 {
    let mut z = (key as u64).wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Randomized-shape binary search tree
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Treap {
    arena: Arena<TreapNode>,
    root: Option<NodeId>,
}

impl Treap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &TreapNode {
        &self.arena[id]
    }

    /// Insert `key`, rotating wherever the heap property is violated
    ///
    /// A duplicate key records a no-op step instead of modifying the treap.
    pub fn insert(&mut self, key: i64) -> Trace<Treap> {
        debug!(key, "treap insert");
        let mut rec = TraceRecorder::new();

        let priority = priority_for(key);
        let Some(root) = self.root else {
            let id = self.arena.alloc(TreapNode {
                key,
                priority,
                left: None,
                right: None,
            });
            self.root = Some(id);
            rec.record(
                self.clone(),
                highlight_keys(&[key]),
                format!("Treap is empty: {key} (priority {priority}) becomes the root"),
            );
            rec.record(self.clone(), highlight_keys(&[key]), "Insertion complete");
            return rec.finish();
        };

        match self.insert_at(root, key, priority, &mut rec) {
            Ok(new_root) => {
                self.root = Some(new_root);
                rec.record(self.clone(), highlight_keys(&[key]), "Insertion complete");
            }
            Err(()) => {
                rec.record(
                    self.clone(),
                    highlight_keys(&[key]),
                    format!("Key {key} already present: treap unchanged"),
                );
            }
        }
        rec.finish()
    }

    fn insert_at(
        &mut self,
        id: NodeId,
        key: i64,
        priority: u64,
        rec: &mut TraceRecorder<Treap>,
    ) -> Result<NodeId, ()> {
        let node_key = self.arena[id].key;
        match key.cmp(&node_key) {
            Ordering::Equal => Err(()),
            Ordering::Less => {
                let new_left = match self.arena[id].left {
                    Some(left) => {
                        rec.record(
                            self.clone(),
                            highlight_keys(&[key, node_key]),
                            format!("{key} < {node_key}: descend left"),
                        );
                        self.insert_at(left, key, priority, rec)?
                    }
                    None => {
                        let leaf = self.arena.alloc(TreapNode {
                            key,
                            priority,
                            left: None,
                            right: None,
                        });
                        self.arena[id].left = Some(leaf);
                        rec.record(
                            self.clone(),
                            highlight_keys(&[key]),
                            format!(
                                "Inserted {key} (priority {priority}) as left child of {node_key}"
                            ),
                        );
                        leaf
                    }
                };
                self.arena[id].left = Some(new_left);
                if self.arena[new_left].priority > self.arena[id].priority {
                    let child_key = self.arena[new_left].key;
                    let rotated = self.rotate_right(id);
                    rec.record(
                        self.clone(),
                        highlight_keys(&[child_key, node_key]),
                        format!(
                            "Priority of {child_key} beats its parent {node_key}: rotated right"
                        ),
                    );
                    Ok(rotated)
                } else {
                    Ok(id)
                }
            }
            Ordering::Greater => {
                let new_right = match self.arena[id].right {
                    Some(right) => {
                        rec.record(
                            self.clone(),
                            highlight_keys(&[key, node_key]),
                            format!("{key} > {node_key}: descend right"),
                        );
                        self.insert_at(right, key, priority, rec)?
                    }
                    None => {
                        let leaf = self.arena.alloc(TreapNode {
                            key,
                            priority,
                            left: None,
                            right: None,
                        });
                        self.arena[id].right = Some(leaf);
                        rec.record(
                            self.clone(),
                            highlight_keys(&[key]),
                            format!(
                                "Inserted {key} (priority {priority}) as right child of {node_key}"
                            ),
                        );
                        leaf
                    }
                };
                self.arena[id].right = Some(new_right);
                if self.arena[new_right].priority > self.arena[id].priority {
                    let child_key = self.arena[new_right].key;
                    let rotated = self.rotate_left(id);
                    rec.record(
                        self.clone(),
                        highlight_keys(&[child_key, node_key]),
                        format!(
                            "Priority of {child_key} beats its parent {node_key}: rotated left"
                        ),
                    );
                    Ok(rotated)
                } else {
                    Ok(id)
                }
            }
        }
    }

    /// Search for `key`, recording each comparison
    pub fn search(&mut self, key: i64) -> Trace<Treap> {
        debug!(key, "treap search");
        let mut rec = TraceRecorder::new();
        let mut current = self.root;
        if current.is_none() {
            rec.record_result(
                self.clone(),
                highlight_keys(&[key]),
                format!("Treap is empty: key {key} not found"),
                StepResult::Found(false),
            );
            return rec.finish();
        }
        while let Some(id) = current {
            let node_key = self.arena[id].key;
            match key.cmp(&node_key) {
                Ordering::Equal => {
                    rec.record_result(
                        self.clone(),
                        highlight_keys(&[key]),
                        format!("Found key {key}"),
                        StepResult::Found(true),
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
                    rec.record(
                        self.clone(),
                        highlight_keys(&[key, node_key]),
                        format!("{key} > {node_key}: descend right"),
                    );
                    current = self.arena[id].right;
                }
            }
        }
        rec.record_result(
            self.clone(),
            highlight_keys(&[key]),
            format!("Reached a leaf: key {key} not found"),
            StepResult::Found(false),
        );
        rec.finish()
    }

    fn rotate_right(&mut self, id: NodeId) -> NodeId {
        let Some(left) = self.arena[id].left else {
            return id;
        };
        self.arena[id].left = self.arena[left].right;
        self.arena[left].right = Some(id);
        left
    }

    fn rotate_left(&mut self, id: NodeId) -> NodeId {
        let Some(right) = self.arena[id].right else {
            return id;
        };
        self.arena[id].right = self.arena[right].left;
        self.arena[right].left = Some(id);
        right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_heap_and_bst(treap: &Treap, id: NodeId, min: i64, max: i64) {
        let node = treap.node(id);
        assert!(node.key > min && node.key < max);
        for child in [node.left, node.right].into_iter().flatten() {
            assert!(treap.node(child).priority <= node.priority);
        }
        if let Some(left) = node.left {
            assert_heap_and_bst(treap, left, min, node.key);
        }
        if let Some(right) = node.right {
            assert_heap_and_bst(treap, right, node.key, max);
        }
    }

    #[test]
    fn invariants_hold_after_mixed_inserts() {
        let mut treap = Treap::new();
        for key in [50, 30, 70, 20, 40, 60, 80, 10, 90] {
            treap.insert(key);
        }
        let root = treap.root().expect("treap has a root");
        assert_heap_and_bst(&treap, root, i64::MIN, i64::MAX);
    }

    #[test]
    fn same_sequence_produces_same_shape() {
        let build = || {
            let mut t = Treap::new();
            for key in [3, 1, 4, 1, 5, 9, 2, 6] {
                t.insert(key);
            }
            t
        };
        let a = build();
        let b = build();
        assert_eq!(format!("{a:?}"), format!("{b:?}"));
    }
}
