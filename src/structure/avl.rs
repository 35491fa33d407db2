//! AVL tree with step-recorded insert and search
//!
//! Rebalancing follows the textbook case split: LL and RR take a single
//! rotation, LR and RL rotate the child first. A step is recorded for every
//! comparison, node creation, and rotation so the player can show the tree
//! re-shaping itself.

use std::cmp::Ordering;

use tracing::debug;

use super::arena::{Arena, NodeId};
use crate::trace::{highlight_keys, StepResult, Trace, TraceRecorder};

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AvlNode {
    pub key: i64,
    pub height: i32,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl AvlNode {
    fn new(key: i64) -> Self {
        AvlNode {
            key,
            height: 1,
            left: None,
            right: None,
        }
    }
}

/// Height-balanced binary search tree
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AvlTree {
    arena: Arena<AvlNode>,
    root: Option<NodeId>,
}

impl AvlTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &AvlNode {
        &self.arena[id]
    }

    /// Insert `key`, rebalancing on the way back up
    ///
    /// A duplicate key records a no-op step instead of modifying the tree.
    pub fn insert(&mut self, key: i64) -> Trace<AvlTree> {
        debug!(key, "avl insert");
        let mut rec = TraceRecorder::new();

        let Some(root) = self.root else {
            let id = self.arena.alloc(AvlNode::new(key));
            self.root = Some(id);
            rec.record(
                self.clone(),
                highlight_keys(&[key]),
                format!("Tree is empty: {key} becomes the root"),
            );
            rec.record(self.clone(), highlight_keys(&[key]), "Insertion complete");
            return rec.finish();
        };

        match self.insert_at(root, key, &mut rec) {
            Ok(new_root) => {
                self.root = Some(new_root);
                rec.record(self.clone(), highlight_keys(&[key]), "Insertion complete");
            }
            Err(()) => {
                rec.record(
                    self.clone(),
                    highlight_keys(&[key]),
                    format!("Key {key} already present: tree unchanged"),
                );
            }
        }
        rec.finish()
    }

    fn insert_at(
        &mut self,
        id: NodeId,
        key: i64,
        rec: &mut TraceRecorder<AvlTree>,
    ) -> Result<NodeId, ()> {
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
                    let new_left = self.insert_at(left, key, rec)?;
                    self.arena[id].left = Some(new_left);
                } else {
                    let leaf = self.arena.alloc(AvlNode::new(key));
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
                    let new_right = self.insert_at(right, key, rec)?;
                    self.arena[id].right = Some(new_right);
                } else {
                    let leaf = self.arena.alloc(AvlNode::new(key));
                    self.arena[id].right = Some(leaf);
                    rec.record(
                        self.clone(),
                        highlight_keys(&[key]),
                        format!("Inserted {key} as right child of {node_key}"),
                    );
                }
            }
        }
        self.update_height(id);
        Ok(self.rebalance(id, rec))
    }

    /// Search for `key`, recording each comparison
    pub fn search(&mut self, key: i64) -> Trace<AvlTree> {
        debug!(key, "avl search");
        let mut rec = TraceRecorder::new();

        let Some(root) = self.root else {
            rec.record_result(
                self.clone(),
                highlight_keys(&[key]),
                format!("Tree is empty: key {key} not found"),
                StepResult::Found(false),
            );
            return rec.finish();
        };

        let mut current = Some(root);
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

    // ========== Balancing ==========

    fn height(&self, id: Option<NodeId>) -> i32 {
        id.map(|n| self.arena[n].height).unwrap_or(0)
    }

    fn update_height(&mut self, id: NodeId) {
        let h = 1 + self
            .height(self.arena[id].left)
            .max(self.height(self.arena[id].right));
        self.arena[id].height = h;
    }

    fn balance_factor(&self, id: NodeId) -> i32 {
        self.height(self.arena[id].left) - self.height(self.arena[id].right)
    }

    fn rebalance(&mut self, id: NodeId, rec: &mut TraceRecorder<AvlTree>) -> NodeId {
        let bf = self.balance_factor(id);
        let pivot_key = self.arena[id].key;

        if bf > 1 {
            let Some(left) = self.arena[id].left else {
                return id;
            };
            if self.balance_factor(left) >= 0 {
                // Left-left: one right rotation
                let new_root = self.rotate_right(id);
                rec.record(
                    self.clone(),
                    highlight_keys(&[pivot_key, self.arena[new_root].key]),
                    format!("Left-left imbalance at {pivot_key}: rotated right"),
                );
                new_root
            } else {
                // Left-right: rotate the left child left, then rotate right
                let left_key = self.arena[left].key;
                let new_left = self.rotate_left(left);
                self.arena[id].left = Some(new_left);
                self.update_height(id);
                rec.record(
                    self.clone(),
                    highlight_keys(&[left_key, self.arena[new_left].key]),
                    format!("Left-right imbalance at {pivot_key}: rotated {left_key} left"),
                );
                let new_root = self.rotate_right(id);
                rec.record(
                    self.clone(),
                    highlight_keys(&[pivot_key, self.arena[new_root].key]),
                    format!("Rotated {pivot_key} right"),
                );
                new_root
            }
        } else if bf < -1 {
            let Some(right) = self.arena[id].right else {
                return id;
            };
            if self.balance_factor(right) <= 0 {
                // Right-right: one left rotation
                let new_root = self.rotate_left(id);
                rec.record(
                    self.clone(),
                    highlight_keys(&[pivot_key, self.arena[new_root].key]),
                    format!("Right-right imbalance at {pivot_key}: rotated left"),
                );
                new_root
            } else {
                // Right-left: rotate the right child right, then rotate left
                let right_key = self.arena[right].key;
                let new_right = self.rotate_right(right);
                self.arena[id].right = Some(new_right);
                self.update_height(id);
                rec.record(
                    self.clone(),
                    highlight_keys(&[right_key, self.arena[new_right].key]),
                    format!("Right-left imbalance at {pivot_key}: rotated {right_key} right"),
                );
                let new_root = self.rotate_left(id);
                rec.record(
                    self.clone(),
                    highlight_keys(&[pivot_key, self.arena[new_root].key]),
                    format!("Rotated {pivot_key} left"),
                );
                new_root
            }
        } else {
            id
        }
    }

    fn rotate_right(&mut self, id: NodeId) -> NodeId {
        let Some(left) = self.arena[id].left else {
            return id;
        };
        self.arena[id].left = self.arena[left].right;
        self.arena[left].right = Some(id);
        self.update_height(id);
        self.update_height(left);
        left
    }

    fn rotate_left(&mut self, id: NodeId) -> NodeId {
        let Some(right) = self.arena[id].right else {
            return id;
        };
        self.arena[id].right = self.arena[right].left;
        self.arena[right].left = Some(id);
        self.update_height(id);
        self.update_height(right);
        right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_of(tree: &AvlTree, id: Option<NodeId>) -> Option<i64> {
        id.map(|n| tree.node(n).key)
    }

    #[test]
    fn ascending_inserts_trigger_left_rotation() {
        let mut tree = AvlTree::new();
        tree.insert(10);
        tree.insert(20);
        tree.insert(30);

        let root = tree.root().expect("tree has a root");
        assert_eq!(tree.node(root).key, 20);
        assert_eq!(key_of(&tree, tree.node(root).left), Some(10));
        assert_eq!(key_of(&tree, tree.node(root).right), Some(30));
    }

    #[test]
    fn left_right_case_double_rotates() {
        let mut tree = AvlTree::new();
        tree.insert(30);
        tree.insert(10);
        tree.insert(20);

        let root = tree.root().expect("tree has a root");
        assert_eq!(tree.node(root).key, 20);
        assert_eq!(key_of(&tree, tree.node(root).left), Some(10));
        assert_eq!(key_of(&tree, tree.node(root).right), Some(30));
    }

    #[test]
    fn duplicate_insert_records_noop() {
        let mut tree = AvlTree::new();
        tree.insert(5);
        let trace = tree.insert(5);
        let last = trace.last().expect("trace is never empty");
        assert!(last.message.contains("already present"));
        assert_eq!(tree.node(tree.root().unwrap()).height, 1);
    }
}
