//! Red-black tree with step-recorded insert and search
//!
//! Implements the full insert fixup (uncle recoloring, straightening
//! rotation, grandparent rotation) rather than only forcing the root black.
//! Nil children count as black.

use std::cmp::Ordering;

use tracing::debug;

use super::arena::{Arena, NodeId};
use crate::trace::{highlight_keys, StepResult, Trace, TraceRecorder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RbNode {
    pub key: i64,
    pub color: Color,
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl RbNode {
    fn new(key: i64, parent: Option<NodeId>) -> Self {
        RbNode {
            key,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }
}

/// Self-balancing binary search tree with red/black node coloring
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RbTree {
    arena: Arena<RbNode>,
    root: Option<NodeId>,
}

impl RbTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &RbNode {
        &self.arena[id]
    }

    fn color_of(&self, id: Option<NodeId>) -> Color {
        id.map(|n| self.arena[n].color).unwrap_or(Color::Black)
    }

    /// Insert `key` as a red node, then repair the red-black invariants
    ///
    /// A duplicate key records a no-op step instead of modifying the tree.
    pub fn insert(&mut self, key: i64) -> Trace<RbTree> {
        debug!(key, "red-black insert");
        let mut rec = TraceRecorder::new();

        // Standard BST descent to find the attachment point.
        let mut parent: Option<NodeId> = None;
        let mut current = self.root;
        while let Some(id) = current {
            let node_key = self.arena[id].key;
            match key.cmp(&node_key) {
                Ordering::Equal => {
                    rec.record(
                        self.clone(),
                        highlight_keys(&[key]),
                        format!("Key {key} already present: tree unchanged"),
                    );
                    return rec.finish();
                }
                Ordering::Less => {
                    rec.record(
                        self.clone(),
                        highlight_keys(&[key, node_key]),
                        format!("{key} < {node_key}: descend left"),
                    );
                    parent = Some(id);
                    current = self.arena[id].left;
                }
                Ordering::Greater => {
                    rec.record(
                        self.clone(),
                        highlight_keys(&[key, node_key]),
                        format!("{key} > {node_key}: descend right"),
                    );
                    parent = Some(id);
                    current = self.arena[id].right;
                }
            }
        }

        let z = self.arena.alloc(RbNode::new(key, parent));
        match parent {
            None => {
                self.root = Some(z);
                rec.record(
                    self.clone(),
                    highlight_keys(&[key]),
                    format!("Tree is empty: {key} becomes the root (red for now)"),
                );
            }
            Some(p) => {
                let parent_key = self.arena[p].key;
                if key < parent_key {
                    self.arena[p].left = Some(z);
                    rec.record(
                        self.clone(),
                        highlight_keys(&[key]),
                        format!("Inserted {key} as red left child of {parent_key}"),
                    );
                } else {
                    self.arena[p].right = Some(z);
                    rec.record(
                        self.clone(),
                        highlight_keys(&[key]),
                        format!("Inserted {key} as red right child of {parent_key}"),
                    );
                }
            }
        }

        self.insert_fixup(z, &mut rec);

        if let Some(root) = self.root {
            if self.arena[root].color == Color::Red {
                self.arena[root].color = Color::Black;
                rec.record(
                    self.clone(),
                    highlight_keys(&[self.arena[root].key]),
                    "Root recolored black",
                );
            }
        }
        rec.record(self.clone(), highlight_keys(&[key]), "Insertion complete");
        rec.finish()
    }

    fn insert_fixup(&mut self, mut z: NodeId, rec: &mut TraceRecorder<RbTree>) {
        loop {
            let Some(p) = self.arena[z].parent else {
                break;
            };
            if self.arena[p].color != Color::Red {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let Some(g) = self.arena[p].parent else {
                break;
            };
            let parent_is_left = self.arena[g].left == Some(p);
            let uncle = if parent_is_left {
                self.arena[g].right
            } else {
                self.arena[g].left
            };

            if self.color_of(uncle) == Color::Red {
                self.arena[p].color = Color::Black;
                if let Some(u) = uncle {
                    self.arena[u].color = Color::Black;
                }
                self.arena[g].color = Color::Red;
                let g_key = self.arena[g].key;
                rec.record(
                    self.clone(),
                    highlight_keys(&[self.arena[p].key, g_key]),
                    format!("Red uncle: recolored parent and uncle black, {g_key} red"),
                );
                z = g;
                continue;
            }

            if parent_is_left {
                if self.arena[p].right == Some(z) {
                    // Zig-zag: straighten into the left-left shape first.
                    let z_key = self.arena[z].key;
                    z = p;
                    self.rotate_left(z);
                    rec.record(
                        self.clone(),
                        highlight_keys(&[z_key, self.arena[z].key]),
                        format!("Straightened the zig-zag: rotated {} left", self.arena[z].key),
                    );
                }
                if let Some(p2) = self.arena[z].parent {
                    self.arena[p2].color = Color::Black;
                    if let Some(g2) = self.arena[p2].parent {
                        self.arena[g2].color = Color::Red;
                        let g2_key = self.arena[g2].key;
                        self.rotate_right(g2);
                        rec.record(
                            self.clone(),
                            highlight_keys(&[self.arena[p2].key, g2_key]),
                            format!("Black uncle: recolored and rotated {g2_key} right"),
                        );
                    }
                }
            } else {
                if self.arena[p].left == Some(z) {
                    let z_key = self.arena[z].key;
                    z = p;
                    self.rotate_right(z);
                    rec.record(
                        self.clone(),
                        highlight_keys(&[z_key, self.arena[z].key]),
                        format!(
                            "Straightened the zig-zag: rotated {} right",
                            self.arena[z].key
                        ),
                    );
                }
                if let Some(p2) = self.arena[z].parent {
                    self.arena[p2].color = Color::Black;
                    if let Some(g2) = self.arena[p2].parent {
                        self.arena[g2].color = Color::Red;
                        let g2_key = self.arena[g2].key;
                        self.rotate_left(g2);
                        rec.record(
                            self.clone(),
                            highlight_keys(&[self.arena[p2].key, g2_key]),
                            format!("Black uncle: recolored and rotated {g2_key} left"),
                        );
                    }
                }
            }
        }
    }

    /// Search for `key`, recording each comparison
    pub fn search(&mut self, key: i64) -> Trace<RbTree> {
        debug!(key, "red-black search");
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
        let mut current = self.root;
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

    // ========== Rotations (parent links maintained) ==========

    fn rotate_left(&mut self, x: NodeId) {
        let Some(y) = self.arena[x].right else {
            return;
        };
        let moved = self.arena[y].left;
        self.arena[x].right = moved;
        if let Some(m) = moved {
            self.arena[m].parent = Some(x);
        }
        let xp = self.arena[x].parent;
        self.arena[y].parent = xp;
        match xp {
            None => self.root = Some(y),
            Some(p) => {
                if self.arena[p].left == Some(x) {
                    self.arena[p].left = Some(y);
                } else {
                    self.arena[p].right = Some(y);
                }
            }
        }
        self.arena[y].left = Some(x);
        self.arena[x].parent = Some(y);
    }

    fn rotate_right(&mut self, x: NodeId) {
        let Some(y) = self.arena[x].left else {
            return;
        };
        let moved = self.arena[y].right;
        self.arena[x].left = moved;
        if let Some(m) = moved {
            self.arena[m].parent = Some(x);
        }
        let xp = self.arena[x].parent;
        self.arena[y].parent = xp;
        match xp {
            None => self.root = Some(y),
            Some(p) => {
                if self.arena[p].left == Some(x) {
                    self.arena[p].left = Some(y);
                } else {
                    self.arena[p].right = Some(y);
                }
            }
        }
        self.arena[y].right = Some(x);
        self.arena[x].parent = Some(y);
    }
}
