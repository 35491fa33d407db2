//! Trie (prefix tree) with step-recorded insert, search, and prefix query
//!
//! Nodes live in the shared arena and hold a per-character child map; words
//! are walked one Unicode scalar value at a time, with a step per edge.

use rustc_hash::FxHashMap;
use tracing::debug;

use super::arena::{Arena, NodeId};
use crate::trace::{highlight_text, StepResult, Trace, TraceRecorder};

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrieNode {
    pub children: FxHashMap<char, NodeId>,
    /// Whether a stored word ends at this node
    pub terminal: bool,
}

/// Prefix tree over Unicode strings
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trie {
    arena: Arena<TrieNode>,
    root: NodeId,
}

impl Trie {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.alloc(TrieNode::default());
        Trie { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.arena[id]
    }

    /// Store `word`, creating nodes for missing characters
    pub fn insert(&mut self, word: &str) -> Trace<Trie> {
        debug!(word, "trie insert");
        let mut rec = TraceRecorder::new();

        if word.is_empty() {
            rec.record(
                self.clone(),
                highlight_text(""),
                "Empty word: nothing to insert",
            );
            return rec.finish();
        }

        let mut id = self.root;
        let mut prefix = String::new();
        for c in word.chars() {
            prefix.push(c);
            if let Some(&child) = self.arena[id].children.get(&c) {
                rec.record(
                    self.clone(),
                    highlight_text(&prefix),
                    format!("Edge '{c}' already exists: follow it"),
                );
                id = child;
            } else {
                let child = self.arena.alloc(TrieNode::default());
                self.arena[id].children.insert(c, child);
                rec.record(
                    self.clone(),
                    highlight_text(&prefix),
                    format!("Created node for '{c}'"),
                );
                id = child;
            }
        }

        if self.arena[id].terminal {
            rec.record(
                self.clone(),
                highlight_text(word),
                format!("\"{word}\" was already stored: trie unchanged"),
            );
        } else {
            self.arena[id].terminal = true;
            rec.record(
                self.clone(),
                highlight_text(word),
                format!("Marked the end of \"{word}\""),
            );
            rec.record(self.clone(), highlight_text(word), "Insertion complete");
        }
        rec.finish()
    }

    /// Look up a whole word
    pub fn search(&mut self, word: &str) -> Trace<Trie> {
        debug!(word, "trie search");
        let mut rec = TraceRecorder::new();

        let Some(id) = self.walk(word, &mut rec) else {
            return rec.finish();
        };
        if self.arena[id].terminal {
            rec.record_result(
                self.clone(),
                highlight_text(word),
                format!("Reached a word end: found \"{word}\""),
                StepResult::Found(true),
            );
        } else {
            rec.record_result(
                self.clone(),
                highlight_text(word),
                format!("\"{word}\" is only a prefix of stored words: not found"),
                StepResult::Found(false),
            );
        }
        rec.finish()
    }

    /// Check whether any stored word starts with `prefix`
    pub fn starts_with(&mut self, prefix: &str) -> Trace<Trie> {
        debug!(prefix, "trie prefix query");
        let mut rec = TraceRecorder::new();

        if self.walk(prefix, &mut rec).is_some() {
            rec.record_result(
                self.clone(),
                highlight_text(prefix),
                format!("Prefix \"{prefix}\" exists in the trie"),
                StepResult::Found(true),
            );
        }
        rec.finish()
    }

    /// Follow `word` edge by edge; records the miss step itself when a
    /// character has no edge
    fn walk(&mut self, word: &str, rec: &mut TraceRecorder<Trie>) -> Option<NodeId> {
        let mut id = self.root;
        let mut prefix = String::new();
        for c in word.chars() {
            prefix.push(c);
            match self.arena[id].children.get(&c) {
                Some(&child) => {
                    rec.record(
                        self.clone(),
                        highlight_text(&prefix),
                        format!("Edge '{c}' exists: follow it"),
                    );
                    id = child;
                }
                None => {
                    rec.record_result(
                        self.clone(),
                        highlight_text(&prefix),
                        format!("No edge for '{c}': \"{word}\" not found"),
                        StepResult::Found(false),
                    );
                    return None;
                }
            }
        }
        Some(id)
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::StepResult;

    fn last_result(trace: &Trace<Trie>) -> Option<StepResult> {
        trace.last().and_then(|s| s.result)
    }

    #[test]
    fn stored_word_is_found() {
        let mut trie = Trie::new();
        trie.insert("alpha");
        assert_eq!(last_result(&trie.search("alpha")), Some(StepResult::Found(true)));
    }

    #[test]
    fn prefix_of_stored_word_is_not_a_word() {
        let mut trie = Trie::new();
        trie.insert("alpha");
        assert_eq!(last_result(&trie.search("alp")), Some(StepResult::Found(false)));
        assert_eq!(
            last_result(&trie.starts_with("alp")),
            Some(StepResult::Found(true))
        );
    }

    #[test]
    fn search_on_empty_trie_misses_on_first_edge() {
        let mut trie = Trie::new();
        let trace = trie.search("x");
        assert_eq!(trace.len(), 1);
        assert_eq!(last_result(&trace), Some(StepResult::Found(false)));
    }
}
