//! Data structures instrumented for step recording
//!
//! Each module couples one textbook structure with trace-emitting
//! operations: the structure is mutated in place while an owned snapshot is
//! recorded after every meaningful micro-action. Tree-shaped structures are
//! arena-backed (see [`arena`]) so those snapshots are flat clones.

pub mod arena;
pub mod avl;
pub mod binary_heap;
pub mod bloom;
pub mod btree;
pub mod disjoint_set;
pub mod fenwick;
pub mod order_statistic;
pub mod red_black;
pub mod treap;
pub mod trie;

pub use arena::{Arena, NodeId};
