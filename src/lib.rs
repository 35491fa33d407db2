//! # Introduction
//!
//! algoscope runs textbook data-structure operations (insert, search,
//! rotate, split, union) while recording an owned snapshot of the structure
//! after every micro-step. The recorded trace is then replayed forward and
//! backward, or auto-advanced on a timer, by a small player state machine.
//!
//! ## Pipeline
//!
//! ```text
//! Operation → Algorithm-with-trace → Trace of Steps → Player → Renderer
//! ```
//!
//! 1. [`structure`] — the instrumented structures: AVL, red-black, B-tree,
//!    treap, order-statistic tree, Fenwick tree, bloom filter, disjoint set,
//!    binary min-heap, trie. Each operation runs synchronously to completion
//!    and returns its [`trace::Trace`].
//! 2. [`trace`] — the step contract: every frame carries an independent copy
//!    of the structure, the highlighted elements, a message, and (for
//!    queries) the computed result.
//! 3. [`player`] — cursor plus play/pause/step/reset over the current trace,
//!    with the repeating timer injected as a scheduler capability.
//! 4. [`render`] — the adapter contract a host UI implements to draw the
//!    step under the cursor; not part of the algorithmic core.
//!
//! Operations never fail: invalid input is rejected before an algorithm
//! runs, misses and out-of-range queries are ordinary "not found" steps, and
//! player bounds violations are silent no-ops.

pub mod player;
pub mod render;
pub mod structure;
pub mod trace;
