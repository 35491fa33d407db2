// Step recording for algorithm playback

use rustc_hash::FxHashSet;

/// Identifier of an element the renderer should visually emphasize
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Highlight {
    /// A key stored in the structure (tree nodes, heap entries)
    Key(i64),
    /// A position in an array-backed structure (Fenwick slots, heap slots,
    /// disjoint-set elements)
    Index(usize),
    /// A single bit in a bit-array structure
    Bit(usize),
    /// A textual element (trie characters, probed words)
    Text(String),
}

/// Set of highlighted elements for one step
pub type HighlightSet = FxHashSet<Highlight>;

/// Build a highlight set from keys
pub fn highlight_keys(keys: &[i64]) -> HighlightSet {
    keys.iter().map(|&k| Highlight::Key(k)).collect()
}

/// Build a highlight set from array indices
pub fn highlight_indices(indices: &[usize]) -> HighlightSet {
    indices.iter().map(|&i| Highlight::Index(i)).collect()
}

/// Build a highlight set from bit positions
pub fn highlight_bits(bits: &[usize]) -> HighlightSet {
    bits.iter().map(|&b| Highlight::Bit(b)).collect()
}

/// Build a highlight set holding a single textual element
pub fn highlight_text(text: &str) -> HighlightSet {
    let mut set = HighlightSet::default();
    set.insert(Highlight::Text(text.to_string()));
    set
}

/// Terminal computed value carried by the last step of a query trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepResult {
    /// Membership / reachability answer
    Found(bool),
    /// Numeric answer (prefix sum, selected key, extracted minimum, rank)
    Value(i64),
    /// Positional answer (set representative, slot index)
    Index(usize),
}

/// One immutable frame of the animation
///
/// `state` is an owned, structurally independent copy of the data structure
/// at this instant. The live structure keeps mutating after the step is
/// recorded; nothing in a recorded step may alias it.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step<S> {
    /// Copy of the structure at this instant
    pub state: S,
    /// Elements to emphasize when rendering this step
    pub highlight: HighlightSet,
    /// Human-readable description of what just happened
    pub message: String,
    /// Terminal computed value, present on the last step of query traces
    pub result: Option<StepResult>,
}

/// Ordered sequence of steps produced by exactly one operation invocation
///
/// Never empty: every operation records at least a terminal step. Immutable
/// once produced; a new operation replaces the whole trace.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trace<S> {
    steps: Vec<Step<S>>,
}

impl<S> Trace<S> {
    /// Number of steps in the trace (always >= 1)
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// A produced trace is never empty; kept for API completeness
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get the step at `index`
    pub fn get(&self, index: usize) -> Option<&Step<S>> {
        self.steps.get(index)
    }

    /// The terminal step
    pub fn last(&self) -> Option<&Step<S>> {
        self.steps.last()
    }

    /// Iterate over the steps in order
    pub fn iter(&self) -> std::slice::Iter<'_, Step<S>> {
        self.steps.iter()
    }

    /// All steps as a slice
    pub fn steps(&self) -> &[Step<S>] {
        &self.steps
    }

    /// Consume the trace, yielding its steps
    pub fn into_steps(self) -> Vec<Step<S>> {
        self.steps
    }
}

/// Accumulates steps while an operation runs
///
/// Every `record*` call takes the state by value: the caller hands over an
/// owned copy (for arena-backed structures, a flat clone), never a reference
/// into the live structure. Aliasing a recorded state with the live one would
/// silently rewrite every earlier frame of the animation.
#[derive(Debug)]
pub struct TraceRecorder<S> {
    steps: Vec<Step<S>>,
}

impl<S> TraceRecorder<S> {
    pub fn new() -> Self {
        TraceRecorder { steps: Vec::new() }
    }

    /// Append one step
    pub fn record(&mut self, state: S, highlight: HighlightSet, message: impl Into<String>) {
        self.steps.push(Step {
            state,
            highlight,
            message: message.into(),
            result: None,
        });
    }

    /// Append a terminal step carrying a computed result
    pub fn record_result(
        &mut self,
        state: S,
        highlight: HighlightSet,
        message: impl Into<String>,
        result: StepResult,
    ) {
        self.steps.push(Step {
            state,
            highlight,
            message: message.into(),
            result: Some(result),
        });
    }

    /// Number of steps recorded so far
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Finish the operation, yielding the immutable trace
    pub fn finish(self) -> Trace<S> {
        debug_assert!(
            !self.steps.is_empty(),
            "every operation must record at least a terminal step"
        );
        Trace { steps: self.steps }
    }
}

impl<S> Default for TraceRecorder<S> {
    fn default() -> Self {
        Self::new()
    }
}
