//! Bloom filter with step-recorded insert and query
//!
//! Three classical string hashes (djb2, sdbm, FNV-1a) probe a flat bit
//! array. A query answers "possibly present" only when every probed bit is
//! set, and short-circuits to "definitely not in the set" the moment one
//! probed bit is unset — that asymmetry is the whole point of the structure
//! and the animation.

use tracing::debug;

use crate::trace::{highlight_bits, StepResult, Trace, TraceRecorder};

const HASH_NAMES: [&str; 3] = ["djb2", "sdbm", "fnv1a"];

fn djb2(word: &str) -> u64 {
    let mut h: u64 = 5381;
    for b in word.bytes() {
        h = h.wrapping_mul(33).wrapping_add(b as u64);
    }
    h
}

fn sdbm(word: &str) -> u64 {
    let mut h: u64 = 0;
    for b in word.bytes() {
        h = (b as u64)
            .wrapping_add(h << 6)
            .wrapping_add(h << 16)
            .wrapping_sub(h);
    }
    h
}

fn fnv1a(word: &str) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in word.bytes() {
        h ^= b as u64;
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
    }
    h
}

/// Probabilistic membership filter over an `m`-bit array
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BloomFilter {
    bits: Vec<bool>,
}

impl BloomFilter {
    /// Create a filter with `m` bits (`m` must be at least 1)
    pub fn new(m: usize) -> Self {
        BloomFilter {
            bits: vec![false; m.max(1)],
        }
    }

    /// The bit array, for rendering
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// The three probe positions for `word`
    pub fn probes(&self, word: &str) -> [usize; 3] {
        let m = self.bits.len() as u64;
        [
            (djb2(word) % m) as usize,
            (sdbm(word) % m) as usize,
            (fnv1a(word) % m) as usize,
        ]
    }

    /// Set every probed bit for `word`
    pub fn insert(&mut self, word: &str) -> Trace<BloomFilter> {
        debug!(word, "bloom insert");
        let mut rec = TraceRecorder::new();
        let probes = self.probes(word);

        for (name, &bit) in HASH_NAMES.iter().zip(probes.iter()) {
            if self.bits[bit] {
                rec.record(
                    self.clone(),
                    highlight_bits(&[bit]),
                    format!("{name}(\"{word}\") = {bit}: bit already set"),
                );
            } else {
                self.bits[bit] = true;
                rec.record(
                    self.clone(),
                    highlight_bits(&[bit]),
                    format!("{name}(\"{word}\") = {bit}: set bit {bit}"),
                );
            }
        }
        rec.record(
            self.clone(),
            highlight_bits(&probes),
            "Insertion complete",
        );
        rec.finish()
    }

    /// Probe every bit for `word`, short-circuiting on the first unset one
    pub fn query(&mut self, word: &str) -> Trace<BloomFilter> {
        debug!(word, "bloom query");
        let mut rec = TraceRecorder::new();
        let probes = self.probes(word);

        for (name, &bit) in HASH_NAMES.iter().zip(probes.iter()) {
            if !self.bits[bit] {
                rec.record_result(
                    self.clone(),
                    highlight_bits(&[bit]),
                    format!(
                        "{name}(\"{word}\") = {bit}, bit {bit} is 0: \"{word}\" is definitely not in the set"
                    ),
                    StepResult::Found(false),
                );
                return rec.finish();
            }
            rec.record(
                self.clone(),
                highlight_bits(&[bit]),
                format!("{name}(\"{word}\") = {bit}: bit {bit} is set"),
            );
        }
        rec.record_result(
            self.clone(),
            highlight_bits(&probes),
            format!("All probed bits are set: \"{word}\" is possibly in the set"),
            StepResult::Found(true),
        );
        rec.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::StepResult;

    #[test]
    fn inserted_word_is_possibly_present() {
        let mut filter = BloomFilter::new(16);
        filter.insert("cat");
        let trace = filter.query("cat");
        let last = trace.last().expect("trace is never empty");
        assert_eq!(last.result, Some(StepResult::Found(true)));
    }

    #[test]
    fn query_on_empty_filter_short_circuits() {
        let mut filter = BloomFilter::new(16);
        let trace = filter.query("dog");
        assert_eq!(trace.len(), 1);
        let last = trace.last().expect("trace is never empty");
        assert_eq!(last.result, Some(StepResult::Found(false)));
        assert!(last.message.contains("definitely not in the set"));
    }
}
