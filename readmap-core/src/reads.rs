//! Ordered, deduplicating read index
//!
//! Reads are collected fully before iteration begins; the two phases are
//! disjoint by construction, so no locking is needed on either side.
//! Iteration yields each distinct read once, in ascending byte order,
//! which places near-identical reads next to each other - the property
//! the orchestrator's candidate-reuse heuristic relies on.

use std::collections::BTreeMap;

/// Distinct reads with occurrence counts, ordered lexicographically
#[derive(Debug, Default)]
pub struct UniqueReadIndex {
    entries: BTreeMap<Vec<u8>, u64>,
    total: u64,
}

impl UniqueReadIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `read`.
    pub fn insert(&mut self, read: Vec<u8>) {
        *self.entries.entry(read).or_insert(0) += 1;
        self.total += 1;
    }

    /// Distinct reads in ascending byte order, with occurrence counts.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], u64)> {
        self.entries.iter().map(|(read, &count)| (read.as_slice(), count))
    }

    /// Number of distinct reads
    pub fn unique_len(&self) -> usize {
        self.entries.len()
    }

    /// Number of reads inserted, repeats included
    pub fn total_reads(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Dissimilarity proxy between a read and the entry iterated just before
/// it: the number of `candidate` bytes outside the longest common prefix
/// with `previous`.
///
/// With sorted iteration this is a cheap stand-in for "how much of the
/// previous read's neighborhood does this read share" - small values mean
/// the two reads agree on almost their entire prefix. It is approximate
/// and tunable, and deliberately NOT an edit distance: a single leading
/// substitution maximizes it even though the true edit distance is 1.
pub fn suffix_difference(previous: &[u8], candidate: &[u8]) -> usize {
    let shared = previous
        .iter()
        .zip(candidate.iter())
        .take_while(|(a, b)| a == b)
        .count();
    candidate.len() - shared
}
