//! Reference k-mer index
//!
//! Built once from the reference at stride 1, then read-only for the rest
//! of the run: a hash -> position-list table plus a presence bit per
//! possible hash value. Because k-mers map bijectively onto the hash
//! space (see `hash`), the filter is exact - a set bit means the bucket
//! is non-empty and a clear bit means it does not exist. It is still
//! consulted first on the search path as an O(1) gate before the table.

use std::collections::HashMap;

use bitvec::bitvec;
use bitvec::vec::BitVec;

use crate::config::MAX_INDEXABLE_K;
use crate::error::{EngineError, EngineResult};
use crate::hash::kmer_hashes;

/// Immutable k-mer index over one reference sequence
pub struct ReferenceIndex {
    k: usize,
    /// hash -> 0-based window starts, ascending
    buckets: HashMap<u64, Vec<u32>>,
    /// One bit per possible hash value (4^k bits)
    presence: BitVec,
}

impl ReferenceIndex {
    /// Index every k-length window of `reference` in one pass.
    pub fn build(reference: &[u8], k: usize) -> EngineResult<Self> {
        if k == 0 || k > MAX_INDEXABLE_K {
            return Err(EngineError::Config(format!(
                "seed length k must be in 1..={}, got {}",
                MAX_INDEXABLE_K, k
            )));
        }
        if reference.len() > u32::MAX as usize {
            return Err(EngineError::Config(format!(
                "reference of {} bases exceeds the indexable maximum",
                reference.len()
            )));
        }

        let mut buckets: HashMap<u64, Vec<u32>> = HashMap::new();
        let mut presence = bitvec![0; 1usize << (2 * k)];

        for item in kmer_hashes(reference, k, 1) {
            let (hash, pos) = item?;
            buckets.entry(hash).or_default().push(pos as u32);
            presence.set(hash as usize, true);
        }

        log::debug!(
            "indexed {} bases: {} distinct {}-mers",
            reference.len(),
            buckets.len(),
            k
        );

        Ok(Self { k, buckets, presence })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// O(1) presence gate; no false negatives against the bucket table.
    #[inline]
    pub fn contains(&self, hash: u64) -> bool {
        self.presence[hash as usize]
    }

    /// Reference positions whose window hashes to `hash`, ascending.
    #[inline]
    pub fn positions(&self, hash: u64) -> &[u32] {
        self.buckets.get(&hash).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct k-mers observed in the reference
    pub fn distinct_kmers(&self) -> usize {
        self.buckets.len()
    }

    #[cfg(test)]
    fn bucket_keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.buckets.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::encode_base;

    fn packed(window: &[u8]) -> u64 {
        window.iter().enumerate().fold(0u64, |acc, (i, &b)| {
            (acc << 2) | encode_base(b, i).unwrap()
        })
    }

    #[test]
    fn test_buckets_hold_exact_positions_ascending() {
        let index = ReferenceIndex::build(b"ACGTACGTACGT", 4).unwrap();
        assert_eq!(index.positions(packed(b"ACGT")), &[0, 4, 8]);
        assert_eq!(index.positions(packed(b"CGTA")), &[1, 5]);
        assert_eq!(index.positions(packed(b"GTAC")), &[2, 6]);
        assert_eq!(index.positions(packed(b"TACG")), &[3, 7]);
        assert_eq!(index.distinct_kmers(), 4);
        // Every window position appears exactly once across all buckets.
        let mut all: Vec<u32> = index
            .bucket_keys()
            .flat_map(|h| index.positions(h).to_vec())
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..=8).collect::<Vec<u32>>());
    }

    #[test]
    fn test_presence_filter_has_no_false_negatives_or_positives() {
        let index = ReferenceIndex::build(b"ACGTTGCAACGTGGGTACCA", 4).unwrap();
        for hash in 0..(1u64 << 8) {
            let in_table = !index.positions(hash).is_empty();
            assert_eq!(index.contains(hash), in_table, "hash {}", hash);
        }
    }

    #[test]
    fn test_absent_kmer_has_empty_bucket() {
        let index = ReferenceIndex::build(b"AAAAAAAA", 4).unwrap();
        assert!(!index.contains(packed(b"CCCC")));
        assert!(index.positions(packed(b"CCCC")).is_empty());
    }

    #[test]
    fn test_invalid_reference_base_aborts_build() {
        assert!(matches!(
            ReferenceIndex::build(b"ACGTNACGT", 4),
            Err(EngineError::InvalidBase { byte: b'N', pos: 4 })
        ));
    }

    #[test]
    fn test_oversized_k_rejected() {
        assert!(ReferenceIndex::build(b"ACGT", MAX_INDEXABLE_K + 1).is_err());
    }
}
