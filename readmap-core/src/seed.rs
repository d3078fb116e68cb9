//! Seed generation
//!
//! Samples a read's k-mers at `stride` intervals and looks each one up in
//! the reference index, expanding every hit into a (read position,
//! reference position) anchor. The presence filter short-circuits absent
//! k-mers before the bucket lookup, and heavily repeated k-mers are
//! skipped outright: their buckets cost combinatorially many low-value
//! extensions and carry almost no positional information.

use crate::config::SearchParams;
use crate::error::EngineResult;
use crate::hash::kmer_hashes;
use crate::index::ReferenceIndex;

/// Anchor shared between a read and the reference: the k-mer starting at
/// `read_pos` matches the reference at `ref_pos` exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedCandidate {
    pub read_pos: usize,
    pub ref_pos: usize,
}

/// All seed candidates for one read.
///
/// Read positions advance by `stride` regardless of hit, miss, or skip,
/// so they are always multiples of the stride.
pub fn generate_seeds(
    read: &[u8],
    index: &ReferenceIndex,
    params: &SearchParams,
) -> EngineResult<Vec<SeedCandidate>> {
    let mut seeds = Vec::new();
    for item in kmer_hashes(read, params.k, params.stride) {
        let (hash, read_pos) = item?;
        if !index.contains(hash) {
            continue;
        }
        let bucket = index.positions(hash);
        if bucket.len() >= params.repeat_cutoff {
            continue;
        }
        for &ref_pos in bucket {
            seeds.push(SeedCandidate {
                read_pos,
                ref_pos: ref_pos as usize,
            });
        }
    }
    Ok(seeds)
}
