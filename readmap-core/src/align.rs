//! Candidate selection and the per-read pipeline
//!
//! Drives the search over the ordered unique reads: each read either
//! reuses the previous read's retained seeds (when the two reads look
//! like near-duplicates) or is seeded fresh against the reference index.
//! Every candidate is grown by fuzzy extension; the longest survivor is
//! the read's result, and sufficiently informative candidates become the
//! seed pool offered to the next read.

use rayon::prelude::*;

use crate::config::SearchParams;
use crate::error::{EngineError, EngineResult};
use crate::extend::extend;
use crate::index::ReferenceIndex;
use crate::reads::{suffix_difference, UniqueReadIndex};
use crate::seed::{generate_seeds, SeedCandidate};

/// One extended candidate: `read[start..end]` aligned at reference
/// coordinate `ref_offset`, grown from `seed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentCandidate {
    pub start: usize,
    pub end: usize,
    pub ref_offset: isize,
    pub seed: SeedCandidate,
}

impl AlignmentCandidate {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A reported alignment: the aligned read substring and the reference
/// coordinate it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub sequence: Vec<u8>,
    pub ref_offset: isize,
}

/// Counters accumulated over one run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub total_reads: u64,
    pub unique_reads: u64,
    pub fresh_reads: u64,
    pub reused_reads: u64,
    pub alignments_emitted: u64,
}

/// Longest candidate; on equal lengths the first-seen one wins.
fn best_candidate(candidates: &[AlignmentCandidate]) -> Option<AlignmentCandidate> {
    candidates
        .iter()
        .copied()
        .reduce(|best, c| if c.len() > best.len() { c } else { best })
}

/// Seed-and-extend aligner over one reference and its index
pub struct ReadAligner<'a> {
    reference: &'a [u8],
    index: &'a ReferenceIndex,
    params: SearchParams,
}

impl<'a> ReadAligner<'a> {
    pub fn new(
        reference: &'a [u8],
        index: &'a ReferenceIndex,
        params: SearchParams,
    ) -> EngineResult<Self> {
        params.validate()?;
        if index.k() != params.k {
            return Err(EngineError::Config(format!(
                "index was built with k={} but params request k={}",
                index.k(),
                params.k
            )));
        }
        Ok(Self { reference, index, params })
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Extend every seed against `read` and keep the candidates long
    /// enough to be informative (> min_keep_frac of the read length).
    ///
    /// The fan-out collects per-task results in input order, so the
    /// parallel and sequential paths produce identical candidate lists.
    fn extend_all(
        &self,
        read: &[u8],
        seeds: &[SeedCandidate],
    ) -> EngineResult<Vec<AlignmentCandidate>> {
        let grow = |&seed: &SeedCandidate| -> EngineResult<AlignmentCandidate> {
            let ext = extend(read, self.reference, seed, &self.params)?;
            Ok(AlignmentCandidate {
                start: ext.start,
                end: ext.end,
                ref_offset: ext.ref_offset,
                seed,
            })
        };

        let mut candidates: Vec<AlignmentCandidate> = if self.params.parallel_seeds {
            seeds.par_iter().map(grow).collect::<EngineResult<_>>()?
        } else {
            seeds.iter().map(grow).collect::<EngineResult<_>>()?
        };

        let min_keep = self.params.min_keep_frac * read.len() as f64;
        candidates.retain(|c| c.len() as f64 > min_keep);
        Ok(candidates)
    }

    /// Align every unique read, in order, and collect the reportable
    /// results. Reads that yield no candidate clearing the minimum
    /// length simply produce no output.
    pub fn align_all(
        &self,
        reads: &UniqueReadIndex,
    ) -> EngineResult<(Vec<Alignment>, RunStats)> {
        let mut stats = RunStats {
            total_reads: reads.total_reads(),
            unique_reads: reads.unique_len() as u64,
            ..Default::default()
        };
        let mut output = Vec::new();
        let mut pool: Vec<AlignmentCandidate> = Vec::new();
        let mut previous: Option<&[u8]> = None;

        for (read, _count) in reads.iter() {
            let similar = previous.is_some_and(|prev| {
                !read.is_empty()
                    && (suffix_difference(prev, read) as f64)
                        < self.params.similarity_gate * read.len() as f64
            });

            let best = if similar && !pool.is_empty() {
                stats.reused_reads += 1;
                // Re-extend the previous read's seeds against this read;
                // seeds whose k-mer would overrun the new read are skipped.
                // The pool itself stays as-is for the next iteration.
                let seeds: Vec<SeedCandidate> = pool
                    .iter()
                    .map(|c| c.seed)
                    .filter(|s| s.read_pos + self.params.k <= read.len())
                    .collect();
                best_candidate(&self.extend_all(read, &seeds)?)
            } else {
                stats.fresh_reads += 1;
                let seeds = generate_seeds(read, self.index, &self.params)?;
                let candidates = self.extend_all(read, &seeds)?;
                let best = best_candidate(&candidates);
                pool = candidates;
                best
            };

            if let Some(c) = best {
                if c.len() > self.params.min_report_len {
                    output.push(Alignment {
                        sequence: read[c.start..c.end].to_vec(),
                        ref_offset: c.ref_offset,
                    });
                    stats.alignments_emitted += 1;
                }
            }
            previous = Some(read);
        }

        log::info!(
            "aligned {} unique reads ({} total): {} fresh, {} reused, {} reported",
            stats.unique_reads,
            stats.total_reads,
            stats.fresh_reads,
            stats.reused_reads,
            stats.alignments_emitted
        );
        Ok((output, stats))
    }
}
