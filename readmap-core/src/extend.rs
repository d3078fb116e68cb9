//! Bounded fuzzy extension
//!
//! Grows a seed leftward and rightward one base at a time, re-checking a
//! fixed-size window of true Levenshtein distance at every step instead
//! of filling a full alignment matrix - an O(n * window) amortized scan.
//! The two directions share only immutable data and run as a pair of
//! joined tasks.

use bio::alignment::distance::levenshtein;

use crate::config::SearchParams;
use crate::error::{EngineError, EngineResult};
use crate::seed::SeedCandidate;

/// A maximal approximate match grown from one seed: the aligned region is
/// `read[start..end]`, beginning at reference coordinate `ref_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extension {
    pub start: usize,
    pub end: usize,
    pub ref_offset: isize,
}

impl Extension {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Levenshtein distance between the window-length slices of read and
/// reference starting at the given positions, both clamped to their
/// sequence ends.
#[inline]
fn window_distance(
    read: &[u8],
    reference: &[u8],
    read_start: usize,
    ref_start: usize,
    window: usize,
) -> u32 {
    let read_end = (read_start + window).min(read.len());
    let ref_end = (ref_start + window).min(reference.len());
    levenshtein(&read[read_start..read_end], &reference[ref_start..ref_end])
}

/// Scan leftward from the seed, keeping the last start position whose
/// window stays within the threshold. Stops at a violating window or at
/// the start of the reference.
fn extend_head(
    read: &[u8],
    reference: &[u8],
    seed_read_pos: usize,
    offset: isize,
    window: usize,
    threshold: u32,
) -> usize {
    let mut start = seed_read_pos;
    let mut i = seed_read_pos;
    while i > 0 {
        i -= 1;
        let ref_i = i as isize + offset;
        if ref_i < 0 {
            break;
        }
        if window_distance(read, reference, i, ref_i as usize, window) > threshold {
            break;
        }
        start = i;
        if ref_i == 0 {
            break;
        }
    }
    start
}

/// Scan rightward from the seed's end, growing the end boundary while the
/// trailing window stays within the threshold. Stops at a violating
/// window or at the end of the reference.
fn extend_tail(
    read: &[u8],
    reference: &[u8],
    seed_read_pos: usize,
    k: usize,
    offset: isize,
    window: usize,
    threshold: u32,
) -> usize {
    let mut end = (seed_read_pos + k).min(read.len());
    while end < read.len() {
        // The base about to be included must map inside the reference.
        let ref_end = end as isize + offset;
        if ref_end < 0 || ref_end >= reference.len() as isize {
            break;
        }
        let next = end + 1;
        let window_start = next.saturating_sub(window);
        let ref_window_start = window_start as isize + offset;
        if window_distance(
            read,
            reference,
            window_start,
            ref_window_start as usize,
            window,
        ) > threshold
        {
            break;
        }
        end = next;
    }
    end
}

/// Grow `seed` into a maximal approximate match of `read` against
/// `reference`.
///
/// `window <= k` is a precondition; violating it is a configuration
/// error raised before any scanning. Head and tail extension run
/// concurrently when `params.parallel_extend` is set; both are always
/// joined before returning. The result satisfies `start <= end`,
/// `end <= read.len()` and maps to a reference span inside
/// `[0, reference.len()]`.
pub fn extend(
    read: &[u8],
    reference: &[u8],
    seed: SeedCandidate,
    params: &SearchParams,
) -> EngineResult<Extension> {
    if params.window > params.k {
        return Err(EngineError::Config(format!(
            "window ({}) must not exceed k ({})",
            params.window, params.k
        )));
    }

    let offset = seed.ref_pos as isize - seed.read_pos as isize;
    let (window, threshold) = (params.window, params.threshold);

    let (start, end) = if params.parallel_extend {
        rayon::join(
            || extend_head(read, reference, seed.read_pos, offset, window, threshold),
            || extend_tail(read, reference, seed.read_pos, params.k, offset, window, threshold),
        )
    } else {
        (
            extend_head(read, reference, seed.read_pos, offset, window, threshold),
            extend_tail(read, reference, seed.read_pos, params.k, offset, window, threshold),
        )
    };

    Ok(Extension {
        start,
        end,
        ref_offset: start as isize + offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(k: usize, window: usize, threshold: u32, parallel: bool) -> SearchParams {
        SearchParams {
            k,
            window,
            threshold,
            parallel_extend: parallel,
            ..Default::default()
        }
    }

    #[test]
    fn test_window_larger_than_k_is_config_error() {
        let seed = SeedCandidate { read_pos: 0, ref_pos: 0 };
        let result = extend(b"ACGTACGT", b"ACGTACGT", seed, &params(4, 5, 0, false));
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_exact_seed_extends_to_full_read() {
        // GTACGT sits at reference offset 2 of ACGTACGTACGT.
        let seed = SeedCandidate { read_pos: 0, ref_pos: 2 };
        let ext = extend(b"GTACGT", b"ACGTACGTACGT", seed, &params(4, 2, 0, false)).unwrap();
        assert_eq!(ext, Extension { start: 0, end: 6, ref_offset: 2 });
    }

    #[test]
    fn test_head_stops_before_violating_window() {
        // Leading C breaks the first window under threshold 0; the start
        // boundary keeps the last position that still passed.
        let read = b"CAAATTTT";
        let reference = b"AAAATTTTGGGG";
        let seed = SeedCandidate { read_pos: 4, ref_pos: 4 };
        let ext = extend(read, reference, seed, &params(4, 2, 0, false)).unwrap();
        assert_eq!(ext.start, 1);
        assert_eq!(ext.end, 8);
        assert_eq!(ext.ref_offset, 1);
    }

    #[test]
    fn test_head_stops_at_reference_start() {
        // Negative seed offset: the head cannot move past reference
        // coordinate zero even though read bases remain on the left.
        let read = b"ACGTACGT";
        let reference = b"GTACGTAC";
        let seed = SeedCandidate { read_pos: 2, ref_pos: 0 };
        let ext = extend(read, reference, seed, &params(4, 2, 0, false)).unwrap();
        assert_eq!(ext, Extension { start: 2, end: 8, ref_offset: 0 });
    }

    #[test]
    fn test_tail_stops_at_reference_end() {
        // The reference runs out before the read does.
        let read = b"ACGTACGT";
        let reference = b"ACGTAC";
        let seed = SeedCandidate { read_pos: 0, ref_pos: 0 };
        let ext = extend(read, reference, seed, &params(4, 2, 0, false)).unwrap();
        assert_eq!(ext.start, 0);
        assert_eq!(ext.end, 6);
        assert!(ext.end as isize + 0 <= reference.len() as isize);
    }

    #[test]
    fn test_bounds_invariants_under_mismatches() {
        let read = b"TTTTACGTACGTTTTT";
        let reference = b"ACGTACGT";
        for read_pos in [4usize, 8] {
            let seed = SeedCandidate { read_pos, ref_pos: read_pos - 4 };
            let ext = extend(read, reference, seed, &params(4, 3, 1, false)).unwrap();
            assert!(ext.start <= ext.end);
            assert!(ext.end <= read.len());
            assert!(ext.ref_offset >= 0);
            assert!(ext.end as isize + (ext.ref_offset - ext.start as isize)
                <= reference.len() as isize);
        }
    }

    #[test]
    fn test_parallel_and_sequential_directions_agree() {
        let read = b"CAAATTTTGG";
        let reference = b"AAAATTTTGGGG";
        let seed = SeedCandidate { read_pos: 4, ref_pos: 4 };
        let sequential = extend(read, reference, seed, &params(4, 2, 1, false)).unwrap();
        let parallel = extend(read, reference, seed, &params(4, 2, 1, true)).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_threshold_tolerates_substitutions() {
        // One substitution inside the read; threshold 1 lets the tail
        // walk across it, threshold 0 does not.
        let read = b"ACGTAGGTACGT";
        let reference = b"ACGTACGTACGT";
        let seed = SeedCandidate { read_pos: 0, ref_pos: 0 };
        let strict = extend(read, reference, seed, &params(4, 4, 0, false)).unwrap();
        let tolerant = extend(read, reference, seed, &params(4, 4, 1, false)).unwrap();
        assert!(tolerant.len() > strict.len());
        assert_eq!(tolerant.end, read.len());
    }
}
