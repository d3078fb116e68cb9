//! Search configuration
//!
//! All tuning constants of the pipeline live in one immutable structure
//! that is handed to every component at construction time.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Largest seed length for which the presence filter (4^k bits) is still
/// a reasonable allocation. k = 13 needs 8 MiB of bits.
pub const MAX_INDEXABLE_K: usize = 13;

/// Parameters for the seed-and-extend search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Seed (k-mer) length
    pub k: usize,
    /// Read sampling interval: every `stride`-th k-mer of a read is looked up
    pub stride: usize,
    /// Extension step size; the edit distance is evaluated over a window
    /// of this many bases. Must not exceed `k`.
    pub window: usize,
    /// Maximum acceptable edit distance within one window
    pub threshold: u32,
    /// Fraction of the read length an extension must exceed to be kept
    /// in the reuse pool
    pub min_keep_frac: f64,
    /// Minimum aligned length for a read to produce output
    pub min_report_len: usize,
    /// Buckets with at least this many reference positions are skipped
    /// as low-information repeats
    pub repeat_cutoff: usize,
    /// Two consecutive reads are treated as near-duplicates when their
    /// suffix difference is below this fraction of the read length.
    /// Heuristic and tunable; not an edit distance.
    pub similarity_gate: f64,
    /// Fan extension of seed candidates out over the thread pool
    pub parallel_seeds: bool,
    /// Run head and tail extension of one seed concurrently
    pub parallel_extend: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            k: 8,
            stride: 4,
            window: 5,
            threshold: 3,
            min_keep_frac: 0.10,
            min_report_len: 8,
            repeat_cutoff: 10,
            similarity_gate: 0.05,
            parallel_seeds: true,
            parallel_extend: true,
        }
    }
}

impl SearchParams {
    /// Reject inconsistent parameter sets before any work begins.
    pub fn validate(&self) -> EngineResult<()> {
        if self.k == 0 || self.k > MAX_INDEXABLE_K {
            return Err(EngineError::Config(format!(
                "seed length k must be in 1..={}, got {}",
                MAX_INDEXABLE_K, self.k
            )));
        }
        if self.stride == 0 {
            return Err(EngineError::Config("stride must be at least 1".to_string()));
        }
        if self.window == 0 || self.window > self.k {
            return Err(EngineError::Config(format!(
                "window ({}) must be in 1..=k ({})",
                self.window, self.k
            )));
        }
        // A window-wide Levenshtein distance never exceeds the window
        // length, so a larger threshold would disable the stop condition.
        if self.threshold as usize > self.window {
            return Err(EngineError::Config(format!(
                "threshold ({}) must not exceed window ({})",
                self.threshold, self.window
            )));
        }
        if !(0.0..1.0).contains(&self.min_keep_frac) {
            return Err(EngineError::Config(format!(
                "min_keep_frac must be in [0, 1), got {}",
                self.min_keep_frac
            )));
        }
        if !(0.0..=1.0).contains(&self.similarity_gate) {
            return Err(EngineError::Config(format!(
                "similarity_gate must be in [0, 1], got {}",
                self.similarity_gate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        assert!(SearchParams::default().validate().is_ok());
    }

    #[test]
    fn test_window_larger_than_k_rejected() {
        let params = SearchParams {
            k: 4,
            window: 6,
            threshold: 3,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_threshold_larger_than_window_rejected() {
        let params = SearchParams {
            threshold: 6,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_oversized_k_rejected() {
        let params = SearchParams {
            k: MAX_INDEXABLE_K + 1,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_zero_stride_rejected() {
        let params = SearchParams {
            stride: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
