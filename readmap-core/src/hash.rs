//! Rolling k-mer hashing
//!
//! A k-mer over {A,C,G,T} maps bijectively to a 2-bit-packed integer in
//! `0..4^k` (for k <= 32), so the "hash" of a window is simply its packed
//! form and collisions cannot occur. The roller updates in O(1) per base:
//! shift the accumulator, append the new code, mask to 4^k values.

use crate::error::{EngineError, EngineResult};

/// Encode a nucleotide to its 2-bit code.
///
/// Only uppercase A/C/G/T are sequence data; every other byte is an
/// invalid-input condition, never a silently substituted base.
#[inline]
pub fn encode_base(base: u8, pos: usize) -> EngineResult<u64> {
    match base {
        b'A' => Ok(0),
        b'C' => Ok(1),
        b'G' => Ok(2),
        b'T' => Ok(3),
        other => Err(EngineError::InvalidBase { byte: other, pos }),
    }
}

/// Rolling hash over the last `k` bases observed
#[derive(Debug, Clone)]
pub struct RollingHash {
    hash: u64,
    mask: u64,
}

impl RollingHash {
    pub fn new(k: usize) -> Self {
        debug_assert!(k >= 1 && k <= 32);
        let mask = if k == 32 { u64::MAX } else { (1u64 << (2 * k)) - 1 };
        Self { hash: 0, mask }
    }

    /// Shift in one base. After `k` pushes the accumulator holds exactly
    /// the packed form of the last `k` bases, oldest base most significant.
    #[inline]
    pub fn push(&mut self, base: u8, pos: usize) -> EngineResult<u64> {
        let code = encode_base(base, pos)?;
        self.hash = ((self.hash << 2) | code) & self.mask;
        Ok(self.hash)
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }
}

/// Lazy sequence of `(hash, window_start)` pairs over a nucleotide
/// sequence: window starts `0, stride, 2*stride, ...` up to `len - k`.
///
/// Single-pass and not restartable. The accumulator is updated on every
/// base; only the emission is strided. An invalid base ends the sequence
/// with an error item.
pub struct KmerHashes<'a> {
    seq: &'a [u8],
    k: usize,
    stride: usize,
    hasher: RollingHash,
    /// Bases consumed so far
    consumed: usize,
    /// Start of the next window to emit
    next_window: usize,
    failed: bool,
}

/// Hash every `stride`-th k-length window of `seq`.
///
/// Yields nothing for sequences shorter than `k`.
pub fn kmer_hashes(seq: &[u8], k: usize, stride: usize) -> KmerHashes<'_> {
    debug_assert!(k >= 1 && stride >= 1);
    KmerHashes {
        seq,
        k,
        stride,
        hasher: RollingHash::new(k.max(1)),
        consumed: 0,
        next_window: 0,
        failed: false,
    }
}

impl Iterator for KmerHashes<'_> {
    type Item = EngineResult<(u64, usize)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.next_window + self.k > self.seq.len() {
            return None;
        }
        while self.consumed < self.next_window + self.k {
            if let Err(e) = self.hasher.push(self.seq[self.consumed], self.consumed) {
                self.failed = true;
                return Some(Err(e));
            }
            self.consumed += 1;
        }
        let start = self.next_window;
        self.next_window += self.stride;
        Some(Ok((self.hasher.hash(), start)))
    }
}
