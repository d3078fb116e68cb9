//! Sequence input collaborators
//!
//! The engine consumes plain byte sequences; these modules own the file
//! formats. Both providers run to completion before the search starts,
//! so the build and iterate phases of every downstream structure stay
//! disjoint.

use thiserror::Error;

pub mod fasta;
pub mod fastq;

/// Errors raised while opening or decoding a sequence source.
/// All of them are fatal at startup; there is no partial recovery.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("empty file or no sequences found")]
    Empty,
}
