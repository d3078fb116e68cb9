//! Error types for the search engine

use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur inside the search engine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A byte outside {A,C,G,T} was seen while hashing a sequence.
    /// Fatal to the operation on that sequence; bases are never coerced.
    #[error("invalid base 0x{byte:02x} at position {pos}")]
    InvalidBase { byte: u8, pos: usize },

    #[error("invalid configuration: {0}")]
    Config(String),
}
