//! FASTQ read provider
//!
//! Ingests short reads into the deduplicating read index: only the
//! sequence line of each 4-line record is kept, headers and quality
//! strings are discarded. The index is fully populated here, before any
//! iteration begins.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Result;
use flate2::read::GzDecoder;
use needletail::{parse_fastx_file, parse_fastx_reader};

use super::SourceError;
use crate::reads::UniqueReadIndex;

/// Load every read of a FASTQ file into a fresh read index.
pub fn read_reads<P: AsRef<Path>>(path: P) -> Result<UniqueReadIndex> {
    let path_str = path.as_ref().to_string_lossy();
    if path_str.ends_with(".gz") {
        let file = File::open(&path).map_err(SourceError::Io)?;
        let decoder = GzDecoder::new(file);
        parse_reads_reader(BufReader::new(decoder))
    } else {
        let mut reader = parse_fastx_file(&path).map_err(|e| SourceError::Parse(e.to_string()))?;
        let mut index = UniqueReadIndex::new();
        while let Some(record) = reader.next() {
            let record = record.map_err(|e| SourceError::Parse(e.to_string()))?;
            index.insert(record.seq().to_vec());
        }
        if index.is_empty() {
            return Err(SourceError::Empty.into());
        }
        Ok(index)
    }
}

/// Ingest reads from any readable source (used by tests and by gzipped
/// files).
pub fn parse_reads_reader<R: std::io::Read + Send>(reader: R) -> Result<UniqueReadIndex> {
    let mut fastx_reader =
        parse_fastx_reader(reader).map_err(|e| SourceError::Parse(e.to_string()))?;
    let mut index = UniqueReadIndex::new();
    while let Some(record) = fastx_reader.next() {
        let record = record.map_err(|e| SourceError::Parse(e.to_string()))?;
        index.insert(record.seq().to_vec());
    }
    if index.is_empty() {
        return Err(SourceError::Empty.into());
    }
    Ok(index)
}
