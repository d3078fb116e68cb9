//! FASTA reference provider
//!
//! Loads the single reference sequence the run aligns against: the
//! sequence of the first record, header discarded. Parsing goes through
//! needletail, with transparent gzip support for `.gz` paths.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Result;
use flate2::read::GzDecoder;
use needletail::{parse_fastx_file, parse_fastx_reader};

use super::SourceError;

/// Load the reference sequence from a FASTA file.
pub fn read_reference<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path_str = path.as_ref().to_string_lossy();
    if path_str.ends_with(".gz") {
        let file = File::open(&path).map_err(SourceError::Io)?;
        let decoder = GzDecoder::new(file);
        parse_reference_reader(BufReader::new(decoder))
    } else {
        let mut reader = parse_fastx_file(&path).map_err(|e| SourceError::Parse(e.to_string()))?;
        match reader.next() {
            Some(record) => {
                let record = record.map_err(|e| SourceError::Parse(e.to_string()))?;
                Ok(record.seq().to_vec())
            }
            None => Err(SourceError::Empty.into()),
        }
    }
}

/// Load the reference from any readable source (used by tests and by
/// gzipped files).
pub fn parse_reference_reader<R: std::io::Read + Send>(reader: R) -> Result<Vec<u8>> {
    let mut fastx_reader =
        parse_fastx_reader(reader).map_err(|e| SourceError::Parse(e.to_string()))?;
    match fastx_reader.next() {
        Some(record) => {
            let record = record.map_err(|e| SourceError::Parse(e.to_string()))?;
            Ok(record.seq().to_vec())
        }
        None => Err(SourceError::Empty.into()),
    }
}
