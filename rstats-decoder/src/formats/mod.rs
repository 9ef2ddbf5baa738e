//! Stats file format decoders (rstats, cstats)
//!
//! One decoder per on-disk format. Both consume a fully decompressed byte
//! buffer and produce a [`DecodedFile`]; gzip inflation of the raw file
//! happens up front in [`decompress`].

use flate2::read::GzDecoder;
use std::io::Read;

use crate::schema::Format;
use crate::types::{Record, Result};

pub mod cstats;
pub mod rstats;

// Re-export decoder types
pub use cstats::CstatsDecoder;
pub use rstats::RstatsDecoder;

/// Common interface for the per-format file decoders
pub trait FormatDecoder {
    /// Decode a fully decompressed stats buffer
    fn decode(buffer: &[u8]) -> Result<DecodedFile>;
}

/// Everything decoded from one stats file
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFile {
    /// Which format the buffer carried
    pub format: Format,
    /// All records, in file order
    pub records: Vec<Record>,
    /// Unread bytes after the last record. Non-zero is suspicious but has
    /// been observed as harmless padding, so it is surfaced as a warning
    /// rather than an error.
    pub trailing_bytes: usize,
}

impl DecodedFile {
    /// The single record of a compact file, if there is exactly one record
    pub fn single(&self) -> Option<&Record> {
        match self.records.as_slice() {
            [record] => Some(record),
            _ => None,
        }
    }
}

/// Inflate a gzip-compressed stats file into a raw buffer
pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(compressed);
    let mut buffer = Vec::new();
    decoder.read_to_end(&mut buffer)?;
    Ok(buffer)
}
