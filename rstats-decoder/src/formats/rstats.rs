//! Compact (rstats) file decoder
//!
//! The compact format is one gzip-compressed blob of whole-router counters
//! with no record framing: the decompressed buffer must be exactly 2112
//! bytes, and there is no way to recover partial content from anything
//! else. The size gate therefore runs before any field is read.

use crate::cursor::ByteCursor;
use crate::record::RecordDecoder;
use crate::schema::{Format, RecordSchema, COMPACT_FILE_SIZE};
use crate::types::{DecodeError, Result};

use super::{DecodedFile, FormatDecoder};

/// Decoder for the compact whole-router stats file
pub struct RstatsDecoder;

impl FormatDecoder for RstatsDecoder {
    fn decode(buffer: &[u8]) -> Result<DecodedFile> {
        if buffer.len() != COMPACT_FILE_SIZE {
            return Err(DecodeError::UnexpectedFileSize {
                expected: COMPACT_FILE_SIZE,
                actual: buffer.len(),
            });
        }
        log::info!("decoding rstats file ({} bytes)", buffer.len());

        let schema = RecordSchema::for_format(Format::Compact);
        let mut cursor = ByteCursor::new(buffer);
        let record = RecordDecoder::decode(&mut cursor, schema)?;

        let trailing_bytes = cursor.remaining();
        if trailing_bytes != 0 {
            log::warn!(
                "read {} of {} bytes, {} left unread",
                cursor.position(),
                buffer.len(),
                trailing_bytes
            );
        }

        Ok(DecodedFile {
            format: Format::Compact,
            records: vec![record],
            trailing_bytes,
        })
    }
}
