//! Extended (cstats) stream decoder
//!
//! The extended format is a gzip-compressed stream of fixed 13688-byte
//! per-IP records. The record count is the buffer length divided by the
//! record size; one cursor advances across record boundaries without ever
//! resetting, so a consumption drift in any record surfaces immediately.
//! A remainder that is not a whole record is decoded around (floor count)
//! and reported as trailing bytes.

use crate::cursor::ByteCursor;
use crate::record::RecordDecoder;
use crate::schema::{Format, RecordSchema, EXTENDED_RECORD_SIZE};
use crate::types::Result;

use super::{DecodedFile, FormatDecoder};

/// Decoder for the extended per-IP stats stream
pub struct CstatsDecoder;

impl FormatDecoder for CstatsDecoder {
    fn decode(buffer: &[u8]) -> Result<DecodedFile> {
        let record_count = buffer.len() / EXTENDED_RECORD_SIZE;
        log::info!(
            "decoding cstats stream: {} bytes, {} record(s)",
            buffer.len(),
            record_count
        );

        let schema = RecordSchema::for_format(Format::Extended);
        let mut cursor = ByteCursor::new(buffer);
        let mut records = Vec::with_capacity(record_count);
        for index in 0..record_count {
            log::debug!("record {} at offset {}", index, cursor.position());
            records.push(RecordDecoder::decode(&mut cursor, schema)?);
        }

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
            format: Format::Extended,
            records,
            trailing_bytes,
        })
    }
}
