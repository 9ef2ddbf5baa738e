//! Record decoding engine
//!
//! Walks a [`ByteCursor`] against a [`RecordSchema`] and materializes one
//! [`Record`]. The walk is strictly sequential: every field's offset is
//! defined by the exact widths of all fields before it, so reads happen in
//! schema order and are never skipped or reordered. Ring entries are
//! appended in read order - read position is ring position.

use crate::cursor::ByteCursor;
use crate::date::PackedDate;
use crate::schema::{RecordSchema, Version, IDENTITY_LEN};
use crate::types::{DecodeError, Record, Result, SpeedSample, UsageEntry};

/// Schema-driven record decoder
pub struct RecordDecoder;

impl RecordDecoder {
    /// Decode one record at the cursor's current position.
    ///
    /// After the walk the consumed byte count is compared against the
    /// schema's declared record size; a mismatch means the schema and the
    /// buffer disagree and the record cannot be trusted.
    pub fn decode(cursor: &mut ByteCursor, schema: &RecordSchema) -> Result<Record> {
        let start = cursor.position();

        let identity = if schema.identity_len > 0 {
            let raw = cursor.read_bytes(schema.identity_len)?;
            let mut id = [0u8; IDENTITY_LEN];
            id.copy_from_slice(raw);
            Some(id)
        } else {
            None
        };

        let tag = cursor.read_u64()?;
        if !schema.accepts(tag) {
            return Err(DecodeError::UnsupportedVersion { tag });
        }
        let version = Version::from_magic(tag).ok_or(DecodeError::UnsupportedVersion { tag })?;

        let daily = Self::read_usage_series(cursor, schema.day_count)?;
        let daily_ptr = cursor.read_i64()?;
        let monthly = Self::read_usage_series(cursor, schema.month_count)?;
        let monthly_ptr = cursor.read_i64()?;

        let mut record = Record {
            identity,
            version,
            daily,
            daily_ptr,
            monthly,
            monthly_ptr,
            updated: None,
            tail: None,
            speed: Vec::new(),
            last_rx: None,
            last_tx: None,
            sync: None,
        };

        if schema.speed_count > 0 {
            record.updated = Some(cursor.read_i64()?);
            record.tail = Some(cursor.read_i64()?);
            record.speed = Self::read_speed_series(cursor, schema.speed_count)?;
            record.last_rx = Some(cursor.read_u64()?);
            record.last_tx = Some(cursor.read_u64()?);
            record.sync = Some(cursor.read_i64()?);
        }

        let consumed = cursor.position() - start;
        if let Some(expected) = schema.record_size {
            if consumed != expected {
                return Err(DecodeError::RecordSizeMismatch {
                    expected,
                    actual: consumed,
                });
            }
        }
        log::debug!("decoded {} record, {} bytes", version, consumed);

        Ok(record)
    }

    /// Read a fixed-capacity usage ring: (date, down, up) triples
    fn read_usage_series(cursor: &mut ByteCursor, count: usize) -> Result<Vec<UsageEntry>> {
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let date = PackedDate::decode(cursor.read_u64()?);
            let download = cursor.read_u64()?;
            let upload = cursor.read_u64()?;
            entries.push(UsageEntry {
                date,
                download,
                upload,
            });
        }
        Ok(entries)
    }

    /// Read the 2-minute speed ring: (RX, TX) pairs
    fn read_speed_series(cursor: &mut ByteCursor, count: usize) -> Result<Vec<SpeedSample>> {
        let mut samples = Vec::with_capacity(count);
        for slot in 0..count {
            let rx = cursor.read_u64()?;
            let tx = cursor.read_u64()?;
            samples.push(SpeedSample { slot, rx, tx });
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Format, COMPACT_FILE_SIZE, MAGIC_V1};
    use crate::testutil::{compact_buffer, pack_date, push_u64};

    #[test]
    fn test_decode_compact_record() {
        let buffer = compact_buffer(MAGIC_V1);
        let mut cursor = ByteCursor::new(&buffer);
        let schema = RecordSchema::for_format(Format::Compact);

        let record = RecordDecoder::decode(&mut cursor, schema).unwrap();
        assert_eq!(record.version, Version::V1);
        assert_eq!(record.daily.len(), 62);
        assert_eq!(record.monthly.len(), 25);
        assert!(record.identity.is_none());
        assert!(record.speed.is_empty());
        assert!(record.updated.is_none());
        // the one populated slot
        let entry = &record.daily[0];
        assert_eq!(entry.date.to_string(), "2024/03/15");
        assert_eq!(entry.download, 1_048_576);
        assert_eq!(entry.upload, 2048);
        // whole buffer consumed
        assert_eq!(cursor.position(), COMPACT_FILE_SIZE);
    }

    #[test]
    fn test_unknown_tag_rejected_before_series() {
        let mut buffer = vec![0u8; COMPACT_FILE_SIZE];
        buffer[..8].copy_from_slice(&0xDEAD_BEEFu64.to_le_bytes());
        let mut cursor = ByteCursor::new(&buffer);
        let schema = RecordSchema::for_format(Format::Compact);

        let err = RecordDecoder::decode(&mut cursor, schema).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedVersion { tag: 0xDEAD_BEEF }));
        // only the tag was consumed
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn test_recognized_but_unaccepted_tag_rejected() {
        let buffer = compact_buffer(crate::schema::MAGIC_V0);
        let mut cursor = ByteCursor::new(&buffer);
        let schema = RecordSchema::for_format(Format::Compact);

        let err = RecordDecoder::decode(&mut cursor, schema).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedVersion { .. }));
    }

    #[test]
    fn test_consumption_mismatch_is_fatal() {
        let buffer = compact_buffer(MAGIC_V1);
        let mut cursor = ByteCursor::new(&buffer);
        // same walk, but a schema declaring a larger framed size
        let schema = RecordSchema {
            record_size: Some(COMPACT_FILE_SIZE + 8),
            ..*RecordSchema::for_format(Format::Compact)
        };

        let err = RecordDecoder::decode(&mut cursor, &schema).unwrap_err();
        match err {
            DecodeError::RecordSizeMismatch { expected, actual } => {
                assert_eq!(expected, COMPACT_FILE_SIZE + 8);
                assert_eq!(actual, COMPACT_FILE_SIZE);
            }
            other => panic!("expected RecordSizeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_ring_order_is_read_order() {
        let mut buffer = Vec::with_capacity(COMPACT_FILE_SIZE);
        push_u64(&mut buffer, MAGIC_V1);
        for day in 1..=62u16 {
            push_u64(&mut buffer, pack_date(2024, 1, day.min(31)));
            push_u64(&mut buffer, day as u64 * 100);
            push_u64(&mut buffer, day as u64);
        }
        push_u64(&mut buffer, 7); // daily pointer
        for _ in 0..25 {
            push_u64(&mut buffer, 0);
            push_u64(&mut buffer, 0);
            push_u64(&mut buffer, 0);
        }
        push_u64(&mut buffer, 3); // monthly pointer

        let mut cursor = ByteCursor::new(&buffer);
        let schema = RecordSchema::for_format(Format::Compact);
        let record = RecordDecoder::decode(&mut cursor, schema).unwrap();

        assert_eq!(record.daily_ptr, 7);
        assert_eq!(record.monthly_ptr, 3);
        for (i, entry) in record.daily.iter().enumerate() {
            assert_eq!(entry.download, (i as u64 + 1) * 100);
        }
    }

    #[test]
    fn test_truncated_buffer_is_out_of_bounds() {
        let full = compact_buffer(MAGIC_V1);
        let mut cursor = ByteCursor::new(&full[..100]);
        let schema = RecordSchema::for_format(Format::Compact);
        let err = RecordDecoder::decode(&mut cursor, schema).unwrap_err();
        assert!(matches!(err, DecodeError::OutOfBounds { .. }));
    }
}
