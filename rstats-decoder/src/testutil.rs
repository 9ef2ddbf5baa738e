//! Shared fixture builders for unit tests

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

use crate::schema::{
    COMPACT_FILE_SIZE, DAY_COUNT, EXTENDED_RECORD_SIZE, IDENTITY_LEN, MONTH_COUNT,
    SPEED_SAMPLE_COUNT,
};

pub fn push_u64(buffer: &mut Vec<u8>, value: u64) {
    buffer.extend_from_slice(&value.to_le_bytes());
}

pub fn push_i64(buffer: &mut Vec<u8>, value: i64) {
    buffer.extend_from_slice(&value.to_le_bytes());
}

/// Pack a (year, month, day) triple into the firmware's date word
pub fn pack_date(year: u16, month: u16, day: u16) -> u64 {
    (((year - 1900) as u64) << 16) | (((month - 1) as u64) << 8) | day as u64
}

/// A well-formed 2112-byte compact buffer: daily slot 0 holds 2024/03/15
/// with 1 MiB down / 2 KiB up, everything else is sentinel.
pub fn compact_buffer(magic: u64) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(COMPACT_FILE_SIZE);
    push_u64(&mut buffer, magic);
    push_u64(&mut buffer, pack_date(2024, 3, 15));
    push_u64(&mut buffer, 1_048_576);
    push_u64(&mut buffer, 2048);
    for _ in 1..DAY_COUNT {
        push_u64(&mut buffer, 0);
        push_u64(&mut buffer, 0);
        push_u64(&mut buffer, 0);
    }
    push_i64(&mut buffer, 0);
    for _ in 0..MONTH_COUNT {
        push_u64(&mut buffer, 0);
        push_u64(&mut buffer, 0);
        push_u64(&mut buffer, 0);
    }
    push_i64(&mut buffer, 0);
    assert_eq!(buffer.len(), COMPACT_FILE_SIZE);
    buffer
}

/// A well-formed 13688-byte extended record for the given IP and magic
pub fn extended_record(ip: &str, magic: u64) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(EXTENDED_RECORD_SIZE);
    let mut identity = [0u8; IDENTITY_LEN];
    identity[..ip.len()].copy_from_slice(ip.as_bytes());
    buffer.extend_from_slice(&identity);
    push_u64(&mut buffer, magic);
    push_u64(&mut buffer, pack_date(2024, 3, 15));
    push_u64(&mut buffer, 4096);
    push_u64(&mut buffer, 1024);
    for _ in 1..DAY_COUNT {
        push_u64(&mut buffer, 0);
        push_u64(&mut buffer, 0);
        push_u64(&mut buffer, 0);
    }
    push_i64(&mut buffer, 1);
    for _ in 0..MONTH_COUNT {
        push_u64(&mut buffer, 0);
        push_u64(&mut buffer, 0);
        push_u64(&mut buffer, 0);
    }
    push_i64(&mut buffer, 0);
    push_i64(&mut buffer, 1_700_000_000); // update timestamp
    push_i64(&mut buffer, 0); // tail
    for slot in 0..SPEED_SAMPLE_COUNT as u64 {
        push_u64(&mut buffer, slot * 10); // rx
        push_u64(&mut buffer, slot); // tx
    }
    push_u64(&mut buffer, 7190);
    push_u64(&mut buffer, 719);
    push_i64(&mut buffer, -1); // sync
    assert_eq!(buffer.len(), EXTENDED_RECORD_SIZE);
    buffer
}

/// Gzip-compress a buffer the way the firmware ships its stats files
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}
