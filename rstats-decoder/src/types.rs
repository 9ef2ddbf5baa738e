//! Core types for the stats decoder library
//!
//! This module defines the values the decoder produces when processing a
//! stats file, plus the error taxonomy. The decoder is stateless and only
//! outputs decoded records - aggregation and rendering live in `report`.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::date::PackedDate;
use crate::schema::{Version, IDENTITY_LEN, SPEED_INTERVAL_MINUTES};

/// Timestamp type used throughout the decoder
pub type Timestamp = DateTime<Utc>;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors that can occur during decoding
///
/// None of these are retryable: the format has no resynchronization
/// mechanism, so a failed read means the schema and the buffer disagree.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("read of {requested} bytes at offset {offset} exceeds buffer length {len}")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        len: usize,
    },

    #[error("unexpected file size: expected {expected} bytes, got {actual}")]
    UnexpectedFileSize { expected: usize, actual: usize },

    #[error("unsupported version tag 0x{tag:08X}")]
    UnsupportedVersion { tag: u64 },

    #[error("record consumed {actual} bytes, schema declares {expected}")]
    RecordSizeMismatch { expected: usize, actual: usize },

    #[error("buffer does not match any known stats format")]
    UnknownFormat,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One slot of a daily or monthly usage ring
///
/// Slots are stored in file order, which is ring order. A slot whose date
/// is the 1900 sentinel has not been populated yet and carries no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageEntry {
    /// Packed calendar date of the slot
    pub date: PackedDate,
    /// Bytes downloaded
    pub download: u64,
    /// Bytes uploaded
    pub upload: u64,
}

impl UsageEntry {
    /// True if this slot has not been written yet
    pub fn is_sentinel(&self) -> bool {
        self.date.is_sentinel()
    }
}

/// One 2-minute RX/TX speed sample (extended format only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedSample {
    /// Sample index within the day (0..720)
    pub slot: usize,
    /// Bytes received during the interval
    pub rx: u64,
    /// Bytes transmitted during the interval
    pub tx: u64,
}

impl SpeedSample {
    /// Hour of day this sample covers
    pub fn hour(&self) -> u32 {
        (self.slot * SPEED_INTERVAL_MINUTES / 60) as u32
    }

    /// Minute within the hour this sample covers
    pub fn minute(&self) -> u32 {
        (self.slot * SPEED_INTERVAL_MINUTES % 60) as u32
    }

    /// Wall-clock label for the sample, e.g. "13:42"
    pub fn clock_label(&self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }
}

/// One fully decoded record
///
/// The compact format holds exactly one record per file; the extended
/// format holds one record per tracked IP address. Fields that exist only
/// in the extended layout are `Option`/empty for compact records.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// NUL-padded source IP bytes (extended format only)
    pub identity: Option<[u8; IDENTITY_LEN]>,
    /// Format generation this record was tagged with
    pub version: Version,
    /// Daily usage ring, in stored order
    pub daily: Vec<UsageEntry>,
    /// Write pointer into the daily ring
    pub daily_ptr: i64,
    /// Monthly usage ring, in stored order
    pub monthly: Vec<UsageEntry>,
    /// Write pointer into the monthly ring
    pub monthly_ptr: i64,
    /// Unix timestamp of the last firmware update to this record
    pub updated: Option<i64>,
    /// Tail marker
    pub tail: Option<i64>,
    /// 2-minute RX/TX samples, empty for compact records
    pub speed: Vec<SpeedSample>,
    /// RX bytes of the most recent speed sample
    pub last_rx: Option<u64>,
    /// TX bytes of the most recent speed sample
    pub last_tx: Option<u64>,
    /// Sync marker
    pub sync: Option<i64>,
}

impl Record {
    /// Source IP address as a string, trimmed of NUL padding
    pub fn ip(&self) -> Option<String> {
        self.identity.map(|id| {
            let end = id.iter().position(|&b| b == 0).unwrap_or(id.len());
            String::from_utf8_lossy(&id[..end]).into_owned()
        })
    }

    /// Update timestamp as a calendar time, if the record carries one
    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ip() {
            Some(ip) => write!(f, "record for {} ({})", ip, self.version),
            None => write!(f, "record ({})", self.version),
        }
    }
}
