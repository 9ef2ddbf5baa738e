//! Record layout schemas for the supported stats formats
//!
//! The wire formats are not self-describing: the schema is the only source
//! of truth for field identity, so each supported format gets one static
//! schema value and every decode walks it in declared order.
//!
//! Two formats exist. The compact format is a single 2112-byte blob of
//! whole-router counters. The extended format is a stream of fixed
//! 13688-byte per-IP records that additionally carry 2-minute RX/TX speed
//! samples. Three generations of the extended format share one layout and
//! differ only in their magic tag.

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use std::fmt;

/// "RS00" magic tag (little-endian ASCII)
pub const MAGIC_V0: u64 = 0x3030_5352;
/// "RS01" magic tag
pub const MAGIC_V1: u64 = 0x3130_5352;
/// "RS02" magic tag
pub const MAGIC_V2: u64 = 0x3230_5352;

/// Daily ring capacity
pub const DAY_COUNT: usize = 62;
/// Monthly ring capacity
pub const MONTH_COUNT: usize = 25;
/// Usage entry width: packed date + down + up, 8 bytes each
pub const USAGE_ENTRY_SIZE: usize = 24;
/// Speed entry width: RX + TX, 8 bytes each
pub const SPEED_ENTRY_SIZE: usize = 16;
/// Minutes covered by one speed sample
pub const SPEED_INTERVAL_MINUTES: usize = 2;
/// Speed samples per day (24h of 2-minute intervals)
pub const SPEED_SAMPLE_COUNT: usize = 24 * 60 / SPEED_INTERVAL_MINUTES;
/// Identity field width of the extended format
pub const IDENTITY_LEN: usize = 16;
/// Exact decompressed size of a compact stats file
pub const COMPACT_FILE_SIZE: usize = 2112;
/// Fixed size of one extended record
pub const EXTENDED_RECORD_SIZE: usize = 13688;

/// Format generation, mapped from the magic tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Version {
    V0,
    V1,
    V2,
}

impl Version {
    /// Map a magic tag to its generation
    pub fn from_magic(tag: u64) -> Option<Self> {
        match tag {
            MAGIC_V0 => Some(Version::V0),
            MAGIC_V1 => Some(Version::V1),
            MAGIC_V2 => Some(Version::V2),
            _ => None,
        }
    }

    /// The magic tag of this generation
    pub fn magic(&self) -> u64 {
        match self {
            Version::V0 => MAGIC_V0,
            Version::V1 => MAGIC_V1,
            Version::V2 => MAGIC_V2,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::V0 => write!(f, "RS00"),
            Version::V1 => write!(f, "RS01"),
            Version::V2 => write!(f, "RS02"),
        }
    }
}

/// The two supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Whole-router stats, one record, no speed samples (rstats)
    #[serde(alias = "rstats")]
    Compact,
    /// Per-IP record stream with speed samples (cstats)
    #[serde(alias = "cstats")]
    Extended,
}

impl Format {
    /// Detect the format of a decompressed buffer by its known magic tags.
    ///
    /// The compact magic sits at offset 0 of an exactly 2112-byte file; the
    /// extended magic sits at offset 16 of the first record. Nothing beyond
    /// these fixed probes is attempted.
    pub fn detect(buffer: &[u8]) -> Option<Format> {
        if buffer.len() == COMPACT_FILE_SIZE {
            let tag = LittleEndian::read_u64(&buffer[0..8]);
            if RecordSchema::for_format(Format::Compact).accepts(tag) {
                return Some(Format::Compact);
            }
        }
        if buffer.len() >= EXTENDED_RECORD_SIZE {
            let tag = LittleEndian::read_u64(&buffer[IDENTITY_LEN..IDENTITY_LEN + 8]);
            if RecordSchema::for_format(Format::Extended).accepts(tag) {
                return Some(Format::Extended);
            }
        }
        None
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Compact => write!(f, "rstats"),
            Format::Extended => write!(f, "cstats"),
        }
    }
}

/// Read-only description of one record layout
///
/// Sections appear on the wire in the order the decoder walks them:
/// identity, version tag, daily ring, daily pointer, monthly ring, monthly
/// pointer, then (extended only) update timestamp, tail marker, speed ring
/// and the last-sample/sync trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSchema {
    pub format: Format,
    /// Magic tags this schema accepts
    pub versions: &'static [u64],
    /// Identity field width, 0 when the format has none
    pub identity_len: usize,
    /// Daily ring entry count
    pub day_count: usize,
    /// Monthly ring entry count
    pub month_count: usize,
    /// Speed sample count, 0 when the format has none
    pub speed_count: usize,
    /// Fixed per-record size, None for the compact format which only has
    /// whole-file framing
    pub record_size: Option<usize>,
}

/// Compact format: the original reader accepts only the RS01 generation.
/// RS00 exists in the wild but uses a 12-entry monthly ring this layout
/// does not describe.
const COMPACT: RecordSchema = RecordSchema {
    format: Format::Compact,
    versions: &[MAGIC_V1],
    identity_len: 0,
    day_count: DAY_COUNT,
    month_count: MONTH_COUNT,
    speed_count: 0,
    record_size: None,
};

/// Extended format: three tag generations, one shared layout.
const EXTENDED: RecordSchema = RecordSchema {
    format: Format::Extended,
    versions: &[MAGIC_V0, MAGIC_V1, MAGIC_V2],
    identity_len: IDENTITY_LEN,
    day_count: DAY_COUNT,
    month_count: MONTH_COUNT,
    speed_count: SPEED_SAMPLE_COUNT,
    record_size: Some(EXTENDED_RECORD_SIZE),
};

impl RecordSchema {
    /// The schema describing the given format
    pub fn for_format(format: Format) -> &'static RecordSchema {
        match format {
            Format::Compact => &COMPACT,
            Format::Extended => &EXTENDED,
        }
    }

    /// True if this schema recognizes the magic tag
    pub fn accepts(&self, tag: u64) -> bool {
        self.versions.contains(&tag)
    }

    /// Total bytes one record occupies on the wire per this schema
    pub fn wire_size(&self) -> usize {
        let mut size = self.identity_len + 8; // identity + version tag
        size += (self.day_count + self.month_count) * USAGE_ENTRY_SIZE;
        size += 2 * 8; // daily + monthly write pointers
        if self.speed_count > 0 {
            size += 2 * 8; // update timestamp + tail marker
            size += self.speed_count * SPEED_ENTRY_SIZE;
            size += 3 * 8; // last RX, last TX, sync marker
        }
        size
    }
}
