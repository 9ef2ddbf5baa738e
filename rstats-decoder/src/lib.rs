//! Router Bandwidth Stats Decoder Library
//!
//! A stateless, reusable library for decoding the gzip-compressed bandwidth
//! history files written by Tomato USB router firmware.
//!
//! # Architecture
//!
//! Two on-disk formats are supported:
//! - the compact whole-router file (rstats): one fixed 2112-byte record of
//!   daily and monthly usage rings
//! - the extended per-IP stream (cstats): fixed 13688-byte records that add
//!   2-minute RX/TX speed samples and identity/marker fields
//!
//! Decoding is a strict sequential walk: the formats carry no field tags,
//! so a static [`schema::RecordSchema`] per format is the only source of
//! truth for field identity, and every record must consume exactly its
//! declared size. Decompression happens up front; the core only ever sees
//! a fully materialized byte buffer.
//!
//! The library does NOT:
//! - Render charts or format console output
//! - Write or re-encode stats files
//! - Guess layouts for unrecognized version tags
//!
//! All higher-level functionality is in the application layer (rstats-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use rstats_decoder::{Decoder, DecoderConfig, RecordReport};
//! use std::path::Path;
//!
//! let decoder = Decoder::new();
//! let decoded = decoder
//!     .decode_file(Path::new("tomato_rstats.gz"), &DecoderConfig::new())
//!     .unwrap();
//!
//! for record in &decoded.records {
//!     let report = RecordReport::from_record(record);
//!     for row in &report.daily.rows {
//!         println!("Date: {}, Down: {}, Up: {}", row.date, row.down, row.up);
//!     }
//! }
//! ```

// Public modules
pub mod config;
pub mod cursor;
pub mod date;
pub mod decoder;
pub mod formats;
pub mod record;
pub mod report;
pub mod schema;
pub mod types;

// Re-export main types for convenience
pub use config::DecoderConfig;
pub use cursor::ByteCursor;
pub use date::PackedDate;
pub use decoder::Decoder;
pub use formats::{CstatsDecoder, DecodedFile, FormatDecoder, RstatsDecoder};
pub use record::RecordDecoder;
pub use report::{RecordReport, SpeedRow, UsageReport, UsageRow, format_size};
pub use schema::{Format, RecordSchema, Version};
pub use types::{DecodeError, Record, Result, SpeedSample, Timestamp, UsageEntry};

// Shared test fixtures (not part of the public API)
#[cfg(test)]
pub(crate) mod testutil;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
