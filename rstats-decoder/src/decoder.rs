//! Main decoder API
//!
//! This module provides the primary interface for the decoder library: read
//! a gzip-compressed stats file, inflate it, pick the format, and hand the
//! buffer to the matching format decoder.

use std::path::Path;

use crate::config::DecoderConfig;
use crate::formats::{self, CstatsDecoder, DecodedFile, FormatDecoder, RstatsDecoder};
use crate::schema::Format;
use crate::types::{DecodeError, Result};

/// The main decoder struct - entry point for all decoding operations
///
/// Decoders are stateless; each call owns its buffer and cursor
/// exclusively, so independent files can be decoded from independent
/// threads without any shared state.
#[derive(Debug, Default)]
pub struct Decoder;

impl Decoder {
    /// Create a new decoder instance
    pub fn new() -> Self {
        Self
    }

    /// Decode a gzip-compressed stats file from disk.
    ///
    /// # Example
    /// ```no_run
    /// use rstats_decoder::{Decoder, DecoderConfig};
    /// use std::path::Path;
    ///
    /// let decoder = Decoder::new();
    /// let decoded = decoder
    ///     .decode_file(Path::new("tomato_rstats.gz"), &DecoderConfig::new())
    ///     .unwrap();
    /// for record in &decoded.records {
    ///     println!("{}", record);
    /// }
    /// ```
    pub fn decode_file(&self, path: &Path, config: &DecoderConfig) -> Result<DecodedFile> {
        log::info!("decoding stats file: {:?}", path);
        let compressed = std::fs::read(path)?;
        self.decode_bytes(&compressed, config)
    }

    /// Decode a gzip-compressed stats buffer.
    ///
    /// The format comes from the config when forced, otherwise from the
    /// known magic tags at their fixed offsets. A buffer matching neither
    /// format is rejected with `UnknownFormat`.
    pub fn decode_bytes(&self, compressed: &[u8], config: &DecoderConfig) -> Result<DecodedFile> {
        let buffer = formats::decompress(compressed)?;
        let format = match config.format {
            Some(format) => format,
            None => Format::detect(&buffer).ok_or(DecodeError::UnknownFormat)?,
        };
        log::debug!("decoding {} bytes as {}", buffer.len(), format);

        match format {
            Format::Compact => RstatsDecoder::decode(&buffer),
            Format::Extended => CstatsDecoder::decode(&buffer),
        }
    }
}
