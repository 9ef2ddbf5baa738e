//! Decoder configuration types
//!
//! The decoder needs very little configuration - rendering, caps and batch
//! handling are application-layer concerns (rstats-cli).

use serde::{Deserialize, Serialize};

use crate::schema::Format;

/// Configuration for the decoder library
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Force a specific input format instead of detecting it from the
    /// buffer's magic tags
    #[serde(default)]
    pub format: Option<Format>,
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: force the input format
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }
}
