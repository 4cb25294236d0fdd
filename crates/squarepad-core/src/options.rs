//! Runtime options for the padding pipeline.

use serde::{Deserialize, Serialize};

use crate::color::BackgroundColor;
use crate::encode::DEFAULT_JPEG_QUALITY;

/// Options shared by every transform in a selection.
///
/// Every field has a default, so a partial (or empty) object deserializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadOptions {
    /// JPEG quality (1-100) for JPEG outputs.
    pub jpeg_quality: u8,
    /// Re-embed source EXIF into the output.
    pub preserve_metadata: bool,
    /// Initial background color for a new selection.
    pub background: BackgroundColor,
}

impl Default for PadOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            preserve_metadata: true,
            background: BackgroundColor::default(),
        }
    }
}

impl PadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quality clamped to the valid encoder range.
    pub fn effective_jpeg_quality(&self) -> u8 {
        self.jpeg_quality.clamp(1, 100)
    }
}
