//! Image encoding for padded surfaces.
//!
//! This module provides functionality for:
//! - Choosing an [`OutputFormat`] from a declared media type
//! - Encoding RGB surfaces to JPEG, PNG, or lossless WebP
//!
//! All operations are synchronous and single-threaded.

mod jpeg;
mod png;
mod types;
mod webp;

pub use jpeg::{encode_jpeg, DEFAULT_JPEG_QUALITY};
pub use png::encode_png;
pub use types::{EncodeError, OutputFormat};
pub use webp::encode_webp;

use image::RgbImage;

/// Encode a surface in the given format.
///
/// `jpeg_quality` is only consulted for [`OutputFormat::Jpeg`].
pub fn encode(
    surface: &RgbImage,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = surface.dimensions();
    let pixels = surface.as_raw();

    let bytes = match format {
        OutputFormat::Jpeg => encode_jpeg(pixels, width, height, jpeg_quality)?,
        OutputFormat::Png => encode_png(pixels, width, height)?,
        OutputFormat::Webp => encode_webp(pixels, width, height)?,
    };

    log::debug!("encoded {}x{} surface as {}: {} bytes", width, height, format, bytes.len());
    Ok(bytes)
}
