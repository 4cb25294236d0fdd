//! EXIF metadata preservation.
//!
//! Three operations carry metadata from a source file to its padded output:
//!
//! - [`load`] parses EXIF from the source bytes
//! - [`dump`] re-serializes it as a TIFF-structured blob
//! - [`insert`] splices that blob into freshly encoded JPEG, PNG, or WebP bytes
//!
//! Every failure here is reported as a [`MetadataError`], which callers treat
//! as a warning: the padded image is still produced, just without metadata.
//!
//! # Examples
//!
//! ```ignore
//! use squarepad_core::metadata;
//! use squarepad_core::encode::OutputFormat;
//!
//! if let Some(exif) = metadata::load(&source_bytes)? {
//!     let blob = metadata::dump(&exif)?;
//!     let output = metadata::insert(&blob, &encoded, OutputFormat::Jpeg)?;
//! }
//! ```

mod codec;
mod jpeg;
mod png;
mod webp;

pub use codec::{dump, load, ExifMetadata};

use thiserror::Error;

use crate::encode::OutputFormat;

/// Errors from reading, writing, or splicing EXIF.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// EXIF is present in the source but could not be parsed.
    #[error("Failed to read EXIF: {0}")]
    Read(String),

    /// Parsed EXIF could not be serialized again.
    #[error("Failed to write EXIF: {0}")]
    Write(String),

    /// The encoded image is not a well-formed container of the expected kind.
    #[error("Cannot embed EXIF: {0}")]
    Container(String),

    /// The EXIF blob exceeds what the container can hold.
    #[error("EXIF payload of {size} bytes exceeds the {limit}-byte limit")]
    TooLarge { size: usize, limit: usize },
}

/// Splice an EXIF blob into encoded image bytes.
///
/// Any EXIF already present in `image` is replaced.
pub fn insert(exif: &[u8], image: &[u8], format: OutputFormat) -> Result<Vec<u8>, MetadataError> {
    let out = match format {
        OutputFormat::Jpeg => jpeg::insert(exif, image)?,
        OutputFormat::Png => png::insert(exif, image)?,
        OutputFormat::Webp => webp::insert(exif, image)?,
    };
    log::debug!("embedded {} bytes of EXIF into {}", exif.len(), format);
    Ok(out)
}
