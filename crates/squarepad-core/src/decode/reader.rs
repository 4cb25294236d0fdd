//! Content-sniffing image decoding.

use std::io::Cursor;

use image::{DynamicImage, ImageError, ImageFormat, ImageReader};

use super::DecodeError;

/// Guess the container format from the leading bytes.
///
/// Returns `None` for anything the `image` crate doesn't recognize.
pub fn sniff_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Decode an image from bytes, keeping the stored pixel layout.
///
/// The format is sniffed from content; the declared media type is ignored.
/// EXIF orientation is deliberately *not* applied: the orientation tag is
/// carried over to the output, so viewers rotate the padded result the same
/// way they rotated the source.
///
/// # Errors
///
/// Returns `DecodeError::Empty` for empty input,
/// `DecodeError::InvalidFormat` if the format can't be identified or isn't
/// compiled in, and `DecodeError::CorruptedFile` if decoding fails.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader.decode().map_err(|e| match e {
        ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        other => DecodeError::CorruptedFile(other.to_string()),
    })
}
