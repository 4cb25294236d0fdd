//! The per-image padding pipeline.
//!
//! One call to [`transform`] takes a source file from bytes to a
//! downloadable artifact:
//!
//! 1. Load EXIF from the source (failure is a warning)
//! 2. Decode pixels
//! 3. Pad to a square of the longest edge, filled with the background color
//! 4. Encode in the source's format (PNG when the canvas couldn't export it)
//! 5. Re-embed the EXIF (failure is a warning)
//!
//! Decode, padding, and encode failures are fatal for that image and surface as
//! [`TransformError`].

use thiserror::Error;

use crate::color::BackgroundColor;
use crate::data_url::to_data_url;
use crate::decode::{decode_image, DecodeError, SourceImage};
use crate::encode::{encode, EncodeError, OutputFormat};
use crate::metadata::{self, MetadataError};
use crate::options::PadOptions;
use crate::transform::{pad_to_square, PadError, PadGeometry};

/// Errors that stop an image from being padded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The source file has no bytes.
    #[error("File is empty")]
    EmptyFile,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Pad(#[from] PadError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// What happened to the source's EXIF.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MetadataStatus {
    /// The source had no EXIF, or preservation is turned off.
    #[default]
    Absent,
    /// EXIF was carried over into the output.
    Preserved,
    /// EXIF could not be read or written; the output has none.
    Failed(MetadataError),
}

impl MetadataStatus {
    /// The warning to show next to the image, if any.
    pub fn warning(&self) -> Option<&MetadataError> {
        match self {
            MetadataStatus::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// A padded, encoded image ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    /// Download name, the same as the source file name.
    pub file_name: String,
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
    /// Side length of the square output.
    pub size: u32,
    pub metadata: MetadataStatus,
}

impl OutputArtifact {
    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }

    /// The artifact as a `data:` URL for a link `href` or `<img src>`.
    pub fn data_url(&self) -> String {
        to_data_url(self.media_type(), &self.bytes)
    }
}

/// Pad one source image to a square of `color`.
pub fn transform(
    source: &SourceImage,
    color: BackgroundColor,
    options: &PadOptions,
) -> Result<OutputArtifact, TransformError> {
    if source.is_empty() {
        return Err(TransformError::EmptyFile);
    }

    let exif = if options.preserve_metadata {
        metadata::load(source.bytes())
    } else {
        Ok(None)
    };

    let image = decode_image(source.bytes())?;
    let geometry = PadGeometry::for_dimensions(image.width(), image.height());
    log::debug!(
        "{}: decoded {}x{}, padding to {}",
        source.name(),
        geometry.width,
        geometry.height,
        geometry.size
    );

    let surface = pad_to_square(&image, color)?;
    let format = OutputFormat::for_media_type(source.media_type());
    let encoded = encode(&surface, format, options.effective_jpeg_quality())?;

    let (bytes, metadata) = match exif {
        Ok(None) => (encoded, MetadataStatus::Absent),
        Ok(Some(exif)) => {
            match metadata::dump(&exif).and_then(|blob| metadata::insert(&blob, &encoded, format)) {
                Ok(with_exif) => (with_exif, MetadataStatus::Preserved),
                Err(err) => {
                    log::warn!("{}: dropping EXIF: {}", source.name(), err);
                    (encoded, MetadataStatus::Failed(err))
                }
            }
        }
        Err(err) => {
            log::warn!("{}: {}", source.name(), err);
            (encoded, MetadataStatus::Failed(err))
        }
    };

    Ok(OutputArtifact {
        file_name: source.name().to_string(),
        format,
        bytes,
        size: geometry.size,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Orientation;
    use crate::encode::encode_jpeg;
    use crate::test_helpers::{
        encode_png, exif_with_thumbnail, gradient_rgb, jpeg_with_exif, png_with_exif, thumbnail_jpeg,
    };
    use image::Rgb;

    const RED: BackgroundColor = BackgroundColor::new(255, 0, 0);

    fn png_source(name: &str, width: u32, height: u32) -> SourceImage {
        SourceImage::new(name, "image/png", encode_png(&gradient_rgb(width, height)))
    }

    #[test]
    fn test_png_100x50_red_scenario() {
        let src = gradient_rgb(100, 50);
        let source = SourceImage::new("wide.png", "image/png", encode_png(&src));

        let artifact = transform(&source, RED, &PadOptions::default()).unwrap();
        assert_eq!(artifact.size, 100);
        assert_eq!(artifact.format, OutputFormat::Png);
        assert_eq!(artifact.file_name, "wide.png");
        assert_eq!(artifact.metadata, MetadataStatus::Absent);

        let out = image::load_from_memory(&artifact.bytes).unwrap().to_rgb8();
        assert_eq!(out.dimensions(), (100, 100));
        for x in 0..100 {
            for y in (0..25).chain(75..100) {
                assert_eq!(out.get_pixel(x, y), &Rgb([255, 0, 0]));
            }
            for y in 25..75 {
                assert_eq!(out.get_pixel(x, y), src.get_pixel(x, y - 25));
            }
        }
    }

    #[test]
    fn test_jpeg_100x50_red_scenario() {
        let source = SourceImage::new("wide.jpg", "image/jpeg", jpeg_with_exif(100, 50));

        let artifact = transform(&source, RED, &PadOptions::default()).unwrap();
        assert_eq!(artifact.format, OutputFormat::Jpeg);
        assert_eq!(artifact.size, 100);

        // Lossy, so check the padding bands approximately
        let out = image::load_from_memory(&artifact.bytes).unwrap().to_rgb8();
        assert_eq!(out.dimensions(), (100, 100));
        for (x, y) in [(0, 0), (50, 10), (99, 12), (0, 90), (99, 99)] {
            let [r, g, b] = out.get_pixel(x, y).0;
            assert!(r > 230 && g < 25 && b < 25, "({x}, {y}) = {:?}", [r, g, b]);
        }
    }

    #[test]
    fn test_jpeg_exif_is_preserved() {
        let source = SourceImage::new("tagged.jpg", "image/jpeg", jpeg_with_exif(40, 20));

        let artifact = transform(&source, RED, &PadOptions::default()).unwrap();
        assert_eq!(artifact.metadata, MetadataStatus::Preserved);

        let exif = metadata::load(&artifact.bytes).unwrap().unwrap();
        assert_eq!(exif.camera_make().as_deref(), Some("Acme"));
        assert_eq!(exif.camera_model().as_deref(), Some("Pinhole 3000"));
        assert_eq!(exif.orientation(), Orientation::Rotate90CW);
        let taken = exif.get(exif::Tag::DateTimeOriginal).unwrap();
        assert!(matches!(
            &taken.value,
            exif::Value::Ascii(parts) if parts[0] == b"2024:05:01 12:30:00"
        ));
    }

    #[test]
    fn test_png_exif_is_preserved() {
        let source = SourceImage::new("tagged.png", "image/png", png_with_exif(&gradient_rgb(9, 3)));

        let artifact = transform(&source, BackgroundColor::BLACK, &PadOptions::default()).unwrap();
        assert_eq!(artifact.metadata, MetadataStatus::Preserved);

        let exif = metadata::load(&artifact.bytes).unwrap().unwrap();
        assert_eq!(exif.camera_make().as_deref(), Some("Acme"));
        assert!(!exif.little_endian());
    }

    #[test]
    fn test_thumbnail_and_gps_survive_padding() {
        let thumbnail = thumbnail_jpeg();
        let jpeg = encode_jpeg(gradient_rgb(30, 10).as_raw(), 30, 10, 90).unwrap();
        let tagged = metadata::insert(&exif_with_thumbnail(&thumbnail), &jpeg, OutputFormat::Jpeg).unwrap();
        let source = SourceImage::new("geo.jpg", "image/jpeg", tagged);

        let artifact = transform(&source, RED, &PadOptions::default()).unwrap();
        assert_eq!(artifact.metadata, MetadataStatus::Preserved);

        let exif = metadata::load(&artifact.bytes).unwrap().unwrap();
        assert_eq!(exif.thumbnail(), Some(thumbnail.as_slice()));
        let latitude_ref = exif.get(exif::Tag::GPSLatitudeRef).unwrap();
        assert!(matches!(
            &latitude_ref.value,
            exif::Value::Ascii(parts) if parts[0] == b"N"
        ));
    }

    #[test]
    fn test_preserve_metadata_off_drops_exif() {
        let source = SourceImage::new("tagged.jpg", "image/jpeg", jpeg_with_exif(10, 10));
        let options = PadOptions {
            preserve_metadata: false,
            ..PadOptions::default()
        };

        let artifact = transform(&source, RED, &options).unwrap();
        assert_eq!(artifact.metadata, MetadataStatus::Absent);
        assert!(metadata::load(&artifact.bytes).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_exif_is_warning_not_failure() {
        // Valid PNG whose eXIf chunk is garbage
        let png = metadata::insert(b"XXXXXXXX", &encode_png(&gradient_rgb(6, 2)), OutputFormat::Png).unwrap();
        let source = SourceImage::new("bad-exif.png", "image/png", png);

        let artifact = transform(&source, RED, &PadOptions::default()).unwrap();
        assert!(matches!(artifact.metadata, MetadataStatus::Failed(MetadataError::Read(_))));
        assert!(artifact.metadata.warning().is_some());
        assert_eq!(artifact.size, 6);
        assert!(metadata::load(&artifact.bytes).unwrap().is_none());
    }

    #[test]
    fn test_unsupported_media_type_falls_back_to_png() {
        let source = SourceImage::new("anim.gif", "image/gif", encode_png(&gradient_rgb(3, 5)));

        let artifact = transform(&source, RED, &PadOptions::default()).unwrap();
        assert_eq!(artifact.format, OutputFormat::Png);
        assert_eq!(artifact.media_type(), "image/png");
        assert_eq!(artifact.file_name, "anim.gif");
    }

    #[test]
    fn test_webp_output() {
        let source = SourceImage::new("pic.webp", "image/webp", encode_png(&gradient_rgb(4, 2)));

        let artifact = transform(&source, RED, &PadOptions::default()).unwrap();
        assert_eq!(artifact.format, OutputFormat::Webp);
        let out = image::load_from_memory(&artifact.bytes).unwrap().to_rgb8();
        assert_eq!(out.dimensions(), (4, 4));
        assert_eq!(out.get_pixel(0, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_empty_file_fails() {
        let source = SourceImage::new("empty.png", "image/png", Vec::new());
        assert_eq!(
            transform(&source, RED, &PadOptions::default()),
            Err(TransformError::EmptyFile)
        );
    }

    #[test]
    fn test_garbage_fails_with_decode_error() {
        let source = SourceImage::new("noise.png", "image/png", vec![0x42u8; 64]);
        let result = transform(&source, RED, &PadOptions::default());
        assert_eq!(result, Err(TransformError::Decode(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_long_thin_source_fails_with_pad_error() {
        let source = png_source("strip.png", 1, 200_000);
        let result = transform(&source, RED, &PadOptions::default());
        assert!(matches!(
            result,
            Err(TransformError::Pad(PadError::SurfaceTooLarge { size: 200_000, .. }))
        ));
    }

    #[test]
    fn test_color_change_recomputes_fill_only() {
        let source = png_source("a.png", 8, 2);
        let red = transform(&source, RED, &PadOptions::default()).unwrap();
        let black = transform(&source, BackgroundColor::BLACK, &PadOptions::default()).unwrap();

        assert_eq!(red.size, black.size);
        let red = image::load_from_memory(&red.bytes).unwrap().to_rgb8();
        let black = image::load_from_memory(&black.bytes).unwrap().to_rgb8();
        assert_eq!(red.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(black.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(red.get_pixel(3, 4), black.get_pixel(3, 4));
    }

    #[test]
    fn test_data_url_prefix() {
        let artifact = transform(&png_source("a.png", 2, 2), RED, &PadOptions::default()).unwrap();
        assert!(artifact.data_url().starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
}
