//! EXIF load and dump on top of `kamadak-exif`.

use std::fmt;
use std::io::Cursor;

use exif::experimental::Writer;
use exif::{Exif, Field, In, Reader, Tag, Value};
use image::ImageFormat;

use super::MetadataError;
use crate::decode::{sniff_format, Orientation};

/// EXIF metadata parsed from a source image.
///
/// Holds the parsed IFDs together with the raw TIFF buffer, which the
/// embedded thumbnail (if any) points into.
pub struct ExifMetadata {
    inner: Exif,
}

impl ExifMetadata {
    /// All parsed fields, across every IFD.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.inner.fields()
    }

    pub fn field_count(&self) -> usize {
        self.inner.fields().len()
    }

    /// Look up a field by tag in the primary (IFD0/Exif/GPS) directory.
    pub fn get(&self, tag: Tag) -> Option<&Field> {
        self.inner.get_field(tag, In::PRIMARY)
    }

    /// Byte order of the source TIFF structure.
    pub fn little_endian(&self) -> bool {
        self.inner.little_endian()
    }

    /// Orientation tag, or `Normal` when absent.
    pub fn orientation(&self) -> Orientation {
        self.get(Tag::Orientation)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default()
    }

    pub fn camera_make(&self) -> Option<String> {
        self.get(Tag::Make).and_then(|field| ascii_value(&field.value))
    }

    pub fn camera_model(&self) -> Option<String> {
        self.get(Tag::Model).and_then(|field| ascii_value(&field.value))
    }

    /// Embedded JPEG thumbnail from IFD1, if present and in bounds.
    pub fn thumbnail(&self) -> Option<&[u8]> {
        let uint = |tag| {
            self.inner
                .get_field(tag, In::THUMBNAIL)
                .and_then(|field| field.value.get_uint(0))
                .map(|v| v as usize)
        };
        let offset = uint(Tag::JPEGInterchangeFormat)?;
        let length = uint(Tag::JPEGInterchangeFormatLength)?;
        self.inner.buf().get(offset..offset.checked_add(length)?)
    }
}

impl fmt::Debug for ExifMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExifMetadata")
            .field("fields", &self.field_count())
            .field("little_endian", &self.little_endian())
            .field("orientation", &self.orientation())
            .finish()
    }
}

fn ascii_value(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(parts) => parts.first().map(|bytes| {
            String::from_utf8_lossy(bytes)
                .trim_end_matches('\0')
                .trim()
                .to_string()
        }),
        _ => None,
    }
}

/// Whether a container can carry EXIF at all.
fn may_carry_exif(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP | ImageFormat::Tiff | ImageFormat::Avif
    )
}

/// Parse EXIF metadata from an encoded image.
///
/// Returns `Ok(None)` when the image has no EXIF, including containers that
/// cannot hold any (GIF, BMP, ...).
///
/// # Errors
///
/// Returns `MetadataError::Read` when EXIF is present but malformed.
pub fn load(bytes: &[u8]) -> Result<Option<ExifMetadata>, MetadataError> {
    match sniff_format(bytes) {
        Some(format) if may_carry_exif(format) => {}
        _ => return Ok(None),
    }

    match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(inner) => Ok(Some(ExifMetadata { inner })),
        Err(exif::Error::NotFound(_)) => Ok(None),
        Err(e) => Err(MetadataError::Read(e.to_string())),
    }
}

/// Serialize metadata back to a TIFF-structured EXIF blob.
///
/// Primary and thumbnail IFD fields are written in the source byte order.
/// Pointer and offset tags are regenerated by the writer, and the embedded
/// thumbnail is re-attached when one was found.
///
/// # Errors
///
/// Returns `MetadataError::Write` if a field cannot be serialized (for
/// example a value of unknown type).
pub fn dump(metadata: &ExifMetadata) -> Result<Vec<u8>, MetadataError> {
    let mut writer = Writer::new();

    for field in metadata.fields() {
        if field.ifd_num == In::PRIMARY || field.ifd_num == In::THUMBNAIL {
            writer.push_field(field);
        }
    }
    if let Some(jpeg) = metadata.thumbnail() {
        writer.set_jpeg(jpeg, In::THUMBNAIL);
    }

    let mut buffer = Cursor::new(Vec::new());
    writer
        .write(&mut buffer, metadata.little_endian())
        .map_err(|e| MetadataError::Write(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{
        encode_png, exif_with_thumbnail, gradient_rgb, jpeg_with_exif, sample_exif, thumbnail_jpeg,
    };

    #[test]
    fn test_load_reads_fields() {
        let jpeg = jpeg_with_exif(8, 4);
        let metadata = load(&jpeg).unwrap().expect("EXIF should be present");

        assert_eq!(metadata.camera_make().as_deref(), Some("Acme"));
        assert_eq!(metadata.camera_model().as_deref(), Some("Pinhole 3000"));
        assert_eq!(metadata.orientation(), Orientation::Rotate90CW);
        assert!(metadata.field_count() >= 3);
    }

    #[test]
    fn test_load_without_exif_is_none() {
        let png = encode_png(&gradient_rgb(4, 4));
        assert!(load(&png).unwrap().is_none());
    }

    #[test]
    fn test_load_unknown_container_is_none() {
        assert!(load(&[0x00, 0x01, 0x02, 0x03]).unwrap().is_none());
        assert!(load(&[]).unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_exif_is_error() {
        // APP1 Exif segment whose TIFF header is garbage
        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x0E];
        jpeg.extend_from_slice(b"Exif\0\0");
        jpeg.extend_from_slice(&[0x58, 0x58, 0x58, 0x58, 0x58, 0x58]);
        jpeg.extend_from_slice(&[0xFF, 0xD9]);

        let result = load(&jpeg);
        assert!(matches!(result, Err(MetadataError::Read(_))), "{result:?}");
    }

    #[test]
    fn test_dump_round_trips_fields() {
        let jpeg = jpeg_with_exif(8, 4);
        let metadata = load(&jpeg).unwrap().unwrap();

        let blob = dump(&metadata).unwrap();
        let reparsed = Reader::new().read_raw(blob).unwrap();

        let make = reparsed.get_field(Tag::Make, In::PRIMARY).unwrap();
        assert_eq!(ascii_value(&make.value).as_deref(), Some("Acme"));
        let orientation = reparsed.get_field(Tag::Orientation, In::PRIMARY).unwrap();
        assert_eq!(orientation.value.get_uint(0), Some(6));
    }

    #[test]
    fn test_dump_keeps_byte_order() {
        let big_endian = sample_exif(false);
        assert_eq!(&big_endian[0..2], b"MM");

        let metadata = ExifMetadata {
            inner: Reader::new().read_raw(big_endian).unwrap(),
        };
        assert!(!metadata.little_endian());
        assert_eq!(&dump(&metadata).unwrap()[0..2], b"MM");
    }

    #[test]
    fn test_dump_reattaches_thumbnail_and_gps() {
        let thumbnail = thumbnail_jpeg();
        let metadata = ExifMetadata {
            inner: Reader::new().read_raw(exif_with_thumbnail(&thumbnail)).unwrap(),
        };
        assert_eq!(metadata.thumbnail(), Some(thumbnail.as_slice()));

        let reparsed = ExifMetadata {
            inner: Reader::new().read_raw(dump(&metadata).unwrap()).unwrap(),
        };
        assert_eq!(reparsed.thumbnail(), Some(thumbnail.as_slice()));
        let latitude_ref = reparsed.get(Tag::GPSLatitudeRef).unwrap();
        assert_eq!(ascii_value(&latitude_ref.value).as_deref(), Some("N"));
    }

    #[test]
    fn test_thumbnail_absent() {
        let metadata = load(&jpeg_with_exif(2, 2)).unwrap().unwrap();
        assert_eq!(metadata.thumbnail(), None);
    }

    #[test]
    fn test_debug_summary() {
        let metadata = load(&jpeg_with_exif(2, 2)).unwrap().unwrap();
        let debug = format!("{metadata:?}");
        assert!(debug.contains("ExifMetadata"));
        assert!(debug.contains("Rotate90CW"));
    }
}
