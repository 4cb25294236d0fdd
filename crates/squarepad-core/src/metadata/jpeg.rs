//! EXIF splicing for JPEG.
//!
//! EXIF lives in an `APP1` segment whose payload starts with `Exif\0\0`.
//! The segment goes directly after SOI, or after a leading JFIF `APP0` when
//! the encoder wrote one. Any EXIF segment already present is dropped.

use super::MetadataError;

const SOI: u8 = 0xD8;
const EOI: u8 = 0xD9;
const SOS: u8 = 0xDA;
const APP0: u8 = 0xE0;
const APP1: u8 = 0xE1;
const TEM: u8 = 0x01;

/// Identifier prefix of an EXIF `APP1` payload.
pub(crate) const EXIF_HEADER: &[u8; 6] = b"Exif\0\0";

/// Largest TIFF blob that fits in one segment (length field minus its own
/// two bytes and the identifier).
pub(crate) const MAX_EXIF_LEN: usize = u16::MAX as usize - 2 - EXIF_HEADER.len();

/// A marker segment before the scan data, as a byte range into the file.
struct Segment {
    marker: u8,
    start: usize,
    end: usize,
}

/// Splice an EXIF blob into JPEG bytes.
pub(crate) fn insert(exif: &[u8], jpeg: &[u8]) -> Result<Vec<u8>, MetadataError> {
    if exif.len() > MAX_EXIF_LEN {
        return Err(MetadataError::TooLarge {
            size: exif.len(),
            limit: MAX_EXIF_LEN,
        });
    }
    if jpeg.len() < 2 || jpeg[0] != 0xFF || jpeg[1] != SOI {
        return Err(MetadataError::Container("missing JPEG SOI marker".to_string()));
    }

    let (segments, scan_start) = read_segments(jpeg)?;

    let mut out = Vec::with_capacity(jpeg.len() + exif.len() + 10);
    out.extend_from_slice(&jpeg[0..2]);

    let mut inserted = false;
    for segment in &segments {
        if is_exif_segment(jpeg, segment) {
            continue;
        }
        if !inserted && segment.marker != APP0 {
            write_exif_segment(&mut out, exif);
            inserted = true;
        }
        out.extend_from_slice(&jpeg[segment.start..segment.end]);
    }
    if !inserted {
        write_exif_segment(&mut out, exif);
    }

    out.extend_from_slice(&jpeg[scan_start..]);
    Ok(out)
}

/// Walk marker segments up to the first SOS (or EOI).
///
/// Returns the segments and the offset where the untouched tail begins.
fn read_segments(jpeg: &[u8]) -> Result<(Vec<Segment>, usize), MetadataError> {
    let truncated = || MetadataError::Container("truncated JPEG segment".to_string());

    let mut segments = Vec::new();
    let mut pos = 2;

    loop {
        if pos + 2 > jpeg.len() {
            return Err(truncated());
        }
        if jpeg[pos] != 0xFF {
            return Err(MetadataError::Container(format!(
                "expected JPEG marker at offset {pos}"
            )));
        }

        let marker = jpeg[pos + 1];
        match marker {
            // Fill byte before a marker
            0xFF => pos += 1,
            SOS | EOI => return Ok((segments, pos)),
            TEM | 0xD0..=0xD7 => {
                segments.push(Segment { marker, start: pos, end: pos + 2 });
                pos += 2;
            }
            _ => {
                if pos + 4 > jpeg.len() {
                    return Err(truncated());
                }
                let length = u16::from_be_bytes([jpeg[pos + 2], jpeg[pos + 3]]) as usize;
                let end = pos + 2 + length;
                if length < 2 || end > jpeg.len() {
                    return Err(truncated());
                }
                segments.push(Segment { marker, start: pos, end });
                pos = end;
            }
        }
    }
}

fn is_exif_segment(jpeg: &[u8], segment: &Segment) -> bool {
    segment.marker == APP1 && jpeg[segment.start + 4..segment.end].starts_with(EXIF_HEADER)
}

fn write_exif_segment(out: &mut Vec<u8>, exif: &[u8]) {
    // Length counts itself, the identifier, and the payload.
    let length = (2 + EXIF_HEADER.len() + exif.len()) as u16;
    out.extend_from_slice(&[0xFF, APP1]);
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(EXIF_HEADER);
    out.extend_from_slice(exif);
}
