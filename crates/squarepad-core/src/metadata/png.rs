//! EXIF splicing for PNG.
//!
//! PNG carries EXIF in an `eXIf` chunk holding the bare TIFF structure (no
//! `Exif\0\0` prefix). The chunk must precede the first `IDAT`.

use crc32fast::Hasher;

use super::MetadataError;

/// PNG signature bytes
const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

const EXIF_CHUNK: &[u8; 4] = b"eXIf";
const IDAT_CHUNK: &[u8; 4] = b"IDAT";
const IEND_CHUNK: &[u8; 4] = b"IEND";

/// Largest chunk payload PNG allows.
const MAX_CHUNK_LEN: usize = i32::MAX as usize;

/// A chunk as a byte range (length field through CRC) into the file.
struct Chunk {
    kind: [u8; 4],
    start: usize,
    end: usize,
}

/// Splice an EXIF blob into PNG bytes.
pub(crate) fn insert(exif: &[u8], png: &[u8]) -> Result<Vec<u8>, MetadataError> {
    if exif.len() > MAX_CHUNK_LEN {
        return Err(MetadataError::TooLarge {
            size: exif.len(),
            limit: MAX_CHUNK_LEN,
        });
    }
    if !png.starts_with(&PNG_SIGNATURE) {
        return Err(MetadataError::Container("missing PNG signature".to_string()));
    }

    let chunks = read_chunks(png)?;

    let mut out = Vec::with_capacity(png.len() + exif.len() + 12);
    out.extend_from_slice(&PNG_SIGNATURE);

    let mut inserted = false;
    for chunk in &chunks {
        if &chunk.kind == EXIF_CHUNK {
            continue;
        }
        if !inserted && &chunk.kind == IDAT_CHUNK {
            write_chunk(&mut out, EXIF_CHUNK, exif);
            inserted = true;
        }
        out.extend_from_slice(&png[chunk.start..chunk.end]);
    }

    if !inserted {
        return Err(MetadataError::Container("PNG has no IDAT chunk".to_string()));
    }
    Ok(out)
}

/// Walk chunks from after the signature through `IEND`.
fn read_chunks(png: &[u8]) -> Result<Vec<Chunk>, MetadataError> {
    let mut chunks = Vec::new();
    let mut pos = PNG_SIGNATURE.len();

    while pos + 8 <= png.len() {
        let length = u32::from_be_bytes([png[pos], png[pos + 1], png[pos + 2], png[pos + 3]]) as usize;
        let kind = [png[pos + 4], png[pos + 5], png[pos + 6], png[pos + 7]];
        let end = pos
            .checked_add(12)
            .and_then(|p| p.checked_add(length))
            .filter(|&end| end <= png.len())
            .ok_or_else(|| {
                MetadataError::Container(format!(
                    "truncated PNG chunk {}",
                    String::from_utf8_lossy(&kind)
                ))
            })?;

        chunks.push(Chunk { kind, start: pos, end });
        pos = end;

        if &kind == IEND_CHUNK {
            break;
        }
    }

    Ok(chunks)
}

fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    let mut hasher = Hasher::new();
    hasher.update(kind);
    hasher.update(data);

    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
}
