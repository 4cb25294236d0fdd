//! EXIF splicing for WebP.
//!
//! Metadata chunks are only allowed in the extended container, which starts
//! with a `VP8X` header chunk carrying feature flags and the canvas size.
//! Simple `VP8 ` / `VP8L` files are upgraded by synthesizing that header from
//! the bitstream dimensions.

use super::MetadataError;

const VP8X: &[u8; 4] = b"VP8X";
const VP8L: &[u8; 4] = b"VP8L";
const VP8: &[u8; 4] = b"VP8 ";
const EXIF: &[u8; 4] = b"EXIF";
const XMP: &[u8; 4] = b"XMP ";

const FLAG_ALPHA: u8 = 0x10;
const FLAG_EXIF: u8 = 0x08;

/// Largest payload a RIFF chunk size can describe.
const MAX_CHUNK_LEN: usize = u32::MAX as usize - 8;

/// A chunk as a byte range (header through padding) into the file.
struct Chunk {
    fourcc: [u8; 4],
    start: usize,
    end: usize,
}

impl Chunk {
    fn payload<'a>(&self, webp: &'a [u8]) -> &'a [u8] {
        let size = u32::from_le_bytes([
            webp[self.start + 4],
            webp[self.start + 5],
            webp[self.start + 6],
            webp[self.start + 7],
        ]) as usize;
        &webp[self.start + 8..self.start + 8 + size]
    }
}

/// Splice an EXIF blob into WebP bytes.
pub(crate) fn insert(exif: &[u8], webp: &[u8]) -> Result<Vec<u8>, MetadataError> {
    if exif.len() > MAX_CHUNK_LEN {
        return Err(MetadataError::TooLarge {
            size: exif.len(),
            limit: MAX_CHUNK_LEN,
        });
    }
    if webp.len() < 12 || &webp[0..4] != b"RIFF" || &webp[8..12] != b"WEBP" {
        return Err(MetadataError::Container("missing RIFF/WEBP header".to_string()));
    }

    let chunks = read_chunks(webp)?;
    let first = chunks
        .first()
        .ok_or_else(|| MetadataError::Container("WebP has no chunks".to_string()))?;

    let header = if &first.fourcc == VP8X {
        let mut payload = first.payload(webp).to_vec();
        if payload.len() < 10 {
            return Err(MetadataError::Container("short VP8X chunk".to_string()));
        }
        payload[0] |= FLAG_EXIF;
        payload
    } else {
        let (width, height, alpha) = bitstream_info(&first.fourcc, first.payload(webp))?;
        vp8x_payload(width, height, alpha)
    };

    let mut body = Vec::with_capacity(webp.len() + exif.len() + 32);
    body.extend_from_slice(b"WEBP");
    write_chunk(&mut body, VP8X, &header);

    let mut inserted = false;
    for chunk in &chunks {
        if &chunk.fourcc == VP8X || &chunk.fourcc == EXIF {
            continue;
        }
        if !inserted && &chunk.fourcc == XMP {
            write_chunk(&mut body, EXIF, exif);
            inserted = true;
        }
        body.extend_from_slice(&webp[chunk.start..chunk.end]);
    }
    if !inserted {
        write_chunk(&mut body, EXIF, exif);
    }

    let riff_size = u32::try_from(body.len()).map_err(|_| MetadataError::TooLarge {
        size: exif.len(),
        limit: MAX_CHUNK_LEN,
    })?;

    let mut out = Vec::with_capacity(body.len() + 8);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&riff_size.to_le_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}

fn read_chunks(webp: &[u8]) -> Result<Vec<Chunk>, MetadataError> {
    let mut chunks = Vec::new();
    let mut pos = 12;

    while pos + 8 <= webp.len() {
        let fourcc = [webp[pos], webp[pos + 1], webp[pos + 2], webp[pos + 3]];
        let size = u32::from_le_bytes([webp[pos + 4], webp[pos + 5], webp[pos + 6], webp[pos + 7]]) as usize;
        let data_end = pos
            .checked_add(8)
            .and_then(|p| p.checked_add(size))
            .filter(|&end| end <= webp.len())
            .ok_or_else(|| {
                MetadataError::Container(format!(
                    "truncated WebP chunk {}",
                    String::from_utf8_lossy(&fourcc)
                ))
            })?;
        // Odd-sized payloads are followed by one padding byte
        let end = (data_end + (size & 1)).min(webp.len());
        chunks.push(Chunk { fourcc, start: pos, end });
        pos = end;
    }

    Ok(chunks)
}

/// Canvas width, height, and alpha usage from a simple-format bitstream.
fn bitstream_info(fourcc: &[u8; 4], data: &[u8]) -> Result<(u32, u32, bool), MetadataError> {
    if fourcc == VP8L {
        // 0x2F signature, then 14 bits width-1, 14 bits height-1, 1 bit alpha
        if data.len() < 5 || data[0] != 0x2F {
            return Err(MetadataError::Container("invalid VP8L header".to_string()));
        }
        let bits = u32::from_le_bytes([data[1], data[2], data[3], data[4]]);
        let width = (bits & 0x3FFF) + 1;
        let height = ((bits >> 14) & 0x3FFF) + 1;
        let alpha = (bits >> 28) & 1 == 1;
        Ok((width, height, alpha))
    } else if fourcc == VP8 {
        // 3-byte frame tag, 3-byte start code, then 14-bit width and height
        if data.len() < 10 || data[3..6] != [0x9D, 0x01, 0x2A] {
            return Err(MetadataError::Container("invalid VP8 header".to_string()));
        }
        let width = u16::from_le_bytes([data[6], data[7]]) as u32 & 0x3FFF;
        let height = u16::from_le_bytes([data[8], data[9]]) as u32 & 0x3FFF;
        if width == 0 || height == 0 {
            return Err(MetadataError::Container(format!(
                "VP8 frame has zero dimension {}x{}",
                width, height
            )));
        }
        Ok((width, height, false))
    } else {
        Err(MetadataError::Container(format!(
            "unexpected first WebP chunk {}",
            String::from_utf8_lossy(fourcc)
        )))
    }
}

fn vp8x_payload(width: u32, height: u32, alpha: bool) -> Vec<u8> {
    let mut payload = vec![0u8; 10];
    payload[0] = FLAG_EXIF | if alpha { FLAG_ALPHA } else { 0 };
    payload[4..7].copy_from_slice(&(width - 1).to_le_bytes()[0..3]);
    payload[7..10].copy_from_slice(&(height - 1).to_le_bytes()[0..3]);
    payload
}

fn write_chunk(out: &mut Vec<u8>, fourcc: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(fourcc);
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    if data.len() % 2 == 1 {
        out.push(0);
    }
}
