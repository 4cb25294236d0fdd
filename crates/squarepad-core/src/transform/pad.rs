//! Square padding (letterboxing) without scaling.
//!
//! The output side length is the source's longest edge. The source is placed
//! centered on both axes over a background fill, pixel for pixel:
//!
//! ```text
//! size = max(width, height)
//! x    = (size - width)  / 2     (floor)
//! y    = (size - height) / 2     (floor)
//! ```
//!
//! When the slack on an axis is odd, the extra background column or row ends
//! up on the right or bottom edge.

use image::{DynamicImage, RgbImage};
use thiserror::Error;

use crate::color::BackgroundColor;

/// Largest padded surface, in bytes of RGB pixel data (512 MiB, the same
/// budget the decoder allows a source).
pub const MAX_SURFACE_BYTES: u64 = 512 * 1024 * 1024;

/// Errors that can occur while padding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PadError {
    /// A long, thin source would need a square surface beyond the limit.
    #[error("Padded surface {size}x{size} exceeds the {limit}-byte limit")]
    SurfaceTooLarge { size: u32, limit: u64 },
}

/// Placement of a source image on its square surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadGeometry {
    /// Side length of the square surface.
    pub size: u32,
    /// Left edge of the placed source.
    pub x: u32,
    /// Top edge of the placed source.
    pub y: u32,
    /// Source width.
    pub width: u32,
    /// Source height.
    pub height: u32,
}

impl PadGeometry {
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        let size = width.max(height);
        Self {
            size,
            x: (size - width) / 2,
            y: (size - height) / 2,
            width,
            height,
        }
    }

    /// Whether a surface coordinate falls on the placed source.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Bytes of RGB data the square surface needs, or `None` on overflow.
    pub fn surface_bytes(&self) -> Option<u64> {
        let side = u64::from(self.size);
        side.checked_mul(side)?.checked_mul(3)
    }

    /// True when the source is already square and no padding is added.
    pub fn is_identity(&self) -> bool {
        self.width == self.height
    }
}

/// Pad an image to a square surface filled with `color`.
///
/// Source alpha is composited over the background (source-over), so the
/// result is always opaque RGB.
///
/// # Errors
///
/// Returns [`PadError::SurfaceTooLarge`] when the surface would exceed
/// [`MAX_SURFACE_BYTES`].
pub fn pad_to_square(image: &DynamicImage, color: BackgroundColor) -> Result<RgbImage, PadError> {
    let geometry = PadGeometry::for_dimensions(image.width(), image.height());
    match geometry.surface_bytes() {
        Some(bytes) if bytes <= MAX_SURFACE_BYTES => {}
        _ => {
            return Err(PadError::SurfaceTooLarge {
                size: geometry.size,
                limit: MAX_SURFACE_BYTES,
            })
        }
    }
    let background = color.channels();

    let mut surface = RgbImage::from_pixel(geometry.size, geometry.size, color.to_rgb());

    let source = image.to_rgba8();
    for (x, y, pixel) in source.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let target = surface.get_pixel_mut(geometry.x + x, geometry.y + y);
        target.0 = composite_over([r, g, b], a, background);
    }

    Ok(surface)
}

/// Source-over blend of one pixel onto an opaque background.
#[inline]
fn composite_over(src: [u8; 3], alpha: u8, dst: [u8; 3]) -> [u8; 3] {
    match alpha {
        255 => src,
        0 => dst,
        a => {
            let a = a as u32;
            let inv = 255 - a;
            let blend = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
            [blend(src[0], dst[0]), blend(src[1], dst[1]), blend(src[2], dst[2])]
        }
    }
}
