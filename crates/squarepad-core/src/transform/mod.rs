//! Geometric transforms applied to decoded images.
//!
//! The only transform is square padding: the source is centered on a
//! background-filled square whose side is the longest source edge. Nothing is
//! scaled, rotated, or cropped.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner of the surface
//! - Offsets are whole pixels

mod pad;

pub use pad::{pad_to_square, PadError, PadGeometry, MAX_SURFACE_BYTES};
