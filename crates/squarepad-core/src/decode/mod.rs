//! Source images and decoding.
//!
//! This module provides:
//! - [`SourceImage`], the immutable user-supplied file
//! - Content-sniffing decode to a `DynamicImage`
//! - The EXIF [`Orientation`] enum used by metadata summaries
//!
//! All operations are synchronous. The host is responsible for reading the
//! file bytes; decoding only ever sees an in-memory buffer.

mod reader;
mod types;

pub use reader::{decode_image, sniff_format};
pub use types::{DecodeError, Orientation, SourceImage};
