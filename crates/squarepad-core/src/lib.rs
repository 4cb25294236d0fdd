//! SquarePad Core - square padding with EXIF preservation
//!
//! This crate turns arbitrary images into squares: each source is centered,
//! unscaled, on a background-colored canvas whose side is its longest edge,
//! re-encoded in its original format, and given back its original EXIF.
//!
//! # Module Structure
//!
//! - `color` - Background color parsing
//! - `decode` - Source images and content-sniffing decode
//! - `transform` - Square padding geometry and compositing
//! - `encode` - JPEG, PNG, and WebP encoding
//! - `metadata` - EXIF load, dump, and container splicing
//! - `pipeline` - One image from bytes to a downloadable artifact
//! - `unit` - Per-image state machine and cancellable tasks
//! - `selection` - The selection controller shared by all images
//! - `data_url` - `data:` URL export

pub mod color;
pub mod data_url;
pub mod decode;
pub mod encode;
pub mod metadata;
pub mod options;
pub mod pipeline;
pub mod selection;
pub mod transform;
pub mod unit;

#[cfg(test)]
mod test_helpers;

pub use color::{BackgroundColor, ColorError};
pub use decode::SourceImage;
pub use encode::OutputFormat;
pub use metadata::MetadataError;
pub use options::PadOptions;
pub use pipeline::{transform, MetadataStatus, OutputArtifact, TransformError};
pub use selection::SelectionController;
pub use transform::{pad_to_square, PadError, PadGeometry};
pub use unit::{ProcessingState, TaskKey, TaskResult, TransformTask, TransformUnit};
