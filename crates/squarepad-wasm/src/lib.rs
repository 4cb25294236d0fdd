//! SquarePad WASM - WebAssembly bindings for SquarePad
//!
//! This crate provides WASM bindings to expose the squarepad-core functionality
//! to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for source files and artifacts
//! - `selection` - The selection controller and its cancellable tasks
//! - `pad` - One-shot padding and color parsing
//! - `logger` - Routes `log` records to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsSelection, JsSourceImage } from '@squarepad/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const selection = new JsSelection();
//! selection.select_files([new JsSourceImage(file.name, file.type, bytes)]);
//! selection.set_color('#000000');
//! selection.process_all();
//! ```

use wasm_bindgen::prelude::*;

mod logger;
mod pad;
mod selection;
mod types;

// Re-export public types
pub use logger::set_log_level;
pub use pad::{pad_image, parse_color, to_data_url};
pub use selection::{JsSelection, JsTaskResult, JsTransformTask, JsUnitView};
pub use types::{JsArtifact, JsSourceImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(log::LevelFilter::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
