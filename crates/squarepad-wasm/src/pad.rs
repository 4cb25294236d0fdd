//! One-shot padding WASM bindings.
//!
//! For pages that manage their own list of files and only need the pipeline.
//!
//! # Example
//!
//! ```typescript
//! import { pad_image, parse_color } from '@squarepad/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const artifact = pad_image(file.name, file.type, bytes, parse_color(picker.value));
//! img.src = artifact.data_url;
//! ```

use crate::types::{js_error, JsArtifact};
use squarepad_core::{transform, BackgroundColor, PadOptions, SourceImage};
use wasm_bindgen::prelude::*;

/// Pad one image to a square on a background color.
///
/// # Arguments
///
/// * `name` - File name, reused as the download name
/// * `media_type` - Declared media type; picks the output format
/// * `bytes` - Encoded image bytes
/// * `color` - Background color, "#rgb" or "#rrggbb"
///
/// # Errors
///
/// Returns an error if the color is invalid, the file is empty, or the bytes
/// cannot be decoded or re-encoded. Metadata problems are not errors; see
/// `JsArtifact.metadata_warning`.
#[wasm_bindgen]
pub fn pad_image(
    name: String,
    media_type: String,
    bytes: Vec<u8>,
    color: &str,
) -> Result<JsArtifact, JsValue> {
    let color: BackgroundColor = color.parse().map_err(js_error)?;
    let source = SourceImage::new(name, media_type, bytes);
    transform(&source, color, &PadOptions::default())
        .map(JsArtifact::from_artifact)
        .map_err(js_error)
}

/// Normalize a color string to "#rrggbb".
///
/// Throws for anything other than "#rgb" or "#rrggbb".
#[wasm_bindgen]
pub fn parse_color(color: &str) -> Result<String, JsValue> {
    color
        .parse::<BackgroundColor>()
        .map(|color| color.to_string())
        .map_err(js_error)
}

/// Encode bytes as a base64 `data:` URL.
#[wasm_bindgen]
pub fn to_data_url(media_type: &str, bytes: &[u8]) -> String {
    squarepad_core::data_url::to_data_url(media_type, bytes)
}
