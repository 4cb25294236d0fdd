//! WASM-compatible wrapper types.
//!
//! This module provides JavaScript-friendly types that wrap the core SquarePad
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use squarepad_core::{MetadataStatus, OutputArtifact, SourceImage};
use wasm_bindgen::prelude::*;

/// Convert any displayable error into a JavaScript `Error`.
pub(crate) fn js_error(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// A selected image file for JavaScript.
///
/// Build one per `File` from the picker, after reading its bytes:
///
/// ```typescript
/// const bytes = new Uint8Array(await file.arrayBuffer());
/// const source = new JsSourceImage(file.name, file.type, bytes);
/// ```
#[wasm_bindgen]
#[derive(Clone)]
pub struct JsSourceImage {
    inner: SourceImage,
}

#[wasm_bindgen]
impl JsSourceImage {
    /// Create a source image from a file name, declared media type, and bytes.
    #[wasm_bindgen(constructor)]
    pub fn new(name: String, media_type: String, bytes: Vec<u8>) -> JsSourceImage {
        JsSourceImage {
            inner: SourceImage::new(name, media_type, bytes),
        }
    }

    /// File name (also the identity within a selection)
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.inner.name().to_string()
    }

    /// Declared media type, e.g. "image/jpeg"
    #[wasm_bindgen(getter)]
    pub fn media_type(&self) -> String {
        self.inner.media_type().to_string()
    }

    /// Number of bytes in the file
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_size()
    }
}

impl JsSourceImage {
    pub(crate) fn into_inner(self) -> SourceImage {
        self.inner
    }
}

/// A padded image ready for download.
///
/// Use `data_url` as both the `href` of a download link and the `src` of its
/// preview, and `file_name` as the link's `download` attribute.
#[wasm_bindgen]
#[derive(Clone)]
pub struct JsArtifact {
    inner: OutputArtifact,
}

#[wasm_bindgen]
impl JsArtifact {
    /// Download name (same as the source file name)
    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.inner.file_name.clone()
    }

    /// Output media type, e.g. "image/png"
    #[wasm_bindgen(getter)]
    pub fn media_type(&self) -> String {
        self.inner.media_type().to_string()
    }

    /// Side length of the square output in pixels
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> u32 {
        self.inner.size
    }

    /// Number of encoded bytes
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.bytes.len()
    }

    /// Returns the encoded bytes as Uint8Array.
    ///
    /// Note: This creates a copy of the data.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    /// `data:` URL of the encoded image
    #[wasm_bindgen(getter)]
    pub fn data_url(&self) -> String {
        self.inner.data_url()
    }

    /// Whether source EXIF was carried into the output
    #[wasm_bindgen(getter)]
    pub fn metadata_preserved(&self) -> bool {
        self.inner.metadata == MetadataStatus::Preserved
    }

    /// Warning text when EXIF could not be read or written
    #[wasm_bindgen(getter)]
    pub fn metadata_warning(&self) -> Option<String> {
        self.inner.metadata.warning().map(|err| err.to_string())
    }
}

impl JsArtifact {
    pub(crate) fn from_artifact(inner: OutputArtifact) -> Self {
        Self { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squarepad_core::{MetadataError, OutputFormat};

    fn artifact(metadata: MetadataStatus) -> JsArtifact {
        JsArtifact::from_artifact(OutputArtifact {
            file_name: "cat.jpg".to_string(),
            format: OutputFormat::Jpeg,
            bytes: vec![1, 2, 3],
            size: 640,
            metadata,
        })
    }

    #[test]
    fn test_js_source_image_accessors() {
        let source = JsSourceImage::new("cat.jpg".into(), "image/jpeg".into(), vec![0u8; 10]);
        assert_eq!(source.name(), "cat.jpg");
        assert_eq!(source.media_type(), "image/jpeg");
        assert_eq!(source.byte_length(), 10);
        assert_eq!(source.into_inner().bytes(), &[0u8; 10]);
    }

    #[test]
    fn test_js_artifact_accessors() {
        let artifact = artifact(MetadataStatus::Preserved);
        assert_eq!(artifact.file_name(), "cat.jpg");
        assert_eq!(artifact.media_type(), "image/jpeg");
        assert_eq!(artifact.size(), 640);
        assert_eq!(artifact.byte_length(), 3);
        assert_eq!(artifact.bytes(), vec![1, 2, 3]);
        assert_eq!(artifact.data_url(), "data:image/jpeg;base64,AQID");
        assert!(artifact.metadata_preserved());
        assert_eq!(artifact.metadata_warning(), None);
    }

    #[test]
    fn test_js_artifact_metadata_warning() {
        let artifact = artifact(MetadataStatus::Failed(MetadataError::Read("bad".into())));
        assert!(!artifact.metadata_preserved());
        assert_eq!(
            artifact.metadata_warning().as_deref(),
            Some("Failed to read EXIF: bad")
        );
    }
}
