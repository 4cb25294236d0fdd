//! `data:` URL export.
//!
//! Padded images are handed to the page as self-contained base64 data URLs,
//! usable directly as an `<img src>` or a download link `href`.

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

/// Errors from parsing a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataUrlError {
    #[error("Not a data URL")]
    MissingScheme,

    #[error("Only base64 data URLs are supported")]
    NotBase64,

    #[error("Invalid base64 payload: {0}")]
    InvalidPayload(String),
}

/// Build a `data:<media_type>;base64,<payload>` URL.
pub fn to_data_url(media_type: &str, bytes: &[u8]) -> String {
    let encoded = general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", media_type, encoded)
}

/// Split a base64 data URL into its media type and decoded bytes.
pub fn parse_data_url(url: &str) -> Result<(String, Vec<u8>), DataUrlError> {
    let rest = url.strip_prefix("data:").ok_or(DataUrlError::MissingScheme)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUrlError::MissingScheme)?;
    let media_type = header.strip_suffix(";base64").ok_or(DataUrlError::NotBase64)?;

    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| DataUrlError::InvalidPayload(e.to_string()))?;

    Ok((media_type.to_string(), bytes))
}
