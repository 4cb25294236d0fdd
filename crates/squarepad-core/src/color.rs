//! Background color parsing.
//!
//! The background is always opaque RGB. Colors are accepted in CSS hex
//! notation, which is what an `<input type="color">` produces:
//!
//! - `#rrggbb` (e.g. `#ff8800`)
//! - `#rgb` shorthand (e.g. `#f80`, expanded to `#ff8800`)
//!
//! Parsing is case-insensitive. Display always uses lowercase `#rrggbb`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing a background color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The value does not start with `#`.
    #[error("Color must start with '#': {0:?}")]
    MissingHash(String),

    /// The value has a digit count other than 3 or 6.
    #[error("Color must have 3 or 6 hex digits, got {0}")]
    InvalidLength(usize),

    /// The value contains a non-hex character.
    #[error("Invalid hex digit in color: {0:?}")]
    InvalidDigit(String),
}

/// A single opaque fill color shared by every image in a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BackgroundColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl BackgroundColor {
    pub const WHITE: BackgroundColor = BackgroundColor::new(255, 255, 255);
    pub const BLACK: BackgroundColor = BackgroundColor::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// RGB channel values in order.
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Convert to an `image` crate pixel.
    pub fn to_rgb(self) -> image::Rgb<u8> {
        image::Rgb(self.channels())
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for BackgroundColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(trimmed.to_string()))?;

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit(trimmed.to_string()));
        }

        // All digits are ASCII at this point, so byte slicing is safe.
        let channel = |hex: &str| {
            u8::from_str_radix(hex, 16).map_err(|_| ColorError::InvalidDigit(trimmed.to_string()))
        };

        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            n => Err(ColorError::InvalidLength(n)),
        }
    }
}

impl TryFrom<String> for BackgroundColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BackgroundColor> for String {
    fn from(color: BackgroundColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
