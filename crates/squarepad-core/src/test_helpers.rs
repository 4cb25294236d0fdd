//! Shared fixtures for unit tests.

use std::io::Cursor;

use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};
use image::{Rgb, RgbImage};

use crate::encode::{encode_jpeg, encode_png as encode_png_pixels, OutputFormat};
use crate::metadata;

/// An RGB image where every pixel is distinct enough to catch misplacement.
pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    })
}

pub fn encode_png(image: &RgbImage) -> Vec<u8> {
    encode_png_pixels(image.as_raw(), image.width(), image.height()).unwrap()
}

/// A small EXIF blob: Make, Model, Orientation (rotate 90 CW), and an
/// Exif-IFD DateTimeOriginal.
pub fn sample_exif(little_endian: bool) -> Vec<u8> {
    let make = Field {
        tag: Tag::Make,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![b"Acme".to_vec()]),
    };
    let model = Field {
        tag: Tag::Model,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![b"Pinhole 3000".to_vec()]),
    };
    let orientation = Field {
        tag: Tag::Orientation,
        ifd_num: In::PRIMARY,
        value: Value::Short(vec![6]),
    };
    let taken = Field {
        tag: Tag::DateTimeOriginal,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![b"2024:05:01 12:30:00".to_vec()]),
    };

    let mut writer = Writer::new();
    writer.push_field(&make);
    writer.push_field(&model);
    writer.push_field(&orientation);
    writer.push_field(&taken);

    let mut buffer = Cursor::new(Vec::new());
    writer.write(&mut buffer, little_endian).unwrap();
    buffer.into_inner()
}

/// EXIF with a GPS-IFD latitude reference and an IFD1 JPEG thumbnail.
pub fn exif_with_thumbnail(thumbnail: &[u8]) -> Vec<u8> {
    let make = Field {
        tag: Tag::Make,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![b"Acme".to_vec()]),
    };
    let latitude_ref = Field {
        tag: Tag::GPSLatitudeRef,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![b"N".to_vec()]),
    };

    let mut writer = Writer::new();
    writer.push_field(&make);
    writer.push_field(&latitude_ref);
    writer.set_jpeg(thumbnail, In::THUMBNAIL);

    let mut buffer = Cursor::new(Vec::new());
    writer.write(&mut buffer, true).unwrap();
    buffer.into_inner()
}

/// A small JPEG suitable for embedding as a thumbnail.
pub fn thumbnail_jpeg() -> Vec<u8> {
    encode_jpeg(gradient_rgb(8, 8).as_raw(), 8, 8, 80).unwrap()
}

/// A JPEG of the given size carrying [`sample_exif`].
pub fn jpeg_with_exif(width: u32, height: u32) -> Vec<u8> {
    let image = gradient_rgb(width, height);
    let jpeg = encode_jpeg(image.as_raw(), width, height, 90).unwrap();
    metadata::insert(&sample_exif(true), &jpeg, OutputFormat::Jpeg).unwrap()
}

/// A PNG of the given image carrying [`sample_exif`].
pub fn png_with_exif(image: &RgbImage) -> Vec<u8> {
    metadata::insert(&sample_exif(false), &encode_png(image), OutputFormat::Png).unwrap()
}
