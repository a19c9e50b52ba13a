//! Normalization: decode any supported source encoding, flatten alpha, and
//! re-encode to the canonical PNG output.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};

use crate::error::NormalizeError;

use super::pdf::{EmbeddedImage, SourceEncoding};

/// Decode an embedded image and re-encode it as PNG.
///
/// Alpha is discarded outright by converting to RGB8 rather than being
/// composited against a background.
pub fn normalize_to_png(image: &EmbeddedImage) -> Result<Vec<u8>, NormalizeError> {
    let decoded = decode(image)?;

    let flattened = if decoded.color().has_alpha() {
        DynamicImage::ImageRgb8(decoded.to_rgb8())
    } else {
        decoded
    };

    let mut buffer = Cursor::new(Vec::new());
    flattened
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(NormalizeError::Encode)?;
    Ok(buffer.into_inner())
}

fn decode(image: &EmbeddedImage) -> Result<DynamicImage, NormalizeError> {
    match image.encoding() {
        SourceEncoding::Encoded => Ok(image::load_from_memory(image.data())?),
        SourceEncoding::RawRgb { width, height } => {
            RgbImage::from_raw(*width, *height, image.data().to_vec())
                .map(DynamicImage::ImageRgb8)
                .ok_or(NormalizeError::MalformedRaster)
        }
        SourceEncoding::RawGray { width, height } => {
            GrayImage::from_raw(*width, *height, image.data().to_vec())
                .map(DynamicImage::ImageLuma8)
                .ok_or(NormalizeError::MalformedRaster)
        }
        SourceEncoding::Unsupported(encoding) => {
            Err(NormalizeError::UnsupportedEncoding(encoding.clone()))
        }
    }
}
