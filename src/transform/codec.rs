//! Raster decoding and PNG encoding.
//!
//! # Design Decisions
//!
//! - **Format sniffing**: The upload's own `Content-Type` is not trusted; the
//!   input format is guessed from its magic bytes.
//!
//! - **Always RGBA**: Every input is widened to 4 channels so the pixel
//!   pipeline has a single representation. Inputs without alpha get an opaque
//!   alpha plane.
//!
//! - **Deterministic output**: PNG encoding uses fixed encoder settings, so the
//!   same pixels always produce the same bytes.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageReader, RgbaImage};

use crate::error::TransformError;

/// Decode raster bytes of any supported format into an RGBA buffer.
///
/// # Errors
///
/// Returns [`TransformError::Decode`] if the format is unknown or the data is
/// corrupt.
pub fn decode_rgba(source: &[u8]) -> Result<RgbaImage, TransformError> {
    let reader = ImageReader::new(Cursor::new(source))
        .with_guessed_format()
        .map_err(|e| TransformError::Decode {
            message: e.to_string(),
        })?;

    let img = reader.decode().map_err(|e| TransformError::Decode {
        message: e.to_string(),
    })?;

    Ok(img.into_rgba8())
}

/// Encode an RGBA buffer as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Bytes, TransformError> {
    let mut output = Vec::new();

    PngEncoder::new(&mut output)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| TransformError::Encode {
            message: e.to_string(),
        })?;

    Ok(Bytes::from(output))
}

// =============================================================================
// Tests
// =============================================================================
