//! Image transformer orchestrating the full pipeline.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ImageTransformer                        │
//! │                                                             │
//! │   raw bytes ──▶ decode_rgba ──▶ recolor ──▶ overlay ──▶ PNG │
//! │                     │                         │             │
//! │                 Decode error            skipped on any      │
//! │                 (fatal)                 OverlayError        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use bytes::Bytes;
use image::RgbaImage;
use tracing::{debug, warn};

use crate::error::{OverlayError, TransformError};

use super::codec::{decode_rgba, encode_png};
use super::overlay::Overlay;
use super::recolor::recolor;

/// Turns uploaded image bytes into a recolored, watermarked PNG.
///
/// The transformer is immutable apart from the lazily loaded overlay and is
/// meant to be shared behind an `Arc` by all request handlers.
///
/// # Example
///
/// ```
/// use image::{Rgba, RgbaImage};
/// use pumpify::transform::{decode_rgba, encode_png, ImageTransformer};
///
/// let input = encode_png(&RgbaImage::from_pixel(4, 4, Rgba([200, 200, 200, 255]))).unwrap();
///
/// let transformer = ImageTransformer::without_overlay();
/// let output = transformer.transform(&input).unwrap();
///
/// let pixels = decode_rgba(&output).unwrap();
/// assert_eq!(*pixels.get_pixel(0, 0), Rgba([190, 200, 190, 255]));
/// ```
#[derive(Debug)]
pub struct ImageTransformer {
    overlay: Option<Overlay>,
}

impl ImageTransformer {
    /// Create a transformer that stamps the overlay asset at `overlay_path`.
    pub fn new(overlay_path: impl Into<PathBuf>) -> Self {
        Self {
            overlay: Some(Overlay::new(overlay_path)),
        }
    }

    /// Create a transformer with a preloaded overlay.
    pub fn with_overlay(overlay: Overlay) -> Self {
        Self {
            overlay: Some(overlay),
        }
    }

    /// Create a transformer that only recolors.
    pub fn without_overlay() -> Self {
        Self { overlay: None }
    }

    /// The configured overlay, if any.
    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// Decode, recolor, overlay and re-encode as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Decode`] if `source` is not a decodable
    /// raster image, or [`TransformError::Encode`] if PNG encoding fails.
    /// Overlay problems never fail the call.
    pub fn transform(&self, source: &[u8]) -> Result<Bytes, TransformError> {
        let mut image = decode_rgba(source)?;
        let (width, height) = image.dimensions();

        self.apply(&mut image);

        let output = encode_png(&image)?;
        debug!(
            width,
            height,
            input_bytes = source.len(),
            output_bytes = output.len(),
            "Transformed image"
        );

        Ok(output)
    }

    /// Recolor `image` in place and composite the overlay if available.
    pub fn apply(&self, image: &mut RgbaImage) {
        recolor(image);

        let Some(overlay) = &self.overlay else {
            return;
        };

        match overlay.apply(image) {
            Ok(()) => {}
            // Expected when no asset is deployed or the image is tiny
            Err(err @ (OverlayError::NotFound { .. } | OverlayError::Degenerate { .. })) => {
                debug!("Skipping overlay: {}", err);
            }
            Err(err @ (OverlayError::Read { .. } | OverlayError::Decode { .. })) => {
                warn!("Skipping overlay: {}", err);
            }
        }
    }
}
