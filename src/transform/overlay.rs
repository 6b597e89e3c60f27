//! Watermark overlay.
//!
//! The overlay is a fixed RGBA asset read from disk. It is decoded at most
//! once per [`Overlay`] and shared read-only across requests; each request
//! resizes it to a quarter of the target's shorter side and composites it
//! into the bottom-right corner with a fixed inset.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │                              │
//! │                              │
//! │                  ┌────────┐  │
//! │                  │ overlay│  │  side = floor(0.25 * min(w, h))
//! │                  └────────┘  │
//! │                           20 │
//! └──────────────────────────────┘
//! ```
//!
//! Compositing uses the overlay's own alpha as a mask for every channel,
//! alpha included: `out = (src * a + dst * (255 - a)) / 255`. On a
//! transparent target this leaves a partially transparent stamp rather than
//! an opaque one.
//!
//! Loading is lazy and retried until it succeeds, so an asset deployed after
//! startup is picked up by the next request. Concurrent first loads block on
//! a single decode.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use once_cell::sync::OnceCell;
use tracing::info;

use crate::error::OverlayError;

/// Default overlay asset location, relative to the working directory.
pub const DEFAULT_OVERLAY_PATH: &str = "pill.png";

/// Overlay side as a fraction of the target's shorter dimension.
pub const OVERLAY_RATIO: f64 = 0.25;

/// Distance in pixels between the overlay and the bottom/right edges.
pub const OVERLAY_INSET: i64 = 20;

/// Side length of the square overlay for a `width` x `height` target.
#[inline]
pub fn overlay_side(width: u32, height: u32) -> u32 {
    (f64::from(width.min(height)) * OVERLAY_RATIO) as u32
}

/// Top-left corner of the overlay. May be negative for small targets, in
/// which case the overlay is clipped.
#[inline]
pub fn overlay_position(width: u32, height: u32, side: u32) -> (i64, i64) {
    (
        i64::from(width) - i64::from(side) - OVERLAY_INSET,
        i64::from(height) - i64::from(side) - OVERLAY_INSET,
    )
}

/// Lazily loaded overlay asset.
pub struct Overlay {
    path: PathBuf,
    image: OnceCell<RgbaImage>,
}

impl Overlay {
    /// Create an overlay backed by the asset at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            image: OnceCell::new(),
        }
    }

    /// Create an overlay from an already decoded image.
    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            path: PathBuf::new(),
            image: OnceCell::with_value(image),
        }
    }

    /// Path of the backing asset.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the asset has been decoded.
    pub fn is_loaded(&self) -> bool {
        self.image.get().is_some()
    }

    /// The decoded asset, loading it on first use.
    pub fn image(&self) -> Result<&RgbaImage, OverlayError> {
        self.image.get_or_try_init(|| load_asset(&self.path))
    }

    /// Composite the overlay onto `target`.
    ///
    /// # Errors
    ///
    /// - [`OverlayError::NotFound`], [`OverlayError::Read`] or
    ///   [`OverlayError::Decode`] if the asset is unavailable
    /// - [`OverlayError::Degenerate`] if `target` is too small for a
    ///   non-empty overlay
    ///
    /// `target` is left untouched on error.
    pub fn apply(&self, target: &mut RgbaImage) -> Result<(), OverlayError> {
        let asset = self.image()?;

        let (width, height) = target.dimensions();
        let side = overlay_side(width, height);
        if side == 0 {
            return Err(OverlayError::Degenerate { width, height });
        }

        let resized = imageops::resize(asset, side, side, FilterType::Lanczos3);
        let (x, y) = overlay_position(width, height, side);
        paste_masked(target, &resized, x, y);

        Ok(())
    }
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("path", &self.path)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Paste `source` onto `target` at `(x, y)`, masked by the source alpha.
///
/// Pixels falling outside `target` are clipped.
fn paste_masked(target: &mut RgbaImage, source: &RgbaImage, x: i64, y: i64) {
    let (width, height) = target.dimensions();

    for (sx, sy, src) in source.enumerate_pixels() {
        let tx = x + i64::from(sx);
        let ty = y + i64::from(sy);
        if tx < 0 || ty < 0 || tx >= i64::from(width) || ty >= i64::from(height) {
            continue;
        }

        let dst = target.get_pixel_mut(tx as u32, ty as u32);
        *dst = blend(*src, *dst);
    }
}

/// Interpolate every channel of `dst` towards `src` by the source alpha.
#[inline]
fn blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let mask = u32::from(src[3]);
    Rgba(std::array::from_fn(|c| {
        let mixed = u32::from(src[c]) * mask + u32::from(dst[c]) * (255 - mask);
        // Rounded division; the result never exceeds 255
        ((mixed + 127) / 255) as u8
    }))
}

fn load_asset(path: &Path) -> Result<RgbaImage, OverlayError> {
    let data = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => OverlayError::NotFound {
            path: path.to_path_buf(),
        },
        _ => OverlayError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })?;

    let image = image::load_from_memory(&data)
        .map_err(|e| OverlayError::Decode {
            message: e.to_string(),
        })?
        .into_rgba8();

    info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Loaded overlay asset"
    );

    Ok(image)
}
