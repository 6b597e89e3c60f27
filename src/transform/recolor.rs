//! Luminance-driven green/white duotone.
//!
//! Every pixel is mapped through a two-branch rule keyed on its NTSC luma:
//!
//! | Branch          | Red          | Green            | Blue         |
//! |-----------------|--------------|------------------|--------------|
//! | `L > 180`       | `L * 0.95`   | `L`              | `L * 0.95`   |
//! | otherwise       | `L * 0.5`    | `L * 0.9 + 80`   | `L * 0.5`    |
//!
//! All arithmetic is done in `f64` and each channel is clamped to `[0, 255]`
//! and truncated toward zero only at the end. Alpha is copied unchanged.

use image::{Rgba, RgbaImage};

// =============================================================================
// Constants
// =============================================================================

/// Red weight of the NTSC luma formula.
pub const RED_WEIGHT: f64 = 0.299;

/// Green weight of the NTSC luma formula.
pub const GREEN_WEIGHT: f64 = 0.587;

/// Blue weight of the NTSC luma formula.
pub const BLUE_WEIGHT: f64 = 0.114;

/// Pixels with luminance strictly above this take the highlight branch.
pub const LUMA_THRESHOLD: f64 = 180.0;

/// Red/blue scale in the highlight branch.
pub const HIGHLIGHT_RB_SCALE: f64 = 0.95;

/// Red/blue scale in the shadow branch.
pub const SHADOW_RB_SCALE: f64 = 0.5;

/// Green scale in the shadow branch.
pub const SHADOW_G_SCALE: f64 = 0.9;

/// Green offset in the shadow branch.
pub const SHADOW_G_OFFSET: f64 = 80.0;

// =============================================================================
// Pixel Math
// =============================================================================

/// NTSC luma of an RGB triple.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    RED_WEIGHT * f64::from(r) + GREEN_WEIGHT * f64::from(g) + BLUE_WEIGHT * f64::from(b)
}

/// Clamp to `[0, 255]` and truncate toward zero.
#[inline]
pub fn clip(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Recolor a single pixel.
#[inline]
pub fn recolor_pixel(pixel: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    let lum = luminance(r, g, b);

    if lum > LUMA_THRESHOLD {
        let rb = clip(lum * HIGHLIGHT_RB_SCALE);
        Rgba([rb, clip(lum), rb, a])
    } else {
        let rb = clip(lum * SHADOW_RB_SCALE);
        Rgba([rb, clip(lum * SHADOW_G_SCALE + SHADOW_G_OFFSET), rb, a])
    }
}

/// Recolor every pixel of `image` in place.
pub fn recolor(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        *pixel = recolor_pixel(*pixel);
    }
}
