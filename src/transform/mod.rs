//! Image transformation pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │ image bytes
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            ImageTransformer             │
//! │  ┌─────────┐ ┌──────────┐ ┌──────────┐  │
//! │  │  codec  │ │ recolor  │ │ overlay  │  │
//! │  │ (decode │ │ (luma    │ │ (lazy    │  │
//! │  │  / PNG) │ │  duotone)│ │  asset)  │  │
//! │  └─────────┘ └──────────┘ └──────────┘  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`ImageTransformer`]: Main entry point, runs the full pipeline
//! - [`recolor()`]: Per-pixel luminance rule
//! - [`Overlay`]: Lazily loaded watermark asset and its placement
//! - [`decode_rgba`] / [`encode_png`]: Codec boundaries

mod codec;
mod overlay;
mod recolor;
mod transformer;

pub use codec::{decode_rgba, encode_png};
pub use overlay::{
    overlay_position, overlay_side, Overlay, DEFAULT_OVERLAY_PATH, OVERLAY_INSET, OVERLAY_RATIO,
};
pub use recolor::{
    clip, luminance, recolor, recolor_pixel, BLUE_WEIGHT, GREEN_WEIGHT, HIGHLIGHT_RB_SCALE,
    LUMA_THRESHOLD, RED_WEIGHT, SHADOW_G_OFFSET, SHADOW_G_SCALE, SHADOW_RB_SCALE,
};
pub use transformer::ImageTransformer;
