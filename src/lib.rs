//! # Pumpify
//!
//! An HTTP service that turns uploaded images into a green/white duotone and
//! stamps a watermark overlay in the bottom-right corner.
//!
//! ## Features
//!
//! - **Dependency-free multipart parsing**: A small state machine pulls the
//!   first image part out of a `multipart/form-data` body
//! - **Deterministic recoloring**: A luminance-keyed two-branch rule with
//!   fixed constants, computed in `f64` and truncated per channel
//! - **Fault-tolerant overlay**: The watermark asset is loaded once and
//!   skipped whenever it is missing or cannot be applied
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`multipart`] - Boundary parsing and image part extraction
//! - [`transform`] - Decode, recolor, overlay, PNG encode
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error types for each layer
//!
//! ## Example
//!
//! ```rust,no_run
//! use pumpify::{create_router, ImageTransformer, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let transformer = ImageTransformer::new("pill.png");
//!     let router = create_router(transformer, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod multipart;
pub mod server;
pub mod transform;

// Re-export commonly used types
pub use config::Config;
pub use error::{MultipartError, OverlayError, ProcessError, TransformError};
pub use multipart::{extract, parse_boundary, MultipartParser, Part};
pub use server::{
    create_router, health_handler, preflight_handler, process_handler, AppState, ErrorResponse,
    HealthResponse, RouterConfig, PROCESS_PATH,
};
pub use transform::{ImageTransformer, Overlay};
