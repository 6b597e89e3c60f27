//! Router configuration for Pumpify.
//!
//! This module defines the HTTP routes and applies middleware for CORS,
//! request body limits and tracing.
//!
//! # Route Structure
//!
//! ```text
//! /health          - Health check
//! /api/process     - Image processing (POST) and CORS preflight (OPTIONS)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pumpify::server::routes::{create_router, RouterConfig};
//! use pumpify::transform::ImageTransformer;
//!
//! let transformer = ImageTransformer::new("pill.png");
//! let config = RouterConfig::new()
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(transformer, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use axum::extract::DefaultBodyLimit;
use axum::handler::Handler;
use axum::{
    routing::{get, post},
    Router,
};
use http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, preflight_handler, process_handler, AppState};
use crate::transform::ImageTransformer;

/// Path of the processing endpoint.
pub const PROCESS_PATH: &str = "/api/process";

/// Default maximum request body size (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Maximum accepted request body in bytes
    pub max_upload_bytes: usize,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Uploads are limited to 20 MiB
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Set the maximum request body size in bytes.
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - The processing endpoint and its preflight handler
/// - Health check
/// - Request body limit
/// - CORS headers on processing responses
/// - Request tracing (optional)
pub fn create_router(transformer: ImageTransformer, config: RouterConfig) -> Router {
    let app_state = AppState::new(transformer).with_cors_origins(config.cors_origins.clone());

    let cors = build_cors_layer(&config);

    // CorsLayer answers every OPTIONS itself, so it only wraps POST and the
    // preflight route keeps its own handler.
    let router = Router::new()
        .route(
            PROCESS_PATH,
            post(process_handler.layer(cors)).options(preflight_handler),
        )
        .route("/health", get(health_handler))
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes));

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
///
/// The layer only wraps POST, so it only contributes
/// `Access-Control-Allow-Origin`; preflights go to [`preflight_handler`].
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new();

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            let parsed_origins: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
