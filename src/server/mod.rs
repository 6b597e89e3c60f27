//! HTTP server layer for Pumpify.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │                    POST /api/process                            │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │        handlers          │  │          routes             │  │
//! │  │ (multipart → transform)  │  │ (CORS, body limit, tracing) │  │
//! │  └──────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, preflight_handler, process_handler, AppState, ErrorResponse, HealthResponse,
};
pub use routes::{create_router, RouterConfig, DEFAULT_MAX_UPLOAD_BYTES, PROCESS_PATH};
