//! HTTP request handlers for the Pumpify API.
//!
//! # Endpoints
//!
//! - `POST /api/process` - Recolor an uploaded image and return a PNG
//! - `OPTIONS /api/process` - CORS preflight
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::{MultipartError, ProcessError, TransformError};
use crate::multipart::{extract, parse_boundary};
use crate::transform::ImageTransformer;

/// Methods advertised by the preflight response.
pub const ALLOWED_METHODS: &str = "POST, OPTIONS";

/// Request headers advertised by the preflight response.
pub const ALLOWED_HEADERS: &str = "Content-Type";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the image transformer.
///
/// This is passed to all handlers via Axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    /// The transformer shared by all requests
    pub transformer: Arc<ImageTransformer>,

    /// Allowed CORS origins (None = any origin)
    pub cors_origins: Option<Vec<String>>,
}

impl AppState {
    /// Create a new application state allowing any CORS origin.
    pub fn new(transformer: ImageTransformer) -> Self {
        Self {
            transformer: Arc::new(transformer),
            cors_origins: None,
        }
    }

    /// Restrict preflight responses to the given origins.
    pub fn with_cors_origins(mut self, origins: Option<Vec<String>>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Value for `Access-Control-Allow-Origin`, or None if `origin` is not allowed.
    fn allowed_origin(&self, origin: Option<&HeaderValue>) -> Option<HeaderValue> {
        match &self.cors_origins {
            None => Some(HeaderValue::from_static("*")),
            Some(allowed) => origin
                .filter(|origin| {
                    origin
                        .to_str()
                        .map(|origin| allowed.iter().any(|a| a == origin))
                        .unwrap_or(false)
                })
                .cloned(),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error envelope returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert ProcessError to HTTP response.
///
/// Client errors (bad content type, no image, oversized body) are logged at WARN level,
/// server errors (decode/encode/worker failures) at ERROR level.
impl IntoResponse for ProcessError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ProcessError::Multipart(MultipartError::InvalidContentType { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid_content_type")
            }
            ProcessError::Multipart(MultipartError::MissingBoundary) => {
                (StatusCode::BAD_REQUEST, "missing_boundary")
            }
            ProcessError::Multipart(MultipartError::NoImagePart) => {
                (StatusCode::BAD_REQUEST, "no_image")
            }
            ProcessError::Multipart(MultipartError::MalformedPart) => {
                (StatusCode::BAD_REQUEST, "malformed_part")
            }
            ProcessError::Transform(TransformError::Decode { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "decode_error")
            }
            ProcessError::Transform(TransformError::Encode { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "encode_error")
            }
            ProcessError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            ProcessError::Body { .. } => (StatusCode::BAD_REQUEST, "body_error"),
            ProcessError::Worker { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "worker_error"),
        };

        let message = self.to_string();

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle image processing requests.
///
/// # Endpoint
///
/// `POST /api/process` with `Content-Type: multipart/form-data; boundary=...`
///
/// # Response
///
/// - `200 OK`: PNG image with `Content-Type: image/png`
/// - `400 Bad Request`: Not multipart, or no image part in the body
/// - `413 Payload Too Large`: Body exceeds the configured upload limit
/// - `500 Internal Server Error`: Image could not be decoded or encoded
pub async fn process_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ProcessError> {
    let body = body.map_err(body_error)?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let boundary = parse_boundary(content_type)?;
    let image = extract(&body, &boundary)?;

    debug!(
        body_bytes = body.len(),
        image_bytes = image.len(),
        "Processing upload"
    );

    // Decode/recolor/encode is CPU-bound
    let transformer = Arc::clone(&state.transformer);
    let png = tokio::task::spawn_blocking(move || transformer.transform(&image))
        .await
        .map_err(|e| ProcessError::Worker {
            message: e.to_string(),
        })??;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/png")),
            (header::CONTENT_LENGTH, HeaderValue::from(png.len())),
        ],
        png,
    )
        .into_response())
}

/// Map a body extraction failure into the JSON error path.
fn body_error(rejection: BytesRejection) -> ProcessError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ProcessError::PayloadTooLarge
    } else {
        ProcessError::Body {
            message: rejection.body_text(),
        }
    }
}

/// Handle CORS preflight requests.
///
/// # Endpoint
///
/// `OPTIONS /api/process`
///
/// # Response
///
/// `200 OK` with `Access-Control-Allow-Origin`, `Access-Control-Allow-Methods`
/// and `Access-Control-Allow-Headers`. When specific origins are configured
/// the request `Origin` is echoed only if it is one of them.
pub async fn preflight_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut response = StatusCode::OK.into_response();
    let response_headers = response.headers_mut();

    if let Some(origin) = state.allowed_origin(headers.get(header::ORIGIN)) {
        response_headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }
    response_headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    response_headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );

    response
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
