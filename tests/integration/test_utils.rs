//! Test utilities for integration tests.
//!
//! Helpers for building multipart bodies, test images and routers.

use std::path::Path;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use tower::ServiceExt;

use pumpify::transform::encode_png;
use pumpify::{create_router, ImageTransformer, RouterConfig, PROCESS_PATH};

/// Boundary used by most tests.
pub const BOUNDARY: &str = "----PumpifyTestBoundary7MA4YWxkTrZu0gW";

// =============================================================================
// Image Builders
// =============================================================================

/// Create a solid RGBA PNG.
pub fn create_test_png(width: u32, height: u32, pixel: Rgba<u8>) -> Vec<u8> {
    encode_png(&RgbaImage::from_pixel(width, height, pixel))
        .unwrap()
        .to_vec()
}

/// Create an RGB JPEG with a gradient.
pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 64])
    });

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, 90);
    encoder.encode_image(&img).unwrap();
    buf
}

/// Write a solid overlay asset to `path`.
pub fn write_overlay(path: &Path, pixel: Rgba<u8>) {
    RgbaImage::from_pixel(16, 16, pixel).save(path).unwrap();
}

/// Check if data is a PNG (starts with the PNG signature).
pub fn is_valid_png(data: &[u8]) -> bool {
    data.starts_with(b"\x89PNG\r\n\x1a\n")
}

// =============================================================================
// Multipart Builders
// =============================================================================

/// Build a multipart body from `(headers, payload)` parts, closed with the
/// final delimiter.
pub fn multipart_body(boundary: &str, parts: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (headers, payload) in parts {
        body.extend_from_slice(format!("--{}\r\n{}\r\n\r\n", boundary, headers).as_bytes());
        body.extend_from_slice(payload);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    body
}

/// Build a browser-style upload with a text field followed by the image.
pub fn image_upload(image: &[u8], content_type: &str) -> Vec<u8> {
    let image_headers = format!(
        "Content-Disposition: form-data; name=\"image\"; filename=\"upload\"\r\nContent-Type: {}",
        content_type
    );
    multipart_body(
        BOUNDARY,
        &[
            ("Content-Disposition: form-data; name=\"caption\"", &b"hello"[..]),
            (image_headers.as_str(), image),
        ],
    )
}

/// `Content-Type` header value for [`BOUNDARY`].
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

// =============================================================================
// Router Helpers
// =============================================================================

/// Router without overlay and without tracing.
pub fn test_router() -> Router {
    router_with(ImageTransformer::without_overlay(), RouterConfig::new())
}

/// Router with a specific transformer and config, tracing disabled.
pub fn router_with(transformer: ImageTransformer, config: RouterConfig) -> Router {
    create_router(transformer, config.with_tracing(false))
}

/// POST `body` to the processing endpoint with the given content type.
pub async fn post_process(router: Router, content_type: Option<&str>, body: Vec<u8>) -> Response<Body> {
    let mut builder = Request::builder().method("POST").uri(PROCESS_PATH);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }

    router
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// Collect a response body.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
