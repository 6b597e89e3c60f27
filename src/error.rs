use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating the image inside a multipart request body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultipartError {
    /// Request `Content-Type` is not `multipart/form-data`
    #[error("Invalid content type")]
    InvalidContentType { content_type: String },

    /// `Content-Type` is multipart but carries no usable `boundary=` parameter
    #[error("Missing multipart boundary")]
    MissingBoundary,

    /// No part declared an image content type, or its payload was empty
    #[error("No image found in request")]
    NoImagePart,

    /// An image part was found but had no blank line between headers and payload
    #[error("No image found in request")]
    MalformedPart,
}

/// Errors from decoding, recoloring and encoding an uploaded image
#[derive(Debug, Clone, Error)]
pub enum TransformError {
    /// Payload bytes are not a decodable raster image
    #[error("Failed to decode image: {message}")]
    Decode { message: String },

    /// PNG encoding of the result failed
    #[error("Failed to encode image: {message}")]
    Encode { message: String },
}

/// Recoverable failures while applying the watermark overlay.
///
/// These never reach the client; the transformer logs them and returns the
/// image without the overlay.
#[derive(Debug, Clone, Error)]
pub enum OverlayError {
    /// Overlay asset does not exist on disk
    #[error("Overlay asset not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Overlay asset exists but could not be read
    #[error("Failed to read overlay asset {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    /// Overlay asset is not a decodable image
    #[error("Failed to decode overlay asset: {message}")]
    Decode { message: String },

    /// Target image is too small for a non-empty overlay
    #[error("Image {width}x{height} is too small for an overlay")]
    Degenerate { width: u32, height: u32 },
}

/// Request-level error for the processing endpoint
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Request body exceeds the configured upload limit
    #[error("Request body too large")]
    PayloadTooLarge,

    /// Request body could not be read
    #[error("Failed to read request body: {message}")]
    Body { message: String },

    /// The blocking worker running the transform panicked or was cancelled
    #[error("Image worker failed: {message}")]
    Worker { message: String },
}
