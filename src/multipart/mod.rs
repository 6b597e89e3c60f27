//! Multipart/form-data extraction.
//!
//! This module pulls the uploaded image out of a `multipart/form-data`
//! request body without a general-purpose MIME library.
//!
//! # Flow
//!
//! ```text
//! Content-Type header ──▶ parse_boundary() ──▶ "X"
//!                                               │
//! request body ─────────────────────────────────┴──▶ extract() ──▶ image bytes
//! ```
//!
//! # Components
//!
//! - [`parse_boundary`]: Reads the boundary token from the request `Content-Type`
//! - [`MultipartParser`]: State machine yielding each [`Part`] of the body
//! - [`extract`]: Returns the payload of the first part declaring an image type
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use pumpify::multipart::{extract, parse_boundary};
//!
//! let boundary = parse_boundary("multipart/form-data; boundary=X").unwrap();
//! let body = Bytes::from_static(
//!     b"--X\r\nContent-Type: image/png\r\n\r\n\x89PNG\r\n--X--\r\n",
//! );
//!
//! let image = extract(&body, &boundary).unwrap();
//! assert_eq!(&image[..], b"\x89PNG");
//! ```

mod boundary;
mod parser;

pub use boundary::{parse_boundary, MULTIPART_FORM_DATA};
pub use parser::{extract, MultipartParser, Part, IMAGE_MARKER};
