//! Boundary extraction from the request `Content-Type` header.

use crate::error::MultipartError;

/// Media type that must appear in the request `Content-Type`.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Parameter name that introduces the boundary token.
const BOUNDARY_PARAM: &str = "boundary=";

/// Parse the boundary token out of a `Content-Type` header value.
///
/// The value after `boundary=` is cut at the next `;`, trimmed, and unquoted.
///
/// # Errors
///
/// - [`MultipartError::InvalidContentType`] if the header is not `multipart/form-data`
/// - [`MultipartError::MissingBoundary`] if there is no non-empty boundary parameter
pub fn parse_boundary(content_type: &str) -> Result<String, MultipartError> {
    if !content_type.contains(MULTIPART_FORM_DATA) {
        return Err(MultipartError::InvalidContentType {
            content_type: content_type.to_string(),
        });
    }

    let (_, rest) = content_type
        .split_once(BOUNDARY_PARAM)
        .ok_or(MultipartError::MissingBoundary)?;

    let value = rest.split(';').next().unwrap_or_default().trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);

    if value.is_empty() {
        return Err(MultipartError::MissingBoundary);
    }

    Ok(value.to_string())
}
