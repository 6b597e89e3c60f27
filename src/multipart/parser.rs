//! Multipart body parser.
//!
//! The parser walks the request body as a small state machine:
//!
//! ```text
//! SeekBoundary ──▶ InHeaders ──▶ InPayload ──▶ (yield Part) ──▶ SeekBoundary
//!      │               │
//!      │               └── no blank line: skip fragment ──▶ SeekBoundary
//!      └── no more delimiters ──▶ Done
//! ```
//!
//! # Delimiter Recognition
//!
//! The delimiter is `--` followed by the boundary token. It is only recognised
//! at the very start of the body or directly after a CR+LF line break, so a
//! boundary-like sequence in the middle of a binary payload line does not
//! split the part. A payload that contains `\r\n--<boundary>` still splits;
//! the parser does not try to recover from that.
//!
//! # Trailer Stripping
//!
//! Payloads are peeled from the end in a fixed order, each step at most once:
//! CR+LF, then `--`, then CR+LF. A closing delimiter rendered as
//! `<payload>\r\n--<boundary>--\r\n` therefore yields the exact payload even
//! when the body is truncated after the dashes.

use std::ops::Range;

use bytes::Bytes;
use tracing::debug;

use crate::error::MultipartError;

// =============================================================================
// Markers
// =============================================================================

/// Line break used by multipart framing.
const CRLF: &[u8] = b"\r\n";

/// Blank line separating part headers from payload.
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Prefix of every delimiter and suffix of the closing one.
const DASHES: &[u8] = b"--";

/// Header marker that identifies an image part (case-sensitive).
pub const IMAGE_MARKER: &[u8] = b"Content-Type: image";

/// Trailers stripped from the end of a payload, in order.
const TRAILERS: [&[u8]; 3] = [CRLF, DASHES, CRLF];

// =============================================================================
// Part
// =============================================================================

/// A single body part: its header block and its payload.
///
/// Both fields are zero-copy slices of the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Raw header lines, without the trailing blank line
    pub headers: Bytes,

    /// Payload with multipart trailers stripped
    pub payload: Bytes,
}

impl Part {
    /// Whether the header block declares an image content type.
    pub fn is_image(&self) -> bool {
        contains(&self.headers, IMAGE_MARKER)
    }

    /// Value of the part's `Content-Type` header, if present.
    ///
    /// The header name is matched case-insensitively.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .split(|&b| b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
            .filter_map(|line| std::str::from_utf8(line).ok())
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.trim()
                    .eq_ignore_ascii_case("content-type")
                    .then(|| value.trim())
            })
    }
}

// =============================================================================
// Parser
// =============================================================================

#[derive(Debug)]
enum State {
    /// Looking for the next delimiter at or after `pos`
    SeekBoundary,

    /// Inside a fragment, looking for the header terminator
    InHeaders { start: usize, end: usize },

    /// Header block found; payload spans `start..end` before stripping
    InPayload {
        headers: Range<usize>,
        start: usize,
        end: usize,
    },

    /// No delimiters left
    Done,
}

/// Iterates over the parts of a multipart body.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use pumpify::multipart::MultipartParser;
///
/// let body = Bytes::from_static(
///     b"--X\r\nContent-Type: text/plain\r\n\r\nhello\r\n--X--\r\n",
/// );
/// let mut parser = MultipartParser::new(body, "X");
///
/// let part = parser.next_part().unwrap();
/// assert_eq!(part.content_type(), Some("text/plain"));
/// assert_eq!(&part.payload[..], b"hello");
/// assert!(parser.next_part().is_none());
/// ```
#[derive(Debug)]
pub struct MultipartParser {
    body: Bytes,
    delimiter: Vec<u8>,
    pos: usize,
    state: State,
    malformed_image_parts: usize,
}

impl MultipartParser {
    /// Create a parser over `body` split on `--{boundary}`.
    pub fn new(body: Bytes, boundary: &str) -> Self {
        let mut delimiter = Vec::with_capacity(DASHES.len() + boundary.len());
        delimiter.extend_from_slice(DASHES);
        delimiter.extend_from_slice(boundary.as_bytes());

        Self {
            body,
            delimiter,
            pos: 0,
            state: State::SeekBoundary,
            malformed_image_parts: 0,
        }
    }

    /// Number of skipped fragments that carried the image marker but had no
    /// header terminator.
    pub fn malformed_image_parts(&self) -> usize {
        self.malformed_image_parts
    }

    /// Advance to the next well-formed part.
    ///
    /// Fragments without a header terminator (preamble leftovers, the closing
    /// `--` epilogue, truncated parts) are skipped.
    pub fn next_part(&mut self) -> Option<Part> {
        loop {
            match std::mem::replace(&mut self.state, State::Done) {
                State::SeekBoundary => {
                    if let Some(at) = self.find_delimiter(self.pos) {
                        let start = at + self.delimiter.len();
                        let end = self.find_delimiter(start).unwrap_or(self.body.len());
                        self.state = State::InHeaders { start, end };
                    }
                }

                State::InHeaders { start, end } => {
                    self.pos = end;
                    let fragment = &self.body[start..end];

                    match find(fragment, HEADER_TERMINATOR, 0) {
                        Some(offset) => {
                            // Drop the line break that ends the delimiter line
                            let header_start = if fragment.starts_with(CRLF) {
                                start + CRLF.len()
                            } else {
                                start
                            };
                            let header_end = (start + offset).max(header_start);

                            self.state = State::InPayload {
                                headers: header_start..header_end,
                                start: start + offset + HEADER_TERMINATOR.len(),
                                end,
                            };
                        }
                        None => {
                            if contains(fragment, IMAGE_MARKER) {
                                debug!(
                                    offset = start,
                                    "Skipping image part without header terminator"
                                );
                                self.malformed_image_parts += 1;
                            }
                            self.state = State::SeekBoundary;
                        }
                    }
                }

                State::InPayload {
                    headers,
                    start,
                    end,
                } => {
                    let end = start + stripped_len(&self.body[start..end]);
                    self.state = State::SeekBoundary;

                    return Some(Part {
                        headers: self.body.slice(headers),
                        payload: self.body.slice(start..end),
                    });
                }

                State::Done => return None,
            }
        }
    }

    /// Find the next delimiter at or after `from` that starts a line.
    fn find_delimiter(&self, from: usize) -> Option<usize> {
        let mut search = from;
        while let Some(at) = find(&self.body, &self.delimiter, search) {
            if at == 0 || self.body[..at].ends_with(CRLF) {
                return Some(at);
            }
            search = at + 1;
        }
        None
    }
}

impl Iterator for MultipartParser {
    type Item = Part;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_part()
    }
}

// =============================================================================
// Extraction
// =============================================================================

/// Extract the payload of the first image part in a multipart body.
///
/// Parts are scanned in order and the first one whose header block contains
/// `Content-Type: image` wins; later parts are not examined.
///
/// # Errors
///
/// - [`MultipartError::NoImagePart`] if no part declares an image, or the
///   selected part has an empty payload
/// - [`MultipartError::MalformedPart`] if the only image-bearing fragments had
///   no blank line between headers and payload
pub fn extract(body: &Bytes, boundary: &str) -> Result<Bytes, MultipartError> {
    let mut parser = MultipartParser::new(body.clone(), boundary);

    if let Some(part) = parser.by_ref().find(Part::is_image) {
        if part.payload.is_empty() {
            return Err(MultipartError::NoImagePart);
        }
        debug!(
            content_type = part.content_type().unwrap_or("unknown"),
            bytes = part.payload.len(),
            "Extracted image part"
        );
        return Ok(part.payload);
    }

    if parser.malformed_image_parts() > 0 {
        Err(MultipartError::MalformedPart)
    } else {
        Err(MultipartError::NoImagePart)
    }
}

// =============================================================================
// Byte Helpers
// =============================================================================

/// Length of `payload` after peeling the trailers.
fn stripped_len(payload: &[u8]) -> usize {
    TRAILERS.iter().fold(payload.len(), |len, trailer| {
        if payload[..len].ends_with(trailer) {
            len - trailer.len()
        } else {
            len
        }
    })
}

/// Position of the first `needle` in `haystack` at or after `from`.
fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|i| from + i)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    find(haystack, needle, 0).is_some()
}

// =============================================================================
// Tests
// =============================================================================
