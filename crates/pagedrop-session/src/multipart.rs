//! Binary-safe `multipart/form-data` framing.
//!
//! The request body is assembled as raw bytes, so file content never
//! passes through a text buffer. Every file lands under the single
//! `file` field; the server iterates the parts in order.
//!
//! Wire format, per part:
//!
//! ```text
//! --boundary\r\n
//! content-disposition: form-data; name="file"; filename="<name>"\r\n
//! content-type: <type>\r\n
//! \r\n
//! <raw bytes>\r\n
//! ```
//!
//! terminated by `--boundary--`.

use crate::file::UploadFile;

/// Form field name shared by every file part.
pub const FILE_FIELD: &str = "file";

/// Length of a generated boundary token.
///
/// Long enough that an accidental collision with file content is not a
/// practical concern.
pub const BOUNDARY_LEN: usize = 32;

/// Characters a generated boundary token is drawn from.
const BOUNDARY_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Errors that can occur while building a multipart body.
#[derive(Debug, thiserror::Error)]
pub enum MultipartError {
    /// The platform entropy source failed.
    #[error("random source unavailable: {0}")]
    RandomSource(String),
}

/// Generate a random alphanumeric boundary token.
///
/// # Errors
///
/// Returns [`MultipartError::RandomSource`] if the platform entropy
/// source is unavailable.
pub fn random_boundary() -> Result<String, MultipartError> {
    let mut raw = [0_u8; BOUNDARY_LEN];
    getrandom::fill(&mut raw).map_err(|e| MultipartError::RandomSource(e.to_string()))?;
    Ok(raw
        .iter()
        .map(|byte| char::from(BOUNDARY_CHARS[usize::from(*byte) % BOUNDARY_CHARS.len()]))
        .collect())
}

/// Escape a filename for the quoted-string in `content-disposition`.
///
/// Backslash and double-quote are escaped; CR and LF are stripped so a
/// hostile name cannot inject header lines.
fn escape_filename(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for ch in name.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\r' | '\n' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

/// An encoded `multipart/form-data` request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    boundary: String,
    bytes: Vec<u8>,
}

impl MultipartBody {
    /// Frame `files` as multipart parts under the [`FILE_FIELD`] field.
    ///
    /// Files are framed in order, each with its original filename and
    /// declared content type. The caller guarantees a non-empty
    /// FileSet — empty submissions are dropped long before encoding.
    #[must_use]
    pub fn encode(files: &[UploadFile], boundary: &str) -> Self {
        debug_assert!(!files.is_empty(), "empty FileSet must not reach encoding");
        debug_assert!(
            boundary.bytes().all(|b| b.is_ascii_alphanumeric()),
            "boundary must be alphanumeric, got {boundary:?}"
        );

        let overhead_per_part = boundary.len() + FILE_FIELD.len() + 96;
        let capacity = files
            .iter()
            .map(|f| f.bytes.len() + f.name.len() + f.content_type.len() + overhead_per_part)
            .sum::<usize>()
            + boundary.len()
            + 4;

        let mut bytes = Vec::with_capacity(capacity);
        for file in files {
            bytes.extend_from_slice(b"--");
            bytes.extend_from_slice(boundary.as_bytes());
            bytes.extend_from_slice(b"\r\n");
            bytes.extend_from_slice(
                format!(
                    "content-disposition: form-data; name=\"{FILE_FIELD}\"; filename=\"{}\"\r\n",
                    escape_filename(&file.name)
                )
                .as_bytes(),
            );
            bytes.extend_from_slice(format!("content-type: {}\r\n", file.content_type).as_bytes());
            bytes.extend_from_slice(b"\r\n");
            bytes.extend_from_slice(&file.bytes);
            bytes.extend_from_slice(b"\r\n");
        }
        bytes.extend_from_slice(b"--");
        bytes.extend_from_slice(boundary.as_bytes());
        bytes.extend_from_slice(b"--");

        Self {
            boundary: boundary.to_owned(),
            bytes,
        }
    }

    /// The boundary token framing this body.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `content-type` header.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// The encoded body bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encoded body length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the body has no bytes (never the case for an
    /// encoded submission).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
