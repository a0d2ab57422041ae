//! Captured files and their declared content types.

use serde::{Deserialize, Serialize};

/// Fallback content type for files with no recognized extension.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Extension to MIME type table, sorted by extension.
///
/// Covers the types a drop target realistically sees. Anything else
/// falls back to [`DEFAULT_CONTENT_TYPE`]; the server stores the bytes
/// either way.
const MIME_TYPES: &[(&str, &str)] = &[
    ("bmp", "image/bmp"),
    ("css", "text/css"),
    ("csv", "text/csv"),
    ("gif", "image/gif"),
    ("gz", "application/gzip"),
    ("htm", "text/html"),
    ("html", "text/html"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("js", "text/javascript"),
    ("json", "application/json"),
    ("md", "text/markdown"),
    ("mp3", "audio/mpeg"),
    ("mp4", "video/mp4"),
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("svg", "image/svg+xml"),
    ("tar", "application/x-tar"),
    ("txt", "text/plain"),
    ("webp", "image/webp"),
    ("xml", "application/xml"),
    ("zip", "application/zip"),
];

/// Look up the content type declared for a filename.
///
/// Matches the final extension case-insensitively; names without an
/// extension (or with an unknown one) get [`DEFAULT_CONTENT_TYPE`].
#[must_use]
pub fn content_type_for(name: &str) -> &'static str {
    name.rsplit_once('.')
        .and_then(|(_, ext)| {
            MIME_TYPES
                .iter()
                .find(|(candidate, _)| candidate.eq_ignore_ascii_case(ext))
        })
        .map_or(DEFAULT_CONTENT_TYPE, |(_, mime)| mime)
}

/// One file captured from a drop or the file picker.
///
/// An ordered sequence of these forms the FileSet for a submission.
/// The bytes are opaque; nothing downstream inspects or validates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadFile {
    /// Original filename, as reported by the browser.
    pub name: String,
    /// Declared content type, forwarded to the server verbatim.
    pub content_type: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Create a file with the content type derived from its name.
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = content_type_for(&name).to_owned();
        Self {
            name,
            content_type,
            bytes,
        }
    }

    /// Create a file with an explicitly declared content type.
    #[must_use]
    pub fn with_content_type(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// File size in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the file has no content.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_known_extensions() {
        assert_eq!(content_type_for("a.txt"), "text/plain");
        assert_eq!(content_type_for("photo.png"), "image/png");
        assert_eq!(content_type_for("page.html"), "text/html");
        assert_eq!(content_type_for("archive.tar.gz"), "application/gzip");
    }

    #[test]
    fn content_type_is_case_insensitive() {
        assert_eq!(content_type_for("REPORT.PDF"), "application/pdf");
        assert_eq!(content_type_for("Photo.JpG"), "image/jpeg");
    }

    #[test]
    fn content_type_unknown_falls_back() {
        assert_eq!(content_type_for("binary.xyz"), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for("no-extension"), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for("trailing-dot."), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn mime_table_is_sorted() {
        // Keeps the table scannable; lookup does not depend on order.
        for pair in MIME_TYPES.windows(2) {
            assert!(
                pair[0].0 < pair[1].0,
                "MIME_TYPES out of order at {:?}",
                pair[1].0
            );
        }
    }

    #[test]
    fn new_derives_content_type() {
        let file = UploadFile::new("notes.md", b"# notes".to_vec());
        assert_eq!(file.content_type, "text/markdown");
        assert_eq!(file.len(), 7);
        assert!(!file.is_empty());
    }

    #[test]
    fn with_content_type_keeps_declared_type() {
        let file = UploadFile::with_content_type("data", "application/json", b"{}".to_vec());
        assert_eq!(file.content_type, "application/json");
    }
}
