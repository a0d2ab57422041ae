//! Whole-document replacement.
//!
//! After a successful upload the server answers with a complete HTML
//! page. Rendering it means discarding the current document and
//! streaming the response in via `document.open()` / `write()` /
//! `close()`, as if the browser had navigated there -- no merging with
//! the prior DOM.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;

/// Errors that can occur while replacing the document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for DocumentError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Replace the entire current document with `html`.
///
/// The widget, its listeners, and all page state are discarded along
/// with the old document; the server-rendered page takes over exactly
/// as it was sent.
///
/// # Errors
///
/// Returns [`DocumentError::JsError`] if the window or document is
/// unavailable or any of the open/write/close calls fail.
pub fn replace_document(html: &str) -> Result<(), DocumentError> {
    let window =
        web_sys::window().ok_or_else(|| DocumentError::JsError("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| DocumentError::JsError("no document".into()))?
        .unchecked_into::<web_sys::HtmlDocument>();

    // open() resets the document; write() + close() stream in the
    // replacement.
    document.open()?;
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(html));
    let write_result = document.write(&parts);
    // Always close, even if the write failed mid-stream.
    let close_result = document.close();
    write_result?;
    close_result?;

    Ok(())
}
