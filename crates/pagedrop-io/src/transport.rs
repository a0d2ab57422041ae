//! Upload transport over `XMLHttpRequest`.
//!
//! `fetch` cannot report upload progress; only the XHR upload object
//! emits progress events, so the request is issued through
//! `XMLHttpRequest` and its lifecycle events are bridged to an
//! awaitable future via a hand-rolled JS promise.
//!
//! A completed HTTP exchange is never an error here, whatever its
//! status -- response classification is `pagedrop-session`'s job. Only
//! transport-level signals (`error`, `abort`, `timeout`) and browser
//! API failures surface as [`TransportError`].
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use std::cell::RefCell;
use std::rc::Rc;

use pagedrop_session::{MultipartBody, UploadError, UploadTarget};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// A completed HTTP exchange, before outcome classification.
#[derive(Debug, Clone)]
pub struct TransportReply {
    /// HTTP status code (`0` in non-network contexts).
    pub status: u16,
    /// Response body text, empty if the server sent none.
    pub body: String,
}

/// Errors raised by the transport layer itself.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The browser reported a network-level failure.
    #[error("network error during upload")]
    Network,
    /// The request was aborted.
    #[error("upload aborted")]
    Aborted,
    /// The browser's timeout elapsed before the request completed.
    #[error("upload timed out")]
    TimedOut,
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for TransportError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

impl TransportError {
    /// Map into the session failure taxonomy.
    ///
    /// `JsError` counts as a network failure for display purposes; the
    /// caller logs the detail before mapping.
    #[must_use]
    pub const fn failure(&self) -> UploadError {
        match self {
            Self::Network | Self::JsError(_) => UploadError::Network,
            Self::Aborted => UploadError::Aborted,
            Self::TimedOut => UploadError::TimedOut,
        }
    }
}

/// Which terminal lifecycle signal fired first.
type TerminalSignal = Rc<RefCell<Option<Result<(), TransportError>>>>;

/// Issue the upload request and await its terminal signal.
///
/// `on_progress` receives `(loaded, total)` byte counts from the XHR
/// upload object; events without a computable length are dropped. The
/// callback may fire many times per second, so it should only update
/// UI state.
///
/// # Errors
///
/// Returns the mapped [`TransportError`] for `error`/`abort`/`timeout`
/// signals, or [`TransportError::JsError`] if any browser API call
/// fails while issuing the request.
#[allow(clippy::future_not_send)] // WASM is single-threaded; Send is not needed
pub async fn send(
    target: &UploadTarget,
    body: &MultipartBody,
    on_progress: impl FnMut(u64, u64) + 'static,
) -> Result<TransportReply, TransportError> {
    let xhr = web_sys::XmlHttpRequest::new()?;
    xhr.open_with_async(target.method(), target.action(), true)?;
    xhr.set_request_header("content-type", &body.content_type())?;

    let signal: TerminalSignal = Rc::new(RefCell::new(None));
    let (promise, resolve) = new_promise();

    let mut on_progress = on_progress;
    let onprogress = Closure::<dyn FnMut(web_sys::ProgressEvent)>::new(
        move |event: web_sys::ProgressEvent| {
            if !event.length_computable() {
                return;
            }
            #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let (loaded, total) = (event.loaded() as u64, event.total() as u64);
            on_progress(loaded, total);
        },
    );

    let onload = terminal_handler(&signal, &resolve, || Ok(()));
    let onerror = terminal_handler(&signal, &resolve, || Err(TransportError::Network));
    let onabort = terminal_handler(&signal, &resolve, || Err(TransportError::Aborted));
    let ontimeout = terminal_handler(&signal, &resolve, || Err(TransportError::TimedOut));

    let upload = xhr.upload()?;
    upload.set_onprogress(Some(onprogress.as_ref().unchecked_ref()));
    xhr.set_onload(Some(onload.as_ref().unchecked_ref()));
    xhr.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    xhr.set_onabort(Some(onabort.as_ref().unchecked_ref()));
    xhr.set_ontimeout(Some(ontimeout.as_ref().unchecked_ref()));

    // Ship the encoded body as a Blob so the browser knows the total
    // upload size up front (progress events are computable).
    let array = js_sys::Uint8Array::from(body.bytes());
    let parts = js_sys::Array::new();
    parts.push(&array);
    let opts = web_sys::BlobPropertyBag::new();
    opts.set_type(&body.content_type());
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;
    xhr.send_with_opt_blob(Some(&blob))?;

    // Await the promise -- this yields to the browser event loop until
    // one of the terminal handlers resolves it. The closures must stay
    // alive until then.
    let await_result = wasm_bindgen_futures::JsFuture::from(promise).await;

    upload.set_onprogress(None);
    xhr.set_onload(None);
    xhr.set_onerror(None);
    xhr.set_onabort(None);
    xhr.set_ontimeout(None);
    drop((onprogress, onload, onerror, onabort, ontimeout));

    await_result?;
    match signal.borrow_mut().take() {
        Some(Ok(())) => {
            let status = xhr.status()?;
            let body = xhr.response_text()?.unwrap_or_default();
            Ok(TransportReply { status, body })
        }
        Some(Err(error)) => Err(error),
        None => Err(TransportError::JsError(
            "transport resolved without a lifecycle signal".into(),
        )),
    }
}

/// Build one terminal lifecycle handler: record the outcome (first
/// signal wins) and resolve the promise.
fn terminal_handler(
    signal: &TerminalSignal,
    resolve: &js_sys::Function,
    outcome: fn() -> Result<(), TransportError>,
) -> Closure<dyn FnMut(web_sys::ProgressEvent)> {
    let signal = Rc::clone(signal);
    let resolve = resolve.clone();
    Closure::<dyn FnMut(web_sys::ProgressEvent)>::new(move |_event: web_sys::ProgressEvent| {
        let mut slot = signal.borrow_mut();
        if slot.is_none() {
            *slot = Some(outcome());
        }
        drop(slot);
        resolve.call0(&JsValue::NULL).ok();
    })
}

/// Create a JS Promise along with its resolve function.
fn new_promise() -> (js_sys::Promise, js_sys::Function) {
    let resolve = Rc::new(RefCell::new(None::<js_sys::Function>));
    let resolve_clone = Rc::clone(&resolve);

    let promise = js_sys::Promise::new(&mut move |res, _rej| {
        *resolve_clone.borrow_mut() = Some(res);
    });

    let resolve_fn = resolve
        .borrow_mut()
        .take()
        .expect_throw("resolve not captured");

    (promise, resolve_fn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_signals_map_into_the_failure_taxonomy() {
        assert_eq!(TransportError::Network.failure(), UploadError::Network);
        assert_eq!(TransportError::Aborted.failure(), UploadError::Aborted);
        assert_eq!(TransportError::TimedOut.failure(), UploadError::TimedOut);
    }

    #[test]
    fn browser_api_failures_count_as_network_failures() {
        let error = TransportError::JsError("detached".into());
        assert_eq!(error.failure(), UploadError::Network);
    }
}
