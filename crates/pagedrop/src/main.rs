use std::rc::Rc;

use dioxus::prelude::*;
use pagedrop_io::components::{DropZone, UploadStatus};
use pagedrop_io::{document, telemetry, transport};
use pagedrop_session::{
    Completion, MultipartBody, UploadFile, UploadSession, UploadTarget, display, multipart,
};
use web_sys::console;

fn main() {
    dioxus::launch(app);
}

/// Root application component.
///
/// Owns the single upload session and the upload target, and wires the
/// drop zone and status display to the transport state machine.
fn app() -> Element {
    // --- Application state ---
    // The target is fixed at startup: the widget posts back to the
    // page it is served from, like the form it replaces.
    let target = use_hook(|| Rc::new(UploadTarget::default()));
    // At most one session exists at a time; `busy` disables the
    // trigger while it is pending.
    let mut session = use_signal(|| Option::<UploadSession>::None);

    let busy = session
        .read()
        .as_ref()
        .is_some_and(UploadSession::is_pending);

    // --- Submission entry point ---
    // Both the picker and the drop zone funnel here. Rejecting while a
    // session is pending keeps the single-pending-session invariant
    // even if an event slips past the disabled trigger.
    let on_files = {
        let target = Rc::clone(&target);
        move |files: Vec<UploadFile>| {
            if session
                .peek()
                .as_ref()
                .is_some_and(UploadSession::is_pending)
            {
                console::warn_1(&"Upload already in progress; submission rejected".into());
                return;
            }
            let target = Rc::clone(&target);
            spawn(async move {
                run_upload(session, &target, files).await;
            });
        }
    };

    rsx! {
        style { dangerous_inner_html: include_str!("../assets/app.css") }

        DropZone { busy: busy, on_files: on_files,
            header { class: "masthead",
                h1 { "pagedrop" }
                p { class: "tagline",
                    "Drop a file to upload it. The server's answer becomes the page."
                }
            }

            UploadStatus { display: display(session.read().as_ref()) }
        }
    }
}

/// Drive one upload session from submission to its terminal state.
#[allow(clippy::future_not_send)] // WASM is single-threaded; Send is not needed
async fn run_upload(
    mut session: Signal<Option<UploadSession>>,
    target: &UploadTarget,
    files: Vec<UploadFile>,
) {
    let boundary = match multipart::random_boundary() {
        Ok(boundary) => boundary,
        Err(e) => {
            console::error_1(&format!("Could not start upload: {e}").into());
            return;
        }
    };

    session.set(Some(UploadSession::new(target.clone())));

    // Yield to the browser event loop so the pending state paints
    // before the synchronous multipart encode of potentially large
    // files blocks the thread.
    gloo_timers::future::TimeoutFuture::new(0).await;

    let body = MultipartBody::encode(&files, &boundary);
    console::log_1(
        &format!(
            "Sending request: {} file(s), {} byte body",
            files.len(),
            body.len()
        )
        .into(),
    );

    let started = web_time::Instant::now();
    let sent = transport::send(target, &body, move |loaded, total| {
        if let Some(current) = session.write().as_mut() {
            current.record_progress(loaded, total);
        }
    })
    .await;

    let completion = match sent {
        Ok(reply) => session
            .write()
            .as_mut()
            .map_or(Completion::Ignored, |current| {
                current.complete(reply.status, reply.body)
            }),
        Err(e) => {
            console::error_1(&format!("Upload transport error: {e}").into());
            let failure = e.failure();
            session
                .write()
                .as_mut()
                .map_or(Completion::Ignored, |current| current.fail(failure))
        }
    };

    // One JSON line per finished session, so outcomes (and failure
    // categories) are greppable in the console.
    #[expect(clippy::cast_possible_truncation)]
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if let Some(current) = session.read().as_ref() {
        match serde_json::to_string(&current.report(elapsed_ms)) {
            Ok(line) => console::log_1(&line.into()),
            Err(e) => console::error_1(&format!("Failed to serialize upload report: {e}").into()),
        }
    }

    match completion {
        Completion::Replace(html) => {
            telemetry::track_upload_succeeded();
            if let Err(e) = document::replace_document(&html) {
                // The upload itself succeeded; re-posting would
                // duplicate it, so only the rendering failure is
                // surfaced.
                console::error_1(&format!("Failed to render server response: {e}").into());
            }
        }
        Completion::Failed(error) => {
            telemetry::track_upload_failed(error);
            console::error_1(&format!("Upload failed: {error}").into());
        }
        Completion::Ignored => {}
    }
}
