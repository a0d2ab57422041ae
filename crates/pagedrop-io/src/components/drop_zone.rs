//! Whole-page drag-and-drop capture with a file picker fallback.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use pagedrop_session::UploadFile;

/// Props for the [`DropZone`] component.
#[derive(Props, Clone, PartialEq)]
pub struct DropZoneProps {
    /// `true` while an upload session is pending. Disables the picker
    /// and ignores drops, so a second session cannot start.
    busy: bool,
    /// Called with the captured FileSet once every file's bytes have
    /// been read.
    on_files: EventHandler<Vec<UploadFile>>,
    /// Page content rendered inside the capture region.
    children: Element,
}

/// Full-viewport drop region wrapping the page content.
///
/// The drag handlers sit on a wrapper covering the whole page, so a
/// drop anywhere is captured -- users are not required to hit a small
/// target. Dragging over the page suppresses the browser default
/// (which would open the file) and applies the `drag-over` marker; a
/// drop removes the marker, reads the files, and forwards them.
///
/// A drop carrying zero files (a dragged text selection, or a
/// cancelled drag) performs no submission and surfaces no error --
/// that is deliberate, not an oversight.
#[component]
pub fn DropZone(props: DropZoneProps) -> Element {
    let mut dragging = use_signal(|| false);
    let mut read_error = use_signal(|| Option::<String>::None);

    let busy = props.busy;

    // Read and forward a captured file list.
    //
    // Shared by the file-picker (`handle_files`) and drag-and-drop
    // (`handle_drop`) paths so both feed the same submission entry
    // point; there is no native form submission to intercept.
    let process_files = move |files: Vec<FileData>| async move {
        if busy || files.is_empty() {
            return;
        }
        let mut captured = Vec::with_capacity(files.len());
        for file in files {
            let name = file.name();
            match file.read_bytes().await {
                Ok(bytes) => captured.push(UploadFile::new(name, bytes.to_vec())),
                Err(e) => {
                    read_error.set(Some(format!("Failed to read {name}: {e}")));
                    return;
                }
            }
        }
        read_error.set(None);
        props.on_files.call(captured);
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        process_files(evt.files()).await;
    };

    let zone_class = if dragging() {
        "drop-zone drag-over"
    } else {
        "drop-zone"
    };

    rsx! {
        div {
            class: "{zone_class}",
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| {
                dragging.set(false);
            },
            ondrop: handle_drop,

            {props.children}

            if let Some(ref err) = read_error() {
                p { class: "status-error", "{err}" }
            }

            div { class: "picker",
                p { class: "picker-hint",
                    "Drop files anywhere on this page, or"
                }
                label {
                    class: if props.busy { "picker-button disabled" } else { "picker-button" },
                    input {
                        r#type: "file",
                        multiple: true,
                        class: "hidden",
                        disabled: props.busy,
                        onchange: handle_files,
                    }
                    "Choose Files"
                }
            }
        }
    }
}
