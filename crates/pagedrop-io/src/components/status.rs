//! Upload progress bar and failure status line.

use dioxus::prelude::*;
use pagedrop_session::ProgressDisplay;

/// Props for the [`UploadStatus`] component.
#[derive(Props, Clone, PartialEq)]
pub struct UploadStatusProps {
    /// Derived display state of the current session.
    display: ProgressDisplay,
}

/// Render the session's derived display state.
///
/// Nothing while hidden, a progress bar while a session is pending,
/// and the failure status line once a session has failed. On failure
/// the progress bar disappears and the page stays as it was, so the
/// user can simply drop the file again.
#[component]
pub fn UploadStatus(props: UploadStatusProps) -> Element {
    match props.display {
        ProgressDisplay::Hidden => rsx! {},
        ProgressDisplay::Active(progress) => {
            let percent = progress.percent();
            rsx! {
                div { class: "progress",
                    div { class: "progress-track",
                        div {
                            class: "progress-fill",
                            style: "width: {percent}%",
                        }
                    }
                    if progress.total() == 0 {
                        p { class: "progress-label", "Uploading..." }
                    } else {
                        p { class: "progress-label",
                            "Uploading... {percent}% ({progress.loaded()} of {progress.total()} bytes)"
                        }
                    }
                }
            }
        }
        ProgressDisplay::Error(error) => rsx! {
            div { class: "status-error",
                p { "Upload failed: {error}" }
                p { class: "status-hint",
                    "The page is unchanged. Drop the file again to retry."
                }
            }
        },
    }
}
