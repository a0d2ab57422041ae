//! pagedrop-io: Browser I/O and Dioxus component library.
//!
//! Handles the upload transport, whole-document response rendering,
//! and telemetry events, and provides the UI components for the
//! pagedrop web application.

pub mod components;
pub mod document;
pub mod telemetry;
pub mod transport;

pub use components::{DropZone, UploadStatus};
