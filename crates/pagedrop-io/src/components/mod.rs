//! Dioxus UI components for pagedrop.
//!
//! Provides the whole-page drop zone with its file-picker fallback and
//! the upload progress/status display.

mod drop_zone;
mod status;

pub use drop_zone::DropZone;
pub use status::UploadStatus;
