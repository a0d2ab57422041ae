//! pagedrop-session: Pure upload session machinery (sans-IO).
//!
//! Models one file-upload submission from captured files to a terminal
//! outcome: multipart framing, byte progress, response classification,
//! and the derived display state.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! bytes and returns structured data. All browser interaction lives in
//! `pagedrop-io`.

pub mod file;
pub mod multipart;
pub mod progress;
pub mod session;

pub use file::UploadFile;
pub use multipart::{FILE_FIELD, MultipartBody, MultipartError};
pub use progress::Progress;
pub use session::{
    Completion, Outcome, ProgressDisplay, UploadError, UploadReport, UploadSession, UploadTarget,
    classify_response, display,
};
