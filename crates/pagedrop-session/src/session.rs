//! The upload session state machine.
//!
//! One [`UploadSession`] represents exactly one in-flight or completed
//! request: `pending -> (progress)* -> succeeded | failed`. It is
//! created when a submission is accepted, mutated only by transport
//! lifecycle events, and absorbing once terminal — late signals are
//! reported as [`Completion::Ignored`] and change nothing.
//!
//! At most one session may be pending at a time. The policy for a
//! submission arriving while one is pending is *reject*: the trigger
//! is disabled while pending, and the submission entry point
//! double-checks and drops the attempt.

use serde::Serialize;

use crate::progress::Progress;

/// Where an upload goes: the form's declared method and action.
///
/// Built once at startup and passed down explicitly; components never
/// look this up from ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadTarget {
    method: String,
    action: String,
}

impl UploadTarget {
    /// Create a target from a form's `method`/`action` pair.
    #[must_use]
    pub fn new(method: &str, action: impl Into<String>) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            action: action.into(),
        }
    }

    /// HTTP method, uppercased.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request URL.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }
}

impl Default for UploadTarget {
    /// The original form posts to the page it is served from.
    fn default() -> Self {
        Self::new("POST", "/")
    }
}

/// Terminal failure categories.
///
/// All of these resolve to the same failure UI (progress hidden,
/// status line shown, document untouched so the user can retry by
/// hand), but they stay distinguishable in console logs and telemetry.
/// "No files selected" is deliberately absent: an empty FileSet is
/// silently ignored upstream and never becomes a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize)]
pub enum UploadError {
    /// The transport reported a network-level error.
    #[error("network error during upload")]
    Network,
    /// The request was aborted before completing.
    #[error("upload aborted")]
    Aborted,
    /// The transport's timeout elapsed.
    #[error("upload timed out")]
    TimedOut,
    /// The server answered outside the success range.
    #[error("server rejected the upload (status {status})")]
    ServerRejected {
        /// HTTP status reported by the server.
        status: u16,
    },
    /// The server answered in the success range with no body, leaving
    /// nothing to render.
    #[error("server returned an empty response")]
    EmptyResponse,
}

impl UploadError {
    /// Stable suffix for telemetry event names: lowercase alphanumeric
    /// and underscores only.
    #[must_use]
    pub const fn event_suffix(self) -> &'static str {
        match self {
            Self::Network => "network_error",
            Self::Aborted => "aborted",
            Self::TimedOut => "timed_out",
            Self::ServerRejected { .. } => "server_rejected",
            Self::EmptyResponse => "empty_response",
        }
    }
}

/// Classify a completed HTTP exchange.
///
/// Status `0` (reported in non-network contexts such as `file://`) and
/// the `[200, 400)` range count as success, provided the body is
/// non-empty — the body is the next page, so an empty one leaves
/// nothing to render and is a failure.
///
/// # Errors
///
/// Returns [`UploadError::ServerRejected`] for an out-of-range status
/// and [`UploadError::EmptyResponse`] for an in-range status with an
/// empty body.
pub fn classify_response(status: u16, body: &str) -> Result<(), UploadError> {
    if status != 0 && !(200..400).contains(&status) {
        return Err(UploadError::ServerRejected { status });
    }
    if body.is_empty() {
        return Err(UploadError::EmptyResponse);
    }
    Ok(())
}

/// Where a session ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The request is still in flight.
    Pending,
    /// The response body replaced the document.
    Succeeded,
    /// The upload failed; the document is unchanged.
    Failed(UploadError),
}

/// What the caller should do after feeding a terminal transport event
/// into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Replace the whole document with the response body.
    Replace(String),
    /// Surface the failure; leave the document alone.
    Failed(UploadError),
    /// The session was already terminal; do nothing.
    Ignored,
}

/// Exactly one in-flight or completed upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    target: UploadTarget,
    progress: Progress,
    outcome: Outcome,
}

impl UploadSession {
    /// Start a session toward `target`. The session is pending until
    /// exactly one terminal transition is applied.
    #[must_use]
    pub fn new(target: UploadTarget) -> Self {
        Self {
            target,
            progress: Progress::default(),
            outcome: Outcome::Pending,
        }
    }

    /// The target this session posts to.
    #[must_use]
    pub const fn target(&self) -> &UploadTarget {
        &self.target
    }

    /// Current byte progress.
    #[must_use]
    pub const fn progress(&self) -> Progress {
        self.progress
    }

    /// Current outcome.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Returns `true` while no terminal transition has been applied.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.outcome, Outcome::Pending)
    }

    /// Feed a transport progress event into the session.
    ///
    /// Ignored once terminal; otherwise clamped per [`Progress`].
    pub const fn record_progress(&mut self, loaded: u64, total: u64) {
        if self.is_pending() {
            self.progress.observe(loaded, total);
        }
    }

    /// Apply a completed HTTP exchange.
    ///
    /// The one place response classification happens: success yields
    /// [`Completion::Replace`] carrying the body; anything else marks
    /// the session failed. A session that is already terminal absorbs
    /// the event.
    pub fn complete(&mut self, status: u16, body: String) -> Completion {
        if !self.is_pending() {
            return Completion::Ignored;
        }
        match classify_response(status, &body) {
            Ok(()) => {
                self.outcome = Outcome::Succeeded;
                Completion::Replace(body)
            }
            Err(error) => {
                self.outcome = Outcome::Failed(error);
                Completion::Failed(error)
            }
        }
    }

    /// Apply a transport-level failure (`error`, `abort`, `timeout`).
    ///
    /// A session that is already terminal absorbs the event.
    pub fn fail(&mut self, error: UploadError) -> Completion {
        if !self.is_pending() {
            return Completion::Ignored;
        }
        self.outcome = Outcome::Failed(error);
        Completion::Failed(error)
    }

    /// Snapshot for the one-line console report.
    #[must_use]
    pub fn report(&self, elapsed_ms: u64) -> UploadReport<'_> {
        UploadReport {
            method: self.target.method.as_str(),
            action: self.target.action.as_str(),
            loaded: self.progress.loaded(),
            total: self.progress.total(),
            outcome: self.outcome,
            elapsed_ms,
        }
    }
}

/// Derived display state: a pure function of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressDisplay {
    /// Nothing to show (no session, or the document is being replaced).
    Hidden,
    /// Show the progress bar.
    Active(Progress),
    /// Show the failure status line.
    Error(UploadError),
}

/// Map the current session (if any) to its display state.
#[must_use]
pub const fn display(session: Option<&UploadSession>) -> ProgressDisplay {
    match session {
        None => ProgressDisplay::Hidden,
        Some(session) => match session.outcome {
            Outcome::Pending => ProgressDisplay::Active(session.progress),
            Outcome::Succeeded => ProgressDisplay::Hidden,
            Outcome::Failed(error) => ProgressDisplay::Error(error),
        },
    }
}

/// One-line, JSON-serializable summary of a finished session, logged
/// to the console so outcomes are distinguishable in telemetry.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport<'a> {
    method: &'a str,
    action: &'a str,
    loaded: u64,
    total: u64,
    outcome: Outcome,
    elapsed_ms: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pending_session() -> UploadSession {
        UploadSession::new(UploadTarget::default())
    }

    #[test]
    fn default_target_posts_to_root() {
        let target = UploadTarget::default();
        assert_eq!(target.method(), "POST");
        assert_eq!(target.action(), "/");
    }

    #[test]
    fn target_uppercases_method() {
        let target = UploadTarget::new("post", "/upload");
        assert_eq!(target.method(), "POST");
        assert_eq!(target.action(), "/upload");
    }

    #[test]
    fn new_session_is_pending_and_hidden_progress_is_zero() {
        let session = pending_session();
        assert!(session.is_pending());
        assert_eq!(session.outcome(), Outcome::Pending);
        assert_eq!(session.progress().loaded(), 0);
    }

    #[test]
    fn successful_completion_replaces_with_exact_body() {
        let mut session = pending_session();
        let html = "<html><body>uploaded</body></html>".to_owned();
        let completion = session.complete(200, html.clone());
        assert_eq!(completion, Completion::Replace(html));
        assert_eq!(session.outcome(), Outcome::Succeeded);
    }

    #[test]
    fn status_zero_and_redirect_range_count_as_success() {
        assert!(classify_response(0, "body").is_ok());
        assert!(classify_response(200, "body").is_ok());
        assert!(classify_response(302, "body").is_ok());
        assert!(classify_response(399, "body").is_ok());
    }

    #[test]
    fn out_of_range_status_is_rejected() {
        assert_eq!(
            classify_response(400, "body"),
            Err(UploadError::ServerRejected { status: 400 })
        );
        assert_eq!(
            classify_response(500, "error"),
            Err(UploadError::ServerRejected { status: 500 })
        );
        assert_eq!(
            classify_response(199, "body"),
            Err(UploadError::ServerRejected { status: 199 })
        );
    }

    #[test]
    fn empty_body_is_a_failure_even_in_range() {
        assert_eq!(classify_response(200, ""), Err(UploadError::EmptyResponse));
        let mut session = pending_session();
        assert_eq!(
            session.complete(200, String::new()),
            Completion::Failed(UploadError::EmptyResponse)
        );
        assert_eq!(
            session.outcome(),
            Outcome::Failed(UploadError::EmptyResponse)
        );
    }

    #[test]
    fn server_rejection_keeps_the_body_out_of_the_document() {
        let mut session = pending_session();
        let completion = session.complete(500, "error".to_owned());
        assert_eq!(
            completion,
            Completion::Failed(UploadError::ServerRejected { status: 500 })
        );
        assert!(!matches!(completion, Completion::Replace(_)));
    }

    #[test]
    fn transport_failure_after_progress_never_succeeds() {
        let mut session = pending_session();
        session.record_progress(512, 1024);
        assert_eq!(
            session.fail(UploadError::Aborted),
            Completion::Failed(UploadError::Aborted)
        );
        // A late completion must be absorbed, not resurrect success.
        assert_eq!(
            session.complete(200, "late".to_owned()),
            Completion::Ignored
        );
        assert_eq!(session.outcome(), Outcome::Failed(UploadError::Aborted));
    }

    #[test]
    fn terminal_sessions_absorb_progress_and_failures() {
        let mut session = pending_session();
        session.complete(200, "done".to_owned());
        session.record_progress(999, 1000);
        assert_eq!(session.progress().loaded(), 0);
        assert_eq!(session.fail(UploadError::Network), Completion::Ignored);
        assert_eq!(session.outcome(), Outcome::Succeeded);
    }

    #[test]
    fn display_is_a_pure_function_of_the_session() {
        assert_eq!(display(None), ProgressDisplay::Hidden);

        let mut session = pending_session();
        session.record_progress(5, 10);
        assert_eq!(
            display(Some(&session)),
            ProgressDisplay::Active(session.progress())
        );

        let mut succeeded = pending_session();
        succeeded.complete(200, "ok".to_owned());
        assert_eq!(display(Some(&succeeded)), ProgressDisplay::Hidden);

        let mut failed = pending_session();
        failed.fail(UploadError::TimedOut);
        assert_eq!(
            display(Some(&failed)),
            ProgressDisplay::Error(UploadError::TimedOut)
        );
    }

    #[test]
    fn event_suffixes_fit_telemetry_constraints() {
        let errors = [
            UploadError::Network,
            UploadError::Aborted,
            UploadError::TimedOut,
            UploadError::ServerRejected { status: 500 },
            UploadError::EmptyResponse,
        ];
        for error in errors {
            let suffix = error.event_suffix();
            assert!(
                suffix
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_'),
                "suffix {suffix:?} breaks the event-name format"
            );
        }
    }

    #[test]
    fn report_serializes_with_outcome_visible() {
        let mut session = pending_session();
        session.record_progress(10, 10);
        session.fail(UploadError::TimedOut);
        let json = serde_json::to_string(&session.report(1250)).unwrap();
        assert!(json.contains("\"TimedOut\""));
        assert!(json.contains("\"elapsed_ms\":1250"));
        assert!(json.contains("\"method\":\"POST\""));
    }
}
