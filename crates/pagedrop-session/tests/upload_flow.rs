//! Integration test: drive complete upload flows through the pure
//! session machinery, from captured files to a terminal outcome.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pagedrop_session::{
    Completion, MultipartBody, Outcome, ProgressDisplay, UploadError, UploadFile, UploadSession,
    UploadTarget, display, multipart,
};

/// The submission entry point's guard, as the app applies it: an empty
/// FileSet never becomes a session, and a pending session rejects a
/// new submission.
fn accept_submission(current: Option<&UploadSession>, files: &[UploadFile]) -> bool {
    !files.is_empty() && !current.is_some_and(UploadSession::is_pending)
}

#[test]
fn dropped_text_file_is_framed_and_rendered() {
    // Drag a single 10-byte text file onto the page.
    let files = vec![UploadFile::new("a.txt", b"hello10byt".to_vec())];
    assert!(accept_submission(None, &files));

    let boundary = multipart::random_boundary().unwrap();
    let body = MultipartBody::encode(&files, &boundary);

    // The request body carries the part with its name, declared type,
    // and raw bytes, closed by the boundary terminator.
    let text = String::from_utf8(body.bytes().to_vec()).unwrap();
    assert!(text.contains("filename=\"a.txt\""));
    assert!(text.contains("content-type: text/plain"));
    assert!(text.contains("\r\n\r\nhello10byt\r\n"));
    assert!(text.ends_with(&format!("--{boundary}--")));

    // The transport succeeds with a full HTML page.
    let mut session = UploadSession::new(UploadTarget::default());
    session.record_progress(body.len() as u64 / 2, body.len() as u64);
    session.record_progress(body.len() as u64, body.len() as u64);
    assert_eq!(
        display(Some(&session)),
        ProgressDisplay::Active(session.progress())
    );

    let page = "<!DOCTYPE html><html><body>stored</body></html>";
    let completion = session.complete(200, page.to_owned());

    // The document is replaced with exactly the response body.
    assert_eq!(completion, Completion::Replace(page.to_owned()));
    assert_eq!(display(Some(&session)), ProgressDisplay::Hidden);
}

#[test]
fn submission_with_no_files_issues_no_request() {
    assert!(!accept_submission(None, &[]));
}

#[test]
fn second_submission_is_rejected_while_one_is_pending() {
    let pending = UploadSession::new(UploadTarget::default());
    let files = vec![UploadFile::new("b.txt", b"x".to_vec())];
    assert!(!accept_submission(Some(&pending), &files));

    // Once the first session is terminal, submissions flow again.
    let mut finished = pending;
    finished.complete(200, "<html></html>".to_owned());
    assert!(accept_submission(Some(&finished), &files));
}

#[test]
fn server_error_surfaces_failure_and_leaves_the_page() {
    let mut session = UploadSession::new(UploadTarget::default());
    session.record_progress(10, 10);

    let completion = session.complete(500, "error".to_owned());
    assert_eq!(
        completion,
        Completion::Failed(UploadError::ServerRejected { status: 500 })
    );

    // Progress is hidden and the failure is named; nothing replaces
    // the document.
    assert_eq!(
        display(Some(&session)),
        ProgressDisplay::Error(UploadError::ServerRejected { status: 500 })
    );
}

#[test]
fn abort_mid_flight_is_terminal() {
    let mut session = UploadSession::new(UploadTarget::default());
    session.record_progress(100, 1000);

    assert_eq!(
        session.fail(UploadError::Aborted),
        Completion::Failed(UploadError::Aborted)
    );
    // Neither further progress nor a late response changes anything.
    session.record_progress(1000, 1000);
    assert_eq!(session.progress().loaded(), 100);
    assert_eq!(
        session.complete(200, "<html></html>".to_owned()),
        Completion::Ignored
    );
    assert_eq!(session.outcome(), Outcome::Failed(UploadError::Aborted));
}

#[test]
fn multi_file_drop_is_one_request_with_one_part_per_file() {
    let files = vec![
        UploadFile::new("first.txt", b"1".to_vec()),
        UploadFile::new("second.txt", b"2".to_vec()),
        UploadFile::new("third.png", vec![0x89, 0x50, 0x4E, 0x47]),
    ];
    let body = MultipartBody::encode(&files, "BoundaryToken00000000000000000001");
    let text: Vec<u8> = body.bytes().to_vec();
    let haystack = String::from_utf8_lossy(&text);

    assert_eq!(haystack.matches("name=\"file\"").count(), 3);
    assert_eq!(haystack.matches("content-disposition").count(), 3);
}
