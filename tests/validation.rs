//! Input validation and batch orchestration integration tests.

mod common;

use framepack::{ExtractOptions, FramepackError};

#[test]
fn missing_paths_are_all_reported() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let missing_a = directory.path().join("a.mp4");
    let missing_b = directory.path().join("b.mp4");

    let report = framepack::validate_inputs(&[missing_a.clone(), missing_b.clone()]);
    assert!(!report.is_valid());
    assert!(report.accepted.is_empty());
    assert_eq!(report.errors.len(), 2);
    assert!(matches!(
        &report.errors[0],
        FramepackError::PathNotFound { path } if *path == missing_a
    ));
    assert!(matches!(
        &report.errors[1],
        FramepackError::PathNotFound { path } if *path == missing_b
    ));
}

#[test]
fn report_display_has_one_line_per_error() {
    let report = framepack::validate_inputs(&["/nonexistent/one.mp4", "/nonexistent/two.mp4"]);
    let rendered = report.to_string();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|line| line.starts_with("[!] Error: ")));
    assert!(lines[0].contains("one.mp4"));
}

#[test]
fn directory_is_not_a_valid_input() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let error = framepack::check_path_exists(directory.path()).unwrap_err();
    assert!(matches!(error, FramepackError::PathNotFound { .. }));
}

#[test]
fn garbage_file_is_unreadable() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join("noise.mp4");
    std::fs::write(&path, vec![0x5Au8; 4096]).unwrap();

    framepack::check_path_exists(&path).expect("file exists");
    let error = framepack::check_readable(&path).unwrap_err();
    assert!(
        matches!(&error, FramepackError::UnreadableVideo { path: rejected, .. } if *rejected == path),
        "unexpected error: {error}",
    );
}

#[test]
fn empty_file_is_unreadable() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join("empty.avi");
    std::fs::write(&path, b"").unwrap();

    let report = framepack::validate_inputs(&[&path]);
    assert_eq!(report.errors.len(), 1);
    assert!(matches!(
        report.errors[0],
        FramepackError::UnreadableVideo { .. }
    ));
}

#[test]
fn run_creates_nothing_when_any_input_is_bad() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let frames = common::patterned_frames(2, 4, 4);
    let Some(good) = common::fixture_video(directory.path(), "good.avi", &frames) else {
        return;
    };
    let bad = directory.path().join("missing.avi");

    let report = framepack::run(&[good.clone(), bad], &ExtractOptions::new()).unwrap_err();
    assert_eq!(report.accepted, vec![good]);
    assert_eq!(report.errors.len(), 1);
    assert!(!directory.path().join("good.h5").exists());
    assert!(!directory.path().join("missing.h5").exists());
}

#[test]
fn run_extracts_every_valid_input() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let Some(first) =
        common::fixture_video(directory.path(), "first.avi", &common::patterned_frames(2, 4, 4))
    else {
        return;
    };
    let Some(second) =
        common::fixture_video(directory.path(), "second.avi", &common::patterned_frames(3, 4, 4))
    else {
        return;
    };

    let outcomes = framepack::run(&[first.clone(), second.clone()], &ExtractOptions::new())
        .expect("validation should pass");
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|outcome| outcome.is_success()));
    assert_eq!(outcomes[0].input, first);
    assert_eq!(outcomes[1].input, second);
    assert!(directory.path().join("first.h5").exists());
    assert!(directory.path().join("second.h5").exists());
}

#[test]
fn process_all_isolates_failures() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let Some(good) =
        common::fixture_video(directory.path(), "fine.avi", &common::patterned_frames(2, 4, 4))
    else {
        return;
    };
    let bad = directory.path().join("gone.avi");

    let outcomes = framepack::process_all(&[bad, good], &ExtractOptions::new());
    assert!(!outcomes[0].is_success());
    assert!(outcomes[1].is_success());
    assert!(directory.path().join("fine.h5").exists());
}
