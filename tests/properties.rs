//! Property, configuration and progress helper tests.

use std::path::{Path, PathBuf};

use framepack::{
    CaptureProperty, ExtractOptions, FfmpegLogLevel, ShortReadPolicy, StreamProperties,
};

#[test]
fn property_names() {
    let names: Vec<&str> = CaptureProperty::ALL.iter().map(|p| p.name()).collect();
    assert_eq!(
        names,
        vec![
            "CAP_PROP_FRAME_WIDTH",
            "CAP_PROP_FRAME_HEIGHT",
            "CAP_PROP_FPS",
            "CAP_PROP_FOURCC",
            "CAP_PROP_FRAME_COUNT",
            "CAP_PROP_FORMAT",
            "CAP_PROP_MODE",
            "CAP_PROP_CONVERT_RGB",
            "CAP_PROP_BUFFERSIZE",
        ]
    );
    assert_eq!(CaptureProperty::Fps.to_string(), "CAP_PROP_FPS");
}

#[test]
fn property_lookup_by_name() {
    for property in CaptureProperty::ALL {
        assert_eq!(CaptureProperty::from_name(property.name()), Some(property));
    }
    assert_eq!(CaptureProperty::from_name("CAP_PROP_GAIN"), None);
}

#[test]
fn stream_properties_accessors() {
    let properties = StreamProperties::new()
        .with(CaptureProperty::FrameWidth, 1920.0)
        .with(CaptureProperty::FrameHeight, 1080.0)
        .with(CaptureProperty::Fps, 25.0)
        .with(CaptureProperty::FrameCount, 300.0);

    assert_eq!(properties.width(), 1920.0);
    assert_eq!(properties.height(), 1080.0);
    assert_eq!(properties.fps(), 25.0);
    assert_eq!(properties.frame_count(), 300);
    assert_eq!(properties.get(CaptureProperty::Mode), 0.0);
    assert_eq!(properties.iter().count(), 9);
}

#[test]
fn frame_count_of_bogus_reports_is_zero() {
    for value in [f64::NAN, -5.0, f64::INFINITY, 0.0] {
        let properties = StreamProperties::new().with(CaptureProperty::FrameCount, value);
        assert_eq!(properties.frame_count(), 0, "value {value}");
    }
    let fractional = StreamProperties::new().with(CaptureProperty::FrameCount, 12.9);
    assert_eq!(fractional.frame_count(), 12);
}

#[test]
fn reported_frame_count_prefers_container_count() {
    assert_eq!(framepack::reported_frame_count(120, 10_000_000, 30.0), 120);
    assert_eq!(framepack::reported_frame_count(0, 2_000_000, 25.0), 50);
    assert_eq!(framepack::reported_frame_count(0, 1_010_000, 29.97), 30);
    assert_eq!(framepack::reported_frame_count(0, 0, 30.0), 0);
    assert_eq!(framepack::reported_frame_count(-1, 5_000_000, 0.0), 0);
    assert_eq!(framepack::reported_frame_count(0, 5_000_000, f64::NAN), 0);
}

#[test]
fn progress_frames() {
    assert!(!framepack::is_progress_frame(0, 25));
    assert!(!framepack::is_progress_frame(24, 25));
    assert!(framepack::is_progress_frame(25, 25));
    assert!(framepack::is_progress_frame(50, 25));
    assert!(!framepack::is_progress_frame(51, 25));
    assert!(framepack::is_progress_frame(3, 0));
}

#[test]
fn output_path_beside_input() {
    assert_eq!(
        framepack::output_path_for(Path::new("/videos/clip.mp4"), None),
        PathBuf::from("/videos/clip.h5")
    );
    assert_eq!(
        framepack::output_path_for(Path::new("/videos/take.v2.avi"), None),
        PathBuf::from("/videos/take.v2.h5")
    );
    assert_eq!(
        framepack::output_path_for(Path::new("/videos/raw"), None),
        PathBuf::from("/videos/raw.h5")
    );
}

#[test]
fn output_path_in_directory() {
    let options = ExtractOptions::new().with_output_directory("/out");
    assert_eq!(
        options.output_path(Path::new("/videos/clip.mp4")),
        PathBuf::from("/out/clip.h5")
    );
}

#[test]
fn options_defaults() {
    let options = ExtractOptions::new();
    assert_eq!(options.progress_interval(), 25);
    assert_eq!(options.short_read_policy(), ShortReadPolicy::LeaveEmpty);
    assert_eq!(options.with_progress_interval(0).progress_interval(), 1);
}

#[test]
fn ffmpeg_log_level_parsing() {
    assert_eq!("quiet".parse::<FfmpegLogLevel>(), Ok(FfmpegLogLevel::Quiet));
    assert_eq!(" Error ".parse::<FfmpegLogLevel>(), Ok(FfmpegLogLevel::Error));
    assert_eq!("warn".parse::<FfmpegLogLevel>(), Ok(FfmpegLogLevel::Warning));
    assert!("loud".parse::<FfmpegLogLevel>().is_err());
    assert_eq!(FfmpegLogLevel::Verbose.to_string(), "verbose");
}
