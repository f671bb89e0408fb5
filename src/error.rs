//! Error types for the `framepack` crate.
//!
//! [`FramepackError`] is the single error type returned by every fallible
//! operation: pre-flight validation, decoding, PNG encoding and container
//! I/O. Variants carry the offending path or frame index so that a single
//! line is enough to report the failure.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `framepack` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FramepackError {
    /// An input path does not name an existing regular file.
    #[error("{} does not point to a valid file", path.display())]
    PathNotFound {
        /// The path that was checked.
        path: PathBuf,
    },

    /// The readability probe could not decode a single frame.
    #[error("Unable to read frames from {}: {reason}", path.display())]
    UnreadableVideo {
        /// The probed path.
        path: PathBuf,
        /// Why the probe failed.
        reason: String,
    },

    /// The decoder could not be opened on the file.
    #[error("Failed to open video file at {}: {reason}", path.display())]
    SourceOpen {
        /// Path passed to [`crate::VideoSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file has no video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecode(String),

    /// The output container could not be created.
    #[error("Failed to create container at {}: {reason}", path.display())]
    ContainerCreate {
        /// Output path of the container.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// Writing a frame or attribute into the container failed.
    #[error("Failed to write container: {0}")]
    ContainerWrite(String),

    /// Reading back a container failed.
    #[error("Failed to read container: {0}")]
    ContainerRead(String),

    /// A frame could not be PNG-encoded.
    #[error("Failed to encode frame: {0}")]
    Encode(String),

    /// A frame index lies outside the fixed-length frame dataset.
    #[error("Frame {index} is out of range (container holds {frame_count} frames)")]
    IndexOutOfRange {
        /// The index that was written.
        index: u64,
        /// Length of the frame dataset.
        frame_count: u64,
    },

    /// The decoder ran out of frames before the reported frame count.
    #[error("Decoder produced {decoded} of {expected} reported frames")]
    ShortRead {
        /// Frames actually decoded.
        decoded: u64,
        /// Frames the decoder reported at open time.
        expected: u64,
    },

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// An error from the `image` crate.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),
}

impl From<FfmpegError> for FramepackError {
    fn from(error: FfmpegError) -> Self {
        FramepackError::Ffmpeg(error.to_string())
    }
}
