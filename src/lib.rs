//! # framepack
//!
//! Extract every frame of a video file and store it, PNG-compressed, in a
//! self-describing HDF5 container next to the decoder's capture properties.
//!
//! Each input produces one `<stem>.h5` file holding a fixed-length dataset
//! `VideoFrames` (element `i` = PNG bytes of frame `i`) with nine scalar
//! `CAP_PROP_*` attributes. Decoding is done by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate, containers
//! are written with [`hdf5`](https://crates.io/crates/hdf5-metno).
//!
//! ## Quick Start
//!
//! ### Extract One File
//!
//! ```no_run
//! use framepack::ExtractOptions;
//!
//! let report = framepack::extract_file("input.mp4", &ExtractOptions::new())?;
//! println!("{} frames -> {}", report.frames_written, report.output.display());
//! # Ok::<(), framepack::FramepackError>(())
//! ```
//!
//! ### Validate, Then Extract a Batch
//!
//! ```no_run
//! use framepack::ExtractOptions;
//!
//! let outcomes = framepack::run(&["a.mp4", "b.avi"], &ExtractOptions::new())
//!     .map_err(|report| report.to_string())?;
//! for outcome in &outcomes {
//!     println!("{}: ok = {}", outcome.input.display(), outcome.is_success());
//! }
//! # Ok::<(), String>(())
//! ```
//!
//! ### Read a Container Back
//!
//! ```no_run
//! use framepack::ContainerReader;
//!
//! let reader = ContainerReader::open("input.h5")?;
//! let fps = reader.attribute("CAP_PROP_FPS")?;
//! let first = reader.frame(0)?;
//! # Ok::<(), framepack::FramepackError>(())
//! ```
//!
//! ## Requirements
//!
//! FFmpeg and HDF5 development libraries must be installed on your system.

pub mod configuration;
pub mod container;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod ffmpeg;
pub mod pipeline;
pub mod progress;
pub mod properties;
pub mod source;
pub mod validation;

pub use configuration::{
    CONTAINER_EXTENSION, DATASET_NAME, DEFAULT_PROGRESS_INTERVAL, ExtractOptions,
    ShortReadPolicy, output_path_for,
};
pub use container::{ContainerReader, FrameContainer};
pub use encoding::{decode_png, encode_png};
pub use error::FramepackError;
pub use extract::{ExtractionReport, ExtractionState, extract_file, extract_from_source};
pub use ffmpeg::{
    FFMPEG_LOG_ENV, FfmpegLogLevel, ffmpeg_log_level_from_env, get_ffmpeg_log_level,
    set_ffmpeg_log_level,
};
pub use pipeline::{FileOutcome, process_all, run};
pub use progress::{ProgressCallback, ProgressInfo, is_progress_frame};
pub use properties::{CaptureProperty, StreamProperties};
pub use source::{FrameSource, VideoSource, reported_frame_count};
pub use validation::{ValidationReport, check_path_exists, check_readable, validate_inputs};
