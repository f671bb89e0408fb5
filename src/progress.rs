//! Progress reporting for frame extraction.
//!
//! Implement [`ProgressCallback`] to observe an extraction. The callback is
//! fired every N-th frame index (25 by default, see
//! [`ExtractOptions::with_progress_interval`](crate::ExtractOptions::with_progress_interval)),
//! never for frame 0.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use framepack::{ExtractOptions, ProgressCallback, ProgressInfo};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{}/{}", info.current_frame, info.total_frames);
//!     }
//! }
//!
//! let report = framepack::extract_file(
//!     "input.mp4",
//!     &ExtractOptions::new().with_progress(Arc::new(PrintProgress)),
//! )?;
//! # Ok::<(), framepack::FramepackError>(())
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A snapshot of extraction progress for one input file.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// The input video being extracted.
    pub input: PathBuf,
    /// Index of the frame just written.
    pub current_frame: u64,
    /// Frame count reported by the decoder at open time.
    pub total_frames: u64,
    /// Completion percentage (0.0 to 100.0), `None` if the total is zero.
    pub percentage: Option<f32>,
    /// Wall-clock time since extraction of this file started.
    pub elapsed: Duration,
}

/// Trait for receiving progress updates during extraction.
///
/// Callbacks observe but cannot halt the extraction.
pub trait ProgressCallback: Send + Sync {
    /// Called every progress interval.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all notifications. The default when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Whether a notification is due for `frame_index`.
///
/// Due at every multiple of `interval` except 0.
pub fn is_progress_frame(frame_index: u64, interval: u64) -> bool {
    let interval = interval.max(1);
    frame_index != 0 && frame_index % interval == 0
}

/// Tracks timing for one file and fires callbacks on due frames.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    input: PathBuf,
    total_frames: u64,
    interval: u64,
    start_time: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        input: PathBuf,
        total_frames: u64,
        interval: u64,
    ) -> Self {
        Self {
            callback,
            input,
            total_frames,
            interval: interval.max(1),
            start_time: Instant::now(),
        }
    }

    /// Record that the frame at `frame_index` was written.
    pub(crate) fn frame_written(&self, frame_index: u64) {
        if !is_progress_frame(frame_index, self.interval) {
            return;
        }

        let percentage = (self.total_frames > 0)
            .then(|| (frame_index as f32 / self.total_frames as f32) * 100.0);

        let info = ProgressInfo {
            input: self.input.clone(),
            current_frame: frame_index,
            total_frames: self.total_frames,
            percentage,
            elapsed: self.start_time.elapsed(),
        };

        self.callback.on_progress(&info);
    }
}
