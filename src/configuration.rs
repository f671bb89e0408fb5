//! Extraction configuration.
//!
//! [`ExtractOptions`] is a builder that threads the progress callback,
//! notification interval, short-read policy and output location through
//! the extraction functions.
//!
//! # Example
//!
//! ```no_run
//! use framepack::{ExtractOptions, ShortReadPolicy};
//!
//! let options = ExtractOptions::new()
//!     .with_progress_interval(100)
//!     .with_short_read_policy(ShortReadPolicy::Fail)
//!     .with_output_directory("frames");
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::progress::{NoOpProgress, ProgressCallback};

/// Name of the frame dataset inside every container.
pub const DATASET_NAME: &str = "VideoFrames";

/// File extension of output containers.
pub const CONTAINER_EXTENSION: &str = "h5";

/// Default number of frames between progress notifications.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 25;

/// What to do when the decoder yields fewer frames than it reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortReadPolicy {
    /// Keep the container; trailing slots stay empty. This is the default.
    #[default]
    LeaveEmpty,
    /// Close the container and fail the file with
    /// [`FramepackError::ShortRead`](crate::FramepackError::ShortRead).
    Fail,
}

/// Configuration for extraction operations.
#[derive(Clone)]
pub struct ExtractOptions {
    pub(crate) progress: Arc<dyn ProgressCallback>,
    pub(crate) progress_interval: u64,
    pub(crate) short_read_policy: ShortReadPolicy,
    pub(crate) output_directory: Option<PathBuf>,
}

impl Debug for ExtractOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExtractOptions")
            .field("progress_interval", &self.progress_interval)
            .field("short_read_policy", &self.short_read_policy)
            .field("output_directory", &self.output_directory)
            .finish_non_exhaustive()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Create options with defaults: no progress callback, interval 25,
    /// [`ShortReadPolicy::LeaveEmpty`], containers written beside inputs.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            short_read_policy: ShortReadPolicy::default(),
            output_directory: None,
        }
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Set how often the progress callback fires. Clamped to a minimum of 1.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Choose how short reads are handled.
    #[must_use]
    pub fn with_short_read_policy(mut self, policy: ShortReadPolicy) -> Self {
        self.short_read_policy = policy;
        self
    }

    /// Write containers into `directory` instead of beside each input.
    #[must_use]
    pub fn with_output_directory<P: Into<PathBuf>>(mut self, directory: P) -> Self {
        self.output_directory = Some(directory.into());
        self
    }

    /// The configured progress interval.
    pub fn progress_interval(&self) -> u64 {
        self.progress_interval
    }

    /// The configured short-read policy.
    pub fn short_read_policy(&self) -> ShortReadPolicy {
        self.short_read_policy
    }

    /// Container path for `input` under these options.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        output_path_for(input, self.output_directory.as_deref())
    }
}

/// Container path for `input`: `<directory>/<input_stem>.h5`.
///
/// Without an explicit directory the container lands beside the input.
pub fn output_path_for(input: &Path, directory: Option<&Path>) -> PathBuf {
    let mut file_name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
    file_name.push(".");
    file_name.push(CONTAINER_EXTENSION);

    let directory = directory
        .or_else(|| input.parent())
        .unwrap_or_else(|| Path::new(""));
    directory.join(file_name)
}
