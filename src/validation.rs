//! Pre-flight validation of input paths.
//!
//! Two gates run before any container is created: every path must name an
//! existing regular file, and every file must yield at least one decodable
//! frame. [`validate_inputs`] runs both on every path and collects all
//! failures into a [`ValidationReport`] instead of stopping at the first.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! let report = framepack::validate_inputs(&[PathBuf::from("a.mp4"), PathBuf::from("b.avi")]);
//! if !report.is_valid() {
//!     eprint!("{report}");
//! }
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

use crate::error::FramepackError;
use crate::source::VideoSource;

/// Outcome of validating a batch of input paths.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Paths that passed both gates, in input order.
    pub accepted: Vec<PathBuf>,
    /// One error per rejected path, in input order.
    pub errors: Vec<FramepackError>,
}

impl ValidationReport {
    /// Returns `true` if every path passed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for error in &self.errors {
            writeln!(f, "[!] Error: {error}.")?;
        }
        Ok(())
    }
}

/// Fail with [`FramepackError::PathNotFound`] unless `path` is a regular file.
pub fn check_path_exists(path: &Path) -> Result<(), FramepackError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(FramepackError::PathNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Fail with [`FramepackError::UnreadableVideo`] unless `path` decodes at
/// least one frame.
pub fn check_readable(path: &Path) -> Result<(), FramepackError> {
    VideoSource::probe(path)
}

/// Run both gates on every path.
///
/// The readability probe only runs on paths that exist.
pub fn validate_inputs<P: AsRef<Path>>(paths: &[P]) -> ValidationReport {
    let mut report = ValidationReport::default();

    for path in paths {
        let path = path.as_ref();
        match check_path_exists(path).and_then(|()| check_readable(path)) {
            Ok(()) => report.accepted.push(path.to_path_buf()),
            Err(error) => {
                log::debug!("Rejected input {}: {error}", path.display());
                report.errors.push(error);
            }
        }
    }

    report
}
