//! Two-phase batch processing.
//!
//! [`run`] validates every input first and only starts extracting when all
//! of them pass, so a bad path never leaves behind a partial set of
//! containers. Once extraction starts, each file is processed on its own:
//! a failure is recorded in that file's [`FileOutcome`] and the remaining
//! files still run.
//!
//! # Example
//!
//! ```no_run
//! use framepack::ExtractOptions;
//!
//! match framepack::run(&["a.mp4", "b.mp4"], &ExtractOptions::new()) {
//!     Ok(outcomes) => {
//!         for outcome in outcomes {
//!             match outcome.result {
//!                 Ok(report) => println!("{}: {} frames", report.output.display(), report.frames_written),
//!                 Err(error) => eprintln!("{}: {error}", outcome.input.display()),
//!             }
//!         }
//!     }
//!     Err(report) => eprint!("{report}"),
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::{
    configuration::ExtractOptions,
    error::FramepackError,
    extract::{ExtractionReport, extract_file},
    validation::{ValidationReport, validate_inputs},
};

/// Result of processing one input file.
#[derive(Debug)]
pub struct FileOutcome {
    /// The input video.
    pub input: PathBuf,
    /// The extraction report, or the error that stopped this file.
    pub result: Result<ExtractionReport, FramepackError>,
}

impl FileOutcome {
    /// Returns `true` if the file was extracted.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Extract every path in order, isolating failures per file.
///
/// No validation is performed; see [`run`].
pub fn process_all<P: AsRef<Path>>(paths: &[P], options: &ExtractOptions) -> Vec<FileOutcome> {
    paths
        .iter()
        .map(|path| {
            let input = path.as_ref().to_path_buf();
            let result = extract_file(&input, options);
            FileOutcome { input, result }
        })
        .collect()
}

/// Validate all paths, then extract all of them.
///
/// # Errors
///
/// Returns the [`ValidationReport`] if any path fails a gate; no container
/// is created in that case.
pub fn run<P: AsRef<Path>>(
    paths: &[P],
    options: &ExtractOptions,
) -> Result<Vec<FileOutcome>, ValidationReport> {
    let report = validate_inputs(paths);
    if !report.is_valid() {
        return Err(report);
    }

    log::info!("Validated {} input file(s)", report.accepted.len());
    Ok(process_all(&report.accepted, options))
}
