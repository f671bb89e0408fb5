//! Per-file extraction.
//!
//! [`extract_file`] runs one input video through the whole procedure:
//! open the source, capture its properties, create a container sized to
//! the reported frame count, then decode, PNG-encode and store every frame
//! in increasing index order before closing both ends.
//!
//! [`extract_from_source`] runs the same loop over any [`FrameSource`].

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use crate::{
    configuration::{ExtractOptions, ShortReadPolicy},
    container::FrameContainer,
    encoding::encode_png,
    error::FramepackError,
    progress::ProgressTracker,
    properties::StreamProperties,
    source::{FrameSource, VideoSource},
};

/// Stage of a single file's extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionState {
    /// Opening the frame source.
    Opening,
    /// Reading properties and creating the container.
    MetadataCapture,
    /// Decoding, encoding and storing frames.
    Extracting,
    /// Closing the container and the source.
    Closing,
    /// Finished successfully.
    Done,
    /// Stopped on an error.
    Failed,
}

impl Display for ExtractionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            ExtractionState::Opening => "opening",
            ExtractionState::MetadataCapture => "metadata capture",
            ExtractionState::Extracting => "extracting",
            ExtractionState::Closing => "closing",
            ExtractionState::Done => "done",
            ExtractionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Summary of one completed extraction.
#[derive(Debug, Clone)]
#[must_use]
pub struct ExtractionReport {
    /// The input video.
    pub input: PathBuf,
    /// The container that was written.
    pub output: PathBuf,
    /// Length of the frame dataset (the decoder-reported frame count).
    pub frame_count: u64,
    /// Number of frames actually stored.
    pub frames_written: u64,
    /// Whether decoding ended before `frame_count` frames were produced.
    pub short_read: bool,
    /// Properties captured at open time and stored as attributes.
    pub properties: StreamProperties,
}

struct StateTracker<'a> {
    input: &'a Path,
    state: ExtractionState,
}

impl StateTracker<'_> {
    fn enter(&mut self, next: ExtractionState) {
        log::debug!("{}: {} -> {}", self.input.display(), self.state, next);
        self.state = next;
    }

    fn fail(&mut self, error: FramepackError) -> FramepackError {
        log::warn!(
            "{}: extraction failed during {}: {error}",
            self.input.display(),
            self.state,
        );
        self.state = ExtractionState::Failed;
        error
    }
}

/// Extract every frame of the video at `input` into its container.
///
/// The container path comes from [`ExtractOptions::output_path`].
///
/// # Errors
///
/// Any error from opening the source, creating or writing the container,
/// or encoding a frame. With [`ShortReadPolicy::Fail`], also
/// [`FramepackError::ShortRead`].
pub fn extract_file<P: AsRef<Path>>(
    input: P,
    options: &ExtractOptions,
) -> Result<ExtractionReport, FramepackError> {
    let input = input.as_ref();
    let mut tracker = StateTracker {
        input,
        state: ExtractionState::Opening,
    };

    let mut source = VideoSource::open(input).map_err(|error| tracker.fail(error))?;
    let output = options.output_path(input);
    let result = run_extraction(&mut source, input, &output, options, &mut tracker);

    source.close();

    let report = result?;
    tracker.enter(ExtractionState::Done);
    Ok(report)
}

/// Extract every frame of `source` into a new container at `output`.
///
/// `input` only labels progress notifications and the report.
pub fn extract_from_source<S: FrameSource>(
    source: &mut S,
    input: &Path,
    output: &Path,
    options: &ExtractOptions,
) -> Result<ExtractionReport, FramepackError> {
    let mut tracker = StateTracker {
        input,
        state: ExtractionState::Opening,
    };

    let report = run_extraction(source, input, output, options, &mut tracker)?;
    tracker.enter(ExtractionState::Done);
    Ok(report)
}

fn run_extraction<S: FrameSource>(
    source: &mut S,
    input: &Path,
    output: &Path,
    options: &ExtractOptions,
    tracker: &mut StateTracker<'_>,
) -> Result<ExtractionReport, FramepackError> {
    tracker.enter(ExtractionState::MetadataCapture);

    let properties = *source.properties();
    let frame_count = properties.frame_count();
    if frame_count == 0 {
        log::warn!(
            "{}: decoder reports no frames; the container will be empty",
            input.display(),
        );
    }

    let mut container =
        FrameContainer::create(output, frame_count).map_err(|error| tracker.fail(error))?;
    container
        .set_attributes(&properties)
        .map_err(|error| tracker.fail(error))?;

    tracker.enter(ExtractionState::Extracting);

    let progress = ProgressTracker::new(
        options.progress.clone(),
        input.to_path_buf(),
        frame_count,
        options.progress_interval,
    );

    let mut short_read = false;
    let mut next_index = 0;
    while next_index < frame_count {
        let Some((index, frame)) = source.next_frame() else {
            short_read = true;
            break;
        };

        let encoded = encode_png(&frame).map_err(|error| tracker.fail(error))?;
        container
            .write_frame(index, &encoded)
            .map_err(|error| tracker.fail(error))?;
        progress.frame_written(index);

        next_index = index + 1;
    }

    tracker.enter(ExtractionState::Closing);

    let frames_written = container.frames_written();
    container.close().map_err(|error| tracker.fail(error))?;

    if short_read {
        log::warn!(
            "{}: decoder produced {frames_written} of {frame_count} reported frames{}",
            input.display(),
            source
                .last_error()
                .map(|reason| format!(" ({reason})"))
                .unwrap_or_default(),
        );

        if options.short_read_policy == ShortReadPolicy::Fail {
            return Err(tracker.fail(FramepackError::ShortRead {
                decoded: frames_written,
                expected: frame_count,
            }));
        }
    }

    log::info!(
        "{}: stored {frames_written}/{frame_count} frames in {}",
        input.display(),
        output.display(),
    );

    Ok(ExtractionReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        frame_count,
        frames_written,
        short_read,
        properties,
    })
}
