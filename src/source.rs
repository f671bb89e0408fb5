//! Sequential frame sources.
//!
//! [`FrameSource`] is the seam between the extraction loop and whatever
//! produces frames. [`VideoSource`] is the FFmpeg-backed implementation: it
//! opens a file, captures the nine [`StreamProperties`] once, and then
//! decodes frames in presentation order starting from index 0, converting
//! each to packed 8-bit RGB.
//!
//! # Example
//!
//! ```no_run
//! use framepack::{FrameSource, VideoSource};
//!
//! let mut source = VideoSource::open("input.mp4")?;
//! println!("{} frames reported", source.properties().frame_count());
//! while let Some((index, frame)) = source.next_frame() {
//!     println!("frame {index}: {}x{}", frame.width(), frame.height());
//! }
//! # Ok::<(), framepack::FramepackError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use ffmpeg_next::{
    Error as FfmpegError, Packet, Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;

use crate::{
    error::FramepackError,
    properties::{CaptureProperty, StreamProperties},
};

/// Consecutive demuxer read errors tolerated before giving up on a stream.
const MAX_CONSECUTIVE_READ_ERRORS: u32 = 16;

/// A producer of raw frames in presentation order.
///
/// The position counter is queried separately from the read: callers ask
/// for [`position`](FrameSource::position) and then call
/// [`read_frame`](FrameSource::read_frame), and must not assume the two are
/// consistent beyond that ordering.
pub trait FrameSource {
    /// Stream properties as reported when the source was opened.
    fn properties(&self) -> &StreamProperties;

    /// The position the source currently reports: the index of the next
    /// frame it expects to deliver.
    fn position(&self) -> u64;

    /// Decode the next frame, or `None` at end of stream or on decode failure.
    fn read_frame(&mut self) -> Option<RgbImage>;

    /// The reason decoding stopped early, if it stopped on an error.
    fn last_error(&self) -> Option<&str> {
        None
    }

    /// Query the position, then read a frame.
    fn next_frame(&mut self) -> Option<(u64, RgbImage)> {
        let index = self.position();
        self.read_frame().map(|frame| (index, frame))
    }
}

/// An FFmpeg-backed [`FrameSource`] over the best video stream of a file.
///
/// The file handle is held until the source is dropped or
/// [`close`](VideoSource::close)d.
pub struct VideoSource {
    input_context: Input,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    video_stream_index: usize,
    properties: StreamProperties,
    width: u32,
    height: u32,
    decoded_frame: VideoFrame,
    scaled_frame: VideoFrame,
    position: u64,
    eof_sent: bool,
    done: bool,
    last_error: Option<String>,
    path: PathBuf,
}

impl Debug for VideoSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoSource")
            .field("path", &self.path)
            .field("video_stream_index", &self.video_stream_index)
            .field("properties", &self.properties)
            .field("position", &self.position)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl VideoSource {
    /// Open the decoder on `path` and capture its stream properties.
    ///
    /// # Errors
    ///
    /// Returns [`FramepackError::SourceOpen`] if FFmpeg cannot open the file
    /// or build a decoder for it, and [`FramepackError::NoVideoStream`] if
    /// the file has no video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FramepackError> {
        let path = path.as_ref().to_path_buf();

        log::debug!("Opening video source: {}", path.display());

        ffmpeg_next::init().map_err(|error| FramepackError::SourceOpen {
            path: path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| FramepackError::SourceOpen {
                path: path.clone(),
                reason: error.to_string(),
            })?;

        let (video_stream_index, decoder, properties) = {
            let stream = input_context
                .streams()
                .best(Type::Video)
                .ok_or(FramepackError::NoVideoStream)?;
            let index = stream.index();

            let parameters = stream.parameters();
            // SAFETY: `parameters` points at the stream's live codec
            // parameters for as long as `input_context` is open.
            let codec_tag = unsafe { (*parameters.as_ptr()).codec_tag };

            let decoder = CodecContext::from_parameters(parameters)
                .and_then(|context| context.decoder().video())
                .map_err(|error| FramepackError::SourceOpen {
                    path: path.clone(),
                    reason: format!("Failed to create video decoder for stream {index}: {error}"),
                })?;

            let frames_per_second = frames_per_second(stream.avg_frame_rate(), stream.rate());
            let frame_count =
                reported_frame_count(stream.frames(), input_context.duration(), frames_per_second);
            let pixel_format = ffmpeg_sys_next::AVPixelFormat::from(decoder.format()) as i32;

            let properties = StreamProperties::new()
                .with(CaptureProperty::FrameWidth, f64::from(decoder.width()))
                .with(CaptureProperty::FrameHeight, f64::from(decoder.height()))
                .with(CaptureProperty::Fps, frames_per_second)
                .with(CaptureProperty::FourCc, f64::from(codec_tag))
                .with(CaptureProperty::FrameCount, frame_count as f64)
                .with(CaptureProperty::Format, f64::from(pixel_format))
                .with(CaptureProperty::Mode, 0.0)
                .with(CaptureProperty::ConvertRgb, 1.0)
                .with(CaptureProperty::BufferSize, 0.0);

            (index, decoder, properties)
        };

        let width = decoder.width();
        let height = decoder.height();
        let scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| FramepackError::SourceOpen {
            path: path.clone(),
            reason: format!("Failed to create RGB converter: {error}"),
        })?;

        log::info!(
            "Opened video source: {} ({}x{}, {:.2} fps, ~{} frames)",
            path.display(),
            width,
            height,
            properties.fps(),
            properties.frame_count(),
        );

        Ok(Self {
            input_context,
            decoder,
            scaler,
            video_stream_index,
            properties,
            width,
            height,
            decoded_frame: VideoFrame::empty(),
            scaled_frame: VideoFrame::empty(),
            position: 0,
            eof_sent: false,
            done: false,
            last_error: None,
            path,
        })
    }

    /// Check that `path` yields at least one decodable frame.
    ///
    /// Opens a throwaway source, reads one frame and releases it.
    ///
    /// # Errors
    ///
    /// Returns [`FramepackError::UnreadableVideo`] if the file cannot be
    /// opened or no frame can be decoded.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<(), FramepackError> {
        let path = path.as_ref();
        let unreadable = |reason: String| FramepackError::UnreadableVideo {
            path: path.to_path_buf(),
            reason,
        };

        let mut source = Self::open(path).map_err(|error| unreadable(error.to_string()))?;
        if source.read_frame().is_some() {
            return Ok(());
        }

        let reason = source
            .last_error()
            .unwrap_or("no decodable frames")
            .to_string();
        Err(unreadable(reason))
    }

    /// Path this source was opened on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the decoder and file handle.
    pub fn close(self) {
        log::debug!(
            "Closing video source: {} after {} frames",
            self.path.display(),
            self.position,
        );
    }

    fn decode_next(&mut self) -> Result<Option<RgbImage>, FramepackError> {
        let mut consecutive_read_errors = 0;

        loop {
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                return self.convert_current_frame().map(Some);
            }

            if self.eof_sent {
                return Ok(None);
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input_context) {
                Ok(()) => {
                    consecutive_read_errors = 0;
                    if packet.stream() == self.video_stream_index {
                        self.decoder.send_packet(&packet)?;
                    }
                }
                Err(FfmpegError::Eof) => {
                    self.decoder.send_eof()?;
                    self.eof_sent = true;
                }
                Err(error) => {
                    consecutive_read_errors += 1;
                    log::debug!("Skipping unreadable packet in {}: {error}", self.path.display());
                    if consecutive_read_errors >= MAX_CONSECUTIVE_READ_ERRORS {
                        return Err(FramepackError::VideoDecode(format!(
                            "{consecutive_read_errors} consecutive read errors, last: {error}"
                        )));
                    }
                }
            }
        }
    }

    fn convert_current_frame(&mut self) -> Result<RgbImage, FramepackError> {
        // Mid-stream format or size changes need a fresh converter; output
        // stays at the dimensions reported on open.
        let input = self.scaler.input();
        if input.format != self.decoded_frame.format()
            || input.width != self.decoded_frame.width()
            || input.height != self.decoded_frame.height()
        {
            log::debug!(
                "Rebuilding RGB converter for {} ({:?} {}x{})",
                self.path.display(),
                self.decoded_frame.format(),
                self.decoded_frame.width(),
                self.decoded_frame.height(),
            );
            self.scaler = ScalingContext::get(
                self.decoded_frame.format(),
                self.decoded_frame.width(),
                self.decoded_frame.height(),
                Pixel::RGB24,
                self.width,
                self.height,
                ScalingFlags::BILINEAR,
            )?;
        }

        self.scaler.run(&self.decoded_frame, &mut self.scaled_frame)?;

        let buffer = frame_to_rgb_buffer(&self.scaled_frame, self.width, self.height);
        RgbImage::from_raw(self.width, self.height, buffer).ok_or_else(|| {
            FramepackError::VideoDecode(
                "Failed to construct RGB image from decoded frame data".to_string(),
            )
        })
    }
}

impl FrameSource for VideoSource {
    fn properties(&self) -> &StreamProperties {
        &self.properties
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn read_frame(&mut self) -> Option<RgbImage> {
        if self.done {
            return None;
        }

        match self.decode_next() {
            Ok(Some(frame)) => {
                self.position += 1;
                Some(frame)
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(error) => {
                log::warn!(
                    "Decoding stopped at frame {} of {}: {error}",
                    self.position,
                    self.path.display(),
                );
                self.last_error = Some(error.to_string());
                self.done = true;
                None
            }
        }
    }

    fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// Frame rate from the stream's average rate, falling back to its base rate.
fn frames_per_second(average: Rational, base: Rational) -> f64 {
    [average, base]
        .into_iter()
        .find(|rate| rate.numerator() > 0 && rate.denominator() > 0)
        .map(|rate| f64::from(rate.numerator()) / f64::from(rate.denominator()))
        .unwrap_or(0.0)
}

/// Frame count as the decoder reports it.
///
/// Uses the container's own count when it has one, otherwise estimates
/// `round(duration × fps)` from the container duration in microseconds.
/// Zero when neither is known.
pub fn reported_frame_count(container_frames: i64, duration_micros: i64, fps: f64) -> u64 {
    if container_frames > 0 {
        return container_frames as u64;
    }
    if duration_micros <= 0 || fps.is_nan() || fps <= 0.0 {
        return 0;
    }
    let seconds = duration_micros as f64 / 1_000_000.0;
    (seconds * fps).round() as u64
}

/// Copy an RGB24 frame into a tightly-packed buffer, dropping row padding.
fn frame_to_rgb_buffer(video_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let row_length = (width as usize) * 3;
    let data = video_frame.data(0);

    if stride == row_length {
        data[..row_length * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_length * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + row_length]);
        }
        buffer
    }
}
