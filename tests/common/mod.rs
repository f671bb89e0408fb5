//! Shared helpers for integration tests.
//!
//! Video fixtures are synthesized on the fly: frames are PNG-coded into an
//! AVI file, which keeps them lossless and gives the demuxer an exact frame
//! count.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use ffmpeg_next::{
    Packet, Rational,
    codec::{Id, context::Context as CodecContext},
    format::{Pixel, context::Output},
    frame::Video as VideoFrame,
};
use image::{Rgb, RgbImage};

/// A frame whose pixels depend on position and `seed`.
pub fn patterned_frame(width: u32, height: u32, seed: u8) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x as u8).wrapping_mul(37).wrapping_add(seed),
            (y as u8).wrapping_mul(59).wrapping_add(seed.wrapping_mul(3)),
            ((x + y) as u8).wrapping_mul(11) ^ seed,
        ])
    })
}

/// `count` distinct patterned frames.
pub fn patterned_frames(count: usize, width: u32, height: u32) -> Vec<RgbImage> {
    (0..count)
        .map(|index| patterned_frame(width, height, index as u8))
        .collect()
}

/// Write `frames` as a PNG-coded AVI at `path`.
///
/// Returns an error message if the linked FFmpeg lacks the PNG encoder or
/// AVI muxer; callers skip the test in that case.
pub fn write_test_video(path: &Path, frames: &[RgbImage], fps: i32) -> Result<(), String> {
    ffmpeg_next::init().map_err(|e| format!("ffmpeg init: {e}"))?;

    let first = frames.first().ok_or("no frames to write")?;
    let (width, height) = first.dimensions();
    let time_base = Rational::new(1, fps);

    let mut output =
        ffmpeg_next::format::output(path).map_err(|e| format!("cannot open output: {e}"))?;
    let codec = ffmpeg_next::encoder::find(Id::PNG).ok_or("png encoder not available")?;

    let mut stream = output
        .add_stream(codec)
        .map_err(|e| format!("cannot add stream: {e}"))?;
    let stream_index = stream.index();

    let mut encoder = CodecContext::from_parameters(stream.parameters())
        .and_then(|context| context.encoder().video())
        .map_err(|e| format!("cannot create encoder: {e}"))?;
    encoder.set_width(width);
    encoder.set_height(height);
    encoder.set_format(Pixel::RGB24);
    encoder.set_time_base(time_base);
    encoder.set_frame_rate(Some(Rational::new(fps, 1)));

    let mut encoder = encoder
        .open_as(codec)
        .map_err(|e| format!("cannot open encoder: {e}"))?;
    stream.set_parameters(&encoder);
    stream.set_time_base(time_base);

    output
        .write_header()
        .map_err(|e| format!("cannot write header: {e}"))?;

    let row_length = (width as usize) * 3;
    for (index, image) in frames.iter().enumerate() {
        let mut frame = VideoFrame::new(Pixel::RGB24, width, height);
        let stride = frame.stride(0);
        let data = frame.data_mut(0);
        for (row, pixels) in image.as_raw().chunks_exact(row_length).enumerate() {
            data[row * stride..row * stride + row_length].copy_from_slice(pixels);
        }
        frame.set_pts(Some(index as i64));

        encoder
            .send_frame(&frame)
            .map_err(|e| format!("send_frame failed: {e}"))?;
        write_packets(&mut encoder, &mut output, stream_index, time_base)?;
    }

    encoder
        .send_eof()
        .map_err(|e| format!("send_eof failed: {e}"))?;
    write_packets(&mut encoder, &mut output, stream_index, time_base)?;

    output
        .write_trailer()
        .map_err(|e| format!("cannot write trailer: {e}"))
}

fn write_packets(
    encoder: &mut ffmpeg_next::encoder::video::Encoder,
    output: &mut Output,
    stream_index: usize,
    time_base: Rational,
) -> Result<(), String> {
    let stream_time_base = output
        .stream(stream_index)
        .ok_or("output stream disappeared")?
        .time_base();

    let mut packet = Packet::empty();
    while encoder.receive_packet(&mut packet).is_ok() {
        packet.set_stream(stream_index);
        packet.rescale_ts(time_base, stream_time_base);
        packet
            .write_interleaved(output)
            .map_err(|e| format!("write packet failed: {e}"))?;
    }
    Ok(())
}

/// Write a fixture video into `directory`, or `None` (with a message) if
/// this FFmpeg build cannot produce one.
pub fn fixture_video(directory: &Path, name: &str, frames: &[RgbImage]) -> Option<PathBuf> {
    let path = directory.join(name);
    match write_test_video(&path, frames, 10) {
        Ok(()) => Some(path),
        Err(message) => {
            eprintln!("Skipping: cannot synthesize test video ({message})");
            None
        }
    }
}
