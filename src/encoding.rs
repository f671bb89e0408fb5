//! Lossless still-image encoding of frames.
//!
//! Each frame is stored as a complete PNG byte stream. The stored element
//! is the PNG stream as-is: laying the encoded bytes out as a single row
//! rather than a single column does not reorder them, so no transposition
//! is needed on either side.

use std::io::Cursor;

use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbImage, codecs::png::PngEncoder};

use crate::error::FramepackError;

/// PNG-encode an RGB frame.
///
/// # Errors
///
/// Returns [`FramepackError::Encode`] if the frame has a zero dimension or
/// its buffer does not match its dimensions.
pub fn encode_png(frame: &RgbImage) -> Result<Vec<u8>, FramepackError> {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return Err(FramepackError::Encode(format!(
            "frame has no pixels ({width}x{height})"
        )));
    }

    let expected = (width as usize) * (height as usize) * 3;
    let raw = frame.as_raw();
    if raw.len() != expected {
        return Err(FramepackError::Encode(format!(
            "frame buffer holds {} bytes, expected {expected} for {width}x{height} RGB",
            raw.len(),
        )));
    }

    let mut encoded = Vec::new();
    PngEncoder::new(&mut encoded)
        .write_image(raw, width, height, ExtendedColorType::Rgb8)
        .map_err(|error| FramepackError::Encode(error.to_string()))?;
    Ok(encoded)
}

/// Decode a stored PNG frame back into RGB pixels.
///
/// # Errors
///
/// Returns [`FramepackError::Image`] if `bytes` is not a valid PNG stream.
pub fn decode_png(bytes: &[u8]) -> Result<RgbImage, FramepackError> {
    let image = image::load(Cursor::new(bytes), ImageFormat::Png)?;
    Ok(image.to_rgb8())
}
