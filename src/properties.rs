//! Stream properties captured at open time.
//!
//! Each recognized property is a [`CaptureProperty`] variant with a fixed
//! attribute name (`CAP_PROP_*`). [`StreamProperties`] holds one numeric
//! value per variant exactly as the decoder reported it; nothing is
//! corrected or validated.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// A recognized stream property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureProperty {
    /// Frame width in pixels.
    FrameWidth,
    /// Frame height in pixels.
    FrameHeight,
    /// Frames per second.
    Fps,
    /// Numeric codec tag.
    FourCc,
    /// Reported total number of frames.
    FrameCount,
    /// Native pixel format code of the decoder.
    Format,
    /// Capture mode code.
    Mode,
    /// Whether frames are converted to RGB (1) or not (0).
    ConvertRgb,
    /// Internal decoder buffer size.
    BufferSize,
}

impl CaptureProperty {
    /// Every property, in attribute order.
    pub const ALL: [CaptureProperty; 9] = [
        CaptureProperty::FrameWidth,
        CaptureProperty::FrameHeight,
        CaptureProperty::Fps,
        CaptureProperty::FourCc,
        CaptureProperty::FrameCount,
        CaptureProperty::Format,
        CaptureProperty::Mode,
        CaptureProperty::ConvertRgb,
        CaptureProperty::BufferSize,
    ];

    /// Attribute name under which the property is stored.
    pub const fn name(self) -> &'static str {
        match self {
            CaptureProperty::FrameWidth => "CAP_PROP_FRAME_WIDTH",
            CaptureProperty::FrameHeight => "CAP_PROP_FRAME_HEIGHT",
            CaptureProperty::Fps => "CAP_PROP_FPS",
            CaptureProperty::FourCc => "CAP_PROP_FOURCC",
            CaptureProperty::FrameCount => "CAP_PROP_FRAME_COUNT",
            CaptureProperty::Format => "CAP_PROP_FORMAT",
            CaptureProperty::Mode => "CAP_PROP_MODE",
            CaptureProperty::ConvertRgb => "CAP_PROP_CONVERT_RGB",
            CaptureProperty::BufferSize => "CAP_PROP_BUFFERSIZE",
        }
    }

    /// Look a property up by its attribute name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|property| property.name() == name)
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl Display for CaptureProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

// `ALL` must list every variant in declaration order so `slot()` indexes it.
const _: () = {
    let mut i = 0;
    while i < CaptureProperty::ALL.len() {
        assert!(CaptureProperty::ALL[i].slot() == i);
        i += 1;
    }
};

/// Values of all nine recognized properties.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StreamProperties {
    values: [f64; 9],
}

impl StreamProperties {
    /// Create a property set with every value at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `property`.
    pub fn get(&self, property: CaptureProperty) -> f64 {
        self.values[property.slot()]
    }

    /// Set the value of `property`.
    pub fn set(&mut self, property: CaptureProperty, value: f64) {
        self.values[property.slot()] = value;
    }

    /// Builder-style [`set`](StreamProperties::set).
    #[must_use]
    pub fn with(mut self, property: CaptureProperty, value: f64) -> Self {
        self.set(property, value);
        self
    }

    /// Iterate over `(property, value)` pairs in attribute order.
    pub fn iter(&self) -> impl Iterator<Item = (CaptureProperty, f64)> + '_ {
        CaptureProperty::ALL
            .into_iter()
            .map(|property| (property, self.get(property)))
    }

    /// Reported frame count as an integer slot count.
    ///
    /// Negative, NaN or fractional reports are truncated toward zero.
    pub fn frame_count(&self) -> u64 {
        let count = self.get(CaptureProperty::FrameCount);
        if count.is_finite() && count > 0.0 {
            count as u64
        } else {
            0
        }
    }

    /// Reported frame width.
    pub fn width(&self) -> f64 {
        self.get(CaptureProperty::FrameWidth)
    }

    /// Reported frame height.
    pub fn height(&self) -> f64 {
        self.get(CaptureProperty::FrameHeight)
    }

    /// Reported frame rate.
    pub fn fps(&self) -> f64 {
        self.get(CaptureProperty::Fps)
    }
}

