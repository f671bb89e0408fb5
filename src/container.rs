//! HDF5 frame containers.
//!
//! One container is written per input video. It holds a single
//! fixed-length dataset, `VideoFrames`, whose element `i` is the PNG byte
//! stream of frame `i` (empty if that frame was never written), plus one
//! scalar `f64` attribute per [`CaptureProperty`] on that dataset.
//!
//! [`FrameContainer`] writes a container in increasing frame order;
//! [`ContainerReader`] reads one back.
//!
//! # Example
//!
//! ```no_run
//! use framepack::ContainerReader;
//!
//! let reader = ContainerReader::open("input.h5")?;
//! println!("{} slots, {} written", reader.len(), reader.written_frames()?);
//! if let Some(frame) = reader.frame(0)? {
//!     frame.save("first_frame.png")?;
//! }
//! # Ok::<(), framepack::FramepackError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use hdf5::{Dataset, File, types::VarLenArray};
use image::RgbImage;

use crate::{
    configuration::DATASET_NAME,
    encoding::decode_png,
    error::FramepackError,
    properties::{CaptureProperty, StreamProperties},
};

/// Writer for one frame container.
///
/// The dataset length is fixed at creation and never resized. Frames must be
/// written in strictly increasing index order.
pub struct FrameContainer {
    file: File,
    dataset: Dataset,
    path: PathBuf,
    frame_count: u64,
    next_index: u64,
    frames_written: u64,
}

impl Debug for FrameContainer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FrameContainer")
            .field("path", &self.path)
            .field("frame_count", &self.frame_count)
            .field("next_index", &self.next_index)
            .field("frames_written", &self.frames_written)
            .finish_non_exhaustive()
    }
}

impl FrameContainer {
    /// Create a container at `path` with `frame_count` empty frame slots.
    ///
    /// Any existing file at `path` is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`FramepackError::ContainerCreate`] if the file or the
    /// dataset cannot be created.
    pub fn create<P: AsRef<Path>>(path: P, frame_count: u64) -> Result<Self, FramepackError> {
        let path = path.as_ref().to_path_buf();
        let create_error = |error: hdf5::Error| FramepackError::ContainerCreate {
            path: path.clone(),
            reason: error.to_string(),
        };

        let file = File::create(&path).map_err(create_error)?;
        let dataset = file
            .new_dataset::<VarLenArray<u8>>()
            .shape(frame_count as usize)
            .create(DATASET_NAME)
            .map_err(create_error)?;

        log::debug!(
            "Created container {} with {frame_count} frame slots",
            path.display(),
        );

        Ok(Self {
            file,
            dataset,
            path,
            frame_count,
            next_index: 0,
            frames_written: 0,
        })
    }

    /// Attach `value` as the scalar attribute for `property`.
    ///
    /// Setting a property twice overwrites the earlier value.
    pub fn set_attribute(
        &mut self,
        property: CaptureProperty,
        value: f64,
    ) -> Result<(), FramepackError> {
        let name = property.name();
        let attribute = match self.dataset.attr(name) {
            Ok(existing) => existing,
            Err(_) => self
                .dataset
                .new_attr::<f64>()
                .shape(())
                .create(name)
                .map_err(|error| {
                    FramepackError::ContainerWrite(format!(
                        "cannot create attribute {name} in {}: {error}",
                        self.path.display()
                    ))
                })?,
        };

        attribute.write_scalar(&value).map_err(|error| {
            FramepackError::ContainerWrite(format!(
                "cannot write attribute {name} in {}: {error}",
                self.path.display()
            ))
        })
    }

    /// Attach every property in `properties`.
    pub fn set_attributes(&mut self, properties: &StreamProperties) -> Result<(), FramepackError> {
        for (property, value) in properties.iter() {
            self.set_attribute(property, value)?;
        }
        Ok(())
    }

    /// Store the encoded frame `bytes` at `index`.
    ///
    /// # Errors
    ///
    /// - [`FramepackError::IndexOutOfRange`] if `index` is not below the
    ///   dataset length.
    /// - [`FramepackError::ContainerWrite`] if `index` does not follow the
    ///   previously written index, or the write itself fails.
    pub fn write_frame(&mut self, index: u64, bytes: &[u8]) -> Result<(), FramepackError> {
        if index >= self.frame_count {
            return Err(FramepackError::IndexOutOfRange {
                index,
                frame_count: self.frame_count,
            });
        }
        if index < self.next_index {
            return Err(FramepackError::ContainerWrite(format!(
                "frame {index} written out of order in {} (next index is {})",
                self.path.display(),
                self.next_index,
            )));
        }

        let element = VarLenArray::from_slice(bytes);
        let slot = index as usize;
        self.dataset
            .write_slice(std::slice::from_ref(&element), slot..slot + 1)
            .map_err(|error| {
                FramepackError::ContainerWrite(format!(
                    "cannot write frame {index} to {}: {error}",
                    self.path.display()
                ))
            })?;

        self.next_index = index + 1;
        self.frames_written += 1;
        Ok(())
    }

    /// Length of the frame dataset.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Path of the container file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and close the file. No further writes are possible.
    pub fn close(self) -> Result<(), FramepackError> {
        let Self {
            file,
            dataset,
            path,
            frames_written,
            frame_count,
            ..
        } = self;
        drop(dataset);

        let close_error = |error: hdf5::Error| {
            FramepackError::ContainerWrite(format!("cannot close {}: {error}", path.display()))
        };
        file.flush().map_err(close_error)?;
        file.close().map_err(close_error)?;

        log::debug!(
            "Closed container {} ({frames_written}/{frame_count} frames written)",
            path.display(),
        );
        Ok(())
    }
}

/// Read access to a container written by [`FrameContainer`].
pub struct ContainerReader {
    // Keeps the file open for the lifetime of `dataset`.
    _file: File,
    dataset: Dataset,
    path: PathBuf,
    len: u64,
}

impl Debug for ContainerReader {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ContainerReader")
            .field("path", &self.path)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl ContainerReader {
    /// Open the container at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FramepackError> {
        let path = path.as_ref().to_path_buf();
        let read_error = |error: hdf5::Error| {
            FramepackError::ContainerRead(format!("{}: {error}", path.display()))
        };

        let file = File::open(&path).map_err(read_error)?;
        let dataset = file.dataset(DATASET_NAME).map_err(read_error)?;
        let len = dataset.size() as u64;

        Ok(Self {
            _file: file,
            dataset,
            path,
            len,
        })
    }

    /// Length of the frame dataset.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the frame dataset has zero slots.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Names of all attributes on the frame dataset.
    pub fn attribute_names(&self) -> Result<Vec<String>, FramepackError> {
        self.dataset.attr_names().map_err(|error| self.read_error(error))
    }

    /// Value of the attribute called `name`.
    pub fn attribute(&self, name: &str) -> Result<f64, FramepackError> {
        self.dataset
            .attr(name)
            .and_then(|attribute| attribute.read_scalar::<f64>())
            .map_err(|error| self.read_error(error))
    }

    /// All nine stream properties stored on the dataset.
    pub fn properties(&self) -> Result<StreamProperties, FramepackError> {
        let mut properties = StreamProperties::new();
        for property in CaptureProperty::ALL {
            properties.set(property, self.attribute(property.name())?);
        }
        Ok(properties)
    }

    /// Stored bytes of frame `index`; empty if the slot was never written.
    pub fn frame_bytes(&self, index: u64) -> Result<Vec<u8>, FramepackError> {
        if index >= self.len {
            return Err(FramepackError::IndexOutOfRange {
                index,
                frame_count: self.len,
            });
        }

        let slot = index as usize;
        let elements = self
            .dataset
            .read_slice_1d::<VarLenArray<u8>, _>(slot..slot + 1)
            .map_err(|error| self.read_error(error))?;
        Ok(elements
            .iter()
            .next()
            .map(|element| element.as_slice().to_vec())
            .unwrap_or_default())
    }

    /// Decoded frame `index`, or `None` if the slot was never written.
    pub fn frame(&self, index: u64) -> Result<Option<RgbImage>, FramepackError> {
        let bytes = self.frame_bytes(index)?;
        if bytes.is_empty() {
            return Ok(None);
        }
        decode_png(&bytes).map(Some)
    }

    /// Number of non-empty frame slots.
    pub fn written_frames(&self) -> Result<u64, FramepackError> {
        let elements = self
            .dataset
            .read_raw::<VarLenArray<u8>>()
            .map_err(|error| self.read_error(error))?;
        Ok(elements.iter().filter(|element| !element.as_slice().is_empty()).count() as u64)
    }

    fn read_error(&self, error: hdf5::Error) -> FramepackError {
        FramepackError::ContainerRead(format!("{}: {error}", self.path.display()))
    }
}
