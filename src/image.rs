use std::fmt::Display;
use std::sync::Arc;

use crate::error::Error;
use crate::Result;

pub mod channel;
pub mod reader;
pub mod source;
pub mod splitter;
pub mod writer;

pub const SAMPLES_PER_PIXEL: usize = 4;
pub const ALPHA_OFFSET: usize = 3;

/// Container formats accepted as input and produced as output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    Jpeg,
    Png,
}

const JPEG_MIME_TYPE: &str = "image/jpeg";
const PNG_MIME_TYPE: &str = "image/png";

impl ContainerFormat {
    /// Maps a MIME type onto a container format. Only the exact strings
    /// `image/jpeg` and `image/png` are accepted.
    pub fn from_mime_type(mime_type: &str) -> Result<Self> {
        match mime_type {
            JPEG_MIME_TYPE => Ok(Self::Jpeg),
            PNG_MIME_TYPE => Ok(Self::Png),
            other => Err(Error::UnsupportedFormat(other.to_owned())),
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => JPEG_MIME_TYPE,
            Self::Png => PNG_MIME_TYPE,
        }
    }

    pub(crate) fn image_format(&self) -> ::image::ImageFormat {
        match self {
            Self::Jpeg => ::image::ImageFormat::Jpeg,
            Self::Png => ::image::ImageFormat::Png,
        }
    }
}

impl Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jpeg => write!(f, "JPEG"),
            Self::Png => write!(f, "PNG"),
        }
    }
}

/// Decoded RGBA image, 8 bits per sample, stored row by row.
///
/// The samples are never mutated after construction. They are reference
/// counted so the splitter can hand them to worker threads without copying.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    samples: Arc<[u8]>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, samples: Vec<u8>) -> Result<Self> {
        let expected = Self::required_length(width, height)?;
        if samples.len() != expected {
            return Err(Error::PixelBufferLengthMismatch {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples: samples.into(),
        })
    }

    fn required_length(width: u32, height: u32) -> Result<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(SAMPLES_PER_PIXEL))
            .ok_or(Error::PixelBufferDimensionsOverflow(width, height))
    }

    /// Creates a buffer of the same dimensions holding `samples`.
    pub(crate) fn derive(&self, samples: Vec<u8>) -> Self {
        debug_assert_eq!(samples.len(), self.samples.len());
        Self {
            width: self.width,
            height: self.height,
            samples: samples.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.samples.len() / SAMPLES_PER_PIXEL
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub(crate) fn shared_samples(&self) -> Arc<[u8]> {
        Arc::clone(&self.samples)
    }

    /// RGBA tuples in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; SAMPLES_PER_PIXEL]> + '_ {
        self.samples
            .chunks_exact(SAMPLES_PER_PIXEL)
            .map(|pixel| [pixel[0], pixel[1], pixel[2], pixel[3]])
    }

    pub fn pixel(&self, column_index: u32, row_index: u32) -> Option<[u8; SAMPLES_PER_PIXEL]> {
        if column_index >= self.width || row_index >= self.height {
            return None;
        }
        let index = (row_index as usize * self.width as usize + column_index as usize)
            * SAMPLES_PER_PIXEL;
        let pixel = &self.samples[index..index + SAMPLES_PER_PIXEL];
        Some([pixel[0], pixel[1], pixel[2], pixel[3]])
    }
}
