use std::io::Cursor;

use ::image::{ColorType, DynamicImage, GenericImageView};

use super::super::{ContainerFormat, PixelBuffer};
use super::ImageReader;
use crate::error::Error;

/// Largest decoded image accepted, 8K UHD. Its RGBA buffer and the three
/// channel buffers split from it stay below 512 MiB together.
pub const MAX_DECODED_PIXELS: u64 = 7680 * 4320;

/// Decodes JPEG and PNG through the `image` crate codecs.
#[derive(Clone, Copy, Debug)]
pub struct CodecImageReader {
    max_pixels: u64,
}

impl CodecImageReader {
    pub fn new() -> Self {
        Self::with_max_pixels(MAX_DECODED_PIXELS)
    }

    pub fn with_max_pixels(max_pixels: u64) -> Self {
        Self { max_pixels }
    }

    /// Reads the dimensions from the container header without decoding any
    /// pixel data.
    pub fn read_dimensions(
        &self,
        bytes: &[u8],
        format: ContainerFormat,
    ) -> crate::Result<(u32, u32)> {
        let (width, height) =
            ::image::ImageReader::with_format(Cursor::new(bytes), format.image_format())
                .into_dimensions()
                .map_err(|e| Error::DecodeError(format!("{} header: {}", format, e)))?;
        Self::check_area(width, height)?;
        self.check_pixel_limit(width, height)?;
        Ok((width, height))
    }

    fn decode(bytes: &[u8], format: ContainerFormat) -> crate::Result<DynamicImage> {
        ::image::ImageReader::with_format(Cursor::new(bytes), format.image_format())
            .decode()
            .map_err(|e| Error::DecodeError(format!("{} stream: {}", format, e)))
    }

    fn check_sample_depth(color_type: ColorType) -> crate::Result<()> {
        match color_type {
            ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => Ok(()),
            other => Err(Error::DecodeError(format!(
                "samples of type {:?} are not 8 bits per channel",
                other
            ))),
        }
    }

    fn check_area(width: u32, height: u32) -> crate::Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::DecodeError(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }
        Ok(())
    }

    fn check_pixel_limit(&self, width: u32, height: u32) -> crate::Result<()> {
        let pixels = width as u64 * height as u64;
        if pixels > self.max_pixels {
            return Err(Error::DecodeError(format!(
                "image of {}x{} has {} pixels, more than the limit of {}",
                width, height, pixels, self.max_pixels
            )));
        }
        Ok(())
    }
}

impl Default for CodecImageReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for CodecImageReader {
    fn read_image(&self, bytes: &[u8], format: ContainerFormat) -> crate::Result<PixelBuffer> {
        self.read_dimensions(bytes, format)?;
        let decoded = Self::decode(bytes, format)?;
        Self::check_sample_depth(decoded.color())?;
        let (width, height) = decoded.dimensions();
        Self::check_area(width, height)?;
        self.check_pixel_limit(width, height)?;
        log::debug!("Decoded {} image of {}x{} pixels", format, width, height);
        PixelBuffer::new(width, height, decoded.into_rgba8().into_raw())
    }
}
