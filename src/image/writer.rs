use super::{ContainerFormat, PixelBuffer};

mod codec;

pub use codec::{CodecImageWriter, DEFAULT_JPEG_QUALITY};

/// Encode capability: pixel buffer to container bytes of the given format.
pub trait ImageWriter {
    fn write_image(&self, buffer: &PixelBuffer, format: ContainerFormat)
        -> crate::Result<Vec<u8>>;
}
