use super::{ContainerFormat, PixelBuffer};

mod codec;

pub use codec::{CodecImageReader, MAX_DECODED_PIXELS};

/// Decode capability: container bytes of a declared format to a pixel buffer.
pub trait ImageReader {
    fn read_image(&self, bytes: &[u8], format: ContainerFormat) -> crate::Result<PixelBuffer>;
}
