use ::image::codecs::jpeg::JpegEncoder;
use ::image::codecs::png::PngEncoder;
use ::image::{ExtendedColorType, ImageEncoder};

use super::super::{ContainerFormat, PixelBuffer, ALPHA_OFFSET, SAMPLES_PER_PIXEL};
use super::ImageWriter;
use crate::error::Error;

/// Quality a browser canvas uses when exporting JPEG without an explicit one.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Encodes JPEG and PNG through the `image` crate codecs.
#[derive(Clone, Copy, Debug)]
pub struct CodecImageWriter {
    jpeg_quality: u8,
}

impl CodecImageWriter {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    fn write_png(buffer: &PixelBuffer, encoded: &mut Vec<u8>) -> ::image::ImageResult<()> {
        PngEncoder::new(encoded).write_image(
            buffer.samples(),
            buffer.width(),
            buffer.height(),
            ExtendedColorType::Rgba8,
        )
    }

    /// JPEG has no alpha channel, so the alpha samples are left out.
    fn write_jpeg(&self, buffer: &PixelBuffer, encoded: &mut Vec<u8>) -> ::image::ImageResult<()> {
        let rgb = strip_alpha(buffer.samples());
        JpegEncoder::new_with_quality(encoded, self.jpeg_quality).write_image(
            &rgb,
            buffer.width(),
            buffer.height(),
            ExtendedColorType::Rgb8,
        )
    }
}

impl Default for CodecImageWriter {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

fn strip_alpha(samples: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(samples.len() / SAMPLES_PER_PIXEL * ALPHA_OFFSET);
    for pixel in samples.chunks_exact(SAMPLES_PER_PIXEL) {
        rgb.extend_from_slice(&pixel[..ALPHA_OFFSET]);
    }
    rgb
}

impl ImageWriter for CodecImageWriter {
    fn write_image(
        &self,
        buffer: &PixelBuffer,
        format: ContainerFormat,
    ) -> crate::Result<Vec<u8>> {
        let mut encoded = Vec::new();
        let result = match format {
            ContainerFormat::Png => Self::write_png(buffer, &mut encoded),
            ContainerFormat::Jpeg => self.write_jpeg(buffer, &mut encoded),
        };
        result.map_err(|e| Error::EncodeError(format!("{} stream: {}", format, e)))?;
        log::debug!(
            "Encoded {}x{} buffer as {} of {} bytes",
            buffer.width(),
            buffer.height(),
            format,
            encoded.len()
        );
        Ok(encoded)
    }
}

#[cfg(test)]
mod test {
    use super::{strip_alpha, CodecImageWriter};
    use crate::image::reader::{CodecImageReader, ImageReader};
    use crate::image::writer::ImageWriter;
    use crate::image::{ContainerFormat, PixelBuffer};

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let samples = (0..width * height)
            .flat_map(|index| {
                let value = (index % 256) as u8;
                [value, value.wrapping_mul(3), 255 - value, value / 2]
            })
            .collect();
        PixelBuffer::new(width, height, samples).unwrap()
    }

    #[test]
    fn strip_alpha_keeps_color_samples() {
        assert_eq!(strip_alpha(&[1, 2, 3, 4, 5, 6, 7, 8]), vec![1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn png_round_trip_is_lossless() {
        let buffer = gradient(13, 7);
        let encoded = CodecImageWriter::default()
            .write_image(&buffer, ContainerFormat::Png)
            .unwrap();
        let decoded = CodecImageReader::new()
            .read_image(&encoded, ContainerFormat::Png)
            .unwrap();
        assert_eq!(decoded, buffer);
    }

    #[test]
    fn jpeg_round_trip_keeps_dimensions() {
        let buffer = gradient(24, 9);
        let encoded = CodecImageWriter::new(75)
            .write_image(&buffer, ContainerFormat::Jpeg)
            .unwrap();
        assert_eq!(&encoded[..2], &[0xFF, 0xD8], "JPEG start of image marker missing");
        let decoded = CodecImageReader::new()
            .read_image(&encoded, ContainerFormat::Jpeg)
            .unwrap();
        assert_eq!((decoded.width(), decoded.height()), (24, 9));
        assert!(decoded.pixels().all(|pixel| pixel[3] == 255));
    }

    #[test]
    fn png_output_carries_signature() {
        let encoded = CodecImageWriter::default()
            .write_image(&gradient(2, 2), ContainerFormat::Png)
            .unwrap();
        assert_eq!(&encoded[1..4], b"PNG");
    }
}
