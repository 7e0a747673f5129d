use std::thread;
use std::time::Instant;

use crate::image::channel::{Channel, ChannelImage, ChannelImages, EncodedImage};
use crate::image::reader::ImageReader;
use crate::image::source::{FileDescriptor, SourceImage};
use crate::image::splitter::{ChannelSplitter, ColorChannel};
use crate::image::writer::{ImageWriter, DEFAULT_JPEG_QUALITY};
use crate::image::{ContainerFormat, PixelBuffer};
use crate::{logger, Arguments, Result};

pub const DEFAULT_PARALLEL_THRESHOLD: usize = 512 * 512;

pub struct SplitOptions {
    pub number_of_threads: usize,
    /// Smallest pixel count that is split on the thread pool.
    pub parallel_threshold: usize,
    pub jpeg_quality: u8,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            number_of_threads: thread::available_parallelism()
                .map(|threads| threads.get())
                .unwrap_or(1),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl From<&Arguments> for SplitOptions {
    fn from(value: &Arguments) -> Self {
        Self {
            number_of_threads: value.number_of_threads,
            parallel_threshold: value.parallel_threshold,
            jpeg_quality: value.jpeg_quality,
        }
    }
}

/// Runs one split request: decode, split into three channel buffers, encode
/// each of them in the container format of the source.
///
/// All intermediate buffers are locals of [`Orchestrator::split`] and are
/// released on every return path, including failures part way through.
pub struct Orchestrator<'a, R, W> {
    reader: &'a R,
    writer: &'a W,
    splitter: ChannelSplitter<'a>,
}

impl<'a, R: ImageReader, W: ImageWriter> Orchestrator<'a, R, W> {
    pub fn new(reader: &'a R, writer: &'a W, splitter: ChannelSplitter<'a>) -> Self {
        Self {
            reader,
            writer,
            splitter,
        }
    }

    /// Validates the descriptor before anything is decoded.
    pub fn split_bytes(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        mime_type: &str,
        size_bytes: u64,
    ) -> Result<ChannelImages> {
        let descriptor = FileDescriptor::new(mime_type, size_bytes);
        let source = SourceImage::new(file_name, descriptor, bytes)?;
        self.split(source)
    }

    pub fn split(&self, source: SourceImage) -> Result<ChannelImages> {
        let format = source.format();

        let start = Instant::now();
        let buffer = self.reader.read_image(source.bytes(), format)?;
        log::debug!("Decoding took {} microseconds", start.elapsed().as_micros());
        let (width, height) = (buffer.width(), buffer.height());

        let start = Instant::now();
        let channels = self.splitter.split(&buffer);
        drop(buffer);
        log::debug!("Splitting took {} microseconds", start.elapsed().as_micros());

        let start = Instant::now();
        let red = self.encode(&channels.red, ColorChannel::Red, format)?;
        let green = self.encode(&channels.green, ColorChannel::Green, format)?;
        let blue = self.encode(&channels.blue, ColorChannel::Blue, format)?;
        drop(channels);
        log::debug!("Encoding took {} microseconds", start.elapsed().as_micros());

        let file_name = source.file_name().to_owned();
        let original = ChannelImage::new(
            Channel::Original,
            EncodedImage::new(source.into_bytes(), format),
        );
        let images = ChannelImages {
            original,
            red,
            green,
            blue,
        };
        let encoded_sizes: Vec<usize> = images.iter().map(|image| image.bytes().len()).collect();
        logger::log_split_summary(&file_name, width, height, &encoded_sizes);
        Ok(images)
    }

    fn encode(
        &self,
        buffer: &PixelBuffer,
        channel: ColorChannel,
        format: ContainerFormat,
    ) -> Result<ChannelImage> {
        let bytes = self.writer.write_image(buffer, format)?;
        Ok(ChannelImage::new(
            Channel::from(channel),
            EncodedImage::new(bytes, format),
        ))
    }
}
