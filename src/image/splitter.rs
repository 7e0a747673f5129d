use std::ops::Range;
use std::sync::{mpsc, Arc};

use threadpool::ThreadPool;

use super::{PixelBuffer, ALPHA_OFFSET, SAMPLES_PER_PIXEL};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorChannel {
    Red,
    Green,
    Blue,
}

impl ColorChannel {
    pub const ALL: [ColorChannel; 3] = [Self::Red, Self::Green, Self::Blue];

    /// Position of this channel's sample within an RGBA pixel.
    pub fn sample_offset(&self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }
}

/// The three single-channel buffers derived from one source buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitChannels {
    pub red: PixelBuffer,
    pub green: PixelBuffer,
    pub blue: PixelBuffer,
}

impl SplitChannels {
    pub fn channel(&self, channel: ColorChannel) -> &PixelBuffer {
        match channel {
            ColorChannel::Red => &self.red,
            ColorChannel::Green => &self.green,
            ColorChannel::Blue => &self.blue,
        }
    }
}

/// Splits a pixel buffer into red, green and blue images.
///
/// Every derived pixel keeps the source alpha and exactly one color sample,
/// the other two are zero. Pixels are independent of each other, so large
/// buffers are cut into contiguous pixel ranges and isolated on a thread
/// pool. The ranges are put back together in order, which makes the result
/// identical to the sequential one.
pub struct ChannelSplitter<'a> {
    threadpool: Option<&'a ThreadPool>,
    parallel_threshold: usize,
}

impl<'a> ChannelSplitter<'a> {
    pub fn new() -> Self {
        Self {
            threadpool: None,
            parallel_threshold: usize::MAX,
        }
    }

    /// Buffers with at least `parallel_threshold` pixels are split on `threadpool`.
    pub fn with_threadpool(threadpool: &'a ThreadPool, parallel_threshold: usize) -> Self {
        Self {
            threadpool: Some(threadpool),
            parallel_threshold,
        }
    }

    pub fn split(&self, buffer: &PixelBuffer) -> SplitChannels {
        SplitChannels {
            red: self.isolate(buffer, ColorChannel::Red),
            green: self.isolate(buffer, ColorChannel::Green),
            blue: self.isolate(buffer, ColorChannel::Blue),
        }
    }

    pub fn isolate(&self, buffer: &PixelBuffer, channel: ColorChannel) -> PixelBuffer {
        let samples = match self.parallel_threadpool(buffer) {
            Some(threadpool) => isolate_in_parallel(threadpool, buffer, channel),
            None => isolate_samples(buffer.samples(), channel),
        };
        buffer.derive(samples)
    }

    fn parallel_threadpool(&self, buffer: &PixelBuffer) -> Option<&'a ThreadPool> {
        self.threadpool.filter(|threadpool| {
            threadpool.max_count() > 1 && buffer.pixel_count() >= self.parallel_threshold
        })
    }
}

impl Default for ChannelSplitter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn isolate_samples(samples: &[u8], channel: ColorChannel) -> Vec<u8> {
    let offset = channel.sample_offset();
    let mut isolated = vec![0; samples.len()];
    for (source, target) in samples
        .chunks_exact(SAMPLES_PER_PIXEL)
        .zip(isolated.chunks_exact_mut(SAMPLES_PER_PIXEL))
    {
        target[offset] = source[offset];
        target[ALPHA_OFFSET] = source[ALPHA_OFFSET];
    }
    isolated
}

/// Sample ranges covering `pixel_count` pixels in at most `parts` pieces.
fn pixel_ranges(pixel_count: usize, parts: usize) -> Vec<Range<usize>> {
    if pixel_count == 0 {
        return Vec::new();
    }
    let pixels_per_range = pixel_count.div_ceil(parts.max(1));
    (0..pixel_count)
        .step_by(pixels_per_range)
        .map(|start| {
            let end = usize::min(start + pixels_per_range, pixel_count);
            start * SAMPLES_PER_PIXEL..end * SAMPLES_PER_PIXEL
        })
        .collect()
}

fn isolate_in_parallel(
    threadpool: &ThreadPool,
    buffer: &PixelBuffer,
    channel: ColorChannel,
) -> Vec<u8> {
    let samples = buffer.shared_samples();
    let ranges = pixel_ranges(buffer.pixel_count(), threadpool.max_count());
    let (sender, receiver) = mpsc::channel();
    for (index, range) in ranges.iter().cloned().enumerate() {
        let sender = sender.clone();
        let samples = Arc::clone(&samples);
        threadpool.execute(move || {
            let isolated = isolate_samples(&samples[range], channel);
            // the receiver only disappears when the caller is gone
            let _ = sender.send((index, isolated));
        });
    }
    drop(sender);

    let mut pieces: Vec<Option<Vec<u8>>> = vec![None; ranges.len()];
    for (index, isolated) in receiver.iter() {
        pieces[index] = Some(isolated);
    }
    log::debug!(
        "Isolated {:?} channel in {} ranges on {} threads",
        channel,
        ranges.len(),
        threadpool.max_count()
    );

    let mut isolated = Vec::with_capacity(samples.len());
    for (piece, range) in pieces.into_iter().zip(ranges) {
        match piece {
            Some(piece) => isolated.extend_from_slice(&piece),
            None => {
                log::warn!(
                    "Worker for samples {:?} of {:?} channel died, isolating on caller thread",
                    range,
                    channel
                );
                isolated.extend(isolate_samples(&samples[range], channel));
            }
        }
    }
    isolated
}

#[cfg(test)]
mod test {
    use threadpool::ThreadPool;

    use super::{pixel_ranges, ChannelSplitter, ColorChannel};
    use crate::image::PixelBuffer;

    fn pixels_of(buffer: &PixelBuffer) -> Vec<[u8; 4]> {
        buffer.pixels().collect()
    }

    fn noise(width: u32, height: u32) -> PixelBuffer {
        let mut state: u32 = 0x1234_5678;
        let samples = (0..width as usize * height as usize * 4)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state >> 24) as u8
            })
            .collect();
        PixelBuffer::new(width, height, samples).unwrap()
    }

    #[test]
    fn splits_two_pixel_image() {
        let buffer = PixelBuffer::new(2, 1, vec![10, 20, 30, 255, 40, 50, 60, 0]).unwrap();
        let channels = ChannelSplitter::new().split(&buffer);
        assert_eq!(pixels_of(&channels.red), [[10, 0, 0, 255], [40, 0, 0, 0]]);
        assert_eq!(pixels_of(&channels.green), [[0, 20, 0, 255], [0, 50, 0, 0]]);
        assert_eq!(pixels_of(&channels.blue), [[0, 0, 30, 255], [0, 0, 60, 0]]);
    }

    #[test]
    fn transparent_image_stays_transparent() {
        let samples = [200, 100, 50, 0].repeat(6);
        let buffer = PixelBuffer::new(3, 2, samples).unwrap();
        let channels = ChannelSplitter::new().split(&buffer);
        for channel in ColorChannel::ALL {
            let derived = channels.channel(channel);
            assert_eq!((derived.width(), derived.height()), (3, 2));
            assert!(derived.pixels().all(|pixel| pixel[3] == 0));
        }
    }

    #[test]
    fn isolate_single_channel() {
        let buffer = PixelBuffer::new(1, 1, vec![1, 2, 3, 4]).unwrap();
        let green = ChannelSplitter::new().isolate(&buffer, ColorChannel::Green);
        assert_eq!(green.samples(), &[0, 2, 0, 4]);
    }

    #[test]
    fn ranges_cover_all_pixels() {
        let ranges = pixel_ranges(10, 3);
        assert_eq!(ranges, vec![0..16, 16..32, 32..40]);
        assert!(pixel_ranges(0, 4).is_empty());
        assert_eq!(pixel_ranges(2, 8), vec![0..4, 4..8]);
    }

    #[test]
    fn parallel_split_matches_sequential() {
        let buffer = noise(37, 23);
        let threadpool = ThreadPool::new(4);
        let parallel = ChannelSplitter::with_threadpool(&threadpool, 0).split(&buffer);
        let sequential = ChannelSplitter::new().split(&buffer);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn small_buffer_stays_below_threshold() {
        let buffer = noise(4, 4);
        let threadpool = ThreadPool::new(2);
        let splitter = ChannelSplitter::with_threadpool(&threadpool, 17);
        assert!(splitter.parallel_threadpool(&buffer).is_none());
        let splitter = ChannelSplitter::with_threadpool(&threadpool, 16);
        assert!(splitter.parallel_threadpool(&buffer).is_some());
    }

    #[test]
    fn split_is_deterministic() {
        let buffer = noise(64, 16);
        let threadpool = ThreadPool::new(3);
        let splitter = ChannelSplitter::with_threadpool(&threadpool, 1);
        assert_eq!(splitter.split(&buffer), splitter.split(&buffer));
    }
}
