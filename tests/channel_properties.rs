use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use proptest::prelude::*;
use rgb_channel_splitter::image::splitter::{ChannelSplitter, ColorChannel};
use rgb_channel_splitter::{split_with_options, ContainerFormat, Error, PixelBuffer, SplitOptions};
use threadpool::ThreadPool;

fn pixel_buffer() -> impl Strategy<Value = PixelBuffer> {
    (1u32..12, 1u32..12)
        .prop_flat_map(|(width, height)| {
            let length = width as usize * height as usize * 4;
            (
                Just(width),
                Just(height),
                prop::collection::vec(any::<u8>(), length),
            )
        })
        .prop_map(|(width, height, samples)| {
            PixelBuffer::new(width, height, samples).expect("Strategy keeps length consistent")
        })
}

proptest! {
    #[test]
    fn derived_buffers_keep_dimensions(buffer in pixel_buffer()) {
        let channels = ChannelSplitter::new().split(&buffer);
        for channel in ColorChannel::ALL {
            let derived = channels.channel(channel);
            prop_assert_eq!(derived.width(), buffer.width());
            prop_assert_eq!(derived.height(), buffer.height());
            prop_assert_eq!(derived.samples().len(), buffer.samples().len());
        }
    }

    #[test]
    fn each_channel_keeps_only_its_sample_and_alpha(buffer in pixel_buffer()) {
        let channels = ChannelSplitter::new().split(&buffer);
        for channel in ColorChannel::ALL {
            let offset = channel.sample_offset();
            for (source, derived) in buffer.pixels().zip(channels.channel(channel).pixels()) {
                for index in 0..3 {
                    let expected = if index == offset { source[index] } else { 0 };
                    prop_assert_eq!(derived[index], expected);
                }
                prop_assert_eq!(derived[3], source[3]);
            }
        }
    }

    #[test]
    fn parallel_split_is_identical_to_sequential(buffer in pixel_buffer(), threads in 1usize..6) {
        let threadpool = ThreadPool::new(threads);
        let parallel = ChannelSplitter::with_threadpool(&threadpool, 0).split(&buffer);
        let sequential = ChannelSplitter::new().split(&buffer);
        prop_assert_eq!(parallel, sequential);
    }

    #[test]
    fn repeated_split_is_identical(buffer in pixel_buffer()) {
        let splitter = ChannelSplitter::new();
        prop_assert_eq!(splitter.split(&buffer), splitter.split(&buffer));
    }
}

#[test]
fn fully_transparent_buffer_is_split() {
    let buffer = PixelBuffer::new(5, 3, [90, 120, 150, 0].repeat(15)).unwrap();
    let channels = ChannelSplitter::new().split(&buffer);
    for channel in ColorChannel::ALL {
        let derived = channels.channel(channel);
        assert_eq!((derived.width(), derived.height()), (5, 3));
        assert!(derived.pixels().all(|pixel| pixel[3] == 0));
    }
}

#[test]
fn gif_is_rejected_at_the_boundary() {
    let result = split_with_options(vec![0; 4], "image/gif", 4, &SplitOptions::default());
    assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
}

#[test]
fn oversized_input_is_rejected_at_the_boundary() {
    let result = rgb_channel_splitter::split(vec![0; 4], "image/jpeg", 11_000_000);
    assert!(matches!(result, Err(Error::FileTooLarge(11_000_000))));
}

#[test]
fn corrupt_jpeg_is_a_decode_error() {
    let bytes = vec![0xFF, 0xD8, 0xFF, 0xDB, 0x00];
    let result = rgb_channel_splitter::split(bytes, "image/jpeg", 5);
    assert!(matches!(result, Err(Error::DecodeError(_))));
}

#[test]
fn jpeg_outputs_stay_jpeg() {
    let rgb: Vec<u8> = [200, 100, 50].repeat(64);
    let mut bytes = Vec::new();
    JpegEncoder::new(&mut bytes)
        .encode(&rgb, 8, 8, ExtendedColorType::Rgb8)
        .expect("JPEG fixture must encode");
    let size = bytes.len() as u64;
    let images = rgb_channel_splitter::split(bytes.clone(), "image/jpeg", size).unwrap();
    assert_eq!(images.original.bytes(), bytes.as_slice());
    for image in images.iter() {
        assert_eq!(image.format(), ContainerFormat::Jpeg);
        assert_eq!(&image.bytes()[..2], &[0xFF, 0xD8]);
    }
}
