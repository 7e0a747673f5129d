use std::thread;
use std::time::{Duration, Instant};

use rgb_channel_splitter::image::splitter::ChannelSplitter;
use rgb_channel_splitter::PixelBuffer;
use threadpool::ThreadPool;

const IMAGE_WIDTH: u32 = 3840;
const IMAGE_HEIGHT: u32 = 2160;
const NUMBER_OF_ROUNDS: u32 = 10;

fn create_test_buffer() -> PixelBuffer {
    let samples = (0..IMAGE_WIDTH * IMAGE_HEIGHT)
        .flat_map(|index| {
            let x = index % IMAGE_WIDTH;
            let y = index / IMAGE_WIDTH;
            [(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255]
        })
        .collect();
    PixelBuffer::new(IMAGE_WIDTH, IMAGE_HEIGHT, samples).expect("Test buffer dimensions are valid")
}

fn measure(name: &str, splitter: &ChannelSplitter, buffer: &PixelBuffer) -> Duration {
    let mut durations: Vec<Duration> = Vec::new();
    for round in 1..=NUMBER_OF_ROUNDS {
        let start = Instant::now();
        let channels = splitter.split(buffer);
        let duration = start.elapsed();
        drop(channels);
        println!(
            "{}: finished round {} after {} microseconds",
            name,
            round,
            duration.as_micros()
        );
        durations.push(duration);
    }
    durations.iter().sum::<Duration>() / NUMBER_OF_ROUNDS
}

fn main() {
    println!("Creating {}x{} test buffer", IMAGE_WIDTH, IMAGE_HEIGHT);
    let buffer = create_test_buffer();

    let sequential = measure("sequential", &ChannelSplitter::new(), &buffer);

    let threads = thread::available_parallelism().map_or(1, |n| n.get());
    let threadpool = ThreadPool::new(threads);
    let parallel = measure(
        "parallel",
        &ChannelSplitter::with_threadpool(&threadpool, 0),
        &buffer,
    );

    println!(
        "Average sequential: {}, Average parallel on {} threads: {}",
        sequential.as_micros(),
        threads,
        parallel.as_micros(),
    );
}
