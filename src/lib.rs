use std::{
    fs::{self, File, OpenOptions},
    io::{Read, Write},
    path::{Path, PathBuf},
};

pub use cli::CLIParser;
pub use error::Error;
pub use crate::image::channel::{Channel, ChannelImage, ChannelImages};
pub use crate::image::{ContainerFormat, PixelBuffer};
pub use orchestrator::{Orchestrator, SplitOptions};

use crate::image::{
    reader::CodecImageReader,
    source::{FileDescriptor, SourceImage, MAX_FILE_SIZE_BYTES},
    splitter::ChannelSplitter,
    writer::CodecImageWriter,
};
use threadpool::ThreadPool;

mod cli;
mod error;
pub mod image;
mod logger;
pub mod orchestrator;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    input_file: PathBuf,
    output_directory: Option<PathBuf>,
    mime_type: Option<String>,
    number_of_threads: usize,
    parallel_threshold: usize,
    jpeg_quality: u8,
    print_data_urls: bool,
}

impl Arguments {
    pub fn print_data_urls(&self) -> bool {
        self.print_data_urls
    }
}

/// Splits an in-memory JPEG or PNG into its original, red, green and blue
/// images, all encoded in the container format of the input.
pub fn split(bytes: Vec<u8>, mime_type: &str, size_bytes: u64) -> Result<ChannelImages> {
    split_with_options(bytes, mime_type, size_bytes, &SplitOptions::default())
}

pub fn split_with_options(
    bytes: Vec<u8>,
    mime_type: &str,
    size_bytes: u64,
    options: &SplitOptions,
) -> Result<ChannelImages> {
    let descriptor = FileDescriptor::new(mime_type, size_bytes);
    let source = SourceImage::new("", descriptor, bytes)?;
    split_source(source, options)
}

/// Only images large enough to be split in parallel get a pool of workers.
fn create_threadpool(pixel_count: u64, options: &SplitOptions) -> Option<ThreadPool> {
    if options.number_of_threads > 1 && pixel_count >= options.parallel_threshold as u64 {
        Some(ThreadPool::new(options.number_of_threads))
    } else {
        None
    }
}

fn split_source(source: SourceImage, options: &SplitOptions) -> Result<ChannelImages> {
    let reader = CodecImageReader::new();
    let writer = CodecImageWriter::new(options.jpeg_quality);
    let (width, height) = reader.read_dimensions(source.bytes(), source.format())?;
    let threadpool = create_threadpool(width as u64 * height as u64, options);
    let splitter = match &threadpool {
        Some(threadpool) => ChannelSplitter::with_threadpool(threadpool, options.parallel_threshold),
        None => ChannelSplitter::new(),
    };
    Orchestrator::new(&reader, &writer, splitter).split(source)
}

pub struct SplitFileOutput {
    pub written_files: Vec<PathBuf>,
    pub images: ChannelImages,
}

fn path_to_string(file_path: &Path) -> String {
    file_path.display().to_string()
}

fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path)
        .map_err(|e| Error::UnableToOpenInputFileForReading(path_to_string(file_path), e))
}

fn open_output_file(file_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| Error::UnableToOpenOutputFileForWriting(path_to_string(file_path), e))
}

fn resolve_mime_type(arguments: &Arguments) -> Result<String> {
    if let Some(mime_type) = &arguments.mime_type {
        return Ok(mime_type.clone());
    }
    let extension = arguments
        .input_file
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or_default();
    ContainerFormat::from_extension(extension)
        .map(|format| format.mime_type().to_owned())
        .ok_or_else(|| Error::UnsupportedFormat(format!("file extension '{}'", extension)))
}

fn resolve_output_directory(arguments: &Arguments) -> PathBuf {
    match &arguments.output_directory {
        Some(directory) => directory.clone(),
        None => arguments
            .input_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

/// Reads at most one byte past the size ceiling, so oversized input is
/// rejected by [`SourceImage::new`] no matter what the metadata reported.
fn read_input_bytes(input: impl Read, size_bytes: u64, input_path: &Path) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(size_bytes.min(MAX_FILE_SIZE_BYTES) as usize);
    input
        .take(MAX_FILE_SIZE_BYTES + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| Error::FailedToReadInputFile(path_to_string(input_path), e))?;
    Ok(bytes)
}

fn read_source_image(arguments: &Arguments) -> Result<SourceImage> {
    let input_path = &arguments.input_file;
    let mut input_file = open_input_file(input_path)?;
    let size_bytes = input_file
        .metadata()
        .map_err(|e| Error::FailedToReadInputFile(path_to_string(input_path), e))?
        .len();
    let descriptor = crate::image::source::validate(FileDescriptor::new(
        resolve_mime_type(arguments)?,
        size_bytes,
    ))?;
    let bytes = read_input_bytes(input_file, size_bytes, input_path)?;
    let file_name = input_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    SourceImage::new(file_name, descriptor, bytes)
}

fn write_channel_image(path: &Path, image: &ChannelImage) -> Result<()> {
    let mut output_file = open_output_file(path)?;
    output_file
        .write_all(image.bytes())
        .map_err(|e| Error::FailedToWriteOutputFile(path_to_string(path), e))
}

/// Splits the input file and stores the four images as
/// `{channel}_{input file name}` in the output directory.
pub fn split_image_file(arguments: &Arguments) -> Result<SplitFileOutput> {
    let source = read_source_image(arguments)?;
    let file_name = source.file_name().to_owned();
    let images = split_source(source, &SplitOptions::from(arguments))?;
    let output_directory = resolve_output_directory(arguments);
    fs::create_dir_all(&output_directory).map_err(|e| {
        Error::UnableToOpenOutputFileForWriting(path_to_string(&output_directory), e)
    })?;
    let mut written_files = Vec::with_capacity(4);
    for image in images.iter() {
        let path = output_directory.join(image.file_name(&file_name));
        write_channel_image(&path, image)?;
        log::info!("Wrote {:?} image to '{}'", image.channel(), path.display());
        written_files.push(path);
    }
    Ok(SplitFileOutput {
        written_files,
        images,
    })
}
