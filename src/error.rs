use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    UnsupportedFormat(String),
    FileTooLarge(u64),
    DecodeError(String),
    EncodeError(String),
    PixelBufferLengthMismatch { expected: usize, actual: usize },
    PixelBufferDimensionsOverflow(u32, u32),
    UnableToOpenInputFileForReading(String, std::io::Error),
    FailedToReadInputFile(String, std::io::Error),
    UnableToOpenOutputFileForWriting(String, std::io::Error),
    FailedToWriteOutputFile(String, std::io::Error),
}

impl Error {
    /// Whether the caller can recover by submitting a different input.
    ///
    /// Encoding failures and broken pixel buffers happen after the input was
    /// accepted and decoded, so they point at an internal fault instead.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::EncodeError(_)
                | Self::PixelBufferLengthMismatch { .. }
                | Self::PixelBufferDimensionsOverflow(..)
        )
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFormat(mime_type) => {
                write!(
                    f,
                    "Unsupported format '{}'. Only image/jpeg and image/png are accepted.",
                    mime_type
                )
            }
            Self::FileTooLarge(size_bytes) => {
                write!(
                    f,
                    "File of {} bytes exceeds the limit of {} bytes",
                    size_bytes,
                    crate::image::source::MAX_FILE_SIZE_BYTES
                )
            }
            Self::DecodeError(reason) => write!(f, "Unable to decode image: {}", reason),
            Self::EncodeError(reason) => write!(f, "Unable to encode image: {}", reason),
            Self::PixelBufferLengthMismatch { expected, actual } => {
                write!(
                    f,
                    "Pixel buffer holds {} samples, but its dimensions require {}",
                    actual, expected
                )
            }
            Self::PixelBufferDimensionsOverflow(width, height) => {
                write!(
                    f,
                    "Pixel buffer of {}x{} pixels does not fit into memory",
                    width, height
                )
            }
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::FailedToReadInputFile(path, error) => {
                write!(f, "Failed to read input file '{}': {}", path, error)
            }
            Self::UnableToOpenOutputFileForWriting(path, error) => {
                write!(
                    f,
                    "Unable to open output file '{}' for writing: {}",
                    path, error
                )
            }
            Self::FailedToWriteOutputFile(path, error) => {
                write!(f, "Failed to write output file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnableToOpenInputFileForReading(_, error)
            | Self::FailedToReadInputFile(_, error)
            | Self::UnableToOpenOutputFileForWriting(_, error)
            | Self::FailedToWriteOutputFile(_, error) => Some(error),
            _ => None,
        }
    }
}
