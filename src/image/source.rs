use super::ContainerFormat;
use crate::error::Error;
use crate::Result;

pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// What the caller claims about a file before any of its content is looked at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileDescriptor {
    pub mime_type: String,
    pub size_bytes: u64,
}

impl FileDescriptor {
    pub fn new(mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            mime_type: mime_type.into(),
            size_bytes,
        }
    }
}

/// Checks the MIME type first, then the size ceiling.
pub fn validate(descriptor: FileDescriptor) -> Result<FileDescriptor> {
    ContainerFormat::from_mime_type(&descriptor.mime_type)?;
    check_size(descriptor.size_bytes)?;
    Ok(descriptor)
}

fn check_size(size_bytes: u64) -> Result<()> {
    if size_bytes > MAX_FILE_SIZE_BYTES {
        return Err(Error::FileTooLarge(size_bytes));
    }
    Ok(())
}

/// A validated input image. The bytes are kept exactly as submitted.
#[derive(Debug)]
pub struct SourceImage {
    file_name: String,
    format: ContainerFormat,
    size_bytes: u64,
    bytes: Vec<u8>,
}

impl SourceImage {
    pub fn new(
        file_name: impl Into<String>,
        descriptor: FileDescriptor,
        bytes: Vec<u8>,
    ) -> Result<Self> {
        let descriptor = validate(descriptor)?;
        check_size(bytes.len() as u64)?;
        let format = ContainerFormat::from_mime_type(&descriptor.mime_type)?;
        Ok(Self {
            file_name: file_name.into(),
            format,
            size_bytes: descriptor.size_bytes,
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn format(&self) -> ContainerFormat {
        self.format
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod test {
    use super::{validate, FileDescriptor, SourceImage, MAX_FILE_SIZE_BYTES};
    use crate::error::Error;
    use crate::image::ContainerFormat;

    #[test]
    fn accepts_jpeg_and_png() {
        for mime_type in ["image/jpeg", "image/png"] {
            let descriptor = FileDescriptor::new(mime_type, 1024);
            let validated = validate(descriptor.clone()).unwrap();
            assert_eq!(validated, descriptor);
        }
    }

    #[test]
    fn rejects_gif() {
        let result = validate(FileDescriptor::new("image/gif", 1024));
        assert!(matches!(result, Err(Error::UnsupportedFormat(ref m)) if m == "image/gif"));
    }

    #[test]
    fn rejects_file_over_ceiling() {
        let result = validate(FileDescriptor::new("image/png", 11_000_000));
        assert!(matches!(result, Err(Error::FileTooLarge(11_000_000))));
    }

    #[test]
    fn accepts_file_at_ceiling() {
        let result = validate(FileDescriptor::new("image/jpeg", MAX_FILE_SIZE_BYTES));
        assert!(result.is_ok());
    }

    #[test]
    fn format_is_checked_before_size() {
        let result = validate(FileDescriptor::new("image/gif", 11_000_000));
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn actual_length_is_checked_as_well() {
        let bytes = vec![0; MAX_FILE_SIZE_BYTES as usize + 1];
        let result = SourceImage::new("big.png", FileDescriptor::new("image/png", 10), bytes);
        assert!(matches!(result, Err(Error::FileTooLarge(_))));
    }

    #[test]
    fn source_keeps_bytes_untouched() {
        let bytes = vec![1, 2, 3];
        let source = SourceImage::new(
            "photo.jpg",
            FileDescriptor::new("image/jpeg", 3),
            bytes.clone(),
        )
        .unwrap();
        assert_eq!(source.format(), ContainerFormat::Jpeg);
        assert_eq!(source.file_name(), "photo.jpg");
        assert_eq!(source.into_bytes(), bytes);
    }
}
