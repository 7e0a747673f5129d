use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::splitter::ColorChannel;
use super::ContainerFormat;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Original,
    Red,
    Green,
    Blue,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }
}

impl From<ColorChannel> for Channel {
    fn from(value: ColorChannel) -> Self {
        match value {
            ColorChannel::Red => Self::Red,
            ColorChannel::Green => Self::Green,
            ColorChannel::Blue => Self::Blue,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
    format: ContainerFormat,
}

impl EncodedImage {
    pub fn new(bytes: Vec<u8>, format: ContainerFormat) -> Self {
        Self { bytes, format }
    }
}

/// One output of a split request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelImage {
    Original(EncodedImage),
    Red(EncodedImage),
    Green(EncodedImage),
    Blue(EncodedImage),
}

impl ChannelImage {
    pub fn new(channel: Channel, image: EncodedImage) -> Self {
        match channel {
            Channel::Original => Self::Original(image),
            Channel::Red => Self::Red(image),
            Channel::Green => Self::Green(image),
            Channel::Blue => Self::Blue(image),
        }
    }

    pub fn channel(&self) -> Channel {
        match self {
            Self::Original(_) => Channel::Original,
            Self::Red(_) => Channel::Red,
            Self::Green(_) => Channel::Green,
            Self::Blue(_) => Channel::Blue,
        }
    }

    fn encoded(&self) -> &EncodedImage {
        match self {
            Self::Original(image) | Self::Red(image) | Self::Green(image) | Self::Blue(image) => {
                image
            }
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.encoded().bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Original(image) | Self::Red(image) | Self::Green(image) | Self::Blue(image) => {
                image.bytes
            }
        }
    }

    pub fn format(&self) -> ContainerFormat {
        self.encoded().format
    }

    /// Name under which this image is stored next to its source, e.g.
    /// `red_photo.png` for `photo.png`.
    pub fn file_name(&self, source_file_name: &str) -> String {
        format!("{}_{}", self.channel().as_str(), source_file_name)
    }

    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format().mime_type(),
            STANDARD.encode(self.bytes())
        )
    }
}

/// The original image and its three channel images, all in one container format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelImages {
    pub original: ChannelImage,
    pub red: ChannelImage,
    pub green: ChannelImage,
    pub blue: ChannelImage,
}

impl ChannelImages {
    pub fn iter(&self) -> impl Iterator<Item = &ChannelImage> {
        [&self.original, &self.red, &self.green, &self.blue].into_iter()
    }
}
