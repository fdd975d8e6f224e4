//! Raster formats accepted as sources and produced as variants.
//!
//! | Format | Decoder | Encoder parameters |
//! |---|---|---|
//! | `bmp` | `image::ImageFormat::Bmp` | compression on |
//! | `gif` | `image::ImageFormat::Gif` | none |
//! | `jpg` | `image::ImageFormat::Jpeg` | quality 75 |
//! | `png` | `image::ImageFormat::Png` | none |
//! | `tiff` | `image::ImageFormat::Tiff` | none |
//! | `webp` | `image::ImageFormat::WebP` | none (lossless) |
//!
//! Extensions are matched exactly: `jpeg` and `JPG` are not recognized.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Bmp,
    Gif,
    Jpg,
    Png,
    Tiff,
    Webp,
}

/// Encoder settings for a produced variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeParams {
    Bmp { compression: bool },
    Gif,
    Jpeg { quality: u8 },
    Png,
    Tiff,
    WebP,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 6] = [
        ImageFormat::Bmp,
        ImageFormat::Gif,
        ImageFormat::Jpg,
        ImageFormat::Png,
        ImageFormat::Tiff,
        ImageFormat::Webp,
    ];

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Bmp => "bmp",
            ImageFormat::Gif => "gif",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Webp => "webp",
        }
    }

    /// Format handed to the decoder.
    pub fn decoding_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::Jpg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Tiff => image::ImageFormat::Tiff,
            ImageFormat::Webp => image::ImageFormat::WebP,
        }
    }

    pub fn encode_params(self) -> EncodeParams {
        match self {
            ImageFormat::Bmp => EncodeParams::Bmp { compression: true },
            ImageFormat::Gif => EncodeParams::Gif,
            ImageFormat::Jpg => EncodeParams::Jpeg { quality: 75 },
            ImageFormat::Png => EncodeParams::Png,
            ImageFormat::Tiff => EncodeParams::Tiff,
            ImageFormat::Webp => EncodeParams::WebP,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported image format: {0}")]
pub struct UnsupportedFormat(pub String);

impl FromStr for ImageFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == s)
            .ok_or_else(|| UnsupportedFormat(s.to_string()))
    }
}
