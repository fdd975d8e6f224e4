//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (BMP, GIF, JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `JpegEncoder::new_with_quality` |
//! | Encode → WebP | `WebPEncoder::new_lossless` |
//! | Encode → PNG | `PngEncoder` |
//! | Encode → BMP, GIF, TIFF | `DynamicImage::write_to` |
//!
//! The `image` crate's BMP encoder only writes uncompressed bitmaps, so the
//! compression flag in [`EncodeParams::Bmp`] has no effect here.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::ResizeParams;
use crate::format::{EncodeParams, ImageFormat};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::BufWriter;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Load and decode an image from disk.
///
/// The format is sniffed from the file contents; the extension is only
/// consulted when sniffing fails.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    let mut reader = ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?;
    if reader.format().is_none() {
        let by_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse::<ImageFormat>().ok());
        if let Some(format) = by_extension {
            reader.set_format(format.decoding_format());
        }
    }
    reader.decode().map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
    })
}

/// Convert to a pixel layout the target encoder accepts.
fn encodable(img: DynamicImage, encode: EncodeParams) -> DynamicImage {
    match encode {
        EncodeParams::Jpeg { .. } => DynamicImage::ImageRgb8(img.to_rgb8()),
        EncodeParams::Gif => DynamicImage::ImageRgba8(img.to_rgba8()),
        EncodeParams::WebP | EncodeParams::Bmp { .. } | EncodeParams::Tiff => {
            if img.color().has_alpha() {
                DynamicImage::ImageRgba8(img.to_rgba8())
            } else {
                DynamicImage::ImageRgb8(img.to_rgb8())
            }
        }
        EncodeParams::Png => img,
    }
}

/// Encode and save an image with the given parameters.
fn save_image(img: DynamicImage, path: &Path, encode: EncodeParams) -> Result<(), BackendError> {
    let img = encodable(img, encode);
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let mut writer = BufWriter::new(file);

    let result = match encode {
        EncodeParams::Jpeg { quality } => img.write_with_encoder(
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, quality),
        ),
        EncodeParams::WebP => {
            img.write_with_encoder(image::codecs::webp::WebPEncoder::new_lossless(&mut writer))
        }
        EncodeParams::Png => {
            img.write_with_encoder(image::codecs::png::PngEncoder::new(&mut writer))
        }
        EncodeParams::Bmp { .. } => img.write_to(&mut writer, image::ImageFormat::Bmp),
        EncodeParams::Gif => img.write_to(&mut writer, image::ImageFormat::Gif),
        EncodeParams::Tiff => img.write_to(&mut writer, image::ImageFormat::Tiff),
    };

    result.map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to encode {}: {}", path.display(), e))
    })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        if params.width == 0 || params.height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "Cannot resize {} to {}x{}",
                params.source.display(),
                params.width,
                params.height
            )));
        }
        let img = load_image(&params.source)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        save_image(resized, &params.output, params.encode)
    }
}
