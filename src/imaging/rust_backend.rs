//! Pure Rust image backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Mime type → format | `image::ImageFormat::from_mime_type` |
//! | Decode | `image::load_from_memory_with_format` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality honoured) |
//! | Encode → other | `DynamicImage::write_to` (quality ignored) |

use super::backend::{ImageTransform, TransformError};
use super::calculations::scaled_dimensions;
use super::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// Stateless, so one instance can serve every variant concurrently.
#[derive(Debug, Clone, Copy)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a mime type such as `image/jpeg; charset=binary` to a format this
/// build can both read and write.
fn format_for_mime(mime_type: &str) -> Result<ImageFormat, TransformError> {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let essence = match essence.as_str() {
        "image/jpg" | "image/pjpeg" => "image/jpeg",
        other => other,
    };

    ImageFormat::from_mime_type(essence)
        .filter(|format| format.reading_enabled() && format.writing_enabled())
        .ok_or_else(|| TransformError::Decode(format!("Unsupported mime type: {mime_type}")))
}

fn decode(source: &[u8], format: ImageFormat) -> Result<DynamicImage, TransformError> {
    image::load_from_memory_with_format(source, format)
        .map_err(|e| TransformError::Decode(format!("Failed to decode {format:?}: {e}")))
}

fn encode(
    img: &DynamicImage,
    format: ImageFormat,
    quality: Quality,
) -> Result<Vec<u8>, TransformError> {
    let mut buffer = Vec::new();
    let written = match format {
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel; 1 is the encoder's lowest quality.
            let encoder =
                JpegEncoder::new_with_quality(&mut buffer, quality.value().clamp(1, 100) as u8);
            if img.color().has_alpha() {
                DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)
            } else {
                img.write_with_encoder(encoder)
            }
        }
        other => img.write_to(&mut Cursor::new(&mut buffer), other),
    };
    written.map_err(|e| TransformError::Encode(format!("Failed to encode {format:?}: {e}")))?;
    Ok(buffer)
}

impl ImageTransform for RustBackend {
    fn transform(
        &self,
        source: &[u8],
        mime_type: &str,
        target_width: Option<u32>,
        quality: Quality,
    ) -> Result<Vec<u8>, TransformError> {
        let format = format_for_mime(mime_type)?;
        let img = decode(source, format)?;

        let img = match target_width {
            Some(width) => {
                let (w, h) = scaled_dimensions((img.width(), img.height()), width);
                img.resize_exact(w, h, FilterType::Lanczos3)
            }
            None => img,
        };

        encode(&img, format, quality)
    }
}
