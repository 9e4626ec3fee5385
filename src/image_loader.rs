//! Photo decoding for ambient lighting.

use crate::error::{AppError, Result};
use crate::services::ambient_service::{PixelSource, SampleError};
use image::{DynamicImage, RgbaImage};
use std::path::Path;

/// A photo as delivered by the host once it finished loading.
pub enum LoadedImage {
    /// Decoded pixels that may be sampled.
    Decoded(DynamicImage),
    /// Displayable but not readable, e.g. served cross-origin without CORS.
    Opaque { reason: String },
}

impl PixelSource for LoadedImage {
    fn sample(&self, width: u32, height: u32) -> std::result::Result<RgbaImage, SampleError> {
        match self {
            LoadedImage::Decoded(image) => image.sample(width, height),
            LoadedImage::Opaque { reason } => Err(SampleError::Denied(reason.clone())),
        }
    }
}

/// Decodes an image file, guessing the format from its contents.
///
/// Blocking; hosts run it off the UI thread.
pub fn load_image_blocking(path: &Path) -> Result<DynamicImage> {
    let image = image::ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| AppError::ImageLoad(format!("{}: {}", path.display(), e)))?
        .decode()?;
    Ok(image)
}

/// Decodes an image from an in-memory buffer.
pub fn load_image_from_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}
