use axum::body::Bytes;
use image::{DynamicImage, RgbImage};

use crate::error::AnalyzeError;

pub const ALLOWED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Display names of the accepted formats, as reported by `/health`.
pub const SUPPORTED_FORMATS: [&str; 6] = ["PNG", "JPG", "JPEG", "GIF", "BMP", "WebP"];

/// A file taken from the `image` multipart field.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Extension is whatever follows the last dot, compared case-insensitively.
pub fn allowed_file(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

pub fn validate_file_name(file_name: &str) -> Result<(), AnalyzeError> {
    if file_name.is_empty() {
        return Err(AnalyzeError::NoFileSelected);
    }
    if !allowed_file(file_name) {
        return Err(AnalyzeError::InvalidFileType(file_name.to_string()));
    }
    Ok(())
}

/// Decodes `bytes` (format sniffed from the content) into 8-bit RGB.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, AnalyzeError> {
    let image = image::load_from_memory(bytes).map_err(AnalyzeError::UndecodableImage)?;
    Ok(normalize(image))
}

fn normalize(image: DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => {
            log::debug!("Converting {:?} image to RGB", other.color());
            other.to_rgb8()
        }
    }
}
