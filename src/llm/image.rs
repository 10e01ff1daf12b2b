//! Upload normalisation: every image goes to the model as a bounded JPEG.

use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::error::LlmResult;

/// Longest edge, in pixels, sent to the model.
pub const MAX_DIMENSION: u32 = 2000;

/// JPEG quality used when re-encoding.
pub const JPEG_QUALITY: u8 = 85;

/// MIME type of normalised images.
pub const JPEG_MEDIA_TYPE: &str = "image/jpeg";

/// Decode any supported image, shrink it to fit `MAX_DIMENSION` (never
/// enlarging) and re-encode as RGB JPEG.
///
/// # Errors
/// Returns an error if the bytes are not a supported image.
pub fn normalize_to_jpeg(data: &[u8]) -> LlmResult<Vec<u8>> {
    let mut img = image::load_from_memory(data)?;
    if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img = img.thumbnail(MAX_DIMENSION, MAX_DIMENSION);
    }
    let rgb = img.to_rgb8();

    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    encoder.write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)?;
    Ok(buf)
}

/// Base64 (standard alphabet) for the model API.
#[must_use]
pub fn to_base64(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}
