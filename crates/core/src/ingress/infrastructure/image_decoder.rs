use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum ImageDecodeError {
    #[error("empty image payload")]
    Empty,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("unsupported or corrupt image: {0}")]
    Image(#[from] image::ImageError),
}

/// Decodes an inline base64 image into an RGB [`Frame`].
///
/// Anything up to the first comma is a metadata marker (as in a data URL)
/// and is discarded. Embedded whitespace and line breaks are ignored.
pub fn decode_inline_image(encoded: &str, index: usize) -> Result<Frame, ImageDecodeError> {
    let payload = match encoded.split_once(',') {
        Some((_marker, rest)) => rest,
        None => encoded,
    };
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if compact.is_empty() {
        return Err(ImageDecodeError::Empty);
    }

    let bytes = STANDARD.decode(compact.as_bytes())?;
    decode_image_bytes(&bytes, index)
}

/// Decodes a complete image file (PNG, JPEG, ...) held in memory.
pub fn decode_image_bytes(bytes: &[u8], index: usize) -> Result<Frame, ImageDecodeError> {
    let rgb = image::load_from_memory(bytes)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Frame::new(rgb.into_raw(), width, height, 3, index))
}
