//! QR code images for listing reference links.

use image::{ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;
use thiserror::Error;

/// Default edge length of generated code images, in pixels.
pub const DEFAULT_CODE_SIZE: u32 = 256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    #[error("Cannot encode an empty reference link")]
    EmptyInput,

    #[error("QR code encoding error: {0}")]
    Encode(String),

    #[error("PNG encoding error: {0}")]
    Image(String),
}

/// Encodes `reference_link` as a PNG QR code of [`DEFAULT_CODE_SIZE`] pixels.
pub fn generate_code_image(reference_link: &str) -> Result<Vec<u8>, CodeError> {
    generate_code_image_sized(reference_link, DEFAULT_CODE_SIZE)
}

/// Encodes `data` as a PNG QR code at least `size` pixels wide.
///
/// Error correction is level M with the standard 4-module quiet zone. The
/// output depends only on the input.
pub fn generate_code_image_sized(data: &str, size: u32) -> Result<Vec<u8>, CodeError> {
    let data = data.trim();
    if data.is_empty() {
        return Err(CodeError::EmptyInput);
    }

    let code = QrCode::with_error_correction_level(data, EcLevel::M)
        .map_err(|e| CodeError::Encode(e.to_string()))?;

    let img = code
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .min_dimensions(size, size)
        .build();

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| CodeError::Image(e.to_string()))?;
    Ok(buf)
}
