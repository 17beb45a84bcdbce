// src/photo.rs
//! Profile and review photos: upload checks and conversion to embeddable data references

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;
use tracing::{debug, warn};

pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

/// `image/PNG; charset=binary` -> `image/png`
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

/// Data reference for an image payload; anything that is not an image is ignored
pub fn photo_data_url(content_type: &str, bytes: &[u8]) -> Option<String> {
    let mime = essence(content_type);
    if !mime.starts_with("image/") || bytes.is_empty() {
        debug!("Ignoring photo upload with content type {:?}", content_type);
        return None;
    }
    Some(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoErrorType {
    EmptyFile,
    TooLarge,
    WrongFormat,
    CorruptedFile,
}

impl PhotoErrorType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyFile => "IMAGE_EMPTY",
            Self::TooLarge => "IMAGE_TOO_LARGE",
            Self::WrongFormat => "IMAGE_WRONG_FORMAT",
            Self::CorruptedFile => "IMAGE_CORRUPTED",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct PhotoValidationError {
    pub error_type: PhotoErrorType,
    pub message: String,
    pub suggestion: String,
}

impl PhotoValidationError {
    fn new(error_type: PhotoErrorType, message: impl Into<String>, suggestion: &str) -> Self {
        Self {
            error_type,
            message: message.into(),
            suggestion: suggestion.to_string(),
        }
    }

    pub fn code(&self) -> &'static str {
        self.error_type.code()
    }
}

pub struct PhotoValidator;

impl PhotoValidator {
    /// Size limit plus a signature check for declared PNG and JPEG payloads
    pub fn validate(bytes: &[u8], content_type: &str) -> Result<(), PhotoValidationError> {
        if bytes.is_empty() {
            return Err(PhotoValidationError::new(
                PhotoErrorType::EmptyFile,
                "Photo file is empty",
                "Please upload a valid image file",
            ));
        }

        if bytes.len() > MAX_PHOTO_BYTES {
            return Err(PhotoValidationError::new(
                PhotoErrorType::TooLarge,
                format!(
                    "Image file too large: {:.1}MB (max 10MB)",
                    bytes.len() as f64 / 1024.0 / 1024.0
                ),
                "Please resize or compress your image and try again",
            ));
        }

        let result = match essence(content_type).as_str() {
            "image/png" => Self::check_signature(bytes, PNG_SIGNATURE, "PNG", JPEG_SIGNATURE, "JPEG"),
            "image/jpeg" | "image/jpg" => {
                Self::check_signature(bytes, JPEG_SIGNATURE, "JPEG", PNG_SIGNATURE, "PNG")
            }
            mime if mime.starts_with("image/") => Ok(()),
            _ => Err(PhotoValidationError::new(
                PhotoErrorType::WrongFormat,
                format!("Unsupported content type: {}", content_type),
                "Please upload an image file (PNG or JPEG recommended)",
            )),
        };

        if let Err(e) = &result {
            warn!("Photo validation failed: {}", e.message);
        }
        result
    }

    fn check_signature(
        bytes: &[u8],
        expected: &[u8],
        expected_name: &str,
        other: &[u8],
        other_name: &str,
    ) -> Result<(), PhotoValidationError> {
        if bytes.starts_with(expected) {
            return Ok(());
        }
        if bytes.starts_with(other) {
            return Err(PhotoValidationError::new(
                PhotoErrorType::WrongFormat,
                format!("File is {} but was sent as {}", other_name, expected_name),
                "Please send the matching content type or convert the image",
            ));
        }
        Err(PhotoValidationError::new(
            PhotoErrorType::CorruptedFile,
            format!("Invalid {} file - corrupted or wrong format", expected_name),
            "Please upload a valid image file",
        ))
    }
}
