//! Promotional slider images and uploads.

use chrono::{DateTime, Utc};
use imprenta_core::SliderImageId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted upload (2 MB).
pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

/// Accepted upload MIME types.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

const MIN_NAME_LEN: usize = 2;
const MIN_ALT_TEXT_LEN: usize = 5;

/// A slide shown in the home page carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderImage {
    pub id: SliderImageId,
    pub name: String,
    pub image_url: String,
    pub alt_text: String,
    /// Position in the carousel, ascending.
    pub order: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set for uploaded files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Editable fields of a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderImageDraft {
    pub name: String,
    pub alt_text: String,
    pub order: u32,
    pub is_active: bool,
}

impl SliderImageDraft {
    /// Check the form rules: name of at least 2 characters, alt text of at
    /// least 5.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.name.trim().chars().count() < MIN_NAME_LEN {
            return Err(DraftError::NameTooShort(MIN_NAME_LEN));
        }
        if self.alt_text.trim().chars().count() < MIN_ALT_TEXT_LEN {
            return Err(DraftError::AltTextTooShort(MIN_ALT_TEXT_LEN));
        }
        Ok(())
    }
}

/// Slide form validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Name must be at least {0} characters")]
    NameTooShort(usize),
    #[error("Alt text must be at least {0} characters")]
    AltTextTooShort(usize),
}

/// An image file picked by the admin.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Accept JPEG, PNG or WEBP files up to [`MAX_UPLOAD_BYTES`].
    ///
    /// # Errors
    ///
    /// Returns `UploadError` for an unsupported type or an oversized file.
    pub fn validate(&self) -> Result<(), UploadError> {
        let content_type = self.content_type.to_ascii_lowercase();
        if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(UploadError::UnsupportedType(self.content_type.clone()));
        }
        if self.size() > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge {
                size: self.size(),
                max: MAX_UPLOAD_BYTES,
            });
        }
        Ok(())
    }
}

/// Upload validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Unsupported file type {0}; use JPEG, JPG, PNG or WEBP")]
    UnsupportedType(String),
    #[error("File is {size} bytes; the limit is {max} bytes")]
    TooLarge { size: usize, max: usize },
}
