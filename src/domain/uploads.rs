//! Image upload invariants: accepted types, size ceiling and object naming.

use std::path::Path;

use bytes::Bytes;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Default ceiling for a single image (5 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// MIME types accepted by the image picker.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Directory inside the bucket that receives uploads.
pub const UPLOAD_PREFIX: &str = "uploads";

/// An image picked for upload, fully buffered.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageValidationError {
    #[error("No file selected")]
    Missing,
    #[error("Invalid file type. Please select a JPEG, PNG, GIF, or WebP image.")]
    UnsupportedType,
    #[error("File too large. Please select an image smaller than {limit_mb}MB.")]
    TooLarge { limit_mb: u64 },
}

/// Check an image against the accepted types and the size ceiling.
pub fn validate_image(image: &ImageFile, max_bytes: u64) -> Result<(), ImageValidationError> {
    if image.bytes.is_empty() {
        return Err(ImageValidationError::Missing);
    }

    let content_type = image.content_type.trim().to_ascii_lowercase();
    if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
        return Err(ImageValidationError::UnsupportedType);
    }

    if image.size() > max_bytes {
        return Err(ImageValidationError::TooLarge {
            limit_mb: max_bytes / (1024 * 1024),
        });
    }

    Ok(())
}

/// Build `uploads/<random>_<millis>.<ext>` for a picked file.
pub fn object_path_for(original_name: &str, now: OffsetDateTime) -> String {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.trim_matches('.').to_ascii_lowercase())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "bin".to_string());

    let token = Uuid::new_v4().simple().to_string();
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    format!("{UPLOAD_PREFIX}/{}_{millis}.{extension}", &token[..11])
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn image(content_type: &str, len: usize) -> ImageFile {
        ImageFile::new("cat.png", content_type, Bytes::from(vec![7u8; len]))
    }

    #[test]
    fn accepts_supported_images_within_limit() {
        assert_eq!(validate_image(&image("image/png", 1024), DEFAULT_MAX_IMAGE_BYTES), Ok(()));
        assert_eq!(validate_image(&image("IMAGE/WEBP", 10), DEFAULT_MAX_IMAGE_BYTES), Ok(()));
    }

    #[test]
    fn rejects_empty_wrong_type_and_oversized() {
        assert_eq!(
            validate_image(&image("image/png", 0), DEFAULT_MAX_IMAGE_BYTES),
            Err(ImageValidationError::Missing)
        );
        assert_eq!(
            validate_image(&image("application/pdf", 10), DEFAULT_MAX_IMAGE_BYTES),
            Err(ImageValidationError::UnsupportedType)
        );
        let err = validate_image(&image("image/gif", 11), 10).expect_err("too large");
        assert!(matches!(err, ImageValidationError::TooLarge { .. }));

        let err = validate_image(
            &image("image/jpeg", DEFAULT_MAX_IMAGE_BYTES as usize + 1),
            DEFAULT_MAX_IMAGE_BYTES,
        )
        .expect_err("over 5MB");
        assert_eq!(
            err.to_string(),
            "File too large. Please select an image smaller than 5MB."
        );
    }

    #[test]
    fn object_paths_keep_extension_and_timestamp() {
        let path = object_path_for("My Drawing.JPG", datetime!(2024-01-15 10:00:00 UTC));
        assert!(path.starts_with("uploads/"));
        assert!(path.ends_with("_1705312800000.jpg"), "unexpected path {path}");
    }
}
