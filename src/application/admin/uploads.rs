//! Image uploads for course and article forms.

use metrics::counter;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::application::repos::{RepoError, StoredObject};
use crate::domain::content::ContentDraft;
use crate::domain::uploads::{ImageFile, ImageValidationError, object_path_for, validate_image};

use super::console::AdminConsole;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Invalid(#[from] ImageValidationError),
    #[error("Image upload not available in mock mode")]
    MockMode,
    #[error("Image upload failed: {0}")]
    Repo(#[from] RepoError),
}

impl AdminConsole {
    /// Validate and store an image, returning where it landed.
    #[instrument(skip(self, image), fields(name = %image.name, size = image.size()))]
    pub async fn upload_image(&self, image: &ImageFile) -> Result<StoredObject, UploadError> {
        if let Err(err) = validate_image(image, self.upload_limit()) {
            self.toasts.error(err.to_string());
            return Err(err.into());
        }

        let backend = self.active_backend();
        let store = match backend.objects {
            Some(store) if !backend.mode.is_mock() => store,
            _ => {
                let err = UploadError::MockMode;
                self.toasts.error(err.to_string());
                return Err(err);
            }
        };

        let path = object_path_for(&image.name, OffsetDateTime::now_utc());
        match store
            .upload(&path, &image.content_type, image.bytes.clone())
            .await
        {
            Ok(stored) => {
                info!(path = %stored.path, "image uploaded");
                counter!("happyart_upload_total", "outcome" => "ok").increment(1);
                self.toasts.success("Image uploaded successfully!");
                Ok(stored)
            }
            Err(err) => {
                warn!(error = %err, "image upload failed");
                counter!("happyart_upload_total", "outcome" => "error").increment(1);
                let err = UploadError::from(err);
                self.toasts.error(err.to_string());
                Err(err)
            }
        }
    }

    /// Upload `image` and point the draft's `image_url` at it.
    pub async fn attach_image<D: ContentDraft>(
        &self,
        draft: &mut D,
        image: &ImageFile,
    ) -> Result<StoredObject, UploadError> {
        let stored = self.upload_image(image).await?;
        draft.set_image_url(stored.public_url.clone());
        Ok(stored)
    }

    pub async fn remove_image(&self, path: &str) -> Result<(), UploadError> {
        let backend = self.active_backend();
        match backend.objects {
            Some(store) if !backend.mode.is_mock() => Ok(store.remove(path).await?),
            _ => Err(UploadError::MockMode),
        }
    }
}
