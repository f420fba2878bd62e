//! Repository traits describing storage adapters.
//!
//! Two adapter families implement these: the REST adapters talking to the
//! remote store and the in-memory adapters seeded with the fallback dataset.
//! The mutation code never knows which one it is holding.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use happyart_api_types::{Article, ContentId, Course, SettingRow};
use thiserror::Error;

use crate::domain::content::Content;
use crate::domain::types::BackendMode;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("backend credentials not configured")]
    Unconfigured,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("resource not found")]
    NotFound,
    #[error("{0}")]
    Unsupported(&'static str),
}

impl RepoError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}

/// CRUD over one content collection.
#[async_trait]
pub trait ContentRepo<T: Content>: Send + Sync {
    /// All rows, newest `created_at` first.
    async fn list(&self) -> Result<Vec<T>, RepoError>;

    /// Insert an unpublished row and return it as stored.
    async fn insert(&self, draft: &T::Draft) -> Result<T, RepoError>;

    async fn update(&self, id: ContentId, draft: &T::Draft) -> Result<T, RepoError>;

    async fn set_published(&self, id: ContentId, published: bool) -> Result<T, RepoError>;

    async fn delete(&self, id: ContentId) -> Result<(), RepoError>;
}

#[async_trait]
pub trait SettingsRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<SettingRow>, RepoError>;

    /// Insert or replace the value stored under `key`.
    async fn upsert(&self, key: &str, value: &str) -> Result<(), RepoError>;
}

/// Result of storing an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub path: String,
    pub public_url: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<StoredObject, RepoError>;

    async fn remove(&self, path: &str) -> Result<(), RepoError>;
}

/// The full set of adapters the console talks to, swapped as a unit.
#[derive(Clone)]
pub struct StorageBackend {
    pub mode: BackendMode,
    pub courses: Arc<dyn ContentRepo<Course>>,
    pub articles: Arc<dyn ContentRepo<Article>>,
    pub settings: Arc<dyn SettingsRepo>,
    pub objects: Option<Arc<dyn ObjectStore>>,
}

impl std::fmt::Debug for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageBackend")
            .field("mode", &self.mode)
            .field("objects", &self.objects.is_some())
            .finish_non_exhaustive()
    }
}

/// Route a content type to its repository on a backend.
pub trait BackendCollection: Content {
    fn repo(backend: &StorageBackend) -> Arc<dyn ContentRepo<Self>>;
}

impl BackendCollection for Course {
    fn repo(backend: &StorageBackend) -> Arc<dyn ContentRepo<Self>> {
        backend.courses.clone()
    }
}

impl BackendCollection for Article {
    fn repo(backend: &StorageBackend) -> Arc<dyn ContentRepo<Self>> {
        backend.articles.clone()
    }
}
