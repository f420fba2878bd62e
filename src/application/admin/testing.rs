//! Stub backends shared by the console's unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use happyart_api_types::{Article, ContentId, Course, SettingRow};

use crate::application::confirm::FixedAnswer;
use crate::application::notify::ToastCenter;
use crate::application::repos::{
    ContentRepo, ObjectStore, RepoError, SettingsRepo, StorageBackend, StoredObject,
};
use crate::domain::content::Content;
use crate::domain::fixtures::{fallback_articles, fallback_courses, fallback_settings};
use crate::domain::types::BackendMode;
use crate::infra::memory::{MemoryContentRepo, MemorySettingsRepo, fallback_backend};

use super::console::AdminConsole;

/// Switches and counters shared with a recording backend.
#[derive(Default)]
pub struct Probes {
    pub fail_courses: Arc<AtomicBool>,
    pub fail_articles: Arc<AtomicBool>,
    pub fail_settings: Arc<AtomicBool>,
    pub fail_uploads: Arc<AtomicBool>,
    pub course_calls: Arc<AtomicUsize>,
    pub article_calls: Arc<AtomicUsize>,
    pub settings_calls: Arc<AtomicUsize>,
    pub uploads: Arc<Mutex<Vec<String>>>,
}

fn outage() -> RepoError {
    RepoError::Status {
        status: 503,
        body: "service unavailable".into(),
    }
}

pub struct RecordingContentRepo<T> {
    inner: MemoryContentRepo<T>,
    fail: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl<T: Content> RecordingContentRepo<T> {
    fn enter(&self) -> Result<(), RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(outage());
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Content> ContentRepo<T> for RecordingContentRepo<T> {
    async fn list(&self) -> Result<Vec<T>, RepoError> {
        self.enter()?;
        self.inner.list().await
    }

    async fn insert(&self, draft: &T::Draft) -> Result<T, RepoError> {
        self.enter()?;
        self.inner.insert(draft).await
    }

    async fn update(&self, id: ContentId, draft: &T::Draft) -> Result<T, RepoError> {
        self.enter()?;
        self.inner.update(id, draft).await
    }

    async fn set_published(&self, id: ContentId, published: bool) -> Result<T, RepoError> {
        self.enter()?;
        self.inner.set_published(id, published).await
    }

    async fn delete(&self, id: ContentId) -> Result<(), RepoError> {
        self.enter()?;
        self.inner.delete(id).await
    }
}

pub struct RecordingSettingsRepo {
    inner: MemorySettingsRepo,
    fail: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl SettingsRepo for RecordingSettingsRepo {
    async fn list(&self) -> Result<Vec<SettingRow>, RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(outage());
        }
        self.inner.list().await
    }

    async fn upsert(&self, key: &str, value: &str) -> Result<(), RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(outage());
        }
        self.inner.upsert(key, value).await
    }
}

pub struct RecordingObjectStore {
    fail: Arc<AtomicBool>,
    uploads: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ObjectStore for RecordingObjectStore {
    async fn upload(
        &self,
        path: &str,
        _content_type: &str,
        _bytes: Bytes,
    ) -> Result<StoredObject, RepoError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(outage());
        }
        self.uploads
            .lock()
            .expect("uploads lock")
            .push(path.to_string());
        Ok(StoredObject {
            path: path.to_string(),
            public_url: format!("https://cdn.test/images/{path}"),
        })
    }

    async fn remove(&self, path: &str) -> Result<(), RepoError> {
        self.uploads
            .lock()
            .expect("uploads lock")
            .retain(|existing| existing != path);
        Ok(())
    }
}

/// A live-mode backend over the fallback dataset, observable through [`Probes`].
pub fn recording_backend() -> (StorageBackend, Probes) {
    let probes = Probes::default();
    let backend = StorageBackend {
        mode: BackendMode::Live,
        courses: Arc::new(RecordingContentRepo::<Course> {
            inner: MemoryContentRepo::seeded(fallback_courses()),
            fail: probes.fail_courses.clone(),
            calls: probes.course_calls.clone(),
        }),
        articles: Arc::new(RecordingContentRepo::<Article> {
            inner: MemoryContentRepo::seeded(fallback_articles()),
            fail: probes.fail_articles.clone(),
            calls: probes.article_calls.clone(),
        }),
        settings: Arc::new(RecordingSettingsRepo {
            inner: MemorySettingsRepo::seeded(fallback_settings()),
            fail: probes.fail_settings.clone(),
            calls: probes.settings_calls.clone(),
        }),
        objects: Some(Arc::new(RecordingObjectStore {
            fail: probes.fail_uploads.clone(),
            uploads: probes.uploads.clone(),
        })),
    };
    (backend, probes)
}

/// A live-mode backend where every call fails.
pub fn failing_backend() -> StorageBackend {
    let (backend, probes) = recording_backend();
    for switch in [
        &probes.fail_courses,
        &probes.fail_articles,
        &probes.fail_settings,
        &probes.fail_uploads,
    ] {
        switch.store(true, Ordering::SeqCst);
    }
    backend
}

pub fn console_with(live: Option<StorageBackend>) -> AdminConsole {
    console_answering(live, true)
}

pub fn console_answering(live: Option<StorageBackend>, answer: bool) -> AdminConsole {
    AdminConsole::new(
        live,
        Arc::new(fallback_backend),
        ToastCenter::default(),
        Arc::new(FixedAnswer(answer)),
    )
}

/// Console already loaded from a healthy recording backend.
pub async fn live_console() -> (AdminConsole, Probes) {
    let (backend, probes) = recording_backend();
    let console = console_with(Some(backend));
    console.load_collections().await;
    probes.course_calls.store(0, Ordering::SeqCst);
    probes.article_calls.store(0, Ordering::SeqCst);
    (console, probes)
}

/// Console that fell back to mock mode.
pub async fn mock_console() -> AdminConsole {
    let console = console_with(None);
    console.load_collections().await;
    console
}
