//! In-memory adapters backing mock mode.
//!
//! Mutations apply locally and succeed immediately; ids for new rows come
//! from the wall clock in milliseconds, bumped so they never repeat.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use happyart_api_types::{Article, ContentId, Course, SettingRow};
use time::OffsetDateTime;

use crate::application::repos::{ContentRepo, RepoError, SettingsRepo, StorageBackend};
use crate::application::state::{newest_first, prepend};
use crate::domain::content::Content;
use crate::domain::fixtures::{fallback_articles, fallback_courses, fallback_settings};
use crate::domain::types::BackendMode;

static LAST_MOCK_ID: AtomicI64 = AtomicI64::new(0);

/// Next synthetic id: current millis, or one past the last id handed out.
pub fn next_mock_id(now: OffsetDateTime) -> ContentId {
    let millis = (now.unix_timestamp_nanos() / 1_000_000) as i64;
    let previous = LAST_MOCK_ID
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(millis.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    millis.max(previous + 1)
}

#[derive(Debug)]
pub struct MemoryContentRepo<T> {
    rows: Mutex<Vec<T>>,
}

impl<T: Content> MemoryContentRepo<T> {
    pub fn seeded(rows: Vec<T>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    fn rows(&self) -> MutexGuard<'_, Vec<T>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn modify(&self, id: ContentId, apply: impl FnOnce(&mut T)) -> Result<T, RepoError> {
        let mut rows = self.rows();
        let row = rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or(RepoError::NotFound)?;
        apply(row);
        row.touch(OffsetDateTime::now_utc());
        Ok(row.clone())
    }
}

#[async_trait]
impl<T: Content> ContentRepo<T> for MemoryContentRepo<T> {
    async fn list(&self) -> Result<Vec<T>, RepoError> {
        let mut rows = self.rows().clone();
        newest_first(&mut rows);
        Ok(rows)
    }

    async fn insert(&self, draft: &T::Draft) -> Result<T, RepoError> {
        let now = OffsetDateTime::now_utc();
        let row = T::from_draft(next_mock_id(now), draft, now);
        prepend(&mut self.rows(), row.clone());
        Ok(row)
    }

    async fn update(&self, id: ContentId, draft: &T::Draft) -> Result<T, RepoError> {
        self.modify(id, |row| row.merge_draft(draft))
    }

    async fn set_published(&self, id: ContentId, published: bool) -> Result<T, RepoError> {
        self.modify(id, |row| row.set_published(published))
    }

    async fn delete(&self, id: ContentId) -> Result<(), RepoError> {
        let mut rows = self.rows();
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemorySettingsRepo {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemorySettingsRepo {
    pub fn seeded(values: BTreeMap<String, String>) -> Self {
        Self {
            values: Mutex::new(values),
        }
    }

    fn values(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SettingsRepo for MemorySettingsRepo {
    async fn list(&self) -> Result<Vec<SettingRow>, RepoError> {
        Ok(self
            .values()
            .iter()
            .map(|(key, value)| SettingRow {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }

    async fn upsert(&self, key: &str, value: &str) -> Result<(), RepoError> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A fresh mock-mode backend holding the fallback dataset. Uploads are not
/// available in mock mode, so there is no object store.
pub fn fallback_backend() -> StorageBackend {
    StorageBackend {
        mode: BackendMode::Mock,
        courses: Arc::new(MemoryContentRepo::<Course>::seeded(fallback_courses())),
        articles: Arc::new(MemoryContentRepo::<Article>::seeded(fallback_articles())),
        settings: Arc::new(MemorySettingsRepo::seeded(fallback_settings())),
        objects: None,
    }
}
