//! The console: local state plus the storage backend it mirrors.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use happyart_api_types::ContentId;

use crate::application::busy::{BusyFlags, BusySnapshot};
use crate::application::confirm::Confirm;
use crate::application::notify::{ConnectionBanner, ToastCenter};
use crate::application::repos::StorageBackend;
use crate::application::state::{AdminState, StateCollection};
use crate::application::view::{DashboardStats, filter_items};
use crate::domain::types::{BackendMode, StatusFilter};
use crate::domain::uploads::DEFAULT_MAX_IMAGE_BYTES;

/// Builds a fresh in-memory backend seeded with the fallback dataset.
pub type FallbackFactory = Arc<dyn Fn() -> StorageBackend + Send + Sync>;

pub struct AdminConsole {
    pub(super) live: Option<StorageBackend>,
    active: RwLock<StorageBackend>,
    fallback: FallbackFactory,
    state: Mutex<AdminState>,
    pub(super) busy: BusyFlags,
    pub(super) toasts: ToastCenter,
    confirm: Arc<dyn Confirm>,
    upload_limit: u64,
}

impl AdminConsole {
    /// `live` is `None` when no backend credentials are configured; the first
    /// load then falls back immediately.
    pub fn new(
        live: Option<StorageBackend>,
        fallback: FallbackFactory,
        toasts: ToastCenter,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        let active = live.clone().unwrap_or_else(|| fallback());
        let state = AdminState::new(active.mode);
        Self {
            live,
            active: RwLock::new(active),
            fallback,
            state: Mutex::new(state),
            busy: BusyFlags::default(),
            toasts,
            confirm,
            upload_limit: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    pub fn with_upload_limit(mut self, bytes: u64) -> Self {
        self.upload_limit = bytes;
        self
    }

    pub fn upload_limit(&self) -> u64 {
        self.upload_limit
    }

    pub fn toasts(&self) -> &ToastCenter {
        &self.toasts
    }

    pub fn busy(&self) -> BusySnapshot {
        self.busy.snapshot()
    }

    pub fn snapshot(&self) -> AdminState {
        self.state().clone()
    }

    pub fn mode(&self) -> BackendMode {
        self.state().mode
    }

    pub fn banner(&self) -> Option<ConnectionBanner> {
        ConnectionBanner::from_state(&self.state())
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::from_state(&self.state())
    }

    /// Look up one item by id in local state.
    pub fn select<T: StateCollection>(&self, id: ContentId) -> Option<T> {
        T::items(&self.state())
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    pub fn list<T: StateCollection>(&self, search: &str, status: StatusFilter) -> Vec<T> {
        let state = self.state();
        filter_items(T::items(&state), search, status)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Re-run the collection load from the connection banner.
    pub async fn retry(&self) -> BackendMode {
        self.load_collections().await
    }

    pub(super) fn active_backend(&self) -> StorageBackend {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(super) fn set_active_backend(&self, backend: StorageBackend) {
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = backend;
    }

    pub(super) fn fresh_fallback(&self) -> StorageBackend {
        (self.fallback)()
    }

    pub(super) fn ask(&self, prompt: &str) -> bool {
        self.confirm.confirm(prompt)
    }

    /// Lock local state. Never hold the guard across an await.
    pub(super) fn state(&self) -> MutexGuard<'_, AdminState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for AdminConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConsole")
            .field("live", &self.live.is_some())
            .field("mode", &self.mode())
            .field("busy", &self.busy.snapshot())
            .finish_non_exhaustive()
    }
}
