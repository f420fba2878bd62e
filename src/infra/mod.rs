//! Infrastructure adapters and runtime bootstrap.

use std::sync::Arc;

use tracing::warn;

use crate::application::admin::AdminConsole;
use crate::application::auth::{AuthService, SessionManager};
use crate::application::confirm::Confirm;
use crate::application::notify::ToastCenter;
use crate::application::repos::StorageBackend;
use crate::config::{AuthMode, Settings};
use crate::domain::types::BackendMode;

pub mod error;
pub mod memory;
pub mod mock_auth;
pub mod rest;
pub mod session_cache;
pub mod telemetry;

use error::InfraError;
use mock_auth::MockAuth;
use rest::{LiveAuth, RestClient, RestContentRepo, RestObjectStore, RestSettingsRepo};
use session_cache::FileSessionStore;

fn rest_client(settings: &Settings) -> Result<Option<RestClient>, InfraError> {
    match settings.backend.credentials() {
        Some((url, key)) => RestClient::new(url.as_str(), key).map(Some),
        None => Ok(None),
    }
}

/// The live backend, or `None` when no credentials are configured.
pub fn live_backend(
    settings: &Settings,
    access_token: Option<&str>,
) -> Result<Option<StorageBackend>, InfraError> {
    let Some(client) = rest_client(settings)? else {
        return Ok(None);
    };
    let client = match access_token {
        Some(token) => client.with_access_token(token),
        None => client,
    };

    Ok(Some(StorageBackend {
        mode: BackendMode::Live,
        courses: Arc::new(RestContentRepo::new(client.clone())),
        articles: Arc::new(RestContentRepo::new(client.clone())),
        settings: Arc::new(RestSettingsRepo::new(client.clone())),
        objects: Some(Arc::new(RestObjectStore::new(
            client,
            settings.storage.bucket.clone(),
        ))),
    }))
}

pub fn build_console(
    settings: &Settings,
    toasts: ToastCenter,
    confirm: Arc<dyn Confirm>,
    access_token: Option<&str>,
) -> Result<AdminConsole, InfraError> {
    let live = live_backend(settings, access_token)?;
    if live.is_none() {
        warn!(
            target = "happyart::infra",
            "backend credentials missing; the console will serve mock data"
        );
    }
    Ok(
        AdminConsole::new(live, Arc::new(memory::fallback_backend), toasts, confirm)
            .with_upload_limit(settings.storage.max_image_bytes.get()),
    )
}

pub fn build_session_manager(
    settings: &Settings,
    toasts: ToastCenter,
    confirm: Arc<dyn Confirm>,
) -> Result<SessionManager, InfraError> {
    let service: Arc<dyn AuthService> = match (settings.auth.mode, rest_client(settings)?) {
        (AuthMode::Live, Some(client)) => Arc::new(LiveAuth::new(client)),
        (AuthMode::Live, None) => {
            warn!(
                target = "happyart::infra",
                "backend credentials missing; signing in against the mock identity provider"
            );
            Arc::new(MockAuth::seeded())
        }
        (AuthMode::Mock, _) => Arc::new(MockAuth::seeded()),
    };
    let store = Arc::new(FileSessionStore::new(settings.session.cache_path.clone()));
    Ok(SessionManager::new(service, store, confirm, toasts))
}
