//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{num::NonZeroU64, path::PathBuf, str::FromStr, time::Duration};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::domain::uploads::DEFAULT_MAX_IMAGE_BYTES;

mod cli;

pub use cli::ConfigArgs;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "happyart";
const DEFAULT_BUCKET: &str = "images";
const DEFAULT_SESSION_FILE: &str = ".happyart/session.json";
const DEFAULT_TOAST_TTL_MS: u64 = 3000;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub backend: BackendSettings,
    pub storage: StorageSettings,
    pub session: SessionSettings,
    pub notifications: NotificationSettings,
    pub auth: AuthSettings,
    pub logging: LoggingSettings,
}

/// Backend project coordinates. Both halves must be present for live mode.
#[derive(Debug, Clone, Default)]
pub struct BackendSettings {
    pub url: Option<Url>,
    pub anon_key: Option<String>,
}

impl BackendSettings {
    pub fn credentials(&self) -> Option<(&Url, &str)> {
        Some((self.url.as_ref()?, self.anon_key.as_deref()?))
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub bucket: String,
    pub max_image_bytes: NonZeroU64,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub cache_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct NotificationSettings {
    pub toast_ttl: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Live,
    Mock,
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub mode: AuthMode,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &ConfigArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("HAPPYART").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(cli);
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    backend: RawBackendSettings,
    storage: RawStorageSettings,
    session: RawSessionSettings,
    notifications: RawNotificationSettings,
    auth: RawAuthSettings,
    logging: RawLoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawBackendSettings {
    url: Option<String>,
    anon_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawStorageSettings {
    bucket: Option<String>,
    max_image_bytes: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSessionSettings {
    cache_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawNotificationSettings {
    toast_ttl_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAuthSettings {
    mode: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &ConfigArgs) {
        if let Some(url) = overrides.backend_url.as_ref() {
            self.backend.url = Some(url.clone());
        }
        if let Some(key) = overrides.anon_key.as_ref() {
            self.backend.anon_key = Some(key.clone());
        }
        if let Some(bucket) = overrides.storage_bucket.as_ref() {
            self.storage.bucket = Some(bucket.clone());
        }
        if let Some(limit) = overrides.max_image_bytes {
            self.storage.max_image_bytes = Some(limit);
        }
        if let Some(path) = overrides.session_file.as_ref() {
            self.session.cache_path = Some(path.clone());
        }
        if let Some(ttl) = overrides.toast_ttl_ms {
            self.notifications.toast_ttl_ms = Some(ttl);
        }
        if let Some(mode) = overrides.auth_mode.as_ref() {
            self.auth.mode = Some(mode.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            backend,
            storage,
            session,
            notifications,
            auth,
            logging,
        } = raw;

        Ok(Self {
            backend: build_backend_settings(backend)?,
            storage: build_storage_settings(storage)?,
            session: build_session_settings(session),
            notifications: build_notification_settings(notifications)?,
            auth: build_auth_settings(auth)?,
            logging: build_logging_settings(logging)?,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn build_backend_settings(backend: RawBackendSettings) -> Result<BackendSettings, LoadError> {
    let url = match non_blank(backend.url) {
        Some(raw) => {
            let url = Url::parse(&raw)
                .map_err(|err| LoadError::invalid("backend.url", format!("failed to parse: {err}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(LoadError::invalid(
                    "backend.url",
                    "scheme must be http or https",
                ));
            }
            Some(url)
        }
        None => None,
    };

    Ok(BackendSettings {
        url,
        anon_key: non_blank(backend.anon_key),
    })
}

fn build_storage_settings(storage: RawStorageSettings) -> Result<StorageSettings, LoadError> {
    let bucket = non_blank(storage.bucket).unwrap_or_else(|| DEFAULT_BUCKET.to_string());
    if bucket.contains('/') {
        return Err(LoadError::invalid(
            "storage.bucket",
            "bucket name must not contain `/`",
        ));
    }

    let max_image_bytes = NonZeroU64::new(storage.max_image_bytes.unwrap_or(DEFAULT_MAX_IMAGE_BYTES))
        .ok_or_else(|| {
            LoadError::invalid("storage.max_image_bytes", "limit must be greater than zero")
        })?;

    Ok(StorageSettings {
        bucket,
        max_image_bytes,
    })
}

fn build_session_settings(session: RawSessionSettings) -> SessionSettings {
    SessionSettings {
        cache_path: session
            .cache_path
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE)),
    }
}

fn build_notification_settings(
    notifications: RawNotificationSettings,
) -> Result<NotificationSettings, LoadError> {
    let millis = notifications.toast_ttl_ms.unwrap_or(DEFAULT_TOAST_TTL_MS);
    if millis == 0 {
        return Err(LoadError::invalid(
            "notifications.toast_ttl_ms",
            "ttl must be greater than zero",
        ));
    }
    Ok(NotificationSettings {
        toast_ttl: Duration::from_millis(millis),
    })
}

fn build_auth_settings(auth: RawAuthSettings) -> Result<AuthSettings, LoadError> {
    let mode = match non_blank(auth.mode).as_deref().map(str::to_ascii_lowercase) {
        None => AuthMode::Live,
        Some(mode) if mode == "live" => AuthMode::Live,
        Some(mode) if mode == "mock" => AuthMode::Mock,
        Some(other) => {
            return Err(LoadError::invalid(
                "auth.mode",
                format!("expected `live` or `mock`, got `{other}`"),
            ));
        }
    };
    Ok(AuthSettings { mode })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::WARN,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}
