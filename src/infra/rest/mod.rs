//! HTTP adapters for the hosted backend: table REST API, object storage and auth.

pub mod auth;
pub mod client;
pub mod content;
pub mod settings;
pub mod storage;

pub use auth::LiveAuth;
pub use client::RestClient;
pub use content::RestContentRepo;
pub use settings::RestSettingsRepo;
pub use storage::RestObjectStore;
