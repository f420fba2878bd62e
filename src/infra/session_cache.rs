//! The signed-in session persisted as a single JSON file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use happyart_api_types::Session;
use tokio::fs;

use crate::application::auth::SessionStore;

use super::error::InfraError;

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>, InfraError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_slice(&bytes).map(Some).map_err(|err| {
            InfraError::session_cache(format!("{}: {err}", self.path.display()))
        })
    }

    async fn save(&self, session: &Session) -> Result<(), InfraError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec_pretty(session)
            .map_err(|err| InfraError::session_cache(err.to_string()))?;
        fs::write(&self.path, body).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), InfraError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use happyart_api_types::{AuthUser, UserMetadata};
    use tempfile::tempdir;

    use super::*;

    fn session() -> Session {
        Session {
            access_token: "mock-token-1".into(),
            refresh_token: None,
            expires_in: Some(3600),
            user: AuthUser {
                id: "1".into(),
                email: Some("admin@happyarttown.com".into()),
                user_metadata: UserMetadata {
                    full_name: Some("Admin User".into()),
                },
            },
        }
    }

    #[tokio::test]
    async fn save_load_clear_cycle() {
        let dir = tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().join("nested/session.json"));

        assert_eq!(store.load().await.expect("empty"), None);
        store.save(&session()).await.expect("save");
        assert_eq!(store.load().await.expect("load"), Some(session()));

        store.clear().await.expect("clear");
        assert!(!store.path().exists());
        store.clear().await.expect("clearing twice is fine");
    }

    #[tokio::test]
    async fn corrupt_cache_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").expect("write");

        let err = FileSessionStore::new(&path)
            .load()
            .await
            .expect_err("corrupt");
        assert!(matches!(err, InfraError::SessionCache { .. }));
    }
}
