//! Loading collections and settings, with fallback to the built-in dataset.

use std::collections::BTreeMap;

use happyart_api_types::{Article, Course};
use metrics::counter;
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

use crate::application::repos::RepoError;
use crate::application::state::replace_all;
use crate::domain::fixtures::{fallback_articles, fallback_courses, fallback_settings};
use crate::domain::types::BackendMode;

use super::console::AdminConsole;

impl AdminConsole {
    /// Fetch both collections from the live backend. Never fails: on any
    /// error the console switches to the fallback dataset and mock mode.
    #[instrument(skip(self))]
    pub async fn load_collections(&self) -> BackendMode {
        let Some(_guard) = self.busy.collections.try_acquire() else {
            debug!("collection load already in flight");
            return self.mode();
        };

        match self.fetch_collections().await {
            Ok((courses, articles)) => {
                if let Some(live) = self.live.clone() {
                    self.set_active_backend(live);
                }
                let mut state = self.state();
                replace_all(&mut state.courses, courses);
                replace_all(&mut state.articles, articles);
                state.mode = BackendMode::Live;
                state.last_error = None;
                state.last_updated = Some(OffsetDateTime::now_utc());
                info!(
                    courses = state.courses.len(),
                    articles = state.articles.len(),
                    "collections loaded"
                );
                counter!("happyart_sync_load_total", "mode" => "live").increment(1);
                BackendMode::Live
            }
            Err(err) => {
                warn!(error = %err, "collection load failed; using fallback dataset");
                self.set_active_backend(self.fresh_fallback());
                let mut state = self.state();
                state.courses = fallback_courses();
                state.articles = fallback_articles();
                state.mode = BackendMode::Mock;
                state.last_error = Some(format!("Database connection failed: {err}"));
                state.last_updated = Some(OffsetDateTime::now_utc());
                counter!("happyart_sync_fallback_total").increment(1);
                counter!("happyart_sync_load_total", "mode" => "mock").increment(1);
                BackendMode::Mock
            }
        }
    }

    /// Both lists are fetched before local state is touched.
    async fn fetch_collections(&self) -> Result<(Vec<Course>, Vec<Article>), RepoError> {
        let backend = self.live.as_ref().ok_or(RepoError::Unconfigured)?;
        tokio::try_join!(backend.courses.list(), backend.articles.list())
    }

    /// Load the settings map. Falls back silently; the backend mode is left alone.
    #[instrument(skip(self))]
    pub async fn load_settings(&self) -> BTreeMap<String, String> {
        let Some(_guard) = self.busy.settings.try_acquire() else {
            debug!("settings load already in flight");
            return self.state().settings.clone();
        };

        let loaded = match self.live.as_ref() {
            Some(backend) => backend.settings.list().await,
            None => Err(RepoError::Unconfigured),
        };

        let settings = match loaded {
            Ok(rows) => rows.into_iter().map(|row| (row.key, row.value)).collect(),
            Err(err) => {
                warn!(error = %err, "settings load failed; using fallback settings");
                counter!("happyart_settings_fallback_total").increment(1);
                fallback_settings()
            }
        };

        self.state().settings = settings.clone();
        settings
    }
}
