use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::application::repos::RepoError;

use super::console::AdminConsole;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings are already being saved")]
    Busy,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// The fields shown by the settings form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsForm {
    pub site_name: String,
    pub site_description: String,
    pub contact_email: String,
    pub max_courses_per_user: String,
}

impl SettingsForm {
    /// Prefill from loaded settings; missing keys start empty, except the
    /// course limit which defaults to `10`.
    pub fn from_settings(settings: &BTreeMap<String, String>) -> Self {
        let field = |key: &str| settings.get(key).cloned().unwrap_or_default();
        Self {
            site_name: field("site_name"),
            site_description: field("site_description"),
            contact_email: field("contact_email"),
            max_courses_per_user: settings
                .get("max_courses_per_user")
                .cloned()
                .unwrap_or_else(|| "10".to_string()),
        }
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("site_name".to_string(), self.site_name),
            ("site_description".to_string(), self.site_description),
            ("contact_email".to_string(), self.contact_email),
            ("max_courses_per_user".to_string(), self.max_courses_per_user),
        ])
    }
}

impl AdminConsole {
    /// Store every key, then replace local settings. The first failing key
    /// aborts the save and leaves local settings as they were.
    #[instrument(skip(self, values), fields(keys = values.len()))]
    pub async fn save_settings(
        &self,
        values: BTreeMap<String, String>,
    ) -> Result<(), SettingsError> {
        let _guard = self.busy.settings.try_acquire().ok_or(SettingsError::Busy)?;
        let backend = self.active_backend();

        for (key, value) in &values {
            if let Err(err) = backend.settings.upsert(key, value).await {
                warn!(key = %key, error = %err, "setting upsert failed");
                self.toasts.error(format!("Error saving settings: {err}"));
                return Err(err.into());
            }
        }

        self.state().settings = values;
        info!(mode = ?backend.mode, "settings saved");
        if backend.mode.is_mock() {
            self.toasts.success("Settings saved successfully! (Mock data)");
        } else {
            self.toasts.success("Settings saved successfully!");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::application::admin::testing::{live_console, mock_console};
    use crate::domain::fixtures::fallback_settings;

    fn toast_text(console: &AdminConsole) -> Option<String> {
        console.toasts().current().map(|toast| toast.text)
    }

    #[test]
    fn form_defaults_course_limit() {
        let form = SettingsForm::from_settings(&BTreeMap::new());
        assert_eq!(form.max_courses_per_user, "10");
        assert_eq!(form.site_name, "");

        let form = SettingsForm::from_settings(&fallback_settings());
        assert_eq!(form.clone().into_map(), fallback_settings());
    }

    #[tokio::test]
    async fn live_save_upserts_each_key() {
        let (console, probes) = live_console().await;
        let mut values = fallback_settings();
        values.insert("site_name".into(), "Happier Art Town".into());

        console.save_settings(values.clone()).await.expect("save");

        assert_eq!(probes.settings_calls.load(Ordering::SeqCst), values.len());
        assert_eq!(console.snapshot().settings, values);
        assert_eq!(
            toast_text(&console).as_deref(),
            Some("Settings saved successfully!")
        );
    }

    #[tokio::test]
    async fn failed_save_keeps_local_settings() {
        let (console, probes) = live_console().await;
        console.load_settings().await;
        probes.fail_settings.store(true, Ordering::SeqCst);

        let mut values = fallback_settings();
        values.insert("site_name".into(), "Broken".into());
        console.save_settings(values).await.expect_err("backend down");

        assert_eq!(console.snapshot().settings, fallback_settings());
        assert!(
            toast_text(&console)
                .is_some_and(|text| text.starts_with("Error saving settings: "))
        );
        assert!(!console.busy().settings);
    }

    #[tokio::test]
    async fn mock_save_replaces_locally() {
        let console = mock_console().await;
        let values = BTreeMap::from([("site_name".to_string(), "Offline Town".to_string())]);

        console.save_settings(values.clone()).await.expect("save");

        assert_eq!(console.snapshot().settings, values);
        assert_eq!(
            toast_text(&console).as_deref(),
            Some("Settings saved successfully! (Mock data)")
        );
    }
}
