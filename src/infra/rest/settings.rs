use async_trait::async_trait;
use happyart_api_types::{SettingRow, SettingUpsert};
use reqwest::Method;
use time::OffsetDateTime;

use crate::application::repos::{RepoError, SettingsRepo};

use super::client::RestClient;

const SETTINGS_PATH: &str = "/rest/v1/settings";

#[derive(Debug, Clone)]
pub struct RestSettingsRepo {
    client: RestClient,
}

impl RestSettingsRepo {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SettingsRepo for RestSettingsRepo {
    async fn list(&self) -> Result<Vec<SettingRow>, RepoError> {
        let url = self.client.url(SETTINGS_PATH, &[("select", "*".into())])?;
        RestClient::send_json(self.client.request(Method::GET, url)).await
    }

    async fn upsert(&self, key: &str, value: &str) -> Result<(), RepoError> {
        let url = self
            .client
            .url(SETTINGS_PATH, &[("on_conflict", "key".into())])?;
        let body = SettingUpsert {
            key,
            value,
            updated_at: OffsetDateTime::now_utc(),
        };
        RestClient::send_unit(
            self.client
                .request(Method::POST, url)
                .header("Prefer", "resolution=merge-duplicates")
                .json(&body),
        )
        .await
    }
}
