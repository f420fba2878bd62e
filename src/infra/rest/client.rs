use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::application::repos::RepoError;
use crate::infra::error::InfraError;

/// Shared HTTP plumbing for the data, storage and auth endpoints.
///
/// Every request carries the project's anon key in `apikey`; the bearer is
/// the signed-in user's access token when there is one, the anon key otherwise.
#[derive(Clone, Debug)]
pub struct RestClient {
    client: Client,
    base: Url,
    anon_key: String,
    access_token: Option<String>,
}

impl RestClient {
    pub fn new(base_url: &str, anon_key: impl Into<String>) -> Result<Self, InfraError> {
        let base = Url::parse(base_url)
            .and_then(|url| url.join("/"))
            .map_err(|err| InfraError::configuration(format!("invalid backend url: {err}")))?;
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .build()
            .map_err(|err| InfraError::http_client(err.to_string()))?;
        Ok(Self {
            client,
            base,
            anon_key: anon_key.into(),
            access_token: None,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("happyart-admin/", env!("CARGO_PKG_VERSION"))
    }

    /// A copy of this client that authenticates as the given user.
    pub fn with_access_token(&self, token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..self.clone()
        }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, RepoError> {
        let mut url = self.base.join(path).map_err(RepoError::transport)?;
        if !query.is_empty() {
            url.set_query(None);
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        self.request_as(method, url, bearer)
    }

    /// Like [`RestClient::request`] but with an explicit bearer token.
    pub fn request_as(&self, method: Method, url: Url, bearer: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header(AUTHORIZATION, format!("Bearer {bearer}"))
    }

    pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, RepoError> {
        let response = request.send().await.map_err(RepoError::transport)?;
        let bytes = Self::checked(response).await?;
        serde_json::from_slice(&bytes).map_err(RepoError::decode)
    }

    pub async fn send_unit(request: RequestBuilder) -> Result<(), RepoError> {
        let response = request.send().await.map_err(RepoError::transport)?;
        Self::checked(response).await.map(|_| ())
    }

    async fn checked(response: Response) -> Result<bytes::Bytes, RepoError> {
        let status = response.status();
        let bytes = response.bytes().await.map_err(RepoError::transport)?;
        if !status.is_success() {
            return Err(RepoError::Status {
                status: status.as_u16(),
                body: error_message(&bytes),
            });
        }
        Ok(bytes)
    }
}

/// Pull a human-readable message out of an error body.
///
/// The data API uses `message`, the auth API `msg` or `error_description`.
pub(crate) fn error_message(body: &[u8]) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        for key in ["message", "msg", "error_description", "error"] {
            if let Some(Value::String(text)) = map.get(key) {
                return text.clone();
            }
        }
    }
    String::from_utf8_lossy(body).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_json_fields() {
        assert_eq!(
            error_message(br#"{"code":"42P01","message":"relation \"courses\" does not exist"}"#),
            "relation \"courses\" does not exist"
        );
        assert_eq!(
            error_message(br#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(error_message(b" gateway timeout \n"), "gateway timeout");
    }

    #[test]
    fn urls_keep_query_pairs_in_order() {
        let client = RestClient::new("https://project.example.co", "anon").expect("client");
        let url = client
            .url(
                "/rest/v1/courses",
                &[("select", "*".into()), ("order", "created_at.desc".into())],
            )
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://project.example.co/rest/v1/courses?select=*&order=created_at.desc"
        );
    }

    #[test]
    fn rejects_unparseable_base() {
        let err = RestClient::new("not a url", "anon").expect_err("invalid");
        assert!(matches!(err, InfraError::Configuration { .. }));
    }
}
