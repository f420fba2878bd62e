use async_trait::async_trait;
use bytes::Bytes;
use happyart_api_types::RemoveObjectsRequest;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;

use crate::application::repos::{ObjectStore, RepoError, StoredObject};

use super::client::RestClient;

/// One bucket in the object store.
#[derive(Debug, Clone)]
pub struct RestObjectStore {
    client: RestClient,
    bucket: String,
}

impl RestObjectStore {
    pub fn new(client: RestClient, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Public URL for an object, as served without authentication.
    pub fn public_url(&self, path: &str) -> Result<String, RepoError> {
        self.client
            .url(
                &format!("/storage/v1/object/public/{}/{path}", self.bucket),
                &[],
            )
            .map(String::from)
    }
}

#[async_trait]
impl ObjectStore for RestObjectStore {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<StoredObject, RepoError> {
        let url = self
            .client
            .url(&format!("/storage/v1/object/{}/{path}", self.bucket), &[])?;
        RestClient::send_unit(
            self.client
                .request(Method::POST, url)
                .header(CONTENT_TYPE, content_type)
                .header("cache-control", "max-age=3600")
                .header("x-upsert", "false")
                .body(bytes),
        )
        .await?;

        Ok(StoredObject {
            path: path.to_string(),
            public_url: self.public_url(path)?,
        })
    }

    async fn remove(&self, path: &str) -> Result<(), RepoError> {
        let url = self
            .client
            .url(&format!("/storage/v1/object/{}", self.bucket), &[])?;
        let prefixes = [path];
        RestClient::send_unit(
            self.client
                .request(Method::DELETE, url)
                .json(&RemoveObjectsRequest {
                    prefixes: &prefixes,
                }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;

    use super::*;

    fn store(server: &MockServer) -> RestObjectStore {
        RestObjectStore::new(
            RestClient::new(&server.base_url(), "anon").expect("client"),
            "images",
        )
    }

    #[tokio::test]
    async fn upload_posts_bytes_and_returns_public_url() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST")
                .path("/storage/v1/object/images/uploads/abc_1.png")
                .header("content-type", "image/png");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"Key":"images/uploads/abc_1.png"}"#);
        });

        let stored = store(&server)
            .upload("uploads/abc_1.png", "image/png", Bytes::from_static(b"\x89PNG"))
            .await
            .expect("upload");
        mock.assert();
        assert_eq!(
            stored.public_url,
            format!(
                "{}/storage/v1/object/public/images/uploads/abc_1.png",
                server.base_url()
            )
        );
    }

    #[tokio::test]
    async fn remove_sends_prefix_list() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("DELETE")
                .path("/storage/v1/object/images")
                .json_body_includes(r#"{"prefixes":["uploads/abc_1.png"]}"#);
            then.status(200)
                .header("content-type", "application/json")
                .body("[]");
        });

        store(&server)
            .remove("uploads/abc_1.png")
            .await
            .expect("remove");
        mock.assert();
    }
}
