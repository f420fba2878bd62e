use std::marker::PhantomData;

use async_trait::async_trait;
use happyart_api_types::{ContentId, InsertRow, PublishPatch, UpdateRow};
use reqwest::Method;
use time::OffsetDateTime;

use crate::application::repos::{ContentRepo, RepoError};
use crate::domain::content::Content;

use super::client::RestClient;

const RETURN_REPRESENTATION: &str = "return=representation";

/// A content table behind the data API.
#[derive(Debug, Clone)]
pub struct RestContentRepo<T> {
    client: RestClient,
    _rows: PhantomData<fn() -> T>,
}

impl<T: Content> RestContentRepo<T> {
    pub fn new(client: RestClient) -> Self {
        Self {
            client,
            _rows: PhantomData,
        }
    }

    fn table_path() -> String {
        format!("/rest/v1/{}", T::KIND.table())
    }

    fn by_id(id: ContentId) -> [(&'static str, String); 1] {
        [("id", format!("eq.{id}"))]
    }

    /// Writes ask for the stored row back; an empty answer means no row matched.
    async fn single(&self, request: reqwest::RequestBuilder) -> Result<T, RepoError> {
        let rows: Vec<T> = RestClient::send_json(request.header("Prefer", RETURN_REPRESENTATION)).await?;
        rows.into_iter().next().ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl<T: Content> ContentRepo<T> for RestContentRepo<T> {
    async fn list(&self) -> Result<Vec<T>, RepoError> {
        let url = self.client.url(
            &Self::table_path(),
            &[("select", "*".into()), ("order", "created_at.desc".into())],
        )?;
        RestClient::send_json(self.client.request(Method::GET, url)).await
    }

    async fn insert(&self, draft: &T::Draft) -> Result<T, RepoError> {
        let now = OffsetDateTime::now_utc();
        let url = self.client.url(&Self::table_path(), &[])?;
        let body = InsertRow {
            draft,
            is_published: false,
            created_at: now,
            updated_at: now,
        };
        self.single(self.client.request(Method::POST, url).json(&body))
            .await
    }

    async fn update(&self, id: ContentId, draft: &T::Draft) -> Result<T, RepoError> {
        let url = self.client.url(&Self::table_path(), &Self::by_id(id))?;
        let body = UpdateRow {
            draft,
            updated_at: OffsetDateTime::now_utc(),
        };
        self.single(self.client.request(Method::PATCH, url).json(&body))
            .await
    }

    async fn set_published(&self, id: ContentId, published: bool) -> Result<T, RepoError> {
        let url = self.client.url(&Self::table_path(), &Self::by_id(id))?;
        let body = PublishPatch {
            is_published: published,
            updated_at: OffsetDateTime::now_utc(),
        };
        self.single(self.client.request(Method::PATCH, url).json(&body))
            .await
    }

    async fn delete(&self, id: ContentId) -> Result<(), RepoError> {
        let url = self.client.url(&Self::table_path(), &Self::by_id(id))?;
        RestClient::send_unit(self.client.request(Method::DELETE, url)).await
    }
}
