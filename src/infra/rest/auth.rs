use async_trait::async_trait;
use happyart_api_types::{
    AuthUser, PasswordGrantRequest, RecoverRequest, Session, SignUpRequest, SignUpResponse,
    UpdateUserRequest, UserMetadata,
};
use reqwest::Method;

use crate::application::auth::{AuthError, AuthService, SignUpOutcome};
use crate::application::repos::RepoError;

use super::client::RestClient;

/// The identity provider's REST endpoints.
#[derive(Debug, Clone)]
pub struct LiveAuth {
    client: RestClient,
}

impl LiveAuth {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

/// 4xx answers are the provider refusing the request; surface their message.
fn refused(err: RepoError) -> AuthError {
    match err {
        RepoError::Status { status, body } if (400..500).contains(&status) => {
            AuthError::Rejected(body)
        }
        other => AuthError::Repo(other),
    }
}

#[async_trait]
impl AuthService for LiveAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let url = self
            .client
            .url("/auth/v1/token", &[("grant_type", "password".into())])?;
        RestClient::send_json(
            self.client
                .request(Method::POST, url)
                .json(&PasswordGrantRequest { email, password }),
        )
        .await
        .map_err(refused)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &UserMetadata,
    ) -> Result<SignUpOutcome, AuthError> {
        let url = self.client.url("/auth/v1/signup", &[])?;
        let response: SignUpResponse = RestClient::send_json(
            self.client.request(Method::POST, url).json(&SignUpRequest {
                email,
                password,
                data: profile,
            }),
        )
        .await
        .map_err(refused)?;

        Ok(match response {
            SignUpResponse::Session(session) => SignUpOutcome {
                user: session.user.clone(),
                session: Some(session),
            },
            SignUpResponse::User(user) => SignUpOutcome {
                user,
                session: None,
            },
        })
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        let url = self.client.url("/auth/v1/logout", &[])?;
        RestClient::send_unit(
            self.client
                .request_as(Method::POST, url, &session.access_token),
        )
        .await
        .map_err(refused)
    }

    async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        let url = self.client.url("/auth/v1/recover", &[])?;
        RestClient::send_unit(
            self.client
                .request(Method::POST, url)
                .json(&RecoverRequest { email }),
        )
        .await
        .map_err(refused)
    }

    async fn update_profile(
        &self,
        session: &Session,
        profile: &UserMetadata,
    ) -> Result<AuthUser, AuthError> {
        let url = self.client.url("/auth/v1/user", &[])?;
        RestClient::send_json(
            self.client
                .request_as(Method::PUT, url, &session.access_token)
                .json(&UpdateUserRequest { data: profile }),
        )
        .await
        .map_err(refused)
    }

    async fn current_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let url = self.client.url("/auth/v1/user", &[])?;
        RestClient::send_json(self.client.request_as(Method::GET, url, access_token))
            .await
            .map_err(refused)
    }
}
