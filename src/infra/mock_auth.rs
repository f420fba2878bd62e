//! In-process identity provider with one seeded admin account.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use happyart_api_types::{AuthUser, Session, UserMetadata};
use time::OffsetDateTime;

use crate::application::auth::{AuthError, AuthService, SignUpOutcome};

pub const MOCK_ADMIN_EMAIL: &str = "admin@happyarttown.com";
pub const MOCK_ADMIN_PASSWORD: &str = "admin123";
const MOCK_ADMIN_ID: &str = "1";
const TOKEN_PREFIX: &str = "mock-token-";

#[derive(Debug, Clone)]
struct MockAccount {
    user: AuthUser,
    password: String,
}

#[derive(Debug)]
pub struct MockAuth {
    accounts: Mutex<Vec<MockAccount>>,
}

impl MockAuth {
    pub fn seeded() -> Self {
        Self {
            accounts: Mutex::new(vec![MockAccount {
                user: AuthUser {
                    id: MOCK_ADMIN_ID.to_string(),
                    email: Some(MOCK_ADMIN_EMAIL.to_string()),
                    user_metadata: UserMetadata {
                        full_name: Some("Admin User".to_string()),
                    },
                },
                password: MOCK_ADMIN_PASSWORD.to_string(),
            }]),
        }
    }

    fn accounts(&self) -> MutexGuard<'_, Vec<MockAccount>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Tokens encode the user id so a cached session survives a restart.
    fn session_for(user: AuthUser) -> Session {
        Session {
            access_token: format!("{TOKEN_PREFIX}{}", user.id),
            refresh_token: None,
            expires_in: None,
            user,
        }
    }

    fn user_for_token(&self, token: &str) -> Option<AuthUser> {
        let id = token.strip_prefix(TOKEN_PREFIX)?;
        self.accounts()
            .iter()
            .find(|account| account.user.id == id)
            .map(|account| account.user.clone())
    }
}

impl Default for MockAuth {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl AuthService for MockAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.accounts()
            .iter()
            .find(|account| {
                account.user.email.as_deref() == Some(email) && account.password == password
            })
            .map(|account| Self::session_for(account.user.clone()))
            .ok_or_else(|| AuthError::Rejected("Invalid email or password".into()))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &UserMetadata,
    ) -> Result<SignUpOutcome, AuthError> {
        let mut accounts = self.accounts();
        if accounts
            .iter()
            .any(|account| account.user.email.as_deref() == Some(email))
        {
            return Err(AuthError::Rejected(
                "User with this email already exists".into(),
            ));
        }

        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let user = AuthUser {
            id: millis.to_string(),
            email: Some(email.to_string()),
            user_metadata: UserMetadata {
                full_name: Some(profile.full_name.clone().unwrap_or_else(|| "User".into())),
            },
        };
        accounts.push(MockAccount {
            user: user.clone(),
            password: password.to_string(),
        });
        Ok(SignUpOutcome {
            user,
            session: None,
        })
    }

    async fn sign_out(&self, _session: &Session) -> Result<(), AuthError> {
        Ok(())
    }

    async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        if self
            .accounts()
            .iter()
            .any(|account| account.user.email.as_deref() == Some(email))
        {
            Ok(())
        } else {
            Err(AuthError::Rejected("User not found".into()))
        }
    }

    async fn update_profile(
        &self,
        session: &Session,
        profile: &UserMetadata,
    ) -> Result<AuthUser, AuthError> {
        let mut accounts = self.accounts();
        let account = accounts
            .iter_mut()
            .find(|account| account.user.id == session.user.id)
            .ok_or(AuthError::SignedOut)?;
        if profile.full_name.is_some() {
            account.user.user_metadata.full_name = profile.full_name.clone();
        }
        Ok(account.user.clone())
    }

    async fn current_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        self.user_for_token(access_token)
            .ok_or_else(|| AuthError::Rejected("Invalid session".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_sign_up_is_refused() {
        let auth = MockAuth::seeded();
        let err = auth
            .sign_up(MOCK_ADMIN_EMAIL, "another", &UserMetadata::default())
            .await
            .expect_err("duplicate");
        assert_eq!(err.to_string(), "User with this email already exists");
    }

    #[tokio::test]
    async fn new_accounts_can_sign_in() {
        let auth = MockAuth::seeded();
        let outcome = auth
            .sign_up("new@art.town", "paints", &UserMetadata::default())
            .await
            .expect("sign up");
        assert_eq!(outcome.user.user_metadata.full_name.as_deref(), Some("User"));

        let session = auth.sign_in("new@art.town", "paints").await.expect("sign in");
        assert_eq!(session.user.id, outcome.user.id);
        assert_eq!(
            auth.current_user(&session.access_token)
                .await
                .expect("token resolves"),
            session.user
        );
    }

    #[tokio::test]
    async fn foreign_tokens_are_rejected() {
        let auth = MockAuth::seeded();
        assert!(matches!(
            auth.current_user("jwt-from-elsewhere").await,
            Err(AuthError::Rejected(_))
        ));
    }
}
