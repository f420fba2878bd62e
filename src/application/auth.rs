//! Sign-in, sign-up and the session gate in front of the console.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use happyart_api_types::{AuthUser, Session, UserMetadata};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::infra::error::InfraError;

use super::confirm::{Confirm, LOGOUT_PROMPT};
use super::notify::ToastCenter;
use super::repos::RepoError;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every problem found in one submitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors(pub Vec<FieldError>);

impl FormErrors {
    fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    fn into_result(self) -> Result<(), AuthError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AuthError::Validation(self))
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<_> = self.0.iter().map(|err| err.message).collect();
        f.write_str(&messages.join("; "))
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(FormErrors),
    #[error("{0}")]
    Rejected(String),
    #[error("not signed in")]
    SignedOut,
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Cache(#[from] InfraError),
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
}

fn check_email(errors: &mut FormErrors, email: &str) {
    if email.is_empty() {
        errors.push("email", "Email is required");
    } else if !EMAIL_SHAPE.is_match(email) {
        errors.push("email", "Email is invalid");
    }
}

fn check_password(errors: &mut FormErrors, password: &str) {
    if password.is_empty() {
        errors.push("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push("password", "Password must be at least 6 characters");
    }
}

impl Credentials {
    pub fn validate(&self) -> Result<(), AuthError> {
        let mut errors = FormErrors::default();
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);
        errors.into_result()
    }
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), AuthError> {
        let mut errors = FormErrors::default();
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);
        if self.full_name.trim().is_empty() {
            errors.push("full_name", "Full name is required");
        }
        if self.confirm_password.is_empty() {
            errors.push("confirm_password", "Please confirm your password");
        } else if self.password != self.confirm_password {
            errors.push("confirm_password", "Passwords do not match");
        }
        errors.into_result()
    }
}

/// What the identity provider returned for a sign-up.
#[derive(Debug, Clone, Serialize)]
pub struct SignUpOutcome {
    pub user: AuthUser,
    pub session: Option<Session>,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &UserMetadata,
    ) -> Result<SignUpOutcome, AuthError>;

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError>;

    async fn reset_password(&self, email: &str) -> Result<(), AuthError>;

    async fn update_profile(
        &self,
        session: &Session,
        profile: &UserMetadata,
    ) -> Result<AuthUser, AuthError>;

    /// Resolve the user behind a cached access token.
    async fn current_user(&self, access_token: &str) -> Result<AuthUser, AuthError>;
}

/// Where the signed-in session survives between runs.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<Session>, InfraError>;

    async fn save(&self, session: &Session) -> Result<(), InfraError>;

    async fn clear(&self) -> Result<(), InfraError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "session", rename_all = "snake_case")]
pub enum SessionGate {
    Loading,
    SignedOut,
    SignedIn(Session),
}

impl SessionGate {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionGate::SignedIn(session) => Some(session),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignOutOutcome {
    SignedOut,
    Cancelled,
}

pub struct SessionManager {
    service: Arc<dyn AuthService>,
    store: Arc<dyn SessionStore>,
    confirm: Arc<dyn Confirm>,
    toasts: ToastCenter,
    gate: watch::Sender<SessionGate>,
}

impl SessionManager {
    pub fn new(
        service: Arc<dyn AuthService>,
        store: Arc<dyn SessionStore>,
        confirm: Arc<dyn Confirm>,
        toasts: ToastCenter,
    ) -> Self {
        let (gate, _) = watch::channel(SessionGate::Loading);
        Self {
            service,
            store,
            confirm,
            toasts,
            gate,
        }
    }

    pub fn gate(&self) -> SessionGate {
        self.gate.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionGate> {
        self.gate.subscribe()
    }

    pub fn toasts(&self) -> &ToastCenter {
        &self.toasts
    }

    /// Resolve the gate from the cached session. A token the provider no
    /// longer accepts is discarded; an unreachable provider keeps the cache.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Result<SessionGate, AuthError> {
        self.gate.send_replace(SessionGate::Loading);

        let Some(mut session) = self.store.load().await? else {
            self.gate.send_replace(SessionGate::SignedOut);
            return Ok(SessionGate::SignedOut);
        };

        match self.service.current_user(&session.access_token).await {
            Ok(user) => session.user = user,
            Err(AuthError::Rejected(reason)) => {
                info!(%reason, "cached session rejected");
                self.store.clear().await?;
                self.gate.send_replace(SessionGate::SignedOut);
                return Ok(SessionGate::SignedOut);
            }
            Err(err) => warn!(error = %err, "could not verify cached session"),
        }

        let gate = SessionGate::SignedIn(session);
        self.gate.send_replace(gate.clone());
        Ok(gate)
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let result = async {
            credentials.validate()?;
            let session = self
                .service
                .sign_in(&credentials.email, &credentials.password)
                .await?;
            self.store.save(&session).await?;
            Ok::<_, AuthError>(session)
        }
        .await;

        match result {
            Ok(session) => {
                self.gate.send_replace(SessionGate::SignedIn(session.clone()));
                self.toasts.success("Welcome back!");
                Ok(session)
            }
            Err(err) => Err(self.fail(err, None)),
        }
    }

    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<SignUpOutcome, AuthError> {
        let result = async {
            form.validate()?;
            let profile = UserMetadata {
                full_name: Some(form.full_name.trim().to_string()),
            };
            let outcome = self
                .service
                .sign_up(&form.email, &form.password, &profile)
                .await?;
            if let Some(session) = &outcome.session {
                self.store.save(session).await?;
            }
            Ok::<_, AuthError>(outcome)
        }
        .await;

        match result {
            Ok(outcome) => {
                if let Some(session) = &outcome.session {
                    self.gate.send_replace(SessionGate::SignedIn(session.clone()));
                }
                self.toasts
                    .success("Account created! Please check your email to verify your account.");
                Ok(outcome)
            }
            Err(err) => Err(self.fail(err, None)),
        }
    }

    /// Ask first; a declined prompt keeps the session.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<SignOutOutcome, AuthError> {
        if !self.confirm.confirm(LOGOUT_PROMPT) {
            return Ok(SignOutOutcome::Cancelled);
        }

        let result = async {
            if let Some(session) = self.gate().session() {
                self.service.sign_out(session).await?;
            }
            self.store.clear().await?;
            Ok::<_, AuthError>(())
        }
        .await;

        match result {
            Ok(()) => {
                self.gate.send_replace(SessionGate::SignedOut);
                Ok(SignOutOutcome::SignedOut)
            }
            Err(err) => Err(self.fail(err, Some("Error logging out"))),
        }
    }

    #[instrument(skip(self))]
    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        if email.trim().is_empty() {
            self.toasts.error("Please enter your email address first");
            let mut errors = FormErrors::default();
            errors.push("email", "Email is required");
            return Err(AuthError::Validation(errors));
        }

        match self.service.reset_password(email.trim()).await {
            Ok(()) => {
                self.toasts
                    .success("Password reset email sent! Check your inbox.");
                Ok(())
            }
            Err(err) => Err(self.fail(err, None)),
        }
    }

    #[instrument(skip(self))]
    pub async fn update_profile(&self, full_name: &str) -> Result<AuthUser, AuthError> {
        let result = async {
            let mut session = self.gate().session().cloned().ok_or(AuthError::SignedOut)?;
            let mut profile = session.user.user_metadata.clone();
            profile.full_name = Some(full_name.trim().to_string());
            let user = self.service.update_profile(&session, &profile).await?;
            session.user = user;
            self.store.save(&session).await?;
            Ok::<_, AuthError>(session)
        }
        .await;

        match result {
            Ok(session) => {
                let user = session.user.clone();
                self.gate.send_replace(SessionGate::SignedIn(session));
                self.toasts.success("Profile updated successfully!");
                Ok(user)
            }
            Err(err) => Err(self.fail(err, Some("Error updating profile"))),
        }
    }

    fn fail(&self, err: AuthError, prefix: Option<&str>) -> AuthError {
        warn!(error = %err, "auth operation failed");
        match prefix {
            Some(prefix) => self.toasts.error(format!("{prefix}: {err}")),
            None => self.toasts.error(err.to_string()),
        };
        err
    }
}
