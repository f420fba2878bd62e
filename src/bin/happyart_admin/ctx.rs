#![deny(clippy::all, clippy::pedantic)]

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex, PoisonError};

use happyart::application::admin::{AdminConsole, ContentError, SettingsError, UploadError};
use happyart::application::auth::{AuthError, SessionGate, SessionManager};
use happyart::application::confirm::Confirm;
use happyart::application::error::AppError;
use happyart::application::notify::{Toast, ToastCenter};
use happyart::application::repos::RepoError;
use happyart::config::{LoadError, Settings};
use happyart::domain::Session;
use happyart::domain::error::DomainError;
use happyart::infra::{self, error::InfraError};
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("not signed in (run `happyart-admin auth login` first)")]
    SignedOut,
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to render output: {0}")]
    Render(String),
}

impl From<InfraError> for CliError {
    fn from(err: InfraError) -> Self {
        Self::App(AppError::from(err))
    }
}

impl From<DomainError> for CliError {
    fn from(err: DomainError) -> Self {
        Self::App(AppError::from(err))
    }
}

impl CliError {
    /// Exit status; validation problems and missing rows get their own codes.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(_) => 78,
            CliError::App(err) => u8::try_from(err.exit_code()).unwrap_or(1),
            CliError::Content(ContentError::Validation(_))
            | CliError::Upload(UploadError::Invalid(_))
            | CliError::Auth(AuthError::Validation(_))
            | CliError::InvalidInput(_)
            | CliError::InputFile { .. } => 2,
            CliError::Content(ContentError::Repo(err))
            | CliError::Settings(SettingsError::Repo(err))
            | CliError::Upload(UploadError::Repo(err))
            | CliError::Auth(AuthError::Repo(err)) => repo_exit_code(err),
            CliError::SignedOut | CliError::Auth(AuthError::SignedOut) => 77,
            _ => 1,
        }
    }
}

fn repo_exit_code(err: &RepoError) -> u8 {
    match err {
        RepoError::NotFound => 3,
        _ => 69,
    }
}

/// Reads y/N answers from stdin unless `--yes` was given.
#[derive(Debug, Clone, Copy)]
pub struct TerminalConfirm {
    assume_yes: bool,
}

impl TerminalConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Everything a handler needs: resolved settings plus the shared toast channel.
pub struct Ctx {
    pub settings: Settings,
    toasts: ToastCenter,
    confirm: Arc<dyn Confirm>,
    seen: Mutex<watch::Receiver<Option<Toast>>>,
}

impl Ctx {
    pub fn new(settings: Settings, confirm: Arc<dyn Confirm>) -> Self {
        let toasts = ToastCenter::new(settings.notifications.toast_ttl);
        let seen = Mutex::new(toasts.subscribe());
        Self {
            settings,
            toasts,
            confirm,
            seen,
        }
    }

    /// Print the newest toast to stderr if it has not been printed yet.
    pub fn flush_toasts(&self) {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        if !seen.has_changed().unwrap_or(false) {
            return;
        }
        if let Some(toast) = seen.borrow_and_update().clone() {
            eprintln!("[{}] {}", toast.kind.as_str(), toast.text);
        }
    }

    pub fn sessions(&self) -> Result<SessionManager, CliError> {
        Ok(infra::build_session_manager(
            &self.settings,
            self.toasts.clone(),
            self.confirm.clone(),
        )?)
    }

    /// Resolve the cached session; the console is only reachable when signed in.
    pub async fn signed_in(&self) -> Result<Session, CliError> {
        let sessions = self.sessions()?;
        match sessions.restore().await? {
            SessionGate::SignedIn(session) => Ok(session),
            SessionGate::Loading | SessionGate::SignedOut => Err(CliError::SignedOut),
        }
    }

    /// A signed-in console with both collections loaded.
    pub async fn console(&self) -> Result<AdminConsole, CliError> {
        let session = self.signed_in().await?;
        self.console_as(&session).await
    }

    pub async fn console_as(&self, session: &Session) -> Result<AdminConsole, CliError> {
        let console = infra::build_console(
            &self.settings,
            self.toasts.clone(),
            self.confirm.clone(),
            Some(&session.access_token),
        )?;
        console.load_collections().await;
        if let Some(banner) = console.banner() {
            match banner.message.as_deref() {
                Some(message) => eprintln!("{}: {message}", banner.headline()),
                None => eprintln!("{}", banner.headline()),
            }
        }
        Ok(console)
    }
}
