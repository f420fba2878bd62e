use std::error::Error as StdError;

use thiserror::Error;

use crate::{domain::error::DomainError, infra::error::InfraError};

use super::repos::RepoError;

/// Flattened error chain for reporting to the operator.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            let text = inner.to_string();
            if messages.last() != Some(&text) {
                messages.push(text);
            }
            current = inner.source();
        }
        Self { source, messages }
    }

    pub fn render(&self) -> String {
        self.messages.join(": ")
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl AppError {
    /// Process exit code for the terminal front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Domain(DomainError::Validation { .. }) => 2,
            AppError::Domain(DomainError::NotFound { .. }) | AppError::Repo(RepoError::NotFound) => 3,
            AppError::Infra(InfraError::Configuration { .. }) => 78,
            AppError::Repo(_) => 69,
            AppError::Infra(_) => 1,
        }
    }
}
