use serde::Serialize;
use thiserror::Error;

use crate::application::repos::{BackendCollection, RepoError};
use crate::application::state::StateCollection;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("another content change is still in progress")]
    Busy,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// A content type the console can load, mutate and reconcile.
pub trait ManagedContent: BackendCollection + StateCollection {}

impl<T: BackendCollection + StateCollection> ManagedContent for T {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Action {
    Create,
    Update,
    Toggle,
    Delete,
}

impl Action {
    pub(super) fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Toggle => "toggle",
            Action::Delete => "delete",
        }
    }

    /// Prefix of the error toast shown when the backend rejects the action.
    pub(super) fn failure_prefix(self) -> &'static str {
        match self {
            Action::Create | Action::Update => "Error saving item",
            Action::Toggle => "Error updating status",
            Action::Delete => "Error deleting item",
        }
    }
}
