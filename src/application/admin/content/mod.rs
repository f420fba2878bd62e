//! Create, update, publish-toggle and delete for courses and articles.

mod commands;
mod types;

pub use types::{ContentError, DeleteOutcome, ManagedContent};
