//! In-memory state container and the pure reducers that reconcile it.

use std::collections::BTreeMap;

use happyart_api_types::{Article, ContentId, Course};
use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::content::Content;
use crate::domain::types::BackendMode;

/// Everything the console shows, materialized from exactly one backend.
#[derive(Debug, Clone, Serialize)]
pub struct AdminState {
    pub courses: Vec<Course>,
    pub articles: Vec<Article>,
    pub settings: BTreeMap<String, String>,
    pub mode: BackendMode,
    pub last_error: Option<String>,
    #[serde(with = "happyart_api_types::timestamp::option")]
    pub last_updated: Option<OffsetDateTime>,
}

impl AdminState {
    pub fn new(mode: BackendMode) -> Self {
        Self {
            courses: Vec::new(),
            articles: Vec::new(),
            settings: BTreeMap::new(),
            mode,
            last_error: None,
            last_updated: None,
        }
    }
}

/// Access to a content type's slice of [`AdminState`].
pub trait StateCollection: Content {
    fn items(state: &AdminState) -> &Vec<Self>;
    fn items_mut(state: &mut AdminState) -> &mut Vec<Self>;
}

impl StateCollection for Course {
    fn items(state: &AdminState) -> &Vec<Self> {
        &state.courses
    }

    fn items_mut(state: &mut AdminState) -> &mut Vec<Self> {
        &mut state.courses
    }
}

impl StateCollection for Article {
    fn items(state: &AdminState) -> &Vec<Self> {
        &state.articles
    }

    fn items_mut(state: &mut AdminState) -> &mut Vec<Self> {
        &mut state.articles
    }
}

/// Put a freshly created row at the head of the collection.
pub fn prepend<T: Content>(items: &mut Vec<T>, row: T) {
    items.insert(0, row);
}

/// Replace the entry sharing `row`'s id. Returns false when no entry matched.
pub fn replace<T: Content>(items: &mut [T], row: T) -> bool {
    match items.iter_mut().find(|item| item.id() == row.id()) {
        Some(slot) => {
            *slot = row;
            true
        }
        None => false,
    }
}

/// Drop the entry with `id`. Returns false when nothing was removed.
pub fn remove<T: Content>(items: &mut Vec<T>, id: ContentId) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

/// Swap in a freshly loaded collection, newest first.
pub fn replace_all<T: Content>(items: &mut Vec<T>, mut rows: Vec<T>) {
    newest_first(&mut rows);
    *items = rows;
}

/// Sort newest first; ties keep their incoming order.
pub fn newest_first<T: Content>(items: &mut [T]) {
    items.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
}
