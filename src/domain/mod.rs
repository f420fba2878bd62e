//! Domain layer types and invariants.

pub mod content;
pub mod error;
pub mod fixtures;
pub mod types;
pub mod uploads;

pub use happyart_api_types::{
    Article, ArticleDraft, AuthUser, ContentId, Course, CourseDraft, Session, UserMetadata,
};
