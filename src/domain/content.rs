//! The shape shared by courses and articles.
//!
//! Mutation and view code is written once against [`Content`]; the two
//! collections only differ in their editable fields and validation rules.

use happyart_api_types::{Article, ArticleDraft, ContentId, Course, CourseDraft};
use serde::{Serialize, de::DeserializeOwned};
use time::OffsetDateTime;

use super::error::DomainError;
use super::types::ContentKind;

/// Editable fields submitted for a create or update.
pub trait ContentDraft: Clone + Default + Send + Sync + Serialize + 'static {
    /// Reject drafts that must never reach the backend.
    fn validate(&self) -> Result<(), DomainError>;

    fn set_image_url(&mut self, url: String);
}

pub trait Content:
    Clone + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    type Draft: ContentDraft + for<'a> From<&'a Self>;

    const KIND: ContentKind;

    fn id(&self) -> ContentId;

    fn title(&self) -> &str;

    fn is_published(&self) -> bool;

    fn set_published(&mut self, published: bool);

    fn created_at(&self) -> OffsetDateTime;

    fn updated_at(&self) -> Option<OffsetDateTime>;

    fn touch(&mut self, at: OffsetDateTime);

    /// Overwrite every editable field with the draft's values.
    fn merge_draft(&mut self, draft: &Self::Draft);

    /// Materialize a fresh, unpublished row from a draft.
    fn from_draft(id: ContentId, draft: &Self::Draft, now: OffsetDateTime) -> Self;
}

fn require(value: &str, message: &'static str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(message));
    }
    Ok(())
}

impl ContentDraft for CourseDraft {
    fn validate(&self) -> Result<(), DomainError> {
        require(&self.title, "Title is required")?;
        require(&self.description, "Description is required")
    }

    fn set_image_url(&mut self, url: String) {
        self.image_url = Some(url);
    }
}

impl ContentDraft for ArticleDraft {
    fn validate(&self) -> Result<(), DomainError> {
        require(&self.title, "Title is required")
    }

    fn set_image_url(&mut self, url: String) {
        self.image_url = Some(url);
    }
}

impl Content for Course {
    type Draft = CourseDraft;

    const KIND: ContentKind = ContentKind::Course;

    fn id(&self) -> ContentId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn is_published(&self) -> bool {
        self.is_published
    }

    fn set_published(&mut self, published: bool) {
        self.is_published = published;
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    fn updated_at(&self) -> Option<OffsetDateTime> {
        self.updated_at
    }

    fn touch(&mut self, at: OffsetDateTime) {
        self.updated_at = Some(at);
    }

    fn merge_draft(&mut self, draft: &CourseDraft) {
        self.title.clone_from(&draft.title);
        self.description.clone_from(&draft.description);
        self.age_group.clone_from(&draft.age_group);
        self.image_emoji.clone_from(&draft.image_emoji);
        self.image_url.clone_from(&draft.image_url);
        self.duration.clone_from(&draft.duration);
        self.lessons = draft.lessons;
        self.difficulty.clone_from(&draft.difficulty);
    }

    fn from_draft(id: ContentId, draft: &CourseDraft, now: OffsetDateTime) -> Self {
        Course {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            age_group: draft.age_group.clone(),
            image_emoji: draft.image_emoji.clone(),
            image_url: draft.image_url.clone(),
            duration: draft.duration.clone(),
            lessons: draft.lessons,
            difficulty: draft.difficulty.clone(),
            is_published: false,
            created_at: now,
            updated_at: Some(now),
        }
    }
}

impl Content for Article {
    type Draft = ArticleDraft;

    const KIND: ContentKind = ContentKind::Article;

    fn id(&self) -> ContentId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn is_published(&self) -> bool {
        self.is_published
    }

    fn set_published(&mut self, published: bool) {
        self.is_published = published;
    }

    fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    fn updated_at(&self) -> Option<OffsetDateTime> {
        self.updated_at
    }

    fn touch(&mut self, at: OffsetDateTime) {
        self.updated_at = Some(at);
    }

    fn merge_draft(&mut self, draft: &ArticleDraft) {
        self.title.clone_from(&draft.title);
        self.excerpt.clone_from(&draft.excerpt);
        self.content.clone_from(&draft.content);
        self.category.clone_from(&draft.category);
        self.image_emoji.clone_from(&draft.image_emoji);
        self.image_url.clone_from(&draft.image_url);
        self.read_time.clone_from(&draft.read_time);
    }

    fn from_draft(id: ContentId, draft: &ArticleDraft, now: OffsetDateTime) -> Self {
        Article {
            id,
            title: draft.title.clone(),
            excerpt: draft.excerpt.clone(),
            content: draft.content.clone(),
            category: draft.category.clone(),
            image_emoji: draft.image_emoji.clone(),
            image_url: draft.image_url.clone(),
            read_time: draft.read_time.clone(),
            is_published: false,
            created_at: now,
            updated_at: Some(now),
        }
    }
}
