//! Row and request types for the Happy Art Town content API.
//!
//! Column names follow the `courses`, `articles` and `settings` tables; the
//! auth types follow the identity provider's JSON shapes.

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

pub mod timestamp;

/// Server-assigned row identifier (`SERIAL` in the store).
pub type ContentId = i64;

/// Age-group tags offered by the course form.
pub const AGE_GROUPS: &[&str] = &["2-4", "5-8", "9-12"];

/// Difficulty labels offered by the course form.
pub const DIFFICULTIES: &[&str] = &["Beginner", "Easy", "Intermediate", "Advanced"];

/// Article categories offered by the article form.
pub const CATEGORIES: &[&str] = &["tips", "tutorials", "inspiration"];

/// Nullable columns read as their type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: ContentId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub age_group: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_emoji: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lessons: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub difficulty: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_published: bool,
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ContentId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub excerpt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_emoji: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub read_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_published: bool,
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

/// Editable course fields as submitted by a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub age_group: String,
    pub image_emoji: String,
    pub image_url: Option<String>,
    pub duration: String,
    pub lessons: i32,
    pub difficulty: String,
}

impl Default for CourseDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            age_group: "2-4".to_string(),
            image_emoji: "🎨".to_string(),
            image_url: None,
            duration: String::new(),
            lessons: 0,
            difficulty: "Beginner".to_string(),
        }
    }
}

impl From<&Course> for CourseDraft {
    fn from(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            description: course.description.clone(),
            age_group: course.age_group.clone(),
            image_emoji: course.image_emoji.clone(),
            image_url: course.image_url.clone(),
            duration: course.duration.clone(),
            lessons: course.lessons,
            difficulty: course.difficulty.clone(),
        }
    }
}

/// Editable article fields as submitted by a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDraft {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub image_emoji: String,
    pub image_url: Option<String>,
    pub read_time: String,
}

impl Default for ArticleDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            excerpt: String::new(),
            content: String::new(),
            category: "tips".to_string(),
            image_emoji: "📝".to_string(),
            image_url: None,
            read_time: String::new(),
        }
    }
}

impl From<&Article> for ArticleDraft {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            excerpt: article.excerpt.clone(),
            content: article.content.clone(),
            category: article.category.clone(),
            image_emoji: article.image_emoji.clone(),
            image_url: article.image_url.clone(),
            read_time: article.read_time.clone(),
        }
    }
}

/// Insert payload: the draft plus server-side bookkeeping columns.
#[derive(Debug, Serialize)]
pub struct InsertRow<'a, D> {
    #[serde(flatten)]
    pub draft: &'a D,
    pub is_published: bool,
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: OffsetDateTime,
}

/// Partial update payload keyed by id in the query string.
#[derive(Debug, Serialize)]
pub struct UpdateRow<'a, D> {
    #[serde(flatten)]
    pub draft: &'a D,
    #[serde(with = "timestamp")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PublishPatch {
    pub is_published: bool,
    #[serde(with = "timestamp")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingRow {
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct SettingUpsert<'a> {
    pub key: &'a str,
    pub value: &'a str,
    #[serde(with = "timestamp")]
    pub updated_at: OffsetDateTime,
}

/// Body for bulk object removal.
#[derive(Debug, Serialize)]
pub struct RemoveObjectsRequest<'a> {
    pub prefixes: &'a [&'a str],
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_metadata: UserMetadata,
}

/// An authenticated session as issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

#[derive(Debug, Serialize)]
pub struct PasswordGrantRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SignUpRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub data: &'a UserMetadata,
}

/// Sign-up returns a session when e-mail confirmation is disabled, a bare user otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(Session),
    User(AuthUser),
}

#[derive(Debug, Serialize)]
pub struct RecoverRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UpdateUserRequest<'a> {
    pub data: &'a UserMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn course_rows_tolerate_null_columns() {
        let row = r#"{
            "id": 7,
            "title": "Clay Animals",
            "description": null,
            "age_group": "5-8",
            "image_emoji": null,
            "duration": null,
            "lessons": null,
            "difficulty": "Easy",
            "is_published": false,
            "created_at": "2024-03-01T09:30:00",
            "updated_at": null
        }"#;

        let course: Course = serde_json::from_str(row).expect("course row");
        assert_eq!(course.id, 7);
        assert_eq!(course.description, "");
        assert_eq!(course.lessons, 0);
        assert_eq!(course.image_url, None);
        assert_eq!(course.created_at, datetime!(2024-03-01 09:30:00 UTC));
        assert_eq!(course.updated_at, None);
    }

    #[test]
    fn insert_payload_flattens_draft_fields() {
        let draft = ArticleDraft {
            title: "Paper Boats".into(),
            ..ArticleDraft::default()
        };
        let payload = InsertRow {
            draft: &draft,
            is_published: false,
            created_at: datetime!(2024-05-01 12:00:00 UTC),
            updated_at: datetime!(2024-05-01 12:00:00 UTC),
        };

        let value = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(value["title"], "Paper Boats");
        assert_eq!(value["category"], "tips");
        assert_eq!(value["is_published"], false);
        assert_eq!(value["created_at"], "2024-05-01T12:00:00Z");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn sign_up_response_accepts_bare_user() {
        let body = r#"{"id":"u-1","email":"a@b.c","user_metadata":{"full_name":"A"}}"#;
        let response: SignUpResponse = serde_json::from_str(body).expect("user");
        match response {
            SignUpResponse::User(user) => {
                assert_eq!(user.id, "u-1");
                assert_eq!(user.user_metadata.full_name.as_deref(), Some("A"));
            }
            SignUpResponse::Session(_) => panic!("expected a bare user"),
        }
    }
}
