#![deny(clippy::all, clippy::pedantic)]

use std::sync::Arc;

use happyart::application::admin::ContentError;
use happyart::application::auth::SessionStore;
use happyart::application::confirm::FixedAnswer;
use happyart::config::{self, ConfigArgs};
use happyart::domain::{ArticleDraft, AuthUser, CourseDraft, Session, UserMetadata};
use happyart::infra::session_cache::FileSessionStore;
use httpmock::MockServer;
use tempfile::{TempDir, tempdir};

use crate::args::{ArticleFields, CourseFields, CoursesCmd, IdArg};
use crate::ctx::{CliError, Ctx};
use crate::handlers::content::{DraftFields, handle_courses};

const COURSES: &str = r#"[{
    "id": 3, "title": "Finger Painting", "description": "Mess allowed",
    "age_group": "2-4", "image_emoji": "🖐️", "image_url": null,
    "duration": "20 mins", "lessons": 4, "difficulty": "Beginner",
    "is_published": false, "created_at": "2024-05-01T09:00:00Z"
}]"#;

fn ctx_for(dir: &TempDir, server: Option<&MockServer>) -> Ctx {
    let args = ConfigArgs {
        backend_url: server.map(MockServer::base_url),
        anon_key: server.map(|_| "anon-key".to_string()),
        session_file: Some(dir.path().join("session.json")),
        ..Default::default()
    };
    let settings = config::load(&args).expect("settings");
    Ctx::new(settings, Arc::new(FixedAnswer(true)))
}

async fn cache_session(dir: &TempDir) {
    FileSessionStore::new(dir.path().join("session.json"))
        .save(&Session {
            access_token: "user-jwt".into(),
            refresh_token: None,
            expires_in: Some(3600),
            user: AuthUser {
                id: "u-1".into(),
                email: Some("teacher@art.town".into()),
                user_metadata: UserMetadata::default(),
            },
        })
        .await
        .expect("cache session");
}

#[test]
fn exit_codes_follow_error_category() {
    assert_eq!(
        CliError::Content(ContentError::Validation("Title is required".into())).exit_code(),
        2
    );
    assert_eq!(CliError::SignedOut.exit_code(), 77);
    assert_eq!(
        CliError::Content(ContentError::Repo(
            happyart::application::repos::RepoError::Transport("down".into())
        ))
        .exit_code(),
        69
    );
}

#[test]
fn course_fields_only_touch_given_flags() {
    let mut draft = CourseDraft {
        title: "Old".into(),
        description: "Kept".into(),
        ..CourseDraft::default()
    };
    CourseFields {
        title: Some("New".into()),
        lessons: Some(8),
        ..CourseFields::default()
    }
    .apply_to(&mut draft)
    .expect("apply");

    assert_eq!(draft.title, "New");
    assert_eq!(draft.description, "Kept");
    assert_eq!(draft.lessons, 8);
    assert_eq!(draft.difficulty, "Beginner");
}

#[test]
fn article_body_can_come_from_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("body.md");
    std::fs::write(&path, "Paint the sky.\n").expect("write");

    let mut draft = ArticleDraft::default();
    ArticleFields {
        content: Some("ignored".into()),
        content_file: Some(path),
        ..ArticleFields::default()
    }
    .apply_to(&mut draft)
    .expect("apply");

    assert_eq!(draft.content, "Paint the sky.");
}

#[test]
fn image_type_is_guessed_from_extension() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("owl.PNG");
    std::fs::write(&path, [0x89, b'P', b'N', b'G']).expect("write");

    let image = crate::io::read_image(&path).expect("image");
    assert_eq!(image.name, "owl.PNG");
    assert_eq!(image.content_type, "image/png");
    assert_eq!(image.size(), 4);
}

#[tokio::test]
async fn content_commands_need_a_session() {
    let dir = tempdir().expect("tempdir");
    let ctx = ctx_for(&dir, None);

    let err = handle_courses(
        &ctx,
        CoursesCmd::List(crate::args::ListArgs {
            search: String::new(),
            status: crate::args::StatusArg::All,
        }),
    )
    .await
    .expect_err("signed out");
    assert!(matches!(err, CliError::SignedOut));
}

#[tokio::test]
async fn toggle_patches_live_row_with_user_token() {
    let dir = tempdir().expect("tempdir");
    cache_session(&dir).await;
    let server = MockServer::start();

    let whoami = server.mock(|when, then| {
        when.method("GET")
            .path("/auth/v1/user")
            .header("authorization", "Bearer user-jwt");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"id":"u-1","email":"teacher@art.town","user_metadata":{}}"#);
    });
    server.mock(|when, then| {
        when.method("GET").path("/rest/v1/courses");
        then.status(200)
            .header("content-type", "application/json")
            .body(COURSES);
    });
    server.mock(|when, then| {
        when.method("GET").path("/rest/v1/articles");
        then.status(200)
            .header("content-type", "application/json")
            .body("[]");
    });
    let patch = server.mock(|when, then| {
        when.method("PATCH")
            .path("/rest/v1/courses")
            .query_param("id", "eq.3")
            .header("apikey", "anon-key")
            .header("authorization", "Bearer user-jwt")
            .json_body_includes(r#"{"is_published":true}"#);
        then.status(200)
            .header("content-type", "application/json")
            .body(COURSES.replace("\"is_published\": false", "\"is_published\": true"));
    });

    let ctx = ctx_for(&dir, Some(&server));
    handle_courses(&ctx, CoursesCmd::Toggle(IdArg { id: 3 }))
        .await
        .expect("toggle");

    whoami.assert();
    patch.assert();
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let dir = tempdir().expect("tempdir");
    cache_session(&dir).await;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/auth/v1/user");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"id":"u-1","email":"teacher@art.town","user_metadata":{}}"#);
    });
    server.mock(|when, then| {
        when.method("GET").path("/rest/v1/courses");
        then.status(200)
            .header("content-type", "application/json")
            .body(COURSES);
    });
    server.mock(|when, then| {
        when.method("GET").path("/rest/v1/articles");
        then.status(200)
            .header("content-type", "application/json")
            .body("[]");
    });

    let ctx = ctx_for(&dir, Some(&server));
    let err = handle_courses(&ctx, CoursesCmd::Delete(IdArg { id: 99 }))
        .await
        .expect_err("missing");
    assert_eq!(err.exit_code(), 3);
}
