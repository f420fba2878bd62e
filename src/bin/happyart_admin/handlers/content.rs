#![deny(clippy::all, clippy::pedantic)]

use happyart::application::admin::{AdminConsole, ManagedContent};
use happyart::domain::content::{Content, ContentDraft};
use happyart::domain::error::DomainError;
use happyart::domain::{Article, ArticleDraft, ContentId, Course, CourseDraft};
use serde_json::json;
use tracing::warn;

use crate::args::{
    ArticleFields, ArticlesCmd, CourseFields, CoursesCmd, IdArg, ImageArg, ListArgs,
};
use crate::ctx::{CliError, Ctx};
use crate::io::{read_image, read_opt_value};
use crate::print::print_json;

/// Command-line fields that fill in a draft. Absent flags leave the draft as is.
pub trait DraftFields {
    type Draft: ContentDraft;

    fn apply_to(self, draft: &mut Self::Draft) -> Result<(), CliError>;
}

impl DraftFields for CourseFields {
    type Draft = CourseDraft;

    fn apply_to(self, draft: &mut CourseDraft) -> Result<(), CliError> {
        let CourseFields {
            title,
            description,
            age_group,
            emoji,
            duration,
            lessons,
            difficulty,
        } = self;

        if let Some(title) = title {
            draft.title = title;
        }
        if let Some(description) = description {
            draft.description = description;
        }
        if let Some(age_group) = age_group {
            draft.age_group = age_group;
        }
        if let Some(emoji) = emoji {
            draft.image_emoji = emoji;
        }
        if let Some(duration) = duration {
            draft.duration = duration;
        }
        if let Some(lessons) = lessons {
            draft.lessons = lessons;
        }
        if let Some(difficulty) = difficulty {
            draft.difficulty = difficulty;
        }
        Ok(())
    }
}

impl DraftFields for ArticleFields {
    type Draft = ArticleDraft;

    fn apply_to(self, draft: &mut ArticleDraft) -> Result<(), CliError> {
        let ArticleFields {
            title,
            excerpt,
            content,
            content_file,
            category,
            emoji,
            read_time,
        } = self;

        if let Some(title) = title {
            draft.title = title;
        }
        if let Some(excerpt) = excerpt {
            draft.excerpt = excerpt;
        }
        if let Some(content) = read_opt_value(content, content_file)? {
            draft.content = content;
        }
        if let Some(category) = category {
            draft.category = category;
        }
        if let Some(emoji) = emoji {
            draft.image_emoji = emoji;
        }
        if let Some(read_time) = read_time {
            draft.read_time = read_time;
        }
        Ok(())
    }
}

pub async fn handle_courses(ctx: &Ctx, cmd: CoursesCmd) -> Result<(), CliError> {
    let console = ctx.console().await?;
    match cmd {
        CoursesCmd::List(args) => list::<Course>(&console, &args),
        CoursesCmd::Show(IdArg { id }) => print_json(&find::<Course>(&console, id)?),
        CoursesCmd::Create { fields, image } => {
            create::<Course, _>(ctx, &console, fields, image).await
        }
        CoursesCmd::Update { id, fields, image } => {
            update::<Course, _>(ctx, &console, id.id, fields, image).await
        }
        CoursesCmd::Toggle(IdArg { id }) => toggle::<Course>(ctx, &console, id).await,
        CoursesCmd::Delete(IdArg { id }) => delete::<Course>(ctx, &console, id).await,
    }
}

pub async fn handle_articles(ctx: &Ctx, cmd: ArticlesCmd) -> Result<(), CliError> {
    let console = ctx.console().await?;
    match cmd {
        ArticlesCmd::List(args) => list::<Article>(&console, &args),
        ArticlesCmd::Show(IdArg { id }) => print_json(&find::<Article>(&console, id)?),
        ArticlesCmd::Create { fields, image } => {
            create::<Article, _>(ctx, &console, fields, image).await
        }
        ArticlesCmd::Update { id, fields, image } => {
            update::<Article, _>(ctx, &console, id.id, fields, image).await
        }
        ArticlesCmd::Toggle(IdArg { id }) => toggle::<Article>(ctx, &console, id).await,
        ArticlesCmd::Delete(IdArg { id }) => delete::<Article>(ctx, &console, id).await,
    }
}

fn list<T: ManagedContent>(console: &AdminConsole, args: &ListArgs) -> Result<(), CliError> {
    print_json(&console.list::<T>(&args.search, args.status.into()))
}

fn find<T: ManagedContent>(console: &AdminConsole, id: ContentId) -> Result<T, CliError> {
    console
        .select::<T>(id)
        .ok_or_else(|| DomainError::not_found(T::KIND.as_str()).into())
}

/// Upload the picked image into the draft. A failed upload is already
/// reported as a toast; the save goes ahead without the picture.
async fn attach<D: ContentDraft>(
    ctx: &Ctx,
    console: &AdminConsole,
    draft: &mut D,
    image: ImageArg,
) -> Result<(), CliError> {
    let Some(path) = image.image else {
        return Ok(());
    };
    let file = read_image(&path)?;
    if let Err(err) = console.attach_image(draft, &file).await {
        warn!(error = %err, path = %path.display(), "saving without image");
    }
    ctx.flush_toasts();
    Ok(())
}

async fn create<T, F>(
    ctx: &Ctx,
    console: &AdminConsole,
    fields: F,
    image: ImageArg,
) -> Result<(), CliError>
where
    T: ManagedContent,
    F: DraftFields<Draft = T::Draft>,
{
    let mut draft = T::Draft::default();
    fields.apply_to(&mut draft)?;
    attach(ctx, console, &mut draft, image).await?;

    let created = console.create::<T>(draft).await;
    ctx.flush_toasts();
    print_json(&created?)
}

async fn update<T, F>(
    ctx: &Ctx,
    console: &AdminConsole,
    id: ContentId,
    fields: F,
    image: ImageArg,
) -> Result<(), CliError>
where
    T: ManagedContent,
    F: DraftFields<Draft = T::Draft>,
{
    let selected = find::<T>(console, id)?;
    let mut draft = T::Draft::from(&selected);
    fields.apply_to(&mut draft)?;
    attach(ctx, console, &mut draft, image).await?;

    let updated = console.update(&selected, draft).await;
    ctx.flush_toasts();
    print_json(&updated?)
}

async fn toggle<T: ManagedContent>(
    ctx: &Ctx,
    console: &AdminConsole,
    id: ContentId,
) -> Result<(), CliError> {
    let selected = find::<T>(console, id)?;
    let toggled = console.toggle_publish(&selected).await;
    ctx.flush_toasts();
    print_json(&toggled?)
}

async fn delete<T: ManagedContent>(
    ctx: &Ctx,
    console: &AdminConsole,
    id: ContentId,
) -> Result<(), CliError> {
    let selected = find::<T>(console, id)?;
    let outcome = console.delete(&selected).await;
    ctx.flush_toasts();
    print_json(&json!({ "id": id, "status": outcome? }))
}
