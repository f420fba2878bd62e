use metrics::counter;
use tracing::{info, instrument, warn};

use crate::application::admin::console::AdminConsole;
use crate::application::confirm::delete_prompt;
use crate::application::repos::RepoError;
use crate::application::state::{prepend, remove, replace};
use crate::domain::content::{Content, ContentDraft};
use crate::domain::error::DomainError;
use crate::domain::types::{BackendMode, ContentKind};

use super::types::{Action, ContentError, DeleteOutcome, ManagedContent};

fn record(kind: ContentKind, action: Action, outcome: &'static str) {
    counter!(
        "happyart_mutation_total",
        "kind" => kind.as_str(),
        "action" => action.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

fn with_mode_suffix(message: String, mode: BackendMode) -> String {
    if mode.is_mock() {
        format!("{message} (Mock data)")
    } else {
        message
    }
}

impl AdminConsole {
    /// Validate and insert a new item, then prepend the stored row.
    #[instrument(skip(self, draft), fields(kind = %T::KIND))]
    pub async fn create<T: ManagedContent>(&self, draft: T::Draft) -> Result<T, ContentError> {
        let _guard = self.busy.content.try_acquire().ok_or(ContentError::Busy)?;
        self.check_draft::<T>(&draft, Action::Create)?;

        let backend = self.active_backend();
        let row = T::repo(&backend)
            .insert(&draft)
            .await
            .map_err(|err| self.reject::<T>(Action::Create, err))?;

        let stored = row.clone();
        self.reconcile::<T>(backend.mode, |items| prepend(items, stored));
        info!(id = row.id(), mode = ?backend.mode, "item created");
        self.succeed::<T>(Action::Create, "created", backend.mode);
        Ok(row)
    }

    /// Save `draft` over the selected item and replace it with the stored row.
    #[instrument(skip(self, selected, draft), fields(kind = %T::KIND, id = selected.id()))]
    pub async fn update<T: ManagedContent>(
        &self,
        selected: &T,
        draft: T::Draft,
    ) -> Result<T, ContentError> {
        let _guard = self.busy.content.try_acquire().ok_or(ContentError::Busy)?;
        self.check_draft::<T>(&draft, Action::Update)?;

        let backend = self.active_backend();
        let row = T::repo(&backend)
            .update(selected.id(), &draft)
            .await
            .map_err(|err| self.reject::<T>(Action::Update, err))?;

        let stored = row.clone();
        self.reconcile::<T>(backend.mode, |items| {
            if !replace(items, stored) {
                warn!("updated item is no longer in local state");
            }
        });
        self.succeed::<T>(Action::Update, "updated", backend.mode);
        Ok(row)
    }

    /// Flip the publish flag. Local state follows only once the backend confirms.
    #[instrument(skip(self, item), fields(kind = %T::KIND, id = item.id()))]
    pub async fn toggle_publish<T: ManagedContent>(&self, item: &T) -> Result<T, ContentError> {
        let _guard = self.busy.content.try_acquire().ok_or(ContentError::Busy)?;
        let publish = !item.is_published();

        let backend = self.active_backend();
        let row = T::repo(&backend)
            .set_published(item.id(), publish)
            .await
            .map_err(|err| self.reject::<T>(Action::Toggle, err))?;

        let stored = row.clone();
        self.reconcile::<T>(backend.mode, |items| {
            if !replace(items, stored) {
                warn!("toggled item is no longer in local state");
            }
        });
        let verb = if publish { "published" } else { "unpublished" };
        self.succeed::<T>(Action::Toggle, verb, backend.mode);
        Ok(row)
    }

    /// Delete after confirmation. Declining makes no backend call.
    #[instrument(skip(self, item), fields(kind = %T::KIND, id = item.id()))]
    pub async fn delete<T: ManagedContent>(&self, item: &T) -> Result<DeleteOutcome, ContentError> {
        let _guard = self.busy.content.try_acquire().ok_or(ContentError::Busy)?;
        if !self.ask(&delete_prompt(T::KIND)) {
            record(T::KIND, Action::Delete, "cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        let backend = self.active_backend();
        T::repo(&backend)
            .delete(item.id())
            .await
            .map_err(|err| self.reject::<T>(Action::Delete, err))?;

        self.reconcile::<T>(backend.mode, |items| {
            remove(items, item.id());
        });
        self.succeed::<T>(Action::Delete, "deleted", backend.mode);
        Ok(DeleteOutcome::Deleted)
    }

    /// Apply a confirmed change to local state, unless a load switched the
    /// console to another backend while the call was in flight.
    fn reconcile<T: ManagedContent>(&self, mode: BackendMode, change: impl FnOnce(&mut Vec<T>)) {
        let mut state = self.state();
        if state.mode != mode {
            warn!(
                call_mode = ?mode,
                current_mode = ?state.mode,
                "backend switched during the call; keeping the loaded collections"
            );
            return;
        }
        change(T::items_mut(&mut state));
    }

    fn check_draft<T: Content>(&self, draft: &T::Draft, action: Action) -> Result<(), ContentError> {
        draft.validate().map_err(|err| {
            let message = match err {
                DomainError::Validation { message } => message,
                other => other.to_string(),
            };
            record(T::KIND, action, "invalid");
            self.toasts.error(message.clone());
            ContentError::Validation(message)
        })
    }

    fn reject<T: Content>(&self, action: Action, err: RepoError) -> ContentError {
        warn!(error = %err, action = action.as_str(), "backend rejected change");
        record(T::KIND, action, "error");
        self.toasts
            .error(format!("{}: {err}", action.failure_prefix()));
        ContentError::Repo(err)
    }

    fn succeed<T: Content>(&self, action: Action, verb: &str, mode: BackendMode) {
        record(T::KIND, action, "ok");
        let message = format!("{} {verb} successfully!", T::KIND);
        self.toasts.success(with_mode_suffix(message, mode));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use happyart_api_types::{Article, ArticleDraft, Course, CourseDraft};

    use super::*;
    use crate::application::admin::testing::{
        console_answering, live_console, mock_console, recording_backend,
    };
    use crate::domain::fixtures::fallback_courses;

    fn toast_text(console: &AdminConsole) -> String {
        console
            .toasts()
            .current()
            .map(|toast| toast.text)
            .unwrap_or_default()
    }

    fn course_draft(title: &str) -> CourseDraft {
        CourseDraft {
            title: title.into(),
            description: "Big brushes, bright colors".into(),
            ..CourseDraft::default()
        }
    }

    #[tokio::test]
    async fn create_prepends_stored_row() {
        let (console, probes) = live_console().await;

        let created: Course = console
            .create(course_draft("Finger Painting"))
            .await
            .expect("create");

        assert!(!created.is_published);
        let state = console.snapshot();
        assert_eq!(state.courses.len(), 4);
        assert_eq!(state.courses[0], created);
        assert_eq!(probes.course_calls.load(Ordering::SeqCst), 1);
        assert_eq!(toast_text(&console), "course created successfully!");
        assert!(!console.busy().content);
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_backend() {
        let (console, probes) = live_console().await;
        let before = console.snapshot().courses;

        let err = console
            .create::<Course>(CourseDraft {
                title: "Only a title".into(),
                ..CourseDraft::default()
            })
            .await
            .expect_err("missing description");

        assert!(matches!(err, ContentError::Validation(ref msg) if msg == "Description is required"));
        assert_eq!(probes.course_calls.load(Ordering::SeqCst), 0);
        assert_eq!(console.snapshot().courses, before);
        assert_eq!(toast_text(&console), "Description is required");
    }

    #[tokio::test]
    async fn failed_create_keeps_state_and_releases_busy() {
        let (console, probes) = live_console().await;
        probes.fail_courses.store(true, Ordering::SeqCst);

        let err = console
            .create::<Course>(course_draft("Finger Painting"))
            .await
            .expect_err("backend down");

        assert!(matches!(err, ContentError::Repo(_)));
        assert_eq!(console.snapshot().courses, fallback_courses());
        assert_eq!(
            toast_text(&console),
            "Error saving item: backend returned 503: service unavailable"
        );
        assert!(!console.busy().content);
    }

    #[tokio::test]
    async fn row_from_replaced_backend_is_not_merged() {
        let (console, probes) = live_console().await;
        // A fallback load lands while the insert is in flight.
        console.state().mode = BackendMode::Mock;

        console
            .create::<Course>(course_draft("Finger Painting"))
            .await
            .expect("stored live");

        assert_eq!(probes.course_calls.load(Ordering::SeqCst), 1);
        assert_eq!(console.snapshot().courses, fallback_courses());
    }

    #[tokio::test]
    async fn toggling_twice_restores_publish_state() {
        let (console, _probes) = live_console().await;
        let original: Course = console.select(3).expect("course 3");

        let once = console.toggle_publish(&original).await.expect("first");
        assert!(once.is_published);
        let twice = console.toggle_publish(&once).await.expect("second");

        assert_eq!(twice.is_published, original.is_published);
        assert_eq!(
            console.select::<Course>(3).expect("course 3").is_published,
            original.is_published
        );

        let console = mock_console().await;
        let original: Article = console.select(1).expect("article 1");
        let once = console.toggle_publish(&original).await.expect("first");
        console.toggle_publish(&once).await.expect("second");
        assert!(console.select::<Article>(1).expect("article 1").is_published);
        assert_eq!(
            toast_text(&console),
            "article published successfully! (Mock data)"
        );
    }

    #[tokio::test]
    async fn mock_create_synthesizes_id_and_suffixes_toast() {
        let console = mock_console().await;

        let created: Article = console
            .create(ArticleDraft {
                title: "Painting Puddles".into(),
                ..ArticleDraft::default()
            })
            .await
            .expect("create");

        assert!(created.id > 3);
        assert_eq!(console.snapshot().articles[0].id, created.id);
        assert_eq!(
            toast_text(&console),
            "article created successfully! (Mock data)"
        );
    }

    #[tokio::test]
    async fn update_replaces_matching_entry_only() {
        let (console, _probes) = live_console().await;
        let selected: Course = console.select(2).expect("course 2");
        let mut draft = CourseDraft::from(&selected);
        draft.title = "Animal Friends Deluxe".into();

        let updated = console.update(&selected, draft).await.expect("update");

        let state = console.snapshot();
        assert_eq!(state.courses[1], updated);
        assert_eq!(state.courses[1].title, "Animal Friends Deluxe");
        assert_eq!(state.courses[0], fallback_courses()[0]);
        assert_eq!(toast_text(&console), "course updated successfully!");
    }

    #[tokio::test]
    async fn failed_update_leaves_entry_untouched() {
        let (console, probes) = live_console().await;
        let selected: Course = console.select(1).expect("course 1");
        probes.fail_courses.store(true, Ordering::SeqCst);

        let mut draft = CourseDraft::from(&selected);
        draft.title = "Rainbow Remix".into();
        console
            .update(&selected, draft)
            .await
            .expect_err("backend down");

        assert_eq!(console.select::<Course>(1), Some(selected));
        assert!(toast_text(&console).starts_with("Error saving item: "));
    }

    #[tokio::test]
    async fn toggle_waits_for_backend_in_live_mode() {
        let (console, probes) = live_console().await;
        let item: Course = console.select(1).expect("course 1");
        probes.fail_courses.store(true, Ordering::SeqCst);

        console.toggle_publish(&item).await.expect_err("backend down");
        assert!(console.select::<Course>(1).expect("still there").is_published);
        assert!(toast_text(&console).starts_with("Error updating status: "));

        probes.fail_courses.store(false, Ordering::SeqCst);
        let row = console.toggle_publish(&item).await.expect("toggle");
        assert!(!row.is_published);
        assert!(!console.select::<Course>(1).expect("still there").is_published);
        assert_eq!(toast_text(&console), "course unpublished successfully!");
    }

    #[tokio::test]
    async fn mock_toggle_publishes_draft() {
        let console = mock_console().await;
        let draft: Article = console.select(3).expect("article 3");

        console.toggle_publish(&draft).await.expect("toggle");

        assert!(console.select::<Article>(3).expect("article").is_published);
        assert_eq!(
            toast_text(&console),
            "article published successfully! (Mock data)"
        );
    }

    #[tokio::test]
    async fn declined_delete_makes_no_call() {
        let (backend, probes) = recording_backend();
        let console = console_answering(Some(backend), false);
        console.load_collections().await;
        probes.course_calls.store(0, Ordering::SeqCst);
        let item: Course = console.select(2).expect("course 2");

        let outcome = console.delete(&item).await.expect("delete");

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(probes.course_calls.load(Ordering::SeqCst), 0);
        assert_eq!(console.snapshot().courses.len(), 3);
    }

    #[tokio::test]
    async fn confirmed_delete_removes_locally() {
        let (console, _probes) = live_console().await;
        let item: Course = console.select(2).expect("course 2");

        let outcome = console.delete(&item).await.expect("delete");

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(console.select::<Course>(2).is_none());
        assert_eq!(toast_text(&console), "course deleted successfully!");
    }

    #[tokio::test]
    async fn failed_delete_keeps_item() {
        let (console, probes) = live_console().await;
        let item: Article = console.select(1).expect("article 1");
        probes.fail_articles.store(true, Ordering::SeqCst);

        console.delete(&item).await.expect_err("backend down");

        assert!(console.select::<Article>(1).is_some());
        assert!(toast_text(&console).starts_with("Error deleting item: "));
    }

    #[tokio::test]
    async fn second_dispatch_while_busy_is_rejected() {
        let (console, probes) = live_console().await;
        let guard = console.busy.content.try_acquire().expect("claim");

        let err = console
            .create::<Course>(course_draft("Queued"))
            .await
            .expect_err("busy");
        assert!(matches!(err, ContentError::Busy));
        assert_eq!(probes.course_calls.load(Ordering::SeqCst), 0);

        drop(guard);
        console
            .create::<Course>(course_draft("Now"))
            .await
            .expect("free again");
    }
}
