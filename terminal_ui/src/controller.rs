//! Task view controller.
//!
//! Every mutating handler follows the same shape: send one request to the
//! store, and only once it has succeeded, call [`TaskViewController::refresh`]
//! to rebuild both lists from a fresh listing. The store is the only source of
//! truth; nothing here patches the lists incrementally.

use log::{debug, error, info, warn};
use tasklist_shared::{SortKey, TaskDraft};

use crate::error::ClientError;
use crate::store::TaskStore;
use crate::view::{EditDialog, Rendering, ViewState};

pub struct TaskViewController<S> {
    store: S,
}

impl<S: TaskStore> TaskViewController<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    /// Fetch the whole collection and rebuild both lists from it.
    ///
    /// On failure the view keeps whatever the last successful refresh drew.
    pub async fn refresh(&self, view: &mut ViewState, sort: &SortKey) -> Result<(), ClientError> {
        let tasks = self
            .store
            .list(sort)
            .await
            .inspect_err(|err| error!("Error loading tasks: {err}"))?;

        view.render(&tasks);
        view.form.reset();
        debug!(
            "rendered {} pending, {} completed (sort: {sort})",
            view.pending().len(),
            view.completed().len()
        );
        Ok(())
    }

    pub async fn create(
        &self,
        view: &mut ViewState,
        draft: &TaskDraft,
        sort: &SortKey,
    ) -> Result<(), ClientError> {
        let request = match draft.validate_new() {
            Ok(request) => request,
            Err(err) => {
                warn!("task not submitted: {err}");
                view.alert = Some(err.to_string());
                return Err(err.into());
            }
        };

        let task = self
            .store
            .create(&request)
            .await
            .inspect_err(|err| error!("Error creating task: {err}"))?;
        info!("New task created: {} ({})", task.id, task.title);

        self.refresh(view, sort).await
    }

    pub async fn complete(
        &self,
        view: &mut ViewState,
        task_id: &str,
        sort: &SortKey,
    ) -> Result<(), ClientError> {
        self.store
            .set_completed(task_id, true)
            .await
            .inspect_err(|err| error!("Error completing task {task_id}: {err}"))?;
        info!("Task completed: {task_id}");

        self.refresh(view, sort).await
    }

    pub async fn uncomplete(
        &self,
        view: &mut ViewState,
        task_id: &str,
        sort: &SortKey,
    ) -> Result<(), ClientError> {
        self.store
            .set_completed(task_id, false)
            .await
            .inspect_err(|err| error!("Error marking task {task_id} not complete: {err}"))?;
        info!("Task marked not complete: {task_id}");

        self.refresh(view, sort).await
    }

    /// Open the edit dialog filled from `rendering`.
    pub fn open_edit(&self, view: &mut ViewState, rendering: &Rendering) {
        debug!("editing task {}", rendering.id);
        view.edit_dialog = Some(EditDialog::from_rendering(rendering));
    }

    /// Send the edited fields. The dialog closes only once the store has
    /// accepted them.
    pub async fn edit(
        &self,
        view: &mut ViewState,
        task_id: &str,
        draft: &TaskDraft,
        sort: &SortKey,
    ) -> Result<(), ClientError> {
        let request = match draft.to_update() {
            Ok(request) => request,
            Err(err) => {
                warn!("edit of {task_id} not submitted: {err}");
                view.alert = Some(err.to_string());
                return Err(err.into());
            }
        };

        let task = self
            .store
            .update(task_id, &request)
            .await
            .inspect_err(|err| error!("Error editing task {task_id}: {err}"))?;
        info!("Edited task: {} ({})", task.id, task.title);

        let refreshed = self.refresh(view, sort).await;
        view.edit_dialog = None;
        refreshed
    }

    pub async fn delete(
        &self,
        view: &mut ViewState,
        task_id: &str,
        sort: &SortKey,
    ) -> Result<(), ClientError> {
        let ack = self
            .store
            .delete(task_id)
            .await
            .inspect_err(|err| error!("Error deleting task {task_id}: {err}"))?;
        info!("Task deleted: {task_id} {ack}");

        self.refresh(view, sort).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fake::{task, Call, FakeStore};
    use chrono::NaiveDate;
    use reqwest::StatusCode;
    use tasklist_shared::{CreateTaskRequest, Task, UpdateTaskRequest};

    fn controller(tasks: Vec<Task>) -> TaskViewController<FakeStore> {
        TaskViewController::new(FakeStore::with_tasks(tasks))
    }

    fn ids(renderings: &[Rendering]) -> Vec<&str> {
        renderings.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn refresh_renders_single_pending_task() {
        let listing: Vec<Task> = serde_json::from_str(
            r#"[{"id":"1","title":"A","description":"d","dueDate":"2024-01-01","createdOn":"2024-01-01","completed":false}]"#,
        )
        .unwrap();
        let c = controller(listing);
        let mut view = ViewState::default();

        c.refresh(&mut view, &SortKey::Default).await.unwrap();

        assert_eq!(view.pending().len(), 1);
        assert_eq!(view.pending()[0].title, "A");
        assert!(view.completed().is_empty());
    }

    #[tokio::test]
    async fn refresh_passes_sort_key_and_clears_form() {
        let c = controller(vec![task("1", "b", false), task("2", "a", false)]);
        let mut view = ViewState::default();
        view.form.fields.title = "half typed".into();
        let sort = SortKey::By("title".into());

        c.refresh(&mut view, &sort).await.unwrap();

        assert_eq!(c.store().calls(), vec![Call::List(sort)]);
        assert_eq!(ids(view.pending()), ["2", "1"]);
        assert_eq!(view.form.fields.title, "");
    }

    #[tokio::test]
    async fn failed_refresh_leaves_view_untouched() {
        let c = controller(vec![task("1", "a", false), task("2", "b", true)]);
        let mut view = ViewState::default();
        c.refresh(&mut view, &SortKey::Default).await.unwrap();
        view.form.fields.title = "draft".into();

        c.store().fail_next(StatusCode::BAD_GATEWAY);
        let err = c.refresh(&mut view, &SortKey::Default).await.unwrap_err();

        assert!(err.is_remote());
        assert_eq!(ids(view.pending()), ["1"]);
        assert_eq!(ids(view.completed()), ["2"]);
        assert_eq!(view.form.fields.title, "draft");
    }

    #[tokio::test]
    async fn create_posts_then_refreshes_once() {
        let c = controller(vec![]);
        let mut view = ViewState::default();

        c.create(&mut view, &TaskDraft::new("T", "D", "2024-05-01"), &SortKey::Default)
            .await
            .unwrap();

        let expected = CreateTaskRequest {
            title: "T".into(),
            description: "D".into(),
            due_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };
        assert_eq!(
            c.store().calls(),
            vec![Call::Create(expected), Call::List(SortKey::Default)]
        );
        assert_eq!(view.pending().len(), 1);
        assert_eq!(view.pending()[0].title, "T");
    }

    #[tokio::test]
    async fn create_with_blank_field_sends_nothing() {
        let drafts = [
            TaskDraft::new("", "D", "2024-05-01"),
            TaskDraft::new("T", "   ", "2024-05-01"),
            TaskDraft::new("T", "D", " "),
        ];

        for draft in drafts {
            let c = controller(vec![]);
            let mut view = ViewState::default();

            let err = c.create(&mut view, &draft, &SortKey::Default).await.unwrap_err();

            assert!(matches!(err, ClientError::Validation(_)));
            assert!(view.alert.as_deref().unwrap().starts_with("All fields required!"));
            assert!(c.store().calls().is_empty());
        }
    }

    #[tokio::test]
    async fn failed_create_keeps_form_and_skips_refresh() {
        let c = controller(vec![]);
        let mut view = ViewState::default();
        view.form.fields.title = "T".into();
        view.form.fields.description = "D".into();
        view.form.fields.due_date = "2024-05-01".into();
        c.store().fail_next(StatusCode::INTERNAL_SERVER_ERROR);

        let draft = view.form.draft();
        assert!(c.create(&mut view, &draft, &SortKey::Default).await.is_err());

        assert_eq!(c.store().calls().len(), 1);
        assert_eq!(view.form.fields.title, "T");
        assert!(view.alert.is_none());
    }

    #[tokio::test]
    async fn complete_and_uncomplete_move_between_lists() {
        let c = controller(vec![task("1", "a", false)]);
        let mut view = ViewState::default();
        let sort = SortKey::Default;

        c.complete(&mut view, "1", &sort).await.unwrap();
        assert!(view.pending().is_empty());
        assert_eq!(ids(view.completed()), ["1"]);

        c.uncomplete(&mut view, "1", &sort).await.unwrap();
        assert_eq!(ids(view.pending()), ["1"]);
        assert!(view.completed().is_empty());

        assert_eq!(
            c.store().calls(),
            vec![
                Call::SetCompleted("1".into(), true),
                Call::List(sort.clone()),
                Call::SetCompleted("1".into(), false),
                Call::List(sort),
            ]
        );
    }

    #[tokio::test]
    async fn completing_a_completed_task_is_harmless() {
        let c = controller(vec![task("1", "a", true)]);
        let mut view = ViewState::default();

        c.complete(&mut view, "1", &SortKey::Default).await.unwrap();

        assert_eq!(ids(view.completed()), ["1"]);
        assert!(view.pending().is_empty());
    }

    #[tokio::test]
    async fn unchanged_edit_round_trips() {
        let original = task("7", "Report", false);
        let c = controller(vec![original.clone()]);
        let mut view = ViewState::default();
        c.refresh(&mut view, &SortKey::Default).await.unwrap();

        let rendering = view.pending()[0].clone();
        c.open_edit(&mut view, &rendering);
        let dialog = view.edit_dialog.clone().unwrap();
        c.edit(&mut view, &dialog.task_id, &dialog.draft(), &SortKey::Default)
            .await
            .unwrap();

        assert!(view.edit_dialog.is_none());
        assert_eq!(c.store().tasks(), vec![original.clone()]);
        assert_eq!(
            c.store().calls(),
            vec![
                Call::List(SortKey::Default),
                Call::Update(
                    "7".into(),
                    UpdateTaskRequest {
                        title: original.title,
                        description: original.description,
                        due_date: original.due_date,
                    }
                ),
                Call::List(SortKey::Default),
            ]
        );
    }

    #[tokio::test]
    async fn failed_edit_keeps_dialog_open() {
        let c = controller(vec![task("7", "Report", false)]);
        let mut view = ViewState::default();
        c.refresh(&mut view, &SortKey::Default).await.unwrap();
        let rendering = view.pending()[0].clone();
        c.open_edit(&mut view, &rendering);

        c.store().fail_next(StatusCode::INTERNAL_SERVER_ERROR);
        let draft = TaskDraft::new("Renamed", "x", "2024-02-02");
        assert!(c.edit(&mut view, "7", &draft, &SortKey::Default).await.is_err());

        assert!(view.edit_dialog.is_some());
        assert_eq!(view.pending()[0].title, "Report");
        assert_eq!(c.store().calls().last(), Some(&Call::Update(
            "7".into(),
            draft.to_update().unwrap()
        )));
    }

    #[tokio::test]
    async fn delete_refreshes_after_success() {
        let c = controller(vec![task("1", "a", false), task("2", "b", true)]);
        let mut view = ViewState::default();

        c.delete(&mut view, "2", &SortKey::Default).await.unwrap();

        assert_eq!(
            c.store().calls(),
            vec![Call::Delete("2".into()), Call::List(SortKey::Default)]
        );
        assert_eq!(ids(view.pending()), ["1"]);
        assert!(view.completed().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_does_not_refresh() {
        let c = controller(vec![task("42", "a", false)]);
        let mut view = ViewState::default();
        c.refresh(&mut view, &SortKey::Default).await.unwrap();

        c.store().fail_next(StatusCode::INTERNAL_SERVER_ERROR);
        let err = c.delete(&mut view, "42", &SortKey::Default).await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::Status { status: StatusCode::INTERNAL_SERVER_ERROR, .. }
        ));
        assert_eq!(
            c.store().calls(),
            vec![Call::List(SortKey::Default), Call::Delete("42".into())]
        );
        assert_eq!(ids(view.pending()), ["42"]);
    }
}
