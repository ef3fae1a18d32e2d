use std::sync::{Mutex, MutexGuard, PoisonError};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use chrono::Utc;
use serde_json::json;
use tasklist_shared::{
    CreateTaskRequest, SortKey, Task, TaskAction, TaskState, UpdateTaskRequest, ValidationError,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task {0} not found")]
    NotFound(String),
    #[error("cannot sort by `{0}`")]
    UnknownSortField(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl ResponseError for StoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::UnknownSortField(_) | StoreError::Invalid(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

/// In-memory task collection, kept in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    tasks: Mutex<Vec<Task>>,
}

impl MemoryStore {
    fn tasks(&self) -> MutexGuard<'_, Vec<Task>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn list(&self, sort: &SortKey) -> Result<Vec<Task>, StoreError> {
        let mut tasks = self.tasks().clone();
        match sort.field() {
            None => {}
            Some("dueDate") => tasks.sort_by_key(|t| t.due_date),
            Some("createdOn") => tasks.sort_by_key(|t| t.created_on),
            Some("title") => tasks.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase())),
            Some("completed") => tasks.sort_by_key(|t| t.completed),
            Some(other) => return Err(StoreError::UnknownSortField(other.to_string())),
        }
        Ok(tasks)
    }

    pub fn create(&self, request: CreateTaskRequest) -> Result<Task, StoreError> {
        request.check()?;
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: request.title.trim().to_string(),
            description: request.description.trim().to_string(),
            due_date: request.due_date,
            created_on: Utc::now(),
            completed: false,
        };
        self.tasks().push(task.clone());
        Ok(task)
    }

    /// Setting the flag it already has is a no-op, not an error.
    pub fn set_completed(&self, id: &str, completed: bool) -> Result<Task, StoreError> {
        let action = if completed {
            TaskAction::Complete
        } else {
            TaskAction::Uncomplete
        };
        self.apply(id, action, |_| {})
    }

    pub fn update(&self, id: &str, request: UpdateTaskRequest) -> Result<Task, StoreError> {
        request.check()?;
        self.apply(id, TaskAction::Edit, |task| {
            task.title = request.title.trim().to_string();
            task.description = request.description.trim().to_string();
            task.due_date = request.due_date;
        })
    }

    pub fn delete(&self, id: &str) -> Result<Task, StoreError> {
        self.apply(id, TaskAction::Delete, |_| {})
    }

    /// Move task `id` through `action`. Reaching `Deleted` removes it.
    fn apply<F>(&self, id: &str, action: TaskAction, edit: F) -> Result<Task, StoreError>
    where
        F: FnOnce(&mut Task),
    {
        let mut tasks = self.tasks();
        let not_found = || StoreError::NotFound(id.to_string());
        let index = tasks.iter().position(|t| t.id == id).ok_or_else(not_found)?;
        // Rows only exist until deleted, so a refused transition means the task is gone.
        let next = tasks[index]
            .state()
            .transition(action)
            .map_err(|_| not_found())?;
        if next == TaskState::Deleted {
            return Ok(tasks.remove(index));
        }

        let task = &mut tasks[index];
        task.completed = next == TaskState::Completed;
        edit(task);
        Ok(task.clone())
    }
}
