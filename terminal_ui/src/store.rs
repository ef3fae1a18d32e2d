use async_trait::async_trait;
use tasklist_shared::{CreateTaskRequest, SortKey, Task, UpdateTaskRequest};

use crate::error::ClientError;

/// The remote task collection, as the view controller sees it.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list(&self, sort: &SortKey) -> Result<Vec<Task>, ClientError>;

    async fn create(&self, request: &CreateTaskRequest) -> Result<Task, ClientError>;

    /// Mark a task completed or pending again.
    async fn set_completed(&self, id: &str, completed: bool) -> Result<Task, ClientError>;

    async fn update(&self, id: &str, request: &UpdateTaskRequest) -> Result<Task, ClientError>;

    /// Stores answer a delete with either the removed task or a bare
    /// acknowledgement, so the body is kept as raw JSON.
    async fn delete(&self, id: &str) -> Result<serde_json::Value, ClientError>;
}
