use thiserror::Error;

use crate::dates::parse_date;
use crate::{CreateTaskRequest, UpdateTaskRequest};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields required! ({0} is empty)")]
    MissingField(&'static str),
    #[error("Due date `{0}` is not a valid date (expected YYYY-MM-DD)")]
    InvalidDueDate(String),
}

/// The three editable fields exactly as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: String,
}

impl TaskDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            due_date: due_date.into(),
        }
    }

    /// Validate a draft for creation. Every field must be non-empty after
    /// trimming.
    pub fn validate_new(&self) -> Result<CreateTaskRequest, ValidationError> {
        let title = required("title", &self.title)?;
        let description = required("description", &self.description)?;
        let due_date = required("due date", &self.due_date)?;

        Ok(CreateTaskRequest {
            title: title.to_string(),
            description: description.to_string(),
            due_date: parse_date(due_date)
                .ok_or_else(|| ValidationError::InvalidDueDate(due_date.to_string()))?,
        })
    }

    /// Build a full-field update. Only the due date is checked here; empty
    /// text fields are left for the store to accept or refuse.
    pub fn to_update(&self) -> Result<UpdateTaskRequest, ValidationError> {
        let due_date = self.due_date.trim();
        Ok(UpdateTaskRequest {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            due_date: parse_date(due_date)
                .ok_or_else(|| ValidationError::InvalidDueDate(due_date.to_string()))?,
        })
    }
}

impl CreateTaskRequest {
    /// Store-side check for requests that bypassed client validation.
    pub fn check(&self) -> Result<(), ValidationError> {
        required("title", &self.title)?;
        required("description", &self.description)?;
        Ok(())
    }
}

impl UpdateTaskRequest {
    /// Edits go through the same non-empty rule as creation once they reach the store.
    pub fn check(&self) -> Result<(), ValidationError> {
        required("title", &self.title)?;
        required("description", &self.description)?;
        Ok(())
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(value)
    }
}
