use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod dates;
mod draft;
mod lifecycle;

pub use draft::{TaskDraft, ValidationError};
pub use lifecycle::{InvalidTransition, TaskAction, TaskState};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(alias = "_id", deserialize_with = "dates::deserialize_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "dates::deserialize_date")]
    pub due_date: NaiveDate,
    #[serde(alias = "createOn", deserialize_with = "dates::deserialize_timestamp")]
    pub created_on: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn state(&self) -> TaskState {
        if self.completed {
            TaskState::Completed
        } else {
            TaskState::Pending
        }
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "dates::deserialize_date")]
    pub due_date: NaiveDate,
}

/// Full-field replacement of a task's editable attributes.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "dates::deserialize_date")]
    pub due_date: NaiveDate,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub struct CompletionRequest {
    pub completed: bool,
}

/// Ordering requested from the store when listing tasks.
///
/// `Default` sends no `sortBy` parameter at all and leaves the order to the
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    Default,
    By(String),
}

impl SortKey {
    pub fn field(&self) -> Option<&str> {
        match self {
            SortKey::Default => None,
            SortKey::By(field) => Some(field),
        }
    }
}

impl FromStr for SortKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "default" {
            Ok(SortKey::Default)
        } else {
            Ok(SortKey::By(s.to_string()))
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field().unwrap_or("default"))
    }
}
