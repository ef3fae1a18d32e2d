use reqwest::StatusCode;
use tasklist_shared::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{url} answered {status}")]
    Status { status: StatusCode, url: String },
    #[error("malformed response body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{0}` cannot be used as a store base URL")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// Failures that come from talking to the store, as opposed to input the
    /// client refused to send.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_) | ClientError::Status { .. } | ClientError::Parse(_)
        )
    }
}
