use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde::de::DeserializeOwned;
use tasklist_shared::{CompletionRequest, CreateTaskRequest, SortKey, Task, UpdateTaskRequest};
use url::Url;

use crate::error::ClientError;
use crate::store::TaskStore;

/// Task store reached over its JSON REST surface.
pub struct HttpTaskStore {
    client: Client,
    base: Url,
}

impl HttpTaskStore {
    pub fn new(base: Url) -> Result<Self, ClientError> {
        Self::with_builder(base, Client::builder())
    }

    fn with_builder(base: Url, builder: ClientBuilder) -> Result<Self, ClientError> {
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = builder.default_headers(headers).build()?;

        Ok(Self { client, base })
    }

    /// Base URL with `segments` appended. Segments are percent-encoded, so
    /// ids go through untouched whatever they contain.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` refuses cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn list_url(&self, sort: &SortKey) -> Url {
        let mut url = self.endpoint(&["tasks"]);
        if let Some(field) = sort.field() {
            url.query_pairs_mut().append_pair("sortBy", field);
        }
        url
    }

    fn completion_url(&self, id: &str, completed: bool) -> Url {
        let action = if completed { "complete" } else { "notComplete" };
        self.endpoint(&["tasks", action, id])
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        debug!("{url} -> {status}");
        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                url: url.to_string(),
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn list(&self, sort: &SortKey) -> Result<Vec<Task>, ClientError> {
        let url = self.list_url(sort);
        self.send(self.client.get(url.clone()), &url).await
    }

    async fn create(&self, request: &CreateTaskRequest) -> Result<Task, ClientError> {
        let url = self.endpoint(&["tasks", "todo"]);
        self.send(self.client.post(url.clone()).json(request), &url)
            .await
    }

    async fn set_completed(&self, id: &str, completed: bool) -> Result<Task, ClientError> {
        let url = self.completion_url(id, completed);
        let body = CompletionRequest { completed };
        self.send(self.client.patch(url.clone()).json(&body), &url)
            .await
    }

    async fn update(&self, id: &str, request: &UpdateTaskRequest) -> Result<Task, ClientError> {
        let url = self.endpoint(&["tasks", "update", id]);
        self.send(self.client.put(url.clone()).json(request), &url)
            .await
    }

    async fn delete(&self, id: &str) -> Result<serde_json::Value, ClientError> {
        let url = self.endpoint(&["tasks", "delete", id]);
        self.send(self.client.delete(url.clone()), &url).await
    }
}
