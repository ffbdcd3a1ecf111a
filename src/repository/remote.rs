//! Repository backed by a running initiatives server

use super::{apply_change, validate, Change, InitiativeRepository, RepositoryError, RepositoryResult};
use crate::model::Initiative;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Talks to `/api/challenges` over HTTP
pub struct RemoteRepository {
    base_url: String,
    client: Client,
}

impl RemoteRepository {
    /// # Example
    /// ```no_run
    /// # use initiatives::repository::RemoteRepository;
    /// let repo = RemoteRepository::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Unwrap a `{success, message, <field>}` envelope
pub(crate) async fn read_envelope<T: DeserializeOwned>(
    response: Response,
    field: &str,
) -> RepositoryResult<T> {
    let status = response.status();
    let body: Value = response.json().await?;

    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !status.is_success() || !success {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string();
        return Err(match status.as_u16() {
            400 => RepositoryError::Validation(message),
            404 => RepositoryError::NotFound(message),
            409 => RepositoryError::Conflict(message),
            code => RepositoryError::Remote {
                status: code,
                message,
            },
        });
    }

    let payload = body.get(field).cloned().unwrap_or(Value::Null);
    Ok(serde_json::from_value(payload)?)
}

#[async_trait]
impl InitiativeRepository for RemoteRepository {
    async fn load_all(&self) -> RepositoryResult<Vec<Initiative>> {
        let url = self.url("/api/challenges");
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        read_envelope(response, "challenges").await
    }

    async fn append(&self, initiative: Initiative) -> RepositoryResult<Initiative> {
        validate(&initiative)?;
        let url = self.url("/api/challenges");
        debug!("POST {}", url);
        let response = self.client.post(&url).json(&initiative).send().await?;
        read_envelope(response, "challenge").await
    }

    async fn update(&self, initiative: Initiative) -> RepositoryResult<Initiative> {
        validate(&initiative)?;
        let url = self.url(&format!("/api/challenges/{}", initiative.uid));
        debug!("PUT {}", url);
        let response = self.client.put(&url).json(&initiative).send().await?;
        read_envelope(response, "challenge").await
    }

    /// Fetch, change, then PUT. The server does not see this as one step, so
    /// two clients changing the same record can still overwrite each other.
    async fn modify(&self, uid: &str, change: Change) -> RepositoryResult<Initiative> {
        let current = self
            .find(uid)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(uid.to_string()))?;
        let changed = apply_change(&current, change)?;
        self.update(changed).await
    }
}
