use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::{InitializeRequest, Operation, SessionInit, StoryClient, TransportError};

/// Default bound on a single workflow call. Scene generation routinely takes
/// well over a minute.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client for the story workflow webhooks
pub struct HttpStoryClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpStoryClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, operation: Operation) -> String {
        format!("{}/{}", self.base_url, operation.path())
    }

    async fn post_json<T: Serialize + ?Sized + Sync>(
        &self,
        operation: Operation,
        payload: &T,
    ) -> Result<Value, TransportError> {
        let url = self.endpoint(operation);
        let timeout = self.timeout;

        log::debug!("POST {} ({})", url, operation);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|err| TransportError::from_reqwest(operation, &url, timeout, err))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| TransportError::from_reqwest(operation, &url, timeout, err))?;

        if !status.is_success() {
            log::warn!("{} failed with status {}", operation, status);
            return Err(TransportError::HttpError {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str::<Value>(&text).map_err(|err| {
            log::warn!("{} returned a body that is not JSON: {}", operation, err);
            TransportError::malformed(&err, &text)
        })
    }
}

#[async_trait]
impl StoryClient for HttpStoryClient {
    async fn initialize_session(
        &self,
        user_prompt: &str,
        lead_character: &str,
        supporting_characters: &[String],
    ) -> Result<SessionInit, TransportError> {
        let request = InitializeRequest::new(user_prompt, lead_character, supporting_characters);
        log::debug!(
            "initializing session {} with {} characters",
            request.session_id,
            request.character_inputs.len()
        );

        let body = self.post_json(Operation::InitializeStory, &request).await?;

        Ok(SessionInit {
            session_id: request.session_id,
            body,
        })
    }

    async fn advance_scene(&self, payload: Value) -> Result<Value, TransportError> {
        self.post_json(Operation::GenerateScene, &payload).await
    }
}
