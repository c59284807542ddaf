//! Client SDK for the story-generation workflow service.
//!
//! The service exposes two webhook endpoints: one that initializes a story
//! session from a premise and a cast of characters, and one that generates the
//! next five-panel scene. This crate owns the wire format for the first call,
//! forwards whatever payload it is given for the second, and folds every
//! transport or decoding failure into a single [`TransportError`] channel.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

pub mod error;
pub mod http_client;
pub mod types;

pub use error::TransportError;
pub use http_client::HttpStoryClient;
pub use types::*;

/// StoryClient trait for talking to the story-generation workflow
#[async_trait]
pub trait StoryClient: Send + Sync {
    /// Create a new story session. The lead character is always sent first.
    async fn initialize_session(
        &self,
        user_prompt: &str,
        lead_character: &str,
        supporting_characters: &[String],
    ) -> Result<SessionInit, TransportError>;

    /// Generate a scene from an arbitrary payload and return the decoded body unchanged.
    async fn advance_scene(&self, payload: Value) -> Result<Value, TransportError>;
}

pub type StoryClientBox = Box<dyn StoryClient>;

/// Factory for creating StoryClient instances
pub struct StoryClientFactory;

impl StoryClientFactory {
    /// Create an HTTP client for the workflow service at `base_url`
    pub fn create_http_client(base_url: String, timeout: Duration) -> StoryClientBox {
        Box::new(HttpStoryClient::new(base_url).with_timeout(timeout))
    }
}
