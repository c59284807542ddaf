use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The two workflow endpoints the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    InitializeStory,
    GenerateScene,
}

impl Operation {
    /// Path of the webhook, relative to the service base URL
    pub fn path(&self) -> &'static str {
        match self {
            Operation::InitializeStory => "initialize-story",
            Operation::GenerateScene => "generate-scene",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::InitializeStory => write!(f, "Story initialization"),
            Operation::GenerateScene => write!(f, "Scene generation"),
        }
    }
}

/// Request body for the initialize-story webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeRequest {
    pub user_prompt: String,
    pub character_inputs: Vec<String>,
    pub session_id: String,
}

impl InitializeRequest {
    /// Build a request with a freshly generated session id and the lead character first
    pub fn new(user_prompt: &str, lead_character: &str, supporting_characters: &[String]) -> Self {
        let mut character_inputs = Vec::with_capacity(supporting_characters.len() + 1);
        character_inputs.push(lead_character.to_string());
        character_inputs.extend(supporting_characters.iter().cloned());

        Self {
            user_prompt: user_prompt.to_string(),
            character_inputs,
            session_id: Uuid::new_v4().to_string(),
        }
    }
}

/// Result of a successful initialize-story call
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInit {
    /// The identifier generated for the request
    pub session_id: String,
    /// The decoded response, forwarded verbatim to the first scene generation
    pub body: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_request_puts_lead_first() {
        let request = InitializeRequest::new(
            "A hero wakes.",
            "Mira",
            &["Dog".to_string(), "Old sage".to_string()],
        );

        assert_eq!(request.character_inputs, vec!["Mira", "Dog", "Old sage"]);
        assert_eq!(request.user_prompt, "A hero wakes.");
    }

    #[test]
    fn test_initialize_request_generates_unique_session_ids() {
        let first = InitializeRequest::new("prompt", "lead", &[]);
        let second = InitializeRequest::new("prompt", "lead", &[]);

        assert_ne!(first.session_id, second.session_id);
        assert!(Uuid::parse_str(&first.session_id).is_ok());
    }

    #[test]
    fn test_operation_paths() {
        assert_eq!(Operation::InitializeStory.path(), "initialize-story");
        assert_eq!(Operation::GenerateScene.path(), "generate-scene");
        assert_eq!(Operation::GenerateScene.to_string(), "Scene generation");
    }
}
