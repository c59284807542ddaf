use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use taleweave_client::SessionInit;

use super::WizardError;

/// The running story summary kept by the service. Older workflow versions send
/// it as a string, newer ones as an object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OverallStory {
    Text(String),
    Structured(Value),
}

impl Default for OverallStory {
    fn default() -> OverallStory {
        OverallStory::Text(String::new())
    }
}

impl OverallStory {
    /// The continuation payload always carries the story as a string.
    pub fn to_payload_string(&self) -> String {
        match self {
            OverallStory::Text(text) => text.clone(),
            OverallStory::Structured(Value::Null) => String::new(),
            OverallStory::Structured(value) => value.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct SessionRecord {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    user_prompt: Option<String>,
    #[serde(default)]
    characters: Option<Vec<Value>>,
    #[serde(default)]
    protagonist_name: Option<String>,
    #[serde(default)]
    overall_story: Option<OverallStory>,
}

/// Identity and accumulated context of one story run.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub session_id: String,
    pub user_prompt: String,
    pub characters: Vec<Value>,
    pub overall_story: OverallStory,
    pub protagonist_name: String,
    /// The initialize-story response, forwarded verbatim to the first scene.
    pub init_response: Value,
}

impl Session {
    pub fn from_init(init: &SessionInit) -> Result<Session, WizardError> {
        if !init.body.is_object() {
            return Err(WizardError::data_shape(
                "initialize-story response is not a JSON object",
            ));
        }

        let record = SessionRecord::deserialize(&init.body).map_err(|err| {
            WizardError::data_shape(format!("initialize-story response: {err}"))
        })?;

        return Ok(Session {
            session_id: record
                .session_id
                .unwrap_or_else(|| init.session_id.clone()),
            user_prompt: record.user_prompt.unwrap_or_default(),
            characters: record.characters.unwrap_or_default(),
            overall_story: record.overall_story.unwrap_or_default(),
            protagonist_name: record.protagonist_name.unwrap_or_default(),
            init_response: init.body.clone(),
        });
    }
}
