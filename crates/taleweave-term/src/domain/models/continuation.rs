#[cfg(test)]
#[path = "continuation_test.rs"]
mod tests;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use super::Scene;
use super::SceneState;
use super::Session;
use super::WizardError;

pub const DEFAULT_PHASE: &str = "ready_for_scene_1";
pub const DEFAULT_STORY_PHASE: &str = "opening";

/// Body sent to generate-scene to move past the final panel of a scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContinuationPayload {
    pub session_id: String,
    pub user_prompt: String,
    pub overall_story: String,
    /// Same content as `characters`, still read by older workflow versions.
    pub character_profile: Vec<Value>,
    pub characters: Vec<Value>,
    pub protagonist_name: String,
    pub current_scene: u64,
    pub decision_history: Vec<String>,
    pub phase: String,
    pub decision_count: u64,
    pub story_phase: String,
    pub is_complete: bool,
}

/// Turn the user's final-panel input into decision text. A selected choice
/// wins over free text and contributes its text, never its id.
pub fn resolve_decision(
    scene: &Scene,
    selected_choice_id: Option<&str>,
    custom_answer: &str,
) -> Result<String, WizardError> {
    if let Some(choice_id) = selected_choice_id {
        let choice = scene.choice(choice_id).ok_or_else(|| {
            WizardError::data_shape(format!(
                "selected choice '{choice_id}' is not part of the current scene"
            ))
        })?;

        if choice.text.trim().is_empty() {
            return Err(WizardError::data_shape(format!(
                "choice '{choice_id}' has no text"
            )));
        }

        return Ok(choice.text.clone());
    }

    let custom_answer = custom_answer.trim();
    if custom_answer.is_empty() {
        return Err(WizardError::validation(
            "Please select a choice or write your own ending",
        ));
    }

    Ok(custom_answer.to_string())
}

fn next_counter(field: &str, value: u64) -> Result<u64, WizardError> {
    value
        .checked_add(1)
        .ok_or_else(|| WizardError::data_shape(format!("{field} {value} cannot be advanced")))
}

impl ContinuationPayload {
    /// `history` is the controller's own record, used when the scene state
    /// does not carry one.
    pub fn assemble(
        session: &Session,
        state: &SceneState,
        history: &[String],
        decision: String,
    ) -> Result<ContinuationPayload, WizardError> {
        let overall_story = state
            .overall_story
            .as_ref()
            .unwrap_or(&session.overall_story)
            .to_payload_string();

        let mut decision_history = state
            .decision_history
            .clone()
            .unwrap_or_else(|| history.to_vec());
        decision_history.push(decision);

        let current_scene = next_counter("current_scene", state.current_scene.unwrap_or(1))?;
        let decision_count = next_counter("decision_count", state.decision_count.unwrap_or(0))?;

        return Ok(ContinuationPayload {
            session_id: session.session_id.clone(),
            user_prompt: session.user_prompt.clone(),
            overall_story,
            character_profile: session.characters.clone(),
            characters: session.characters.clone(),
            protagonist_name: session.protagonist_name.clone(),
            current_scene,
            decision_history,
            phase: state
                .phase
                .clone()
                .unwrap_or_else(|| DEFAULT_PHASE.to_string()),
            decision_count,
            story_phase: state
                .story_phase
                .clone()
                .unwrap_or_else(|| DEFAULT_STORY_PHASE.to_string()),
            is_complete: state.is_complete.unwrap_or(false),
        });
    }

    pub fn to_value(&self) -> Result<Value, WizardError> {
        serde_json::to_value(self)
            .map_err(|err| WizardError::data_shape(format!("continuation payload: {err}")))
    }
}
