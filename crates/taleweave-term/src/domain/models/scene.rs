use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;

use super::OverallStory;
use super::WizardError;

/// Every scene is told in exactly this many panels.
pub const PANEL_COUNT: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub choice_id: String,
    pub text: String,
}

impl Choice {
    /// Ids may arrive as strings or numbers; entries without a usable id are
    /// skipped.
    fn from_value(value: &Value) -> Option<Choice> {
        let choice_id = match value.get("choice_id")? {
            Value::String(id) => id.clone(),
            Value::Number(id) => id.to_string(),
            _ => return None,
        };
        let text = value
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Some(Choice { choice_id, text })
    }
}

/// Story bookkeeping the service wants echoed back on the next turn
/// (`session_data_to_save`). Every field is optional; `null` or a value of
/// the wrong type counts as absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneState {
    #[serde(default)]
    pub overall_story: Option<OverallStory>,
    #[serde(default, deserialize_with = "lenient_history")]
    pub decision_history: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub decision_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub current_scene: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub phase: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub story_phase: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_complete: Option<bool>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n < u64::MAX as f64)
                .map(|n| n as u64)
        }),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };

    Ok(count)
}

fn lenient_history<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let history = match Value::deserialize(deserializer)? {
        Value::Array(entries) => Some(
            entries
                .into_iter()
                .filter(|entry| !entry.is_null())
                .map(|entry| match entry {
                    Value::String(text) => text,
                    other => other.to_string(),
                })
                .collect(),
        ),
        _ => None,
    };

    Ok(history)
}

fn strings(field: &str, value: Option<&Value>) -> Result<Vec<String>, WizardError> {
    let entries = value
        .and_then(Value::as_array)
        .ok_or_else(|| WizardError::data_shape(format!("missing {field}")))?;

    entries
        .iter()
        .map(|entry| {
            entry.as_str().map(str::to_string).ok_or_else(|| {
                WizardError::data_shape(format!("{field} must be strings, got {entry}"))
            })
        })
        .collect()
}

/// One generated unit of five panels with aligned narrative and closing choices.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub panels: Vec<String>,
    pub narrative: Vec<String>,
    pub dialogue: Vec<Value>,
    pub choices: Vec<Choice>,
    pub state: SceneState,
}

/// What the front-end needs to draw the panel under the cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelView {
    pub panel_index: usize,
    pub image_ref: String,
    pub narrative_text: String,
    pub is_last_panel: bool,
    pub choices: Option<Vec<Choice>>,
    pub selected_choice_id: Option<String>,
}

fn exactly_five(field: &str, value: Option<&Value>) -> Result<Vec<String>, WizardError> {
    let values = strings(field, value)?;
    if values.len() != PANEL_COUNT {
        return Err(WizardError::data_shape(format!(
            "expected {PANEL_COUNT} {field}, got {}",
            values.len()
        )));
    }

    Ok(values)
}

impl Scene {
    /// Validate a generate-scene response. The renderable part may sit under
    /// `render_scene` or at the top level.
    pub fn from_response(response: &Value) -> Result<Scene, WizardError> {
        if !response.is_object() {
            return Err(WizardError::data_shape(
                "generate-scene response is not a JSON object",
            ));
        }

        let body = match response.get("render_scene") {
            Some(render_scene) if render_scene.is_object() => render_scene,
            _ => response,
        };

        let panels = exactly_five("panels", body.get("panels"))?;
        let narrative = exactly_five("narrative entries", body.get("narrative"))?;

        let dialogue = body
            .get("dialogue")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let choices: Vec<Choice> = body
            .get("choices")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(Choice::from_value).collect())
            .unwrap_or_else(Vec::new);
        let mut seen = HashSet::new();
        for choice in &choices {
            if !seen.insert(choice.choice_id.as_str()) {
                return Err(WizardError::data_shape(format!(
                    "duplicate choice id '{}'",
                    choice.choice_id
                )));
            }
        }

        let state = match response
            .get("session_data_to_save")
            .or_else(|| body.get("session_data_to_save"))
        {
            Some(saved) if saved.is_object() => SceneState::deserialize(saved)
                .map_err(|err| WizardError::data_shape(format!("session_data_to_save: {err}")))?,
            _ => SceneState::default(),
        };

        return Ok(Scene {
            panels,
            narrative,
            dialogue,
            choices,
            state,
        });
    }

    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.choice_id == choice_id)
    }

    /// Panel `index` is 1-based.
    pub fn panel_view(
        &self,
        index: usize,
        selected_choice_id: Option<&str>,
    ) -> Result<PanelView, WizardError> {
        if index == 0 || index > self.panels.len() || index > self.narrative.len() {
            return Err(WizardError::data_shape(format!(
                "panel {index} is out of range"
            )));
        }

        let is_last_panel = index == PANEL_COUNT;

        Ok(PanelView {
            panel_index: index,
            image_ref: self.panels[index - 1].clone(),
            narrative_text: self.narrative[index - 1].clone(),
            is_last_panel,
            choices: is_last_panel.then(|| self.choices.clone()),
            selected_choice_id: selected_choice_id.map(|id| id.to_string()),
        })
    }
}
