use serde::Deserialize;
use serde::Serialize;

use super::WizardError;

pub const MAX_SUPPORTING_CHARACTERS: usize = 5;

/// The input form as the user fills it in. Nothing here is trimmed yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryDraft {
    pub story: String,
    pub lead_character: String,
    pub supporting_characters: Vec<String>,
}

/// A draft that passed validation: trimmed, empty supporting slots dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorySubmission {
    pub story: String,
    pub lead_character: String,
    pub supporting_characters: Vec<String>,
}

impl StoryDraft {
    pub fn new(story: &str, lead_character: &str) -> StoryDraft {
        return StoryDraft {
            story: story.to_string(),
            lead_character: lead_character.to_string(),
            supporting_characters: vec![],
        };
    }

    pub fn can_add_supporting_character(&self) -> bool {
        self.supporting_characters.len() < MAX_SUPPORTING_CHARACTERS
    }

    pub fn add_supporting_character(&mut self, description: &str) -> Result<(), WizardError> {
        if !self.can_add_supporting_character() {
            return Err(WizardError::validation(format!(
                "Maximum {MAX_SUPPORTING_CHARACTERS} supporting characters"
            )));
        }

        self.supporting_characters.push(description.to_string());
        Ok(())
    }

    pub fn remove_supporting_character(&mut self, index: usize) -> Option<String> {
        if index >= self.supporting_characters.len() {
            return None;
        }

        Some(self.supporting_characters.remove(index))
    }

    pub fn validate(&self) -> Result<StorySubmission, WizardError> {
        let story = self.story.trim();
        if story.is_empty() {
            return Err(WizardError::validation("Please enter a story"));
        }

        let lead_character = self.lead_character.trim();
        if lead_character.is_empty() {
            return Err(WizardError::validation(
                "Please describe the lead character",
            ));
        }

        let supporting_characters = self
            .supporting_characters
            .iter()
            .map(|character| character.trim())
            .filter(|character| !character.is_empty())
            .map(|character| character.to_string())
            .collect::<Vec<String>>();

        if supporting_characters.len() > MAX_SUPPORTING_CHARACTERS {
            return Err(WizardError::validation(format!(
                "Maximum {MAX_SUPPORTING_CHARACTERS} supporting characters"
            )));
        }

        return Ok(StorySubmission {
            story: story.to_string(),
            lead_character: lead_character.to_string(),
            supporting_characters,
        });
    }
}
