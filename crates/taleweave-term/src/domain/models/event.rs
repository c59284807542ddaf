use super::StoryDraft;

/// Input the rendering side hands to the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Submit(StoryDraft),
    NextPanel,
    PreviousPanel,
    SelectChoice(String),
    SubmitFinalAnswer(String),
    StartOver,
    ResumeScene,
}
