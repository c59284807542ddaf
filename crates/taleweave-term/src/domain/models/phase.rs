use std::fmt;

use super::PANEL_COUNT;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardPhase {
    CollectingInput,
    Initializing,
    GeneratingFirstScene,
    /// Panels 1 to 4.
    PresentingPanel(usize),
    /// Panel 5, where the story branches.
    AwaitingFinalChoice,
    GeneratingNextScene,
}

impl WizardPhase {
    pub fn for_panel(panel: usize) -> WizardPhase {
        if panel >= PANEL_COUNT {
            return WizardPhase::AwaitingFinalChoice;
        }

        WizardPhase::PresentingPanel(panel)
    }

    /// True while a workflow call is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            WizardPhase::Initializing
                | WizardPhase::GeneratingFirstScene
                | WizardPhase::GeneratingNextScene
        )
    }
}

impl fmt::Display for WizardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardPhase::CollectingInput => write!(f, "Waiting for your story"),
            WizardPhase::Initializing => write!(f, "Initializing your story..."),
            WizardPhase::GeneratingFirstScene => write!(f, "Generating scene..."),
            WizardPhase::PresentingPanel(panel) => write!(f, "Panel {panel} of {PANEL_COUNT}"),
            WizardPhase::AwaitingFinalChoice => {
                write!(f, "Panel {PANEL_COUNT} of {PANEL_COUNT} - Final Choice")
            }
            WizardPhase::GeneratingNextScene => write!(f, "Generating next scene..."),
        }
    }
}
