#[cfg(test)]
#[path = "wizard_test.rs"]
mod tests;

use tokio::sync::mpsc;

use crate::domain::models::resolve_decision;
use crate::domain::models::ContinuationPayload;
use crate::domain::models::Event;
use crate::domain::models::PanelView;
use crate::domain::models::Scene;
use crate::domain::models::Session;
use crate::domain::models::StoryClientBox;
use crate::domain::models::StoryDraft;
use crate::domain::models::StorySubmission;
use crate::domain::models::WizardCursor;
use crate::domain::models::WizardError;
use crate::domain::models::WizardPhase;

/// Drives a story run: collects the premise, pairs the two workflow calls into
/// one commit, walks the five panels and sends the final choice back to the
/// service to obtain the next scene.
///
/// Session and scene are only ever replaced together, after every call the
/// transition depends on has resolved. Any failure leaves the last committed
/// pair, cursor and selection exactly as they were.
pub struct Wizard {
    client: StoryClientBox,
    phase: WizardPhase,
    session: Option<Session>,
    scene: Option<Scene>,
    cursor: WizardCursor,
    decision_history: Vec<String>,
    generation: u64,
    phase_tx: Option<mpsc::UnboundedSender<WizardPhase>>,
}

impl Wizard {
    pub fn new(client: StoryClientBox) -> Wizard {
        return Wizard {
            client,
            phase: WizardPhase::CollectingInput,
            session: None,
            scene: None,
            cursor: WizardCursor::default(),
            decision_history: vec![],
            generation: 0,
            phase_tx: None,
        };
    }

    /// Every phase change is also sent to `tx`, so a front-end can show a
    /// waiting indicator while a call is in flight.
    pub fn with_phase_listener(mut self, tx: mpsc::UnboundedSender<WizardPhase>) -> Wizard {
        self.phase_tx = Some(tx);
        self
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn cursor(&self) -> &WizardCursor {
        &self.cursor
    }

    pub fn decision_history(&self) -> &[String] {
        &self.decision_history
    }

    /// Bumped every time a new scene is committed, whether from a new story
    /// or a continuation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Reported by the service; the wizard keeps looping regardless.
    pub fn is_story_complete(&self) -> bool {
        self.scene
            .as_ref()
            .and_then(|scene| scene.state.is_complete)
            .unwrap_or(false)
    }

    pub async fn handle(&mut self, event: Event) -> Result<(), WizardError> {
        match event {
            Event::Submit(draft) => self.submit(&draft).await,
            Event::NextPanel => self.next_panel(),
            Event::PreviousPanel => self.previous_panel(),
            Event::SelectChoice(choice_id) => self.select_choice(&choice_id),
            Event::SubmitFinalAnswer(custom_answer) => {
                self.submit_final_answer(&custom_answer).await
            }
            Event::StartOver => {
                self.start_over();
                Ok(())
            }
            Event::ResumeScene => self.resume_scene(),
        }
    }

    pub async fn submit(&mut self, draft: &StoryDraft) -> Result<(), WizardError> {
        if self.phase != WizardPhase::CollectingInput {
            return Err(WizardError::validation(
                "Start over before submitting a new story",
            ));
        }

        let submission = draft.validate()?;

        match self.generate_first_scene(&submission).await {
            Ok((session, scene)) => {
                tracing::info!(session_id = %session.session_id, "story initialized");
                let history = scene.state.decision_history.clone().unwrap_or_default();
                self.commit(session, scene, history);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "story submission failed");
                self.set_phase(WizardPhase::CollectingInput);
                Err(err)
            }
        }
    }

    async fn generate_first_scene(
        &mut self,
        submission: &StorySubmission,
    ) -> Result<(Session, Scene), WizardError> {
        self.set_phase(WizardPhase::Initializing);
        let init = self
            .client
            .initialize_session(
                &submission.story,
                &submission.lead_character,
                &submission.supporting_characters,
            )
            .await?;
        let session = Session::from_init(&init)?;

        self.set_phase(WizardPhase::GeneratingFirstScene);
        let response = self
            .client
            .advance_scene(session.init_response.clone())
            .await?;
        let scene = Scene::from_response(&response)?;

        Ok((session, scene))
    }

    pub fn next_panel(&mut self) -> Result<(), WizardError> {
        self.ensure_presenting()?;
        self.cursor.next();
        self.set_phase(WizardPhase::for_panel(self.cursor.current_panel));
        Ok(())
    }

    pub fn previous_panel(&mut self) -> Result<(), WizardError> {
        self.ensure_presenting()?;
        self.cursor.previous();
        self.set_phase(WizardPhase::for_panel(self.cursor.current_panel));
        Ok(())
    }

    pub fn select_choice(&mut self, choice_id: &str) -> Result<(), WizardError> {
        self.ensure_final_panel()?;
        self.cursor.selected_choice_id = Some(choice_id.to_string());
        Ok(())
    }

    pub async fn submit_final_answer(&mut self, custom_answer: &str) -> Result<(), WizardError> {
        self.ensure_final_panel()?;

        let payload = {
            let session = self.session.as_ref().ok_or(WizardError::NoActiveScene)?;
            let scene = self.scene.as_ref().ok_or(WizardError::NoActiveScene)?;
            let decision = resolve_decision(
                scene,
                self.cursor.selected_choice_id.as_deref(),
                custom_answer,
            )?;

            ContinuationPayload::assemble(session, &scene.state, &self.decision_history, decision)?
        };
        let body = payload.to_value()?;

        tracing::debug!(
            session_id = %payload.session_id,
            current_scene = payload.current_scene,
            decision_count = payload.decision_count,
            payload = %body,
            "requesting next scene"
        );

        self.set_phase(WizardPhase::GeneratingNextScene);
        let next_scene = match self.client.advance_scene(body).await {
            Ok(response) => Scene::from_response(&response),
            Err(err) => Err(err.into()),
        };

        match (next_scene, self.session.take()) {
            (Ok(scene), Some(session)) => {
                tracing::info!(
                    session_id = %session.session_id,
                    scene = payload.current_scene,
                    "scene advanced"
                );
                self.commit(session, scene, payload.decision_history);
                Ok(())
            }
            (Ok(_), None) => {
                self.set_phase(WizardPhase::CollectingInput);
                Err(WizardError::NoActiveScene)
            }
            (Err(err), session) => {
                tracing::warn!(error = %err, "scene generation failed");
                self.session = session;
                self.set_phase(WizardPhase::AwaitingFinalChoice);
                Err(err)
            }
        }
    }

    pub fn current_panel_view(&self) -> Result<PanelView, WizardError> {
        let scene = self.scene.as_ref().ok_or(WizardError::NoActiveScene)?;
        scene.panel_view(
            self.cursor.current_panel,
            self.cursor.selected_choice_id.as_deref(),
        )
    }

    /// Back to the input form. The committed story stays until a new one is
    /// successfully generated.
    pub fn start_over(&mut self) {
        self.set_phase(WizardPhase::CollectingInput);
    }

    pub fn resume_scene(&mut self) -> Result<(), WizardError> {
        if self.scene.is_none() {
            return Err(WizardError::NoActiveScene);
        }

        self.set_phase(WizardPhase::for_panel(self.cursor.current_panel));
        Ok(())
    }

    fn commit(&mut self, mut session: Session, scene: Scene, decision_history: Vec<String>) {
        if let Some(overall_story) = &scene.state.overall_story {
            session.overall_story = overall_story.clone();
        }

        self.session = Some(session);
        self.scene = Some(scene);
        self.decision_history = decision_history;
        self.generation += 1;
        self.cursor.reset();
        self.set_phase(WizardPhase::for_panel(self.cursor.current_panel));
    }

    fn ensure_presenting(&self) -> Result<(), WizardError> {
        if self.scene.is_none() {
            return Err(WizardError::NoActiveScene);
        }

        match self.phase {
            WizardPhase::PresentingPanel(_) | WizardPhase::AwaitingFinalChoice => Ok(()),
            _ => Err(WizardError::validation("No scene is being presented")),
        }
    }

    fn ensure_final_panel(&self) -> Result<(), WizardError> {
        if self.scene.is_none() {
            return Err(WizardError::NoActiveScene);
        }

        if self.phase != WizardPhase::AwaitingFinalChoice {
            return Err(WizardError::validation(
                "The final choice is only available on the last panel",
            ));
        }

        Ok(())
    }

    fn set_phase(&mut self, phase: WizardPhase) {
        if self.phase != phase {
            tracing::debug!(from = %self.phase, to = %phase, "wizard phase");
        }
        self.phase = phase;

        if let Some(tx) = &self.phase_tx {
            if tx.send(phase).is_err() {
                self.phase_tx = None;
            }
        }
    }
}
