use std::fmt;

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use dialoguer::Input;
use dialoguer::Select;
use tokio::sync::mpsc;
use yansi::Paint;

use crate::domain::models::Event;
use crate::domain::models::PanelView;
use crate::domain::models::StoryClientBox;
use crate::domain::models::StoryDraft;
use crate::domain::models::WizardError;
use crate::domain::models::WizardPhase;
use crate::domain::models::PANEL_COUNT;
use crate::domain::services::Wizard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MenuItem {
    Next,
    Previous,
    Choice(String, String, bool),
    WriteOwnEnding(String),
    SubmitAnswer,
    TryAgain,
    BackToScene,
    StartOver,
    Quit,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItem::Next => write!(f, "Next →"),
            MenuItem::Previous => write!(f, "← Previous"),
            MenuItem::Choice(_, text, true) => write!(f, "(•) {text}"),
            MenuItem::Choice(_, text, false) => write!(f, "( ) {text}"),
            MenuItem::WriteOwnEnding(current) if current.trim().is_empty() => {
                write!(f, "Write your own ending")
            }
            MenuItem::WriteOwnEnding(current) => write!(f, "Edit your own ending: {current}"),
            MenuItem::SubmitAnswer => write!(f, "Submit answer"),
            MenuItem::TryAgain => write!(f, "Try again"),
            MenuItem::BackToScene => write!(f, "Back to the current scene"),
            MenuItem::StartOver => write!(f, "Start a new story"),
            MenuItem::Quit => write!(f, "Quit"),
        }
    }
}

/// Free-text ending typed on the final panel. It belongs to one committed
/// scene and is dropped as soon as another scene is committed.
#[derive(Debug, Default)]
struct EndingDraft {
    generation: u64,
    text: String,
}

impl EndingDraft {
    fn text_for(&mut self, generation: u64) -> &str {
        if self.generation != generation {
            self.generation = generation;
            self.text.clear();
        }

        &self.text
    }

    fn set(&mut self, generation: u64, text: String) {
        self.generation = generation;
        self.text = text;
    }
}

fn report(err: &WizardError) {
    match err {
        WizardError::Validation(_) => println!("{}", Paint::yellow(err)),
        _ => println!("{} {}", Paint::red("Error:").bold(), err),
    }
}

fn pick(theme: &ColorfulTheme, prompt: &str, items: &[MenuItem]) -> Result<MenuItem> {
    let selection = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()?;

    return Ok(items[selection].clone());
}

fn render_panel(view: &PanelView) {
    let title = if view.is_last_panel {
        WizardPhase::AwaitingFinalChoice.to_string()
    } else {
        WizardPhase::PresentingPanel(view.panel_index).to_string()
    };

    println!();
    println!("{}", Paint::new(title).bold());
    println!("{} {}", Paint::cyan("Image:"), view.image_ref);
    println!();
    println!("{}", view.narrative_text);
    println!();
}

async fn show_progress(mut rx: mpsc::UnboundedReceiver<WizardPhase>) {
    while let Some(phase) = rx.recv().await {
        if phase.is_busy() {
            println!("{}", Paint::yellow(phase).italic());
        }
    }
}

async fn collect_story(wizard: &mut Wizard, theme: &ColorfulTheme) -> Result<Step> {
    println!();
    println!("{}", Paint::new("Story Input").bold());

    let story: String = Input::with_theme(theme)
        .with_prompt("Story")
        .allow_empty(true)
        .interact_text()?;
    let lead_character: String = Input::with_theme(theme)
        .with_prompt("Lead character")
        .allow_empty(true)
        .interact_text()?;

    let mut draft = StoryDraft::new(&story, &lead_character);
    while draft.can_add_supporting_character()
        && Confirm::with_theme(theme)
            .with_prompt("Add a supporting character?")
            .default(false)
            .interact()?
    {
        let description: String = Input::with_theme(theme)
            .with_prompt(format!(
                "Supporting character {}",
                draft.supporting_characters.len() + 1
            ))
            .allow_empty(true)
            .interact_text()?;
        draft.add_supporting_character(&description)?;
    }
    if !draft.can_add_supporting_character() {
        println!("{}", Paint::yellow("Maximum 5 supporting characters"));
    }

    let err = match wizard.handle(Event::Submit(draft)).await {
        Ok(()) => {
            println!("{}", Paint::green("Story and scene generated successfully!"));
            return Ok(Step::Continue);
        }
        Err(err) => err,
    };

    report(&err);
    let mut items = vec![MenuItem::TryAgain];
    if wizard.scene().is_some() {
        items.push(MenuItem::BackToScene);
    }
    items.push(MenuItem::Quit);

    match pick(theme, "What next?", &items)? {
        MenuItem::BackToScene => wizard.handle(Event::ResumeScene).await?,
        MenuItem::Quit => return Ok(Step::Quit),
        _ => {}
    }

    return Ok(Step::Continue);
}

async fn story_panel(wizard: &mut Wizard, theme: &ColorfulTheme) -> Result<Step> {
    let view = match wizard.current_panel_view() {
        Ok(view) => view,
        Err(err) => {
            report(&err);
            wizard.start_over();
            return Ok(Step::Continue);
        }
    };
    render_panel(&view);

    let mut items = vec![MenuItem::Next];
    if view.panel_index > 1 {
        items.push(MenuItem::Previous);
    }
    items.push(MenuItem::StartOver);
    items.push(MenuItem::Quit);

    let event = match pick(theme, "Navigate", &items)? {
        MenuItem::Next => Event::NextPanel,
        MenuItem::Previous => Event::PreviousPanel,
        MenuItem::StartOver => Event::StartOver,
        _ => return Ok(Step::Quit),
    };

    if let Err(err) = wizard.handle(event).await {
        report(&err);
    }

    return Ok(Step::Continue);
}

async fn final_panel(
    wizard: &mut Wizard,
    theme: &ColorfulTheme,
    ending: &mut EndingDraft,
) -> Result<Step> {
    let view = match wizard.current_panel_view() {
        Ok(view) => view,
        Err(err) => {
            report(&err);
            wizard.start_over();
            return Ok(Step::Continue);
        }
    };
    render_panel(&view);

    if wizard.is_story_complete() {
        println!("{}", Paint::magenta("The story has reached its ending."));
    }

    let generation = wizard.generation();
    let custom_answer = ending.text_for(generation).to_string();

    let choices = view.choices.clone().unwrap_or_default();
    let mut items = choices
        .iter()
        .map(|choice| {
            let selected = view.selected_choice_id.as_deref() == Some(choice.choice_id.as_str());
            MenuItem::Choice(choice.choice_id.clone(), choice.text.clone(), selected)
        })
        .collect::<Vec<MenuItem>>();
    items.push(MenuItem::WriteOwnEnding(custom_answer.clone()));
    items.push(MenuItem::SubmitAnswer);
    items.push(MenuItem::Previous);
    items.push(MenuItem::StartOver);
    items.push(MenuItem::Quit);

    let prompt = if choices.is_empty() {
        "Write your own ending"
    } else {
        "Choose your ending (a selected choice wins over your own ending)"
    };

    let event = match pick(theme, prompt, &items)? {
        MenuItem::Choice(choice_id, _, _) => Event::SelectChoice(choice_id),
        MenuItem::WriteOwnEnding(current) => {
            let text = Input::with_theme(theme)
                .with_prompt("Your ending")
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()?;
            ending.set(generation, text);
            return Ok(Step::Continue);
        }
        MenuItem::SubmitAnswer => Event::SubmitFinalAnswer(custom_answer),
        MenuItem::Previous => Event::PreviousPanel,
        MenuItem::StartOver => Event::StartOver,
        _ => return Ok(Step::Quit),
    };

    if let Err(err) = wizard.handle(event).await {
        report(&err);
    }

    return Ok(Step::Continue);
}

/// Run the wizard in the terminal until the user quits.
pub async fn start_loop(client: StoryClientBox) -> Result<()> {
    let (phase_tx, phase_rx) = mpsc::unbounded_channel();
    let mut wizard = Wizard::new(client).with_phase_listener(phase_tx);
    let indicator = tokio::spawn(show_progress(phase_rx));

    let theme = ColorfulTheme::default();
    let mut ending = EndingDraft::default();

    println!("{}", Paint::new("📖 Taleweave").bold());
    println!("Describe a story and its characters to get started. Each scene is told in {PANEL_COUNT} panels.");

    loop {
        let step = match wizard.phase() {
            WizardPhase::CollectingInput => collect_story(&mut wizard, &theme).await?,
            WizardPhase::AwaitingFinalChoice => {
                final_panel(&mut wizard, &theme, &mut ending).await?
            }
            _ => story_panel(&mut wizard, &theme).await?,
        };

        if step == Step::Quit {
            break;
        }
    }

    if let Some(session) = wizard.session() {
        tracing::info!(
            session_id = %session.session_id,
            decisions = wizard.decision_history().len(),
            "story session ended"
        );
    }

    indicator.abort();
    Ok(())
}
