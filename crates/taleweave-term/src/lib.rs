//! Terminal front-end for Taleweave.
//!
//! Collects a story idea and its characters, then walks the user through each
//! generated scene one panel at a time and sends their chosen ending back to
//! the story workflow.

pub mod application;
pub mod configuration;
pub mod domain;
pub mod infrastructure;
pub use application::ui::start_loop;
pub use configuration::{Config, ConfigKey};
pub use domain::models::{Event, StoryDraft, WizardError, WizardPhase};
pub use domain::services::Wizard;
pub use infrastructure::clients::StoryClientManager;
