use taleweave_client::TransportError;
use thiserror::Error;

/// Failures surfaced by the wizard. None of them leave a half-updated state behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// Missing or ambiguous user input. Re-prompt, nothing changed.
    #[error("{0}")]
    Validation(String),

    /// The workflow call failed. The previous step can be retried as is.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service returned content that cannot be rendered.
    #[error("Invalid scene data: {0}")]
    DataShape(String),

    #[error("No scene has been generated yet. Submit a story first.")]
    NoActiveScene,
}

impl WizardError {
    pub fn validation(msg: impl Into<String>) -> Self {
        WizardError::Validation(msg.into())
    }

    pub fn data_shape(msg: impl Into<String>) -> Self {
        WizardError::DataShape(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, WizardError::Validation(_))
    }
}
