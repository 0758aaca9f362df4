use thiserror::Error;

use super::step::StepFeedback;

/// Why a wizard action was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    #[error("{} field(s) need attention: {feedback}", .feedback.len())]
    InvalidFields { feedback: StepFeedback },

    #[error("Already on the last step")]
    AtLastStep,

    /// `step` is the one-based position shown to the user.
    #[error("Submit is only available on the last step (on step {step} of {total})")]
    NotAtLastStep { step: usize, total: usize },

    #[error("A submission is already in progress")]
    AlreadySubmitting,

    #[error("This wizard has already been completed")]
    AlreadyCompleted,

    #[error("No submission is in progress")]
    NotSubmitting,

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Submission failed: {message}")]
    SubmitFailed { message: String },
}

impl WizardError {
    /// Field feedback when the refusal was a validation failure.
    pub fn feedback(&self) -> Option<&StepFeedback> {
        match self {
            WizardError::InvalidFields { feedback } => Some(feedback),
            _ => None,
        }
    }
}

/// Errors returned by a [`Submitter`](super::Submitter).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Collected values could not be packaged into a request.
    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: String, reason: String },

    /// The backend refused the request.
    #[error("{0}")]
    Rejected(String),

    /// The request never got a response.
    #[error("Network error: {0}")]
    Transport(String),
}
