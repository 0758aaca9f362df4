use crate::mvi::UiState;

use super::error::WizardError;
use super::step::{StepDefinition, StepFeedback};
use super::value::{FieldValue, FieldValues};

/// Where the wizard is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WizardPhase {
    #[default]
    Editing,
    /// Waiting on the submitter. Navigation and edits are refused.
    Submitting,
    /// Terminal pseudo-step after a successful submission.
    Completed { reference: Option<String> },
}

/// A wizard session: steps, position and everything entered so far.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WizardSession {
    pub(super) steps: Vec<StepDefinition>,
    pub(super) current: usize,
    pub(super) values: FieldValues,
    pub(super) phase: WizardPhase,
    /// Outcome of the most recent intent; `None` when it was accepted.
    pub(super) error: Option<WizardError>,
}

impl UiState for WizardSession {}

impl WizardSession {
    /// A session positioned on the first step with no values.
    pub fn new(steps: Vec<StepDefinition>) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    /// Seed values (e.g., from a donor profile) before the user starts.
    pub fn with_values(mut self, values: FieldValues) -> Self {
        self.values.extend(values);
        self
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> Option<&StepDefinition> {
        self.steps.get(self.current)
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn is_last_step(&self) -> bool {
        self.current == self.last_index()
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn phase(&self) -> &WizardPhase {
        &self.phase
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.phase, WizardPhase::Completed { .. })
    }

    pub fn error(&self) -> Option<&WizardError> {
        self.error.as_ref()
    }

    /// Field messages from the last rejected intent, if it was a validation failure.
    pub fn feedback(&self) -> Option<&StepFeedback> {
        self.error.as_ref().and_then(WizardError::feedback)
    }

    /// One-based position for display: (step, total).
    pub fn progress(&self) -> (usize, usize) {
        (self.current + 1, self.steps.len())
    }

    pub(super) fn knows_field(&self, name: &str) -> bool {
        self.steps.iter().any(|s| s.field_spec(name).is_some())
    }
}
