use crate::mvi::Intent;

use super::value::{FieldValue, FieldValues};

#[derive(Debug, Clone)]
pub enum WizardIntent {
    /// A single field edit.
    SetField { name: String, value: FieldValue },
    /// The user explicitly emptied a field.
    ClearField { name: String },
    /// Validate the current step (with `entered` merged in) and advance.
    GoNext { entered: FieldValues },
    GoPrevious,
    /// Validate the last step and enter `Submitting`.
    SubmitStarted,
    SubmitSucceeded { reference: Option<String> },
    SubmitFailed { message: String },
    /// Back to the first step with nothing entered.
    Restart,
}

impl Intent for WizardIntent {}
