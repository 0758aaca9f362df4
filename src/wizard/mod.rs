//! Multi-step form wizard.
//!
//! A wizard is an ordered list of steps, each declaring its fields. Values
//! accumulate across steps and survive back-navigation. Forward navigation
//! is gated on the current step validating; submission is only possible
//! from the last step and is handed to a [`Submitter`].

mod controller;
mod error;
mod intent;
mod reducer;
mod state;
mod step;
mod value;

pub use controller::{Submitter, WizardController};
pub use error::{SubmitError, WizardError};
pub use intent::WizardIntent;
pub use reducer::WizardReducer;
pub use state::{WizardPhase, WizardSession};
pub use step::{FieldKind, FieldRule, FieldSpec, PatternRule, StepDefinition, StepFeedback};
pub use value::{FieldValue, FieldValues};
