//! Async driver around [`WizardReducer`].
//!
//! The controller owns one [`WizardSession`], turns method calls into intents
//! and reports refusals as `Err`. Submission is delegated to a caller-supplied
//! [`Submitter`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::mvi::Reducer;

use super::error::{SubmitError, WizardError};
use super::intent::WizardIntent;
use super::reducer::WizardReducer;
use super::state::WizardSession;
use super::step::StepDefinition;
use super::value::{FieldValue, FieldValues};

/// Packages collected values into a backend request and sends it.
///
/// Returns the backend's reference for the created record, if it gave one.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, values: &FieldValues) -> Result<Option<String>, SubmitError>;
}

pub struct WizardController {
    id: Uuid,
    name: String,
    session: WizardSession,
}

impl WizardController {
    pub fn new(name: impl Into<String>, steps: Vec<StepDefinition>) -> Self {
        Self::from_session(name, WizardSession::new(steps))
    }

    pub fn from_session(name: impl Into<String>, session: WizardSession) -> Self {
        let controller = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            session,
        };
        tracing::debug!(
            wizard = %controller.name,
            wizard_id = %controller.id,
            steps = controller.session.steps().len(),
            "Wizard started"
        );
        controller
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn session(&self) -> &WizardSession {
        &self.session
    }

    pub fn into_session(self) -> WizardSession {
        self.session
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue) -> Result<(), WizardError> {
        self.dispatch(WizardIntent::SetField {
            name: name.into(),
            value,
        })
    }

    pub fn clear_field(&mut self, name: impl Into<String>) -> Result<(), WizardError> {
        self.dispatch(WizardIntent::ClearField { name: name.into() })
    }

    /// Validate the current step with `entered` merged in and advance.
    ///
    /// Returns the new step index.
    pub fn go_next(&mut self, entered: FieldValues) -> Result<usize, WizardError> {
        let from = self.session.current_index();
        self.dispatch(WizardIntent::GoNext { entered })?;
        tracing::debug!(
            wizard_id = %self.id,
            from,
            to = self.session.current_index(),
            "Wizard advanced"
        );
        Ok(self.session.current_index())
    }

    /// Step back one page; a no-op on the first step.
    pub fn go_previous(&mut self) -> Result<usize, WizardError> {
        self.dispatch(WizardIntent::GoPrevious)?;
        Ok(self.session.current_index())
    }

    /// Submit from the last step.
    ///
    /// On success the session becomes completed and the backend reference is
    /// returned. On failure the session stays on the last step with all values.
    pub async fn submit(&mut self, submitter: &dyn Submitter) -> Result<Option<String>, WizardError> {
        self.dispatch(WizardIntent::SubmitStarted)?;
        tracing::info!(wizard = %self.name, wizard_id = %self.id, "Submitting wizard");

        match submitter.submit(self.session.values()).await {
            Ok(reference) => {
                self.dispatch(WizardIntent::SubmitSucceeded {
                    reference: reference.clone(),
                })?;
                tracing::info!(
                    wizard_id = %self.id,
                    reference = reference.as_deref().unwrap_or("-"),
                    "Wizard completed"
                );
                Ok(reference)
            }
            Err(e) => {
                tracing::warn!(wizard_id = %self.id, error = %e, "Wizard submission failed");
                self.dispatch(WizardIntent::SubmitFailed {
                    message: e.to_string(),
                })
                .map(|_| None)
            }
        }
    }

    pub fn restart(&mut self) -> Result<(), WizardError> {
        self.dispatch(WizardIntent::Restart)
    }

    fn dispatch(&mut self, intent: WizardIntent) -> Result<(), WizardError> {
        let session = std::mem::take(&mut self.session);
        self.session = WizardReducer::reduce(session, intent);
        match self.session.error() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
