use crate::mvi::Reducer;

use super::error::WizardError;
use super::intent::WizardIntent;
use super::state::{WizardPhase, WizardSession};

pub struct WizardReducer;

impl Reducer for WizardReducer {
    type State = WizardSession;
    type Intent = WizardIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            WizardIntent::SetField { name, value } => {
                if let Some(err) = refuse_edits(&state) {
                    return reject(state, err);
                }
                if !state.knows_field(&name) {
                    return reject(state, WizardError::UnknownField(name));
                }
                let mut state = accept(state);
                state.values.insert(name, value);
                state
            }
            WizardIntent::ClearField { name } => {
                if let Some(err) = refuse_edits(&state) {
                    return reject(state, err);
                }
                let mut state = accept(state);
                state.values.remove(&name);
                state
            }
            WizardIntent::GoNext { entered } => {
                if let Some(err) = refuse_edits(&state) {
                    return reject(state, err);
                }
                if state.is_last_step() {
                    return reject(state, WizardError::AtLastStep);
                }
                let unknown = entered.keys().find(|k| !state.knows_field(k)).cloned();
                if let Some(unknown) = unknown {
                    return reject(state, WizardError::UnknownField(unknown));
                }

                let mut candidate = state.values.clone();
                candidate.extend(entered);
                let feedback = state.steps[state.current].validate(&candidate);
                if !feedback.is_empty() {
                    return reject(state, WizardError::InvalidFields { feedback });
                }

                let mut state = accept(state);
                state.values = candidate;
                state.current += 1;
                state
            }
            WizardIntent::GoPrevious => {
                if let Some(err) = refuse_edits(&state) {
                    return reject(state, err);
                }
                let mut state = accept(state);
                state.current = state.current.saturating_sub(1);
                state
            }
            WizardIntent::SubmitStarted => {
                match state.phase {
                    WizardPhase::Completed { .. } => {
                        return reject(state, WizardError::AlreadyCompleted)
                    }
                    WizardPhase::Submitting => {
                        return reject(state, WizardError::AlreadySubmitting)
                    }
                    WizardPhase::Editing => {}
                }
                if !state.is_last_step() {
                    let (step, total) = state.progress();
                    return reject(state, WizardError::NotAtLastStep { step, total });
                }
                if let Some(step) = state.current_step() {
                    let feedback = step.validate(&state.values);
                    if !feedback.is_empty() {
                        return reject(state, WizardError::InvalidFields { feedback });
                    }
                }
                let mut state = accept(state);
                state.phase = WizardPhase::Submitting;
                state
            }
            WizardIntent::SubmitSucceeded { reference } => {
                if state.phase != WizardPhase::Submitting {
                    return reject(state, WizardError::NotSubmitting);
                }
                let mut state = accept(state);
                state.phase = WizardPhase::Completed { reference };
                state
            }
            WizardIntent::SubmitFailed { message } => {
                if state.phase != WizardPhase::Submitting {
                    return reject(state, WizardError::NotSubmitting);
                }
                // Stay on the last step with everything entered intact.
                let mut state = state;
                state.phase = WizardPhase::Editing;
                state.error = Some(WizardError::SubmitFailed { message });
                state
            }
            WizardIntent::Restart => {
                if state.phase == WizardPhase::Submitting {
                    return reject(state, WizardError::AlreadySubmitting);
                }
                WizardSession::new(state.steps)
            }
        }
    }
}

fn refuse_edits(state: &WizardSession) -> Option<WizardError> {
    match state.phase {
        WizardPhase::Editing => None,
        WizardPhase::Submitting => Some(WizardError::AlreadySubmitting),
        WizardPhase::Completed { .. } => Some(WizardError::AlreadyCompleted),
    }
}

fn accept(mut state: WizardSession) -> WizardSession {
    state.error = None;
    state
}

/// Record the refusal; position, values and phase are untouched.
fn reject(mut state: WizardSession, err: WizardError) -> WizardSession {
    state.error = Some(err);
    state
}
