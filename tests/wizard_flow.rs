mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use hemolink::mvi::{reduce_all, Reducer};
use hemolink::wizard::{
    FieldValue, FieldValues, SubmitError, Submitter, WizardController, WizardError, WizardIntent,
    WizardPhase, WizardReducer, WizardSession,
};

use common::three_step_wizard;

struct Accepting {
    calls: AtomicUsize,
}

impl Accepting {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Submitter for Accepting {
    async fn submit(&self, _values: &FieldValues) -> Result<Option<String>, SubmitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some("APT-1".to_string()))
    }
}

struct Refusing;

#[async_trait]
impl Submitter for Refusing {
    async fn submit(&self, _values: &FieldValues) -> Result<Option<String>, SubmitError> {
        Err(SubmitError::Rejected("Slot is full".to_string()))
    }
}

fn values(pairs: &[(&str, FieldValue)]) -> FieldValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn at_last_step() -> WizardController {
    let mut wizard = WizardController::new("test", three_step_wizard());
    wizard
        .go_next(values(&[("a", FieldValue::Integer(1))]))
        .unwrap();
    wizard
        .go_next(values(&[("b", FieldValue::text("two"))]))
        .unwrap();
    wizard
}

#[test]
fn go_next_without_required_values_stays_on_first_step() {
    let mut wizard = WizardController::new("test", three_step_wizard());

    let err = wizard.go_next(FieldValues::new()).unwrap_err();

    assert_eq!(wizard.session().current_index(), 0);
    let feedback = err.feedback().expect("validation feedback");
    assert_eq!(feedback.invalid_fields().collect::<Vec<_>>(), vec!["a"]);
}

#[test]
fn go_previous_keeps_entered_values() {
    let mut wizard = WizardController::new("test", three_step_wizard());
    wizard.set_field("a", FieldValue::Integer(1)).unwrap();

    assert_eq!(wizard.go_next(FieldValues::new()), Ok(1));
    assert_eq!(wizard.go_previous(), Ok(0));

    assert_eq!(wizard.session().value("a"), Some(&FieldValue::Integer(1)));
}

#[tokio::test]
async fn successful_submit_completes_wizard() {
    let mut wizard = at_last_step();
    assert_eq!(wizard.session().current_index(), 2);

    let submitter = Accepting::new();
    let reference = wizard.submit(&submitter).await.unwrap();

    assert_eq!(reference.as_deref(), Some("APT-1"));
    assert!(wizard.session().is_completed());
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_submit_stays_on_last_step_with_error() {
    let mut wizard = at_last_step();

    let err = wizard.submit(&Refusing).await.unwrap_err();

    assert!(matches!(err, WizardError::SubmitFailed { ref message } if message == "Slot is full"));
    assert_eq!(wizard.session().current_index(), 2);
    assert_eq!(wizard.session().phase(), &WizardPhase::Editing);
    assert_eq!(wizard.session().value("b"), Some(&FieldValue::text("two")));
}

#[tokio::test]
async fn failed_submit_can_be_retried() {
    let mut wizard = at_last_step();
    assert!(wizard.submit(&Refusing).await.is_err());

    let submitter = Accepting::new();
    assert!(wizard.submit(&submitter).await.is_ok());
    assert!(wizard.session().is_completed());
}

#[tokio::test]
async fn submit_is_refused_before_last_step() {
    let mut wizard = WizardController::new("test", three_step_wizard());
    wizard
        .go_next(values(&[("a", FieldValue::Integer(1))]))
        .unwrap();

    let submitter = Accepting::new();
    let err = wizard.submit(&submitter).await.unwrap_err();

    assert_eq!(err, WizardError::NotAtLastStep { step: 2, total: 3 });
    assert_eq!(err.to_string(), "Submit is only available on the last step (on step 2 of 3)");
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
    assert_eq!(wizard.session().current_index(), 1);
}

#[tokio::test]
async fn completed_wizard_refuses_further_submits_and_edits() {
    let mut wizard = at_last_step();
    let submitter = Accepting::new();
    wizard.submit(&submitter).await.unwrap();

    assert_eq!(
        wizard.submit(&submitter).await.unwrap_err(),
        WizardError::AlreadyCompleted
    );
    assert!(wizard.set_field("a", FieldValue::Integer(9)).is_err());
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn restart_returns_to_first_step_with_nothing_entered() {
    let mut wizard = at_last_step();
    wizard.submit(&Accepting::new()).await.unwrap();

    wizard.restart().unwrap();

    assert_eq!(wizard.session().current_index(), 0);
    assert!(wizard.session().values().is_empty());
    assert!(!wizard.session().is_completed());
}

#[test]
fn wrong_kind_is_reported_per_field() {
    let mut wizard = WizardController::new("test", three_step_wizard());

    let err = wizard
        .go_next(values(&[("a", FieldValue::text("one"))]))
        .unwrap_err();

    let feedback = err.feedback().expect("validation feedback");
    assert!(feedback.message_for("a").is_some());
    assert!(wizard.session().value("a").is_none());
}

// Reducer edge cases; sequences are covered in wizard_properties.rs.

#[test]
fn go_previous_on_first_step_is_a_no_op() {
    let state = reduce_all::<WizardReducer, _>(
        WizardSession::new(three_step_wizard()),
        vec![WizardIntent::GoPrevious, WizardIntent::GoPrevious],
    );
    assert_eq!(state.current_index(), 0);
    assert!(state.error().is_none());
}

#[test]
fn submit_outcome_without_submit_start_is_refused() {
    let state = WizardReducer::reduce(
        WizardSession::new(three_step_wizard()),
        WizardIntent::SubmitSucceeded { reference: None },
    );
    assert_eq!(state.error(), Some(&WizardError::NotSubmitting));
    assert!(!state.is_completed());
}

#[test]
fn prefilled_values_satisfy_steps() {
    let session = WizardSession::new(three_step_wizard())
        .with_values(values(&[("a", FieldValue::Integer(3))]));
    let state = WizardReducer::reduce(
        session,
        WizardIntent::GoNext {
            entered: FieldValues::new(),
        },
    );
    assert_eq!(state.current_index(), 1);
}
