//! Terminal front end for the wizards.

use anyhow::Context;
use chrono::Local;
use dialoguer::{Confirm, Input, Select};

use crate::api::DonorProfile;
use crate::flows::{donation, emergency};
use crate::resource::{Loaded, RemoteResource};
use crate::wizard::{
    FieldKind, FieldSpec, FieldValue, FieldValues, StepDefinition, Submitter, WizardController,
    WizardError, WizardSession,
};

use super::AppContext;

const SKIP_CHOICE: &str = "(skip)";
/// Typed into an optional text field to remove its value.
const CLEAR_INPUT: &str = "-";

/// What the user answered for one field.
#[derive(Debug, Clone, PartialEq)]
enum Answer {
    Value(FieldValue),
    Cleared,
}

pub async fn book_donation(ctx: &AppContext) -> anyhow::Result<()> {
    let client = ctx.signed_in_client().await?;
    let today = Local::now().date_naive();
    let mut session = WizardSession::new(donation::steps(today));

    let profile: RemoteResource<DonorProfile> = RemoteResource::new("donor-profile");
    let profile_client = client.clone();
    let state = profile
        .fetch(async move { profile_client.my_donor_profile().await.map(Loaded::from) })
        .await;
    if let Some(p) = state.data() {
        session = session.with_values(donation::prefill(p));
    }

    let controller = WizardController::from_session(donation::WIZARD_NAME, session);
    let submitter = donation::DonationSubmitter::new(client);
    match drive(controller, &submitter).await? {
        Some(reference) => println!("Appointment booked (#{}).", reference),
        None => println!("Booking cancelled."),
    }
    Ok(())
}

pub async fn raise_emergency(ctx: &AppContext) -> anyhow::Result<()> {
    let client = ctx.signed_in_client().await?;
    let today = Local::now().date_naive();
    let controller = WizardController::new(emergency::WIZARD_NAME, emergency::steps(today));
    let submitter = emergency::EmergencySubmitter::new(client);
    match drive(controller, &submitter).await? {
        Some(reference) => {
            println!("Emergency request #{} sent. Staff have been alerted.", reference)
        }
        None => println!("Emergency request cancelled."),
    }
    Ok(())
}

/// Walk the wizard until it is submitted (`Some(reference)`) or cancelled.
async fn drive(
    mut controller: WizardController,
    submitter: &dyn Submitter,
) -> anyhow::Result<Option<String>> {
    loop {
        let session = controller.session();
        let Some(step) = session.current_step().cloned() else {
            return Ok(None);
        };
        let (position, total) = session.progress();
        println!("\n[{}/{}] {}", position, total, step.title);

        if session.is_last_step() {
            print_summary(session);
            let actions = ["Submit", "Edit a step", "Cancel"];
            let choice = Select::new()
                .items(&actions)
                .default(0)
                .interact()
                .context("reading the confirmation")?;
            match choice {
                0 => match controller.submit(submitter).await {
                    Ok(reference) => return Ok(Some(reference.unwrap_or_else(|| "-".into()))),
                    Err(WizardError::SubmitFailed { message }) => {
                        println!("Submission failed: {}", message);
                        println!("Your answers are kept; you can retry or edit them.");
                    }
                    Err(e) => println!("{}", e),
                },
                1 => rewind(&mut controller)?,
                _ => return Ok(None),
            }
            continue;
        }

        let answers = prompt_step(&step, session.values())?;
        match apply_answers(&mut controller, answers) {
            Ok(_) => {}
            Err(WizardError::InvalidFields { feedback }) => {
                for field in feedback.invalid_fields() {
                    println!("  {}: {}", field, feedback.message_for(field).unwrap_or(""));
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn rewind(controller: &mut WizardController) -> anyhow::Result<()> {
    let session = controller.session();
    let titles: Vec<&str> = session.steps()[..session.current_index()]
        .iter()
        .map(|s| s.title.as_str())
        .collect();
    if titles.is_empty() {
        return Ok(());
    }
    let target = Select::new()
        .with_prompt("Go back to")
        .items(&titles)
        .default(titles.len() - 1)
        .interact()
        .context("choosing a step")?;
    while controller.session().current_index() > target {
        controller.go_previous()?;
    }
    Ok(())
}

fn print_summary(session: &WizardSession) {
    for step in session.steps() {
        for field in &step.fields {
            if let Some(value) = session.value(&field.name) {
                println!("  {:<28} {}", field.label, value);
            }
        }
    }
}

fn prompt_step(
    step: &StepDefinition,
    known: &FieldValues,
) -> anyhow::Result<Vec<(String, Answer)>> {
    step.fields
        .iter()
        .map(|field| Ok((field.name.clone(), prompt_field(field, known.get(&field.name))?)))
        .collect()
}

/// Drop cleared fields from the session, then advance with the rest.
fn apply_answers(
    controller: &mut WizardController,
    answers: Vec<(String, Answer)>,
) -> Result<usize, WizardError> {
    let mut entered = FieldValues::new();
    for (name, answer) in answers {
        match answer {
            Answer::Value(value) => {
                entered.insert(name, value);
            }
            Answer::Cleared => {
                if controller.session().value(&name).is_some() {
                    controller.clear_field(name)?;
                }
            }
        }
    }
    controller.go_next(entered)
}

/// Blank or `-` clears an optional field; anything else is parsed.
fn interpret_text(field: &FieldSpec, raw: &str) -> anyhow::Result<Answer> {
    let raw = raw.trim();
    if !field.required && (raw.is_empty() || raw == CLEAR_INPUT) {
        return Ok(Answer::Cleared);
    }
    Ok(Answer::Value(field.kind.parse(raw).map_err(anyhow::Error::msg)?))
}

fn prompt_field(field: &FieldSpec, current: Option<&FieldValue>) -> anyhow::Result<Answer> {
    match &field.kind {
        FieldKind::Choice(options) => {
            let mut items: Vec<&str> = options.iter().map(String::as_str).collect();
            if !field.required {
                items.push(SKIP_CHOICE);
            }
            let default = current
                .and_then(|v| v.as_str())
                .and_then(|c| items.iter().position(|o| *o == c))
                .unwrap_or(0);
            let index = Select::new()
                .with_prompt(&field.label)
                .items(&items)
                .default(default)
                .interact()?;
            Ok(match options.get(index) {
                Some(o) => Answer::Value(FieldValue::choice(o.clone())),
                None => Answer::Cleared,
            })
        }
        FieldKind::Bool => {
            let answer = Confirm::new()
                .with_prompt(&field.label)
                .default(current.and_then(|v| v.as_bool()).unwrap_or(false))
                .interact()?;
            Ok(Answer::Value(FieldValue::Bool(answer)))
        }
        kind => {
            let prompt = match current {
                Some(_) if !field.required => format!("{} ({} to clear)", field.label, CLEAR_INPUT),
                _ => field.label.clone(),
            };
            let mut input = Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(!field.required);
            if let Some(value) = current {
                input = input.default(value.to_string());
            }
            let raw = input
                .validate_with(|text: &String| -> Result<(), String> {
                    let text = text.trim();
                    if !field.required && (text.is_empty() || text == CLEAR_INPUT) {
                        return Ok(());
                    }
                    let value = kind.parse(text)?;
                    field.validate(Some(&value))
                })
                .interact_text()?;
            interpret_text(field, &raw)
        }
    }
}
