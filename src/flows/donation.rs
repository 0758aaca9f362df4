//! Donation booking wizard.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::{ApiClient, BloodType, CreateDonationAppointment, DonorProfile, TimeSlot};
use crate::wizard::{
    FieldRule, FieldSpec, FieldValue, FieldValues, StepDefinition, SubmitError, Submitter,
};

use super::{date, decimal, flag, optional_text, parsed, phone_pattern, text};

pub const WIZARD_NAME: &str = "donation-booking";

pub const MIN_WEIGHT_KG: f64 = 45.0;
pub const MAX_WEIGHT_KG: f64 = 200.0;

/// Steps of the booking wizard. Dates before `today` are refused.
pub fn steps(today: NaiveDate) -> Vec<StepDefinition> {
    vec![
        StepDefinition::new("donor", "Donor details")
            .field(
                FieldSpec::text("full_name", "Full name")
                    .required()
                    .rule(FieldRule::NonEmpty),
            )
            .field(
                FieldSpec::text("phone", "Phone number")
                    .required()
                    .rule(FieldRule::Pattern(phone_pattern())),
            )
            .field(FieldSpec::choice("blood_group", "Blood group", BloodType::labels()).required()),
        StepDefinition::new("schedule", "Appointment")
            .field(
                FieldSpec::date("preferred_date", "Preferred date")
                    .required()
                    .rule(FieldRule::DateNotBefore(today)),
            )
            .field(FieldSpec::choice("time_slot", "Time slot", TimeSlot::LABELS).required())
            .field(
                FieldSpec::text("location", "Donation site")
                    .required()
                    .rule(FieldRule::NonEmpty),
            ),
        StepDefinition::new("health", "Health check")
            .field(
                FieldSpec::decimal("weight_kg", "Weight (kg)")
                    .required()
                    .rule(FieldRule::DecimalRange {
                        min: MIN_WEIGHT_KG,
                        max: MAX_WEIGHT_KG,
                    }),
            )
            .field(FieldSpec::boolean("recent_illness", "Ill in the last two weeks").required())
            .field(FieldSpec::text("notes", "Notes for the nurse")),
        StepDefinition::new("confirm", "Review and confirm"),
    ]
}

/// Values known from an existing donor profile.
pub fn prefill(profile: &DonorProfile) -> FieldValues {
    let mut values = FieldValues::new();
    values.insert("full_name".into(), FieldValue::text(&profile.full_name));
    if let Some(phone) = &profile.phone_number {
        values.insert("phone".into(), FieldValue::text(phone));
    }
    if let Some(group) = profile.blood_group {
        values.insert("blood_group".into(), FieldValue::choice(group.label()));
    }
    values
}

/// Build the request body from collected values.
pub fn package(values: &FieldValues) -> Result<CreateDonationAppointment, SubmitError> {
    Ok(CreateDonationAppointment {
        full_name: text(values, "full_name")?,
        phone_number: text(values, "phone")?,
        blood_group: parsed::<BloodType>(values, "blood_group")?,
        appointment_date: date(values, "preferred_date")?,
        time_slot: parsed::<TimeSlot>(values, "time_slot")?,
        location: text(values, "location")?,
        weight_kg: decimal(values, "weight_kg")?,
        recent_illness: flag(values, "recent_illness"),
        notes: optional_text(values, "notes"),
    })
}

pub struct DonationSubmitter {
    client: ApiClient,
}

impl DonationSubmitter {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Submitter for DonationSubmitter {
    async fn submit(&self, values: &FieldValues) -> Result<Option<String>, SubmitError> {
        let body = package(values)?;
        let created = self.client.create_appointment(&body).await?;
        tracing::info!(
            appointment_id = %created.id,
            date = %created.appointment_date,
            "Donation appointment booked"
        );
        Ok(Some(created.id.to_string()))
    }
}
