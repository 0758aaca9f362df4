//! Emergency blood request wizard.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::{ApiClient, BloodType, ComponentKind, CreateEmergencyRequest, Urgency};
use crate::wizard::{FieldRule, FieldSpec, FieldValues, StepDefinition, SubmitError, Submitter};

use super::{count, date, parsed, phone_pattern, text};

pub const WIZARD_NAME: &str = "emergency-request";

pub const MAX_UNITS: i64 = 20;

const URGENCY_LEVELS: [&str; 3] = ["critical", "high", "normal"];

pub fn steps(today: NaiveDate) -> Vec<StepDefinition> {
    let components: Vec<&str> = ComponentKind::ALL.iter().map(ComponentKind::code).collect();
    vec![
        StepDefinition::new("patient", "Patient")
            .field(
                FieldSpec::text("patient_name", "Patient name")
                    .required()
                    .rule(FieldRule::NonEmpty),
            )
            .field(FieldSpec::choice("blood_group", "Blood group", BloodType::labels()).required())
            .field(FieldSpec::choice("component", "Component", components).required())
            .field(
                FieldSpec::integer("units", "Units needed")
                    .required()
                    .rule(FieldRule::IntegerRange {
                        min: 1,
                        max: MAX_UNITS,
                    }),
            ),
        StepDefinition::new("hospital", "Hospital")
            .field(
                FieldSpec::text("hospital_name", "Hospital")
                    .required()
                    .rule(FieldRule::NonEmpty),
            )
            .field(
                FieldSpec::text("address", "Address")
                    .required()
                    .rule(FieldRule::NonEmpty),
            )
            .field(
                FieldSpec::text("contact_phone", "Contact phone")
                    .required()
                    .rule(FieldRule::Pattern(phone_pattern())),
            ),
        StepDefinition::new("urgency", "Urgency")
            .field(FieldSpec::choice("urgency_level", "Urgency", URGENCY_LEVELS).required())
            .field(
                FieldSpec::date("needed_by", "Needed by")
                    .required()
                    .rule(FieldRule::DateNotBefore(today)),
            ),
        StepDefinition::new("confirm", "Review and send"),
    ]
}

pub fn package(values: &FieldValues) -> Result<CreateEmergencyRequest, SubmitError> {
    Ok(CreateEmergencyRequest {
        patient_name: text(values, "patient_name")?,
        blood_group: parsed::<BloodType>(values, "blood_group")?,
        component_type: parsed::<ComponentKind>(values, "component")?,
        quantity: count(values, "units")?,
        hospital_name: text(values, "hospital_name")?,
        address: text(values, "address")?,
        contact_phone: text(values, "contact_phone")?,
        urgency: parsed::<Urgency>(values, "urgency_level")?,
        needed_by: date(values, "needed_by")?,
    })
}

pub struct EmergencySubmitter {
    client: ApiClient,
}

impl EmergencySubmitter {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Submitter for EmergencySubmitter {
    async fn submit(&self, values: &FieldValues) -> Result<Option<String>, SubmitError> {
        let body = package(values)?;
        let created = self.client.create_emergency_request(&body).await?;
        tracing::warn!(
            request_id = %created.id,
            blood_group = %created.blood_group,
            units = created.quantity,
            "Emergency request raised"
        );
        Ok(Some(created.id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::FieldValue;

    fn values() -> FieldValues {
        let mut v = FieldValues::new();
        v.insert("patient_name".into(), FieldValue::text("Nguyen Van A"));
        v.insert("blood_group".into(), FieldValue::choice("B+"));
        v.insert("component".into(), FieldValue::choice("platelets"));
        v.insert("units".into(), FieldValue::Integer(4));
        v.insert("hospital_name".into(), FieldValue::text("Cho Ray"));
        v.insert("address".into(), FieldValue::text("201B Nguyen Chi Thanh"));
        v.insert("contact_phone".into(), FieldValue::text("0283855413"));
        v.insert("urgency_level".into(), FieldValue::choice("critical"));
        v.insert(
            "needed_by".into(),
            FieldValue::Date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()),
        );
        v
    }

    #[test]
    fn units_are_bounded() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let patient = &steps(today)[0];
        let mut v = values();
        assert!(patient.validate(&v).is_empty());
        v.insert("units".into(), FieldValue::Integer(0));
        assert!(patient.validate(&v).message_for("units").is_some());
        v.insert("units".into(), FieldValue::Integer(21));
        assert!(patient.validate(&v).message_for("units").is_some());
    }

    #[test]
    fn package_maps_every_field() {
        let body = package(&values()).unwrap();
        assert_eq!(body.component_type, ComponentKind::Platelets);
        assert_eq!(body.urgency, Urgency::Critical);
        assert_eq!(body.quantity, 4);
        assert_eq!(body.hospital_name, "Cho Ray");
    }

    #[test]
    fn negative_units_never_reach_the_wire() {
        let mut v = values();
        v.insert("units".into(), FieldValue::Integer(-2));
        assert!(matches!(
            package(&v),
            Err(SubmitError::Invalid { ref field, .. }) if field == "units"
        ));
    }
}
