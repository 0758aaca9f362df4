//! Typed request and response bodies for the backend API.
//!
//! Wire names are camelCase. Status enums accept unknown values so a
//! backend adding a state does not break listing.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Record identifier. The backend uses both numeric and GUID ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => EntityId(s),
            Raw::Number(n) => EntityId(n.to_string()),
        })
    }
}

/// ABO/Rh blood type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(BloodType::label).collect()
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BloodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        BloodType::ALL
            .iter()
            .copied()
            .find(|t| t.label() == wanted)
            .ok_or_else(|| format!("unknown blood type '{}'", s))
    }
}

/// Blood component requested or stocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    WholeBlood,
    RedCells,
    Plasma,
    Platelets,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::WholeBlood,
        ComponentKind::RedCells,
        ComponentKind::Plasma,
        ComponentKind::Platelets,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ComponentKind::WholeBlood => "whole_blood",
            ComponentKind::RedCells => "red_cells",
            ComponentKind::Plasma => "plasma",
            ComponentKind::Platelets => "platelets",
        }
    }
}

impl FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '-'], "_");
        ComponentKind::ALL
            .iter()
            .copied()
            .find(|c| c.code() == wanted)
            .ok_or_else(|| format!("unknown component '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    High,
    Normal,
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(Urgency::Critical),
            "high" => Ok(Urgency::High),
            "normal" => Ok(Urgency::Normal),
            other => Err(format!("unknown urgency '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Fulfilled,
    Rejected,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "fulfilled" => Ok(RequestStatus::Fulfilled),
            "rejected" => Ok(RequestStatus::Rejected),
            "cancelled" => Ok(RequestStatus::Cancelled),
            other => Err(format!("unknown request status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    pub const LABELS: [&'static str; 3] = ["morning", "afternoon", "evening"];
}

impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(TimeSlot::Morning),
            "afternoon" => Ok(TimeSlot::Afternoon),
            "evening" => Ok(TimeSlot::Evening),
            other => Err(format!("unknown time slot '{}'", other)),
        }
    }
}

/// Signed-in user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: EntityId,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodGroupInfo {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentTypeInfo {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub shelf_life_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodInventoryItem {
    pub id: EntityId,
    pub blood_group_name: String,
    pub component_type_name: String,
    pub quantity: u32,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationAppointment {
    pub id: EntityId,
    #[serde(default)]
    pub donor_name: Option<String>,
    pub appointment_date: NaiveDate,
    pub time_slot: TimeSlot,
    pub location: String,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationAppointment {
    pub full_name: String,
    pub phone_number: String,
    pub blood_group: BloodType,
    pub appointment_date: NaiveDate,
    pub time_slot: TimeSlot,
    pub location: String,
    pub weight_kg: f64,
    pub recent_illness: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequest {
    pub id: EntityId,
    pub patient_name: String,
    pub blood_group: BloodType,
    pub component_type: ComponentKind,
    pub quantity: u32,
    pub urgency: Urgency,
    pub hospital_name: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub needed_by: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmergencyRequest {
    pub patient_name: String,
    pub blood_group: BloodType,
    pub component_type: ComponentKind,
    pub quantity: u32,
    pub hospital_name: String,
    pub address: String,
    pub contact_phone: String,
    pub urgency: Urgency,
    pub needed_by: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestStatus {
    pub status: RequestStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorProfile {
    pub id: EntityId,
    pub full_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub blood_group: Option<BloodType>,
    #[serde(default)]
    pub last_donation_date: Option<NaiveDate>,
    #[serde(default)]
    pub total_donations: u32,
    #[serde(default)]
    pub is_eligible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: EntityId,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_accepts_numbers_and_strings() {
        let a: EntityId = serde_json::from_str("42").unwrap();
        let b: EntityId = serde_json::from_str(r#""9f1c""#).unwrap();
        assert_eq!(a.as_str(), "42");
        assert_eq!(b.to_string(), "9f1c");
        assert_eq!(serde_json::to_string(&a).unwrap(), r#""42""#);
    }

    #[test]
    fn blood_type_round_trips_labels() {
        assert_eq!("ab-".parse::<BloodType>().unwrap(), BloodType::AbNegative);
        assert_eq!(serde_json::to_string(&BloodType::OPositive).unwrap(), r#""O+""#);
        assert!("C+".parse::<BloodType>().is_err());
    }

    #[test]
    fn unknown_status_does_not_fail() {
        let status: RequestStatus = serde_json::from_str(r#""escalated""#).unwrap();
        assert_eq!(status, RequestStatus::Unknown);
    }

    #[test]
    fn component_parse_accepts_spaces() {
        assert_eq!("Red Cells".parse::<ComponentKind>().unwrap(), ComponentKind::RedCells);
    }

    #[test]
    fn create_appointment_serializes_camel_case() {
        let body = CreateDonationAppointment {
            full_name: "Tran Binh".into(),
            phone_number: "0901234567".into(),
            blood_group: BloodType::BPositive,
            appointment_date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            time_slot: TimeSlot::Morning,
            location: "Central".into(),
            weight_kg: 61.5,
            recent_illness: false,
            notes: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["bloodGroup"], "B+");
        assert_eq!(json["appointmentDate"], "2026-11-02");
        assert_eq!(json["timeSlot"], "morning");
        assert!(json.get("notes").is_none());
    }
}
