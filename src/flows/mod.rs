//! Concrete wizards: donation booking and emergency blood requests.
//!
//! Each flow defines its steps and a [`Submitter`](crate::wizard::Submitter)
//! that packages the collected values into a typed API request.

pub mod donation;
pub mod emergency;

use std::str::FromStr;

use chrono::NaiveDate;

use crate::wizard::{FieldValues, PatternRule, SubmitError};

pub(crate) fn phone_pattern() -> PatternRule {
    PatternRule::new(
        r"^\+?[0-9][0-9 ]{7,14}[0-9]$",
        "Enter a phone number (digits, optional leading +)",
    )
}

fn invalid(field: &str, reason: impl Into<String>) -> SubmitError {
    SubmitError::Invalid {
        field: field.to_string(),
        reason: reason.into(),
    }
}

pub(crate) fn text(values: &FieldValues, field: &str) -> Result<String, SubmitError> {
    values
        .get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| invalid(field, "missing text"))
}

pub(crate) fn optional_text(values: &FieldValues, field: &str) -> Option<String> {
    values
        .get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn parsed<T: FromStr<Err = String>>(
    values: &FieldValues,
    field: &str,
) -> Result<T, SubmitError> {
    let raw = values
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid(field, "missing choice"))?;
    raw.parse::<T>().map_err(|e| invalid(field, e))
}

pub(crate) fn date(values: &FieldValues, field: &str) -> Result<NaiveDate, SubmitError> {
    values
        .get(field)
        .and_then(|v| v.as_date())
        .ok_or_else(|| invalid(field, "missing date"))
}

pub(crate) fn count(values: &FieldValues, field: &str) -> Result<u32, SubmitError> {
    let raw = values
        .get(field)
        .and_then(|v| v.as_integer())
        .ok_or_else(|| invalid(field, "missing number"))?;
    u32::try_from(raw).map_err(|_| invalid(field, "must not be negative"))
}

pub(crate) fn decimal(values: &FieldValues, field: &str) -> Result<f64, SubmitError> {
    values
        .get(field)
        .and_then(|v| v.as_decimal())
        .ok_or_else(|| invalid(field, "missing number"))
}

pub(crate) fn flag(values: &FieldValues, field: &str) -> bool {
    values.get(field).and_then(|v| v.as_bool()).unwrap_or(false)
}
