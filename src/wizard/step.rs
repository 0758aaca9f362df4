//! Step and field definitions plus per-step validation.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use regex::Regex;

use super::value::{FieldValue, FieldValues};

/// Expected type of a field's value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Bool,
    Date,
    Choice(Vec<String>),
}

impl FieldKind {
    /// Whether `value` has the variant this kind expects.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (FieldKind::Decimal, FieldValue::Decimal(v)) => v.is_finite(),
            _ => matches!(
                (self, value),
                (FieldKind::Text, FieldValue::Text(_))
                    | (FieldKind::Integer, FieldValue::Integer(_))
                    | (FieldKind::Decimal, FieldValue::Integer(_))
                    | (FieldKind::Bool, FieldValue::Bool(_))
                    | (FieldKind::Date, FieldValue::Date(_))
                    | (FieldKind::Choice(_), FieldValue::Choice(_))
            ),
        }
    }

    /// Parse raw text input into a typed value.
    pub fn parse(&self, input: &str) -> Result<FieldValue, String> {
        let input = input.trim();
        match self {
            FieldKind::Text => Ok(FieldValue::Text(input.to_string())),
            FieldKind::Integer => input
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| "Enter a whole number (e.g., 42)".to_string()),
            FieldKind::Decimal => input
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(FieldValue::Decimal)
                .ok_or_else(|| "Enter a numeric value".to_string()),
            FieldKind::Bool => match input.to_lowercase().as_str() {
                "y" | "yes" | "true" | "1" => Ok(FieldValue::Bool(true)),
                "n" | "no" | "false" | "0" => Ok(FieldValue::Bool(false)),
                _ => Err("Answer yes or no".to_string()),
            },
            FieldKind::Date => NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .map(FieldValue::Date)
                .map_err(|_| "Use YYYY-MM-DD format".to_string()),
            FieldKind::Choice(options) => {
                let normalized = input.to_lowercase();
                options
                    .iter()
                    .find(|candidate| candidate.to_lowercase() == normalized)
                    .map(|c| FieldValue::Choice(c.clone()))
                    .ok_or_else(|| format!("Choose one of: {}", options.join(", ")))
            }
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "a whole number",
            FieldKind::Decimal => "a number",
            FieldKind::Bool => "yes/no",
            FieldKind::Date => "a date",
            FieldKind::Choice(_) => "one of the listed options",
        }
    }
}

/// A compiled pattern rule, compared by its source text.
#[derive(Debug, Clone)]
pub struct PatternRule {
    regex: Regex,
    hint: String,
}

impl PatternRule {
    /// Panics on an invalid pattern; patterns are string literals.
    pub fn new(pattern: &str, hint: impl Into<String>) -> Self {
        Self {
            regex: Regex::new(pattern).expect("field pattern must be a valid regex"),
            hint: hint.into(),
        }
    }
}

impl PartialEq for PatternRule {
    fn eq(&self, other: &Self) -> bool {
        self.regex.as_str() == other.regex.as_str() && self.hint == other.hint
    }
}

/// Value constraint applied after the type check.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRule {
    Any,
    NonEmpty,
    IntegerRange { min: i64, max: i64 },
    DecimalRange { min: f64, max: f64 },
    DateNotBefore(NaiveDate),
    OneOf(Vec<String>),
    Pattern(PatternRule),
}

impl FieldRule {
    pub fn check(&self, value: &FieldValue) -> Result<(), String> {
        match self {
            FieldRule::Any => Ok(()),
            FieldRule::NonEmpty => match value.as_str() {
                Some(s) if s.trim().is_empty() => Err("Value cannot be empty".to_string()),
                _ => Ok(()),
            },
            FieldRule::IntegerRange { min, max } => match value.as_integer() {
                Some(v) if v < *min || v > *max => {
                    Err(format!("Must be between {} and {}", min, max))
                }
                _ => Ok(()),
            },
            FieldRule::DecimalRange { min, max } => match value.as_decimal() {
                Some(v) if !v.is_finite() => Err("Must be a finite number".to_string()),
                Some(v) if v < *min || v > *max => {
                    Err(format!("Must be between {} and {}", min, max))
                }
                _ => Ok(()),
            },
            FieldRule::DateNotBefore(earliest) => match value.as_date() {
                Some(d) if d < *earliest => Err(format!(
                    "Must be on or after {}",
                    earliest.format("%Y-%m-%d")
                )),
                _ => Ok(()),
            },
            FieldRule::OneOf(options) => match value.as_str() {
                Some(s) if !options.iter().any(|o| o == s) => {
                    Err(format!("Choose one of: {}", options.join(", ")))
                }
                _ => Ok(()),
            },
            FieldRule::Pattern(rule) => match value.as_str() {
                Some(s) if !rule.regex.is_match(s.trim()) => Err(rule.hint.clone()),
                _ => Ok(()),
            },
        }
    }
}

/// One field on a step.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub rules: Vec<FieldRule>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            rules: Vec::new(),
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn integer(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Integer)
    }

    pub fn decimal(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Decimal)
    }

    pub fn boolean(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Bool)
    }

    pub fn date(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    /// A choice field; the options double as a `OneOf` rule.
    pub fn choice<S: Into<String>>(
        name: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = S>,
    ) -> Self {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        Self::new(name, label, FieldKind::Choice(options.clone())).rule(FieldRule::OneOf(options))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Validate one value (or its absence) against this field.
    pub fn validate(&self, value: Option<&FieldValue>) -> Result<(), String> {
        let value = match value {
            Some(v) if !v.is_blank() => v,
            _ if self.required => return Err(format!("{} is required", self.label)),
            _ => return Ok(()),
        };

        if !self.kind.accepts(value) {
            return Err(format!("{} must be {}", self.label, self.kind.describe()));
        }

        for rule in &self.rules {
            rule.check(value)?;
        }
        Ok(())
    }
}

/// One page of a wizard.
#[derive(Debug, Clone, PartialEq)]
pub struct StepDefinition {
    pub id: String,
    pub title: String,
    pub fields: Vec<FieldSpec>,
}

impl StepDefinition {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check every field of this step against `values`.
    pub fn validate(&self, values: &FieldValues) -> StepFeedback {
        let errors = self
            .fields
            .iter()
            .filter_map(|field| {
                field
                    .validate(values.get(&field.name))
                    .err()
                    .map(|message| (field.name.clone(), message))
            })
            .collect();
        StepFeedback { errors }
    }
}

/// Field-level validation messages for one step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepFeedback {
    errors: BTreeMap<String, String>,
}

impl StepFeedback {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn invalid_fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

impl fmt::Display for StepFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}
