//! Field validation for incoming DTOs
//!
//! Every rule runs; failures are collected instead of stopping at the first one.

use crate::contract::{EventDto, MeetupError, SpeakerDto, SponsorDto};
use chrono::NaiveDate;

/// Maximum length of an event name
pub const EVENT_NAME_MAX: usize = 200;

/// Maximum length of a speaker or sponsor name
pub const PARTICIPANT_NAME_MAX: usize = 50;

/// A single rule violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All rule violations found for one DTO
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl From<ValidationErrors> for MeetupError {
    fn from(errors: ValidationErrors) -> Self {
        MeetupError::InvalidValue {
            detail: errors.to_string(),
        }
    }
}

fn check_required(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>) {
    if value.map_or(true, |v| v.trim().is_empty()) {
        errors.push(field, format!("{field} must be set"));
    }
}

fn check_name(errors: &mut ValidationErrors, value: Option<&str>, max: usize) {
    match value {
        Some(name) if !name.trim().is_empty() => {
            let len = name.chars().count();
            if len > max {
                errors.push(
                    "Name",
                    format!("Name must be between 1 and {max} characters, got {len}"),
                );
            }
        }
        _ => errors.push("Name", "Name must be set"),
    }
}

/// Validate an event against the calendar day `today`
///
/// The date bound is inclusive: an event happening today is accepted.
pub fn validate_event(dto: &EventDto, today: NaiveDate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_name(&mut errors, dto.name.as_deref(), EVENT_NAME_MAX);
    check_required(&mut errors, "Description", dto.description.as_deref());
    check_required(&mut errors, "Plan", dto.plan.as_deref());

    match dto.date {
        Some(date) if date.date() < today => errors.push("Date", "Date must be in the future"),
        Some(_) => {}
        None => errors.push("Date", "Date must be set"),
    }

    check_required(&mut errors, "Location", dto.location.as_deref());

    errors.into_result()
}

pub fn validate_speaker(dto: &SpeakerDto) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_name(&mut errors, dto.name.as_deref(), PARTICIPANT_NAME_MAX);
    errors.into_result()
}

pub fn validate_sponsor(dto: &SponsorDto) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_name(&mut errors, dto.name.as_deref(), PARTICIPANT_NAME_MAX);
    errors.into_result()
}
