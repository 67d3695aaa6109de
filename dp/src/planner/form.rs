//! Input validation for new tasks
//!
//! Raw user input is checked here and rejected before anything reaches the
//! planner, so malformed fields never feed into overlap computation.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use thiserror::Error;

use crate::domain::{NewTask, Schedule};
use crate::effort;

/// 24-hour clock, zero padded
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("time regex is valid"));

/// Reasons a task form is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Task name is required")]
    EmptyName,

    #[error("Effort estimation is required")]
    EmptyEffort,

    #[error("Effort '{0}' must start with a number (e.g. \"30 minutes\", \"2 hours\")")]
    MalformedEffort(String),

    #[error("Invalid time '{0}'. Please use HH:MM")]
    InvalidTime(String),

    #[error("Invalid date '{0}'. Please use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Reminder must be a positive whole number of minutes, got '{0}'")]
    InvalidReminder(String),
}

fn validate_name(name: &str) -> Result<String, FormError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FormError::EmptyName);
    }
    Ok(name.to_string())
}

fn validate_effort(text: &str) -> Result<String, FormError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FormError::EmptyEffort);
    }
    if !effort::is_well_formed(text) {
        return Err(FormError::MalformedEffort(text.to_string()));
    }
    Ok(text.to_string())
}

fn validate_time(text: &str) -> Result<NaiveTime, FormError> {
    let text = text.trim();
    if !TIME_RE.is_match(text) {
        return Err(FormError::InvalidTime(text.to_string()));
    }
    NaiveTime::parse_from_str(text, "%H:%M").map_err(|_| FormError::InvalidTime(text.to_string()))
}

fn validate_date(text: &str) -> Result<NaiveDate, FormError> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| FormError::InvalidDate(text.to_string()))
}

fn validate_reminder(text: &str) -> Result<Option<u32>, FormError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse::<u32>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(FormError::InvalidReminder(text.to_string())),
    }
}

/// Raw fields for a scheduled task
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub name: String,
    /// "YYYY-MM-DD"; today when absent
    pub date: Option<String>,
    /// "HH:MM"
    pub time: String,
    pub estimated_effort: String,
    pub reminder_minutes: Option<String>,
}

impl TaskForm {
    /// Validate all fields, resolving a missing date to `today`
    pub fn validate(&self, today: NaiveDate) -> Result<(NewTask, Schedule), FormError> {
        let name = validate_name(&self.name)?;
        let date = match self.date.as_deref() {
            Some(d) if !d.trim().is_empty() => validate_date(d)?,
            _ => today,
        };
        let time = validate_time(&self.time)?;
        let estimated_effort = validate_effort(&self.estimated_effort)?;
        let reminder_minutes = match self.reminder_minutes.as_deref() {
            Some(r) => validate_reminder(r)?,
            None => None,
        };

        Ok((
            NewTask { name, estimated_effort },
            Schedule {
                start: date.and_time(time),
                reminder_minutes,
            },
        ))
    }
}

/// Raw fields for a backlog item
#[derive(Debug, Clone, Default)]
pub struct BacklogForm {
    pub name: String,
    pub estimated_effort: String,
}

impl BacklogForm {
    pub fn validate(&self) -> Result<NewTask, FormError> {
        Ok(NewTask {
            name: validate_name(&self.name)?,
            estimated_effort: validate_effort(&self.estimated_effort)?,
        })
    }
}
