//! Seed data for populating a planner
//!
//! Seed files are read once at start-up and never written back.
//!
//! ```yaml
//! agenda:
//!   - name: Team stand-up
//!     start: "2026-03-14 09:30"
//!     effort: 30 minutes
//!     reminder: 5
//! backlog:
//!   - name: Check emails
//!     effort: 30 minutes
//! ```

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{NewTask, Schedule};

/// Contents of a seed file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub agenda: Vec<ScheduledSeed>,
    pub backlog: Vec<BacklogSeed>,
}

/// Agenda entry in a seed file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledSeed {
    pub name: String,

    /// "YYYY-MM-DD HH:MM"
    #[serde(with = "start_format")]
    pub start: NaiveDateTime,

    pub effort: String,

    #[serde(default)]
    pub completed: bool,

    /// Reminder lead time in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<u32>,
}

impl ScheduledSeed {
    pub fn new_task(&self) -> NewTask {
        NewTask::new(&self.name, &self.effort)
    }

    pub fn schedule(&self) -> Schedule {
        Schedule {
            start: self.start,
            reminder_minutes: self.reminder,
        }
    }
}

/// Backlog entry in a seed file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacklogSeed {
    pub name: String,
    pub effort: String,
}

impl BacklogSeed {
    pub fn new_task(&self) -> NewTask {
        NewTask::new(&self.name, &self.effort)
    }
}

impl Seed {
    /// Load a seed file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).context(format!("Failed to read seed file {}", path.display()))?;
        let seed = Self::parse(&content).context(format!("Failed to parse seed file {}", path.display()))?;
        info!(
            path = %path.display(),
            agenda = seed.agenda.len(),
            backlog = seed.backlog.len(),
            "Seed::load: loaded"
        );
        Ok(seed)
    }

    /// Parse seed YAML
    pub fn parse(content: &str) -> Result<Self> {
        // An empty document deserializes as null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// A sample day used by `plan --demo`
    pub fn demo(today: NaiveDate) -> Self {
        let at = |h: u32, m: u32| {
            today.and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN))
        };
        let scheduled = |name: &str, start: NaiveDateTime, effort: &str| ScheduledSeed {
            name: name.to_string(),
            start,
            effort: effort.to_string(),
            completed: false,
            reminder: None,
        };

        let mut coffee = scheduled("Morning coffee & planning", at(9, 0), "15 minutes");
        coffee.completed = true;
        let mut review = scheduled("Code review for team members", at(15, 0), "1.5 hours");
        review.reminder = Some(15);

        Self {
            agenda: vec![
                coffee,
                scheduled("Team stand-up meeting", at(9, 30), "30 minutes"),
                scheduled("Develop new feature for Project X", at(10, 0), "3 hours"),
                scheduled("Lunch break", at(13, 0), "1 hour"),
                review,
            ],
            backlog: vec![
                BacklogSeed {
                    name: "Check emails".to_string(),
                    effort: "30 minutes".to_string(),
                },
                BacklogSeed {
                    name: "Plan tomorrow's tasks".to_string(),
                    effort: "20 minutes".to_string(),
                },
            ],
        }
    }
}

mod start_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::domain::DEADLINE_FORMAT;

    pub fn serialize<S: Serializer>(start: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&start.format(DEADLINE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(text.trim(), DEADLINE_FORMAT).map_err(|e| {
            serde::de::Error::custom(format!("invalid start '{}' (expected YYYY-MM-DD HH:MM): {}", text, e))
        })
    }
}
