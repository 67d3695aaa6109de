//! Task records

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::id::TaskId;
use crate::effort;

/// Format used for deadlines sent to the advisor and for seed files
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// User-supplied fields shared by agenda and backlog tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub estimated_effort: String,
}

impl NewTask {
    pub fn new(name: impl Into<String>, estimated_effort: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            estimated_effort: estimated_effort.into(),
        }
    }
}

/// Schedule data that places a task on the agenda
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub start: NaiveDateTime,
    pub reminder_minutes: Option<u32>,
}

impl Schedule {
    pub fn at(start: NaiveDateTime) -> Self {
        Self {
            start,
            reminder_minutes: None,
        }
    }

    pub fn with_reminder(mut self, minutes: u32) -> Self {
        self.reminder_minutes = Some(minutes);
        self
    }
}

/// One unit of work, either on the agenda or in the backlog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    /// Present iff the task is on the agenda
    pub scheduled_start: Option<NaiveDateTime>,
    pub estimated_effort: String,
    pub is_completed: bool,
    /// Lead time before the start; stored, never delivered
    pub reminder_minutes: Option<u32>,
    /// Derived by overlap recomputation
    pub has_overlap: bool,
}

impl Task {
    /// Create an agenda task with a fresh ID
    pub fn scheduled(new_task: NewTask, schedule: Schedule) -> Self {
        Self {
            id: TaskId::new(),
            name: new_task.name,
            scheduled_start: Some(schedule.start),
            estimated_effort: new_task.estimated_effort,
            is_completed: false,
            reminder_minutes: schedule.reminder_minutes,
            has_overlap: false,
        }
    }

    /// Create a backlog task with a fresh ID
    pub fn unscheduled(new_task: NewTask) -> Self {
        Self {
            id: TaskId::new(),
            name: new_task.name,
            scheduled_start: None,
            estimated_effort: new_task.estimated_effort,
            is_completed: false,
            reminder_minutes: None,
            has_overlap: false,
        }
    }

    /// Backlog copy of this task: same ID, name and effort; schedule fields
    /// dropped and completion reset
    pub fn into_backlog(self) -> Self {
        Self {
            id: self.id,
            name: self.name,
            scheduled_start: None,
            estimated_effort: self.estimated_effort,
            is_completed: false,
            reminder_minutes: None,
            has_overlap: false,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled_start.is_some()
    }

    /// Parsed effort in minutes (0 when unparseable)
    pub fn duration_minutes(&self) -> f64 {
        effort::parse_duration_minutes(&self.estimated_effort)
    }

    /// End of the task window, if scheduled
    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.scheduled_start
            .map(|start| effort::end_time(start, &self.estimated_effort))
    }

    /// Scheduled start as "YYYY-MM-DD HH:MM"
    pub fn deadline(&self) -> Option<String> {
        self.scheduled_start
            .map(|start| start.format(DEADLINE_FORMAT).to_string())
    }

    /// When a reminder would fire, if one is set
    pub fn reminder_at(&self) -> Option<NaiveDateTime> {
        let start = self.scheduled_start?;
        let lead = self.reminder_minutes?;
        start.checked_sub_signed(chrono::Duration::minutes(i64::from(lead)))
    }
}
