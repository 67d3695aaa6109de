//! Advisor request and response shapes
//!
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::AdvisorError;
use crate::domain::{Badge, PriorityLabel, Task};
use crate::llm::strip_code_fences;

/// One task as presented to the advisor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaEntry {
    pub task_name: String,
    /// "YYYY-MM-DD HH:MM"
    pub deadline: String,
    pub estimated_effort: String,
    pub is_completed: bool,
}

impl AgendaEntry {
    /// Snapshot a pending agenda task; None for completed or unscheduled tasks
    pub fn from_task(task: &Task) -> Option<Self> {
        if task.is_completed {
            return None;
        }
        Some(Self {
            task_name: task.name.clone(),
            deadline: task.deadline()?,
            estimated_effort: task.estimated_effort.clone(),
            is_completed: false,
        })
    }
}

/// Request value handed to the prompt and the provider constructor
///
/// `api_key` travels with the request but is never serialized, so it cannot
/// reach the prompt text.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizationInput {
    pub agenda: Vec<AgendaEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl PrioritizationInput {
    /// Build from agenda tasks, keeping only pending scheduled ones
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let agenda: Vec<AgendaEntry> = tasks.iter().filter_map(AgendaEntry::from_task).collect();
        debug!(total = tasks.len(), pending = agenda.len(), "PrioritizationInput::from_tasks: called");
        Self {
            agenda,
            provider: None,
            api_key: None,
        }
    }
}

impl std::fmt::Debug for PrioritizationInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrioritizationInput")
            .field("agenda", &self.agenda)
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Advisor response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizationOutput {
    pub recommendations: Vec<Recommendation>,
}

/// Suggested priority for one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub task_name: String,
    /// Leading High/Medium/Low word followed by the reasoning
    pub priority: String,
}

impl Recommendation {
    /// Priority parsed from the leading word, if recognisable
    pub fn label(&self) -> Option<PriorityLabel> {
        PriorityLabel::from_leading_word(&self.priority)
    }

    /// Text after the leading word, without separator punctuation
    pub fn reasoning(&self) -> &str {
        let text = self.priority.trim_start();
        match text.find(char::is_whitespace) {
            Some(pos) => text[pos..].trim_start_matches(|c: char| c.is_whitespace() || c == ':' || c == '-').trim_end(),
            None => "",
        }
    }

    /// Display emphasis; unrecognised labels use the quietest badge
    pub fn badge(&self) -> Badge {
        self.label().map(|l| l.badge()).unwrap_or(Badge::Outline)
    }
}

/// Parse model text into the response shape
///
/// Code fences are stripped first; a missing field is a hard failure.
pub fn parse_output(text: &str) -> Result<PrioritizationOutput, AdvisorError> {
    let body = strip_code_fences(text);
    if body.is_empty() {
        return Err(AdvisorError::Schema("empty response".to_string()));
    }
    serde_json::from_str(body).map_err(|e| AdvisorError::Schema(e.to_string()))
}
