//! Prioritization prompt

use handlebars::Handlebars;
use tracing::debug;

use super::schema::PrioritizationInput;

/// Prompt template, compiled into the binary
pub const PRIORITIZE: &str = include_str!("../../prompts/prioritize.pmt");

/// System prompt sent alongside the rendered template
pub const SYSTEM_PROMPT: &str = "You are a careful planning assistant. You answer only with JSON.";

/// Render the prioritization prompt for a request
///
/// Task names are inserted verbatim; nothing is HTML-escaped.
pub fn render(input: &PrioritizationInput) -> Result<String, handlebars::RenderError> {
    debug!(tasks = input.agenda.len(), "render: called");
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(handlebars::no_escape);
    hbs.render_template(PRIORITIZE, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::schema::AgendaEntry;

    fn input() -> PrioritizationInput {
        PrioritizationInput {
            agenda: vec![
                AgendaEntry {
                    task_name: "Morning coffee & planning".to_string(),
                    deadline: "2026-03-14 09:00".to_string(),
                    estimated_effort: "15 minutes".to_string(),
                    is_completed: false,
                },
                AgendaEntry {
                    task_name: "Lunch break".to_string(),
                    deadline: "2026-03-14 13:00".to_string(),
                    estimated_effort: "1 hour".to_string(),
                    is_completed: false,
                },
            ],
            provider: Some("google".to_string()),
            api_key: Some("sk-secret".to_string()),
        }
    }

    #[test]
    fn test_render_lists_each_task() {
        let prompt = render(&input()).unwrap();
        assert!(prompt.contains(
            "- Task: Morning coffee & planning, Deadline: 2026-03-14 09:00, Estimated Effort: 15 minutes, Completed: false"
        ));
        assert!(prompt.contains("- Task: Lunch break, Deadline: 2026-03-14 13:00"));
    }

    #[test]
    fn test_render_states_rules_and_shape() {
        let prompt = render(&input()).unwrap();
        assert!(prompt.contains("earlier deadlines should generally have higher priority"));
        assert!(prompt.contains("Completed tasks should be ignored"));
        assert!(prompt.contains("\"recommendations\""));
        assert!(prompt.contains("\"taskName\""));
    }

    #[test]
    fn test_render_never_includes_api_key() {
        let prompt = render(&input()).unwrap();
        assert!(!prompt.contains("sk-secret"));
    }
}
