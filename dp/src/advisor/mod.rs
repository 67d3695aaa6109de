//! Priority advisor
//!
//! Sends a snapshot of pending agenda tasks to a hosted model and returns
//! its priority recommendations. The advisor never touches the planner:
//! callers pass tasks in and render whatever comes back.

mod error;
pub mod prompt;
mod schema;
mod settings;

pub use error::AdvisorError;
pub use schema::{AgendaEntry, PrioritizationInput, PrioritizationOutput, Recommendation, parse_output};
pub use settings::AdvisorSettings;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::config::ResolvedProvider;
use crate::domain::Task;
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message, StopReason, create_client};

/// Builds the client for one request
pub type ClientFactory = Box<dyn Fn(&ResolvedProvider) -> Result<Arc<dyn LlmClient>, LlmError> + Send + Sync>;

/// Outcome of a suggestion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    /// No pending tasks; no provider was contacted
    NothingToPrioritize,
    Recommendations(Vec<Recommendation>),
}

/// Requests priority suggestions, one at a time
pub struct PriorityAdvisor {
    in_flight: AtomicBool,
    factory: ClientFactory,
}

impl Default for PriorityAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityAdvisor {
    /// Advisor that builds real provider clients
    pub fn new() -> Self {
        Self::with_client_factory(create_client)
    }

    /// Advisor with a custom client factory
    pub fn with_client_factory<F>(factory: F) -> Self
    where
        F: Fn(&ResolvedProvider) -> Result<Arc<dyn LlmClient>, LlmError> + Send + Sync + 'static,
    {
        Self {
            in_flight: AtomicBool::new(false),
            factory: Box::new(factory),
        }
    }

    /// True while a request is pending
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Ask the selected provider to prioritize the pending tasks
    ///
    /// Completed and unscheduled tasks are left out. With nothing left,
    /// returns `NothingToPrioritize` without contacting any provider. A call
    /// made while another is pending fails with `Busy`. No retries and no
    /// caching: every call is a fresh request.
    pub async fn suggest(&self, tasks: &[Task], settings: &AdvisorSettings) -> Result<Suggestion, AdvisorError> {
        let mut input = PrioritizationInput::from_tasks(tasks);
        if input.agenda.is_empty() {
            debug!("suggest: nothing to prioritize");
            return Ok(Suggestion::NothingToPrioritize);
        }

        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(AdvisorError::Busy)?;

        let resolved = settings.resolve()?;
        input.provider = Some(resolved.provider.to_string());
        input.api_key = Some(resolved.api_key.clone());

        info!(
            provider = %resolved.provider,
            model = %resolved.model,
            tasks = input.agenda.len(),
            "suggest: requesting priorities"
        );

        let client = (self.factory)(&resolved)?;
        let request = CompletionRequest {
            system_prompt: prompt::SYSTEM_PROMPT.to_string(),
            messages: vec![Message::user(prompt::render(&input)?)],
            max_tokens: resolved.max_tokens,
            json_output: true,
        };

        let response = client.complete(request).await?;
        debug!(
            stop_reason = ?response.stop_reason,
            tokens = response.usage.total(),
            "suggest: response received"
        );

        if response.stop_reason == StopReason::Blocked {
            warn!("suggest: provider withheld output");
        }

        let text = response
            .content
            .ok_or_else(|| AdvisorError::Schema("response contained no text".to_string()))?;
        let output = parse_output(&text)?;

        info!(recommendations = output.recommendations.len(), "suggest: done");
        Ok(Suggestion::Recommendations(output.recommendations))
    }
}

/// Marks the advisor busy until dropped
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
