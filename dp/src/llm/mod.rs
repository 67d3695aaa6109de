//! LLM client module
//!
//! Provider-agnostic completion requests with Google Gemini, OpenAI and
//! Anthropic backends.

use std::sync::Arc;

use tracing::debug;

mod anthropic;
pub mod client;
mod error;
mod google;
mod openai;
mod provider;
mod types;

pub use anthropic::AnthropicClient;
pub use client::LlmClient;
pub use error::LlmError;
pub use google::GoogleClient;
pub use openai::OpenAIClient;
pub use provider::{ClientConstructor, Provider};
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, TokenUsage};

use crate::config::ResolvedProvider;

/// Create an LLM client for the resolved provider
pub fn create_client(config: &ResolvedProvider) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    config.provider.constructor()(config)
}

/// Strip a surrounding Markdown code fence from model output
///
/// Models asked for JSON often wrap it in ```json ... ``` anyway.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Join an API base URL and a path without doubling slashes
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
