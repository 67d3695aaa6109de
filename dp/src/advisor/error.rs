//! Advisor error types

use std::time::Duration;

use thiserror::Error;

use crate::llm::{LlmError, Provider};

/// Errors surfaced by a suggestion request
///
/// Every failure is all-or-nothing: no partial recommendations are returned.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Provider request failed: {0}")]
    Provider(#[from] LlmError),

    #[error("An API key for {provider} is required. Set {env_var} or use /key {provider} <KEY>")]
    MissingCredential { provider: Provider, env_var: String },

    #[error("Response did not match the expected shape: {0}")]
    Schema(String),

    #[error("A suggestion request is already in progress")]
    Busy,

    #[error("Failed to render prompt: {0}")]
    Prompt(#[from] handlebars::RenderError),
}

impl AdvisorError {
    /// True when the user must supply or fix a credential
    pub fn needs_credential(&self) -> bool {
        match self {
            AdvisorError::MissingCredential { .. } => true,
            AdvisorError::Provider(e) => e.is_auth_error(),
            _ => false,
        }
    }

    /// How long the provider asked us to wait, when rate limited
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            AdvisorError::Provider(e) => e.retry_after(),
            _ => None,
        }
    }
}
