//! Provider selection
//!
//! Each provider maps to a constructor function so adding one never means
//! growing a string switch.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{AnthropicClient, GoogleClient, LlmClient, LlmError, OpenAIClient};
use crate::config::ResolvedProvider;

/// Builds a client for one provider from resolved settings
pub type ClientConstructor = fn(&ResolvedProvider) -> Result<Arc<dyn LlmClient>, LlmError>;

/// Hosted model providers the advisor can use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Provider {
    #[default]
    Google,
    OpenAi,
    Anthropic,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Google, Provider::OpenAi, Provider::Anthropic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }

    /// Parse a provider name, falling back to the default for unknown or
    /// empty names
    pub fn from_name_or_default(name: &str) -> Self {
        match name.parse() {
            Ok(provider) => provider,
            Err(_) => {
                if !name.trim().is_empty() {
                    warn!(%name, "Provider::from_name_or_default: unknown provider, using default");
                }
                Self::default()
            }
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Google => "gemini-1.5-flash",
            Self::OpenAi => "gpt-4o",
            Self::Anthropic => "claude-3-haiku-20240307",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Google => "https://generativelanguage.googleapis.com",
            Self::OpenAi => "https://api.openai.com",
            Self::Anthropic => "https://api.anthropic.com",
        }
    }

    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            Self::Google => "GEMINI_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Constructor for this provider's client
    pub fn constructor(&self) -> ClientConstructor {
        debug!(provider = %self, "Provider::constructor: called");
        match self {
            Self::Google => google,
            Self::OpenAi => openai,
            Self::Anthropic => anthropic,
        }
    }
}

fn google(config: &ResolvedProvider) -> Result<Arc<dyn LlmClient>, LlmError> {
    Ok(Arc::new(GoogleClient::from_config(config)?))
}

fn openai(config: &ResolvedProvider) -> Result<Arc<dyn LlmClient>, LlmError> {
    Ok(Arc::new(OpenAIClient::from_config(config)?))
}

fn anthropic(config: &ResolvedProvider) -> Result<Arc<dyn LlmClient>, LlmError> {
    Ok(Arc::new(AnthropicClient::from_config(config)?))
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "gemini" => Ok(Self::Google),
            "openai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            _ => Err(format!(
                "Unknown provider: '{}'. Supported: google, openai, anthropic",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider() {
        assert_eq!("google".parse::<Provider>().unwrap(), Provider::Google);
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!(" anthropic ".parse::<Provider>().unwrap(), Provider::Anthropic);
        assert!("mistral".parse::<Provider>().is_err());
    }

    #[test]
    fn test_unknown_falls_back_to_google() {
        assert_eq!(Provider::from_name_or_default("mistral"), Provider::Google);
        assert_eq!(Provider::from_name_or_default(""), Provider::Google);
        assert_eq!(Provider::from_name_or_default("openai"), Provider::OpenAi);
    }

    #[test]
    fn test_default_provider_model() {
        assert_eq!(Provider::default(), Provider::Google);
        assert_eq!(Provider::default().default_model(), "gemini-1.5-flash");
    }

    #[test]
    fn test_display_round_trips() {
        for provider in Provider::ALL {
            assert_eq!(provider.to_string().parse::<Provider>().unwrap(), provider);
        }
    }

    #[test]
    fn test_constructor_builds_matching_client() {
        for provider in Provider::ALL {
            let resolved = ResolvedProvider {
                provider,
                model: provider.default_model().to_string(),
                base_url: provider.default_base_url().to_string(),
                api_key: "test-key".to_string(),
                max_tokens: 1024,
                timeout_ms: 1000,
            };
            let client = provider.constructor()(&resolved).unwrap();
            assert_eq!(client.model(), provider.default_model());
        }
    }
}
