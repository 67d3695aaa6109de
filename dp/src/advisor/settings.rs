//! Advisor settings
//!
//! The selected provider and one credential per provider, built once from
//! config and changed only through the setters below.

use std::collections::HashMap;

use tracing::{debug, info};

use super::AdvisorError;
use crate::config::{AdvisorConfig, ResolvedProvider};
use crate::llm::Provider;

#[derive(Clone)]
pub struct AdvisorSettings {
    provider: Provider,
    credentials: HashMap<Provider, String>,
    config: AdvisorConfig,
}

impl AdvisorSettings {
    /// Build from config, reading key variables from the process environment
    pub fn from_config(config: &AdvisorConfig) -> Self {
        Self::from_config_with(config, |name| std::env::var(name).ok())
    }

    /// Build from config with an explicit environment lookup
    pub fn from_config_with<F>(config: &AdvisorConfig, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials: HashMap<Provider, String> = Provider::ALL
            .into_iter()
            .filter_map(|p| config.provider_config(p).configured_key(p, &env).map(|key| (p, key)))
            .collect();
        let provider = config.provider();
        debug!(
            %provider,
            configured = ?credentials.keys().map(|p| p.as_str()).collect::<Vec<_>>(),
            "AdvisorSettings::from_config_with: called"
        );
        Self {
            provider,
            credentials,
            config: config.clone(),
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn set_provider(&mut self, provider: Provider) {
        info!(%provider, "AdvisorSettings::set_provider");
        self.provider = provider;
    }

    /// Store a credential for a provider; an empty key clears it
    pub fn set_credential(&mut self, provider: Provider, key: impl Into<String>) {
        let key = key.into();
        let key = key.trim();
        if key.is_empty() {
            info!(%provider, "AdvisorSettings::set_credential: cleared");
            self.credentials.remove(&provider);
        } else {
            info!(%provider, "AdvisorSettings::set_credential: stored");
            self.credentials.insert(provider, key.to_string());
        }
    }

    pub fn has_credential(&self, provider: Provider) -> bool {
        self.credentials.contains_key(&provider)
    }

    /// Check the selected provider has a credential
    pub fn ensure_ready(&self) -> Result<(), AdvisorError> {
        if self.has_credential(self.provider) {
            Ok(())
        } else {
            Err(AdvisorError::MissingCredential {
                provider: self.provider,
                env_var: self.config.provider_config(self.provider).api_key_env(self.provider),
            })
        }
    }

    /// Settings for the selected provider's client
    pub fn resolve(&self) -> Result<ResolvedProvider, AdvisorError> {
        self.ensure_ready()?;
        let key = self.credentials.get(&self.provider).cloned().unwrap_or_default();
        Ok(self.config.resolve(self.provider, key))
    }

    /// Model the selected provider will use
    pub fn model(&self) -> String {
        self.config
            .provider_config(self.provider)
            .model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }
}

impl std::fmt::Debug for AdvisorSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut configured: Vec<&str> = self.credentials.keys().map(|p| p.as_str()).collect();
        configured.sort_unstable();
        f.debug_struct("AdvisorSettings")
            .field("provider", &self.provider)
            .field("credentials", &configured)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_to_google_without_credentials() {
        let settings = AdvisorSettings::from_config_with(&AdvisorConfig::default(), no_env);
        assert_eq!(settings.provider(), Provider::Google);
        assert!(!settings.has_credential(Provider::Google));

        let err = settings.ensure_ready().unwrap_err();
        match err {
            AdvisorError::MissingCredential { provider, env_var } => {
                assert_eq!(provider, Provider::Google);
                assert_eq!(env_var, "GEMINI_API_KEY");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_env_credentials_loaded_per_provider() {
        let env = |name: &str| match name {
            "OPENAI_API_KEY" => Some("o-key".to_string()),
            _ => None,
        };
        let mut settings = AdvisorSettings::from_config_with(&AdvisorConfig::default(), env);
        assert!(settings.has_credential(Provider::OpenAi));
        assert!(settings.ensure_ready().is_err());

        settings.set_provider(Provider::OpenAi);
        assert!(settings.ensure_ready().is_ok());
        assert_eq!(settings.resolve().unwrap().api_key, "o-key");
        assert_eq!(settings.model(), "gpt-4o");
    }

    #[test]
    fn test_explicit_credential_wins() {
        let mut config = AdvisorConfig::default();
        config.providers.google.api_key = Some("from-config".to_string());
        let mut settings = AdvisorSettings::from_config_with(&config, no_env);
        assert_eq!(settings.resolve().unwrap().api_key, "from-config");

        settings.set_credential(Provider::Google, "typed-in");
        assert_eq!(settings.resolve().unwrap().api_key, "typed-in");

        settings.set_credential(Provider::Google, "  ");
        assert!(settings.ensure_ready().is_err());
    }

    #[test]
    fn test_credentials_kept_per_provider() {
        let mut settings = AdvisorSettings::from_config_with(&AdvisorConfig::default(), no_env);
        settings.set_credential(Provider::Anthropic, "a-key");
        settings.set_provider(Provider::Google);
        assert!(settings.ensure_ready().is_err());
        settings.set_provider(Provider::Anthropic);
        let resolved = settings.resolve().unwrap();
        assert_eq!(resolved.api_key, "a-key");
        assert_eq!(resolved.model, "claude-3-haiku-20240307");
    }

    #[test]
    fn test_debug_hides_keys() {
        let mut settings = AdvisorSettings::from_config_with(&AdvisorConfig::default(), no_env);
        settings.set_credential(Provider::Google, "sk-secret");
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("google"));
    }
}
