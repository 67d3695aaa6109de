//! Day planner configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::llm::Provider;

const LOCAL_CONFIG: &str = ".dayplanner.yml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Priority advisor configuration
    pub advisor: AdvisorConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .dayplanner.yml
        let local_config = PathBuf::from(LOCAL_CONFIG);
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/dayplanner/dayplanner.yml
        if let Some(user_config) = Self::user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialised
    ///
    /// Follows the same lookup order as `load` but never fails: any problem
    /// yields None and is reported later by the full load.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates: Vec<PathBuf> = match config_path {
            Some(path) => vec![path.clone()],
            None => std::iter::once(PathBuf::from(LOCAL_CONFIG))
                .chain(Self::user_config_path())
                .collect(),
        };

        candidates
            .into_iter()
            .filter(|p| p.exists())
            .find_map(|p| Self::parse_file(&p).ok())
            .and_then(|config| config.log_level)
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dayplanner").join("dayplanner.yml"))
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::parse_file(&path)?;
        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

/// Priority advisor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Provider name: google, openai or anthropic (unknown names use google)
    pub provider: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Per-provider overrides
    pub providers: ProvidersConfig,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default().to_string(),
            max_tokens: 2048,
            timeout_ms: 60_000,
            providers: ProvidersConfig::default(),
        }
    }
}

impl AdvisorConfig {
    /// Configured provider, falling back to the default for unknown names
    pub fn provider(&self) -> Provider {
        Provider::from_name_or_default(&self.provider)
    }

    /// Overrides for one provider
    pub fn provider_config(&self, provider: Provider) -> &ProviderConfig {
        match provider {
            Provider::Google => &self.providers.google,
            Provider::OpenAi => &self.providers.openai,
            Provider::Anthropic => &self.providers.anthropic,
        }
    }

    /// Combine provider defaults, overrides and a credential into the
    /// settings a client is built from
    pub fn resolve(&self, provider: Provider, api_key: String) -> ResolvedProvider {
        let overrides = self.provider_config(provider);
        ResolvedProvider {
            provider,
            model: overrides
                .model
                .clone()
                .unwrap_or_else(|| provider.default_model().to_string()),
            base_url: overrides
                .base_url
                .clone()
                .unwrap_or_else(|| provider.default_base_url().to_string()),
            api_key,
            max_tokens: self.max_tokens,
            timeout_ms: self.timeout_ms,
        }
    }
}

/// Per-provider sections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub google: ProviderConfig,
    pub openai: ProviderConfig,
    pub anthropic: ProviderConfig,
}

/// Overrides for one provider; unset fields use the provider's defaults
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Model identifier
    pub model: Option<String>,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: Option<String>,

    /// Literal API key; prefer api-key-env
    #[serde(rename = "api-key")]
    pub api_key: Option<String>,
}

impl ProviderConfig {
    /// Environment variable holding this provider's key
    pub fn api_key_env(&self, provider: Provider) -> String {
        self.api_key_env
            .clone()
            .unwrap_or_else(|| provider.default_api_key_env().to_string())
    }

    /// Credential from config: the literal key first, then the env var
    pub fn configured_key<F>(&self, provider: Provider, env: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_key
            .clone()
            .or_else(|| env(&self.api_key_env(provider)))
            .filter(|k| !k.trim().is_empty())
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key_env", &self.api_key_env)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Everything needed to build one provider client
#[derive(Clone)]
pub struct ResolvedProvider {
    pub provider: Provider,
    pub model: String,
    pub base_url: String,
    pub api_key: String,
    pub max_tokens: u32,
    pub timeout_ms: u64,
}

impl std::fmt::Debug for ResolvedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedProvider")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("max_tokens", &self.max_tokens)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}
