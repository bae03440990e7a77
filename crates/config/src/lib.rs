//! Configuration loading, validation, and management for AgriRoute.
//!
//! Loads configuration from `~/.agriroute/config.toml` with environment
//! variable overrides. Validates all settings at startup.

pub mod experts;

pub use experts::{ExpertConfig, default_experts};

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.agriroute/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Upper bound on a single inference call, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Router behavior: persona, fixed texts, failure policies
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Experts registered on the router, in order
    #[serde(default = "default_experts")]
    pub experts: Vec<ExpertConfig>,
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_request_timeout_secs() -> u64 {
    120
}
fn default_true() -> bool {
    true
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("providers", &self.providers)
            .field("routing", &self.routing)
            .field("experts", &self.experts.len())
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

/// What to do when a matched responder fails mid-round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponderFailurePolicy {
    /// Fail the whole request; nothing but the user turn is recorded
    #[default]
    Abort,
    /// Drop the failed responder and note the omission in the reply
    Skip,
}

/// What to do when the synthesis call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationFailurePolicy {
    /// Fail the whole request
    #[default]
    Abort,
    /// Return the raw responder outputs, labeled by name
    Concatenate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Coordinator persona used in classification and aggregation prompts
    #[serde(default = "default_persona")]
    pub persona: String,

    /// Reply to the very first message of a conversation
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Whether the first message is answered with the greeting
    #[serde(default = "default_true")]
    pub greet_first_turn: bool,

    /// Reply when no registered expert matches
    #[serde(default = "default_clarification")]
    pub clarification: String,

    #[serde(default)]
    pub on_responder_failure: ResponderFailurePolicy,

    #[serde(default)]
    pub on_aggregation_failure: AggregationFailurePolicy,
}

fn default_persona() -> String {
    concat!(
        "You are the Manager of AgriRoute, a multi-agent agricultural advisory system.\n\n",
        "Your role is to:\n",
        "1. Receive requests from users\n",
        "2. Analyze the intent and context of each request\n",
        "3. Identify which specialist or combination of specialists is best suited to answer\n",
        "4. Coordinate communication between specialists when needed\n",
        "5. Present answers clearly and professionally\n\n",
        "Keep a professional, cordial and helpful tone.",
    )
    .into()
}

fn default_greeting() -> String {
    concat!(
        "Hello! I am the AgriRoute Manager, your intelligent agricultural advisory system.\n\n",
        "I can connect you with our specialists in:\n",
        "- Crops (maize, cassava, coffee, banana)\n",
        "- Weather and climate forecasting\n",
        "- Pest and disease management\n",
        "- Irrigation and water resources\n",
        "- Farm finance\n",
        "- Design and visualization\n",
        "- Soil analysis\n",
        "- Fertilization and plant nutrition\n",
        "- Sustainability and certification\n\n",
        "How can I help you today?",
    )
    .into()
}

fn default_clarification() -> String {
    concat!(
        "I'm sorry, but I couldn't clearly identify which specialist could best answer ",
        "your request. Could you give more details about your agricultural question?",
    )
    .into()
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            persona: default_persona(),
            greeting: default_greeting(),
            greet_first_turn: true,
            clarification: default_clarification(),
            on_responder_failure: ResponderFailurePolicy::default(),
            on_aggregation_failure: AggregationFailurePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.agriroute/config.toml).
    ///
    /// Also checks environment variables for API keys:
    /// - `AGRIROUTE_API_KEY` (highest priority)
    /// - `GEMINI_API_KEY`
    /// - `OPENROUTER_API_KEY`
    /// - `OPENAI_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;

        // Environment variable overrides (highest priority)
        if config.api_key.is_none() {
            config.api_key = std::env::var("AGRIROUTE_API_KEY")
                .ok()
                .or_else(|| std::env::var("GEMINI_API_KEY").ok())
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(provider) = std::env::var("AGRIROUTE_PROVIDER") {
            config.default_provider = provider;
        }

        if let Ok(model) = std::env::var("AGRIROUTE_MODEL") {
            config.default_model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".agriroute")
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".into(),
            ));
        }

        let ids: HashSet<&str> = self.experts.iter().map(|e| e.id.as_str()).collect();
        let mut seen = HashSet::new();
        let mut labels = HashSet::new();
        for expert in &self.experts {
            if expert.id.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "expert id must not be empty".into(),
                ));
            }
            if !seen.insert(expert.id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate expert id '{}'",
                    expert.id
                )));
            }
            // The classifier replies with a comma-separated list of labels.
            if expert.label.trim().is_empty() || expert.label.contains(',') {
                return Err(ConfigError::ValidationError(format!(
                    "expert '{}' needs a non-empty label without commas",
                    expert.id
                )));
            }
            // Candidates are trimmed before lookup, so padded labels never match.
            if expert.label.trim() != expert.label {
                return Err(ConfigError::ValidationError(format!(
                    "expert '{}' label has leading or trailing whitespace",
                    expert.id
                )));
            }
            if !labels.insert(expert.label.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate expert label '{}'",
                    expert.label
                )));
            }
            // Lookup tries ids before labels.
            if expert.label != expert.id && ids.contains(expert.label.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "expert '{}' label '{}' is another expert's id",
                    expert.id, expert.label
                )));
            }
        }

        Ok(())
    }

    /// Experts that will be registered on the router, in config order.
    pub fn enabled_experts(&self) -> impl Iterator<Item = &ExpertConfig> {
        self.experts.iter().filter(|e| e.enabled)
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some() || self.providers.values().any(|p| p.api_key.is_some())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            providers: HashMap::new(),
            routing: RoutingConfig::default(),
            experts: default_experts(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_provider, "gemini");
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.experts.len(), 9);
        assert!(config.routing.greet_first_turn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn duplicate_label_rejected() {
        let mut config = AppConfig::default();
        config.experts[1].label = config.experts[0].label.clone();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate expert label"));
    }

    #[test]
    fn padded_label_rejected() {
        let mut config = AppConfig::default();
        config.experts[0].label = " Crop Specialist ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn label_shadowing_another_id_rejected() {
        let mut config = AppConfig::default();
        config.experts[0].label = "weather".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("another expert's id"));
    }

    #[test]
    fn label_equal_to_own_id_allowed() {
        let mut config = AppConfig::default();
        config.experts[0].label = config.experts[0].id.clone();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_provider, config.default_provider);
        assert_eq!(parsed.experts, config.experts);
        assert_eq!(parsed.routing.greeting, config.routing.greeting);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            default_temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = AppConfig {
            request_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        let config = result.unwrap();
        assert_eq!(config.default_model, "gemini-2.0-flash");
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gemini"));
        assert!(toml_str.contains("[[experts]]"));
        assert!(toml_str.contains("[routing]"));
    }

    #[test]
    fn partial_file_keeps_builtin_experts() {
        let file = write_config(
            r#"
default_provider = "openrouter"
default_model = "google/gemini-2.0-flash-001"

[routing]
on_responder_failure = "skip"
"#,
        );
        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.default_provider, "openrouter");
        assert_eq!(config.routing.on_responder_failure, ResponderFailurePolicy::Skip);
        assert_eq!(
            config.routing.on_aggregation_failure,
            AggregationFailurePolicy::Abort
        );
        assert_eq!(config.experts.len(), 9);
        assert!(!config.routing.clarification.is_empty());
    }

    #[test]
    fn custom_experts_replace_builtins() {
        let file = write_config(
            r#"
[[experts]]
id = "soil"
label = "Soil"
persona = "You read soil reports."

[[experts]]
id = "irrigation"
label = "Irrigation"
persona = "You design drip systems."
enabled = false
"#,
        );
        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.experts.len(), 2);
        let enabled: Vec<&str> = config.enabled_experts().map(|e| e.id.as_str()).collect();
        assert_eq!(enabled, vec!["soil"]);
    }

    #[test]
    fn duplicate_expert_ids_rejected() {
        let file = write_config(
            r#"
[[experts]]
id = "soil"
label = "Soil"
persona = "a"

[[experts]]
id = "soil"
label = "Soil again"
persona = "b"
"#,
        );
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("duplicate expert id 'soil'"));
    }

    #[test]
    fn label_with_comma_rejected() {
        let mut config = AppConfig::default();
        config.experts[0].label = "Crops, Maize".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let file = write_config("default_temperature = \"hot\"");
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn debug_output_redacts_keys() {
        let mut config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        config.providers.insert(
            "gemini".into(),
            ProviderConfig {
                api_key: Some("AIza-secret".into()),
                api_url: None,
                default_model: None,
            },
        );
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(!debug.contains("AIza-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
