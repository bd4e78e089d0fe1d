use crate::error::AgentError;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

/// Endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub llm: LLMConfig,
    pub agent: AgentConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    pub model: Option<String>,
    pub api_key: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub stream: bool,
    pub render: bool,
    pub native_tools: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    FunctionCaller,
    Prototyping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub max_turns: usize,
    pub prompt: PromptKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// The flat variables the agent has always been configured with.
/// They take precedence over files and `APP__` variables.
#[derive(Debug, Clone, Default)]
pub struct FlatEnv {
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub max_tokens: Option<String>,
    pub timeout: Option<String>,
    pub base_url: Option<String>,
}

impl FlatEnv {
    pub fn from_env() -> Self {
        Self {
            model: env::var("MODEL").ok(),
            api_key: env::var("APIKEY").ok(),
            max_tokens: env::var("MAX_TOKEN").ok(),
            timeout: env::var("TIMEOUT").ok(),
            base_url: env::var("API_BASE_URL").ok(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());
        Self::build(&config_env, FlatEnv::from_env())
    }

    pub fn build(config_env: &str, flat: FlatEnv) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("llm.api_key", "")?
            .set_default("llm.base_url", "")?
            .set_default("llm.max_tokens", 1024)?
            .set_default("llm.timeout_secs", 10000)?
            .set_default("llm.stream", true)?
            .set_default("llm.render", true)?
            .set_default("llm.native_tools", true)?
            .set_default("agent.max_turns", 10)?
            .set_default("agent.prompt", "function_caller")?
            .set_default("logging.level", "warn")?
            .add_source(File::with_name(&format!("config/{}", config_env)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("llm.model", flat.model)?
            .set_override_option("llm.api_key", flat.api_key)?
            .set_override_option("llm.max_tokens", flat.max_tokens)?
            .set_override_option("llm.timeout_secs", flat.timeout)?
            .set_override_option("llm.base_url", flat.base_url)?
            .build()?;

        config.try_deserialize()
    }

    /// Must pass before any request is sent.
    pub fn validate(&self) -> Result<(), AgentError> {
        match self.llm.model.as_deref().map(str::trim) {
            Some(model) if !model.is_empty() => Ok(()),
            _ => Err(AgentError::Config(
                "MODEL is not set; a model identifier is required".to_string(),
            )),
        }
    }

    pub fn model(&self) -> &str {
        self.llm.model.as_deref().unwrap_or_default()
    }

    pub fn chat_completions_url(&self) -> String {
        let base = self.llm.base_url.trim();
        let base = if base.is_empty() { DEFAULT_BASE_URL } else { base };
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(flat: FlatEnv) -> Settings {
        Settings::build("__missing__", flat).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = build(FlatEnv::default());

        assert_eq!(settings.llm.api_key, "");
        assert_eq!(settings.llm.base_url, "");
        assert_eq!(settings.llm.max_tokens, 1024);
        assert_eq!(settings.llm.timeout_secs, 10000);
        assert!(settings.llm.stream);
        assert_eq!(settings.agent.max_turns, 10);
        assert_eq!(settings.agent.prompt, PromptKind::FunctionCaller);
    }

    #[test]
    fn test_missing_model_is_config_error() {
        let settings = build(FlatEnv::default());
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));

        let blank = build(FlatEnv {
            model: Some("   ".into()),
            ..FlatEnv::default()
        });
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_flat_env_overrides() {
        let settings = build(FlatEnv {
            model: Some("ollama/llama3".into()),
            api_key: Some("sk-test".into()),
            max_tokens: Some("256".into()),
            timeout: Some("30".into()),
            base_url: Some("http://localhost:1234/v1/".into()),
        });

        assert!(settings.validate().is_ok());
        assert_eq!(settings.model(), "ollama/llama3");
        assert_eq!(settings.llm.api_key, "sk-test");
        assert_eq!(settings.llm.max_tokens, 256);
        assert_eq!(settings.llm.timeout_secs, 30);
        assert_eq!(
            settings.chat_completions_url(),
            "http://localhost:1234/v1/chat/completions"
        );
    }

    #[test]
    fn test_empty_base_url_uses_default_endpoint() {
        let settings = build(FlatEnv::default());
        assert_eq!(
            settings.chat_completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
