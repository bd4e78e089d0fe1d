mod settings;

pub use settings::{AgentConfig, FlatEnv, LLMConfig, LoggingConfig, PromptKind, Settings};
