//! Error taxonomy
//!
//! Transport-class errors end the current call and surface to the driver.
//! Malformed action blocks are recoverable and get turned into corrective
//! messages by the session. Tool failures live in `tools::ToolFailure` and
//! never reach this type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("response decode error: {0}")]
    Decode(String),

    #[error("malformed action block: {0}")]
    MalformedAction(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AgentError {
    /// Errors that are fatal to the current completion call.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AgentError::Config(_)
                | AgentError::Transport(_)
                | AgentError::Api { .. }
                | AgentError::Decode(_)
        )
    }
}

impl From<config::ConfigError> for AgentError {
    fn from(err: config::ConfigError) -> Self {
        AgentError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(AgentError::Config("no model".into()).is_transport());
        assert!(AgentError::Api {
            status: 401,
            body: "bad key".into()
        }
        .is_transport());
        assert!(!AgentError::MalformedAction("eof".into()).is_transport());
    }
}
