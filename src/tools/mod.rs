//! Tool System - Local operations the model may ask to run
//!
//! Information Hiding:
//! - Tool execution details hidden behind trait
//! - Parameter declarations hidden in implementations, exposed as descriptors
//! - Failures returned as structured values, never unwound past the dispatcher

pub mod control;
pub mod dispatcher;
pub mod filesystem;
pub mod macros;
pub mod registry;

use async_trait::async_trait;
use serde::ser::{Serialize, Serializer};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::error::AgentError;

/// Used as the description of tools that do not declare one.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Parameter type advertised when a parameter declares none.
pub const DEFAULT_PARAMETER_TYPE: &str = "string";

/// Declared parameter of a tool
#[derive(Debug, Clone, PartialEq)]
pub struct ToolParameter {
    pub name: String,
    pub param_type: Option<String>,
    pub default: Option<Value>,
}

impl ToolParameter {
    /// Parameters without a default value must be supplied by the model.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    pub fn schema_type(&self) -> &str {
        self.param_type.as_deref().unwrap_or(DEFAULT_PARAMETER_TYPE)
    }
}

/// Tool metadata - what the tool is called and which arguments it takes
#[derive(Debug, Clone, PartialEq)]
pub struct ToolMetadata {
    pub name: String,
    pub description: Option<String>,
    pub parameters: Vec<ToolParameter>,
}

impl ToolMetadata {
    pub fn description(&self) -> &str {
        match self.description.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => NO_DESCRIPTION,
        }
    }

    /// Check argument names the way a named-parameter call would.
    /// Value types are left to the tool.
    pub fn check_arguments(&self, args: &Value) -> Result<(), ToolFailure> {
        let Some(supplied) = args.as_object() else {
            return Err(ToolFailure::invalid_arguments(
                "arguments must be a JSON object",
            ));
        };

        if let Some(unexpected) = supplied
            .keys()
            .find(|key| !self.parameters.iter().any(|p| &p.name == *key))
        {
            return Err(ToolFailure::invalid_arguments(format!(
                "{}() got an unexpected argument '{}'",
                self.name, unexpected
            )));
        }

        if let Some(missing) = self
            .parameters
            .iter()
            .find(|p| p.is_required() && !supplied.contains_key(&p.name))
        {
            return Err(ToolFailure::invalid_arguments(format!(
                "{}() missing required argument '{}'",
                self.name, missing.name
            )));
        }

        Ok(())
    }
}

impl fmt::Display for ToolMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(rename = "type")]
    pub param_type: String,
}

/// Tool schema sent to the completion endpoint. Built once from metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: BTreeMap<String, ParameterSchema>,
    pub required: Vec<String>,
}

impl From<&ToolMetadata> for ToolDescriptor {
    fn from(metadata: &ToolMetadata) -> Self {
        Self {
            name: metadata.name.clone(),
            description: metadata.description().to_string(),
            parameters: metadata
                .parameters
                .iter()
                .map(|p| {
                    (
                        p.name.clone(),
                        ParameterSchema {
                            param_type: p.schema_type().to_string(),
                        },
                    )
                })
                .collect(),
            required: metadata
                .parameters
                .iter()
                .filter(|p| p.is_required())
                .map(|p| p.name.clone())
                .collect(),
        }
    }
}

impl Serialize for ToolDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(serde::Serialize)]
        struct Wire<'a> {
            r#type: &'static str,
            function: Function<'a>,
        }

        #[derive(serde::Serialize)]
        struct Function<'a> {
            name: &'a str,
            description: &'a str,
            parameters: Parameters<'a>,
        }

        #[derive(serde::Serialize)]
        struct Parameters<'a> {
            r#type: &'static str,
            properties: &'a BTreeMap<String, ParameterSchema>,
            required: &'a [String],
        }

        Wire {
            r#type: "function",
            function: Function {
                name: &self.name,
                description: &self.description,
                parameters: Parameters {
                    r#type: "object",
                    properties: &self.parameters,
                    required: &self.required,
                },
            },
        }
        .serialize(serializer)
    }
}

/// A request from the model to run one tool
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>, args: Value) -> Result<Self, AgentError> {
        match args {
            Value::Object(args) => Ok(Self {
                tool_name: tool_name.into(),
                args,
            }),
            Value::Null => Ok(Self {
                tool_name: tool_name.into(),
                args: Map::new(),
            }),
            other => Err(AgentError::MalformedAction(format!(
                "arguments must be a JSON object, got {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidArguments,
    Execution,
}

/// Why a tool invocation did not produce a result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ToolFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ToolFailure {
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::InvalidArguments,
            message: message.into(),
        }
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Execution,
            message: message.into(),
        }
    }
}

/// Tool trait - All tools must implement this
///
/// Information Hiding: Tool implementations hide their internal execution logic
/// behind this interface. Failures a user should read (missing file, empty
/// directory) are returned as `Ok` text; `Err` is reserved for calls that
/// could not run at all.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get tool metadata (name, description, parameters)
    fn metadata(&self) -> ToolMetadata;

    /// Execute the tool with given arguments
    ///
    /// # Arguments
    /// * `args` - JSON object keyed by parameter name
    async fn execute(&self, args: Value) -> Result<String, ToolFailure>;

    /// Validate arguments before execution
    fn validate(&self, args: &Value) -> Result<(), ToolFailure> {
        self.metadata().check_arguments(args)
    }

    /// Whether a successful call should end the session.
    fn ends_session(&self) -> bool {
        false
    }
}
