//! Tool Dispatcher
//!
//! Information Hiding:
//! - Tool lookup and argument checking hidden
//! - Failure classification hidden
//! - Every outcome is written back to conversation memory as a user turn

use super::registry::ToolRegistry;
use super::{FailureKind, ToolCall, ToolDescriptor};
use crate::core::llm::Role;
use crate::session::memory::ConversationMemory;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    Completed,
    UnknownTool,
    Failed(FailureKind),
}

/// What happened when a tool call was dispatched
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub tool_name: String,
    /// Text appended to memory for the model to read
    pub result: String,
    pub status: DispatchStatus,
    pub ends_session: bool,
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        self.status == DispatchStatus::Completed
    }
}

/// Resolves tool calls against a registry and records their results
pub struct ToolDispatcher {
    registry: ToolRegistry,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.registry.descriptors()
    }

    /// Run one tool call and append its result (or error text) to memory.
    ///
    /// Never fails: unknown tools and tool failures become error text so the
    /// model can correct itself on the next turn.
    pub async fn execute(&self, call: &ToolCall, memory: &mut ConversationMemory) -> DispatchReport {
        let name = call.tool_name.as_str();

        let Some(tool) = self.registry.get(name) else {
            tracing::warn!("[ToolDispatcher] Model requested unknown tool '{}'", name);
            let result = format!(
                "ERROR: Tool '{}' not defined. Please provide a valid tool to execute.",
                name
            );
            memory.append(Role::User, result.clone());
            return DispatchReport {
                tool_name: name.to_string(),
                result,
                status: DispatchStatus::UnknownTool,
                ends_session: false,
            };
        };

        tracing::info!("[ToolDispatcher] Executing tool '{}'", name);

        let args = Value::Object(call.args.clone());
        let outcome = match tool.validate(&args) {
            Ok(()) => tool.execute(args).await,
            Err(failure) => Err(failure),
        };

        let report = match outcome {
            Ok(output) => {
                tracing::debug!(
                    "[ToolDispatcher] Tool '{}' returned {} bytes",
                    name,
                    output.len()
                );
                DispatchReport {
                    tool_name: name.to_string(),
                    result: output,
                    status: DispatchStatus::Completed,
                    ends_session: tool.ends_session(),
                }
            }
            Err(failure) => {
                tracing::warn!("[ToolDispatcher] Tool '{}' failed: {}", name, failure);
                DispatchReport {
                    tool_name: name.to_string(),
                    result: format!("ERROR: Failed to execute the tool '{}'. {}", name, failure),
                    status: DispatchStatus::Failed(failure.kind),
                    ends_session: false,
                }
            }
        };

        memory.append(Role::User, report.result.clone());
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool_metadata;
    use crate::tools::{Tool, ToolFailure, ToolMetadata};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    struct Exploding;

    #[async_trait]
    impl Tool for Exploding {
        fn metadata(&self) -> ToolMetadata {
            tool_metadata! {
                name: "explode",
                description: "Always fails",
                parameters: []
            }
        }

        async fn execute(&self, _args: Value) -> Result<String, ToolFailure> {
            Err(ToolFailure::execution("disk on fire"))
        }
    }

    fn dispatcher() -> ToolDispatcher {
        let mut registry = ToolRegistry::with_defaults();
        registry.register(Arc::new(Exploding));
        ToolDispatcher::new(registry)
    }

    fn call(name: &str, args: Value) -> ToolCall {
        ToolCall::new(name, args).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_tool_is_recorded_not_raised() {
        let dispatcher = dispatcher();
        let mut memory = ConversationMemory::new();

        let report = dispatcher
            .execute(&call("format_disk", json!({})), &mut memory)
            .await;

        assert_eq!(report.status, DispatchStatus::UnknownTool);
        assert!(report.result.contains("Tool 'format_disk' not defined"));
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.last().unwrap().role, Role::User);
        assert_eq!(memory.last().unwrap().content, report.result);
    }

    #[tokio::test]
    async fn test_read_missing_file_returns_text() {
        let dispatcher = dispatcher();
        let mut memory = ConversationMemory::new();

        let report = dispatcher
            .execute(
                &call("read_text_file", json!({"file_name": "/definitely/not/here.txt"})),
                &mut memory,
            )
            .await;

        assert!(report.is_success());
        assert_eq!(
            report.result,
            "Error: The file '/definitely/not/here.txt' was not found."
        );
        assert_eq!(memory.len(), 1);
    }

    #[tokio::test]
    async fn test_execution_failure_is_formatted() {
        let dispatcher = dispatcher();
        let mut memory = ConversationMemory::new();

        let report = dispatcher.execute(&call("explode", json!({})), &mut memory).await;

        assert_eq!(report.status, DispatchStatus::Failed(FailureKind::Execution));
        assert_eq!(
            report.result,
            "ERROR: Failed to execute the tool 'explode'. disk on fire"
        );
        assert_eq!(memory.last().unwrap().content, report.result);
    }

    #[tokio::test]
    async fn test_bad_arguments_are_a_failure() {
        let dispatcher = dispatcher();
        let mut memory = ConversationMemory::new();

        let report = dispatcher
            .execute(&call("read_text_file", json!({"path": "a.txt"})), &mut memory)
            .await;

        assert_eq!(
            report.status,
            DispatchStatus::Failed(FailureKind::InvalidArguments)
        );
        assert!(report
            .result
            .starts_with("ERROR: Failed to execute the tool 'read_text_file'."));
        assert_eq!(memory.len(), 1);
    }

    #[tokio::test]
    async fn test_terminate_ends_session() {
        let dispatcher = dispatcher();
        let mut memory = ConversationMemory::new();

        let report = dispatcher
            .execute(&call("terminate", json!({"message": "bye"})), &mut memory)
            .await;

        assert!(report.ends_session);
        assert_eq!(report.result, "bye");
    }
}
