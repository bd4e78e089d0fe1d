//! Session control tools

use super::{Tool, ToolFailure, ToolMetadata};
use crate::utils::display;
use crate::{required_string, tool_metadata};
use async_trait::async_trait;
use serde_json::Value;

/// Ends the conversation with a final message to the user
pub struct TerminateTool;

#[async_trait]
impl Tool for TerminateTool {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "terminate",
            description: "Ends the session and prints a final message for the user.",
            parameters: [
                { name: "message" }
            ]
        }
    }

    async fn execute(&self, args: Value) -> Result<String, ToolFailure> {
        let message = required_string!(args, "message");
        display::print_success(message);
        Ok(message.to_string())
    }

    fn ends_session(&self) -> bool {
        true
    }
}
