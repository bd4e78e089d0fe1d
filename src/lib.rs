//! Toolchat - tool-calling chat agent over OpenAI-compatible completion APIs
//!
//! The model sees a set of local tools, asks for one either through the
//! endpoint's native function calling or an `action` block in its reply, and
//! reads the result on its next turn.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod prompts;
pub mod session;
pub mod tools;
pub mod utils;

pub use crate::config::Settings;
pub use crate::core::llm::{ChatMessage, LLMClient, Role};
pub use error::{AgentError, Result};
pub use session::{memory::ConversationMemory, Session, SessionOptions, TurnOutcome};
pub use tools::{registry::ToolRegistry, Tool, ToolCall, ToolDescriptor};
