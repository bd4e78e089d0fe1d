//! Session - one conversation driven turn by turn
//!
//! A turn is: optional user input, one completion call, zero or more tool
//! dispatches, with memory updated along the way. Turns never overlap.

pub mod memory;

use crate::config::Settings;
use crate::core::interpreter::{self, NullSink, RenderSink, ACTION_CORRECTION};
use crate::core::llm::{LLMClient, Role};
use crate::error::Result;
use crate::prompts;
use crate::tools::dispatcher::{DispatchReport, ToolDispatcher};
use crate::tools::registry::ToolRegistry;
use crate::tools::ToolDescriptor;
use crate::utils::display::ConsoleSink;
use memory::ConversationMemory;

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Request token streaming from the endpoint
    pub stream: bool,
    /// Advertise tools through the endpoint's function-calling field.
    /// When off, the tools are described in the system prompt instead.
    pub native_tools: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            stream: true,
            native_tools: true,
        }
    }
}

/// What a single turn produced
#[derive(Debug, Clone, Default)]
pub struct TurnOutcome {
    pub reply: String,
    /// The reply was already shown fragment by fragment
    pub rendered: bool,
    pub dispatched: Vec<DispatchReport>,
    /// Corrective messages sent back for unparseable tool requests
    pub corrections: Vec<String>,
    pub terminated: bool,
}

pub struct Session {
    client: LLMClient,
    dispatcher: ToolDispatcher,
    descriptors: Vec<ToolDescriptor>,
    memory: ConversationMemory,
    options: SessionOptions,
    sink: Box<dyn RenderSink>,
    rendering: bool,
}

impl Session {
    pub fn new(
        client: LLMClient,
        registry: ToolRegistry,
        system_prompt: &str,
        options: SessionOptions,
    ) -> Self {
        let (descriptors, prompt) = if options.native_tools {
            (registry.descriptors(), system_prompt.to_string())
        } else {
            (
                Vec::new(),
                format!(
                    "{}\n\nAvailable tools:\n{}",
                    system_prompt,
                    registry.tools_description()
                ),
            )
        };

        tracing::info!(
            "[Session] Started with model '{}' and {} tools",
            client.model(),
            registry.tool_names().len()
        );

        Self {
            client,
            dispatcher: ToolDispatcher::new(registry),
            descriptors,
            memory: ConversationMemory::with_system(prompt),
            options,
            sink: Box::new(NullSink),
            rendering: false,
        }
    }

    /// Session with the built-in tools, configured from settings
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let options = SessionOptions {
            stream: settings.llm.stream,
            native_tools: settings.llm.native_tools,
        };
        let render = settings.llm.render;
        let prompt = prompts::system_prompt(settings.agent.prompt);

        let client = LLMClient::new(settings)?;
        let session = Self::new(client, ToolRegistry::with_defaults(), prompt, options);

        Ok(if render {
            session.with_sink(Box::new(ConsoleSink::new()))
        } else {
            session
        })
    }

    pub fn with_sink(mut self, sink: Box<dyn RenderSink>) -> Self {
        self.sink = sink;
        self.rendering = true;
        self
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    /// Run one turn. Blank input lets the model continue unprompted.
    ///
    /// Only transport-class failures are returned as errors; tool problems
    /// end up in memory as user messages.
    pub async fn turn(&mut self, input: Option<&str>) -> Result<TurnOutcome> {
        if let Some(text) = input.filter(|t| !t.trim().is_empty()) {
            self.memory.append(Role::User, text);
        }

        let raw = self
            .client
            .complete(self.memory.snapshot(), &self.descriptors, self.options.stream)
            .await?;
        let reply = interpreter::collect_reply(raw, &mut *self.sink).await?;
        let requests = interpreter::tool_requests(&reply);

        self.memory.append(Role::Assistant, reply.transcript());

        let mut outcome = TurnOutcome {
            reply: reply.text().to_string(),
            rendered: self.options.stream && self.rendering,
            ..TurnOutcome::default()
        };

        for request in requests {
            match request {
                Ok(call) => {
                    let report = self.dispatcher.execute(&call, &mut self.memory).await;
                    outcome.terminated |= report.ends_session;
                    outcome.dispatched.push(report);
                }
                Err(e) => {
                    tracing::warn!("[Session] {}", e);
                    let correction = format!("{}\n{}", ACTION_CORRECTION, e);
                    self.memory.append(Role::User, correction.clone());
                    outcome.corrections.push(correction);
                }
            }
        }

        tracing::info!(
            "[Session] Turn complete: {} tool calls, {} corrections, {} messages in memory",
            outcome.dispatched.len(),
            outcome.corrections.len(),
            self.memory.len()
        );

        Ok(outcome)
    }
}
