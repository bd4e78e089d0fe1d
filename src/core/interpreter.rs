//! Response Interpreter
//!
//! Turns raw completion results into reply text and tool requests.

use crate::core::llm::{AssistantReply, FunctionCall, NativeToolCall, RawResponse, ToolCallDelta};
use crate::error::{AgentError, Result};
use crate::tools::ToolCall;
use futures::StreamExt;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Appended to memory when the model's action block cannot be parsed.
pub const ACTION_CORRECTION: &str =
    "ERROR: Your response must include a valid 'action' block. Follow the given instructions.";

/// Fence opened by "```action"; an unclosed fence runs to the end of the text.
static ACTION_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```action(.*?)(?:```|\z)").expect("action block pattern"));

/// Observer for streamed text as it arrives
pub trait RenderSink: Send {
    fn begin(&mut self) {}
    fn fragment(&mut self, text: &str);
    fn end(&mut self) {}
}

/// Discards everything
pub struct NullSink;

impl RenderSink for NullSink {
    fn fragment(&mut self, _text: &str) {}
}

/// Consume a raw response into a complete reply.
///
/// Streamed text is concatenated in arrival order and passed to `sink`
/// fragment by fragment. Streamed tool-call deltas are merged by index.
pub async fn collect_reply(raw: RawResponse, sink: &mut dyn RenderSink) -> Result<AssistantReply> {
    let mut stream = match raw {
        RawResponse::Complete(reply) => return Ok(reply),
        RawResponse::Streaming(stream) => stream,
    };

    let mut text = String::new();
    let mut calls: Vec<NativeToolCall> = Vec::new();

    sink.begin();
    while let Some(fragment) = stream.next().await {
        let fragment = match fragment {
            Ok(fragment) => fragment,
            Err(e) => {
                sink.end();
                return Err(e);
            }
        };

        if let Some(content) = fragment.content.filter(|c| !c.is_empty()) {
            sink.fragment(&content);
            text.push_str(&content);
        }
        for delta in fragment.tool_calls {
            merge_delta(&mut calls, delta);
        }
    }
    sink.end();

    Ok(AssistantReply {
        content: (!text.is_empty()).then_some(text),
        tool_calls: calls,
    })
}

/// Plain text of a raw response.
pub async fn extract_text(raw: RawResponse, sink: &mut dyn RenderSink) -> Result<String> {
    Ok(collect_reply(raw, sink).await?.text().to_string())
}

fn merge_delta(calls: &mut Vec<NativeToolCall>, delta: ToolCallDelta) {
    while calls.len() <= delta.index {
        calls.push(NativeToolCall {
            id: None,
            function: FunctionCall::default(),
        });
    }

    let call = &mut calls[delta.index];
    if delta.id.is_some() {
        call.id = delta.id;
    }
    if let Some(function) = delta.function {
        if let Some(name) = function.name {
            call.function.name.push_str(&name);
        }
        if let Some(arguments) = function.arguments {
            call.function.arguments.push_str(&arguments);
        }
    }
}

/// Find the first `action` block in `text` and parse it.
///
/// `Ok(None)` when there is no block at all; a block that is not a JSON
/// object with `tool_name` (and optionally `args`) is `MalformedAction`.
pub fn parse_action_segment(text: &str) -> Result<Option<ToolCall>> {
    let Some(captures) = ACTION_BLOCK.captures(text) else {
        return Ok(None);
    };
    let segment = captures.get(1).map_or("", |m| m.as_str());

    serde_json::from_str::<ToolCall>(segment)
        .map(Some)
        .map_err(|e| AgentError::MalformedAction(format!("failed to parse 'action' block: {}", e)))
}

/// Convert a native call; its arguments arrive as a JSON string.
pub fn native_tool_call(call: &NativeToolCall) -> Result<ToolCall> {
    let raw = call.function.arguments.trim();
    let args = if raw.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(raw).map_err(|e| {
            AgentError::MalformedAction(format!(
                "arguments for '{}' are not valid JSON: {}",
                call.function.name, e
            ))
        })?
    };
    ToolCall::new(call.function.name.clone(), args)
}

/// Tool requests carried by a reply, in the order they should run.
///
/// Native calls win when present and all of them are returned. Otherwise
/// only the first action block in the text is considered.
pub fn tool_requests(reply: &AssistantReply) -> Vec<Result<ToolCall>> {
    if !reply.tool_calls.is_empty() {
        return reply.tool_calls.iter().map(native_tool_call).collect();
    }

    match parse_action_segment(reply.text()) {
        Ok(Some(call)) => vec![Ok(call)],
        Ok(None) => Vec::new(),
        Err(e) => vec![Err(e)],
    }
}
