use crate::config::Settings;
use crate::core::sse;
use crate::error::{AgentError, Result};
use crate::tools::ToolDescriptor;
use futures::Stream;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Tool call in the endpoint's native function-calling format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments object
    #[serde(default)]
    pub arguments: String,
}

/// A complete assistant message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantReply {
    pub content: Option<String>,
    pub tool_calls: Vec<NativeToolCall>,
}

impl AssistantReply {
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    /// Content recorded in memory for this reply. Native tool calls are
    /// kept verbatim so the request stays auditable.
    pub fn transcript(&self) -> String {
        if self.tool_calls.is_empty() {
            return self.text().to_string();
        }

        let calls = serde_json::to_string(&self.tool_calls).unwrap_or_else(|_| {
            self.tool_calls
                .iter()
                .map(|c| c.function.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        });

        if self.text().is_empty() {
            calls
        } else {
            format!("{}\n{}", self.text(), calls)
        }
    }
}

/// Incremental piece of a streamed reply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamFragment {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCallDelta>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToolCallDelta {
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub function: Option<FunctionDelta>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FunctionDelta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<StreamFragment>> + Send>>;

/// Raw result of a completion call
pub enum RawResponse {
    /// Fragments in arrival order; must be consumed by the caller
    Streaming(FragmentStream),
    Complete(AssistantReply),
}

impl std::fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawResponse::Streaming(_) => f.write_str("RawResponse::Streaming(..)"),
            RawResponse::Complete(reply) => f.debug_tuple("RawResponse::Complete").field(reply).finish(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDescriptor]>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<NativeToolCall>>,
}

/// Client for an OpenAI-compatible chat completions endpoint.
///
/// Stateless between calls: every request carries the whole conversation.
pub struct LLMClient {
    client: Client,
    settings: Settings,
    endpoint: String,
}

impl LLMClient {
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.llm.timeout_secs))
            .build()?;
        let endpoint = settings.chat_completions_url();

        Ok(Self {
            client,
            settings,
            endpoint,
        })
    }

    pub fn model(&self) -> &str {
        self.settings.model()
    }

    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDescriptor],
        streaming: bool,
    ) -> Result<RawResponse> {
        let request = ChatRequest {
            model: self.settings.model(),
            messages,
            max_tokens: self.settings.llm.max_tokens,
            stream: streaming,
            tools: if tools.is_empty() { None } else { Some(tools) },
        };

        tracing::debug!(
            "[LLMClient] Sending {} messages and {} tools to {} (stream: {})",
            messages.len(),
            tools.len(),
            self.endpoint,
            streaming
        );

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request);
        if !self.settings.llm.api_key.is_empty() {
            builder = builder.bearer_auth(&self.settings.llm.api_key);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("[LLMClient] HTTP request failed: {}", e);
            AgentError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("[LLMClient] API returned error status {}: {}", status, body);
            return Err(AgentError::Api {
                status: status.as_u16(),
                body,
            });
        }

        if streaming {
            return Ok(RawResponse::Streaming(sse::fragments(response.bytes_stream())));
        }

        let chat_response = response
            .json::<ChatResponse>()
            .await
            .map_err(|e| AgentError::Decode(e.to_string()))?;

        let message = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| AgentError::Decode("response contained no choices".to_string()))?;

        Ok(RawResponse::Complete(AssistantReply {
            content: message.content,
            tool_calls: message.tool_calls.unwrap_or_default(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_wire_format() {
        let message = ChatMessage::new(Role::Assistant, "hi");
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"role": "assistant", "content": "hi"})
        );
    }

    #[test]
    fn test_transcript_keeps_native_calls() {
        let reply = AssistantReply {
            content: None,
            tool_calls: vec![NativeToolCall {
                id: Some("call_1".into()),
                function: FunctionCall {
                    name: "terminate".into(),
                    arguments: r#"{"message":"bye"}"#.into(),
                },
            }],
        };

        let transcript = reply.transcript();
        let parsed: serde_json::Value = serde_json::from_str(&transcript).unwrap();
        assert_eq!(parsed[0]["function"]["name"], "terminate");

        let with_text = AssistantReply {
            content: Some("Closing up.".into()),
            ..reply
        };
        assert!(with_text.transcript().starts_with("Closing up.\n["));
    }

    #[test]
    fn test_request_omits_empty_tools() {
        let messages = [ChatMessage::new(Role::User, "hello")];
        let request = ChatRequest {
            model: "m",
            messages: &messages,
            max_tokens: 16,
            stream: false,
            tools: None,
        };

        let wire = serde_json::to_value(&request).unwrap();
        assert!(wire.get("tools").is_none());
        assert_eq!(wire["messages"][0]["role"], "user");
    }
}
