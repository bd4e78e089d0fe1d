//! Server-sent event decoding for streamed completions
//!
//! Lines may be split across network chunks, so bytes are buffered until a
//! full line is available.

use crate::core::llm::{FragmentStream, StreamFragment, ToolCallDelta};
use crate::error::AgentError;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use std::collections::VecDeque;
use std::pin::Pin;

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallDelta>>,
}

struct Decoder<S> {
    inner: Pin<Box<S>>,
    buffer: Vec<u8>,
    pending: VecDeque<StreamFragment>,
    done: bool,
}

impl<S> Decoder<S> {
    fn drain_lines(&mut self) {
        while !self.done {
            let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') else {
                break;
            };
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            self.handle_line(line.trim_end_matches(['\r', '\n']));
        }
    }

    fn handle_line(&mut self, line: &str) {
        let Some(data) = line.strip_prefix("data:") else {
            return;
        };
        let data = data.trim_start();

        if data == "[DONE]" {
            self.done = true;
            return;
        }

        match serde_json::from_str::<StreamChunk>(data) {
            Ok(chunk) => {
                if let Some(choice) = chunk.choices.into_iter().next() {
                    let fragment = StreamFragment {
                        content: choice.delta.content,
                        tool_calls: choice.delta.tool_calls.unwrap_or_default(),
                    };
                    if fragment.content.is_some() || !fragment.tool_calls.is_empty() {
                        self.pending.push_back(fragment);
                    }
                }
            }
            Err(e) => tracing::warn!("[LLMClient] Skipping undecodable stream chunk: {}", e),
        }
    }
}

/// Turn a streamed response body into fragments.
pub fn fragments<S, B>(bytes: S) -> FragmentStream
where
    S: Stream<Item = reqwest::Result<B>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let decoder = Decoder {
        inner: Box::pin(bytes),
        buffer: Vec::new(),
        pending: VecDeque::new(),
        done: false,
    };

    Box::pin(futures::stream::unfold(decoder, |mut decoder| async move {
        loop {
            if let Some(fragment) = decoder.pending.pop_front() {
                return Some((Ok(fragment), decoder));
            }
            if decoder.done {
                return None;
            }

            match decoder.inner.next().await {
                Some(Ok(chunk)) => {
                    decoder.buffer.extend_from_slice(chunk.as_ref());
                    decoder.drain_lines();
                }
                Some(Err(e)) => {
                    decoder.done = true;
                    return Some((Err(AgentError::Transport(e)), decoder));
                }
                None => {
                    // Last line may arrive without a trailing newline
                    decoder.buffer.push(b'\n');
                    decoder.drain_lines();
                    decoder.done = true;
                }
            }
        }
    }))
}
