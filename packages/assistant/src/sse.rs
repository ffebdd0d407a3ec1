//! Decoder for the chat API's server-sent event stream.
//!
//! Only `data:` lines matter. Each carries a JSON event:
//!
//! ```text
//! data: {"type":"answer","content":"..."}          → text to append
//! data: {"type":"tool_response","content":"{..}"}  → may carry config_json
//! data: {"type":"follow_up","content":"..."}       → suggestion
//! ```
//!
//! Anything else, and any line that is not valid JSON, is skipped.

use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Answer(String),
    /// Tool output; `config` is its `config_json` when present
    ToolResponse { config: Option<Value> },
    FollowUp(String),
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

/// Incremental line decoder; chunks may split lines anywhere
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk, returning the events of every line it completes
    pub fn push(&mut self, chunk: &str) -> Vec<StreamEvent> {
        self.buffer.push_str(chunk);

        let Some(last_newline) = self.buffer.rfind('\n') else {
            return Vec::new();
        };

        let complete: String = self.buffer.drain(..=last_newline).collect();
        complete.lines().filter_map(decode_line).collect()
    }

    /// Decode whatever is left once the stream has ended
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let rest = std::mem::take(&mut self.buffer);
        rest.lines().filter_map(decode_line).collect()
    }
}

/// Decode a single SSE line
pub fn decode_line(line: &str) -> Option<StreamEvent> {
    let line = line.trim();
    let payload = line.strip_prefix("data:")?.trim();

    let event: RawEvent = match serde_json::from_str(payload) {
        Ok(event) => event,
        Err(_) => {
            trace!("[SSE] Skipping undecodable line");
            return None;
        }
    };

    let content = event.content.unwrap_or_default();
    match event.kind.as_deref() {
        Some("answer") => Some(StreamEvent::Answer(content)),
        Some("tool_response") => Some(StreamEvent::ToolResponse {
            config: tool_config(&content),
        }),
        Some("follow_up") => Some(StreamEvent::FollowUp(content)),
        _ => None,
    }
}

fn tool_config(content: &str) -> Option<Value> {
    let output: Value = serde_json::from_str(content).ok()?;
    match output.get("config_json")? {
        Value::Null => None,
        config => Some(config.clone()),
    }
}
